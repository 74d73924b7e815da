//! Built-in mode catalog.
//!
//! These are the standard modes bundled with the crate. The catalog is a
//! process-wide constant: the merge in [`super::get_all`] produces a new
//! sequence rather than touching it. The first entry is the default mode.

use std::sync::LazyLock;

use crate::groups::{GroupEntry, GroupOptions, ToolGroup};

use super::ModeConfig;

/// Code mode: full read/edit/command/browser/mcp grants.
pub fn code_mode() -> ModeConfig {
    ModeConfig::new("code", "Code", CODE_ROLE).groups(vec![
        GroupEntry::simple(ToolGroup::Read),
        GroupEntry::simple(ToolGroup::Edit),
        GroupEntry::simple(ToolGroup::Browser),
        GroupEntry::simple(ToolGroup::Command),
        GroupEntry::simple(ToolGroup::Mcp),
    ])
}

/// Architect mode: planning and design. Edits are limited to Markdown so the
/// mode can write plans without touching source files.
pub fn architect_mode() -> ModeConfig {
    ModeConfig::new("architect", "Architect", ARCHITECT_ROLE)
        .groups(vec![
            GroupEntry::simple(ToolGroup::Read),
            GroupEntry::scoped(
                ToolGroup::Edit,
                GroupOptions::new()
                    .file_regex(r"\.md$")
                    .description("Markdown files only"),
            ),
            GroupEntry::simple(ToolGroup::Browser),
            GroupEntry::simple(ToolGroup::Mcp),
        ])
        .custom_instructions(ARCHITECT_INSTRUCTIONS)
}

/// Ask mode: answers questions without modifying anything.
pub fn ask_mode() -> ModeConfig {
    ModeConfig::new("ask", "Ask", ASK_ROLE)
        .groups(vec![
            GroupEntry::simple(ToolGroup::Read),
            GroupEntry::simple(ToolGroup::Browser),
            GroupEntry::simple(ToolGroup::Mcp),
        ])
        .custom_instructions(ASK_INSTRUCTIONS)
}

/// Debug mode: same grants as code, with a diagnosis-first workflow.
pub fn debug_mode() -> ModeConfig {
    ModeConfig::new("debug", "Debug", DEBUG_ROLE)
        .groups(vec![
            GroupEntry::simple(ToolGroup::Read),
            GroupEntry::simple(ToolGroup::Edit),
            GroupEntry::simple(ToolGroup::Browser),
            GroupEntry::simple(ToolGroup::Command),
            GroupEntry::simple(ToolGroup::Mcp),
        ])
        .custom_instructions(DEBUG_INSTRUCTIONS)
}

/// Reviewer mode: reads everything, writes only review-response files.
pub fn reviewer_mode() -> ModeConfig {
    ModeConfig::new("reviewer", "Reviewer", REVIEWER_ROLE)
        .groups(vec![
            GroupEntry::simple(ToolGroup::Read),
            GroupEntry::scoped(
                ToolGroup::Edit,
                GroupOptions::new()
                    .file_regex(r"^review-response-.*\.md$")
                    .description("Review response files only"),
            ),
            GroupEntry::simple(ToolGroup::Browser),
            GroupEntry::simple(ToolGroup::Command),
            GroupEntry::simple(ToolGroup::Mcp),
        ])
        .custom_instructions(REVIEWER_INSTRUCTIONS)
}

/// Orchestrator mode: no tool groups of its own. It works purely by
/// delegating subtasks to other modes via the always-available tools.
pub fn orchestrator_mode() -> ModeConfig {
    ModeConfig::new("orchestrator", "Orchestrator", ORCHESTRATOR_ROLE)
        .custom_instructions(ORCHESTRATOR_INSTRUCTIONS)
}

static BUILT_IN_MODES: LazyLock<Vec<ModeConfig>> = LazyLock::new(|| {
    vec![
        code_mode(),
        architect_mode(),
        ask_mode(),
        debug_mode(),
        reviewer_mode(),
        orchestrator_mode(),
    ]
});

/// The ordered built-in mode catalog. The first entry is the default mode.
pub fn built_in_modes() -> &'static [ModeConfig] {
    &BUILT_IN_MODES
}

/// Slug of the process-wide default mode.
pub fn default_mode_slug() -> &'static str {
    &BUILT_IN_MODES[0].slug
}

/// Find a built-in mode by exact slug.
pub fn find_built_in(slug: &str) -> Option<&'static ModeConfig> {
    BUILT_IN_MODES.iter().find(|mode| mode.slug == slug)
}

const CODE_ROLE: &str = "You are a highly skilled software engineer with deep knowledge of many \
programming languages, frameworks, design patterns, and best practices. You write clean, \
idiomatic code, follow the conventions already present in the project, and verify your changes \
before declaring a task complete.";

const ARCHITECT_ROLE: &str = "You are an experienced technical leader and software architect. \
You gather context, ask clarifying questions, and produce a detailed plan for how a task should \
be accomplished before any implementation begins.";

const ARCHITECT_INSTRUCTIONS: &str = r#"1. Start by exploring the codebase and asking clarifying questions until you understand the task.
2. Write a step-by-step plan as a Markdown document, including the files involved and the order of changes.
3. Ask the user to review the plan and revise it based on their feedback.
4. Once the plan is approved, suggest switching to code mode to implement it. Do not implement it yourself."#;

const ASK_ROLE: &str = "You are a knowledgeable technical assistant focused on answering \
questions about software development, the current codebase, and related topics. You explain \
concepts clearly and cite the code you are describing.";

const ASK_INSTRUCTIONS: &str = "Answer the question thoroughly. You can analyze code and \
explain concepts, but you do not implement changes. If the user asks for an implementation, \
suggest switching to code mode instead.";

const DEBUG_ROLE: &str = "You are an expert software debugger specializing in systematic \
problem diagnosis and resolution. You form hypotheses about the source of a problem, confirm \
them with evidence, and only then apply a fix.";

const DEBUG_INSTRUCTIONS: &str = r#"Reflect on several possible sources of the problem and distill them to the most likely ones. Add logging or use commands to validate your assumptions before changing any code. Confirm the diagnosis with the user before applying a fix, and verify the fix afterwards."#;

const REVIEWER_ROLE: &str = "You are a meticulous code reviewer. You read changes carefully, \
weigh correctness, clarity, and consistency with the surrounding code, and write your findings \
as actionable review comments.";

const REVIEWER_INSTRUCTIONS: &str = r#"Read the changes under review along with enough surrounding code to judge them fairly. Record every finding in a review-response Markdown file (review-response-<topic>.md): what is wrong, why it matters, and a concrete suggestion. Never modify the code under review."#;

const ORCHESTRATOR_ROLE: &str = "You are a strategic workflow orchestrator who coordinates \
complex tasks by breaking them down and delegating each piece to the mode best suited for it. \
You track progress across subtasks and synthesize their results.";

const ORCHESTRATOR_INSTRUCTIONS: &str = r#"Break the task into logical subtasks and delegate each one to an appropriate mode with clear, self-contained instructions. You do not read or modify files yourself; all concrete work happens inside the delegated subtasks. When all subtasks are complete, summarize what was accomplished."#;
