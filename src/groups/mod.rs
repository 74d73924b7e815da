//! Tool group catalog.
//!
//! Modes grant *groups* of tools, never individual tools. The catalog here is
//! a fixed lookup table: each [`ToolGroup`] maps to a static list of tool
//! names, and a small set of tools is available in every mode regardless of
//! its declared groups.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier for a bundle of tools a mode can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolGroup {
    /// File and codebase inspection.
    Read,
    /// File modification. The only group that honors a file-path restriction.
    Edit,
    /// Browser automation.
    Browser,
    /// Shell command execution.
    Command,
    /// MCP servers and resources.
    Mcp,
    /// Mode switching and subtask delegation.
    Modes,
}

impl ToolGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Edit => "edit",
            Self::Browser => "browser",
            Self::Command => "command",
            Self::Mcp => "mcp",
            Self::Modes => "modes",
        }
    }
}

impl std::fmt::Display for ToolGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const READ_TOOLS: &[&str] = &[
    "read_file",
    "search_files",
    "list_files",
    "list_code_definition_names",
    "codebase_search",
];

pub const EDIT_TOOLS: &[&str] = &[
    "apply_diff",
    "write_to_file",
    "insert_content",
    "search_and_replace",
];

pub const BROWSER_TOOLS: &[&str] = &["browser_action"];

pub const COMMAND_TOOLS: &[&str] = &["execute_command"];

pub const MCP_TOOLS: &[&str] = &["use_mcp_tool", "access_mcp_resource"];

pub const MODE_TOOLS: &[&str] = &["switch_mode", "new_task"];

/// Tools granted in every mode, unconditionally.
pub const ALWAYS_AVAILABLE_TOOLS: &[&str] = &[
    "ask_followup_question",
    "attempt_completion",
    "switch_mode",
    "new_task",
];

/// Tools gated behind an explicit experiment flag. Denied unless the caller
/// supplies a truthy entry in the experiments map.
pub const EXPERIMENTAL_TOOLS: &[&str] = &["insert_content", "search_and_replace"];

/// The tools a group authorizes.
pub fn tools_for_group(group: ToolGroup) -> &'static [&'static str] {
    match group {
        ToolGroup::Read => READ_TOOLS,
        ToolGroup::Edit => EDIT_TOOLS,
        ToolGroup::Browser => BROWSER_TOOLS,
        ToolGroup::Command => COMMAND_TOOLS,
        ToolGroup::Mcp => MCP_TOOLS,
        ToolGroup::Modes => MODE_TOOLS,
    }
}

pub fn is_always_available(tool: &str) -> bool {
    ALWAYS_AVAILABLE_TOOLS.contains(&tool)
}

pub fn is_experimental(tool: &str) -> bool {
    EXPERIMENTAL_TOOLS.contains(&tool)
}

/// Optional scoping attached to a group grant.
///
/// `file_regex` is only meaningful on the edit group: it restricts which
/// paths the mode may write to. `description` is surfaced in the violation
/// message shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GroupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_regex(mut self, pattern: impl Into<String>) -> Self {
        self.file_regex = Some(pattern.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A group grant in a mode definition: either a bare group id, or a
/// `[group, options]` pair carrying a path restriction.
///
/// Serializes untagged, so `"read"` and `["edit", {"fileRegex": "\\.md$"}]`
/// both round-trip the persisted configuration shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupEntry {
    Simple(ToolGroup),
    Scoped(ToolGroup, GroupOptions),
}

impl GroupEntry {
    pub fn simple(group: ToolGroup) -> Self {
        Self::Simple(group)
    }

    pub fn scoped(group: ToolGroup, options: GroupOptions) -> Self {
        Self::Scoped(group, options)
    }

    /// The group id, regardless of entry shape.
    pub fn group(&self) -> ToolGroup {
        match self {
            Self::Simple(group) | Self::Scoped(group, _) => *group,
        }
    }

    pub fn options(&self) -> Option<&GroupOptions> {
        match self {
            Self::Simple(_) => None,
            Self::Scoped(_, options) => Some(options),
        }
    }

    /// Whether this entry's group authorizes the tool, ignoring any options.
    pub fn contains_tool(&self, tool: &str) -> bool {
        tools_for_group(self.group()).contains(&tool)
    }
}

/// De-duplicated union of each referenced group's tools plus the
/// always-available set. Callers must treat the result as a set; ordering
/// carries no meaning.
pub fn tools_for_mode(entries: &[GroupEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tools = Vec::new();
    for entry in entries {
        for tool in tools_for_group(entry.group()) {
            if seen.insert(*tool) {
                tools.push((*tool).to_string());
            }
        }
    }
    for tool in ALWAYS_AVAILABLE_TOOLS {
        if seen.insert(*tool) {
            tools.push((*tool).to_string());
        }
    }
    tools
}
