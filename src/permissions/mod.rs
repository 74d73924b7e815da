//! Tool permission resolution.
//!
//! Decides whether a requested tool call is permitted in a given mode. The
//! rules run in a fixed order and the first matching rule decides:
//!
//! 1. Always-available tools are allowed unconditionally.
//! 2. Experimental tools are denied unless their experiment flag is truthy.
//! 3. Tool requirements deny: the literal "all disabled" value, or an
//!    explicit falsy per-tool entry.
//! 4. An unresolvable mode denies.
//! 5. The mode's group entries are scanned in declaration order; the first
//!    entry whose group contains the tool decides, applying the edit-group
//!    file-path restriction when present.
//! 6. Anything else is denied.
//!
//! Group declaration order is load-bearing: if the first matching entry
//! carries a path restriction, that restriction is authoritative even when a
//! later entry would grant the tool unconditionally.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::groups::{ToolGroup, is_always_available, is_experimental};
use crate::modes::{ModeConfig, get_by_slug};

/// Experiment flags keyed by experimental tool identifier.
pub type Experiments = HashMap<String, bool>;

/// The tool-call parameters this engine inspects.
///
/// Callers typically hold a loosely-typed parameter map; only these four
/// fields are meaningful here, and [`ToolParams::from_value`] drops anything
/// else by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<Value>>,
}

impl ToolParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = Some(diff.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn operations(mut self, operations: Vec<Value>) -> Self {
        self.operations = Some(operations);
        self
    }

    /// Narrow an arbitrary parameter object to the recognized fields,
    /// ignoring everything else.
    pub fn from_value(value: &Value) -> Self {
        Self {
            path: value
                .get("path")
                .and_then(Value::as_str)
                .map(str::to_string),
            diff: value
                .get("diff")
                .and_then(Value::as_str)
                .map(str::to_string),
            content: value
                .get("content")
                .and_then(Value::as_str)
                .map(str::to_string),
            operations: value
                .get("operations")
                .and_then(Value::as_array)
                .cloned(),
        }
    }

    /// A genuine edit attempt carries something to write: a diff, literal
    /// content, or an operations list. A lookup or dry-run call does not.
    pub fn is_write_attempt(&self) -> bool {
        self.diff.is_some() || self.content.is_some() || self.operations.is_some()
    }
}

/// Per-check enable/disable overrides: either every tool disabled (the
/// persisted literal `false`), or a per-tool map where an explicit `false`
/// entry denies and anything else passes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequirements {
    AllDisabled,
    PerTool(HashMap<String, bool>),
}

impl ToolRequirements {
    pub fn per_tool(entries: impl IntoIterator<Item = (impl Into<String>, bool)>) -> Self {
        Self::PerTool(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    fn denies(&self, tool: &str) -> bool {
        match self {
            Self::AllDisabled => true,
            Self::PerTool(map) => map.get(tool) == Some(&false),
        }
    }
}

/// Outcome of a permission check, pattern-matchable by callers.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolDecision {
    Allowed,
    Denied,
    /// The edit-group path restriction was violated.
    PathViolation {
        mode_name: String,
        pattern: String,
        description: Option<String>,
        file_path: String,
    },
}

impl ToolDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Collapse to the boolean contract: `PathViolation` becomes
    /// [`crate::Error::FileRestriction`], `Denied` is just `false`.
    pub fn into_result(self) -> crate::Result<bool> {
        match self {
            Self::Allowed => Ok(true),
            Self::Denied => Ok(false),
            Self::PathViolation {
                mode_name,
                pattern,
                description,
                file_path,
            } => Err(crate::Error::FileRestriction {
                mode_name,
                pattern,
                description,
                file_path,
            }),
        }
    }
}

/// Run the permission algorithm and return a typed decision.
pub fn evaluate(
    tool: &str,
    mode_slug: &str,
    custom_modes: &[ModeConfig],
    requirements: Option<&ToolRequirements>,
    params: Option<&ToolParams>,
    experiments: Option<&Experiments>,
) -> ToolDecision {
    if is_always_available(tool) {
        return ToolDecision::Allowed;
    }

    // Experimental tools are opt-in: absent map or falsy flag denies.
    if is_experimental(tool) {
        let enabled = experiments
            .and_then(|map| map.get(tool))
            .copied()
            .unwrap_or(false);
        if !enabled {
            tracing::debug!(tool, "experimental tool not enabled");
            return ToolDecision::Denied;
        }
    }

    if let Some(requirements) = requirements
        && requirements.denies(tool)
    {
        return ToolDecision::Denied;
    }

    let Some(mode) = get_by_slug(mode_slug, custom_modes) else {
        tracing::debug!(mode_slug, "mode not found, denying tool");
        return ToolDecision::Denied;
    };

    // First declared group containing the tool decides.
    for entry in &mode.groups {
        if !entry.contains_tool(tool) {
            continue;
        }
        let Some(options) = entry.options() else {
            return ToolDecision::Allowed;
        };

        if entry.group() == ToolGroup::Edit
            && let Some(pattern) = options.file_regex.as_deref()
            && let Some(path) = params.and_then(|p| p.path.as_deref())
            && params.is_some_and(ToolParams::is_write_attempt)
            && !path_matches(pattern, path)
        {
            return ToolDecision::PathViolation {
                mode_name: mode.name.clone(),
                pattern: pattern.to_string(),
                description: options.description.clone(),
                file_path: path.to_string(),
            };
        }

        return ToolDecision::Allowed;
    }

    ToolDecision::Denied
}

/// Boolean contract over [`evaluate`]: `Ok(true)`/`Ok(false)` for
/// allow/deny, `Err` for a file-restriction violation.
pub fn is_tool_allowed(
    tool: &str,
    mode_slug: &str,
    custom_modes: &[ModeConfig],
    requirements: Option<&ToolRequirements>,
    params: Option<&ToolParams>,
    experiments: Option<&Experiments>,
) -> crate::Result<bool> {
    evaluate(tool, mode_slug, custom_modes, requirements, params, experiments).into_result()
}

// A malformed pattern must not crash resolution: fail closed and treat it as
// a non-match, so the specialized edit is denied.
fn path_matches(pattern: &str, path: &str) -> bool {
    match Regex::new(pattern) {
        Ok(regex) => regex.is_match(path),
        Err(error) => {
            tracing::warn!(pattern, %error, "invalid file restriction pattern, treating as non-match");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::{GroupEntry, GroupOptions};
    use serde_json::json;

    fn params_edit(path: &str) -> ToolParams {
        ToolParams::new().path(path).content("x")
    }

    #[test]
    fn test_always_available_overrides_everything() {
        for tool in crate::groups::ALWAYS_AVAILABLE_TOOLS {
            // Nonexistent mode, all tools disabled: still allowed.
            assert_eq!(
                evaluate(
                    tool,
                    "no-such-mode",
                    &[],
                    Some(&ToolRequirements::AllDisabled),
                    None,
                    None,
                ),
                ToolDecision::Allowed
            );
        }
    }

    #[test]
    fn test_experimental_tools_are_opt_in() {
        // No experiments map at all.
        assert_eq!(
            evaluate("insert_content", "code", &[], None, None, None),
            ToolDecision::Denied
        );

        // Explicitly disabled.
        let off = Experiments::from([("insert_content".to_string(), false)]);
        assert_eq!(
            evaluate("insert_content", "code", &[], None, None, Some(&off)),
            ToolDecision::Denied
        );

        // Enabled flag falls through to the group check and passes.
        let on = Experiments::from([("insert_content".to_string(), true)]);
        assert_eq!(
            evaluate("insert_content", "code", &[], None, None, Some(&on)),
            ToolDecision::Allowed
        );
    }

    #[test]
    fn test_enabled_experiment_still_needs_a_granting_group() {
        let on = Experiments::from([("search_and_replace".to_string(), true)]);
        // "ask" has no edit group, so the enabled experiment is still denied.
        assert_eq!(
            evaluate("search_and_replace", "ask", &[], None, None, Some(&on)),
            ToolDecision::Denied
        );
    }

    #[test]
    fn test_all_disabled_denies_everything_non_always() {
        let requirements = ToolRequirements::AllDisabled;
        for tool in ["read_file", "write_to_file", "execute_command"] {
            assert_eq!(
                evaluate(tool, "code", &[], Some(&requirements), None, None),
                ToolDecision::Denied,
                "{tool} should be denied"
            );
        }
    }

    #[test]
    fn test_per_tool_requirements() {
        let requirements = ToolRequirements::per_tool([("apply_diff", false)]);
        assert_eq!(
            evaluate("apply_diff", "code", &[], Some(&requirements), None, None),
            ToolDecision::Denied
        );
        // No entry for the tool does not deny.
        assert_eq!(
            evaluate("read_file", "code", &[], Some(&requirements), None, None),
            ToolDecision::Allowed
        );
        // A truthy entry does not deny either.
        let truthy = ToolRequirements::per_tool([("apply_diff", true)]);
        assert_eq!(
            evaluate("apply_diff", "code", &[], Some(&truthy), None, None),
            ToolDecision::Allowed
        );
    }

    #[test]
    fn test_unknown_mode_denies() {
        assert_eq!(
            evaluate("read_file", "no-such-mode", &[], None, None, None),
            ToolDecision::Denied
        );
    }

    #[test]
    fn test_ask_mode_grants() {
        assert!(evaluate("read_file", "ask", &[], None, None, None).is_allowed());
        assert!(!evaluate("write_to_file", "ask", &[], None, None, None).is_allowed());
        assert!(!evaluate("execute_command", "ask", &[], None, None, None).is_allowed());
        assert!(evaluate("browser_action", "ask", &[], None, None, None).is_allowed());
    }

    #[test]
    fn test_architect_markdown_restriction() {
        // Matching path: allowed.
        assert_eq!(
            evaluate(
                "write_to_file",
                "architect",
                &[],
                None,
                Some(&params_edit("notes.md")),
                None,
            ),
            ToolDecision::Allowed
        );

        // Non-matching path with content: violation.
        let decision = evaluate(
            "write_to_file",
            "architect",
            &[],
            None,
            Some(&params_edit("app.ts")),
            None,
        );
        match decision {
            ToolDecision::PathViolation {
                mode_name,
                pattern,
                description,
                file_path,
            } => {
                assert_eq!(mode_name, "Architect");
                assert_eq!(pattern, r"\.md$");
                assert_eq!(description.as_deref(), Some("Markdown files only"));
                assert_eq!(file_path, "app.ts");
            }
            other => panic!("expected PathViolation, got {other:?}"),
        }

        // Path only, no content/diff/operations: not an edit attempt.
        let lookup = ToolParams::new().path("app.ts");
        assert_eq!(
            evaluate("write_to_file", "architect", &[], None, Some(&lookup), None),
            ToolDecision::Allowed
        );
    }

    #[test]
    fn test_operations_list_counts_as_write() {
        let params = ToolParams::new()
            .path("app.ts")
            .operations(vec![json!({"op": "insert", "line": 1})]);
        let decision = evaluate("insert_content", "architect", &[], None, Some(&params), Some(
            &Experiments::from([("insert_content".to_string(), true)]),
        ));
        assert!(matches!(decision, ToolDecision::PathViolation { .. }));
    }

    #[test]
    fn test_first_matching_group_restriction_wins() {
        // The restricted edit entry is declared before an unrestricted one;
        // its restriction is authoritative.
        let mode = ModeConfig::new("layered", "Layered", "role").groups(vec![
            GroupEntry::scoped(
                ToolGroup::Edit,
                GroupOptions::new().file_regex(r"\.md$"),
            ),
            GroupEntry::simple(ToolGroup::Edit),
        ]);
        let customs = vec![mode];

        let decision = evaluate(
            "write_to_file",
            "layered",
            &customs,
            None,
            Some(&params_edit("main.rs")),
            None,
        );
        assert!(matches!(decision, ToolDecision::PathViolation { .. }));

        // Reversed order: the unrestricted entry comes first and grants.
        let mode = ModeConfig::new("relaxed", "Relaxed", "role").groups(vec![
            GroupEntry::simple(ToolGroup::Edit),
            GroupEntry::scoped(
                ToolGroup::Edit,
                GroupOptions::new().file_regex(r"\.md$"),
            ),
        ]);
        let customs = vec![mode];
        assert_eq!(
            evaluate(
                "write_to_file",
                "relaxed",
                &customs,
                None,
                Some(&params_edit("main.rs")),
                None,
            ),
            ToolDecision::Allowed
        );
    }

    #[test]
    fn test_scoped_non_edit_group_allows() {
        // Options on a non-edit group carry no enforcement.
        let mode = ModeConfig::new("scoped-read", "Scoped Read", "role").groups(vec![
            GroupEntry::scoped(
                ToolGroup::Read,
                GroupOptions::new().file_regex(r"\.md$"),
            ),
        ]);
        let customs = vec![mode];
        assert_eq!(
            evaluate(
                "read_file",
                "scoped-read",
                &customs,
                None,
                Some(&params_edit("main.rs")),
                None,
            ),
            ToolDecision::Allowed
        );
    }

    #[test]
    fn test_invalid_pattern_fails_closed() {
        // Capture the warn! emitted for the uncompilable pattern instead of
        // letting it leak into the test harness output.
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("agent_modes=warn")
            .try_init();

        let mode = ModeConfig::new("broken", "Broken", "role").groups(vec![GroupEntry::scoped(
            ToolGroup::Edit,
            GroupOptions::new().file_regex("["),
        )]);
        let customs = vec![mode];

        // Genuine edit attempt against an uncompilable pattern: violation,
        // never a panic.
        let decision = evaluate(
            "write_to_file",
            "broken",
            &customs,
            None,
            Some(&params_edit("notes.md")),
            None,
        );
        assert!(matches!(decision, ToolDecision::PathViolation { .. }));
    }

    #[test]
    fn test_is_tool_allowed_maps_violation_to_error() {
        let err = is_tool_allowed(
            "write_to_file",
            "architect",
            &[],
            None,
            Some(&params_edit("app.ts")),
            None,
        )
        .unwrap_err();
        assert!(err.is_file_restriction());
        assert_eq!(
            err.to_string(),
            "This mode (Architect) can only edit files matching pattern: \\.md$ (Markdown files only). Got: app.ts"
        );

        assert!(is_tool_allowed("read_file", "ask", &[], None, None, None).unwrap());
        assert!(!is_tool_allowed("write_to_file", "ask", &[], None, None, None).unwrap());
    }

    #[test]
    fn test_tool_params_from_value_ignores_unknown_fields() {
        let value = json!({
            "path": "notes.md",
            "content": "hello",
            "line_count": 3,
            "unknown": {"nested": true},
        });
        let params = ToolParams::from_value(&value);
        assert_eq!(params.path.as_deref(), Some("notes.md"));
        assert_eq!(params.content.as_deref(), Some("hello"));
        assert!(params.diff.is_none());
        assert!(params.operations.is_none());
        assert!(params.is_write_attempt());
    }

    #[test]
    fn test_custom_mode_lookup_participates() {
        // A custom override of "ask" that adds the command group.
        let mode = ModeConfig::new("ask", "Ask+", "role")
            .groups(vec![GroupEntry::simple(ToolGroup::Command)]);
        let customs = vec![mode];

        assert!(evaluate("execute_command", "ask", &customs, None, None, None).is_allowed());
        // The built-in ask grants were replaced wholesale.
        assert!(!evaluate("read_file", "ask", &customs, None, None, None).is_allowed());
    }
}
