//! Mode registry.
//!
//! Built-in modes are a process-wide constant; caller-supplied custom modes
//! logically override them by slug. A custom mode whose slug matches a
//! built-in replaces it in place, one with a novel slug is appended. All
//! operations are pure: the custom sequence is a read-only snapshot supplied
//! per call, and the built-in catalog is never mutated.

mod builtin;
mod resolve;

pub use builtin::{
    architect_mode, ask_mode, built_in_modes, code_mode, debug_mode, default_mode_slug,
    find_built_in, orchestrator_mode, reviewer_mode,
};
pub use resolve::{InstructionAggregator, ResolveOptions, resolve_effective_mode};

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::groups::{GroupEntry, ToolGroup};

/// A named bundle of role text, instruction text, and granted tool groups.
///
/// This is the unit of configuration: built-ins are constructed in
/// [`built_in_modes`], custom modes arrive already deserialized from
/// whatever store the caller uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeConfig {
    /// Unique identifier within a resolved mode set.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Role text injected at the top of the system prompt.
    pub role_definition: String,
    /// Tool groups this mode grants, in declaration order. Order is
    /// load-bearing for permission resolution: the first entry containing a
    /// tool decides, even over a later unrestricted entry.
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
    /// Mode-specific instruction text appended to the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

impl ModeConfig {
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        role_definition: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            role_definition: role_definition.into(),
            groups: Vec::new(),
            custom_instructions: None,
        }
    }

    pub fn groups(mut self, groups: Vec<GroupEntry>) -> Self {
        self.groups = groups;
        self
    }

    pub fn custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }

    /// Whether this mode declares the given group at all.
    pub fn grants_group(&self, group: ToolGroup) -> bool {
        self.groups.iter().any(|entry| entry.group() == group)
    }
}

/// Per-mode prompt override: either component, when present, wins over the
/// mode's own stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

/// Prompt overrides keyed by mode slug.
pub type PromptOverrides = HashMap<String, PromptComponent>;

/// Lenient lookup: custom modes first (exact slug match), then built-ins.
/// Returns `None` when absent.
pub fn get_by_slug<'a>(slug: &str, custom_modes: &'a [ModeConfig]) -> Option<&'a ModeConfig> {
    custom_modes
        .iter()
        .find(|mode| mode.slug == slug)
        .or_else(|| find_built_in(slug))
}

/// Strict lookup for call sites that require the mode to exist.
pub fn get_config<'a>(slug: &str, custom_modes: &'a [ModeConfig]) -> crate::Result<&'a ModeConfig> {
    get_by_slug(slug, custom_modes).ok_or_else(|| crate::Error::mode_not_found(slug))
}

/// The full mode set: built-ins in their original order, with matching custom
/// slugs replaced in place and novel custom slugs appended in supplied order.
pub fn get_all(custom_modes: &[ModeConfig]) -> Vec<ModeConfig> {
    let mut all: Vec<ModeConfig> = built_in_modes().to_vec();
    for custom in custom_modes {
        match all.iter().position(|mode| mode.slug == custom.slug) {
            Some(index) => all[index] = custom.clone(),
            None => all.push(custom.clone()),
        }
    }
    all
}

/// True iff some entry in `custom_modes` has that slug, whether it overrides
/// a built-in or is wholly new.
pub fn is_custom(slug: &str, custom_modes: &[ModeConfig]) -> bool {
    custom_modes.iter().any(|mode| mode.slug == slug)
}

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z0-9-]+$").expect("slug pattern is valid"));

/// Validate a caller-supplied custom mode sequence: slug shape, slug
/// uniqueness, and non-empty name and role text.
pub fn validate_custom_modes(custom_modes: &[ModeConfig]) -> crate::Result<()> {
    let mut seen = HashSet::new();
    for mode in custom_modes {
        if !SLUG_PATTERN.is_match(&mode.slug) {
            return Err(crate::Error::invalid_mode(format!(
                "slug '{}' may only contain letters, numbers, and dashes",
                mode.slug
            )));
        }
        if !seen.insert(mode.slug.as_str()) {
            return Err(crate::Error::invalid_mode(format!(
                "duplicate slug '{}'",
                mode.slug
            )));
        }
        if mode.name.is_empty() {
            return Err(crate::Error::invalid_mode(format!(
                "mode '{}' has an empty name",
                mode.slug
            )));
        }
        if mode.role_definition.is_empty() {
            return Err(crate::Error::invalid_mode(format!(
                "mode '{}' has an empty role definition",
                mode.slug
            )));
        }
    }
    Ok(())
}
