//! # agent-modes
//!
//! Mode registry and tool-permission resolution engine for AI coding agents.
//!
//! An agent operates in a named *mode* (code, architect, ask, ...). Each mode
//! grants a set of *tool groups* and carries the role and instruction text
//! that shape the model prompt. This crate owns the data model for modes and
//! groups, the built-in mode catalog, the merge semantics between built-in
//! and caller-supplied custom modes, and the algorithm that decides whether a
//! requested tool call is permitted in a given mode — including per-file-path
//! restrictions on the edit group.
//!
//! Prompt assembly, configuration storage, and all I/O stay outside: callers
//! hand in already-loaded `ModeConfig` values and consume a resolved
//! decision.
//!
//! ## Quick Start
//!
//! ```rust
//! use agent_modes::permissions::{self, ToolParams};
//!
//! // "ask" mode has no edit group, so writes are denied.
//! assert!(!permissions::is_tool_allowed(
//!     "write_to_file", "ask", &[], None, None, None,
//! ).unwrap());
//!
//! // "architect" mode may only edit Markdown files.
//! let params = ToolParams::new().path("src/main.rs").content("fn main() {}");
//! let err = permissions::is_tool_allowed(
//!     "write_to_file", "architect", &[], None, Some(&params), None,
//! ).unwrap_err();
//! assert!(err.is_file_restriction());
//! ```
//!
//! ## Custom Modes
//!
//! ```rust
//! use agent_modes::groups::{GroupEntry, ToolGroup};
//! use agent_modes::modes::{self, ModeConfig};
//!
//! let custom = vec![ModeConfig::new("docs", "Docs", "You write documentation.")
//!     .groups(vec![GroupEntry::simple(ToolGroup::Read)])];
//!
//! // A novel slug is appended after the built-ins...
//! let all = modes::get_all(&custom);
//! assert_eq!(all.last().unwrap().slug, "docs");
//!
//! // ...while a matching slug replaces the built-in in place.
//! assert!(modes::is_custom("docs", &custom));
//! ```

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod groups;
pub mod modes;
pub mod permissions;

// Re-exports for convenience
pub use groups::{
    ALWAYS_AVAILABLE_TOOLS, EXPERIMENTAL_TOOLS, GroupEntry, GroupOptions, ToolGroup,
    is_always_available, is_experimental, tools_for_group, tools_for_mode,
};
pub use modes::{
    InstructionAggregator, ModeConfig, PromptComponent, PromptOverrides, ResolveOptions,
    built_in_modes, default_mode_slug, resolve_effective_mode,
};
pub use permissions::{Experiments, ToolDecision, ToolParams, ToolRequirements, is_tool_allowed};

/// Error type for agent-modes operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Requested mode slug absent from both the custom and built-in sets.
    ///
    /// Only the strict lookup ([`modes::get_config`]) produces this; the
    /// lenient [`modes::get_by_slug`] returns `None` instead.
    #[error("Mode not found: {slug}")]
    ModeNotFound { slug: String },

    /// Edit attempted outside the mode's permitted file-path pattern.
    ///
    /// Recoverable: surface to the end user as a rejected action, not a
    /// process fault.
    #[error("This mode ({mode_name}) can only edit files matching pattern: {pattern}{}. Got: {file_path}", match description {
        Some(d) => format!(" ({d})"),
        None => String::new(),
    })]
    FileRestriction {
        mode_name: String,
        pattern: String,
        description: Option<String>,
        file_path: String,
    },

    /// A caller-supplied mode definition failed validation.
    #[error("Invalid mode definition: {0}")]
    InvalidMode(String),

    /// The external instruction-aggregation collaborator failed.
    #[error("Instruction aggregation failed: {0}")]
    Aggregation(String),
}

impl Error {
    pub fn mode_not_found(slug: impl Into<String>) -> Self {
        Error::ModeNotFound { slug: slug.into() }
    }

    pub fn invalid_mode(message: impl Into<String>) -> Self {
        Error::InvalidMode(message.into())
    }

    pub fn aggregation(message: impl Into<String>) -> Self {
        Error::Aggregation(message.into())
    }

    pub fn is_file_restriction(&self) -> bool {
        matches!(self, Error::FileRestriction { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ModeNotFound { .. })
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
