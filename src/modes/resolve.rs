//! Effective-mode resolution.
//!
//! Combines a stored mode with per-slug prompt overrides and, when a working
//! directory is in play, an external instruction-aggregation collaborator
//! that layers in global and workspace-scoped instruction text. The
//! collaborator is the only boundary here that may perform I/O, so it is an
//! async trait; everything else stays synchronous.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::{ModeConfig, PromptOverrides, built_in_modes, get_by_slug};

/// External collaborator that assembles the final instruction text for a
/// mode from its base instructions, the caller's global instructions, and
/// whatever workspace-scoped sources it knows about.
///
/// Implementations may read instruction files under the working directory.
/// Failures propagate to the caller of [`resolve_effective_mode`].
#[async_trait]
pub trait InstructionAggregator: Send + Sync {
    async fn aggregate(
        &self,
        base_instructions: &str,
        global_instructions: &str,
        working_dir: &Path,
        mode_slug: &str,
        language: Option<&str>,
    ) -> crate::Result<String>;
}

/// Context options for [`resolve_effective_mode`].
///
/// The aggregation step only runs when both a working directory and an
/// aggregator are supplied.
#[derive(Clone, Default)]
pub struct ResolveOptions {
    pub working_dir: Option<PathBuf>,
    pub global_instructions: Option<String>,
    pub language: Option<String>,
    pub aggregator: Option<Arc<dyn InstructionAggregator>>,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn global_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.global_instructions = Some(instructions.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn aggregator(mut self, aggregator: Arc<dyn InstructionAggregator>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }
}

impl std::fmt::Debug for ResolveOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveOptions")
            .field("working_dir", &self.working_dir)
            .field("global_instructions", &self.global_instructions)
            .field("language", &self.language)
            .field("aggregator", &self.aggregator.as_ref().map(|_| "<dyn>"))
            .finish()
    }
}

/// Resolve the mode a prompt should be built from.
///
/// Starts from the lenient lookup, falling back to the first built-in mode
/// when the slug is wholly unresolvable. Prompt overrides for the requested
/// slug win over the mode's own stored text, which wins over empty. When
/// `options` carries a working directory and an aggregator, the instruction
/// text is replaced by the aggregator's output.
pub async fn resolve_effective_mode(
    slug: &str,
    custom_modes: &[ModeConfig],
    overrides: Option<&PromptOverrides>,
    options: &ResolveOptions,
) -> crate::Result<ModeConfig> {
    let base = match get_by_slug(slug, custom_modes) {
        Some(mode) => mode,
        None => {
            tracing::debug!(slug, "unknown mode slug, falling back to default");
            &built_in_modes()[0]
        }
    };
    let mut mode = base.clone();

    // Overrides are keyed by the slug the caller asked for, which differs
    // from the resolved mode's slug when the fallback kicked in.
    let component = overrides.and_then(|map| map.get(slug));
    if let Some(role) = component.and_then(|c| c.role_definition.clone()) {
        mode.role_definition = role;
    }
    let mut instructions = component
        .and_then(|c| c.custom_instructions.clone())
        .or_else(|| mode.custom_instructions.clone())
        .unwrap_or_default();

    if let (Some(dir), Some(aggregator)) = (&options.working_dir, &options.aggregator) {
        let global = options.global_instructions.as_deref().unwrap_or("");
        instructions = aggregator
            .aggregate(
                &instructions,
                global,
                dir,
                &mode.slug,
                options.language.as_deref(),
            )
            .await?;
    }

    mode.custom_instructions = (!instructions.is_empty()).then_some(instructions);
    Ok(mode)
}
