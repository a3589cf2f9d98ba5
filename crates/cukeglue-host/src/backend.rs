//! The contract between the engine and a glue backend.

use crate::glue::GlueRegistrar;
use crate::parameter::TargetType;

/// Language-specific text used to suggest glue for undefined steps.
///
/// The template holds six positional slots, `{0}` to `{5}`: step keyword,
/// escaped pattern, function name, parameter list, hint comment and table
/// hint. Any other braces are copied verbatim.
pub trait Snippet {
    /// Suggestion template.
    fn template(&self) -> &str;

    /// Text for slot `{5}` when the step carries a data table.
    fn table_hint(&self) -> &str;

    /// Text for slot `{4}`.
    fn hint_comment(&self) -> &str;

    /// Format a parameter list from `(name, type)` pairs.
    fn arguments(&self, arguments: &[(String, TargetType)]) -> String;

    /// Make pattern text safe to embed in the template.
    fn escape_pattern(&self, pattern: &str) -> String;
}

/// A source of glue driven by the engine.
pub trait Backend {
    /// State threaded through every step and hook.
    type World;

    /// Load failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Register every step, hook and parameter type.
    ///
    /// `glue_paths` are the `--glue` option values.
    ///
    /// # Errors
    /// Returns the first definition that cannot be registered.
    fn load_glue(
        &mut self,
        registrar: &mut dyn GlueRegistrar<Self::World>,
        glue_paths: &[String],
    ) -> Result<(), Self::Error>;

    /// Called before each scenario.
    fn build_world(&mut self, world: &mut Self::World);

    /// Called after each scenario.
    fn dispose_world(&mut self, world: &mut Self::World);

    /// Suggestion text for undefined steps.
    fn snippet(&self) -> &dyn Snippet;
}
