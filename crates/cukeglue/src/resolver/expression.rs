//! Resolution of expression-text placeholders.

use cukeglue_host::{HostError, TypeRegistry};
use cukeglue_patterns::expression_placeholders;

use super::{Converter, ResolvedParameter};
use crate::error::GlueError;
use crate::glue::SourceLocation;

/// One parameter per `{name}` placeholder, in document order.
pub(super) fn resolve(
    pattern: &str,
    registry: &dyn TypeRegistry,
    location: &SourceLocation,
) -> Result<Vec<ResolvedParameter>, GlueError> {
    expression_placeholders(pattern)
        .map_err(HostError::from)?
        .into_iter()
        .map(|placeholder| -> Result<ResolvedParameter, GlueError> {
            let parameter_type = registry
                .lookup_by_syntax_token(&placeholder.name)
                .ok_or_else(|| GlueError::UndefinedParameterType {
                    name: placeholder.name.clone(),
                    pattern: pattern.to_string(),
                    location: location.clone(),
                })?;
            Ok(ResolvedParameter::capture(
                parameter_type.target_type().clone(),
                Converter::Transform(parameter_type.transformer()),
            ))
        })
        .collect()
}
