//! Parameter descriptors and converters for a compiled step pattern.
//!
//! Each step's arguments are described twice: as [`ParameterDescriptor`]s for
//! the host, which checks arity and builds snippets, and as [`Converter`]s
//! the step unit applies to the raw arguments before calling the step
//! function. Expression text resolves through its `{name}` placeholders;
//! a raw regular expression resolves by matching each top-level capture
//! group's source against the registered regex alternatives.

mod expression;
mod opaque;

use cukeglue_host::{
    ParameterDescriptor, RawArgument, StepError, StepExpression, TargetType, Transform,
    TypeRegistry, Value,
};

use crate::args::ArgumentError;
use crate::error::GlueError;
use crate::glue::{SourceLocation, StepArgumentFlags};

/// Which resolver a compiled pattern needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Expression text; placeholders name their types.
    ExpressionText,
    /// Raw regex; types are inferred from capture-group sources.
    OpaquePattern,
}

impl Dialect {
    /// Dialect of a compiled expression.
    #[must_use]
    pub const fn of(expression: &StepExpression) -> Self {
        match expression {
            StepExpression::Cucumber(_) => Self::ExpressionText,
            StepExpression::Regular(_) => Self::OpaquePattern,
        }
    }
}

/// Turns one raw argument into a [`Value`].
#[derive(Clone)]
pub enum Converter {
    /// Apply a parameter type's transform to captured text.
    Transform(Transform),
    /// Pass captured text through unchanged.
    PlainText,
    /// Pass the step's data table, optionally transposed.
    Table {
        /// Whether rows and columns are swapped first.
        transposed: bool,
    },
    /// Pass the step's doc string.
    DocString,
}

impl Converter {
    /// Convert the raw argument at `index`.
    ///
    /// Captures from optional groups that did not participate become
    /// [`Value::Absent`] without reaching the transform.
    ///
    /// # Errors
    /// Returns the transform's error, or [`ArgumentError::UnexpectedRawArgument`]
    /// when the raw argument is not the kind this converter expects.
    pub fn convert(&self, index: usize, raw: RawArgument) -> Result<Value, StepError> {
        match (self, raw) {
            (Self::Transform(_) | Self::PlainText, RawArgument::Text(None)) => Ok(Value::Absent),
            (Self::Transform(transform), RawArgument::Text(Some(text))) => transform(&text),
            (Self::PlainText, RawArgument::Text(Some(text))) => Ok(Value::Text(text)),
            (Self::Table { transposed }, RawArgument::Table(table)) => Ok(Value::Table(
                if *transposed { table.transpose() } else { table },
            )),
            (Self::DocString, RawArgument::DocString(text)) => Ok(Value::DocString(text)),
            (converter, _) => Err(Box::new(ArgumentError::UnexpectedRawArgument {
                index,
                expected: converter.expects(),
            })),
        }
    }

    const fn expects(&self) -> &'static str {
        match self {
            Self::Transform(_) | Self::PlainText => "captured text",
            Self::Table { .. } => "a data table",
            Self::DocString => "a doc string",
        }
    }
}

/// Descriptor and converter for one argument position.
#[derive(Clone)]
pub struct ResolvedParameter {
    /// What the host is told about the argument.
    pub descriptor: ParameterDescriptor,
    /// How the unit converts it.
    pub converter: Converter,
}

impl ResolvedParameter {
    fn capture(target_type: TargetType, converter: Converter) -> Self {
        Self {
            descriptor: ParameterDescriptor::new(target_type, false),
            converter,
        }
    }
}

/// Resolve every argument of a compiled step pattern.
///
/// Captures come first in pattern order, then the table and then the doc
/// string when `flags` asks for them.
///
/// # Errors
/// Returns [`GlueError::UndefinedParameterType`] for an expression placeholder
/// no registered type answers to, and the registry's error when a raw capture
/// group is ambiguous between several types.
pub fn resolve(
    expression: &StepExpression,
    registry: &dyn TypeRegistry,
    flags: StepArgumentFlags,
    location: &SourceLocation,
) -> Result<Vec<ResolvedParameter>, GlueError> {
    let mut parameters = match Dialect::of(expression) {
        Dialect::ExpressionText => expression::resolve(expression.source(), registry, location)?,
        Dialect::OpaquePattern => opaque::resolve(expression, registry)?,
    };
    if flags.consumes_table {
        parameters.push(ResolvedParameter {
            descriptor: ParameterDescriptor::new(TargetType::DataTable, flags.transpose_table),
            converter: Converter::Table {
                transposed: flags.transpose_table,
            },
        });
    }
    if flags.consumes_doc_string {
        parameters.push(ResolvedParameter {
            descriptor: ParameterDescriptor::new(TargetType::DocString, false),
            converter: Converter::DocString,
        });
    }
    Ok(parameters)
}
