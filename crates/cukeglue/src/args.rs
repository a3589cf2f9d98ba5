//! Converted arguments handed to step functions.

use std::any::Any;

use cukeglue_host::{DataTable, Value};
use thiserror::Error;

/// Errors raised when a step function reads its arguments.
///
/// Each one fails the step like any other error the step returns.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// The step asked for an argument past the end.
    #[error("argument {index} requested but the step received {len}")]
    Missing {
        /// Requested position.
        index: usize,
        /// Number of arguments received.
        len: usize,
    },

    /// The argument holds another kind of value.
    #[error("argument {index} is {found}, not {expected}")]
    TypeMismatch {
        /// Requested position.
        index: usize,
        /// Kind the step asked for.
        expected: &'static str,
        /// Kind actually held.
        found: &'static str,
    },

    /// A text capture arrived where a table or doc string was declared, or
    /// the reverse.
    #[error("argument {index} should be {expected}")]
    UnexpectedRawArgument {
        /// Position of the argument.
        index: usize,
        /// Kind the descriptor declared.
        expected: &'static str,
    },

    /// The engine supplied a different number of arguments than declared.
    #[error("step declares {expected} arguments but received {found}")]
    Count {
        /// Declared argument count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
    },
}

/// Ordered argument values: captures first, then any table, then any doc
/// string.
#[derive(Debug, Clone, Default)]
pub struct Arguments(Vec<Value>);

impl Arguments {
    /// Wrap already converted values.
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Argument at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// All arguments in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    fn value(&self, index: usize) -> Result<&Value, ArgumentError> {
        self.0.get(index).ok_or(ArgumentError::Missing {
            index,
            len: self.0.len(),
        })
    }

    fn typed<'a, T>(
        &'a self,
        index: usize,
        expected: &'static str,
        read: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, ArgumentError> {
        let value = self.value(index)?;
        read(value).ok_or(ArgumentError::TypeMismatch {
            index,
            expected,
            found: value.kind(),
        })
    }

    /// Integer at `index`.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] when the argument is missing or not an
    /// integer.
    pub fn integer(&self, index: usize) -> Result<i64, ArgumentError> {
        self.typed(index, "integer", Value::as_integer)
    }

    /// Float at `index`.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] when the argument is missing or not a float.
    pub fn float(&self, index: usize) -> Result<f64, ArgumentError> {
        self.typed(index, "float", Value::as_float)
    }

    /// Text at `index`.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] when the argument is missing or not text.
    pub fn text(&self, index: usize) -> Result<&str, ArgumentError> {
        self.typed(index, "text", Value::as_text)
    }

    /// Text at `index`, or `None` when its optional group did not match.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] when the argument is missing or neither text
    /// nor absent.
    pub fn optional_text(&self, index: usize) -> Result<Option<&str>, ArgumentError> {
        self.typed(index, "text", |value| match value {
            Value::Absent => Some(None),
            other => other.as_text().map(Some),
        })
    }

    /// Symbol name at `index`, without its colon.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] when the argument is missing or not a
    /// symbol.
    pub fn symbol(&self, index: usize) -> Result<&str, ArgumentError> {
        self.typed(index, "symbol", Value::as_symbol)
    }

    /// Data table at `index`.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] when the argument is missing or not a table.
    pub fn table(&self, index: usize) -> Result<&DataTable, ArgumentError> {
        self.typed(index, "data table", Value::as_table)
    }

    /// Doc string at `index`.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] when the argument is missing or not a doc
    /// string.
    pub fn doc_string(&self, index: usize) -> Result<&str, ArgumentError> {
        self.typed(index, "doc string", Value::as_doc_string)
    }

    /// Custom value of type `T` at `index`.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] when the argument is missing or holds
    /// another type.
    pub fn custom<T: Any>(&self, index: usize) -> Result<&T, ArgumentError> {
        self.typed(index, std::any::type_name::<T>(), Value::downcast_ref::<T>)
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
