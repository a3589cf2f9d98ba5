//! Typed values handed to step functions.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Rectangular table attached to a gherkin step.
///
/// # Examples
/// ```
/// use cukeglue_host::DataTable;
///
/// let table = DataTable::new(vec![
///     vec!["name".into(), "age".into()],
///     vec!["Ada".into(), "36".into()],
/// ]);
/// assert_eq!(table.cell(1, 0), Some("Ada"));
/// assert_eq!(table.transpose().cell(0, 1), Some("Ada"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Wrap parsed rows.
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// All rows, header row included.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at `row`, `column`, if present.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Swap rows and columns. Ragged rows are padded with empty cells.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let rows = (0..self.width())
            .map(|column| {
                (0..self.height())
                    .map(|row| self.cell(row, column).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Rows after the first, each zipped with the header row.
    #[must_use]
    pub fn as_maps(&self) -> Vec<Vec<(&str, &str)>> {
        let Some((header, body)) = self.rows.split_first() else {
            return Vec::new();
        };
        body.iter()
            .map(|row| {
                header
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect()
    }
}

/// A converted step argument.
#[derive(Clone)]
pub enum Value {
    /// An optional capture group that did not participate in the match.
    Absent,
    /// Plain text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// `:name` token with the colon removed.
    Symbol(String),
    /// Step data table.
    Table(DataTable),
    /// Step doc string.
    DocString(String),
    /// Value produced by a custom parameter type.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap an arbitrary value from a custom transform.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Short label naming the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Symbol(_) => "symbol",
            Self::Table(_) => "data table",
            Self::DocString(_) => "doc string",
            Self::Custom(_) => "custom",
        }
    }

    /// Text content of `Text` values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Content of `Integer` values.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Content of `Float` values.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Name of `Symbol` values.
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Content of `Table` values.
    #[must_use]
    pub const fn as_table(&self) -> Option<&DataTable> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Content of `DocString` values.
    #[must_use]
    pub fn as_doc_string(&self) -> Option<&str> {
        match self {
            Self::DocString(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow a custom value as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Self::Symbol(name) => f.debug_tuple("Symbol").field(name).finish(),
            Self::Table(table) => f.debug_tuple("Table").field(table).finish(),
            Self::DocString(text) => f.debug_tuple("DocString").field(text).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> DataTable {
        DataTable::new(
            rows.iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        )
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let original = table(&[&["a", "b", "c"], &["1", "2", "3"]]);
        assert_eq!(
            original.transpose(),
            table(&[&["a", "1"], &["b", "2"], &["c", "3"]])
        );
    }

    #[test]
    fn transpose_pads_ragged_rows() {
        let original = table(&[&["a", "b"], &["1"]]);
        assert_eq!(original.transpose(), table(&[&["a", "1"], &["b", ""]]));
    }

    #[test]
    fn maps_rows_against_header() {
        let original = table(&[&["name", "age"], &["Ada", "36"]]);
        assert_eq!(original.as_maps(), vec![vec![("name", "Ada"), ("age", "36")]]);
    }

    #[test]
    fn custom_values_downcast_to_their_type() {
        #[derive(Debug, PartialEq)]
        struct Colour(&'static str);

        let value = Value::custom(Colour("red"));
        assert_eq!(value.downcast_ref::<Colour>(), Some(&Colour("red")));
        assert!(value.downcast_ref::<String>().is_none());
        assert_eq!(value.kind(), "custom");
    }

    #[test]
    fn accessors_reject_other_variants() {
        let value = Value::Integer(42);
        assert_eq!(value.as_integer(), Some(42));
        assert!(value.as_text().is_none());
        assert!(value.as_float().is_none());
    }
}
