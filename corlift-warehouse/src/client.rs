//! Query Client Capability
//!
//! The warehouse backend is a capability the caller hands in, not ambient
//! state: whoever needs a dataset receives a `QueryClient` and decides what
//! answers the SQL — a BigQuery driver, a recorded fixture, or an in-memory
//! fake in tests.

use std::collections::BTreeMap;
use thiserror::Error;

/// A single result cell. `Null` is distinct from every concrete value and
/// maps to `None` through the optional getters — never to zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// SQL NULL
    Null,
    /// Boolean column
    Bool(bool),
    /// 64-bit integer column
    Int(i64),
    /// Double-precision column
    Float(f64),
    /// String column
    Text(String),
}

impl Cell {
    fn type_name(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Bool(_) => "bool",
            Cell::Int(_) => "int",
            Cell::Float(_) => "float",
            Cell::Text(_) => "text",
        }
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Null, Cell::Float)
    }
}

/// One result row: column name to cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<String, Cell>,
}

impl Row {
    /// Empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used when assembling rows from a backend or a
    /// test fixture.
    pub fn set(mut self, column: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.cells.insert(column.into(), cell.into());
        self
    }

    fn cell(&self, column: &str) -> Result<&Cell, WarehouseError> {
        self.cells
            .get(column)
            .ok_or_else(|| WarehouseError::MissingColumn(column.to_string()))
    }

    fn mismatch(column: &str, expected: &'static str, got: &Cell) -> WarehouseError {
        WarehouseError::TypeMismatch {
            column: column.to_string(),
            expected,
            got: got.type_name(),
        }
    }

    /// String value of a non-null column.
    pub fn text(&self, column: &str) -> Result<&str, WarehouseError> {
        match self.cell(column)? {
            Cell::Text(s) => Ok(s),
            other => Err(Self::mismatch(column, "text", other)),
        }
    }

    /// Boolean value of a non-null column.
    pub fn bool(&self, column: &str) -> Result<bool, WarehouseError> {
        match self.cell(column)? {
            Cell::Bool(b) => Ok(*b),
            other => Err(Self::mismatch(column, "bool", other)),
        }
    }

    /// Integer value of a non-null column.
    pub fn int(&self, column: &str) -> Result<i64, WarehouseError> {
        match self.cell(column)? {
            Cell::Int(i) => Ok(*i),
            other => Err(Self::mismatch(column, "int", other)),
        }
    }

    /// Float value of a non-null column. Integer cells widen to `f64`.
    pub fn float(&self, column: &str) -> Result<f64, WarehouseError> {
        match self.cell(column)? {
            Cell::Float(f) => Ok(*f),
            Cell::Int(i) => Ok(*i as f64),
            other => Err(Self::mismatch(column, "float", other)),
        }
    }

    /// Float value of a nullable column; NULL becomes `None`.
    pub fn float_opt(&self, column: &str) -> Result<Option<f64>, WarehouseError> {
        match self.cell(column)? {
            Cell::Null => Ok(None),
            Cell::Float(f) => Ok(Some(*f)),
            Cell::Int(i) => Ok(Some(*i as f64)),
            other => Err(Self::mismatch(column, "float", other)),
        }
    }

    /// Calendar date parsed from a `YYYY-MM-DD` text column.
    pub fn date(&self, column: &str) -> Result<chrono::NaiveDate, WarehouseError> {
        let text = self.text(column)?;
        chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
            WarehouseError::InvalidDate {
                column: column.to_string(),
                value: text.to_string(),
            }
        })
    }
}

/// Capability to execute one analytical query and return its result rows.
///
/// Implementations own connection details, authentication, and retries; the
/// rest of the crate treats them as a pure `sql -> rows` function.
pub trait QueryClient {
    /// Run the SQL and return all result rows.
    fn run_query(&self, sql: &str) -> Result<Vec<Row>, WarehouseError>;
}

/// Errors from warehouse access and row mapping
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// The backend failed to execute the query
    #[error("query client error: {0}")]
    Client(String),

    /// A required column is absent from a result row
    #[error("result row is missing column {0:?}")]
    MissingColumn(String),

    /// A column holds a different type than the mapping expects
    #[error("column {column:?} has unexpected type: expected {expected}, got {got}")]
    TypeMismatch {
        /// Column name
        column: String,
        /// Type the mapping asked for
        expected: &'static str,
        /// Type the cell actually holds
        got: &'static str,
    },

    /// A date column failed to parse
    #[error("column {column:?} does not contain a YYYY-MM-DD date: {value:?}")]
    InvalidDate {
        /// Column name
        column: String,
        /// Offending text
        value: String,
    },

    /// A query expected to return rows returned none
    #[error("query returned no rows for experiment {0:?}")]
    EmptyResult(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        Row::new()
            .set("name", "holiday_banner")
            .set("users", 120_i64)
            .set("gms", 450.75)
            .set("is_filtered", true)
            .set("chargebacks", Cell::Null)
            .set("start_date", "2024-03-01")
    }

    #[test]
    fn test_typed_getters() {
        let row = sample_row();
        assert_eq!(row.text("name").unwrap(), "holiday_banner");
        assert_eq!(row.int("users").unwrap(), 120);
        assert!((row.float("gms").unwrap() - 450.75).abs() < f64::EPSILON);
        assert!(row.bool("is_filtered").unwrap());
    }

    #[test]
    fn test_int_widens_to_float() {
        let row = sample_row();
        assert!((row.float("users").unwrap() - 120.0).abs() < f64::EPSILON);
        assert_eq!(row.float_opt("users").unwrap(), Some(120.0));
    }

    #[test]
    fn test_null_maps_to_none_not_zero() {
        let row = sample_row();
        assert_eq!(row.float_opt("chargebacks").unwrap(), None);
        // The non-optional getter refuses NULL outright.
        assert!(matches!(
            row.float("chargebacks"),
            Err(WarehouseError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let row = sample_row();
        assert!(matches!(
            row.text("no_such_column"),
            Err(WarehouseError::MissingColumn(ref c)) if c == "no_such_column"
        ));
    }

    #[test]
    fn test_type_mismatch_names_the_column() {
        let row = sample_row();
        let err = row.int("name").unwrap_err();
        match err {
            WarehouseError::TypeMismatch {
                column,
                expected,
                got,
            } => {
                assert_eq!(column, "name");
                assert_eq!(expected, "int");
                assert_eq!(got, "text");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_date_parsing() {
        let row = sample_row();
        let date = row.date("start_date").unwrap();
        assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_invalid_date() {
        let row = Row::new().set("start_date", "03/01/2024");
        assert!(matches!(
            row.date("start_date"),
            Err(WarehouseError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_optional_cell_conversion() {
        assert_eq!(Cell::from(None::<f64>), Cell::Null);
        assert_eq!(Cell::from(Some(2.5)), Cell::Float(2.5));
    }
}
