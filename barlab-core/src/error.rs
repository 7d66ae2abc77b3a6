//! Library error type.
//!
//! Only structural problems are errors. Numeric edge cases (zero true range,
//! zero directional movement, too little history) never surface here; they
//! produce NaN cells instead.

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, IndicatorError>;

#[derive(Debug, thiserror::Error)]
pub enum IndicatorError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column {column} has type {actual}, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("column {column} has {actual} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("timestamps must be strictly increasing (violated at row {row})")]
    UnorderedIndex { row: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("dataframe conversion failed: {0}")]
    DataFrame(String),
}
