use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Error type covering the different failure cases that can occur when the
/// generator ingests, derives, or renders data. Every variant aborts the run;
/// nothing is retried.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for IO failures such as creating folders or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a named column is absent from a dataset.
    #[error("dataset {dataset} is missing column '{column}'")]
    MissingColumn { dataset: String, column: String },

    /// Raised when numeric coercion fails while reading a typed column.
    #[error("invalid numeric value '{value}' in column {column}")]
    InvalidNumeric { column: String, value: String },

    /// Raised when a launch date cannot be interpreted.
    #[error("invalid date value '{value}' in column {column}")]
    InvalidDate { column: String, value: String },

    /// Raised when a derived column does not line up with the frame rows.
    #[error("frame shape mismatch: {0}")]
    Shape(String),

    /// Raised when the revenue trend cannot be fitted.
    #[error("forecast regression failed: {0}")]
    Regression(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
