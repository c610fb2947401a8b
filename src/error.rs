//! The [`PhenoSplitError`] `enum` definition and error messages.
//!
use std::num::ParseFloatError;
use thiserror::Error;

/// The [`PhenoSplitError`] defines the standard set of errors that should
/// be passed to the user.
#[derive(Debug, Error)]
pub enum PhenoSplitError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Delimited file error: {0}")]
    CsvError(#[from] csv::Error),

    // File parsing related errors
    #[error("Float parsing error: {0}")]
    ParseFloatError(#[from] ParseFloatError),
    #[error("Row {row} has {found} cells but the header has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Column '{column}' has non-numeric value '{value}' for line '{label}'")]
    InvalidValue {
        column: String,
        label: String,
        value: String,
    },
    #[error("Input files disagree on the row label column: '{0}' vs '{1}'")]
    MismatchedRowLabel(String, String),
    #[error("Column '{column}' has {found} values but the table has {expected} rows")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Column '{0}' appears more than once in the header")]
    DuplicateColumn(String),
    #[error("Location file is invalid: {0}")]
    InvalidLocationFile(String),

    // Identifier parsing errors
    #[error("Unable to convert '{0}' to a location-year pair")]
    ParseError(String),

    // Partitioning errors
    #[error("No data: the table needs a row label column, at least one trait column and one row")]
    NoData,
    #[error("Found {filenames} distinct filenames but {identifiers} distinct identifiers (offending column: '{column}')")]
    MismatchedIdentifierCount {
        filenames: usize,
        identifiers: usize,
        column: String,
    },
    #[error("Column '{column}' would be written to the unsafe filename '{stem}.csv'")]
    UnsafeFilename { column: String, stem: String },

    // Output errors
    #[error("Output path '{0}' exists and is not a directory")]
    OutputPathNotDirectory(String),
    #[error("Output file '{0}' exists and is not a regular file")]
    OutputTargetNotFile(String),

    // Command line tool related errors
    #[error("Command line argument error: {0}")]
    ArgumentError(#[from] clap::error::Error),
}
