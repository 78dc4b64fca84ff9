// ⚠️ Error taxonomy
// Input-validation failures surfaced at the loading / scoring boundary

use thiserror::Error;

/// Errors raised while loading transactions or computing the segmentation.
#[derive(Debug, Error)]
pub enum RfmError {
    /// `orderDate` could not be parsed as a day-first calendar date
    #[error("malformed orderDate {value:?} on line {line}")]
    MalformedDate { line: usize, value: String },

    /// `orderValue` is blank or not a number
    #[error("malformed orderValue {value:?} on line {line}")]
    MalformedValue { line: usize, value: String },

    /// Zero transactions: the snapshot date is undefined
    #[error("no transactions to analyse")]
    EmptyInput,

    /// Class string is not exactly three digits in 1..=4
    #[error("invalid RFM class code {0:?}")]
    InvalidClassCode(String),

    #[error("missing required column {0:?}")]
    MissingColumn(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RfmError>;
