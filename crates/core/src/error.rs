use thiserror::Error;

/// Top-level failure that aborts the whole run.
#[derive(Error, Debug)]
pub enum LogfeedError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Schema declaration failed: {0}")]
    Schema(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Malformed record on line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: RecordError,
    },
}

/// A line that cannot be read as a log record at all: not a JSON object, or
/// an object without one of the coerced fields.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("missing field '{0}'")]
    MissingField(&'static str),
}

/// A field value that cannot be converted to its schema type. The record is
/// dropped; the run continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("time data '{value}' does not match format '%d/%b/%Y:%H:%M:%S %z': {reason}")]
    InvalidTime { value: String, reason: String },

    #[error("invalid literal for integer field '{field}': {value}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("value {value} out of range for field '{field}'")]
    OutOfRange { field: &'static str, value: String },
}
