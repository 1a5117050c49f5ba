//! Custom error types for the sweeper pipeline.
//!
//! Every stage returns [`SweepError`] so the caller (CLI or any UI shell) can
//! report a single, user-visible message. Errors are serializable as
//! `{code, message}` for callers that forward them over IPC.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the sweeper pipeline.
#[derive(Error, Debug)]
pub enum SweepError {
    /// Uploaded file extension is not a recognized table format.
    #[error("Unsupported file format for '{file}': '{extension}' (expected .csv or a spreadsheet)")]
    UnsupportedFormat { file: String, extension: String },

    /// An uploaded file could not be decoded by its codec.
    #[error("Failed to decode '{file}': {reason}")]
    DecodeFailed { file: String, reason: String },

    /// Ingestion was invoked with an empty batch.
    #[error("No files were provided")]
    NoFiles,

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    UnknownColumn(String),

    /// A column was requested more than once in a projection.
    #[error("Column '{0}' selected more than once")]
    DuplicateColumn(String),

    /// Column exists but is not numeric where a numeric column is required.
    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// The table has no rows or columns where data is required.
    #[error("Table is empty")]
    EmptyTable,

    /// Serialization failure for the chosen export codec.
    #[error("Failed to export as {format}: {reason}")]
    ExportError { format: String, reason: String },

    /// A statistic needed by scaling or imputation is undefined.
    #[error("Undefined {statistic} for column '{column}'")]
    UndefinedStatistic { column: String, statistic: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SweepError>,
    },
}

impl SweepError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SweepError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::DecodeFailed { .. } => "DECODE_FAILED",
            Self::NoFiles => "NO_FILES",
            Self::UnknownColumn(_) => "UNKNOWN_COLUMN",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::NonNumericColumn(_) => "NON_NUMERIC_COLUMN",
            Self::EmptyTable => "EMPTY_TABLE",
            Self::ExportError { .. } => "EXPORT_ERROR",
            Self::UndefinedStatistic { .. } => "UNDEFINED_STATISTIC",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the caller's input rather than the data.
    ///
    /// Input errors can be fixed by changing the request (another file, another
    /// column) without touching the table.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::UnsupportedFormat { .. }
            | Self::NoFiles
            | Self::UnknownColumn(_)
            | Self::DuplicateColumn(_)
            | Self::NonNumericColumn(_)
            | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for SweepError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SweepError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for sweeper operations.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SweepError::Polars(e).with_context(context))
    }
}
