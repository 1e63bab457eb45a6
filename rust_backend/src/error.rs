//! Error types for timesheet operations.
//!
//! Every error here is local and recoverable. Soft outcomes such as an empty
//! selection or a slot without a default code are not errors; they are
//! reported through [`crate::services::EditOutcome`] instead.

/// Result type for timesheet operations
pub type TimesheetResult<T> = Result<T, TimesheetError>;

/// Error type for timesheet operations
#[derive(Debug, thiserror::Error)]
pub enum TimesheetError {
    #[error("Billing code not found: {0}")]
    NotFound(String),

    #[error("Invalid billing code: {0}")]
    InvalidCode(String),

    #[error("Invalid slot geometry: {0}")]
    InvalidGeometry(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Export failed: {0}")]
    ExportError(String),
}

impl TimesheetError {
    /// Returns `true` when the error should be shown to the user as a warning
    /// rather than treated as a failure of the session.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            TimesheetError::NotFound(_)
                | TimesheetError::ValidationError(_)
                | TimesheetError::ExportError(_)
        )
    }
}

impl From<std::io::Error> for TimesheetError {
    fn from(e: std::io::Error) -> Self {
        TimesheetError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for TimesheetError {
    fn from(e: serde_json::Error) -> Self {
        TimesheetError::SerializationError(e.to_string())
    }
}
