use thiserror::Error;

/// Errors originating from the numeric kernel.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid resolution {input:?}: expected \"<width> by <height>\" with both > 0")]
    InvalidResolutionFormat { input: String },

    #[error("invalid {field}: {value:?} is not a finite decimal number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid extent: {reason}")]
    InvalidExtent { reason: String },

    #[error("invalid reference field: {reason}")]
    InvalidReference { reason: String },

    #[error("computation cancelled")]
    Cancelled,
}
