//! Error types for the ei-app service layer.

use std::path::PathBuf;

use ei_core::validate::ValidationErrors;

/// Unified error for CLI and GUI callers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("{message}")]
    Backend { message: String },

    #[error("Failed to fetch report details")]
    ReportDetails,

    #[error("Invalid data: {0}")]
    Data(String),

    #[error("Failed to write export file: {path}")]
    ExportWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for ei-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ei_client::ClientError> for AppError {
    fn from(err: ei_client::ClientError) -> Self {
        AppError::Backend {
            message: err.to_string(),
        }
    }
}

impl From<ei_core::CoreError> for AppError {
    fn from(err: ei_core::CoreError) -> Self {
        AppError::Data(err.to_string())
    }
}
