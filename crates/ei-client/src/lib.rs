//! ei-client: blocking HTTP access to the energyinsight backend and the EIA API.

pub mod api;
pub mod config;
pub mod eia;
pub mod session;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use eia::EiaClient;
pub use session::SessionStore;

use std::path::PathBuf;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Session storage error: {path}")]
    Session {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("EIA API key is not configured (set EIA_API_KEY)")]
    MissingApiKey,
}
