use fieldguard_core::ConfigError;
use thiserror::Error;

/// Problems reading sync settings from the environment.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Errors that stop a push before any request is sent.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Env(#[from] EnvError),
    #[error("schema is inconsistent: {0}")]
    Schema(#[from] ConfigError),
    #[error("API token is not a valid header value")]
    InvalidToken,
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
