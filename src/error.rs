//! Error types for the ERD crate
//!
//! The layout core is total and never fails. Errors only come from the
//! edges of the crate: fetching a graph, parsing a payload, reading config,
//! and writing SVG.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ErdError>;

/// Main error type for the ERD crate
#[derive(Error, Debug)]
pub enum ErdError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Schema graph endpoint returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid ERD payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid config file: {0}")]
    ConfigFormat(#[from] serde_yaml::Error),

    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),
}

impl ErdError {
    /// Build a config error from anything displayable
    pub fn config(message: impl Into<String>) -> Self {
        ErdError::Config(message.into())
    }
}
