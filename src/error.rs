//! Error types shared by the fetch, transform and render stages.

use thiserror::Error;

/// Result alias for neo-viz operations
pub type Result<T> = std::result::Result<T, NeoError>;

/// Everything that can go wrong between the API and the drawn scene.
#[derive(Debug, Error)]
pub enum NeoError {
    /// Request failed, timed out, or came back with a non-success status
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not have the expected `{fields, data}` shape
    #[error("decode error: {0}")]
    Decode(String),

    /// Orbit lane digit or calendar date text could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration file or CLI override was invalid
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The interactive window could not be created
    #[error("window error: {0}")]
    Window(String),
}

impl From<reqwest::Error> for NeoError {
    fn from(e: reqwest::Error) -> Self {
        NeoError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for NeoError {
    fn from(e: serde_json::Error) -> Self {
        NeoError::Decode(e.to_string())
    }
}

impl NeoError {
    /// Short label for the failing stage, used in the window's error panel.
    pub fn phase(&self) -> &'static str {
        match self {
            NeoError::Network(_) => "fetch",
            NeoError::Decode(_) => "decode",
            NeoError::Parse(_) => "parse",
            NeoError::Config(_) => "config",
            NeoError::Io(_) => "io",
            NeoError::Window(_) => "window",
        }
    }
}
