//! Error types for the voice translator

use thiserror::Error;

use crate::config::ConfigLoadError;

/// Result type alias for translator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while translating speech
#[derive(Debug, Error)]
pub enum Error {
    /// Settings file could not be loaded
    #[error(transparent)]
    ConfigLoad(#[from] ConfigLoadError),

    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device or codec error
    #[error("audio error: {0}")]
    Audio(String),

    /// Text translation error
    #[error("translation error: {0}")]
    Translation(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Cloud endpoint answered with a non-success status
    #[error("{service} API error {status}: {body}")]
    Api {
        /// Which endpoint failed ("STT", "Translator", "TTS")
        service: &'static str,
        /// HTTP status returned
        status: reqwest::StatusCode,
        /// Response body, if any
        body: String,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
