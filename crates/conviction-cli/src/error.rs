//! Error types for the conviction CLI.

use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or reporting a scenario.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Report formatting error
    #[error("Format error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Parameters or events rejected by the engine
    #[error("Engine error: {0}")]
    Engine(#[from] conviction_engine::Error),

    /// An environment variable could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    /// Bad command line
    #[error("Usage error: {0}")]
    Usage(String),
}
