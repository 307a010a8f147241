//! Structured error types for curtain
//!
//! Registry-level irregularities (unknown ids, duplicate opens) are not
//! errors at all. What remains is setup trouble and confirm actions that
//! never reached a result.

use std::path::PathBuf;
use thiserror::Error;

/// All possible errors in curtain
#[derive(Error, Debug)]
pub enum CurtainError {
    /// Terminal setup or restoration error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Config file exists but could not be read
    #[error("Failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid TOML for our schema
    #[error("Failed to parse config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A pending confirm action panicked before settling
    #[error("Confirm action panicked")]
    ConfirmPanicked,

    /// A confirm action returned a future but no tokio runtime is running
    #[error("No async runtime available to run the confirm action")]
    NoRuntime,
}

/// Convenience Result type using CurtainError
pub type Result<T> = std::result::Result<T, CurtainError>;
