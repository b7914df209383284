//! Error types for Bicast

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BicastError>;

#[derive(Error, Debug)]
pub enum BicastError {
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl BicastError {
    /// Returns the appropriate exit code for this error
    ///
    /// Only fatal errors reach the exit path: publisher failures are caught
    /// and logged by the broadcaster and never terminate the process.
    pub fn exit_code(&self) -> i32 {
        match self {
            BicastError::InvalidInput(_) => 3,
            BicastError::Platform(PlatformError::Authentication(_)) => 2,
            BicastError::Platform(_) => 1,
            BicastError::Credential(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Encrypted credentials file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to run decryption tool '{tool}': {message}")]
    Decrypt { tool: String, message: String },

    #[error("Failed to read credentials file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse credentials file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required path: {0}")]
    MissingPath(String),
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
}
