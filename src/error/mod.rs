//! Error handling module for highlight-reel

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for highlight-reel operations
#[derive(Error, Debug)]
pub enum ReelError {
    /// Domain rule or provider failure
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Payload file could not be read
    #[error("Failed to read payload {path}: {message}")]
    PayloadRead { path: String, message: String },

    /// Output rendering failed
    #[error("Failed to render output: {message}")]
    OutputError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Config file parse error
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl ReelError {
    /// Message suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self {
            ReelError::Domain(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for highlight-reel operations
pub type ReelResult<T> = std::result::Result<T, ReelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_user_message() {
        let err = ReelError::from(DomainError::EmptyResult);
        assert_eq!(err.user_message(), "No highlights detected.");
    }

    #[test]
    fn test_json_errors_convert() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ReelError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
