// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Neither a file nor a URL was supplied
    InputMissing,
    /// Input was supplied but cannot be submitted (bad URL scheme, unsupported file type)
    InvalidInput(String),
    /// Provider response has no recognizable clip collection
    MalformedPayload(String),
    /// Every record failed normalization
    EmptyResult,
    /// Transport or status failure reaching the analysis provider
    ProviderRequest {
        status: Option<u16>,
        message: String,
        retryable: bool,
    },
    /// The media handle rejected a play request
    PlaybackStart(String),
    /// Configuration value missing or unparsable
    Config(String),
    /// Local media registration failure
    MediaUnavailable(String),
    /// Internal error
    Internal(String),
}

impl DomainError {
    /// Message suitable for showing to the user as the single failure line
    pub fn user_message(&self) -> String {
        match self {
            DomainError::InputMissing => {
                "Please provide a file or a URL for analysis.".to_string()
            }
            DomainError::EmptyResult => "No highlights detected.".to_string(),
            DomainError::ProviderRequest {
                status: Some(code),
                message,
                ..
            } => format!("The analysis service responded with status {}: {}", code, message),
            DomainError::ProviderRequest { message, .. } => {
                format!("Could not reach the analysis service: {}", message)
            }
            other => other.to_string(),
        }
    }

    /// Whether a retry of the same submission could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::ProviderRequest { retryable: true, .. })
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InputMissing => write!(f, "Input missing: neither a file nor a URL was provided"),
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::MalformedPayload(msg) => write!(f, "Malformed payload: {}", msg),
            DomainError::EmptyResult => write!(f, "Analysis did not produce any usable clips"),
            DomainError::ProviderRequest {
                status: Some(code),
                message,
                ..
            } => write!(f, "Provider request failed with status {}: {}", code, message),
            DomainError::ProviderRequest { message, .. } => {
                write!(f, "Provider request failed: {}", message)
            }
            DomainError::PlaybackStart(msg) => write!(f, "Playback could not start: {}", msg),
            DomainError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::MediaUnavailable(msg) => write!(f, "Media unavailable: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
