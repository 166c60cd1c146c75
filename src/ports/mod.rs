// Ports - Interface definitions (contracts)

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the external highlight analysis service
#[async_trait]
pub trait AnalysisPort: Send + Sync {
    /// Submit a video and return the provider's raw payload
    async fn submit(&self, request: &AnalyzeRequest) -> Result<Value, DomainError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Port for temporary local media references
#[async_trait]
pub trait MediaStorePort: Send + Sync {
    /// Create a playable reference to a local file
    async fn register(&self, path: &Path) -> Result<MediaRef, DomainError>;

    /// Release a reference; revoking an unknown reference is a no-op
    async fn revoke(&self, media: &MediaRef);

    /// Number of references currently alive
    async fn live(&self) -> usize;
}

/// Event reported by a media handle while it plays
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Playback position advanced to the given second
    TimeUpdate(f64),
    /// Natural end of the media was reached
    Ended,
    /// Playback was paused by something other than the controller
    Paused,
}

/// Port for a playable media element
///
/// Methods take `&self`; implementations use interior mutability so a single
/// handle can be shared between the controller and whatever drives its clock.
#[async_trait]
pub trait MediaHandle: Send + Sync {
    /// False once the element has been disposed
    fn is_attached(&self) -> bool;

    /// Currently bound source locator
    fn source(&self) -> Option<String>;

    /// Bind a new source locator
    fn set_source(&self, src: &str);

    /// Reload the bound source from the beginning
    fn load(&self);

    fn pause(&self);

    fn is_paused(&self) -> bool;

    fn current_time(&self) -> f64;

    /// Move the playback position
    fn seek(&self, seconds: f64);

    /// Known duration of the bound source
    fn duration(&self) -> Option<f64>;

    /// Whether the transport honors `#t=start,end` fragments
    fn supports_fragments(&self) -> bool {
        false
    }

    /// Request playback; resolves once playback actually started
    async fn play(&self) -> Result<(), DomainError>;
}

/// Port for configuration management
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Get configuration value
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Get configuration value with default
    async fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, DomainError>;

    /// Set configuration value
    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Load configuration from file
    async fn load_config(&self, file_path: &Path) -> Result<(), DomainError>;

    /// Validate configuration
    async fn validate_config(&self) -> Result<(), DomainError>;

    /// Get all configuration keys
    async fn get_all_config_keys(&self) -> Result<Vec<String>, DomainError>;
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    async fn info(&self, message: &str);

    async fn warn(&self, message: &str);

    async fn error(&self, message: &str);

    async fn debug(&self, message: &str);

    /// Log structured event
    async fn log_event(&self, event: &LogEvent);
}

/// Log event with structured data
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            context: HashMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::Config(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
