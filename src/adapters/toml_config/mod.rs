// TOML config adapter - Configuration management using TOML files

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Table inside the TOML file that holds our settings
const SECTION: &str = "reel";

/// Keys that must parse as booleans
const BOOL_KEYS: &[&str] = &["mock_mode", "enrich_hashtags", "use_fragments"];

/// Keys that must parse as unsigned integers
const INT_KEYS: &[&str] = &["max_clips", "request_timeout_secs", "mock_delay_ms"];

/// Default configuration values
pub const DEFAULTS: &[(&str, &str)] = &[
    ("log_level", "info"),
    ("mock_mode", "false"),
    ("max_clips", "3"),
    ("request_timeout_secs", "120"),
    ("mock_delay_ms", "1200"),
    ("enrich_hashtags", "true"),
    ("use_fragments", "true"),
];

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: Arc<RwLock<HashMap<String, String>>>,
    config_file_path: Arc<RwLock<Option<PathBuf>>>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter seeded with defaults
    pub fn new() -> Self {
        let config = DEFAULTS
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Self {
            config: Arc::new(RwLock::new(config)),
            config_file_path: Arc::new(RwLock::new(None)),
        }
    }

    /// Path of the last file loaded, if any
    pub fn loaded_from(&self) -> Option<PathBuf> {
        self.config_file_path.read().ok().and_then(|path| path.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, String>>, DomainError> {
        self.config
            .read()
            .map_err(|_| DomainError::Internal("Configuration lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, String>>, DomainError> {
        self.config
            .write()
            .map_err(|_| DomainError::Internal("Configuration lock poisoned".to_string()))
    }

    /// Deserialize config from TOML string, merging the `[reel]` table
    pub fn merge_toml(&self, toml_content: &str) -> Result<usize, DomainError> {
        let parsed: toml::Value = toml::from_str(toml_content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))?;

        let Some(table) = parsed.get(SECTION).and_then(toml::Value::as_table) else {
            return Ok(0);
        };

        let mut config = self.write()?;
        let mut merged = 0;
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Float(f) => f.to_string(),
                other => {
                    return Err(DomainError::Config(format!(
                        "Unsupported value for {}: {}",
                        key, other
                    )))
                }
            };
            config.insert(key.clone(), value);
            merged += 1;
        }

        Ok(merged)
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a boolean the way environment variables usually spell them
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, DomainError> {
        Ok(self
            .read()?
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.write()?.insert(key.to_string(), value.to_string());
        tracing::debug!("Set config {} = {}", key, value);
        Ok(())
    }

    async fn load_config(&self, file_path: &Path) -> Result<(), DomainError> {
        let content = tokio::fs::read_to_string(file_path).await.map_err(|e| {
            DomainError::Config(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let merged = self.merge_toml(&content)?;
        tracing::info!("Loaded {} settings from {}", merged, file_path.display());

        if let Ok(mut path) = self.config_file_path.write() {
            *path = Some(file_path.to_path_buf());
        }
        Ok(())
    }

    async fn validate_config(&self) -> Result<(), DomainError> {
        let config = self.read()?;

        if let Some(log_level) = config.get("log_level") {
            LogLevel::parse(log_level)?;
        }

        for key in BOOL_KEYS {
            if let Some(value) = config.get(*key) {
                parse_bool(value).ok_or_else(|| {
                    DomainError::Config(format!("Invalid boolean value for {}: {}", key, value))
                })?;
            }
        }

        for key in INT_KEYS {
            if let Some(value) = config.get(*key) {
                value.trim().parse::<u64>().map_err(|e| {
                    DomainError::Config(format!("Invalid value for {}: {}", key, e))
                })?;
            }
        }

        if let Some(endpoint) = config.get("endpoint") {
            url::Url::parse(endpoint).map_err(|e| {
                DomainError::Config(format!("Invalid endpoint {}: {}", endpoint, e))
            })?;
        }

        Ok(())
    }

    async fn get_all_config_keys(&self) -> Result<Vec<String>, DomainError> {
        let mut keys: Vec<String> = self.read()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
