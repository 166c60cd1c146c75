//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::adapters::http_provider::ProviderSettings;
use crate::adapters::toml_config::{parse_bool, TomlConfigAdapter};
use crate::domain::errors::DomainError;
use crate::ports::{ConfigPort, LogLevel};

/// Config files probed when `--config` is not given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["reel.toml", "config/reel.toml"];

/// Environment variables and the keys they override
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("REEL_MOCK", "mock_mode"),
    ("REEL_ENDPOINT", "endpoint"),
    ("REEL_API_KEY", "api_key"),
    ("REEL_MAX_CLIPS", "max_clips"),
    ("REEL_REQUEST_TIMEOUT_SECS", "request_timeout_secs"),
    ("REEL_MOCK_DELAY_MS", "mock_delay_ms"),
    ("REEL_ENRICH_HASHTAGS", "enrich_hashtags"),
    ("REEL_USE_FRAGMENTS", "use_fragments"),
    ("REEL_LOG_LEVEL", "log_level"),
];

/// Values given on the command line; `None` leaves the lower layers alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub mock_mode: Option<bool>,
    pub max_clips: Option<u32>,
    pub use_fragments: Option<bool>,
}

/// Typed view of the resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mock_mode: bool,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub max_clips: u32,
    pub request_timeout: Duration,
    pub mock_delay: Duration,
    pub enrich_hashtags: bool,
    pub use_fragments: bool,
    pub log_level: LogLevel,
}

impl Settings {
    /// Read and type-check every key from a config port
    pub async fn from_config(config: &dyn ConfigPort) -> Result<Self, DomainError> {
        config.validate_config().await?;

        Ok(Self {
            mock_mode: read_bool(config, "mock_mode", false).await?,
            endpoint: read_string(config, "endpoint").await?,
            api_key: read_string(config, "api_key").await?,
            max_clips: read_clip_count(config).await?,
            request_timeout: Duration::from_secs(read_int(config, "request_timeout_secs", 120).await?),
            mock_delay: Duration::from_millis(read_int(config, "mock_delay_ms", 1200).await?),
            enrich_hashtags: read_bool(config, "enrich_hashtags", true).await?,
            use_fragments: read_bool(config, "use_fragments", true).await?,
            log_level: LogLevel::parse(&config.get_config_or_default("log_level", "info").await?)?,
        })
    }

    /// Connection settings for the remote analysis provider
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            timeout: self.request_timeout,
            default_max_clips: self.max_clips,
        }
    }
}

async fn read_string(config: &dyn ConfigPort, key: &str) -> Result<Option<String>, DomainError> {
    Ok(config
        .get_config(key)
        .await?
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

async fn read_bool(config: &dyn ConfigPort, key: &str, default: bool) -> Result<bool, DomainError> {
    match config.get_config(key).await? {
        Some(value) => parse_bool(&value)
            .ok_or_else(|| DomainError::Config(format!("Invalid boolean value for {}: {}", key, value))),
        None => Ok(default),
    }
}

async fn read_int(config: &dyn ConfigPort, key: &str, default: u64) -> Result<u64, DomainError> {
    match config.get_config(key).await? {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| DomainError::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(default),
    }
}

/// `max_clips` must be a positive count that fits the request field
async fn read_clip_count(config: &dyn ConfigPort) -> Result<u32, DomainError> {
    let value = read_int(config, "max_clips", 3).await?;
    match u32::try_from(value) {
        Ok(0) => Err(DomainError::Config("max_clips must be at least 1".to_string())),
        Ok(count) => Ok(count),
        Err(_) => Err(DomainError::Config(format!(
            "max_clips {} is out of range (at most {})",
            value,
            u32::MAX
        ))),
    }
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub async fn initialize_configuration_hierarchy(
    overrides: &ConfigOverrides,
) -> Result<Settings, DomainError> {
    let config = TomlConfigAdapter::new();
    resolve_configuration(&config, overrides, |name| std::env::var(name).ok()).await
}

/// Layer file, environment and CLI values onto an adapter seeded with defaults
pub async fn resolve_configuration<F>(
    config: &TomlConfigAdapter,
    overrides: &ConfigOverrides,
    env: F,
) -> Result<Settings, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    debug!("Initializing configuration hierarchy");

    if let Some(path) = config_file_path(overrides.config_file.as_deref())? {
        config.load_config(&path).await?;
    }

    load_environment_variables(config, env).await?;
    apply_cli_configuration_overrides(config, overrides).await?;

    let settings = Settings::from_config(config).await?;
    debug!(config_file = ?config.loaded_from(), ?settings, "Configuration resolved");
    Ok(settings)
}

/// Pick the config file: an explicit path must exist, defaults are optional
fn config_file_path(explicit: Option<&Path>) -> Result<Option<PathBuf>, DomainError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(DomainError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    Ok(DEFAULT_CONFIG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file()))
}

/// Load environment variables and apply to configuration
async fn load_environment_variables<F>(config: &TomlConfigAdapter, env: F) -> Result<(), DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_overrides = 0;
    for (env_var, key) in ENV_MAPPINGS {
        if let Some(value) = env(env_var) {
            debug!("Found environment override: {} -> {}", env_var, key);
            config.set_config(key, &value).await?;
            env_overrides += 1;
        }
    }

    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
async fn apply_cli_configuration_overrides(
    config: &TomlConfigAdapter,
    overrides: &ConfigOverrides,
) -> Result<(), DomainError> {
    if let Some(level) = &overrides.log_level {
        config.set_config("log_level", level).await?;
    }
    if let Some(mock) = overrides.mock_mode {
        config.set_config("mock_mode", &mock.to_string()).await?;
    }
    if let Some(max_clips) = overrides.max_clips {
        config.set_config("max_clips", &max_clips.to_string()).await?;
    }
    if let Some(use_fragments) = overrides.use_fragments {
        config.set_config("use_fragments", &use_fragments.to_string()).await?;
    }
    Ok(())
}
