// HTTP analysis adapter - Submits videos to the remote highlight provider

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Longest provider error body echoed back to the user
const ERROR_BODY_LIMIT: usize = 200;

/// Connection settings for the analysis provider
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub default_max_clips: u32,
}

/// Initialized provider client
#[derive(Debug)]
pub struct ProviderClient {
    http: reqwest::Client,
    endpoint: url::Url,
    api_key: Option<String>,
    timeout: Duration,
}

impl ProviderClient {
    /// Build the client from settings
    pub fn connect(settings: &ProviderSettings) -> Result<Self, DomainError> {
        let endpoint = settings.endpoint.as_deref().ok_or_else(|| {
            DomainError::Config(
                "No analysis endpoint configured. Set REEL_ENDPOINT or enable mock mode (REEL_MOCK=1)."
                    .to_string(),
            )
        })?;
        let endpoint = url::Url::parse(endpoint)
            .map_err(|e| DomainError::Config(format!("Invalid endpoint {}: {}", endpoint, e)))?;

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("highlight-reel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!(endpoint = %endpoint, "Analysis provider client initialized");
        Ok(Self {
            http,
            endpoint,
            api_key: settings.api_key.clone(),
            timeout: settings.timeout,
        })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    /// Submit the request and return the decoded payload
    pub async fn submit(&self, source: &MediaSource, max_clips: u32) -> Result<Value, DomainError> {
        let mut builder = self.http.post(self.endpoint.clone());
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        builder = match source {
            MediaSource::Url(url) => builder.json(&json!({ "url": url, "maxClips": max_clips })),
            MediaSource::File(path) => builder.multipart(file_form(path, max_clips).await?),
        };

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        debug!(status = status.as_u16(), bytes = body.len(), "Provider responded");

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        decode_body(&body)
    }

    fn transport_error(&self, err: reqwest::Error) -> DomainError {
        let message = if err.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else {
            err.to_string()
        };

        DomainError::ProviderRequest {
            status: err.status().map(|s| s.as_u16()),
            message,
            retryable: true,
        }
    }
}

async fn file_form(path: &Path, max_clips: u32) -> Result<Form, DomainError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DomainError::MediaUnavailable(format!("{}: {}", path.display(), e)))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_for(path))
        .map_err(|e| DomainError::Internal(format!("Invalid upload mime type: {}", e)))?;

    Ok(Form::new()
        .part("file", part)
        .text("maxClips", max_clips.to_string()))
}

/// Mime type for an accepted video extension
pub fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

/// Map a non-success status to a provider error
pub fn status_error(status: u16, body: &str) -> DomainError {
    let mut message: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();
    if message.is_empty() {
        message = "empty response body".to_string();
    }

    DomainError::ProviderRequest {
        status: Some(status),
        message,
        retryable: status >= 500 || status == 429,
    }
}

/// Decode the provider body; a JSON string holding JSON is unwrapped once
pub fn decode_body(body: &str) -> Result<Value, DomainError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        DomainError::MalformedPayload(format!("Analysis response was not valid JSON: {}", e))
    })?;

    if let Value::String(inner) = &value {
        if let Ok(nested) = serde_json::from_str::<Value>(inner) {
            return Ok(nested);
        }
    }

    Ok(value)
}

/// Analysis port backed by the remote provider
pub struct HttpAnalysisAdapter {
    settings: ProviderSettings,
    client: OnceCell<ProviderClient>,
}

impl HttpAnalysisAdapter {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    /// Initialize the provider client once; concurrent callers share the same
    /// in-flight initialization
    pub async fn client(&self) -> Result<&ProviderClient, DomainError> {
        self.client
            .get_or_try_init(|| async { ProviderClient::connect(&self.settings) })
            .await
    }
}

#[async_trait]
impl AnalysisPort for HttpAnalysisAdapter {
    async fn submit(&self, request: &AnalyzeRequest) -> Result<Value, DomainError> {
        let client = self.client().await?;
        let max_clips = request.max_clips.unwrap_or(self.settings.default_max_clips);
        client.submit(&request.source, max_clips).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
