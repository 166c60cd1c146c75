// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::errors::DomainError;

/// Video file extensions the analysis provider accepts
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "ogv", "mov", "mkv"];

/// Time window of a clip inside its source video, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipWindow {
    start_sec: f64,
    end_sec: f64,
}

/// Reason a pair of bounds cannot form a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    NotFinite,
    Negative,
    Inverted,
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::NotFinite => write!(f, "bounds must be finite numbers"),
            WindowError::Negative => write!(f, "bounds cannot be negative"),
            WindowError::Inverted => write!(f, "end must be after start"),
        }
    }
}

impl ClipWindow {
    /// Create a window, requiring finite non-negative bounds with start < end
    pub fn new(start_sec: f64, end_sec: f64) -> Result<Self, WindowError> {
        if !start_sec.is_finite() || !end_sec.is_finite() {
            return Err(WindowError::NotFinite);
        }
        if start_sec < 0.0 || end_sec < 0.0 {
            return Err(WindowError::Negative);
        }
        if end_sec <= start_sec {
            return Err(WindowError::Inverted);
        }
        Ok(Self { start_sec, end_sec })
    }

    pub fn start_sec(&self) -> f64 {
        self.start_sec
    }

    pub fn end_sec(&self) -> f64 {
        self.end_sec
    }

    /// Length of the window in seconds
    pub fn duration(&self) -> f64 {
        self.end_sec - self.start_sec
    }

    /// Whether a playback position has reached the end of the window
    pub fn is_exhausted_at(&self, position: f64) -> bool {
        position >= self.end_sec
    }
}

/// Canonical highlight clip. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    id: String,
    title: String,
    #[serde(flatten)]
    window: ClipWindow,
    hashtags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    playback_url: Option<String>,
}

impl Clip {
    /// Create a new clip; the title is trimmed and must not be empty
    pub fn new(id: impl Into<String>, title: &str, window: ClipWindow) -> Result<Self, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::InvalidInput("Clip title cannot be empty".to_string()));
        }

        Ok(Self {
            id: id.into(),
            title: title.to_string(),
            window,
            hashtags: Vec::new(),
            thumbnail_url: None,
            playback_url: None,
        })
    }

    pub(crate) fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    pub fn with_hashtags(mut self, hashtags: Vec<String>) -> Self {
        self.hashtags = hashtags;
        self
    }

    pub fn with_thumbnail_url(mut self, url: Option<String>) -> Self {
        self.thumbnail_url = url;
        self
    }

    pub fn with_playback_url(mut self, url: Option<String>) -> Self {
        self.playback_url = url;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn window(&self) -> ClipWindow {
        self.window
    }

    pub fn start_sec(&self) -> f64 {
        self.window.start_sec
    }

    pub fn end_sec(&self) -> f64 {
        self.window.end_sec
    }

    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    pub fn playback_url(&self) -> Option<&str> {
        self.playback_url.as_deref()
    }

    /// Clip carries its own media and is not windowed out of the master source
    pub fn is_standalone(&self) -> bool {
        self.playback_url.is_some()
    }
}

/// Where the video to analyze comes from
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    File(PathBuf),
    Url(String),
}

impl MediaSource {
    /// Validate a remote URL: must parse and use http(s)
    pub fn url(raw: &str) -> Result<Self, DomainError> {
        let parsed = url::Url::parse(raw.trim())
            .map_err(|_| DomainError::InvalidInput("Enter a valid http(s) URL.".to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(MediaSource::Url(parsed.to_string())),
            _ => Err(DomainError::InvalidInput("Enter a valid http(s) URL.".to_string())),
        }
    }

    /// Validate a local file by extension
    pub fn file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DomainError::InvalidInput(format!(
                "Unsupported file type. Allowed: {}",
                ACCEPTED_EXTENSIONS.join(", ")
            )));
        }

        Ok(MediaSource::File(path.to_path_buf()))
    }

    /// Human-readable name of the source
    pub fn display_name(&self) -> String {
        match self {
            MediaSource::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "Uploaded file".to_string()),
            MediaSource::Url(url) => url.clone(),
        }
    }
}

/// Request for highlight analysis
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeRequest {
    pub source: MediaSource,
    pub max_clips: Option<u32>,
}

impl AnalyzeRequest {
    /// Build a request from optional file and URL inputs; a file takes precedence
    pub fn from_parts(
        file: Option<PathBuf>,
        url: Option<String>,
        max_clips: Option<u32>,
    ) -> Result<Self, DomainError> {
        let url = url.filter(|u| !u.trim().is_empty());
        if max_clips == Some(0) {
            return Err(DomainError::InvalidInput(
                "At least one clip must be requested.".to_string(),
            ));
        }

        let source = match (file, url) {
            (Some(path), _) => MediaSource::file(path)?,
            (None, Some(url)) => MediaSource::url(&url)?,
            (None, None) => return Err(DomainError::InputMissing),
        };

        Ok(Self { source, max_clips })
    }
}

/// Kind of master source the clips are played from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Url,
}

/// The full, unclipped source the clips refer to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub master_src: String,
    pub kind: SourceKind,
    pub name: String,
}

/// Result of a successful analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub source: SourceInfo,
    pub clips: Vec<Clip>,
    /// Records the provider returned that could not be turned into clips
    pub skipped: usize,
}

/// Temporary local reference to a file on disk, valid until revoked
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaRef {
    pub url: String,
    pub path: PathBuf,
}
