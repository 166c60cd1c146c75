// Local media adapter - Temporary file:// references for uploaded videos

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Hands out `file://` references to local videos and tracks which are alive
#[derive(Default)]
pub struct LocalMediaAdapter {
    live: Mutex<HashSet<MediaRef>>,
}

impl LocalMediaAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaStorePort for LocalMediaAdapter {
    async fn register(&self, path: &Path) -> Result<MediaRef, DomainError> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            DomainError::MediaUnavailable(format!("{}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(DomainError::MediaUnavailable(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let canonical = tokio::fs::canonicalize(path).await.map_err(|e| {
            DomainError::MediaUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let url = url::Url::from_file_path(&canonical).map_err(|_| {
            DomainError::MediaUnavailable(format!(
                "Cannot build a file URL for {}",
                canonical.display()
            ))
        })?;

        let media = MediaRef {
            url: url.to_string(),
            path: canonical,
        };
        self.live.lock().await.insert(media.clone());
        debug!(url = %media.url, "Registered local media");
        Ok(media)
    }

    async fn revoke(&self, media: &MediaRef) {
        if self.live.lock().await.remove(media) {
            debug!(url = %media.url, "Revoked local media");
        }
    }

    async fn live(&self) -> usize {
        self.live.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_register_and_revoke() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("talk.mp4");
        std::fs::write(&path, b"not really a video").unwrap();

        let store = LocalMediaAdapter::new();
        let media = store.register(&path).await.unwrap();
        assert!(media.url.starts_with("file://"));
        assert!(media.url.ends_with("talk.mp4"));
        assert_eq!(store.live().await, 1);

        store.revoke(&media).await;
        assert_eq!(store.live().await, 0);

        // second revoke is a no-op
        store.revoke(&media).await;
        assert_eq!(store.live().await, 0);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let store = LocalMediaAdapter::new();
        let result = store.register(Path::new("/definitely/not/here.mp4")).await;
        assert!(matches!(result, Err(DomainError::MediaUnavailable(_))));
    }

    #[tokio::test]
    async fn test_directory_rejected() {
        let dir = TempDir::new().unwrap();
        let store = LocalMediaAdapter::new();
        assert!(store.register(dir.path()).await.is_err());
    }
}
