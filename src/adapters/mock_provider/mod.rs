// Mock analysis adapter - Fixed highlight set for demo and offline use

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Analysis port that never contacts the provider
pub struct MockAnalysisAdapter {
    delay: Duration,
}

impl MockAnalysisAdapter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The canonical clip set returned in mock mode
    pub fn canned_clips() -> Vec<Value> {
        vec![
            json!({
                "id": "c1",
                "title": "Opening hook",
                "startSec": 3,
                "endSec": 14,
                "hashtags": ["#hook", "#intro"]
            }),
            json!({
                "id": "c2",
                "title": "Key insight",
                "startSec": 35,
                "endSec": 52,
                "hashtags": ["#insight"]
            }),
            json!({
                "id": "c3",
                "title": "Final takeaway",
                "startSec": 90,
                "endSec": 109,
                "hashtags": ["#summary", "#highlight"]
            }),
        ]
    }
}

#[async_trait]
impl AnalysisPort for MockAnalysisAdapter {
    async fn submit(&self, request: &AnalyzeRequest) -> Result<Value, DomainError> {
        info!(
            source = %request.source.display_name(),
            delay_ms = self.delay.as_millis() as u64,
            "Mock mode: skipping analysis provider"
        );
        tokio::time::sleep(self.delay).await;

        let mut clips = Self::canned_clips();
        if let Some(max) = request.max_clips {
            clips.truncate(max as usize);
        }

        Ok(json!({ "clips": clips }))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn request(max_clips: Option<u32>) -> AnalyzeRequest {
        AnalyzeRequest {
            source: MediaSource::Url("https://example.com/v.mp4".to_string()),
            max_clips,
        }
    }

    #[tokio::test]
    async fn test_mock_returns_canonical_set() {
        let adapter = MockAnalysisAdapter::new(Duration::ZERO);
        let payload = adapter.submit(&request(None)).await.unwrap();
        let clips = normalize(&payload).unwrap();

        assert_eq!(clips.len(), 3);
        assert_eq!(clips[1].id(), "c2");
        assert_eq!(clips[1].start_sec(), 35.0);
        assert_eq!(clips[1].end_sec(), 52.0);
        assert_eq!(clips[2].hashtags(), &["#summary".to_string(), "#highlight".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_honors_max_clips() {
        let adapter = MockAnalysisAdapter::new(Duration::ZERO);
        let payload = adapter.submit(&request(Some(1))).await.unwrap();
        assert_eq!(normalize(&payload).unwrap().len(), 1);
    }
}
