// Analyze interactor - Orchestrates the highlight analysis use case

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::HashtagPolicy;
use crate::normalize::normalize_with_report;
use crate::ports::*;

/// Clip list and the source it was derived from
#[derive(Default)]
struct Session {
    media: Option<MediaRef>,
    source: Option<SourceInfo>,
    clips: Vec<Clip>,
}

/// Interactor for the analysis use case
///
/// Submissions are serialized: the session lock is held for the whole request,
/// so a second submission waits for the first to settle.
pub struct AnalyzeInteractor {
    analysis_port: Arc<dyn AnalysisPort>,
    media_store: Arc<dyn MediaStorePort>,
    log_port: Arc<dyn LogPort>,
    hashtags: Option<HashtagPolicy>,
    session: Mutex<Session>,
}

impl AnalyzeInteractor {
    /// Create new analyze interactor with injected ports
    pub fn new(
        analysis_port: Arc<dyn AnalysisPort>,
        media_store: Arc<dyn MediaStorePort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            analysis_port,
            media_store,
            log_port,
            hashtags: None,
            session: Mutex::new(Session::default()),
        }
    }

    /// Enrich hashtags of every clip with the given policy
    pub fn with_hashtag_policy(mut self, policy: HashtagPolicy) -> Self {
        self.hashtags = Some(policy);
        self
    }

    /// Submit a video and replace the current clip list with the result
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse, DomainError> {
        let mut session = self.session.lock().await;
        session.clips.clear();

        match self.run(&mut session, &request).await {
            Ok(response) => {
                session.clips = response.clips.clone();
                Ok(response)
            }
            Err(err) => {
                session.clips.clear();
                self.log_port
                    .log_event(
                        &LogEvent::new(LogLevel::Error, "Analysis failed")
                            .with("source", request.source.display_name())
                            .with("error", &err),
                    )
                    .await;
                Err(err)
            }
        }
    }

    /// One-shot analysis: the local media reference is released whether or
    /// not the analysis succeeded
    pub async fn analyze_once(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse, DomainError> {
        let result = self.analyze(request).await;
        self.close().await;
        result
    }

    /// Clips from the last successful analysis
    pub async fn current_clips(&self) -> Vec<Clip> {
        self.session.lock().await.clips.clone()
    }

    /// Source the current clips are played from
    pub async fn current_source(&self) -> Option<SourceInfo> {
        self.session.lock().await.source.clone()
    }

    /// Release the local media reference, if any
    pub async fn close(&self) {
        let mut session = self.session.lock().await;
        if let Some(media) = session.media.take() {
            self.media_store.revoke(&media).await;
        }
        session.source = None;
        session.clips.clear();
    }

    async fn run(&self, session: &mut Session, request: &AnalyzeRequest) -> Result<AnalyzeResponse, DomainError> {
        self.log_port
            .info(&format!(
                "Starting analysis of {} via {} provider",
                request.source.display_name(),
                self.analysis_port.name()
            ))
            .await;

        // The previous reference goes before a new one is created.
        if let Some(previous) = session.media.take() {
            self.media_store.revoke(&previous).await;
        }
        session.source = None;

        let source = match &request.source {
            MediaSource::File(path) => {
                let media = self.media_store.register(path).await?;
                let info = SourceInfo {
                    master_src: media.url.clone(),
                    kind: SourceKind::File,
                    name: request.source.display_name(),
                };
                session.media = Some(media);
                info
            }
            MediaSource::Url(url) => SourceInfo {
                master_src: url.clone(),
                kind: SourceKind::Url,
                name: request.source.display_name(),
            },
        };
        session.source = Some(source.clone());

        let payload = self.analysis_port.submit(request).await?;
        let normalized = normalize_with_report(&payload)?;
        if !normalized.skipped.is_empty() {
            self.log_port
                .warn(&format!(
                    "Skipped {} of {} clip records",
                    normalized.skipped.len(),
                    normalized.skipped.len() + normalized.clips.len()
                ))
                .await;
        }

        let clips = match &self.hashtags {
            Some(policy) => normalized.clips.into_iter().map(|clip| policy.apply(clip)).collect(),
            None => normalized.clips,
        };

        self.log_port
            .log_event(
                &LogEvent::new(LogLevel::Info, "Analysis completed")
                    .with("clips", clips.len())
                    .with("skipped", normalized.skipped.len()),
            )
            .await;

        Ok(AnalyzeResponse {
            source,
            clips,
            skipped: normalized.skipped.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{LocalMediaAdapter, MockAnalysisAdapter, TracingLogAdapter};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::io::Write;
    use std::time::Duration;

    /// Analysis port returning a fixed payload or error
    struct FixedAnalysis(Result<Value, DomainError>);

    #[async_trait]
    impl AnalysisPort for FixedAnalysis {
        async fn submit(&self, _request: &AnalyzeRequest) -> Result<Value, DomainError> {
            self.0.clone()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn interactor(analysis: Arc<dyn AnalysisPort>, store: Arc<LocalMediaAdapter>) -> AnalyzeInteractor {
        AnalyzeInteractor::new(analysis, store, Arc::new(TracingLogAdapter::default()))
    }

    fn video_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        file.write_all(b"not really a video").unwrap();
        file
    }

    #[tokio::test]
    async fn test_mock_analysis_of_url() {
        let store = Arc::new(LocalMediaAdapter::new());
        let interactor = interactor(Arc::new(MockAnalysisAdapter::new(Duration::ZERO)), store.clone());

        let request = AnalyzeRequest::from_parts(None, Some("https://example.com/talk.mp4".to_string()), None).unwrap();
        let response = interactor.analyze(request).await.unwrap();

        assert_eq!(response.clips.len(), 3);
        assert_eq!(response.source.kind, SourceKind::Url);
        assert_eq!(response.source.master_src, "https://example.com/talk.mp4");
        assert_eq!(interactor.current_clips().await.len(), 3);
        assert_eq!(store.live().await, 0);
    }

    #[tokio::test]
    async fn test_file_reference_revoked_before_next_submission() {
        let store = Arc::new(LocalMediaAdapter::new());
        let interactor = interactor(Arc::new(MockAnalysisAdapter::new(Duration::ZERO)), store.clone());
        let first = video_file();
        let second = video_file();

        let response = interactor
            .analyze(AnalyzeRequest::from_parts(Some(first.path().to_path_buf()), None, Some(2)).unwrap())
            .await
            .unwrap();
        assert_eq!(response.source.kind, SourceKind::File);
        assert!(response.source.master_src.starts_with("file://"));
        assert_eq!(response.clips.len(), 2);
        assert_eq!(store.live().await, 1);

        interactor
            .analyze(AnalyzeRequest::from_parts(Some(second.path().to_path_buf()), None, None).unwrap())
            .await
            .unwrap();
        assert_eq!(store.live().await, 1);

        interactor.close().await;
        assert_eq!(store.live().await, 0);
        assert!(interactor.current_source().await.is_none());
    }

    #[tokio::test]
    async fn test_failure_clears_clip_list() {
        let store = Arc::new(LocalMediaAdapter::new());
        let ok = interactor(Arc::new(MockAnalysisAdapter::new(Duration::ZERO)), store.clone());
        let url = || AnalyzeRequest::from_parts(None, Some("https://example.com/v".to_string()), None).unwrap();
        ok.analyze(url()).await.unwrap();

        let failing = AnalyzeInteractor {
            analysis_port: Arc::new(FixedAnalysis(Ok(json!({"clips": [{"title": ""}]})))),
            ..ok
        };
        assert_eq!(failing.analyze(url()).await, Err(DomainError::EmptyResult));
        assert!(failing.current_clips().await.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let error = DomainError::ProviderRequest {
            status: Some(503),
            message: "busy".to_string(),
            retryable: true,
        };
        let interactor = interactor(
            Arc::new(FixedAnalysis(Err(error.clone()))),
            Arc::new(LocalMediaAdapter::new()),
        );
        let request = AnalyzeRequest::from_parts(None, Some("https://example.com/v".to_string()), None).unwrap();
        assert_eq!(interactor.analyze(request).await, Err(error));
    }

    #[tokio::test]
    async fn test_one_shot_failure_releases_file_reference() {
        let store = Arc::new(LocalMediaAdapter::new());
        let interactor = interactor(
            Arc::new(FixedAnalysis(Ok(json!("no clips here")))),
            store.clone(),
        );
        let video = video_file();

        let request = AnalyzeRequest::from_parts(Some(video.path().to_path_buf()), None, None).unwrap();
        assert!(matches!(
            interactor.analyze_once(request).await,
            Err(DomainError::MalformedPayload(_))
        ));
        assert_eq!(store.live().await, 0);
        assert!(interactor.current_source().await.is_none());
    }

    #[tokio::test]
    async fn test_one_shot_success_releases_file_reference() {
        let store = Arc::new(LocalMediaAdapter::new());
        let interactor = interactor(Arc::new(MockAnalysisAdapter::new(Duration::ZERO)), store.clone());
        let video = video_file();

        let request = AnalyzeRequest::from_parts(Some(video.path().to_path_buf()), None, Some(1)).unwrap();
        let response = interactor.analyze_once(request).await.unwrap();
        assert_eq!(response.clips.len(), 1);
        assert_eq!(store.live().await, 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_media_unavailable() {
        let store = Arc::new(LocalMediaAdapter::new());
        let interactor = interactor(Arc::new(MockAnalysisAdapter::new(Duration::ZERO)), store.clone());
        let request = AnalyzeRequest::from_parts(Some("/no/such/video.mp4".into()), None, None).unwrap();

        assert!(matches!(
            interactor.analyze(request).await,
            Err(DomainError::MediaUnavailable(_))
        ));
        assert_eq!(store.live().await, 0);
    }

    #[tokio::test]
    async fn test_hashtag_enrichment_is_opt_in() {
        let payload = json!([{"id": "a", "title": "Big Reveal", "start": 0, "end": 5, "tags": ["Wow!"]}]);
        let url = || AnalyzeRequest::from_parts(None, Some("https://example.com/v".to_string()), None).unwrap();

        let plain = interactor(
            Arc::new(FixedAnalysis(Ok(payload.clone()))),
            Arc::new(LocalMediaAdapter::new()),
        );
        let clips = plain.analyze(url()).await.unwrap().clips;
        assert_eq!(clips[0].hashtags(), &["Wow!".to_string()]);

        let enriched = interactor(Arc::new(FixedAnalysis(Ok(payload))), Arc::new(LocalMediaAdapter::new()))
            .with_hashtag_policy(HashtagPolicy::default());
        let clips = enriched.analyze(url()).await.unwrap().clips;
        assert_eq!(clips[0].hashtags(), &["#wow", "#big", "#reveal"]);
    }
}
