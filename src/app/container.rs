use std::sync::Arc;

use crate::adapters::{
    HttpAnalysisAdapter, LocalMediaAdapter, MockAnalysisAdapter, TracingLogAdapter,
};
use crate::app::{analyze_interactor::AnalyzeInteractor, preview_interactor::PreviewInteractor};
use crate::config_initialization::Settings;
use crate::domain::rules::HashtagPolicy;
use crate::ports::{AnalysisPort, LogPort, MediaStorePort};
use crate::playback::PlaybackOptions;

pub trait AppContainer: Send + Sync {
    fn analyze_interactor(&self) -> Arc<AnalyzeInteractor>;
    fn preview_interactor(&self) -> Arc<PreviewInteractor>;
    fn playback_options(&self) -> PlaybackOptions;
}

pub struct DefaultAppContainer {
    settings: Settings,
    analyze_interactor: Arc<AnalyzeInteractor>,
    preview_interactor: Arc<PreviewInteractor>,
}

impl DefaultAppContainer {
    /// Wire adapters according to the resolved settings. Mock mode swaps the
    /// remote provider for the canned clip set.
    pub fn new(settings: Settings) -> Self {
        let analysis_port: Arc<dyn AnalysisPort> = if settings.mock_mode {
            Arc::new(MockAnalysisAdapter::new(settings.mock_delay))
        } else {
            Arc::new(HttpAnalysisAdapter::new(settings.provider_settings()))
        };
        let media_store = Arc::new(LocalMediaAdapter::new());
        let log_port = Arc::new(TracingLogAdapter::new(settings.log_level));

        let mut analyze_interactor = AnalyzeInteractor::new(
            analysis_port,
            Arc::clone(&media_store) as Arc<dyn MediaStorePort>,
            Arc::clone(&log_port) as Arc<dyn LogPort>,
        );
        if settings.enrich_hashtags {
            analyze_interactor = analyze_interactor.with_hashtag_policy(HashtagPolicy::default());
        }

        let preview_interactor = Arc::new(PreviewInteractor::new(
            Arc::clone(&log_port) as Arc<dyn LogPort>,
        ));

        Self {
            settings,
            analyze_interactor: Arc::new(analyze_interactor),
            preview_interactor,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl AppContainer for DefaultAppContainer {
    fn analyze_interactor(&self) -> Arc<AnalyzeInteractor> {
        Arc::clone(&self.analyze_interactor)
    }

    fn preview_interactor(&self) -> Arc<PreviewInteractor> {
        Arc::clone(&self.preview_interactor)
    }

    fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            use_fragments: self.settings.use_fragments,
        }
    }
}
