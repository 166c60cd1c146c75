// Preview interactor - Plays a clip window against a simulated media element

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::adapters::sim_media::SimulatedMediaHandle;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::playback::{
    play_standalone, PlaybackController, PlaybackListener, PlaybackOptions, PlaybackOutcome,
    PlaybackSession, PlaybackState,
};
use crate::ports::*;

/// What to preview and how fast the simulated clock runs
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    /// Full source the clip is windowed from
    pub master_src: String,
    pub clip: Clip,
    /// Length of the simulated source in seconds
    pub source_duration: f64,
    /// Wall-clock time between clock ticks
    pub tick: Duration,
    /// Media seconds advanced per wall-clock second of tick
    pub speed: f64,
    pub use_fragments: bool,
}

/// Summary of a finished preview
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReport {
    pub clip_id: String,
    pub started: bool,
    pub standalone: bool,
    pub transitions: Vec<PlaybackState>,
    pub stopped_at: f64,
    /// Controller and element state once the clock stopped
    pub session: PlaybackSession,
    pub error: Option<String>,
}

/// Records transitions and mirrors them into the log
#[derive(Default)]
struct TransitionLog {
    states: Mutex<Vec<PlaybackState>>,
}

impl TransitionLog {
    fn take(&self) -> Vec<PlaybackState> {
        std::mem::take(&mut *self.states.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl PlaybackListener for TransitionLog {
    fn on_state_change(&self, previous: &PlaybackState, current: &PlaybackState) {
        info!(from = ?previous, to = ?current, "Playback state");
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(current.clone());
    }
}

/// Pick a clip by id, or by 1-based position in the list
pub fn select_clip<'a>(clips: &'a [Clip], selector: Option<&str>) -> Result<&'a Clip, DomainError> {
    let Some(selector) = selector else {
        return clips.first().ok_or(DomainError::EmptyResult);
    };

    if let Some(clip) = clips.iter().find(|clip| clip.id() == selector) {
        return Ok(clip);
    }

    selector
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| clips.get(index))
        .ok_or_else(|| DomainError::InvalidInput(format!("No clip matches '{}'", selector)))
}

/// Interactor for the preview use case
pub struct PreviewInteractor {
    log_port: Arc<dyn LogPort>,
}

impl PreviewInteractor {
    /// Create new preview interactor with injected ports
    pub fn new(log_port: Arc<dyn LogPort>) -> Self {
        Self { log_port }
    }

    /// Play the clip to the end of its window and report what happened
    pub async fn execute(&self, request: PreviewRequest) -> Result<PreviewReport, DomainError> {
        if !request.speed.is_finite() || request.speed <= 0.0 {
            return Err(DomainError::InvalidInput(format!(
                "Playback speed must be positive, got {}",
                request.speed
            )));
        }
        if !request.source_duration.is_finite() || request.source_duration <= 0.0 {
            return Err(DomainError::InvalidInput(format!(
                "Source duration must be positive, got {}",
                request.source_duration
            )));
        }

        self.log_port
            .info(&format!(
                "Previewing clip {} ({:.2}s-{:.2}s)",
                request.clip.id(),
                request.clip.start_sec(),
                request.clip.end_sec()
            ))
            .await;

        if let Some(url) = request.clip.playback_url() {
            return self.preview_standalone(&request, url).await;
        }

        let (handle, events) = SimulatedMediaHandle::new(request.source_duration, request.use_fragments);
        let handle = Arc::new(handle);
        let transitions = Arc::new(TransitionLog::default());

        let mut controller = PlaybackController::new(
            handle.clone(),
            Some(request.master_src.clone()),
            PlaybackOptions {
                use_fragments: request.use_fragments,
            },
        );
        controller.add_listener(transitions.clone());

        let outcome = controller.play_from_start(&request.clip).await;
        let error = match outcome {
            PlaybackOutcome::Playing => {
                self.run_clock(&mut controller, &handle, events, &request).await;
                None
            }
            PlaybackOutcome::Rejected(err) => Some(err.to_string()),
            PlaybackOutcome::Skipped(reason) => Some(format!("Playback skipped: {:?}", reason)),
            PlaybackOutcome::Standalone(_) => None,
        };
        let session = controller.session();
        controller.teardown();

        let report = PreviewReport {
            clip_id: request.clip.id().to_string(),
            started: error.is_none(),
            standalone: false,
            transitions: transitions.take(),
            stopped_at: session.current_time,
            session,
            error,
        };

        self.log_port
            .log_event(
                &LogEvent::new(LogLevel::Info, "Preview finished")
                    .with("clip", &report.clip_id)
                    .with("stopped_at", report.stopped_at),
            )
            .await;
        Ok(report)
    }

    async fn run_clock(
        &self,
        controller: &mut PlaybackController,
        handle: &SimulatedMediaHandle,
        mut events: UnboundedReceiver<MediaEvent>,
        request: &PreviewRequest,
    ) {
        let step = request.tick.as_secs_f64().max(0.001) * request.speed;

        loop {
            drain(controller, &mut events);
            if controller.state() == &PlaybackState::Idle {
                break;
            }
            if handle.is_paused() {
                // clock can no longer move
                controller.handle_event(MediaEvent::Paused);
                break;
            }
            tokio::time::sleep(request.tick).await;
            handle.advance(step);
        }
    }

    async fn preview_standalone(
        &self,
        request: &PreviewRequest,
        url: &str,
    ) -> Result<PreviewReport, DomainError> {
        let duration = request.clip.window().duration();
        let (handle, mut events) = SimulatedMediaHandle::new(duration, false);
        let step = request.tick.as_secs_f64().max(0.001) * request.speed;

        let error = match play_standalone(&handle, url).await {
            Ok(()) => {
                while !handle.is_paused() {
                    tokio::time::sleep(request.tick).await;
                    handle.advance(step);
                }
                while events.try_recv().is_ok() {}
                None
            }
            Err(err) => Some(err.to_string()),
        };

        let session = PlaybackSession {
            clip_id: None,
            playing: false,
            current_time: handle.current_time(),
            paused: handle.is_paused(),
        };

        Ok(PreviewReport {
            clip_id: request.clip.id().to_string(),
            started: error.is_none(),
            standalone: true,
            transitions: Vec::new(),
            stopped_at: session.current_time,
            session,
            error,
        })
    }
}

fn drain(controller: &mut PlaybackController, events: &mut UnboundedReceiver<MediaEvent>) {
    while let Ok(event) = events.try_recv() {
        controller.handle_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TracingLogAdapter;

    fn clip(id: &str, start: f64, end: f64) -> Clip {
        Clip::new(id, "Clip", ClipWindow::new(start, end).unwrap()).unwrap()
    }

    fn request(clip: Clip, use_fragments: bool) -> PreviewRequest {
        PreviewRequest {
            master_src: "https://example.com/talk.mp4".to_string(),
            clip,
            source_duration: 120.0,
            tick: Duration::from_millis(1),
            speed: 1000.0,
            use_fragments,
        }
    }

    fn interactor() -> PreviewInteractor {
        PreviewInteractor::new(Arc::new(TracingLogAdapter::default()))
    }

    #[tokio::test]
    async fn test_preview_stops_at_window_end() {
        for fragments in [false, true] {
            let report = interactor().execute(request(clip("c2", 35.0, 52.0), fragments)).await.unwrap();

            assert!(report.started);
            assert_eq!(report.stopped_at, 52.0);
            assert_eq!(
                report.transitions,
                vec![
                    PlaybackState::Loading { clip_id: "c2".to_string() },
                    PlaybackState::Playing { clip_id: "c2".to_string() },
                    PlaybackState::Idle,
                ]
            );
        }
    }

    #[tokio::test]
    async fn test_preview_window_past_source_end() {
        let mut req = request(clip("c3", 100.0, 150.0), false);
        req.source_duration = 110.0;
        let report = interactor().execute(req).await.unwrap();
        assert_eq!(report.stopped_at, 110.0);
        assert_eq!(report.transitions.last(), Some(&PlaybackState::Idle));
        assert_eq!(
            report.session,
            PlaybackSession {
                clip_id: None,
                playing: false,
                current_time: 110.0,
                paused: true,
            }
        );
    }

    #[tokio::test]
    async fn test_preview_standalone_clip() {
        let standalone = clip("s1", 0.0, 4.0).with_playback_url(Some("https://cdn.example/s1.mp4".to_string()));
        let report = interactor().execute(request(standalone, true)).await.unwrap();

        assert!(report.standalone);
        assert!(report.started);
        assert_eq!(report.stopped_at, 4.0);
    }

    #[tokio::test]
    async fn test_preview_rejects_bad_speed() {
        let mut req = request(clip("c1", 3.0, 14.0), false);
        req.speed = 0.0;
        assert!(matches!(interactor().execute(req).await, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_select_clip() {
        let clips = vec![clip("c1", 0.0, 1.0), clip("c2", 1.0, 2.0)];
        assert_eq!(select_clip(&clips, None).unwrap().id(), "c1");
        assert_eq!(select_clip(&clips, Some("c2")).unwrap().id(), "c2");
        assert_eq!(select_clip(&clips, Some("2")).unwrap().id(), "c2");
        assert!(select_clip(&clips, Some("0")).is_err());
        assert!(select_clip(&clips, Some("c9")).is_err());
        assert_eq!(select_clip(&[], None), Err(DomainError::EmptyResult));
    }
}
