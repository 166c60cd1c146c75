//! Playback controller driving one master media element

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{Clip, ClipWindow};
use crate::playback::fragment::fragment_source;
use crate::playback::{
    PlaybackListener, PlaybackOutcome, PlaybackSession, PlaybackState, SkipReason,
};
use crate::ports::{MediaEvent, MediaHandle};

/// Controller options
#[derive(Debug, Clone)]
pub struct PlaybackOptions {
    /// Address the clip window with a `#t=` fragment when the handle supports it
    pub use_fragments: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self { use_fragments: true }
    }
}

/// End-of-window observer for the clip currently bound to the master element
#[derive(Debug, Clone)]
struct WindowObserver {
    clip_id: String,
    window: ClipWindow,
}

/// Plays exactly `[start, end)` of a clip out of the full source video.
///
/// Only one clip drives the master element at a time: every play action
/// replaces the end-of-window observer instead of stacking a new one, and
/// `&mut self` on every entry point keeps actions strictly sequential.
pub struct PlaybackController {
    master: Arc<dyn MediaHandle>,
    master_src: Option<String>,
    options: PlaybackOptions,
    state: PlaybackState,
    observer: Option<WindowObserver>,
    listeners: Vec<Arc<dyn PlaybackListener>>,
}

impl PlaybackController {
    pub fn new(master: Arc<dyn MediaHandle>, master_src: Option<String>, options: PlaybackOptions) -> Self {
        Self {
            master,
            master_src,
            options,
            state: PlaybackState::Idle,
            observer: None,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Arc<dyn PlaybackListener>) {
        self.listeners.push(listener);
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Clip whose window the end-of-window observer currently enforces
    pub fn observed_clip(&self) -> Option<&str> {
        self.observer.as_ref().map(|observer| observer.clip_id.as_str())
    }

    /// Snapshot of controller and element state
    pub fn session(&self) -> PlaybackSession {
        PlaybackSession {
            clip_id: self.state.clip_id().map(str::to_string),
            playing: self.state.is_playing(),
            current_time: self.master.current_time(),
            paused: self.master.is_paused(),
        }
    }

    /// Source locator the master element should hold for this clip
    pub fn expected_source(&self, clip: &Clip) -> Option<String> {
        let base = self.master_src.as_deref()?;
        if self.options.use_fragments && self.master.supports_fragments() {
            Some(fragment_source(base, clip.start_sec(), clip.end_sec()))
        } else {
            Some(base.to_string())
        }
    }

    fn preflight(&self, clip: &Clip) -> Result<String, PlaybackOutcome> {
        if let Some(url) = clip.playback_url() {
            return Err(PlaybackOutcome::Standalone(url.to_string()));
        }
        let src = self
            .expected_source(clip)
            .ok_or(PlaybackOutcome::Skipped(SkipReason::NoMasterSource))?;
        if !self.master.is_attached() {
            return Err(PlaybackOutcome::Skipped(SkipReason::HandleDetached));
        }
        Ok(src)
    }

    /// Rebind the master element to the source, seek to the clip start and play.
    ///
    /// The playing flag is only raised once the element confirms playback.
    pub async fn play_from_start(&mut self, clip: &Clip) -> PlaybackOutcome {
        let src = match self.preflight(clip) {
            Ok(src) => src,
            Err(outcome) => return outcome,
        };

        if !self.master.is_paused() {
            self.master.pause();
        }
        self.master.set_source(&src);
        self.master.load();
        self.master.seek(clip.start_sec());
        self.bind_observer(clip);
        self.transition(PlaybackState::Loading {
            clip_id: clip.id().to_string(),
        });

        match self.master.play().await {
            Ok(()) => {
                info!(clip = clip.id(), start = clip.start_sec(), end = clip.end_sec(), "Playing clip");
                self.transition(PlaybackState::Playing {
                    clip_id: clip.id().to_string(),
                });
                PlaybackOutcome::Playing
            }
            Err(err) => self.reject(clip, err),
        }
    }

    /// Seek the already-bound master element back to the clip start and play.
    ///
    /// The playing flag is raised before the play request resolves. Falls back
    /// to [`play_from_start`](Self::play_from_start) when the element is not
    /// bound to this clip's source.
    pub async fn replay(&mut self, clip: &Clip) -> PlaybackOutcome {
        let src = match self.preflight(clip) {
            Ok(src) => src,
            Err(outcome) => return outcome,
        };

        if self.master.source().as_deref() != Some(src.as_str()) {
            debug!(clip = clip.id(), "Master not bound for replay, reloading");
            return self.play_from_start(clip).await;
        }

        self.master.seek(clip.start_sec());
        self.bind_observer(clip);
        self.transition(PlaybackState::Playing {
            clip_id: clip.id().to_string(),
        });

        match self.master.play().await {
            Ok(()) => PlaybackOutcome::Playing,
            Err(err) => self.reject(clip, err),
        }
    }

    /// Feed a media event from the master element
    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate(position) => self.on_time_update(position),
            MediaEvent::Ended => {
                if !self.ended_is_current() {
                    debug!("Ignoring end of media queued before the last rebind");
                    return;
                }
                debug!("Master reached end of media");
                self.transition(PlaybackState::Idle);
            }
            MediaEvent::Paused => {
                // The element was rebound and restarted after this pause.
                if !self.master.is_paused() {
                    return;
                }
                if self.state != PlaybackState::Idle {
                    debug!("Master paused externally");
                    self.transition(PlaybackState::Idle);
                }
            }
        }
    }

    /// An end-of-media event only counts while the element is still stopped
    /// at the end of the source or past the bound window
    fn ended_is_current(&self) -> bool {
        if !self.master.is_paused() {
            return false;
        }

        let position = self.master.current_time();
        let at_source_end = self
            .master
            .duration()
            .map_or(false, |duration| position >= duration);
        let past_window = self
            .observer
            .as_ref()
            .map_or(false, |observer| observer.window.is_exhausted_at(position));
        at_source_end || past_window
    }

    /// Detach the observer and stop driving the master element
    pub fn teardown(&mut self) {
        self.observer = None;
        if self.master.is_attached() && !self.master.is_paused() {
            self.master.pause();
        }
        self.transition(PlaybackState::Idle);
    }

    fn on_time_update(&mut self, position: f64) {
        let Some(observer) = &self.observer else {
            return;
        };

        // Reports queued before a re-seek are stale; trust the live position.
        if !observer.window.is_exhausted_at(position)
            || !observer.window.is_exhausted_at(self.master.current_time())
        {
            return;
        }

        debug!(clip = %observer.clip_id, position, "Reached end of clip window");
        self.master.pause();
        self.transition(PlaybackState::Idle);
    }

    fn bind_observer(&mut self, clip: &Clip) {
        self.observer = Some(WindowObserver {
            clip_id: clip.id().to_string(),
            window: clip.window(),
        });
    }

    fn reject(&mut self, clip: &Clip, err: DomainError) -> PlaybackOutcome {
        warn!(clip = clip.id(), "Playback did not start: {}", err);
        for listener in &self.listeners {
            listener.on_playback_error(clip.id(), &err);
        }
        self.transition(PlaybackState::Idle);
        PlaybackOutcome::Rejected(err)
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state == next {
            return;
        }

        let previous = std::mem::replace(&mut self.state, next);
        debug!(from = ?previous, to = ?self.state, "Playback state change");
        for listener in &self.listeners {
            listener.on_state_change(&previous, &self.state);
        }
    }
}

/// Play a clip that carries its own media on a dedicated handle, unbounded
pub async fn play_standalone(handle: &dyn MediaHandle, url: &str) -> Result<(), DomainError> {
    if !handle.is_attached() {
        return Err(DomainError::PlaybackStart("media element was disposed".to_string()));
    }
    handle.set_source(url);
    handle.load();
    handle.play().await
}
