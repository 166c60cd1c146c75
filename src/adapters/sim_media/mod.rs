// Simulated media adapter - Clock-driven media element for previews and tests

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::domain::errors::*;
use crate::playback::fragment::parse_fragment;
use crate::ports::*;

struct SimState {
    src: Option<String>,
    paused: bool,
    current_time: f64,
    attached: bool,
    reject_play: bool,
    fragment_end: Option<f64>,
    play_requests: usize,
}

/// Media element whose clock only moves when [`advance`](Self::advance) is called
pub struct SimulatedMediaHandle {
    duration: f64,
    fragments: bool,
    state: Mutex<SimState>,
    events: UnboundedSender<MediaEvent>,
}

impl SimulatedMediaHandle {
    /// Create a handle for a source of the given length and the receiver of its events
    pub fn new(duration: f64, fragments: bool) -> (Self, UnboundedReceiver<MediaEvent>) {
        let (events, receiver) = unbounded_channel();
        let handle = Self {
            duration,
            fragments,
            state: Mutex::new(SimState {
                src: None,
                paused: true,
                current_time: 0.0,
                attached: true,
                reject_play: false,
                fragment_end: None,
                play_requests: 0,
            }),
            events,
        };
        (handle, receiver)
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: MediaEvent) {
        let _ = self.events.send(event);
    }

    /// Make subsequent play requests fail, as an autoplay policy would
    pub fn set_reject_play(&self, reject: bool) {
        self.state().reject_play = reject;
    }

    /// Dispose of the element
    pub fn detach(&self) {
        let mut state = self.state();
        state.attached = false;
        state.paused = true;
    }

    /// Pause from outside the controller, as a user or the OS would
    pub fn external_pause(&self) {
        let was_playing = {
            let mut state = self.state();
            let was_playing = !state.paused;
            state.paused = true;
            was_playing
        };
        if was_playing {
            self.emit(MediaEvent::Paused);
        }
    }

    /// Number of play requests received so far
    pub fn play_requests(&self) -> usize {
        self.state().play_requests
    }

    /// Move the clock forward by `delta` seconds while playing
    pub fn advance(&self, delta: f64) {
        let mut emitted = Vec::new();
        {
            let mut state = self.state();
            if state.paused || !state.attached {
                return;
            }

            let next = state.current_time + delta;
            if let Some(end) = state.fragment_end.filter(|end| next >= *end) {
                state.current_time = end.min(self.duration);
                state.paused = true;
                emitted.push(MediaEvent::TimeUpdate(state.current_time));
                emitted.push(MediaEvent::Paused);
            } else if next >= self.duration {
                state.current_time = self.duration;
                state.paused = true;
                emitted.push(MediaEvent::TimeUpdate(self.duration));
                emitted.push(MediaEvent::Ended);
            } else {
                state.current_time = next;
                emitted.push(MediaEvent::TimeUpdate(next));
            }
        }

        for event in emitted {
            self.emit(event);
        }
    }
}

#[async_trait]
impl MediaHandle for SimulatedMediaHandle {
    fn is_attached(&self) -> bool {
        self.state().attached
    }

    fn source(&self) -> Option<String> {
        self.state().src.clone()
    }

    fn set_source(&self, src: &str) {
        let fragment = parse_fragment(src);
        let mut state = self.state();
        state.src = Some(src.to_string());
        state.paused = true;
        state.current_time = 0.0;
        state.fragment_end = if self.fragments {
            fragment.and_then(|(_, end)| end)
        } else {
            None
        };
    }

    fn load(&self) {
        let start = self
            .source()
            .filter(|_| self.fragments)
            .and_then(|src| parse_fragment(&src))
            .map(|(start, _)| start)
            .unwrap_or(0.0);

        let mut state = self.state();
        state.paused = true;
        state.current_time = start;
    }

    fn pause(&self) {
        self.state().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn current_time(&self) -> f64 {
        self.state().current_time
    }

    fn seek(&self, seconds: f64) {
        let position = seconds.clamp(0.0, self.duration);
        self.state().current_time = position;
        self.emit(MediaEvent::TimeUpdate(position));
    }

    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }

    fn supports_fragments(&self) -> bool {
        self.fragments
    }

    async fn play(&self) -> Result<(), DomainError> {
        let mut state = self.state();
        state.play_requests += 1;

        if !state.attached {
            return Err(DomainError::PlaybackStart("media element was disposed".to_string()));
        }
        if state.src.is_none() {
            return Err(DomainError::PlaybackStart("no source bound".to_string()));
        }
        if state.reject_play {
            return Err(DomainError::PlaybackStart("play request was rejected".to_string()));
        }

        state.paused = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_advance_emits_time_updates() {
        let (handle, mut events) = SimulatedMediaHandle::new(120.0, false);
        handle.set_source("file:///tmp/talk.mp4");
        handle.play().await.unwrap();
        handle.advance(1.5);

        assert_eq!(events.try_recv().unwrap(), MediaEvent::TimeUpdate(1.5));
        assert_eq!(handle.current_time(), 1.5);
    }

    #[tokio::test]
    async fn test_natural_end() {
        let (handle, mut events) = SimulatedMediaHandle::new(10.0, false);
        handle.set_source("file:///tmp/talk.mp4");
        handle.play().await.unwrap();
        handle.advance(12.0);

        assert_eq!(events.try_recv().unwrap(), MediaEvent::TimeUpdate(10.0));
        assert_eq!(events.try_recv().unwrap(), MediaEvent::Ended);
        assert!(handle.is_paused());
    }

    #[tokio::test]
    async fn test_fragment_is_honored() {
        let (handle, mut events) = SimulatedMediaHandle::new(120.0, true);
        handle.set_source("file:///tmp/talk.mp4#t=3,14");
        handle.load();
        assert_eq!(handle.current_time(), 3.0);

        handle.play().await.unwrap();
        handle.advance(20.0);
        assert_eq!(events.try_recv().unwrap(), MediaEvent::TimeUpdate(14.0));
        assert_eq!(events.try_recv().unwrap(), MediaEvent::Paused);
    }

    #[tokio::test]
    async fn test_play_rejections() {
        let (handle, _events) = SimulatedMediaHandle::new(10.0, false);
        assert!(handle.play().await.is_err());

        handle.set_source("file:///tmp/talk.mp4");
        handle.set_reject_play(true);
        assert!(handle.play().await.is_err());
        assert!(handle.is_paused());

        handle.set_reject_play(false);
        handle.detach();
        assert!(handle.play().await.is_err());
        assert_eq!(handle.play_requests(), 3);
    }

    #[tokio::test]
    async fn test_paused_clock_does_not_move() {
        let (handle, mut events) = SimulatedMediaHandle::new(10.0, false);
        handle.set_source("file:///tmp/talk.mp4");
        handle.advance(5.0);
        assert_eq!(handle.current_time(), 0.0);
        assert!(events.try_recv().is_err());
    }
}
