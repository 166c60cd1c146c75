//! Bounded playback of clip windows out of a shared master media element

use serde::Serialize;

use crate::domain::errors::DomainError;

pub mod controller;
pub mod fragment;

pub use controller::{play_standalone, PlaybackController, PlaybackOptions};

/// Controller state machine: `Idle -> Loading -> Playing -> Idle`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Loading { clip_id: String },
    Playing { clip_id: String },
}

impl PlaybackState {
    /// The "is playing" flag shown by the UI
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing { .. })
    }

    /// Clip currently driving the master element
    pub fn clip_id(&self) -> Option<&str> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Loading { clip_id } | PlaybackState::Playing { clip_id } => Some(clip_id),
        }
    }
}

/// Snapshot of the current playback session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSession {
    pub clip_id: Option<String>,
    pub playing: bool,
    pub current_time: f64,
    pub paused: bool,
}

/// Why a play action did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoMasterSource,
    HandleDetached,
}

/// Result of a play or replay action
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackOutcome {
    /// Master element is playing the clip window
    Playing,
    /// The element refused to start; state is back to idle
    Rejected(DomainError),
    /// Nothing to drive
    Skipped(SkipReason),
    /// Clip has its own media; play it with [`play_standalone`]
    Standalone(String),
}

/// Receives state transitions from the controller
pub trait PlaybackListener: Send + Sync {
    /// Called after every state change
    fn on_state_change(&self, previous: &PlaybackState, current: &PlaybackState);

    /// Called when a play request was rejected
    fn on_playback_error(&self, _clip_id: &str, _error: &DomainError) {}
}
