//! Highlight reel library
//!
//! Turns the loosely shaped clip payloads returned by a video analysis service
//! into canonical clips, and plays each clip as a bounded window of one shared
//! master media element.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod normalize;
pub mod playback;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{AnalyzeRequest, AnalyzeResponse, Clip, ClipWindow, MediaSource, SourceInfo};
pub use error::{ReelError, ReelResult};
pub use normalize::{normalize, normalize_with_report, ItemError, Normalized};
pub use playback::{PlaybackController, PlaybackOptions, PlaybackOutcome, PlaybackState};
