//! Clip normalizer
//!
//! Turns an arbitrarily shaped analysis payload into an ordered list of
//! canonical [`Clip`] records. Records that cannot be interpreted are
//! skipped and logged; the batch fails only when nothing survives.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{Clip, ClipWindow, WindowError};

pub mod envelope;
pub mod fields;

pub use envelope::unwrap_records;

/// Which bound of a clip window could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Start => write!(f, "start"),
            Bound::End => write!(f, "end"),
        }
    }
}

/// Per-item normalization failure. Absorbed by the batch driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ItemError {
    #[error("Clip {position} is not an object")]
    NotARecord { position: usize },

    #[error("Clip {position} is missing a valid {bound} time")]
    MissingBound { position: usize, bound: Bound },

    #[error("Clip {position} is missing a title")]
    MissingTitle { position: usize },

    #[error("Clip {position} has an unusable time window: {reason}")]
    InvalidWindow { position: usize, reason: WindowError },
}

impl ItemError {
    /// 1-based position of the offending record in the raw payload
    pub fn position(&self) -> usize {
        match self {
            ItemError::NotARecord { position }
            | ItemError::MissingBound { position, .. }
            | ItemError::MissingTitle { position }
            | ItemError::InvalidWindow { position, .. } => *position,
        }
    }
}

/// Result of a batch normalization
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub clips: Vec<Clip>,
    pub skipped: Vec<ItemError>,
}

/// Normalize a provider payload into canonical clips
pub fn normalize(payload: &Value) -> Result<Vec<Clip>, DomainError> {
    normalize_with_report(payload).map(|normalized| normalized.clips)
}

/// Normalize a provider payload, also reporting the skipped records
pub fn normalize_with_report(payload: &Value) -> Result<Normalized, DomainError> {
    let records = unwrap_records(payload)?;
    let mut normalized = Normalized::default();
    let mut used_ids = synthesized_ids(records);

    for (index, raw) in records.iter().enumerate() {
        match normalize_record(index, raw) {
            Ok(clip) if has_explicit_id(raw) => {
                let clip = ensure_unique_id(clip, index, &mut used_ids);
                normalized.clips.push(clip);
            }
            Ok(clip) => {
                normalized.clips.push(clip);
            }
            Err(err) => {
                warn!(position = err.position(), "Skipping clip: {}", err);
                normalized.skipped.push(err);
            }
        }
    }

    if normalized.clips.is_empty() {
        return Err(DomainError::EmptyResult);
    }

    debug!(
        kept = normalized.clips.len(),
        skipped = normalized.skipped.len(),
        "Normalized analysis payload"
    );
    Ok(normalized)
}

/// Normalize one raw record; `index` is its 0-based position in the payload
pub fn normalize_record(index: usize, raw: &Value) -> Result<Clip, ItemError> {
    let position = index + 1;
    let record = raw.as_object().ok_or(ItemError::NotARecord { position })?;

    let start = fields::start_sec(record);
    let end = fields::end_sec(record, start);
    let start = start.ok_or(ItemError::MissingBound {
        position,
        bound: Bound::Start,
    })?;
    let end = end.ok_or(ItemError::MissingBound {
        position,
        bound: Bound::End,
    })?;

    let title = fields::title(record).ok_or(ItemError::MissingTitle { position })?;
    let window = ClipWindow::new(start, end)
        .map_err(|reason| ItemError::InvalidWindow { position, reason })?;

    let id = fields::explicit_id(record).unwrap_or_else(|| synthesized_id(index));

    let clip = Clip::new(id, &title, window)
        .map_err(|_| ItemError::MissingTitle { position })?
        .with_hashtags(fields::hashtags(record))
        .with_thumbnail_url(fields::thumbnail_url(record))
        .with_playback_url(fields::playback_url(record));

    Ok(clip)
}

fn synthesized_id(index: usize) -> String {
    format!("clip-{}", index)
}

fn has_explicit_id(raw: &Value) -> bool {
    raw.as_object().and_then(fields::explicit_id).is_some()
}

/// Ids handed to records without one. They are claimed up front so an
/// explicit id can never take a position-derived id from a later record.
fn synthesized_ids(records: &[Value]) -> HashSet<String> {
    records
        .iter()
        .enumerate()
        .filter(|(_, raw)| raw.is_object() && !has_explicit_id(raw))
        .map(|(index, _)| synthesized_id(index))
        .collect()
}

fn ensure_unique_id(clip: Clip, index: usize, used: &mut HashSet<String>) -> Clip {
    if used.insert(clip.id().to_string()) {
        return clip;
    }

    let mut replacement = format!("{}-{}", clip.id(), index);
    while used.contains(&replacement) {
        replacement.push_str("-dup");
    }
    warn!(id = clip.id(), replacement = %replacement, "Duplicate clip id");
    used.insert(replacement.clone());
    clip.with_id(replacement)
}
