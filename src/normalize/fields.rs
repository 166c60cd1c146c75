//! Field extractors for raw clip records.
//!
//! Each logical field is resolved through a prioritized list of named
//! extractors. An extractor is a pure function from the raw record to an
//! optional value; the first one that yields a value wins.

use serde_json::{Map, Value};

/// Raw record as delivered by the analysis provider
pub type RawRecord = Map<String, Value>;

/// A named, pure field extractor
#[derive(Clone, Copy)]
pub struct Extractor<T> {
    pub name: &'static str,
    pub extract: fn(&RawRecord) -> Option<T>,
}

impl<T> Extractor<T> {
    const fn new(name: &'static str, extract: fn(&RawRecord) -> Option<T>) -> Self {
        Self { name, extract }
    }
}

impl<T> std::fmt::Debug for Extractor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor").field("name", &self.name).finish()
    }
}

/// Apply extractors in order and return the first defined result with the
/// name of the extractor that produced it
pub fn first_match<T>(record: &RawRecord, extractors: &[Extractor<T>]) -> Option<(T, &'static str)> {
    extractors
        .iter()
        .find_map(|extractor| (extractor.extract)(record).map(|value| (value, extractor.name)))
}

/// Coerce a JSON number or numeric string into a finite f64
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn seconds(record: &RawRecord, key: &str) -> Option<f64> {
    record.get(key).and_then(coerce_number)
}

fn millis(record: &RawRecord, key: &str) -> Option<f64> {
    seconds(record, key).map(|ms| ms / 1000.0)
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_field(record: &RawRecord, key: &str) -> Option<String> {
    record.get(key).and_then(non_empty_string)
}

fn nested_url(record: &RawRecord, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_object)
        .and_then(|inner| inner.get("url"))
        .and_then(non_empty_string)
}

pub const START_EXTRACTORS: &[Extractor<f64>] = &[
    Extractor::new("startSec", |r| seconds(r, "startSec")),
    Extractor::new("start_sec", |r| seconds(r, "start_sec")),
    Extractor::new("startSeconds", |r| seconds(r, "startSeconds")),
    Extractor::new("start", |r| seconds(r, "start")),
    Extractor::new("startMs", |r| millis(r, "startMs")),
    Extractor::new("start_ms", |r| millis(r, "start_ms")),
];

pub const END_EXTRACTORS: &[Extractor<f64>] = &[
    Extractor::new("endSec", |r| seconds(r, "endSec")),
    Extractor::new("end_sec", |r| seconds(r, "end_sec")),
    Extractor::new("endSeconds", |r| seconds(r, "endSeconds")),
    Extractor::new("end", |r| seconds(r, "end")),
    Extractor::new("endMs", |r| millis(r, "endMs")),
    Extractor::new("end_ms", |r| millis(r, "end_ms")),
];

/// Durations used to derive the end bound once start is known
pub const DURATION_EXTRACTORS: &[Extractor<f64>] = &[
    Extractor::new("duration", |r| seconds(r, "duration")),
    Extractor::new("durationSec", |r| seconds(r, "durationSec")),
    Extractor::new("durationMs", |r| millis(r, "durationMs")),
];

pub const THUMBNAIL_EXTRACTORS: &[Extractor<String>] = &[
    Extractor::new("thumbnailUrl", |r| string_field(r, "thumbnailUrl")),
    Extractor::new("thumbnail_url", |r| string_field(r, "thumbnail_url")),
    Extractor::new("preview.url", |r| nested_url(r, "preview")),
];

pub const PLAYBACK_EXTRACTORS: &[Extractor<String>] = &[
    Extractor::new("playbackUrl", |r| string_field(r, "playbackUrl")),
    Extractor::new("playback_url", |r| string_field(r, "playback_url")),
    Extractor::new("playback.url", |r| nested_url(r, "playback")),
];

/// Resolve the start bound
pub fn start_sec(record: &RawRecord) -> Option<f64> {
    first_match(record, START_EXTRACTORS).map(|(value, _)| value)
}

/// Resolve the end bound, falling back to `start + duration` when start is known
pub fn end_sec(record: &RawRecord, start: Option<f64>) -> Option<f64> {
    if let Some((value, _)) = first_match(record, END_EXTRACTORS) {
        return Some(value);
    }

    let start = start?;
    first_match(record, DURATION_EXTRACTORS).map(|(duration, _)| start + duration)
}

/// Stringified, trimmed title; None when absent or blank
pub fn title(record: &RawRecord) -> Option<String> {
    let raw = match record.get("title")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };

    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Tags from `hashtags`, else `tags`, else empty
pub fn hashtags(record: &RawRecord) -> Vec<String> {
    let list = record
        .get("hashtags")
        .and_then(Value::as_array)
        .or_else(|| record.get("tags").and_then(Value::as_array));

    list.map(|items| {
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()
    })
    .unwrap_or_default()
}

pub fn thumbnail_url(record: &RawRecord) -> Option<String> {
    first_match(record, THUMBNAIL_EXTRACTORS).map(|(value, _)| value)
}

pub fn playback_url(record: &RawRecord) -> Option<String> {
    first_match(record, PLAYBACK_EXTRACTORS).map(|(value, _)| value)
}

/// Record's own id when it carries a usable one
pub fn explicit_id(record: &RawRecord) -> Option<String> {
    match record.get("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_coerce_number_variants() {
        assert_eq!(coerce_number(&json!(12)), Some(12.0));
        assert_eq!(coerce_number(&json!(" 4.5 ")), Some(4.5));
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!(true)), None);
    }

    #[test]
    fn test_start_priority_order() {
        let r = record(json!({"start": 9, "startSec": 3, "startMs": 1000}));
        assert_eq!(first_match(&r, START_EXTRACTORS), Some((3.0, "startSec")));
    }

    #[test]
    fn test_unparsable_candidate_is_skipped() {
        let r = record(json!({"startSec": "soon", "start": "7.25"}));
        assert_eq!(first_match(&r, START_EXTRACTORS), Some((7.25, "start")));
    }

    #[test]
    fn test_millisecond_fields_are_scaled() {
        let r = record(json!({"start_ms": 1500, "endMs": "4000"}));
        assert_eq!(start_sec(&r), Some(1.5));
        assert_eq!(end_sec(&r, Some(1.5)), Some(4.0));
    }

    #[test]
    fn test_end_from_duration_requires_start() {
        let r = record(json!({"duration": 5}));
        assert_eq!(end_sec(&r, None), None);
        assert_eq!(end_sec(&r, Some(10.0)), Some(15.0));
    }

    #[test]
    fn test_explicit_end_beats_duration() {
        let r = record(json!({"end": 12, "duration": 5}));
        assert_eq!(end_sec(&r, Some(10.0)), Some(12.0));
    }

    #[test]
    fn test_title_stringified_and_trimmed() {
        assert_eq!(title(&record(json!({"title": "  Intro "}))), Some("Intro".to_string()));
        assert_eq!(title(&record(json!({"title": 42}))), Some("42".to_string()));
        assert_eq!(title(&record(json!({"title": "   "}))), None);
        assert_eq!(title(&record(json!({"title": null}))), None);
        assert_eq!(title(&record(json!({}))), None);
    }

    #[test]
    fn test_hashtags_fallback_to_tags() {
        assert_eq!(hashtags(&record(json!({"tags": ["a", "b"]}))), vec!["a", "b"]);
        assert_eq!(
            hashtags(&record(json!({"hashtags": ["#x"], "tags": ["y"]}))),
            vec!["#x"]
        );
        assert_eq!(
            hashtags(&record(json!({"hashtags": "not-a-list", "tags": ["y"]}))),
            vec!["y"]
        );
        assert!(hashtags(&record(json!({}))).is_empty());
    }

    #[test]
    fn test_media_hints() {
        let r = record(json!({
            "thumbnail_url": "https://img/1.jpg",
            "playback": {"url": "https://cdn/1.mp4"}
        }));
        assert_eq!(thumbnail_url(&r), Some("https://img/1.jpg".to_string()));
        assert_eq!(playback_url(&r), Some("https://cdn/1.mp4".to_string()));

        let nested = record(json!({"preview": {"url": "https://img/2.jpg"}}));
        assert_eq!(thumbnail_url(&nested), Some("https://img/2.jpg".to_string()));
        assert_eq!(playback_url(&nested), None);
    }

    #[test]
    fn test_explicit_id() {
        assert_eq!(explicit_id(&record(json!({"id": "c1"}))), Some("c1".to_string()));
        assert_eq!(explicit_id(&record(json!({"id": 7}))), Some("7".to_string()));
        assert_eq!(explicit_id(&record(json!({"id": ""}))), None);
        assert_eq!(explicit_id(&record(json!({}))), None);
    }
}
