//! Locating the clip collection inside a provider payload

use serde_json::Value;

use crate::domain::errors::DomainError;

/// Keys that may hold the clip array when the payload is an object, in priority order
pub const ENVELOPE_KEYS: &[&str] = &["clips", "highlights"];

/// Return the raw record sequence carried by the payload.
///
/// Accepts a bare array, `{ "clips": [...] }` or `{ "highlights": [...] }`.
pub fn unwrap_records(payload: &Value) -> Result<&[Value], DomainError> {
    match payload {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Object(map) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .ok_or_else(missing_clips),
        _ => Err(missing_clips()),
    }
}

fn missing_clips() -> DomainError {
    DomainError::MalformedPayload("Analysis response did not include any clips".to_string())
}
