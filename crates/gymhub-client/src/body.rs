//! Response body shapes accepted from the backend.
//!
//! Some deployments answer with a bare value, others wrap it as
//! `{ "success": true, "data": ... }`. Both are accepted.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use gymhub_core::error::AppError;

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

/// Decode a bare or wrapped JSON body.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let envelope: Envelope<T> = serde_json::from_slice(bytes).map_err(|e| {
        AppError::serialization(format!("Unexpected response body from backend: {e}"))
    })?;
    Ok(match envelope {
        Envelope::Wrapped { data } => data,
        Envelope::Bare(value) => value,
    })
}

/// Decode an optional body: empty or non-matching bodies yield `None`.
pub fn decode_optional<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    decode(bytes).ok()
}
