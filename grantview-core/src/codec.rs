//! Double-encoded widget payloads: `{ "Data": "<json string>" }` where the
//! inner string decodes to `{ "Items": [...] }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CodecError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    #[serde(rename = "Data")]
    pub data: String,
}

#[derive(Serialize)]
struct ItemsRef<'a, T> {
    #[serde(rename = "Items")]
    items: &'a [T],
}

/// Decodes a response body. Never fails: any malformed layer yields an empty
/// sequence, and individual entries that do not fit `T` are skipped.
pub fn decode<T: DeserializeOwned>(raw: &Value) -> Vec<T> {
    let Some(data) = raw.get("Data").and_then(Value::as_str) else {
        debug!("response carries no Data string");
        return Vec::new();
    };

    let inner: Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to parse wrapped Data");
            return Vec::new();
        }
    };

    let Some(items) = inner.get("Items").and_then(Value::as_array) else {
        debug!("wrapped Data has no Items array");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping malformed entry");
                None
            }
        })
        .collect()
}

/// Inverse of [`decode`].
pub fn encode<T: Serialize>(entries: &[T]) -> Result<Envelope, CodecError> {
    let data = serde_json::to_string(&ItemsRef { items: entries })?;
    Ok(Envelope { data })
}
