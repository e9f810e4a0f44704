//! Shallow JSON merge for partial updates.
//!
//! Partial updates replace top-level fields wholesale: nested objects and
//! arrays in the partial overwrite the existing value rather than merging
//! into it. Last write wins; there is no concurrency token.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::validate::ValidationError;

/// Apply a partial JSON object onto a typed record, returning the merged
/// record.
///
/// Fails with a validation error when the partial is not a JSON object or
/// when the merged document no longer deserializes into `T` (a wrong-typed
/// field from the caller).
pub fn apply_partial<T>(current: &T, partial: Value) -> Result<T, ValidationError>
where
    T: Serialize + DeserializeOwned,
{
    let partial_map = match partial {
        Value::Object(map) => map,
        _ => {
            return Err(ValidationError::single(
                "body",
                "partial update must be a JSON object",
            ))
        }
    };

    let mut base = match serde_json::to_value(current) {
        Ok(Value::Object(map)) => map,
        _ => {
            return Err(ValidationError::single(
                "body",
                "record does not serialize to a JSON object",
            ))
        }
    };

    for (key, value) in partial_map {
        base.insert(key, value);
    }

    serde_json::from_value(Value::Object(base))
        .map_err(|e| ValidationError::single("body", &e.to_string()))
}
