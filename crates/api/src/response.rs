//! Status response envelope validation.

use crate::{ApiError, ApiResult};
use serde_json::Value;

/// Key holding the list of tracked records in a status response.
pub const HOMEWORKS_KEY: &str = "homeworks";

/// Pull the list of raw records out of a decoded response body.
///
/// An empty list is valid and means there are no updates since the cursor.
pub fn extract_tracked_records(body: Value) -> ApiResult<Vec<Value>> {
    let Value::Object(mut map) = body else {
        return Err(ApiError::InvalidHomeworks);
    };

    match map.remove(HOMEWORKS_KEY) {
        None => Err(ApiError::MissingHomeworks),
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(ApiError::InvalidHomeworks),
    }
}

/// Server time reported alongside the records, if present.
pub fn current_date(body: &Value) -> Option<i64> {
    body.get("current_date").and_then(Value::as_i64)
}
