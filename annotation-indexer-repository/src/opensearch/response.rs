//! Parsing of OpenSearch bulk responses.
//!
//! A bulk response carries one entry per action, keyed by the action verb:
//!
//! ```json
//! {"errors": true, "items": [
//!   {"create": {"_id": "a1", "status": 201}},
//!   {"create": {"_id": "a2", "status": 409,
//!               "error": {"type": "version_conflict_engine_exception", "reason": "..."}}}
//! ]}
//! ```

use annotation_indexer_shared::{BulkAction, BulkItemError, BulkItemResult, OpType};
use serde_json::Value;

use crate::errors::SearchIndexError;

/// Error types the backend uses for a `create` hitting an existing document.
const ALREADY_EXISTS_ERROR_TYPES: [&str; 2] = [
    "version_conflict_engine_exception",
    "document_already_exists_exception",
];

/// Marker of the same condition in backends that report errors as plain text.
const ALREADY_EXISTS_REASON: &str = "DocumentAlreadyExistsException";

const STATUS_CONFLICT: u16 = 409;

/// Turn a bulk response body into one result per action.
///
/// Items are matched to `actions` by position; the item's own `_id` wins when
/// present.
pub fn parse_bulk_response(
    actions: &[BulkAction],
    body: &Value,
) -> Result<Vec<BulkItemResult>, SearchIndexError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Bulk response has no items array"))?;

    if items.len() != actions.len() {
        return Err(SearchIndexError::parse(format!(
            "Bulk response has {} items for {} actions",
            items.len(),
            actions.len()
        )));
    }

    items
        .iter()
        .zip(actions)
        .map(|(item, action)| parse_item(item, action))
        .collect()
}

fn parse_item(item: &Value, action: &BulkAction) -> Result<BulkItemResult, SearchIndexError> {
    let detail = item
        .get(action.op_type.as_str())
        .or_else(|| item.as_object().and_then(|o| o.values().next()))
        .ok_or_else(|| SearchIndexError::parse(format!("Malformed bulk item: {}", item)))?;

    let id = detail
        .get("_id")
        .and_then(Value::as_str)
        .unwrap_or(action.id.as_str())
        .to_string();
    let status = detail
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(0);

    match detail.get("error") {
        Some(error) if !error.is_null() => Ok(BulkItemResult::failed(
            id,
            action.op_type,
            status,
            classify_item_error(action.op_type, status, error),
        )),
        _ if status >= 300 => Ok(BulkItemResult::failed(
            id,
            action.op_type,
            status,
            classify_item_error(
                action.op_type,
                status,
                &Value::String(format!("status {}", status)),
            ),
        )),
        _ => Ok(BulkItemResult::ok(id, action.op_type, status)),
    }
}

/// Classify the `error` of a failed bulk item.
///
/// Only `create` actions can be classified as `DocumentAlreadyExists`.
pub fn classify_item_error(op_type: OpType, status: u16, error: &Value) -> BulkItemError {
    let (error_type, reason) = match error {
        Value::String(reason) => (None, reason.clone()),
        other => (
            other.get("type").and_then(Value::as_str),
            other
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        ),
    };

    let already_exists = op_type == OpType::Create
        && (status == STATUS_CONFLICT
            || error_type.is_some_and(|t| ALREADY_EXISTS_ERROR_TYPES.contains(&t))
            || reason.contains(ALREADY_EXISTS_REASON));

    if already_exists {
        BulkItemError::already_exists(reason)
    } else {
        BulkItemError::other(reason)
    }
}
