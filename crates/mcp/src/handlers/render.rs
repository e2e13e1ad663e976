#![forbid(unsafe_code)]

use crate::ai_error;
use gs_core::{FieldUpdates, Record};
use gs_storage::{UpdateReceipt, cell_from_json, cell_to_json};
use serde_json::{Map, Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Named fields in column order; empty cells render as `""`.
pub(crate) fn record_json(record: &Record) -> Value {
    Value::Object(
        record
            .fields()
            .map(|(name, value)| (name.to_string(), cell_to_json(value)))
            .collect::<Map<String, Value>>(),
    )
}

/// Write confirmation; `updated_at` is RFC3339 in UTC.
pub(crate) fn receipt_json(receipt: &UpdateReceipt, updated_at: OffsetDateTime) -> Value {
    let updated_at = updated_at
        .to_offset(time::UtcOffset::UTC)
        .format(&Rfc3339)
        .ok();
    json!({
        "table": receipt.table,
        "hypothesis_id": receipt.id,
        "row_number": receipt.row_number,
        "range": receipt.range,
        "applied": receipt.applied,
        "ignored": receipt.ignored,
        "updated_at": updated_at,
    })
}

/// Accepts either `updates` (object) or `updates_json` (object encoded as a string).
pub(crate) fn updates_from_args(args: &Map<String, Value>) -> Result<FieldUpdates, Value> {
    let inline = args.get("updates").filter(|v| !v.is_null());
    let encoded = args.get("updates_json").filter(|v| !v.is_null());

    let parsed;
    let object = match (inline, encoded) {
        (Some(_), Some(_)) => {
            return Err(ai_error(
                "INVALID_INPUT",
                "pass either updates or updates_json, not both",
            ));
        }
        (None, None) => {
            return Err(ai_error(
                "INVALID_INPUT",
                "updates (object) or updates_json (string) is required",
            ));
        }
        (Some(value), None) => value.as_object().ok_or_else(|| {
            ai_error("INVALID_INPUT", "updates must be an object of field -> value")
        })?,
        (None, Some(value)) => {
            let Some(raw) = value.as_str() else {
                return Err(ai_error("INVALID_INPUT", "updates_json must be a string"));
            };
            parsed = serde_json::from_str::<Value>(raw).map_err(|e| {
                ai_error("INVALID_INPUT", &format!("updates_json is not valid JSON: {e}"))
            })?;
            parsed.as_object().ok_or_else(|| {
                ai_error(
                    "INVALID_INPUT",
                    "updates_json must encode an object of field -> value",
                )
            })?
        }
    };

    let mut updates = FieldUpdates::new();
    for (name, value) in object {
        let Some(cell) = cell_from_json(value) else {
            return Err(ai_error(
                "INVALID_INPUT",
                &format!("value for {name:?} must be a string, number, boolean or null"),
            ));
        };
        updates.insert(name.trim(), cell);
    }
    Ok(updates)
}
