#![forbid(unsafe_code)]

use gs_storage::{GridError, StoreError};
use serde_json::{Value, json};

pub(crate) fn warning(code: &str, message: &str, recovery: &str) -> Value {
    json!({
        "code": code,
        "message": message,
        "recovery": recovery
    })
}

pub(crate) fn ai_ok_with_warnings(intent: &str, result: Value, warnings: Vec<Value>) -> Value {
    json!({
        "success": true,
        "intent": intent,
        "result": result,
        "warnings": warnings,
        "error": null
    })
}

pub(crate) fn ai_ok(intent: &str, result: Value) -> Value {
    ai_ok_with_warnings(intent, result, Vec::new())
}

pub(crate) fn ai_error(code: &str, message: &str) -> Value {
    ai_error_with(code, message, None)
}

pub(crate) fn ai_error_with(code: &str, message: &str, recovery: Option<&str>) -> Value {
    let mut error_obj = serde_json::Map::new();
    error_obj.insert("code".to_string(), Value::String(code.to_string()));
    error_obj.insert(
        "message".to_string(),
        Value::String(message.trim().to_string()),
    );
    if let Some(recovery) = recovery {
        error_obj.insert(
            "recovery".to_string(),
            Value::String(recovery.trim().to_string()),
        );
    }

    json!({
        "success": false,
        "intent": "error",
        "result": {},
        "warnings": [],
        "error": Value::Object(error_obj)
    })
}

pub(crate) fn format_store_error(err: &StoreError) -> String {
    match err {
        StoreError::NotFound(what) => format!("Not found: {what}"),
        StoreError::Schema(msg) => format!("Schema: {msg}"),
        StoreError::InvalidInput(msg) => format!("Invalid input: {msg}"),
        StoreError::Transport { context, source } => match source {
            GridError::Status { status, message } => {
                format!("Could not {context}: HTTP {status}: {message}")
            }
            other => format!("Could not {context}: {other}"),
        },
    }
}

fn recovery_hint(err: &StoreError) -> &'static str {
    match err {
        StoreError::NotFound(_) => {
            "Call gsheets_load_hypotheses to list the existing IDs, or gsheets_describe to see which table was resolved."
        }
        StoreError::Schema(_) => {
            "Fix the header row of the table: it needs exactly one \"ID\" column and unique header names."
        }
        StoreError::InvalidInput(_) => {
            "Send field values as strings, numbers or booleans; percent fields take 0..100."
        }
        StoreError::Transport {
            source: GridError::Status { status: 401 | 403, .. },
            ..
        } => "Refresh GOOGLE_SHEETS_ACCESS_TOKEN and make sure it can access the spreadsheet.",
        StoreError::Transport { .. } => "Check network access to the Sheets API, then retry.",
    }
}

pub(crate) fn store_error_response(err: &StoreError) -> Value {
    ai_error_with(err.code(), &format_store_error(err), Some(recovery_hint(err)))
}
