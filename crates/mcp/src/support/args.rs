#![forbid(unsafe_code)]

use super::ai::ai_error;
use serde_json::Value;

pub(crate) fn args_object(args: &Value) -> Result<&serde_json::Map<String, Value>, Value> {
    match args {
        Value::Object(obj) => Ok(obj),
        _ => Err(ai_error("INVALID_INPUT", "arguments must be an object")),
    }
}

/// Required string; blank values are rejected.
pub(crate) fn require_string(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<String, Value> {
    let Some(v) = args.get(key).and_then(|v| v.as_str()) else {
        return Err(ai_error("INVALID_INPUT", &format!("{key} is required")));
    };
    if v.trim().is_empty() {
        return Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must not be empty"),
        ));
    }
    Ok(v.to_string())
}

pub(crate) fn optional_string(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<String>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::String(v) => Ok(Some(v.to_string())),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a string"),
        )),
    }
}

pub(crate) fn require_f64(args: &serde_json::Map<String, Value>, key: &str) -> Result<f64, Value> {
    match args.get(key) {
        None | Some(Value::Null) => {
            Err(ai_error("INVALID_INPUT", &format!("{key} is required")))
        }
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ai_error("INVALID_INPUT", &format!("{key} must be a number"))),
        Some(_) => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a number"),
        )),
    }
}

pub(crate) fn optional_string_array(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<String>>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    let Some(arr) = value.as_array() else {
        return Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be an array of strings"),
        ));
    };
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        let Some(s) = item.as_str() else {
            return Err(ai_error(
                "INVALID_INPUT",
                &format!("{key} must be an array of strings"),
            ));
        };
        out.push(s.to_string());
    }
    Ok(Some(out))
}
