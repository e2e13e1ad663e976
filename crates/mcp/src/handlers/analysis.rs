#![forbid(unsafe_code)]

use super::render::receipt_json;
use crate::*;
use gs_core::{CellValue, FieldUpdates};
use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing::error;

const VALIDATED_AT: f64 = 80.0;
const NOT_VALIDATED_BELOW: f64 = 50.0;

/// Status implied by a confidence score; scores in between leave the status as is.
pub(crate) fn status_for_score(score: f64) -> Option<&'static str> {
    if score >= VALIDATED_AT {
        Some("VALIDATED")
    } else if score < NOT_VALIDATED_BELOW {
        Some("NOT_VALIDATED")
    } else {
        None
    }
}

/// Field updates written for one analysis. Quotes beyond the second are dropped.
pub(crate) fn analysis_updates(score: f64, reasoning: &str, quotes: &[String]) -> FieldUpdates {
    let quote = |index: usize| quotes.get(index).cloned().unwrap_or_default();
    let mut updates = FieldUpdates::new()
        .set("Confidence", reasoning)
        .set("Confidence %", CellValue::Number(score))
        .set("Quote 1", quote(0))
        .set("Quote 2", quote(1));
    if let Some(status) = status_for_score(score) {
        updates.insert("Status", status);
    }
    updates
}

impl McpServer {
    pub(crate) fn tool_record_analysis(&mut self, args: Value) -> Value {
        let args_obj = match args_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let id = match require_string(args_obj, "hypothesis_id") {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let score = match require_f64(args_obj, "confidence_score") {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        if !(0.0..=100.0).contains(&score) {
            return ai_error("INVALID_INPUT", "confidence_score must be between 0 and 100");
        }
        let reasoning = match optional_string(args_obj, "reasoning") {
            Ok(v) => v.unwrap_or_default(),
            Err(resp) => return resp,
        };
        let quotes = match optional_string_array(args_obj, "relevant_quotes") {
            Ok(v) => v.unwrap_or_default(),
            Err(resp) => return resp,
        };

        let updates = analysis_updates(score, &reasoning, &quotes);
        let status = status_for_score(score);
        match self.store.update_record(&id, &updates) {
            Ok(receipt) => {
                let mut warnings = Vec::new();
                if !receipt.ignored.is_empty() {
                    warnings.push(warning(
                        "FIELDS_IGNORED",
                        &format!("table has no column for {:?}", receipt.ignored),
                        "Add the missing columns to the header row to record them.",
                    ));
                }
                let mut result = receipt_json(&receipt, OffsetDateTime::now_utc());
                if let Some(obj) = result.as_object_mut() {
                    obj.insert("confidence_score".to_string(), json!(score));
                    obj.insert(
                        "status".to_string(),
                        json!(status.unwrap_or("unchanged")),
                    );
                }
                ai_ok_with_warnings("record_analysis", result, warnings)
            }
            Err(err) => {
                error!(id = %id, code = err.code(), error = %err, "record analysis failed");
                store_error_response(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_thresholds() {
        assert_eq!(status_for_score(100.0), Some("VALIDATED"));
        assert_eq!(status_for_score(80.0), Some("VALIDATED"));
        assert_eq!(status_for_score(79.9), None);
        assert_eq!(status_for_score(50.0), None);
        assert_eq!(status_for_score(49.0), Some("NOT_VALIDATED"));
        assert_eq!(status_for_score(0.0), Some("NOT_VALIDATED"));
    }

    #[test]
    fn analysis_maps_onto_sheet_fields() {
        let updates = analysis_updates(65.0, "mixed signals", &["only one".to_string()]);
        assert_eq!(updates.get("Confidence"), Some(&CellValue::text("mixed signals")));
        assert_eq!(updates.get("Confidence %"), Some(&CellValue::Number(65.0)));
        assert_eq!(updates.get("Quote 1"), Some(&CellValue::text("only one")));
        assert_eq!(updates.get("Quote 2"), Some(&CellValue::text("")));
        assert_eq!(updates.get("Status"), None);

        let quotes = ["a", "b", "c"].map(str::to_string);
        let updates = analysis_updates(90.0, "", &quotes);
        assert_eq!(updates.get("Quote 2"), Some(&CellValue::text("b")));
        assert_eq!(updates.get("Status"), Some(&CellValue::text("VALIDATED")));
        assert_eq!(updates.len(), 5);
    }
}
