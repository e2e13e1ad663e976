#![forbid(unsafe_code)]

use serde_json::{Value, json};

pub(crate) fn handler_definitions() -> Vec<Value> {
    let mut handlers = vec![
        json!({
            "name": "gsheets_load_hypotheses",
            "description": "Load every hypothesis row from the sheet whose header row has the required columns.",
            "inputSchema": { "type": "object", "properties": {}, "required": [] }
        }),
        json!({
            "name": "gsheets_get_hypothesis",
            "description": "Fetch one hypothesis by the exact value of its ID column.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "hypothesis_id": { "type": "string" }
                },
                "required": ["hypothesis_id"]
            }
        }),
        json!({
            "name": "gsheets_update_hypotheses",
            "description": "Merge field updates into one hypothesis row and rewrite the row. Unknown fields and ID are ignored; 'Confidence %' takes 0-100.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "hypothesis_id": { "type": "string" },
                    "updates": {
                        "type": "object",
                        "additionalProperties": { "type": ["string", "number", "boolean", "null"] }
                    },
                    "updates_json": {
                        "type": "string",
                        "description": "JSON object of field -> value (alternative to updates)."
                    }
                },
                "required": ["hypothesis_id"]
            }
        }),
        json!({
            "name": "gsheets_record_analysis",
            "description": "Write an analysis result: reasoning, confidence score, up to two quotes, and a status derived from the score (>=80 VALIDATED, <50 NOT_VALIDATED).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "hypothesis_id": { "type": "string" },
                    "confidence_score": { "type": "number", "minimum": 0, "maximum": 100 },
                    "reasoning": { "type": "string" },
                    "relevant_quotes": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["hypothesis_id", "confidence_score"]
            }
        }),
        json!({
            "name": "gsheets_describe",
            "description": "Show the resolved table, its headers, the ID column letter and the value transforms.",
            "inputSchema": { "type": "object", "properties": {}, "required": [] }
        }),
    ];
    handlers.sort_by_key(|tool| {
        tool.get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    });
    handlers
}
