#![forbid(unsafe_code)]

use super::render::{receipt_json, record_json, updates_from_args};
use crate::*;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing::error;

impl McpServer {
    pub(crate) fn tool_load_hypotheses(&mut self, args: Value) -> Value {
        if let Err(resp) = args_object(&args) {
            return resp;
        }
        match self.store.load_table() {
            Ok(snapshot) => {
                let mut warnings = Vec::new();
                if snapshot.records.is_empty() {
                    warnings.push(warning(
                        "EMPTY_TABLE",
                        &format!("table {:?} has no data rows", snapshot.table),
                        "Add rows below the header row, then load again.",
                    ));
                }
                let records = snapshot.records.iter().map(record_json).collect::<Vec<_>>();
                ai_ok_with_warnings(
                    "load_hypotheses",
                    json!({
                        "table": snapshot.table,
                        "count": records.len(),
                        "records": records,
                    }),
                    warnings,
                )
            }
            Err(err) => {
                error!(code = err.code(), error = %err, "load failed");
                store_error_response(&err)
            }
        }
    }

    pub(crate) fn tool_get_hypothesis(&mut self, args: Value) -> Value {
        let args_obj = match args_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let id = match require_string(args_obj, "hypothesis_id") {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        match self.store.get_record(&id) {
            Ok(record) => ai_ok("get_hypothesis", json!({ "record": record_json(&record) })),
            Err(err) => {
                error!(id = %id, code = err.code(), error = %err, "lookup failed");
                store_error_response(&err)
            }
        }
    }

    pub(crate) fn tool_update_hypotheses(&mut self, args: Value) -> Value {
        let args_obj = match args_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let id = match require_string(args_obj, "hypothesis_id") {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let updates = match updates_from_args(args_obj) {
            Ok(v) => v,
            Err(resp) => return resp,
        };

        match self.store.update_record(&id, &updates) {
            Ok(receipt) => {
                let mut warnings = Vec::new();
                if !receipt.ignored.is_empty() {
                    warnings.push(warning(
                        "FIELDS_IGNORED",
                        &format!(
                            "not written (unknown column or ID): {:?}",
                            receipt.ignored
                        ),
                        "Call gsheets_describe to see the writable column names.",
                    ));
                }
                ai_ok_with_warnings(
                    "update_hypotheses",
                    receipt_json(&receipt, OffsetDateTime::now_utc()),
                    warnings,
                )
            }
            Err(err) => {
                error!(id = %id, code = err.code(), error = %err, "update failed");
                store_error_response(&err)
            }
        }
    }

    pub(crate) fn tool_describe(&mut self, args: Value) -> Value {
        if let Err(resp) = args_object(&args) {
            return resp;
        }
        let schema = self.store.schema();
        let transforms = schema
            .transforms
            .rules()
            .iter()
            .map(|rule| rule.describe())
            .collect::<Vec<_>>();
        let required_headers = schema.required_headers.clone();

        match self.store.describe() {
            Ok(description) => ai_ok(
                "describe",
                json!({
                    "table": description.table,
                    "headers": description.headers,
                    "id_column": description.id_column,
                    "required_headers": required_headers,
                    "transforms": transforms,
                }),
            ),
            Err(err) => {
                error!(code = err.code(), error = %err, "describe failed");
                store_error_response(&err)
            }
        }
    }
}
