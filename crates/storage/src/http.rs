#![forbid(unsafe_code)]

use crate::grid::{Grid, GridSource, WriteMode, grid_from_json, grid_to_json};
use crate::store::GridError;
use gs_core::A1Range;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";

#[derive(Clone, Debug)]
pub struct HttpGridConfig {
    pub api_base: String,
    pub spreadsheet_id: String,
    /// Pre-acquired OAuth bearer token.
    pub access_token: String,
    pub timeout: Duration,
}

/// Blocking client for the Sheets v4 `values` API.
pub struct HttpGrid {
    agent: ureq::Agent,
    api_base: String,
    spreadsheet_id: String,
    authorization: String,
}

impl std::fmt::Debug for HttpGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token stays out of logs.
        f.debug_struct("HttpGrid")
            .field("api_base", &self.api_base)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish_non_exhaustive()
    }
}

impl HttpGrid {
    pub fn new(config: HttpGridConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self {
            agent,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id,
            authorization: format!("Bearer {}", config.access_token),
        }
    }

    fn spreadsheet_url(&self) -> String {
        format!(
            "{}/spreadsheets/{}",
            self.api_base,
            urlencoding::encode(&self.spreadsheet_id)
        )
    }

    fn values_url(&self, range: &A1Range) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(),
            urlencoding::encode(&range.to_string())
        )
    }

    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, GridError> {
        let mut request = self
            .agent
            .get(url)
            .set("Authorization", &self.authorization);
        for (key, value) in query {
            request = request.query(key, value);
        }
        read_json(request.call())
    }
}

fn read_json(result: Result<ureq::Response, ureq::Error>) -> Result<Value, GridError> {
    match result {
        Ok(response) => response
            .into_json::<Value>()
            .map_err(|e| GridError::Malformed(e.to_string())),
        Err(ureq::Error::Status(status, response)) => {
            let message = response
                .into_string()
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            Err(GridError::Status {
                status,
                message: error_message(&message),
            })
        }
        Err(ureq::Error::Transport(err)) => Err(GridError::Transport(err.to_string())),
    }
}

/// Google error bodies look like `{"error": {"message": ...}}`; fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn parse_table_titles(body: &Value) -> Vec<String> {
    body.get("sheets")
        .and_then(|v| v.as_array())
        .map(|sheets| {
            sheets
                .iter()
                .filter_map(|sheet| {
                    sheet
                        .get("properties")
                        .and_then(|p| p.get("title"))
                        .and_then(|t| t.as_str())
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_values(body: &Value) -> Result<Grid, GridError> {
    match body.get("values") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(values) => grid_from_json(values),
    }
}

impl GridSource for HttpGrid {
    fn list_tables(&self) -> Result<Vec<String>, GridError> {
        let body = self.get_json(
            &self.spreadsheet_url(),
            &[("fields", "sheets.properties.title")],
        )?;
        Ok(parse_table_titles(&body))
    }

    fn read_range(&self, range: &A1Range) -> Result<Grid, GridError> {
        debug!(range = %range, "GET values");
        let body = self.get_json(&self.values_url(range), &[("majorDimension", "ROWS")])?;
        parse_values(&body)
    }

    fn write_range(
        &mut self,
        range: &A1Range,
        values: Grid,
        mode: WriteMode,
    ) -> Result<(), GridError> {
        debug!(range = %range, mode = mode.as_str(), "PUT values");
        let body = json!({
            "range": range.to_string(),
            "majorDimension": "ROWS",
            "values": grid_to_json(&values),
        });
        let result = self
            .agent
            .put(&self.values_url(range))
            .set("Authorization", &self.authorization)
            .query("valueInputOption", mode.as_str())
            .send_json(body);
        read_json(result).map(|_| ())
    }
}
