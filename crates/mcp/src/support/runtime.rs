#![forbid(unsafe_code)]

use super::logging::DEFAULT_LOG_LEVEL;
use gs_core::schema::{HYPOTHESIS_PERCENT_FIELDS, HYPOTHESIS_REQUIRED_HEADERS};
use gs_storage::DEFAULT_API_BASE;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Where rows come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Backend {
    Fixture(PathBuf),
    Remote {
        spreadsheet_id: String,
        access_token: String,
        api_base: String,
        timeout: Duration,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RuntimeConfig {
    pub(crate) backend: Backend,
    pub(crate) required_headers: Vec<String>,
    pub(crate) percent_fields: Vec<String>,
    pub(crate) log_level: String,
}

impl RuntimeConfig {
    pub(crate) fn from_process() -> Result<Self, String> {
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::parse(&args, |key| std::env::var(key).ok())
    }

    /// Flags win over environment variables; blank values count as unset.
    pub(crate) fn parse(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let lookup = |flag: &str, key: &str| -> Result<Option<String>, String> {
            match flag_value(args, flag)? {
                Some(value) => Ok(Some(value)),
                None => Ok(env(key).filter(|v| !v.trim().is_empty())),
            }
        };

        let backend = match lookup("--fixture", "GSHEET_MCP_FIXTURE")? {
            Some(path) => Backend::Fixture(PathBuf::from(path)),
            None => {
                let Some(spreadsheet_id) =
                    lookup("--spreadsheet-id", "GOOGLE_SHEETS_SPREADSHEET_ID")?
                else {
                    return Err(
                        "missing spreadsheet id: pass --spreadsheet-id or set GOOGLE_SHEETS_SPREADSHEET_ID (or use --fixture)"
                            .to_string(),
                    );
                };
                let Some(access_token) =
                    env("GOOGLE_SHEETS_ACCESS_TOKEN").filter(|v| !v.trim().is_empty())
                else {
                    return Err("missing access token: set GOOGLE_SHEETS_ACCESS_TOKEN".to_string());
                };
                let api_base = lookup("--api-base", "GSHEET_API_BASE")?
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
                let timeout_ms = match lookup("--timeout-ms", "GSHEET_TIMEOUT_MS")? {
                    Some(raw) => parse_timeout_ms(&raw)?,
                    None => DEFAULT_TIMEOUT_MS,
                };
                Backend::Remote {
                    spreadsheet_id: spreadsheet_id.trim().to_string(),
                    access_token: access_token.trim().to_string(),
                    api_base,
                    timeout: Duration::from_millis(timeout_ms),
                }
            }
        };

        let required_headers = match lookup("--required-headers", "GSHEET_REQUIRED_HEADERS")? {
            Some(raw) => {
                let list = parse_list(&raw);
                if list.is_empty() {
                    return Err("--required-headers must name at least one header".to_string());
                }
                list
            }
            None => to_owned_list(&HYPOTHESIS_REQUIRED_HEADERS),
        };
        let percent_fields = match lookup("--percent-fields", "GSHEET_PERCENT_FIELDS")? {
            Some(raw) => parse_list(&raw),
            None => to_owned_list(&HYPOTHESIS_PERCENT_FIELDS),
        };
        let log_level = lookup("--log-level", "GSHEET_MCP_LOG")?
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            backend,
            required_headers,
            percent_fields,
            log_level,
        })
    }
}

fn flag_value(args: &[String], flag: &str) -> Result<Option<String>, String> {
    let mut found = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            let Some(value) = iter.next() else {
                return Err(format!("{flag} requires a value"));
            };
            found = Some(value.clone());
        } else if let Some(value) = arg
            .strip_prefix(flag)
            .and_then(|rest| rest.strip_prefix('='))
        {
            found = Some(value.to_string());
        }
    }
    Ok(found)
}

fn parse_timeout_ms(raw: &str) -> Result<u64, String> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(format!(
            "timeout must be a positive number of milliseconds (got {raw:?})"
        )),
        Ok(ms) => Ok(ms),
    }
}

/// Comma-separated names, trimmed, blanks dropped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
