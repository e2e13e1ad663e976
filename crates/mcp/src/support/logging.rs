#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

/// Base level plus quieter HTTP client internals.
fn build_env_filter(level: &str) -> Result<EnvFilter, String> {
    let mut directives = vec![level.trim().to_string()];
    for (target, lvl) in [("ureq", "warn"), ("rustls", "warn")] {
        directives.push(format!("{target}={lvl}"));
    }
    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| format!("invalid log filter '{filter_str}': {e}"))
}

/// Installs the global subscriber. Everything goes to stderr; stdout carries JSON-RPC only.
pub(crate) fn init_logging(level: &str) -> Result<(), String> {
    let filter = build_env_filter(level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| format!("failed to install logger: {e}"))
}
