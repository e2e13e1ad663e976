#![forbid(unsafe_code)]

mod entry;
mod handlers;
mod server;
mod support;

pub(crate) use support::*;

use gs_storage::{
    GridSource, HttpGrid, HttpGridConfig, MemoryGrid, RowStore, TableSchema, TransformRules,
};
use tracing::info;

// Widely deployed baseline; clients negotiating newer versions still accept it.
const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "gsheet-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) type HypothesisStore = RowStore<Box<dyn GridSource>>;

pub(crate) struct McpServer {
    initialized: bool,
    store: HypothesisStore,
}

fn usage() -> &'static str {
    "gs_mcp: hypothesis sheet MCP server (stdio)\n\n\
USAGE:\n\
  gs_mcp [--spreadsheet-id ID] [--api-base URL] [--timeout-ms N]\n\
         [--fixture PATH] [--required-headers A,B,C] [--percent-fields A,B]\n\
         [--log-level LEVEL]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version and exit\n\
\n\
ENVIRONMENT:\n\
  GOOGLE_SHEETS_SPREADSHEET_ID   spreadsheet to serve (unless --fixture)\n\
  GOOGLE_SHEETS_ACCESS_TOKEN     OAuth bearer token (unless --fixture)\n\
  GSHEET_API_BASE, GSHEET_TIMEOUT_MS, GSHEET_MCP_FIXTURE,\n\
  GSHEET_REQUIRED_HEADERS, GSHEET_PERCENT_FIELDS, GSHEET_MCP_LOG\n\
\n\
Logs go to stderr; stdout carries JSON-RPC only.\n"
}

fn version_line() -> String {
    format!("gs_mcp {SERVER_VERSION} protocol={MCP_VERSION}")
}

fn open_grid(backend: &Backend) -> Result<Box<dyn GridSource>, Box<dyn std::error::Error>> {
    match backend {
        Backend::Fixture(path) => {
            let grid = MemoryGrid::load_fixture(path)?;
            info!(path = %path.display(), "serving fixture grid");
            Ok(Box::new(grid))
        }
        Backend::Remote {
            spreadsheet_id,
            access_token,
            api_base,
            timeout,
        } => {
            info!(spreadsheet_id = %spreadsheet_id, api_base = %api_base, "serving remote spreadsheet");
            Ok(Box::new(HttpGrid::new(HttpGridConfig {
                api_base: api_base.clone(),
                spreadsheet_id: spreadsheet_id.clone(),
                access_token: access_token.clone(),
                timeout: *timeout,
            })))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", version_line());
        return Ok(());
    }

    let config = RuntimeConfig::from_process()?;
    init_logging(&config.log_level)?;

    let grid = open_grid(&config.backend)?;
    let schema = TableSchema::new(config.required_headers.iter().cloned())
        .with_transforms(TransformRules::percent_fields(config.percent_fields.iter().cloned()));
    let mut server = McpServer::new(RowStore::new(grid, schema));

    info!(version = SERVER_VERSION, "ready on stdio");
    entry::run_stdio(&mut server)
}
