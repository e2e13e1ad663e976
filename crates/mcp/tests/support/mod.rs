#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

const ENV_KEYS: &[&str] = &[
    "GOOGLE_SHEETS_SPREADSHEET_ID",
    "GOOGLE_SHEETS_ACCESS_TOKEN",
    "GSHEET_API_BASE",
    "GSHEET_TIMEOUT_MS",
    "GSHEET_MCP_FIXTURE",
    "GSHEET_REQUIRED_HEADERS",
    "GSHEET_PERCENT_FIELDS",
    "GSHEET_MCP_LOG",
];

pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    dir: PathBuf,
    fixture: PathBuf,
}

impl Server {
    pub(crate) fn start(test_name: &str) -> Self {
        Self::start_with_fixture(test_name, &default_fixture())
    }

    pub(crate) fn start_with_fixture(test_name: &str, fixture: &Value) -> Self {
        let dir = temp_dir(test_name);
        let path = dir.join("fixture.json");
        std::fs::write(&path, serde_json::to_vec_pretty(fixture).expect("fixture json"))
            .expect("write fixture");

        let mut command = Command::new(env!("CARGO_BIN_EXE_gs_mcp"));
        for key in ENV_KEYS {
            command.env_remove(key);
        }
        let mut child = command
            .arg("--fixture")
            .arg(&path)
            .arg("--log-level")
            .arg("warn")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn gs_mcp");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdin,
            stdout,
            dir,
            fixture: path,
        }
    }

    pub(crate) fn start_initialized(test_name: &str) -> Self {
        let mut server = Self::start(test_name);
        server.initialize_default();
        server
    }

    pub(crate) fn send(&mut self, req: Value) {
        writeln!(self.stdin, "{req}").expect("write request");
        self.stdin.flush().expect("flush request");
    }

    pub(crate) fn send_raw(&mut self, line: &str) {
        writeln!(self.stdin, "{line}").expect("write raw line");
        self.stdin.flush().expect("flush raw line");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("read response");
        assert!(!line.trim().is_empty(), "empty response line");
        serde_json::from_str(&line).expect("parse response json")
    }

    pub(crate) fn request(&mut self, req: Value) -> Value {
        self.send(req);
        self.recv()
    }

    pub(crate) fn initialize_default(&mut self) {
        let _ = self.request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2024-11-05", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
        }));
        self.send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
            "params": {}
        }));
    }

    /// `tools/call` and the decoded tool envelope.
    pub(crate) fn call(&mut self, id: i64, name: &str, arguments: Value) -> Value {
        let resp = self.request(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }));
        extract_tool_text(&resp)
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

pub(crate) fn extract_tool_text(resp: &Value) -> Value {
    let text = resp
        .get("result")
        .and_then(|v| v.get("content"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|v| v.get("text"))
        .and_then(|v| v.as_str())
        .expect("result.content[0].text");
    serde_json::from_str(text).expect("tool text is json")
}

pub(crate) fn hypothesis_headers() -> Value {
    json!([
        "ID", "Category", "Problem Title", "Hypothesis", "Questions to Ask in Meeting",
        "Pain", "Status", "Deployments", "Confidence", "Confidence %", "Quote 1",
        "Quote 2", "Possible Fix", "Scale Risk"
    ])
}

pub(crate) fn default_fixture() -> Value {
    json!({
        "tables": [
            {
                "name": "Notes",
                "rows": [["Owner", "Text"], ["ana", "kickoff notes"]]
            },
            {
                "name": "Hypotheses",
                "rows": [
                    hypothesis_headers(),
                    ["H1", "Onboarding", "Slow setup", "Setup takes too long", "How long did setup take?",
                     "High", "NEEDS_MORE_DATA", "3", "", 0.4, "", "", "Wizard", "Low"],
                    ["H2", "Pricing", "Confusing tiers", "Users cannot pick a plan", "Which plan did you pick?"],
                    [],
                    ["H4", "Support", "Slow replies", "Tickets wait for days", "How long do tickets wait?",
                     "Medium", "NEEDS_MORE_DATA", "1", "", 0.8, "", "", "", ""]
                ]
            }
        ]
    })
}

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("gs_mcp_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
