#![forbid(unsafe_code)]

use crate::{HypothesisStore, McpServer};
use serde_json::{Value, json};
use tracing::{debug, warn};

impl McpServer {
    pub(crate) fn new(store: HypothesisStore) -> Self {
        Self {
            initialized: false,
            store,
        }
    }

    pub(crate) fn handle(&mut self, request: crate::JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();
        debug!(method, "request");

        if method == "initialize" {
            // Clients that skip notifications/initialized still get a working session.
            self.initialized = true;
            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": crate::MCP_VERSION,
                    "serverInfo": { "name": crate::SERVER_NAME, "version": crate::SERVER_VERSION },
                    "capabilities": { "tools": {} }
                }),
            ));
        }

        if method == "notifications/initialized" {
            self.initialized = true;
            return None;
        }

        // Notifications never get a response, known or not.
        if !request.expects_response() || method.starts_with("notifications/") {
            debug!(method, "ignoring notification");
            return None;
        }

        if method == "ping" {
            return Some(crate::json_rpc_response(request.id, json!({})));
        }

        if !self.initialized {
            return Some(crate::json_rpc_error(
                request.id,
                -32002,
                "Server not initialized",
            ));
        }

        if method == "resources/list" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "resources": [] }),
            ));
        }
        if method == "resources/read" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "contents": [] }),
            ));
        }

        if method == "tools/list" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "tools": crate::handlers::handler_definitions() }),
            ));
        }

        if method == "tools/call" {
            let Some(params_obj) = request.params.as_ref().and_then(|v| v.as_object()) else {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32602,
                    "params must be an object",
                ));
            };
            let Some(tool_name) = params_obj.get("name").and_then(|v| v.as_str()) else {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32602,
                    "params.name must be a string",
                ));
            };
            let args = params_obj
                .get("arguments")
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or_else(|| json!({}));
            let response_body = self.call_tool(tool_name, args);

            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "content": [crate::tool_text_content(&response_body)],
                    "isError": !response_body.get("success").and_then(|v| v.as_bool()).unwrap_or(false)
                }),
            ));
        }

        Some(crate::json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {method}"),
        ))
    }

    pub(crate) fn call_tool(&mut self, name: &str, args: Value) -> Value {
        match crate::handlers::dispatch_handler(self, name, args) {
            Some(resp) => resp,
            None => {
                warn!(tool = name, "unknown tool");
                crate::ai_error_with(
                    "UNKNOWN_TOOL",
                    &format!("Unknown tool: {name}"),
                    Some("Call tools/list for the available tool names."),
                )
            }
        }
    }
}
