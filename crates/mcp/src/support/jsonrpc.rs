#![forbid(unsafe_code)]

use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

/// A decoded JSON-RPC message.
///
/// `id` is `None` only when the member is absent (a notification); an explicit
/// `"id": null` is kept as `Some(Value::Null)` and still gets a reply.
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcRequest {
    pub(crate) method: String,
    #[serde(default, deserialize_with = "present_id")]
    pub(crate) id: Option<Value>,
    #[serde(default)]
    pub(crate) params: Option<Value>,
}

impl JsonRpcRequest {
    pub(crate) fn expects_response(&self) -> bool {
        self.id.is_some()
    }
}

fn present_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

pub(crate) fn json_rpc_response(id: Option<Value>, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub(crate) fn json_rpc_error(id: Option<Value>, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

/// MCP text content block carrying the pretty-printed tool envelope.
pub(crate) fn tool_text_content(payload: &Value) -> Value {
    json!({
        "type": "text",
        "text": serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(value: Value) -> JsonRpcRequest {
        serde_json::from_value(value).expect("request")
    }

    #[test]
    fn null_id_is_a_request_and_missing_id_is_a_notification() {
        let null_id = decode(json!({"jsonrpc": "2.0", "id": null, "method": "ping"}));
        assert_eq!(null_id.id, Some(Value::Null));
        assert!(null_id.expects_response());

        let numbered = decode(json!({"jsonrpc": "2.0", "id": 4, "method": "ping"}));
        assert_eq!(numbered.id, Some(json!(4)));

        let notification = decode(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));
        assert_eq!(notification.id, None);
        assert!(!notification.expects_response());
    }

    #[test]
    fn responses_echo_a_null_id() {
        let resp = json_rpc_response(Some(Value::Null), json!({}));
        assert!(resp.as_object().expect("object").contains_key("id"));
        assert_eq!(resp["id"], Value::Null);
    }
}
