#![forbid(unsafe_code)]

use crate::{JsonRpcRequest, json_rpc_error};
use serde_json::Value;
use std::io::{BufRead, Write};

const MAX_CONTENT_LENGTH_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransportMode {
    NewlineJson,
    ContentLength,
}

/// Decided once from the first non-blank line; responses use the same framing.
pub(crate) fn detect_mode(line: &str) -> Option<TransportMode> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some(TransportMode::NewlineJson);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("content-length:") || lower.starts_with("content-type:") {
        return Some(TransportMode::ContentLength);
    }
    None
}

fn content_length(line: &str) -> Option<usize> {
    let (key, value) = line.trim().split_once(':')?;
    if !key.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse::<usize>().ok()
}

/// Reads one header block (starting with `first_header`) and its body.
/// `Ok(None)` means the peer closed the stream mid-frame.
pub(crate) fn read_content_length_frame<R: BufRead>(
    reader: &mut R,
    first_header: String,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut header = first_header;
    let mut length = content_length(&header);
    while !header.trim_end().is_empty() {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Ok(None);
        }
        if length.is_none() {
            length = content_length(&header);
        }
    }

    let Some(len) = length else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Missing Content-Length header",
        ));
    };
    if len > MAX_CONTENT_LENGTH_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Content-Length exceeds max allowed size",
        ));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

pub(crate) fn write_frame<W: Write>(
    writer: &mut W,
    mode: TransportMode,
    resp: &Value,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec(resp)?;
    match mode {
        TransportMode::NewlineJson => {
            writer.write_all(&body)?;
            writer.write_all(b"\n")?;
        }
        TransportMode::ContentLength => {
            write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
            writer.write_all(&body)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// JSON-RPC envelope validation. The error value is a ready-to-send response.
pub(crate) fn parse_request(body: &[u8]) -> Result<JsonRpcRequest, Value> {
    let data: Value = serde_json::from_slice(body)
        .map_err(|e| json_rpc_error(None, -32700, &format!("Parse error: {e}")))?;

    let (id, has_method) = match data.as_object() {
        Some(obj) => (obj.get("id").cloned(), obj.contains_key("method")),
        None => return Err(json_rpc_error(None, -32600, "Invalid Request")),
    };
    if !has_method {
        return Err(json_rpc_error(id, -32600, "Invalid Request"));
    }

    serde_json::from_value::<JsonRpcRequest>(data)
        .map_err(|e| json_rpc_error(id, -32600, &format!("Invalid Request: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn detects_framing_from_the_first_line() {
        assert_eq!(detect_mode("  {\"jsonrpc\":\"2.0\"}"), Some(TransportMode::NewlineJson));
        assert_eq!(detect_mode("Content-Length: 12\r\n"), Some(TransportMode::ContentLength));
        assert_eq!(detect_mode("content-type: application/json"), Some(TransportMode::ContentLength));
        assert_eq!(detect_mode("\r\n"), None);
        assert_eq!(detect_mode("hello"), None);
    }

    #[test]
    fn reads_a_frame_with_extra_headers() {
        let body = br#"{"method":"ping"}"#;
        let raw = format!(
            "Content-Type: application/json\r\n\r\n{}",
            String::from_utf8_lossy(body)
        );
        let mut reader = Cursor::new(raw.into_bytes());
        let first = format!("Content-Length: {}\r\n", body.len());
        let frame = read_content_length_frame(&mut reader, first)
            .expect("io")
            .expect("frame");
        assert_eq!(frame, body.to_vec());
    }

    #[test]
    fn frames_without_length_are_rejected() {
        let mut reader = Cursor::new(b"\r\n{}".to_vec());
        let err = read_content_length_frame(&mut reader, "Content-Type: x\r\n".to_string())
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn writes_both_framings() {
        let mut out = Vec::new();
        write_frame(&mut out, TransportMode::NewlineJson, &serde_json::json!({"a": 1}))
            .expect("write");
        assert_eq!(out, b"{\"a\":1}\n".to_vec());

        let mut out = Vec::new();
        write_frame(&mut out, TransportMode::ContentLength, &serde_json::json!({"a": 1}))
            .expect("write");
        assert_eq!(out, b"Content-Length: 7\r\n\r\n{\"a\":1}".to_vec());
    }

    #[test]
    fn envelope_errors_use_json_rpc_codes() {
        let err = parse_request(b"{not json").unwrap_err();
        assert_eq!(err["error"]["code"], -32700);
        let err = parse_request(b"[1,2]").unwrap_err();
        assert_eq!(err["error"]["code"], -32600);
        let err = parse_request(br#"{"id":7}"#).unwrap_err();
        assert_eq!(err["error"]["code"], -32600);
        assert_eq!(err["id"], 7);
        let req = parse_request(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#).expect("request");
        assert_eq!(req.method, "ping");
    }
}
