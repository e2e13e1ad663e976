#![forbid(unsafe_code)]

use super::framing::{
    TransportMode, detect_mode, parse_request, read_content_length_frame, write_frame,
};
use crate::McpServer;
use std::io::{BufRead, BufReader, Write};
use tracing::{debug, info};

pub(crate) fn run_stdio(server: &mut McpServer) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    serve(server, &mut reader, &mut stdout)
}

/// Request loop until EOF. Framing is auto-detected once per stream.
pub(crate) fn serve<R: BufRead, W: Write>(
    server: &mut McpServer,
    reader: &mut R,
    writer: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mode: Option<TransportMode> = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let current = match mode {
            Some(current) => current,
            None => {
                let Some(detected) = detect_mode(&line) else {
                    debug!("ignoring line before framing was detected");
                    continue;
                };
                info!(mode = ?detected, "transport framing detected");
                mode = Some(detected);
                detected
            }
        };

        let body = match current {
            TransportMode::NewlineJson => line.trim().as_bytes().to_vec(),
            TransportMode::ContentLength => {
                let Some(body) = read_content_length_frame(reader, line)? else {
                    break;
                };
                body
            }
        };

        let response = match parse_request(&body) {
            Ok(request) => server.handle(request),
            Err(error) => Some(error),
        };
        if let Some(response) = response {
            write_frame(writer, current, &response)?;
        }
    }

    info!("input closed, shutting down");
    Ok(())
}
