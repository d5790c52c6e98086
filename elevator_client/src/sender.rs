//! Sending requests to the quote server over TCP.
//!
//! Every request opens its own connection: one JSON line out, one JSON line back.
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

use elevator_common::QuoteError;
use elevator_common::net::READ_TIMEOUT_SECS;
use elevator_common::protocol::{Request, Response};
use log::debug;

/// Helper type for sending requests to the server.
pub struct CommandSender {
    server: String,
}

impl CommandSender {
    /// Sender talking to `server` (`host:port`).
    pub fn new(server: &str) -> Self {
        Self {
            server: server.trim().replace('"', ""),
        }
    }

    /// Send `request` and wait for the answer. An error response becomes `QuoteError::Remote`.
    pub fn send(&self, request: &Request) -> Result<Response, QuoteError> {
        let mut stream = TcpStream::connect(&self.server)
            .map_err(|e| QuoteError::Format(format!("Failed to connect to {}: {}", self.server, e)))?;
        stream.set_read_timeout(Some(Duration::from_secs(READ_TIMEOUT_SECS)))?;

        debug!("Sending request: {:?}", request);
        stream.write_all(&request.to_line()?)?;
        stream.flush()?;

        let mut line = String::new();
        if BufReader::new(stream).read_line(&mut line)? == 0 {
            return Err(QuoteError::ChannelRecv(
                "server closed the connection without answering".to_string(),
            ));
        }
        Response::from_line(&line)?.into_result()
    }
}
