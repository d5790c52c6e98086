//! Worker pool serving one request per connection.
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Receiver;
use elevator_common::QuoteError;
use elevator_common::net::{MAX_REQUEST_BYTES, READ_TIMEOUT_SECS};
use elevator_common::protocol::{Request, Response};
use log::{debug, error, info, warn};

use crate::service::QuoteService;

/// Spawn `count` workers that take connections from `rx` until it is closed.
pub fn spawn_workers(
    count: usize,
    rx: Receiver<TcpStream>,
    service: Arc<QuoteService>,
) -> Vec<JoinHandle<()>> {
    (0..count.max(1))
        .map(|n| {
            let rx = rx.clone();
            let service = Arc::clone(&service);
            thread::spawn(move || {
                debug!("Worker {} started", n);
                for stream in rx.iter() {
                    let peer = stream.peer_addr().ok();
                    if let Err(e) = handle_connection(stream, &service) {
                        error!("Client {:?} error: {}", peer, e);
                    }
                }
                debug!("Worker {} stopped", n);
            })
        })
        .collect()
}

/// Read one request line from `stream`, answer it, and close the connection.
pub fn handle_connection(stream: TcpStream, service: &QuoteService) -> Result<(), QuoteError> {
    stream.set_read_timeout(Some(Duration::from_secs(READ_TIMEOUT_SECS)))?;
    let mut writer = stream.try_clone()?;

    let response = match read_request_line(BufReader::new(stream)) {
        Ok(None) => {
            debug!("Client closed the connection without a request");
            return Ok(());
        }
        Ok(Some(line)) => match Request::from_line(&line) {
            Ok(request) => {
                info!("Received request {:?}", request);
                service.handle(request)
            }
            Err(e) => Response::from(QuoteError::Format(format!("Invalid request: {}", e))),
        },
        Err(e @ QuoteError::Format(_)) => {
            warn!("Rejected request: {}", e);
            Response::from(e)
        }
        Err(e) => return Err(e),
    };

    writer.write_all(&response.to_line()?)?;
    writer.flush()?;
    Ok(())
}

/// Read a single request line of at most [`MAX_REQUEST_BYTES`].
///
/// Returns `None` when the peer sent nothing, and `QuoteError::Format` when the
/// limit is reached before a newline.
pub fn read_request_line<R: BufRead>(reader: R) -> Result<Option<String>, QuoteError> {
    let mut line = String::new();
    let read = reader.take(MAX_REQUEST_BYTES).read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    if !line.ends_with('\n') && read as u64 >= MAX_REQUEST_BYTES {
        return Err(QuoteError::Format(format!(
            "Request exceeds {} bytes",
            MAX_REQUEST_BYTES
        )));
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn request_line_is_read_up_to_newline() {
        let input = Cursor::new(b"{\"op\":\"health\"}\n{\"op\":\"health\"}\n".to_vec());
        let line = read_request_line(input).unwrap().unwrap();
        assert_eq!(Request::from_line(&line).unwrap(), Request::Health);
    }

    #[test]
    fn empty_connection_yields_no_request() {
        assert!(read_request_line(Cursor::new(Vec::new())).unwrap().is_none());
    }

    #[test]
    fn oversized_request_is_rejected() {
        let flood = vec![b'x'; MAX_REQUEST_BYTES as usize * 2];
        match read_request_line(Cursor::new(flood)) {
            Err(QuoteError::Format(message)) => assert!(message.contains("exceeds")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn request_just_under_the_limit_is_accepted() {
        let mut input = vec![b' '; MAX_REQUEST_BYTES as usize - 1];
        input[MAX_REQUEST_BYTES as usize - 2] = b'\n';
        assert!(read_request_line(Cursor::new(input)).unwrap().is_some());
    }
}
