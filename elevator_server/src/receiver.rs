//! TCP acceptor feeding client connections to the worker pool.
use crossbeam_channel::Sender;
use elevator_common::QuoteError;
use log::{debug, error, info};
use std::net::{SocketAddr, TcpListener, TcpStream};

/// TCP command receiver that accepts client connections.
///
/// Each accepted connection is handed to the worker pool through a channel; the
/// receiver itself never reads from a client, so a slow or broken client cannot
/// stall it.
pub struct CommandReceiver {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
}

impl CommandReceiver {
    /// Bind a new TCP receiver to the provided `bind_addr` (e.g., `0.0.0.0:4000`).
    pub fn new(bind_addr: &str) -> Result<Self, QuoteError> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Address the receiver is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr, QuoteError> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking loop that accepts TCP connections and forwards them to `tx`.
    ///
    /// A failed accept is logged and skipped. The loop ends with an error only
    /// when no worker is left to receive connections.
    pub fn accept_loop(self, tx: Sender<TcpStream>) -> Result<(), QuoteError> {
        info!("Command TCP server is started on {}", self.socket.local_addr()?);

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("Accepted connection from {:?}", stream.peer_addr().ok());
                    tx.send(stream)
                        .map_err(|e| QuoteError::ChannelSend(e.to_string()))?;
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}
