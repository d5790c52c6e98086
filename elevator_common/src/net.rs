//! Shared networking constants and helpers used by client and server.

/// TCP port the command server listens on by default.
pub const COMMAND_PORT: u16 = 4000;
/// Seconds a server worker waits for a request line before dropping the connection.
pub const READ_TIMEOUT_SECS: u64 = 10;
/// Largest request line a server worker accepts, newline included.
pub const MAX_REQUEST_BYTES: u64 = 64 * 1024;

/// Helper to format an IPv4 address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
