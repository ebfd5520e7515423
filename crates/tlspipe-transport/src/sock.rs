//! TCP socket options.

use std::io;
use std::time::Duration;

use tokio::net::TcpStream;

use tlspipe_core::defaults::{DEFAULT_TCP_KEEPALIVE_SECS, DEFAULT_TCP_NO_DELAY};

/// Apply the standard socket options to an established connection.
///
/// Nagle is disabled for interactive latency; keepalive bounds how long a
/// dead peer can hold the pipe open.
pub fn apply_tcp_options(stream: &TcpStream) -> io::Result<()> {
    stream.set_nodelay(DEFAULT_TCP_NO_DELAY)?;

    let sock = socket2::SockRef::from(stream);
    let keepalive =
        socket2::TcpKeepalive::new().with_time(Duration::from_secs(DEFAULT_TCP_KEEPALIVE_SECS));
    sock.set_tcp_keepalive(&keepalive)?;

    Ok(())
}
