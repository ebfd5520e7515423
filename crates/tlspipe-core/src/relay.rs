//! Bidirectional relay between a connection and local input/output streams.
//!
//! The two directions are deliberately asymmetric:
//!
//! - **Upstream** runs as a spawned task: it reads the local input
//!   line-by-line, re-appends the newline, and writes each line to the
//!   connection. On input end-of-stream it shuts down the connection's
//!   write half (half-close) and finishes. An upstream failure is
//!   reported but never terminates the downstream direction, so a
//!   half-open relay (input dead, output alive) is allowed.
//! - **Downstream** runs on the calling task: it copies raw bytes from
//!   the connection to the local output until the peer closes or errors.
//!
//! The relay's lifetime is bounded by the downstream direction: once the
//! peer closes its side, the upstream task is aborted and the relay
//! returns, whether or not local input has finished.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, trace, warn};

/// Byte counts observed by a completed relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaySummary {
    /// Bytes written to the connection (local input direction).
    pub bytes_sent: u64,
    /// Bytes written to the local output (connection direction).
    pub bytes_received: u64,
}

/// Relay bytes between `conn` and the local `input`/`output` pair until
/// the peer closes its side of the connection.
///
/// Returns the byte counts for both directions. A read of zero bytes (or
/// an EOF without close_notify) from the connection is a clean peer close;
/// any other connection read error, or a local output write error, is
/// returned as-is.
pub async fn relay_stdio<S, I, O>(
    conn: S,
    input: I,
    mut output: O,
    buffer_size: usize,
) -> io::Result<RelaySummary>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
    I: AsyncRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin,
{
    let (mut conn_rd, conn_wr) = tokio::io::split(conn);

    let sent = Arc::new(AtomicU64::new(0));
    let upstream = tokio::spawn(pump_input(input, conn_wr, sent.clone()));

    let mut buf = vec![0u8; buffer_size];
    let mut received: u64 = 0;
    let downstream = loop {
        match conn_rd.read(&mut buf).await {
            Ok(0) => {
                debug!("peer closed connection");
                break Ok(());
            }
            Ok(n) => {
                if let Err(e) = output.write_all(&buf[..n]).await {
                    break Err(e);
                }
                if let Err(e) = output.flush().await {
                    break Err(e);
                }
                received += n as u64;
            }
            // TCP close without close_notify is a routine way for peers
            // to end a session; treat it like a clean close.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("peer closed connection without close_notify");
                break Ok(());
            }
            Err(e) => break Err(e),
        }
    };

    upstream.abort();
    if let Ok(Err(e)) = upstream.await {
        warn!(error = %e, "input relay failed");
    }

    downstream.map(|()| RelaySummary {
        bytes_sent: sent.load(Ordering::Relaxed),
        bytes_received: received,
    })
}

/// Upstream direction: local input lines onto the connection.
///
/// Shuts down the connection's write half on input EOF so the peer sees a
/// half-close, then lets the downstream direction run to completion.
async fn pump_input<I, W>(input: I, mut conn: W, sent: Arc<AtomicU64>) -> io::Result<()>
where
    I: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    while let Some(line) = lines.next_line().await? {
        let mut frame = line.into_bytes();
        frame.push(b'\n');
        conn.write_all(&frame).await?;
        conn.flush().await?;
        sent.fetch_add(frame.len() as u64, Ordering::Relaxed);
        trace!(bytes = frame.len(), "line forwarded");
    }
    debug!("local input finished, half-closing connection");
    conn.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[tokio::test]
    async fn forwards_input_lines_to_peer() {
        let (conn, mut peer) = duplex(1024);
        let (mut input_wr, input) = duplex(1024);
        let (output, _output_rd) = duplex(1024);

        let relay = tokio::spawn(relay_stdio(conn, input, output, 1024));

        input_wr.write_all(b"hello\nworld\n").await.unwrap();
        drop(input_wr);

        let mut got = Vec::new();
        let mut buf = [0u8; 64];
        loop {
            match peer.read(&mut buf).await.unwrap() {
                0 => break,
                n => got.extend_from_slice(&buf[..n]),
            }
        }
        assert_eq!(got, b"hello\nworld\n");

        // Peer closes; the relay must come back with the right counts.
        drop(peer);
        let summary = relay.await.unwrap().unwrap();
        assert_eq!(summary.bytes_sent, 12);
        assert_eq!(summary.bytes_received, 0);
    }

    #[tokio::test]
    async fn forwards_peer_bytes_to_output() {
        let (conn, mut peer) = duplex(1024);
        let (_input_wr, input) = duplex(1024);
        let (output, mut output_rd) = duplex(1024);

        let relay = tokio::spawn(relay_stdio(conn, input, output, 1024));

        peer.write_all(b"raw bytes, no framing").await.unwrap();
        peer.flush().await.unwrap();

        let mut buf = [0u8; 64];
        let n = output_rd.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"raw bytes, no framing");

        drop(peer);
        let summary = relay.await.unwrap().unwrap();
        assert_eq!(summary.bytes_received, 21);
    }

    #[tokio::test]
    async fn peer_close_ends_relay_while_input_still_open() {
        let (conn, peer) = duplex(1024);
        // Keep the input writer alive: upstream never sees EOF.
        let (_input_wr, input) = duplex(1024);
        let (output, _output_rd) = duplex(1024);

        let relay = tokio::spawn(relay_stdio(conn, input, output, 1024));

        drop(peer);
        let summary = relay.await.unwrap().unwrap();
        assert_eq!(summary, RelaySummary::default());
    }

    #[tokio::test]
    async fn input_eof_half_closes_but_keeps_receiving() {
        let (conn, mut peer) = duplex(1024);
        let (input_wr, input) = duplex(1024);
        let (output, mut output_rd) = duplex(1024);

        let relay = tokio::spawn(relay_stdio(conn, input, output, 1024));

        // Input ends immediately: the peer sees our half-close...
        drop(input_wr);
        let mut buf = [0u8; 64];
        let n = peer.read(&mut buf).await.unwrap();
        assert_eq!(n, 0);

        // ...but can still send, and the relay keeps delivering.
        peer.write_all(b"late reply\n").await.unwrap();
        let n = output_rd.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"late reply\n");

        drop(peer);
        let summary = relay.await.unwrap().unwrap();
        assert_eq!(summary.bytes_received, 11);
    }
}
