//! tlspipe server: accept one TLS connection and relay stdio over it.
//!
//! The lifecycle is strictly `Listening → Serving → Closed`: the listener
//! accepts exactly one connection and is dropped on the spot, so no later
//! connection attempt is ever served by this process. Credential parsing
//! happens before any socket is bound, so a bad certificate pair fails
//! fast without ever listening.

mod config;
mod error;

pub use config::ServerConfig;
pub use error::ServerError;

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::debug;

use tlspipe_core::defaults::{DEFAULT_RELAY_BUFFER_SIZE, DEFAULT_TLS_HANDSHAKE_TIMEOUT_SECS};
use tlspipe_core::relay::{RelaySummary, relay_stdio};
use tlspipe_transport::Credential;
use tlspipe_transport::sock::apply_tcp_options;
use tlspipe_transport::tls::build_server_config;

/// Listen on the configured port, serve a single TLS connection through
/// the relay engine, and return its byte counts.
///
/// Bind and accept failures are fatal; so is a credential pair that fails
/// to parse.
pub async fn run<I, O>(config: &ServerConfig, input: I, output: O) -> Result<RelaySummary, ServerError>
where
    I: tokio::io::AsyncRead + Unpin + Send + 'static,
    O: tokio::io::AsyncWrite + Unpin,
{
    let credential = Credential::load(config.credential.as_ref())?;
    let tls_config = build_server_config(credential)?;
    let acceptor = TlsAcceptor::from(Arc::new(tls_config));

    let listen = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = TcpListener::bind(listen).await?;
    debug!(address = %listen, "listening for one connection");

    let (tcp, peer) = listener.accept().await?;
    // Single-shot server: no connection after the first is ever accepted.
    drop(listener);
    apply_tcp_options(&tcp)?;
    debug!(peer = %peer, "connection accepted");

    let handshake_timeout = Duration::from_secs(DEFAULT_TLS_HANDSHAKE_TIMEOUT_SECS);
    let tls = tokio::time::timeout(handshake_timeout, acceptor.accept(tcp))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "TLS handshake timed out"))??;
    debug!(peer = %peer, "secure channel established");

    let summary = relay_stdio(tls, input, output, DEFAULT_RELAY_BUFFER_SIZE).await?;
    debug!(
        peer = %peer,
        sent = summary.bytes_sent,
        received = summary.bytes_received,
        "relay finished"
    );
    Ok(summary)
}
