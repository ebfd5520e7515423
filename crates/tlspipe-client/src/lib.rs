//! tlspipe client: connect out to a TLS endpoint and relay stdio over it.
//!
//! The connector dials the endpoint, optionally negotiates a plaintext
//! STARTTLS upgrade on the raw socket, performs the TLS handshake with
//! the target host as the validated identity, and hands the secured
//! stream to the relay engine.

pub mod config;
mod error;
pub mod starttls;

pub use config::{ClientConfig, ClientTlsOptions, Endpoint};
pub use error::ClientError;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

use tlspipe_core::defaults::{DEFAULT_RELAY_BUFFER_SIZE, DEFAULT_TLS_HANDSHAKE_TIMEOUT_SECS};
use tlspipe_core::relay::{RelaySummary, relay_stdio};
use tlspipe_transport::sock::apply_tcp_options;
use tlspipe_transport::tls::build_client_config;

/// Connect to the configured endpoint and relay `input`/`output` over the
/// secure channel until the peer closes.
///
/// Connection and handshake failures are fatal; there is no retry.
pub async fn run<I, O>(config: &ClientConfig, input: I, output: O) -> Result<RelaySummary, ClientError>
where
    I: tokio::io::AsyncRead + Unpin + Send + 'static,
    O: tokio::io::AsyncWrite + Unpin,
{
    let tls_config = build_client_config(config.tls.ca.as_deref(), config.tls.insecure)?;
    let connector = TlsConnector::from(Arc::new(tls_config));
    let server_name = ServerName::try_from(config.endpoint.host.clone())
        .map_err(|_| ClientError::InvalidServerName(config.endpoint.host.clone()))?;

    debug!(endpoint = %config.endpoint, "connecting");
    let mut tcp = TcpStream::connect(config.endpoint.authority()).await?;
    apply_tcp_options(&tcp)?;

    if config.starttls {
        starttls::negotiate(&mut tcp).await?;
        debug!("upgrading to TLS on the negotiated connection");
    }

    let handshake_timeout = Duration::from_secs(DEFAULT_TLS_HANDSHAKE_TIMEOUT_SECS);
    let tls = tokio::time::timeout(handshake_timeout, connector.connect(server_name, tcp))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "TLS handshake timed out"))??;
    debug!(endpoint = %config.endpoint, "secure channel established");

    let summary = relay_stdio(tls, input, output, DEFAULT_RELAY_BUFFER_SIZE).await?;
    debug!(
        sent = summary.bytes_sent,
        received = summary.bytes_received,
        "relay finished"
    );
    Ok(summary)
}
