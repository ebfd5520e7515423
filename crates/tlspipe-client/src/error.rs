//! Client error types.

use crate::starttls::StarttlsError;

/// Errors that can occur in the tlspipe client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("tls: {0}")]
    Tls(#[from] rustls::Error),

    #[error("transport: {0}")]
    Transport(#[from] tlspipe_transport::TransportError),

    #[error("starttls: {0}")]
    Starttls(#[from] StarttlsError),

    #[error("invalid server name: {0}")]
    InvalidServerName(String),
}
