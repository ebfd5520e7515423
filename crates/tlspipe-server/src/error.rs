//! Server error types.

/// Errors that can occur in the tlspipe server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("tls: {0}")]
    Tls(#[from] rustls::Error),

    #[error("transport: {0}")]
    Transport(#[from] tlspipe_transport::TransportError),
}
