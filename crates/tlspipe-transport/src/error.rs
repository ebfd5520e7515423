//! Error types for the transport crate.

use thiserror::Error;

/// Errors that can occur in transport operations.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("tls: {0}")]
    Tls(#[from] rustls::Error),

    #[error("credential error: {0}")]
    Credential(String),

    #[error("certificate generation failed: {0}")]
    CertGeneration(String),
}
