//! Client configuration.

use std::fmt;
use std::path::PathBuf;

/// The remote peer to connect to, from the CLI positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Hostname or IP address. Also the identity validated against the
    /// server's certificate.
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The `host:port` dial string, bracketing IPv6 literals.
    pub fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authority())
    }
}

/// Client-side trust options.
#[derive(Debug, Clone, Default)]
pub struct ClientTlsOptions {
    /// Trust only the CA certificate(s) in this PEM file instead of the
    /// bundled webpki roots.
    pub ca: Option<PathBuf>,
    /// Skip certificate verification entirely.
    pub insecure: bool,
}

/// Immutable client configuration, built once from the CLI.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Endpoint,
    /// Negotiate a plaintext STARTTLS upgrade before the TLS handshake.
    pub starttls: bool,
    pub tls: ClientTlsOptions,
}
