//! Server configuration.

use tlspipe_transport::CredentialPaths;

/// Immutable server configuration, built once from the CLI.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on; the wildcard address is always used.
    pub port: u16,
    /// Certificate/key file pair. `None` generates an ephemeral
    /// self-signed pair at startup.
    pub credential: Option<CredentialPaths>,
}
