//! TLS transport plumbing for tlspipe.
//!
//! - [`credential`]: certificate/key pairs, file-based or ephemeral.
//! - [`tls`]: client and server `rustls` config construction.
//! - [`sock`]: TCP socket options applied to every connection.

pub mod credential;
pub mod error;
pub mod sock;
pub mod tls;

pub use credential::{Credential, CredentialPaths};
pub use error::TransportError;
