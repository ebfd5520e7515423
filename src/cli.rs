//! CLI surface and startup configuration.
//!
//! Flags are parsed once, validated, and frozen into a per-mode config
//! struct; nothing downstream reads argv or any global state.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tlspipe_client::{ClientConfig, ClientTlsOptions, Endpoint};
use tlspipe_core::Mode;
use tlspipe_core::defaults::NO_LISTEN_PORT;
use tlspipe_server::ServerConfig;
use tlspipe_transport::CredentialPaths;

/// tlspipe CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tlspipe",
    version,
    about = "Encrypted pipe between local stdio and a TLS peer"
)]
pub struct Cli {
    /// Remote host to connect to (client mode).
    pub host: Option<String>,

    /// Remote port to connect to (client mode).
    pub port: Option<u16>,

    /// Listen port; a value in 1..=65535 selects server mode.
    #[arg(
        short = 'l',
        long = "listen",
        value_name = "PORT",
        default_value_t = NO_LISTEN_PORT,
        allow_negative_numbers = true
    )]
    pub listen: i64,

    /// Server certificate file (PEM).
    #[arg(short = 'c', long = "cert", value_name = "FILE", requires = "key")]
    pub cert: Option<PathBuf>,

    /// Server private-key file (PEM).
    #[arg(short = 'k', long = "key", value_name = "FILE", requires = "cert")]
    pub key: Option<PathBuf>,

    /// Verbose diagnostics on stderr.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Negotiate a plaintext STARTTLS upgrade before the TLS handshake
    /// (client mode).
    #[arg(short = 's', long = "starttls")]
    pub starttls: bool,

    /// Trust the CA certificate(s) in this PEM file instead of the system
    /// roots (client mode).
    #[arg(long = "ca", value_name = "FILE")]
    pub ca: Option<PathBuf>,

    /// Skip server certificate verification (client mode).
    #[arg(long = "insecure")]
    pub insecure: bool,
}

/// Configuration errors surfaced before any connection is attempted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("client mode needs <host> and <port> arguments")]
    MissingEndpoint,
}

/// The selected run mode with its frozen configuration.
#[derive(Debug, Clone)]
pub enum RunMode {
    Client(ClientConfig),
    Server(ServerConfig),
}

impl RunMode {
    /// Select the mode from the listen port and freeze the matching
    /// config. Flags that only apply to the other mode are ignored with
    /// a warning.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        match Mode::select(cli.listen) {
            Mode::Server => {
                if cli.host.is_some() {
                    warn!("positional arguments are ignored in server mode");
                }
                if cli.starttls {
                    warn!("--starttls is ignored in server mode");
                }
                let credential = match (cli.cert, cli.key) {
                    (Some(cert), Some(key)) => Some(CredentialPaths { cert, key }),
                    _ => None,
                };
                Ok(RunMode::Server(ServerConfig {
                    port: cli.listen as u16,
                    credential,
                }))
            }
            Mode::Client => {
                if cli.cert.is_some() {
                    warn!("--cert/--key are ignored in client mode");
                }
                let (Some(host), Some(port)) = (cli.host, cli.port) else {
                    return Err(ConfigError::MissingEndpoint);
                };
                Ok(RunMode::Client(ClientConfig {
                    endpoint: Endpoint::new(host, port),
                    starttls: cli.starttls,
                    tls: ClientTlsOptions {
                        ca: cli.ca,
                        insecure: cli.insecure,
                    },
                }))
            }
        }
    }
}

/// Initialize the tracing subscriber.
///
/// Diagnostics always go to stderr: stdout belongs to the relayed byte
/// stream. `-v` raises the default filter to `debug`; `RUST_LOG` wins
/// over both.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}
