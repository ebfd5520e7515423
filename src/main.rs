//! tlspipe binary: parse flags, pick a mode, pipe stdio over TLS.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use tlspipe::cli::{self, Cli, RunMode};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);

    // rustls wants exactly one process-wide crypto provider, installed
    // before any TLS config is built.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let mode = match RunMode::from_cli(cli) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let result = match mode {
        RunMode::Client(config) => {
            tlspipe_client::run(&config, tokio::io::stdin(), tokio::io::stdout())
                .await
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        }
        RunMode::Server(config) => {
            tlspipe_server::run(&config, tokio::io::stdin(), tokio::io::stdout())
                .await
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        }
    };

    match result {
        Ok(summary) => {
            debug!(
                sent = summary.bytes_sent,
                received = summary.bytes_received,
                "session closed"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
