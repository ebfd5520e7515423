//! Core types and constants shared across tlspipe crates.
//!
//! This crate provides:
//! - Default configuration values
//! - Run-mode selection
//! - The bidirectional stdio relay engine

pub mod defaults;
pub mod mode;
pub mod relay;

pub use mode::Mode;
pub use relay::{RelaySummary, relay_stdio};

/// Project name.
pub const PROJECT_NAME: &str = "tlspipe";
/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
