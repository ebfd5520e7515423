//! # tlspipe
//!
//! An encrypted pipe between local standard input/output and a TLS peer:
//! `cat`, but over TLS, with an optional STARTTLS upgrade on the way in.
//!
//! ## Crates
//!
//! - [`tlspipe_core`] - Defaults, mode selection, and the relay engine
//! - [`tlspipe_transport`] - TLS configs and credential handling
//! - [`tlspipe_client`] - Client connector and STARTTLS upgrade
//! - [`tlspipe_server`] - Single-accept TLS server

pub use tlspipe_client as client;
pub use tlspipe_core as core;
pub use tlspipe_server as server;
pub use tlspipe_transport as transport;

pub mod cli;
