//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

/// Sentinel listen port meaning "no server": one past the valid TCP port
/// range, so `Mode::select` falls through to client mode.
pub const NO_LISTEN_PORT: i64 = 65536;

/// Default relay read-buffer size.
pub const DEFAULT_RELAY_BUFFER_SIZE: usize = 8192;

/// Default TLS handshake timeout in seconds.
pub const DEFAULT_TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 10;

/// Default TCP_NODELAY (disable Nagle's algorithm for lower latency).
pub const DEFAULT_TCP_NO_DELAY: bool = true;
/// Default TCP Keep-Alive interval in seconds.
pub const DEFAULT_TCP_KEEPALIVE_SECS: u64 = 300;
