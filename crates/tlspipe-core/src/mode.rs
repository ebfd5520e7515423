//! Run-mode selection.
//!
//! The listen port doubles as the mode switch: a value inside the valid
//! TCP port range selects server mode, anything else (including the
//! [`NO_LISTEN_PORT`](crate::defaults::NO_LISTEN_PORT) sentinel default)
//! selects client mode.

/// Which half of the pipe this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Connect out to a remote endpoint.
    Client,
    /// Listen for a single inbound connection.
    Server,
}

impl Mode {
    /// Select the run mode from the configured listen port.
    ///
    /// Total over the input domain: any value outside `1..=65535` means
    /// client mode.
    pub fn select(listen_port: i64) -> Self {
        if (1..=i64::from(u16::MAX)).contains(&listen_port) {
            Mode::Server
        } else {
            Mode::Client
        }
    }
}
