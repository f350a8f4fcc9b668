//! Relay configuration types.
//!
//! [`RelayConfig`] is the single source of truth for all runtime settings.
//! It can be constructed from CLI arguments (preferred for production) or
//! from defaults (useful for local development and tests).
//!
//! Keeping configuration as a plain struct — no global state, no environment
//! variable reads inside the domain — makes the relay easy to embed in tests.
//! The binary is responsible for populating the struct from CLI args or
//! environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

/// All runtime configuration for the relay server.
///
/// Build this struct once at startup and share it across tasks.
///
/// # Example
///
/// ```rust
/// use relay_server::domain::RelayConfig;
///
/// let cfg = RelayConfig::default();
/// assert_eq!(cfg.ws_bind_addr.port(), 3001);
/// ```
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// The address and port the WebSocket command listener binds to.
    ///
    /// The controller page connects here to stream commands.  Defaults to
    /// loopback: input injection is a local-trust service and should not be
    /// exposed to the LAN without deliberate choice.
    pub ws_bind_addr: SocketAddr,

    /// The address and port the static asset HTTP listener binds to.
    ///
    /// Serves the controller page itself (HTML/JS/CSS) from `public_dir`.
    pub http_bind_addr: SocketAddr,

    /// Root directory of the controller page assets.
    ///
    /// Requests are jailed to this directory; anything trying to escape it is
    /// answered with 403.
    pub public_dir: PathBuf,
}

impl Default for RelayConfig {
    /// Returns a `RelayConfig` suitable for local development without any
    /// external configuration.
    ///
    /// | Field           | Default           |
    /// |-----------------|-------------------|
    /// | ws_bind_addr    | `127.0.0.1:3001`  |
    /// | http_bind_addr  | `127.0.0.1:3000`  |
    /// | public_dir      | `public`          |
    fn default() -> Self {
        Self {
            // Compile-time-known valid socket address strings.
            ws_bind_addr: "127.0.0.1:3001".parse().unwrap(),
            http_bind_addr: "127.0.0.1:3000".parse().unwrap(),
            public_dir: PathBuf::from("public"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
