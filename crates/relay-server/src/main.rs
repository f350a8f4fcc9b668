//! Gamepad Input Relay — entry point.
//!
//! This binary lets a browser page that reads a game controller drive the
//! mouse and keyboard of the machine it runs on.  It serves the controller
//! page over HTTP and accepts a stream of text commands over WebSocket,
//! injecting each one into the OS through a platform-specific backend
//! process.
//!
//! # Usage
//!
//! ```text
//! relay-server [OPTIONS]
//!
//! Options:
//!   --bind       <ADDR>  address both listeners bind to [default: 127.0.0.1]
//!   --http-port  <PORT>  controller page port           [default: 3000]
//!   --ws-port    <PORT>  command channel port           [default: 3001]
//!   --public-dir <DIR>   controller page asset root     [default: public]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable           | Default     | Description               |
//! |--------------------|-------------|---------------------------|
//! | `RELAY_BIND`       | `127.0.0.1` | bind address              |
//! | `RELAY_HTTP_PORT`  | `3000`      | controller page port      |
//! | `RELAY_WS_PORT`    | `3001`      | command channel port      |
//! | `RELAY_PUBLIC_DIR` | `public`    | asset root directory      |
//!
//! # Architecture overview
//!
//! ```text
//! Browser controller page  (text commands over WebSocket)
//!       ↕
//! relay-server  ← this process
//!   domain/          RelayConfig
//!   application/     RelayService: message → instructions → injector
//!   infrastructure/
//!     ws_server/     command channel accept loop
//!     static_files/  controller page delivery (axum)
//!     injection/     powershell | xdotool | osascript backend
//!       ↕
//! OS input event queue
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use relay_server::application::RelayService;
use relay_server::domain::RelayConfig;
use relay_server::infrastructure::injection::Injector;
use relay_server::infrastructure::{run_server, run_static_server};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Gamepad input relay.
///
/// Serves the controller page and relays its command stream into OS-level
/// mouse and keyboard events.
#[derive(Debug, Parser)]
#[command(
    name = "relay-server",
    about = "WebSocket input relay for the browser gamepad controller",
    version
)]
struct Cli {
    /// Address both listeners bind to.
    ///
    /// The default is loopback only: this process injects input into the
    /// host, so exposing it to the LAN should be a deliberate choice
    /// (`--bind 0.0.0.0`).
    #[arg(long, default_value = "127.0.0.1", env = "RELAY_BIND")]
    bind: String,

    /// TCP port for the controller page (HTTP).
    #[arg(long, default_value_t = 3000, env = "RELAY_HTTP_PORT")]
    http_port: u16,

    /// TCP port for the command channel (WebSocket).
    #[arg(long, default_value_t = 3001, env = "RELAY_WS_PORT")]
    ws_port: u16,

    /// Root directory of the controller page assets.
    #[arg(long, default_value = "public", env = "RELAY_PUBLIC_DIR")]
    public_dir: PathBuf,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`RelayConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not a valid IP address.
    fn into_relay_config(self) -> anyhow::Result<RelayConfig> {
        let http_bind_addr: SocketAddr = format!("{}:{}", self.bind, self.http_port)
            .parse()
            .with_context(|| format!("invalid HTTP bind address: '{}:{}'", self.bind, self.http_port))?;

        let ws_bind_addr: SocketAddr = format!("{}:{}", self.bind, self.ws_port)
            .parse()
            .with_context(|| format!("invalid WebSocket bind address: '{}:{}'", self.bind, self.ws_port))?;

        Ok(RelayConfig {
            ws_bind_addr,
            http_bind_addr,
            public_dir: self.public_dir,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// Startup order: logging, CLI parse, backend selection (one injection
/// backend for the life of the process), static asset task, Ctrl+C handler,
/// then the command-channel accept loop in the foreground until shutdown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `RUST_LOG` controls the log level; default to `info`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.into_relay_config()?;

    info!(
        "gamepad input relay starting — page={}, commands={}",
        config.http_bind_addr, config.ws_bind_addr
    );

    // Select and start the injection backend once.  A missing tool or an
    // unsupported platform is not fatal: the server still runs, commands are
    // just discarded.
    let injector = Injector::for_host_platform().await;
    let service = Arc::new(RelayService::new(Arc::new(Mutex::new(injector))));

    // Serve the controller page beside the relay loop.  If this fails the
    // command channel keeps running; the page can be hosted elsewhere.
    let http_addr = config.http_bind_addr;
    let public_dir = config.public_dir.clone();
    tokio::spawn(async move {
        if let Err(e) = run_static_server(http_addr, public_dir).await {
            tracing::error!("static asset server failed: {e:#}");
        }
    });

    // Graceful shutdown flag, cleared by Ctrl+C.  The accept loop checks it
    // every 200 ms and exits cleanly.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C — initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config.ws_bind_addr, service, running).await?;

    info!("gamepad input relay stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_produce_correct_http_port() {
        let cli = Cli::parse_from(["relay-server"]);
        assert_eq!(cli.http_port, 3000);
    }

    #[test]
    fn test_cli_defaults_produce_correct_ws_port() {
        let cli = Cli::parse_from(["relay-server"]);
        assert_eq!(cli.ws_port, 3001);
    }

    #[test]
    fn test_cli_defaults_produce_loopback_bind() {
        let cli = Cli::parse_from(["relay-server"]);
        assert_eq!(cli.bind, "127.0.0.1");
    }

    #[test]
    fn test_cli_defaults_produce_public_dir() {
        let cli = Cli::parse_from(["relay-server"]);
        assert_eq!(cli.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_cli_http_port_override() {
        let cli = Cli::parse_from(["relay-server", "--http-port", "8080"]);
        assert_eq!(cli.http_port, 8080);
    }

    #[test]
    fn test_cli_ws_port_override() {
        let cli = Cli::parse_from(["relay-server", "--ws-port", "9001"]);
        assert_eq!(cli.ws_port, 9001);
    }

    #[test]
    fn test_cli_bind_override() {
        let cli = Cli::parse_from(["relay-server", "--bind", "0.0.0.0"]);
        assert_eq!(cli.bind, "0.0.0.0");
    }

    #[test]
    fn test_into_relay_config_default_ports() {
        let cli = Cli::parse_from(["relay-server"]);
        let config = cli.into_relay_config().unwrap();
        assert_eq!(config.http_bind_addr.port(), 3000);
        assert_eq!(config.ws_bind_addr.port(), 3001);
    }

    #[test]
    fn test_into_relay_config_custom_bind() {
        let cli = Cli::parse_from(["relay-server", "--bind", "0.0.0.0", "--ws-port", "9001"]);
        let config = cli.into_relay_config().unwrap();
        assert_eq!(config.ws_bind_addr.to_string(), "0.0.0.0:9001");
    }

    #[test]
    fn test_into_relay_config_invalid_bind_returns_error() {
        let cli = Cli {
            bind: "not.an.ip".to_string(),
            http_port: 3000,
            ws_port: 3001,
            public_dir: PathBuf::from("public"),
        };
        assert!(cli.into_relay_config().is_err());
    }

    #[test]
    fn test_into_relay_config_carries_public_dir() {
        let cli = Cli::parse_from(["relay-server", "--public-dir", "/srv/controller"]);
        let config = cli.into_relay_config().unwrap();
        assert_eq!(config.public_dir, PathBuf::from("/srv/controller"));
    }
}
