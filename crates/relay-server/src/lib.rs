//! relay-server library crate.
//!
//! This crate implements the Input Relay Server: it accepts WebSocket
//! connections from the browser controller page, parses the line-oriented
//! command stream, and injects the resulting instructions into the host OS
//! through a platform-specific backend process.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (text commands over WebSocket)
//!         ↕
//! [relay-server]
//!   ├── domain/           Pure types: RelayConfig
//!   ├── application/      RelayService: message → instructions → injector
//!   └── infrastructure/
//!         ├── ws_server/      WebSocket accept loop (tokio-tungstenite)
//!         ├── static_files/   controller page delivery (axum)
//!         └── injection/      platform backends (powershell, xdotool,
//!                             osascript) behind the InputBackend trait
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain` and `relay-core` plus the injector
//!   seam.
//! - `infrastructure` depends on all other layers plus `tokio`,
//!   `tungstenite`, and `axum`.
//!
//! # Data flow
//!
//! Commands flow one way: connection → parse → injector → OS.  Nothing flows
//! back to the client except connection state, so sessions have no outbound
//! application frames at all.

/// Domain layer: pure configuration types (no I/O).
pub mod domain;

/// Application layer: the relay use case.
pub mod application;

/// Infrastructure layer: WebSocket server, static assets, OS injection.
pub mod infrastructure;
