//! # relay-core
//!
//! Shared library for the Gamepad Input Relay containing the line-oriented
//! command protocol and the platform key translation tables.
//!
//! This crate is used by the relay server binary.  It has zero dependencies on
//! OS APIs, child processes, or network sockets.
//!
//! # Architecture overview
//!
//! The Gamepad Input Relay lets a browser page that reads a game controller
//! drive the mouse and keyboard of the machine the server runs on.  The
//! browser streams small text commands (`M 10 -5`, `LC 1`, `K 38 1`, ...) over
//! a WebSocket; the server translates them into OS input events via a
//! platform-specific injection tool.
//!
//! This crate (`relay-core`) is the pure foundation.  It defines:
//!
//! - **`protocol`** – The wire grammar.  One transport message is a batch of
//!   newline-separated command lines; each valid line parses into a typed
//!   [`Instruction`].
//!
//! - **`keymap`** – Translation tables that convert the browser's numeric key
//!   code space (`KeyboardEvent.keyCode`) into the identifiers the platform
//!   injection tools understand: xdotool key names on Linux, CGKeyCodes on
//!   macOS.

pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `relay_core::Instruction` instead of `relay_core::protocol::command::Instruction`.
pub use keymap::KeyMapper;
pub use protocol::command::{parse_line, parse_message, payload_is_allowed, Instruction};
