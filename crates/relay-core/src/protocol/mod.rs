//! The line-oriented command protocol spoken by the browser controller page.
//!
//! One WebSocket text frame carries one batch of commands, separated by `\n`.
//! The whole batch is checked against a character allow-list before any line
//! is interpreted; each surviving line parses independently into an
//! [`command::Instruction`].

pub mod command;
