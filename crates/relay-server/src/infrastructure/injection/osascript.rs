//! macOS injection backend: one `osascript` process per key event.
//!
//! macOS has no stdin-driven injection tool to keep alive, but AppleScript
//! can ask System Events to press and release keys by CGKeyCode.  So this
//! backend holds no child at all; each honored instruction spawns a fresh
//!
//! ```text
//! osascript -e 'tell application "System Events" to key down 126'
//! ```
//!
//! Only [`Instruction::Key`] is honored.  Pointer instructions have no
//! System Events equivalent at this level and are silent no-ops, as are key
//! codes with no CGKeyCode mapping — a browser key code is not a valid
//! CGKeyCode, so forwarding an unmapped number would press the wrong key.
//!
//! The spawned process is not waited on for its result; a reaper task
//! collects its exit status so it does not linger as a zombie.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use relay_core::{Instruction, KeyMapper};

use super::{InjectionError, InputBackend};

/// One-shot macOS backend.
pub struct OsascriptBackend;

impl OsascriptBackend {
    /// Creates the backend.  Nothing is spawned until a key event arrives.
    pub fn new() -> Self {
        Self
    }
}

impl Default for OsascriptBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the AppleScript source for an instruction, or `None` for
/// instructions this backend does not honor.
pub(crate) fn script_for(instruction: &Instruction) -> Option<String> {
    let Instruction::Key { code, pressed } = instruction else {
        return None;
    };
    let native = KeyMapper::web_to_macos_cgkeycode(*code)?;
    let action = if *pressed { "key down" } else { "key up" };
    Some(format!(
        "tell application \"System Events\" to {action} {native}"
    ))
}

#[async_trait]
impl InputBackend for OsascriptBackend {
    fn name(&self) -> &'static str {
        "osascript"
    }

    async fn execute(&mut self, instruction: &Instruction) -> Result<(), InjectionError> {
        let Some(script) = script_for(instruction) else {
            return Ok(());
        };

        let mut child = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| InjectionError::Spawn {
                tool: "osascript",
                source,
            })?;

        // Fire and forget, but reap the exit status off-path.
        tokio::spawn(async move {
            let _ = child.wait().await;
        });

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
