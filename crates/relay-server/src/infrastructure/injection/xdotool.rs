//! Linux injection backend: a persistent `xdotool` child process.
//!
//! `xdotool -` reads its own command language from stdin, one command per
//! line, and synthesizes the matching X11 events through the XTest extension.
//! This backend keeps one such child alive for the server's lifetime and
//! re-encodes each [`Instruction`] into xdotool's vocabulary:
//!
//! | Instruction | xdotool line |
//! |-------------|--------------|
//! | move        | `mousemove_relative -- dx dy` |
//! | left        | `mousedown 1` / `mouseup 1` |
//! | right       | `mousedown 3` / `mouseup 3` |
//! | middle      | `mousedown 2` / `mouseup 2` |
//! | wheel       | `click 4` (positive) / `click 5` (otherwise) |
//! | key         | `keydown <name>` / `keyup <name>` |
//!
//! X11 button numbering puts right on 3 and middle on 2, and has no wheel
//! primitive at all: scrolling is a click of button 4 (up) or 5 (down), so
//! the wheel delta's magnitude is discarded and only its sign survives.
//!
//! Key names come from the xdotool key table; a code with no named entry is
//! forwarded as the raw number, which xdotool accepts as a decimal KeySym.
//! The `--` in the move command keeps a negative dx from being read as an
//! option.

use async_trait::async_trait;

use relay_core::{Instruction, KeyMapper};

use super::{InjectionError, InputBackend, PipeChild};

/// Persistent-pipe Linux backend.
pub struct XdotoolBackend {
    pipe: PipeChild,
}

impl XdotoolBackend {
    /// Spawns `xdotool -` reading commands from stdin.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Spawn`] if `xdotool` is not installed.
    pub fn spawn() -> Result<Self, InjectionError> {
        let pipe = PipeChild::spawn("xdotool", "xdotool", &["-"])?;
        Ok(Self { pipe })
    }
}

/// Re-encodes an instruction into xdotool's command vocabulary.
pub(crate) fn encode(instruction: &Instruction) -> String {
    match instruction {
        Instruction::MoveRelative { dx, dy } => format!("mousemove_relative -- {dx} {dy}"),
        Instruction::LeftButton { pressed } => format!("{} 1", button_verb(*pressed)),
        Instruction::RightButton { pressed } => format!("{} 3", button_verb(*pressed)),
        Instruction::MiddleButton { pressed } => format!("{} 2", button_verb(*pressed)),
        Instruction::Wheel { delta } => {
            // Sign-only: X11 scroll is a discrete button click.
            format!("click {}", if *delta > 0 { 4 } else { 5 })
        }
        Instruction::Key { code, pressed } => match KeyMapper::web_to_xdotool(*code) {
            Some(name) => format!("{} {name}", key_verb(*pressed)),
            None => format!("{} {code}", key_verb(*pressed)),
        },
    }
}

fn button_verb(pressed: bool) -> &'static str {
    if pressed {
        "mousedown"
    } else {
        "mouseup"
    }
}

fn key_verb(pressed: bool) -> &'static str {
    if pressed {
        "keydown"
    } else {
        "keyup"
    }
}

#[async_trait]
impl InputBackend for XdotoolBackend {
    fn name(&self) -> &'static str {
        "xdotool"
    }

    async fn execute(&mut self, instruction: &Instruction) -> Result<(), InjectionError> {
        self.pipe.write_line(&encode(instruction)).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
