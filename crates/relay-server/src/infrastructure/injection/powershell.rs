//! Windows injection backend: a persistent PowerShell child process.
//!
//! There is no standalone command-line tool on Windows that injects input the
//! way xdotool does on X11, but PowerShell can P/Invoke the Win32
//! `mouse_event`/`keybd_event` functions directly.  So this backend spawns
//! one `powershell -Command -` child, feeds it a small bootstrap script, and
//! then streams one mini-command per line to its stdin for the life of the
//! server.
//!
//! # Mini-command language
//!
//! The bootstrap script reads lines and performs the matching Win32 call:
//!
//! | Line | Win32 call |
//! |------|------------|
//! | `M dx dy`  | `mouse_event(MOUSEEVENTF_MOVE, dx, dy, 0, 0)` |
//! | `LC 0\|1`  | `mouse_event(LEFTUP \| LEFTDOWN, ...)`   |
//! | `RC 0\|1`  | `mouse_event(RIGHTUP \| RIGHTDOWN, ...)` |
//! | `MC 0\|1`  | `mouse_event(MIDDLEUP \| MIDDLEDOWN, ...)` |
//! | `W delta`  | `mouse_event(MOUSEEVENTF_WHEEL, 0, 0, delta, 0)` |
//! | `K vk 0\|1`| `keybd_event(vk, 0, 0 \| KEYEVENTF_KEYUP, 0)` |
//!
//! The wheel passes the signed delta straight through — `mouse_event` takes
//! the magnitude natively, so unlike the xdotool backend no sign-flattening
//! happens here.  Key codes go through as raw bytes: Windows virtual-key
//! codes coincide with the browser `keyCode` values, so no table lookup is
//! needed on this platform.
//!
//! Nothing is ever read back from the child; its stdout/stderr pass through
//! to the host console.

use async_trait::async_trait;

use relay_core::Instruction;

use super::{InjectionError, InputBackend, PipeChild};

/// Bootstrap program fed to the child before any command.
///
/// Declares the P/Invoke signatures, then loops reading one command line at a
/// time until stdin closes.  A malformed line is swallowed by the inner
/// `try/catch` so a stray command can never kill the child.
const BOOTSTRAP: &str = r#"
Add-Type -TypeDefinition @"
using System;
using System.Runtime.InteropServices;
public class RelayInput {
    [DllImport("user32.dll")] public static extern void mouse_event(int dwFlags, int dx, int dy, int dwData, int dwExtraInfo);
    [DllImport("user32.dll")] public static extern void keybd_event(byte bVk, byte bScan, int dwFlags, int dwExtraInfo);
}
"@
while ($true) {
    $line = [Console]::In.ReadLine()
    if ($null -eq $line) { break }
    try {
        $parts = $line.Split(' ')
        switch ($parts[0]) {
            'M'  { [RelayInput]::mouse_event(0x0001, [int]$parts[1], [int]$parts[2], 0, 0) }
            'LC' { [RelayInput]::mouse_event($(if ($parts[1] -eq '1') { 0x0002 } else { 0x0004 }), 0, 0, 0, 0) }
            'RC' { [RelayInput]::mouse_event($(if ($parts[1] -eq '1') { 0x0008 } else { 0x0010 }), 0, 0, 0, 0) }
            'MC' { [RelayInput]::mouse_event($(if ($parts[1] -eq '1') { 0x0020 } else { 0x0040 }), 0, 0, 0, 0) }
            'W'  { [RelayInput]::mouse_event(0x0800, 0, 0, [int]$parts[1], 0) }
            'K'  { [RelayInput]::keybd_event([byte][int]$parts[1], 0, $(if ($parts[2] -eq '1') { 0 } else { 2 }), 0) }
        }
    } catch {}
}
"#;

/// Persistent-pipe Windows backend.
pub struct PowershellBackend {
    pipe: PipeChild,
}

impl PowershellBackend {
    /// Spawns the PowerShell child and feeds it the bootstrap script.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Spawn`] if `powershell` is not on `PATH`, or
    /// a pipe error if the bootstrap write fails.
    pub async fn spawn() -> Result<Self, InjectionError> {
        let mut pipe = PipeChild::spawn("powershell", "powershell", &["-Command", "-"])?;
        pipe.write_line(BOOTSTRAP).await?;
        Ok(Self { pipe })
    }
}

/// Re-encodes an instruction into the bootstrap script's line syntax.
pub(crate) fn encode(instruction: &Instruction) -> String {
    match instruction {
        Instruction::MoveRelative { dx, dy } => format!("M {dx} {dy}"),
        Instruction::LeftButton { pressed } => format!("LC {}", flag(*pressed)),
        Instruction::RightButton { pressed } => format!("RC {}", flag(*pressed)),
        Instruction::MiddleButton { pressed } => format!("MC {}", flag(*pressed)),
        Instruction::Wheel { delta } => format!("W {delta}"),
        Instruction::Key { code, pressed } => format!("K {code} {}", flag(*pressed)),
    }
}

fn flag(pressed: bool) -> u8 {
    u8::from(pressed)
}

#[async_trait]
impl InputBackend for PowershellBackend {
    fn name(&self) -> &'static str {
        "powershell"
    }

    async fn execute(&mut self, instruction: &Instruction) -> Result<(), InjectionError> {
        self.pipe.write_line(&encode(instruction)).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_move_preserves_signs_and_magnitudes() {
        assert_eq!(encode(&Instruction::MoveRelative { dx: 10, dy: -5 }), "M 10 -5");
        assert_eq!(encode(&Instruction::MoveRelative { dx: -10, dy: 5 }), "M -10 5");
    }

    #[test]
    fn test_encode_button_down_and_up() {
        assert_eq!(encode(&Instruction::LeftButton { pressed: true }), "LC 1");
        assert_eq!(encode(&Instruction::LeftButton { pressed: false }), "LC 0");
        assert_eq!(encode(&Instruction::RightButton { pressed: true }), "RC 1");
        assert_eq!(encode(&Instruction::MiddleButton { pressed: false }), "MC 0");
    }

    #[test]
    fn test_encode_wheel_passes_signed_magnitude_through() {
        // mouse_event takes the delta natively; no sign-flattening here.
        assert_eq!(encode(&Instruction::Wheel { delta: 120 }), "W 120");
        assert_eq!(encode(&Instruction::Wheel { delta: -120 }), "W -120");
    }

    #[test]
    fn test_encode_key_uses_raw_byte_code() {
        assert_eq!(encode(&Instruction::Key { code: 38, pressed: true }), "K 38 1");
        assert_eq!(encode(&Instruction::Key { code: 38, pressed: false }), "K 38 0");
    }

    #[test]
    fn test_bootstrap_declares_both_injection_entry_points() {
        assert!(BOOTSTRAP.contains("mouse_event"));
        assert!(BOOTSTRAP.contains("keybd_event"));
    }

    #[test]
    fn test_bootstrap_swallows_malformed_lines() {
        // The inner try/catch is what keeps a stray command from killing the
        // child; make sure it stays in place.
        assert!(BOOTSTRAP.contains("try"));
        assert!(BOOTSTRAP.contains("catch"));
    }
}
