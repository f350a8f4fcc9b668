//! Key code translation tables for the platform injection backends.
//!
//! The canonical representation is the browser's `KeyboardEvent.keyCode`
//! value: the controller page sends that number on the wire and each backend
//! translates it at the injection boundary.  The tables are static and
//! read-only; fallback policy for an absent entry belongs to the backend
//! (xdotool forwards the raw number as a key name, osascript drops the event).

pub mod macos_cg;
pub mod xdotool;

/// Unified key mapper providing all translation directions.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a browser key code to an xdotool key name for the Linux
    /// backend.
    ///
    /// Returns `None` if the code has no named equivalent; the backend then
    /// forwards the raw numeric code instead.
    pub fn web_to_xdotool(code: u8) -> Option<&'static str> {
        xdotool::web_to_key_name(code)
    }

    /// Translates a browser key code to a macOS `CGKeyCode` value for the
    /// osascript backend.
    ///
    /// Returns `None` if the code has no macOS equivalent; the backend then
    /// drops the key event.
    pub fn web_to_macos_cgkeycode(code: u8) -> Option<u16> {
        macos_cg::web_to_cgkeycode(code)
    }
}
