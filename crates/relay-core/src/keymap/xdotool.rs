//! Browser key code to xdotool key name translation for the Linux backend.
//!
//! xdotool's `keydown`/`keyup` commands take an X11 KeySym *name* (the
//! strings defined in X11/keysymdef.h with the `XK_` prefix removed, e.g.
//! `Up`, `Prior`, `BackSpace`) or, for letters and digits, the character
//! itself.  xdotool also accepts a raw decimal KeySym value, which is why an
//! absent entry here is not an error: the backend forwards the browser code
//! as-is and lets xdotool make what it can of it.
//!
//! The input domain is the browser's legacy `KeyboardEvent.keyCode` space,
//! because that is what the controller page puts on the wire.  Letter and
//! digit codes (48-57, 65-90) are not listed: a gamepad-driven controller
//! page only emits navigation and modifier keys.

/// Translates a browser `KeyboardEvent.keyCode` to an xdotool key name.
///
/// Returns `None` if the code has no named mapping.
pub fn web_to_key_name(code: u8) -> Option<&'static str> {
    match code {
        8 => Some("BackSpace"),  // Backspace
        9 => Some("Tab"),        // Tab
        13 => Some("Return"),    // Enter
        16 => Some("shift"),     // Shift
        17 => Some("ctrl"),      // Control
        18 => Some("alt"),       // Alt
        27 => Some("Escape"),    // Escape
        32 => Some("space"),     // Space bar
        33 => Some("Prior"),     // Page Up
        34 => Some("Next"),      // Page Down
        35 => Some("End"),       // End
        36 => Some("Home"),      // Home
        37 => Some("Left"),      // Arrow left
        38 => Some("Up"),        // Arrow up
        39 => Some("Right"),     // Arrow right
        40 => Some("Down"),      // Arrow down
        46 => Some("Delete"),    // Forward delete
        _ => None,
    }
}
