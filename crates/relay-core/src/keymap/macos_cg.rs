//! Browser key code to macOS CGKeyCode translation for the osascript backend.
//!
//! macOS identifies keys by `CGKeyCode` values (the `kVK_*` constants from
//! Carbon's HIToolbox/Events.h).  These are physical key positions on an ANSI
//! layout, unrelated to the character produced.  AppleScript's
//! `key down <n>` / `key up <n>` in System Events takes the same numbers,
//! which is how the one-shot backend injects them.
//!
//! Unlike the xdotool table there is no raw-numeric fallback: a browser key
//! code is *not* a valid CGKeyCode, so an absent entry means the key event is
//! dropped rather than mistranslated.

/// Translates a browser `KeyboardEvent.keyCode` to a macOS `CGKeyCode`.
///
/// Returns `None` if the code has no macOS equivalent.
pub fn web_to_cgkeycode(code: u8) -> Option<u16> {
    match code {
        8 => Some(51),   // kVK_Delete (backspace)
        9 => Some(48),   // kVK_Tab
        13 => Some(36),  // kVK_Return
        16 => Some(56),  // kVK_Shift
        17 => Some(59),  // kVK_Control
        18 => Some(58),  // kVK_Option
        27 => Some(53),  // kVK_Escape
        32 => Some(49),  // kVK_Space
        33 => Some(116), // kVK_PageUp
        34 => Some(121), // kVK_PageDown
        35 => Some(119), // kVK_End
        36 => Some(115), // kVK_Home
        37 => Some(123), // kVK_LeftArrow
        38 => Some(126), // kVK_UpArrow
        39 => Some(124), // kVK_RightArrow
        40 => Some(125), // kVK_DownArrow
        46 => Some(117), // kVK_ForwardDelete
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_have_cgkeycode_mappings() {
        assert_eq!(web_to_cgkeycode(37), Some(123));
        assert_eq!(web_to_cgkeycode(38), Some(126));
        assert_eq!(web_to_cgkeycode(39), Some(124));
        assert_eq!(web_to_cgkeycode(40), Some(125));
    }

    #[test]
    fn test_page_keys_have_cgkeycode_mappings() {
        assert_eq!(web_to_cgkeycode(33), Some(116));
        assert_eq!(web_to_cgkeycode(34), Some(121));
    }

    #[test]
    fn test_alt_maps_to_option_key() {
        assert_eq!(web_to_cgkeycode(18), Some(58));
    }

    #[test]
    fn test_common_editing_keys_have_mappings() {
        for code in [8u8, 9, 13, 16, 17, 27, 32, 35, 36, 46] {
            assert!(
                web_to_cgkeycode(code).is_some(),
                "key code {code} should have a CGKeyCode"
            );
        }
    }

    #[test]
    fn test_unmapped_code_returns_none() {
        assert_eq!(web_to_cgkeycode(65), None);
        assert_eq!(web_to_cgkeycode(0), None);
        assert_eq!(web_to_cgkeycode(255), None);
    }
}
