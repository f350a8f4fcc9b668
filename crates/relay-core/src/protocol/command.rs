//! Command line parsing: wire text in, typed [`Instruction`] out.
//!
//! # Wire grammar
//!
//! One transport message is a batch of commands separated by `\n`.  Each line
//! has the shape `<VERB> <arg>...` with single spaces between tokens.  Verbs
//! are case-sensitive:
//!
//! | Verb | Args             | Meaning                                   |
//! |------|------------------|-------------------------------------------|
//! | `M`  | `dx dy`          | relative pointer move, integer pixel deltas|
//! | `LC` | `0\|1`           | left button up(0) / down(1)                |
//! | `RC` | `0\|1`           | right button up / down                     |
//! | `MC` | `0\|1`           | middle button up / down                    |
//! | `W`  | signed int       | wheel delta; sign selects the direction    |
//! | `K`  | `keycode 0\|1`   | key up / down for a browser key code       |
//!
//! # Validation granularity
//!
//! Validation happens at two levels, and they behave differently on failure:
//!
//! - [`payload_is_allowed`] checks the **whole message** against a character
//!   allow-list (`A-Z`, `a-z`, `0-9`, whitespace, `-`) *before* line
//!   splitting.  One bad character discards the entire batch, including any
//!   well-formed lines in it.
//! - [`parse_line`] validates **one line**.  A line that fails (unknown verb,
//!   wrong arity, non-numeric argument) is dropped on its own; the rest of
//!   the batch still executes.
//!
//! Nothing is ever reported back to the client; a dropped message or line is
//! only visible as an absence of effect.
//!
//! # Strict numeric arguments
//!
//! Every numeric argument must parse as an integer of the expected width, and
//! button/key press flags accept only `0` or `1`.  Anything else drops the
//! line.

use tracing::trace;

/// A validated, typed unit of input-injection work.
///
/// One `Instruction` is derived from one command line.  It is immutable once
/// parsed and carries no identity beyond its verb and arguments, so it derives
/// `Copy` and compares structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Move the pointer by `(dx, dy)` pixels relative to its current position.
    MoveRelative { dx: i32, dy: i32 },
    /// Press (`true`) or release (`false`) the left mouse button.
    LeftButton { pressed: bool },
    /// Press or release the right mouse button.
    RightButton { pressed: bool },
    /// Press or release the middle mouse button.
    MiddleButton { pressed: bool },
    /// Scroll the wheel.  Positive values scroll one way, negative the other;
    /// backends whose native primitive is a discrete scroll event use only
    /// the sign.
    Wheel { delta: i32 },
    /// Press or release the key identified by a browser
    /// `KeyboardEvent.keyCode` value.
    Key { code: u8, pressed: bool },
}

/// Checks the whole transport message against the character allow-list.
///
/// Returns `true` iff the message is non-empty and every character is an
/// ASCII letter or digit, whitespace, or `-`.  This runs over the message
/// *before* line splitting: a single disallowed character rejects the entire
/// batch.
pub fn payload_is_allowed(message: &str) -> bool {
    !message.is_empty()
        && message
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-')
}

/// Parses one command line into an [`Instruction`].
///
/// The line is trimmed, then tokenized by single-space splitting; the first
/// token is the verb.  Returns `None` for empty lines, unknown verbs, wrong
/// argument counts, and arguments that fail strict numeric parsing.
pub fn parse_line(line: &str) -> Option<Instruction> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // Single-space splitting: a doubled space produces an empty token, which
    // fails the arity check below.  This matches the wire grammar exactly
    // rather than being whitespace-lenient.
    let tokens: Vec<&str> = line.split(' ').collect();

    let instruction = match (tokens[0], tokens.len()) {
        ("M", 3) => Instruction::MoveRelative {
            dx: parse_int(tokens[1])?,
            dy: parse_int(tokens[2])?,
        },
        ("LC", 2) => Instruction::LeftButton {
            pressed: parse_flag(tokens[1])?,
        },
        ("RC", 2) => Instruction::RightButton {
            pressed: parse_flag(tokens[1])?,
        },
        ("MC", 2) => Instruction::MiddleButton {
            pressed: parse_flag(tokens[1])?,
        },
        ("W", 2) => Instruction::Wheel {
            delta: parse_int(tokens[1])?,
        },
        ("K", 3) => Instruction::Key {
            code: tokens[1].parse::<u8>().ok()?,
            pressed: parse_flag(tokens[2])?,
        },
        _ => {
            trace!(line, "dropping unrecognized command line");
            return None;
        }
    };

    Some(instruction)
}

/// Parses a whole transport message into the instructions it carries, in
/// arrival order.
///
/// Returns an empty vector when the allow-list rejects the message.  Otherwise
/// splits on `\n`, trims each line, and keeps every line that parses; lines
/// that fail are dropped individually.
pub fn parse_message(message: &str) -> Vec<Instruction> {
    if !payload_is_allowed(message) {
        trace!("dropping message with disallowed characters");
        return Vec::new();
    }

    message.split('\n').filter_map(parse_line).collect()
}

fn parse_int(token: &str) -> Option<i32> {
    token.parse::<i32>().ok()
}

/// Press flags accept exactly `0` (release) or `1` (press).
fn parse_flag(token: &str) -> Option<bool> {
    match token.parse::<u8>().ok()? {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Allow-list filter ─────────────────────────────────────────────────────

    #[test]
    fn test_payload_with_letters_digits_spaces_hyphens_is_allowed() {
        assert!(payload_is_allowed("M 10 -5\nLC 1"));
    }

    #[test]
    fn test_payload_with_punctuation_is_rejected() {
        assert!(!payload_is_allowed("M 10 -5; rm"));
    }

    #[test]
    fn test_payload_with_one_bad_character_among_valid_lines_is_rejected() {
        // The filter runs over the whole message, so a single bad character
        // in the last line rejects the well-formed first line too.
        assert!(!payload_is_allowed("M 1 2\nLC !"));
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        assert!(!payload_is_allowed(""));
    }

    #[test]
    fn test_payload_with_newlines_and_carriage_returns_is_allowed() {
        assert!(payload_is_allowed("M 1 2\r\nW -120\n"));
    }

    // ── Verb parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_parse_move_relative() {
        // Arrange / Act
        let parsed = parse_line("M 10 -5");
        // Assert
        assert_eq!(parsed, Some(Instruction::MoveRelative { dx: 10, dy: -5 }));
    }

    #[test]
    fn test_parse_left_button_down() {
        assert_eq!(
            parse_line("LC 1"),
            Some(Instruction::LeftButton { pressed: true })
        );
    }

    #[test]
    fn test_parse_left_button_up() {
        assert_eq!(
            parse_line("LC 0"),
            Some(Instruction::LeftButton { pressed: false })
        );
    }

    #[test]
    fn test_parse_right_button() {
        assert_eq!(
            parse_line("RC 1"),
            Some(Instruction::RightButton { pressed: true })
        );
    }

    #[test]
    fn test_parse_middle_button() {
        assert_eq!(
            parse_line("MC 0"),
            Some(Instruction::MiddleButton { pressed: false })
        );
    }

    #[test]
    fn test_parse_wheel_negative() {
        assert_eq!(parse_line("W -120"), Some(Instruction::Wheel { delta: -120 }));
    }

    #[test]
    fn test_parse_wheel_positive() {
        assert_eq!(parse_line("W 120"), Some(Instruction::Wheel { delta: 120 }));
    }

    #[test]
    fn test_parse_key_down() {
        assert_eq!(
            parse_line("K 38 1"),
            Some(Instruction::Key { code: 38, pressed: true })
        );
    }

    #[test]
    fn test_parse_key_up() {
        assert_eq!(
            parse_line("K 38 0"),
            Some(Instruction::Key { code: 38, pressed: false })
        );
    }

    // ── Rejection cases ───────────────────────────────────────────────────────

    #[test]
    fn test_unknown_verb_is_dropped() {
        assert_eq!(parse_line("Z 1 2"), None);
    }

    #[test]
    fn test_lowercase_verb_is_dropped() {
        // Verbs are case-sensitive on the wire.
        assert_eq!(parse_line("m 1 2"), None);
    }

    #[test]
    fn test_empty_line_is_dropped() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn test_non_numeric_move_argument_is_dropped() {
        // Strict numeric parsing: a token that is not an integer drops the
        // line rather than reaching a backend as garbage.
        assert_eq!(parse_line("M ab 3"), None);
    }

    #[test]
    fn test_missing_argument_is_dropped() {
        assert_eq!(parse_line("M 10"), None);
        assert_eq!(parse_line("LC"), None);
        assert_eq!(parse_line("K 38"), None);
    }

    #[test]
    fn test_extra_argument_is_dropped() {
        assert_eq!(parse_line("LC 1 1"), None);
        assert_eq!(parse_line("W 1 2"), None);
    }

    #[test]
    fn test_button_flag_other_than_zero_or_one_is_dropped() {
        assert_eq!(parse_line("LC 2"), None);
        assert_eq!(parse_line("RC -1"), None);
    }

    #[test]
    fn test_key_code_out_of_byte_range_is_dropped() {
        assert_eq!(parse_line("K 999 1"), None);
    }

    #[test]
    fn test_doubled_space_is_dropped() {
        // Single-space tokenization: "M  1 2" yields an empty token.
        assert_eq!(parse_line("M  1 2"), None);
    }

    #[test]
    fn test_leading_and_trailing_whitespace_is_trimmed() {
        assert_eq!(
            parse_line("  M 1 2  "),
            Some(Instruction::MoveRelative { dx: 1, dy: 2 })
        );
    }

    // ── Whole-message parsing ─────────────────────────────────────────────────

    #[test]
    fn test_parse_message_preserves_line_order() {
        // Arrange
        let message = "M 10 -5\nLC 1\nLC 0\nW 120";

        // Act
        let instructions = parse_message(message);

        // Assert
        assert_eq!(
            instructions,
            vec![
                Instruction::MoveRelative { dx: 10, dy: -5 },
                Instruction::LeftButton { pressed: true },
                Instruction::LeftButton { pressed: false },
                Instruction::Wheel { delta: 120 },
            ]
        );
    }

    #[test]
    fn test_parse_message_with_disallowed_character_yields_nothing() {
        // Even the well-formed first line must not execute.
        let message = "M 1 2\nLC 1;";
        assert!(parse_message(message).is_empty());
    }

    #[test]
    fn test_parse_message_drops_bad_lines_but_keeps_good_ones() {
        let message = "M 1 2\nZ 9 9\nLC 1";
        assert_eq!(
            parse_message(message),
            vec![
                Instruction::MoveRelative { dx: 1, dy: 2 },
                Instruction::LeftButton { pressed: true },
            ]
        );
    }

    #[test]
    fn test_parse_message_ignores_blank_lines() {
        let message = "M 1 2\n\n\nLC 1\n";
        assert_eq!(parse_message(message).len(), 2);
    }

    #[test]
    fn test_parse_message_handles_crlf_line_endings() {
        // `\r` passes the allow-list as whitespace and is trimmed per line.
        let message = "M 1 2\r\nLC 1\r\n";
        assert_eq!(
            parse_message(message),
            vec![
                Instruction::MoveRelative { dx: 1, dy: 2 },
                Instruction::LeftButton { pressed: true },
            ]
        );
    }

    #[test]
    fn test_instruction_is_copy_and_comparable() {
        // Instructions carry no identity beyond verb + args.
        let a = Instruction::Wheel { delta: 3 };
        let b = a;
        assert_eq!(a, b);
    }
}
