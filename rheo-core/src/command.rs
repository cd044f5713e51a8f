//! Serial command grammar
//!
//! The runtime interface is line-oriented text: a line starting with
//! `COLOR` (case-insensitive, then space or colon) carries three 0-255
//! channel values separated by spaces or commas; any other non-empty
//! line replaces the displayed text. Only a successfully parsed command
//! mutates state - malformed color parameters are rejected, not shown.

use heapless::String;

/// Maximum accepted text length in bytes. Longer lines are truncated at
/// a character boundary.
pub const MAX_TEXT_LEN: usize = 256;

/// A parsed runtime command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Replace the displayed text.
    SetText(String<MAX_TEXT_LEN>),
    /// Change the solid fill color.
    SetColor { r: u8, g: u8, b: u8 },
}

/// Errors for lines that must not mutate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Blank line.
    Empty,
    /// `COLOR` directive with missing or out-of-range parameters.
    BadColor,
}

/// Parse one input line into a command.
pub fn parse_line(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }

    if let Some(params) = strip_color_prefix(line) {
        return match parse_channels(params) {
            Some((r, g, b)) => Ok(Command::SetColor { r, g, b }),
            None => Err(CommandError::BadColor),
        };
    }

    let mut text = String::new();
    for ch in line.chars() {
        if text.push(ch).is_err() {
            break;
        }
    }
    Ok(Command::SetText(text))
}

/// `COLOR` followed by a space or colon separator, any case.
fn strip_color_prefix(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    if bytes.len() > 5
        && bytes[..5].eq_ignore_ascii_case(b"color")
        && (bytes[5] == b' ' || bytes[5] == b':')
    {
        Some(&line[6..])
    } else {
        None
    }
}

/// Three decimal channel values, space- or comma-separated.
fn parse_channels(params: &str) -> Option<(u8, u8, u8)> {
    let mut it = params
        .split(|c: char| c == ' ' || c == ',')
        .filter(|s| !s.is_empty());

    let r = it.next()?.parse::<u8>().ok()?;
    let g = it.next()?.parse::<u8>().ok()?;
    let b = it.next()?.parse::<u8>().ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_with_spaces() {
        assert_eq!(
            parse_line("COLOR 255 0 0"),
            Ok(Command::SetColor { r: 255, g: 0, b: 0 })
        );
    }

    #[test]
    fn test_color_with_commas_and_colon() {
        assert_eq!(
            parse_line("color:0,128,255"),
            Ok(Command::SetColor { r: 0, g: 128, b: 255 })
        );
    }

    #[test]
    fn test_color_mixed_case() {
        assert_eq!(
            parse_line("Color 1 2 3"),
            Ok(Command::SetColor { r: 1, g: 2, b: 3 })
        );
    }

    #[test]
    fn test_color_out_of_range_rejected() {
        assert_eq!(parse_line("COLOR 300 0 0"), Err(CommandError::BadColor));
        assert_eq!(parse_line("COLOR -1 0 0"), Err(CommandError::BadColor));
    }

    #[test]
    fn test_color_missing_params_rejected() {
        assert_eq!(parse_line("COLOR 10 20"), Err(CommandError::BadColor));
        assert_eq!(parse_line("COLOR red green blue"), Err(CommandError::BadColor));
    }

    #[test]
    fn test_plain_text() {
        let cmd = parse_line("  Slow Down!  ").unwrap();
        match cmd {
            Command::SetText(s) => assert_eq!(s.as_str(), "Slow Down!"),
            _ => panic!("expected SetText"),
        }
    }

    #[test]
    fn test_bare_color_word_is_text() {
        // No separator after the keyword, so it is just a message
        match parse_line("color").unwrap() {
            Command::SetText(s) => assert_eq!(s.as_str(), "color"),
            _ => panic!("expected SetText"),
        }
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(parse_line("   "), Err(CommandError::Empty));
    }

    #[test]
    fn test_overlong_text_truncates_at_char_boundary() {
        let long: std::string::String = core::iter::repeat('語').take(200).collect();
        match parse_line(&long).unwrap() {
            Command::SetText(s) => {
                assert!(s.len() <= MAX_TEXT_LEN);
                assert!(s.as_str().chars().all(|c| c == '語'));
            }
            _ => panic!("expected SetText"),
        }
    }
}
