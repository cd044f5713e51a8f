//! Minimal TOML parser for the marquee configuration
//!
//! Handles only the subset marquee.toml uses. It does NOT support the
//! full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - [section] headers
//! - Comments (# ...) on their own lines
//!
//! build.rs validates the embedded file with a real TOML parser at
//! compile time; this parser only has to agree with it at boot.

use rheo_core::config::MarqueeConfig;
use rheo_display::{PANEL_HEIGHT, PANEL_WIDTH};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Malformed key/value line or out-of-range value
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy)]
enum Section {
    Root,
    Panel,
    Text,
    Color,
    Scroll,
}

/// Parse TOML configuration into MarqueeConfig
pub fn parse_config(input: &str) -> Result<MarqueeConfig, ConfigError> {
    let mut config = MarqueeConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[') {
            let name = name.strip_suffix(']').ok_or(ConfigError::InvalidSection)?;
            section = match name.trim() {
                "panel" => Section::Panel,
                "text" => Section::Text,
                "color" => Section::Color,
                "scroll" => Section::Scroll,
                _ => return Err(ConfigError::InvalidSection),
            };
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ConfigError::InvalidValue)?;
        let (key, value) = (key.trim(), value.trim());

        // Unknown keys within a known section are ignored
        match section {
            Section::Root => return Err(ConfigError::InvalidValue),
            Section::Panel => match key {
                "width" => config.panel.width = parse_num(value)?,
                "height" => config.panel.height = parse_num(value)?,
                "bottom_shift" => config.panel.bottom_shift = parse_num(value)?,
                "brightness" => config.panel.brightness = parse_num(value)?,
                _ => {}
            },
            Section::Text => match key {
                "content" => {
                    let text = parse_string(value)?;
                    config.text.content.clear();
                    for ch in text.chars() {
                        if config.text.content.push(ch).is_err() {
                            break;
                        }
                    }
                }
                "font_size" => config.text.font_size = parse_num(value)?,
                "vertical_offset" => config.text.vertical_offset = parse_num(value)?,
                _ => {}
            },
            Section::Color => match key {
                "r" => config.color.r = parse_num(value)?,
                "g" => config.color.g = parse_num(value)?,
                "b" => config.color.b = parse_num(value)?,
                "rainbow" => config.color.rainbow = parse_bool(value)?,
                "rainbow_scale" => config.color.rainbow_scale = parse_num(value)?,
                _ => {}
            },
            Section::Scroll => match key {
                "step" => config.scroll.step = parse_num(value)?,
                "frame_ms" => config.scroll.frame_ms = parse_num(value)?,
                _ => {}
            },
        }
    }

    // The frame pair is statically sized; reject configs for other panels
    if config.panel.width as usize != PANEL_WIDTH || config.panel.height as usize != PANEL_HEIGHT {
        return Err(ConfigError::InvalidValue);
    }

    Ok(config)
}

fn parse_num<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

fn parse_string(value: &str) -> Result<&str, ConfigError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ConfigError::InvalidValue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embedded_config() {
        let config = parse_config(include_str!("../marquee.toml")).unwrap();
        assert_eq!(config.panel.width, 64);
        assert_eq!(config.panel.bottom_shift, 1);
        assert_eq!(config.text.content.as_str(), "Rheo 64x64");
        assert_eq!(config.text.font_size, 48);
        assert!(!config.color.rainbow);
        assert_eq!(config.scroll.frame_ms, 20);
    }

    #[test]
    fn test_unknown_section_rejected() {
        let input = "[panel]\nwidth = 64\nheight = 64\n[bogus]\nkey = 1\n";
        assert_eq!(parse_config(input), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_unknown_key_ignored() {
        let input = "[panel]\nwidth = 64\nheight = 64\nnot_a_key = 7\n";
        assert!(parse_config(input).is_ok());
    }

    #[test]
    fn test_bad_value_rejected() {
        let input = "[panel]\nwidth = sixty-four\n";
        assert_eq!(parse_config(input), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_wrong_panel_size_rejected() {
        let input = "[panel]\nwidth = 32\nheight = 64\n";
        assert_eq!(parse_config(input), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_missing_values_fall_back_to_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, MarqueeConfig::default());
    }
}
