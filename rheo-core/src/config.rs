//! Configuration type definitions
//!
//! Plain data consumed by the firmware at boot. The firmware parses
//! these out of the embedded `marquee.toml`; defaults match a 64x64
//! Waveshare-style panel with the bottom-half column shift.

use heapless::String;

use crate::command::MAX_TEXT_LEN;
use crate::compositor::ColorMode;

/// Physical panel parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelConfig {
    /// Panel width in pixels.
    pub width: u32,
    /// Panel height in pixels.
    pub height: u32,
    /// Horizontal correction applied to rows in the bottom half.
    /// Panels from some batches need 1 or -1 to align the halves.
    pub bottom_shift: i32,
    /// Global brightness, 0-255.
    pub brightness: u8,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            bottom_shift: 1,
            brightness: 60,
        }
    }
}

/// Text rendering parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextConfig {
    /// Text shown at boot, before any serial command arrives.
    pub content: String<MAX_TEXT_LEN>,
    /// Font pixel size. 48 is safe on a 64-row panel; 55 may clip tails.
    pub font_size: u32,
    /// Vertical nudge, negative moves text up to fit letter tails.
    pub vertical_offset: i32,
}

impl Default for TextConfig {
    fn default() -> Self {
        let mut content = String::new();
        let _ = content.push_str("Rheo");
        Self {
            content,
            font_size: 48,
            vertical_offset: -4,
        }
    }
}

/// Initial fill color parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorConfig {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Rainbow fill instead of the solid color.
    pub rainbow: bool,
    /// Hue per canvas column. 0.2 gives a wide rainbow, 1.0 a tight one.
    pub rainbow_scale: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            r: 0,
            g: 255,
            b: 255,
            rainbow: false,
            rainbow_scale: 0.5,
        }
    }
}

impl ColorConfig {
    /// The color mode the compositor starts in.
    pub fn mode(&self) -> ColorMode {
        if self.rainbow {
            ColorMode::Rainbow {
                scale: self.rainbow_scale,
            }
        } else {
            ColorMode::Solid {
                r: self.r,
                g: self.g,
                b: self.b,
            }
        }
    }
}

/// Scroll animation parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollConfig {
    /// Pixels advanced per frame. 1 is smooth, 3 is fast.
    pub step: u32,
    /// Minimum milliseconds between frames.
    pub frame_ms: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            step: 2,
            frame_ms: 20,
        }
    }
}

/// Complete marquee configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarqueeConfig {
    pub panel: PanelConfig,
    pub text: TextConfig,
    pub color: ColorConfig,
    pub scroll: ScrollConfig,
}
