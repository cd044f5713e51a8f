//! Board-agnostic core logic for the Rheo marquee firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - The off-screen canvas (owned pixel buffer with panel-quirk remap)
//! - HSV color model and RGB565 packing
//! - Text compositor (measure, rasterize, recolor)
//! - Scroll engine (windowed per-frame copy)
//! - Serial command grammar
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod canvas;
pub mod color;
pub mod command;
pub mod compositor;
pub mod config;
pub mod scroll;
pub mod traits;

pub use canvas::{Canvas, CanvasError};
pub use color::{hsv_to_rgb565, Rgb565};
pub use command::{parse_line, Command, CommandError, MAX_TEXT_LEN};
pub use compositor::{ColorMode, Compositor, Marquee, RebuildError, CANVAS_PADDING};
pub use config::MarqueeConfig;
pub use scroll::ScrollEngine;
pub use traits::{Panel, PixelSink, RasterError, TextRasterizer};
