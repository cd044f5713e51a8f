//! Frame buffer types and scanout helpers for the Rheo HUB75 panel
//!
//! This crate provides:
//! - `FrameBuffer`: a fixed-size packed RGB565 frame
//! - `DoubleBuffer`: front/back frame pair with atomic-feeling swap
//! - `bcm`: bit-plane extraction for the HUB75 scanout loop
//!
//! # Architecture
//!
//! The marquee task draws into the back frame and swaps; the scanout
//! task reads row pairs out of the front frame and clocks them to the
//! panel shift registers plane by plane. Keeping these types free of
//! hardware lets the buffer and plane math run under host tests.

#![no_std]

pub mod bcm;
pub mod framebuffer;

pub use framebuffer::{DoubleBuffer, FrameBuffer, PANEL_HEIGHT, PANEL_WIDTH};
