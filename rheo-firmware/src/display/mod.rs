//! HUB75 panel driver
//!
//! Splits into the shared frame pair (written by the marquee through
//! `PanelHandle`, read by `scan_task`) and the GPIO scanout itself.

mod hub75;

pub use hub75::{scan_task, Hub75Pins, PanelHandle};
