//! Scroll engine
//!
//! Per-frame windowed copy from the wide canvas onto the panel. The
//! cost of one tick is proportional to the panel area, never to the
//! text length, so the frame rate holds regardless of string size.

use crate::canvas::Canvas;
use crate::color::Rgb565;
use crate::traits::Panel;

/// Animation state for the horizontal scroll.
///
/// `offset` is the canvas column aligned with the panel's left edge. It
/// starts at `-panel_width` so the text enters from fully off-screen
/// left, and wraps back there after the tail exits on the right.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollEngine {
    offset: i32,
    step: i32,
    panel_width: i32,
}

impl ScrollEngine {
    pub fn new(panel_width: u32, step: u32) -> Self {
        let mut engine = Self {
            offset: 0,
            step: step as i32,
            panel_width: panel_width as i32,
        };
        engine.reset();
        engine
    }

    /// Rewind so the text enters from off-screen left.
    ///
    /// Called after every canvas rebuild and on wraparound.
    pub fn reset(&mut self) {
        self.offset = -self.panel_width;
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Produce one frame: clear, copy the visible window, present,
    /// advance.
    ///
    /// Zero (background) and out-of-range source pixels are left as the
    /// cleared background; lit pixels copy through unchanged.
    pub fn tick<P: Panel>(&mut self, canvas: &Canvas, panel: &mut P) {
        panel.fill(Rgb565::OFF);

        let rows = panel.height().min(canvas.height() as u32);
        for y in 0..rows {
            let row = canvas.row(y as usize);
            for x in 0..panel.width() {
                let src_x = self.offset + x as i32;
                if src_x >= 0 && (src_x as usize) < row.len() {
                    let color = Rgb565(row[src_x as usize]);
                    if color.is_lit() {
                        panel.draw_pixel(x, y, color);
                    }
                }
            }
        }

        panel.swap_buffers();

        self.offset += self.step;
        if self.offset > canvas.width() as i32 {
            self.reset();
        }
    }
}
