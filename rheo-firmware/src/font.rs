//! Font loading and glyph rasterization
//!
//! The TTF lives in a dedicated flash partition as a length-prefixed
//! blob (`RHEO` magic + little-endian u32 length + font bytes), flashed
//! separately from the firmware image. It is copied to the heap once at
//! boot and parsed by fontdue; glyphs render through the core's
//! `PixelSink` so canvas remap and clipping apply to every pixel.

use alloc::vec::Vec;

use defmt::*;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use fontdue::{Font, FontSettings};

use rheo_core::{PixelSink, RasterError, Rgb565, TextRasterizer};

/// Total flash size (2MB parts on the reference board)
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Font partition: the second megabyte of flash (the firmware image is
/// linked into the first, see memory.x)
const FONT_PARTITION_OFFSET: u32 = 0x0010_0000;

/// Partition header magic
const FONT_MAGIC: [u8; 4] = *b"RHEO";

/// Upper bound on accepted font size; the blob is copied into the heap
/// and has to leave room for the canvases
const MAX_FONT_LEN: usize = 96 * 1024;

/// Read size per flash call
const READ_CHUNK: usize = 4096;

/// Coverage level at which a glyph pixel counts as lit. The canvas
/// stores lit/unlit packed colors with 0 as the empty marker, so there
/// is no alpha channel to blend into.
const COVERAGE_THRESHOLD: u8 = 128;

/// Errors while loading the font partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontError {
    /// No valid partition header at the font offset.
    Missing,
    /// Declared length exceeds the accepted maximum.
    TooLarge,
    /// Heap could not hold the font blob.
    OutOfMemory,
    /// Flash read failed.
    Storage,
    /// fontdue rejected the font data.
    Parse,
}

/// Load the font partition and build a rasterizer at `font_size` pixels.
pub fn load(flash: Peri<'static, FLASH>, font_size: u32) -> Result<GlyphRasterizer, FontError> {
    let mut flash = Flash::<_, Blocking, FLASH_SIZE>::new_blocking(flash);

    let mut header = [0u8; 8];
    flash
        .blocking_read(FONT_PARTITION_OFFSET, &mut header)
        .map_err(|_| FontError::Storage)?;

    if header[..4] != FONT_MAGIC {
        return Err(FontError::Missing);
    }
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
    if len == 0 {
        return Err(FontError::Missing);
    }
    if len > MAX_FONT_LEN {
        return Err(FontError::TooLarge);
    }

    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| FontError::OutOfMemory)?;
    data.resize(len, 0);

    // Chunked reads keep individual flash calls bounded
    let mut done = 0;
    while done < len {
        let chunk = READ_CHUNK.min(len - done);
        flash
            .blocking_read(
                FONT_PARTITION_OFFSET + 8 + done as u32,
                &mut data[done..done + chunk],
            )
            .map_err(|_| FontError::Storage)?;
        done += chunk;
    }

    let settings = FontSettings {
        scale: font_size as f32,
        ..FontSettings::default()
    };
    let font = Font::from_bytes(&data[..], settings).map_err(|_| FontError::Parse)?;

    info!("Font loaded: {} bytes, {} glyphs", len, font.glyph_count());

    Ok(GlyphRasterizer {
        font,
        px: font_size as f32,
    })
}

/// fontdue-backed implementation of the core's rasterizer boundary.
pub struct GlyphRasterizer {
    font: Font,
    px: f32,
}

impl GlyphRasterizer {
    /// Baseline offset from the text origin (the top of the line box).
    fn ascent(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.px)
            .map(|m| m.ascent)
            .unwrap_or(self.px)
    }
}

impl TextRasterizer for GlyphRasterizer {
    fn measure(&self, text: &str) -> Result<u32, RasterError> {
        let mut width = 0.0f32;
        for ch in text.chars() {
            width += self.font.metrics(ch, self.px).advance_width;
        }
        // Manual ceil; f32::ceil needs std
        let truncated = width as u32;
        Ok(if width > truncated as f32 {
            truncated + 1
        } else {
            truncated
        })
    }

    fn render(
        &mut self,
        text: &str,
        origin_x: i32,
        origin_y: i32,
        base: Rgb565,
        sink: &mut dyn PixelSink,
    ) -> Result<(), RasterError> {
        let baseline = origin_y as f32 + self.ascent();
        let mut pen_x = origin_x as f32;

        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, self.px);

            let x0 = pen_x as i32 + metrics.xmin;
            // ymin is the bitmap bottom relative to the baseline, y-up
            let y0 = baseline as i32 - (metrics.ymin + metrics.height as i32);

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    if bitmap[row * metrics.width + col] >= COVERAGE_THRESHOLD {
                        sink.set_pixel(x0 + col as i32, y0 + row as i32, base);
                    }
                }
            }

            pen_x += metrics.advance_width;
        }

        Ok(())
    }
}
