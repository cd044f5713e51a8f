//! Text compositor
//!
//! Builds the off-screen canvas for the current text: measure, allocate,
//! rasterize in a base marker color, then recolor every lit pixel in
//! place. A rebuild is always a full rebuild; on any failure the caller
//! keeps the previous canvas and the display never shows a partial one.

use crate::canvas::{Canvas, CanvasError};
use crate::color::{hsv_to_rgb565, Rgb565};
use crate::command::{Command, MAX_TEXT_LEN};
use crate::config::MarqueeConfig;
use crate::scroll::ScrollEngine;
use crate::traits::{Panel, RasterError, TextRasterizer};

use heapless::String;

/// Horizontal margin added to the measured text width so glyph tails
/// are not clipped at the canvas edge.
pub const CANVAS_PADDING: u32 = 20;

/// How lit pixels are colored on rebuild. Pure configuration,
/// re-applied in full every time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorMode {
    /// Every lit pixel gets one fixed color.
    Solid { r: u8, g: u8, b: u8 },
    /// Hue keyed to the pixel's canvas column: a static left-to-right
    /// gradient fixed to the text, independent of scroll position.
    Rainbow { scale: f32 },
}

/// Errors that abort a canvas rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RebuildError {
    /// Canvas allocation failed.
    Canvas(CanvasError),
    /// The font engine could not measure or rasterize the text.
    Raster(RasterError),
}

impl From<CanvasError> for RebuildError {
    fn from(e: CanvasError) -> Self {
        Self::Canvas(e)
    }
}

impl From<RasterError> for RebuildError {
    fn from(e: RasterError) -> Self {
        Self::Raster(e)
    }
}

/// Layout parameters for canvas rebuilds.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Compositor {
    panel_height: u32,
    font_size: u32,
    vertical_offset: i32,
    bottom_shift: i32,
}

impl Compositor {
    pub fn new(
        panel_height: u32,
        font_size: u32,
        vertical_offset: i32,
        bottom_shift: i32,
    ) -> Self {
        Self {
            panel_height,
            font_size,
            vertical_offset,
            bottom_shift,
        }
    }

    /// Build a fresh, fully colored canvas for `text`.
    pub fn rebuild(
        &self,
        text: &str,
        mode: ColorMode,
        raster: &mut dyn TextRasterizer,
    ) -> Result<Canvas, RebuildError> {
        let width = raster.measure(text)? + CANVAS_PADDING;
        let mut canvas = Canvas::new(
            width as usize,
            self.panel_height as usize,
            self.bottom_shift,
        )?;

        let y = (self.panel_height as i32 - self.font_size as i32) / 2 + self.vertical_offset;
        raster.render(text, 0, y, Rgb565::WHITE, &mut canvas)?;

        apply_color(&mut canvas, mode);
        Ok(canvas)
    }
}

/// Overwrite every lit pixel according to the color mode.
///
/// This runs over the raw buffer, not through `set_pixel` - the remap
/// already happened when the glyphs were written.
fn apply_color(canvas: &mut Canvas, mode: ColorMode) {
    match mode {
        ColorMode::Solid { r, g, b } => {
            let solid = Rgb565::from_rgb(r, g, b);
            for px in canvas.pixels_mut() {
                if *px != 0 {
                    *px = solid.0;
                }
            }
        }
        ColorMode::Rainbow { scale } => {
            let width = canvas.width();
            for (i, px) in canvas.pixels_mut().iter_mut().enumerate() {
                if *px != 0 {
                    let x = i % width;
                    let hue = ((x as f32 * scale) as i32 % 255) as u8;
                    *px = hsv_to_rgb565(hue, 255, 255).0;
                }
            }
        }
    }
}

/// Application state for the marquee.
///
/// Owns the single live canvas (the compositor swaps it, the scroll
/// engine borrows it) together with the current text, color mode and
/// scroll state. Commands funnel through [`Marquee::apply`]; a failed
/// rebuild leaves everything as it was.
pub struct Marquee {
    compositor: Compositor,
    scroll: ScrollEngine,
    text: String<MAX_TEXT_LEN>,
    mode: ColorMode,
    canvas: Option<Canvas>,
}

impl Marquee {
    pub fn new(config: &MarqueeConfig) -> Self {
        Self {
            compositor: Compositor::new(
                config.panel.height,
                config.text.font_size,
                config.text.vertical_offset,
                config.panel.bottom_shift,
            ),
            scroll: ScrollEngine::new(config.panel.width, config.scroll.step),
            text: config.text.content.clone(),
            mode: config.color.mode(),
            canvas: None,
        }
    }

    /// The live canvas, if a rebuild has succeeded yet.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn offset(&self) -> i32 {
        self.scroll.offset()
    }

    /// Apply a parsed command: update state, then rebuild.
    ///
    /// A color command in rainbow mode changes nothing visible but still
    /// rebuilds, restarting the scroll like every other accepted command.
    pub fn apply(
        &mut self,
        cmd: Command,
        raster: &mut dyn TextRasterizer,
    ) -> Result<(), RebuildError> {
        match cmd {
            Command::SetText(text) => self.text = text,
            Command::SetColor { r, g, b } => {
                if let ColorMode::Solid { .. } = self.mode {
                    self.mode = ColorMode::Solid { r, g, b };
                }
            }
        }
        self.rebuild(raster)
    }

    /// Full rebuild of the canvas from current text and mode.
    ///
    /// On success the new canvas replaces the old one (dropping it) and
    /// the scroll rewinds off-screen left. On failure the previous
    /// canvas and scroll state stay authoritative.
    pub fn rebuild(&mut self, raster: &mut dyn TextRasterizer) -> Result<(), RebuildError> {
        let canvas = self
            .compositor
            .rebuild(self.text.as_str(), self.mode, raster)?;
        self.canvas = Some(canvas);
        self.scroll.reset();
        Ok(())
    }

    /// Run one scroll frame against the live canvas, if any.
    pub fn tick<P: Panel>(&mut self, panel: &mut P) {
        if let Some(canvas) = &self.canvas {
            self.scroll.tick(canvas, panel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-advance block glyphs: char N covers a rectangle starting at
    /// `origin_x + N * advance`. Deterministic stand-in for the font
    /// engine.
    struct BlockRasterizer {
        advance: u32,
        glyph_w: u32,
        glyph_h: u32,
        fail: bool,
    }

    impl BlockRasterizer {
        fn new() -> Self {
            Self {
                advance: 24,
                glyph_w: 20,
                glyph_h: 10,
                fail: false,
            }
        }
    }

    impl TextRasterizer for BlockRasterizer {
        fn measure(&self, text: &str) -> Result<u32, RasterError> {
            if self.fail {
                return Err(RasterError::NoGlyphs);
            }
            Ok(text.chars().count() as u32 * self.advance)
        }

        fn render(
            &mut self,
            text: &str,
            origin_x: i32,
            origin_y: i32,
            base: Rgb565,
            sink: &mut dyn crate::traits::PixelSink,
        ) -> Result<(), RasterError> {
            if self.fail {
                return Err(RasterError::NoGlyphs);
            }
            for (i, _) in text.chars().enumerate() {
                let gx = origin_x + (i as u32 * self.advance) as i32;
                for dy in 0..self.glyph_h as i32 {
                    for dx in 0..self.glyph_w as i32 {
                        sink.set_pixel(gx + dx, origin_y + dy, base);
                    }
                }
            }
            Ok(())
        }
    }

    fn test_config() -> MarqueeConfig {
        MarqueeConfig::default()
    }

    /// Panel stub for ticking without inspecting frames.
    struct NullPanel;

    impl Panel for NullPanel {
        fn width(&self) -> u32 {
            64
        }
        fn height(&self) -> u32 {
            64
        }
        fn draw_pixel(&mut self, _x: u32, _y: u32, _color: Rgb565) {}
        fn fill(&mut self, _color: Rgb565) {}
        fn swap_buffers(&mut self) {}
        fn set_brightness(&mut self, _level: u8) {}
    }

    fn lit_mask(canvas: &Canvas) -> Vec<(usize, usize)> {
        let mut mask = Vec::new();
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.get(x as i32, y as i32).is_lit() {
                    mask.push((x, y));
                }
            }
        }
        mask
    }

    #[test]
    fn test_width_is_measured_plus_padding() {
        let compositor = Compositor::new(64, 48, -4, 1);
        let mut raster = BlockRasterizer::new();
        let canvas = compositor
            .rebuild("AB", ColorMode::Solid { r: 0, g: 255, b: 255 }, &mut raster)
            .unwrap();
        assert_eq!(canvas.width(), (2 * 24 + CANVAS_PADDING) as usize);
        assert_eq!(canvas.height(), 64);
    }

    #[test]
    fn test_solid_fill_is_uniform() {
        let compositor = Compositor::new(64, 48, -4, 0);
        let mut raster = BlockRasterizer::new();
        let canvas = compositor
            .rebuild("Hi", ColorMode::Solid { r: 0, g: 255, b: 255 }, &mut raster)
            .unwrap();

        let expected = Rgb565::from_rgb(0, 255, 255);
        let mask = lit_mask(&canvas);
        assert!(!mask.is_empty());
        for &(x, y) in &mask {
            assert_eq!(canvas.get(x as i32, y as i32), expected);
        }
    }

    #[test]
    fn test_rainbow_is_a_function_of_column_only() {
        let compositor = Compositor::new(64, 48, -4, 0);
        let mut raster = BlockRasterizer::new();
        let canvas = compositor
            .rebuild("MM", ColorMode::Rainbow { scale: 0.5 }, &mut raster)
            .unwrap();

        // Any two lit pixels in the same column share a color
        for x in 0..canvas.width() {
            let mut column_color = None;
            for y in 0..canvas.height() {
                let c = canvas.get(x as i32, y as i32);
                if c.is_lit() {
                    match column_color {
                        None => column_color = Some(c),
                        Some(expected) => assert_eq!(c, expected),
                    }
                }
            }
        }

        // And the gradient actually varies across the text
        let mask = lit_mask(&canvas);
        let first = canvas.get(mask[0].0 as i32, mask[0].1 as i32);
        assert!(mask
            .iter()
            .any(|&(x, y)| canvas.get(x as i32, y as i32) != first));
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_canvas() {
        let mut marquee = Marquee::new(&test_config());
        let mut raster = BlockRasterizer::new();
        marquee.rebuild(&mut raster).unwrap();

        let old_width = marquee.canvas().unwrap().width();
        let mut panel = NullPanel;
        for _ in 0..5 {
            marquee.tick(&mut panel);
        }
        let old_offset = marquee.offset();

        raster.fail = true;
        let mut text = String::new();
        text.push_str("replacement").unwrap();
        let result = marquee.apply(Command::SetText(text), &mut raster);

        assert_eq!(result, Err(RebuildError::Raster(RasterError::NoGlyphs)));
        assert_eq!(marquee.canvas().unwrap().width(), old_width);
        assert_eq!(marquee.offset(), old_offset);
    }

    #[test]
    fn test_scenario_scroll_wraps_after_full_pass() {
        // "AB" on a 64x64 panel, solid cyan, step 2
        let mut marquee = Marquee::new(&test_config());
        let mut raster = BlockRasterizer::new();
        let mut text = String::new();
        text.push_str("AB").unwrap();
        marquee.apply(Command::SetText(text), &mut raster).unwrap();

        let canvas_width = marquee.canvas().unwrap().width();
        assert_eq!(canvas_width, (2 * 24 + CANVAS_PADDING) as usize);
        assert_eq!(marquee.offset(), -64);

        // Full pass plus the tick that crosses the wrap threshold
        // (the width divides evenly by the step here)
        let mut panel = NullPanel;
        let ticks = (canvas_width + 64).div_ceil(2) + 1;
        for _ in 0..ticks {
            marquee.tick(&mut panel);
        }
        assert_eq!(marquee.offset(), -64);
    }

    #[test]
    fn test_scenario_color_change_mid_scroll() {
        let mut marquee = Marquee::new(&test_config());
        let mut raster = BlockRasterizer::new();
        marquee.rebuild(&mut raster).unwrap();

        let mut panel = NullPanel;
        for _ in 0..7 {
            marquee.tick(&mut panel);
        }
        assert_ne!(marquee.offset(), -64);
        let old_mask = lit_mask(marquee.canvas().unwrap());

        marquee
            .apply(Command::SetColor { r: 255, g: 0, b: 0 }, &mut raster)
            .unwrap();

        // Offset rewinds, glyph shapes stay, color changes
        assert_eq!(marquee.offset(), -64);
        let canvas = marquee.canvas().unwrap();
        assert_eq!(lit_mask(canvas), old_mask);
        let red = Rgb565::from_rgb(255, 0, 0);
        for &(x, y) in &old_mask {
            assert_eq!(canvas.get(x as i32, y as i32), red);
        }
    }

    #[test]
    fn test_identical_rebuilds_are_idempotent() {
        let mut marquee = Marquee::new(&test_config());
        let mut raster = BlockRasterizer::new();
        marquee.rebuild(&mut raster).unwrap();
        let first = lit_mask(marquee.canvas().unwrap());
        let first_width = marquee.canvas().unwrap().width();

        marquee.rebuild(&mut raster).unwrap();
        assert_eq!(marquee.canvas().unwrap().width(), first_width);
        assert_eq!(lit_mask(marquee.canvas().unwrap()), first);
        assert_eq!(marquee.offset(), -64);
    }

    #[test]
    fn test_color_command_in_rainbow_mode_keeps_rainbow() {
        let mut config = test_config();
        config.color.rainbow = true;
        let mut marquee = Marquee::new(&config);
        let mut raster = BlockRasterizer::new();

        marquee
            .apply(Command::SetColor { r: 9, g: 9, b: 9 }, &mut raster)
            .unwrap();

        // Still a gradient, not a uniform near-black fill
        let canvas = marquee.canvas().unwrap();
        let mask = lit_mask(canvas);
        let first = canvas.get(mask[0].0 as i32, mask[0].1 as i32);
        assert!(mask
            .iter()
            .any(|&(x, y)| canvas.get(x as i32, y as i32) != first));
    }
}
