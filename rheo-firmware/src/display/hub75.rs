//! HUB75 scanout and panel handle
//!
//! The panel has no frame memory of its own: rows must be re-shifted
//! continuously. `scan_task` walks the 32 row pairs of the front frame,
//! clocking out four BCM planes per pair and holding display-enable in
//! proportion to the plane weight, scaled by the brightness setting.
//!
//! The marquee composes into a staging frame and publishes it with a
//! single buffer swap, so the scanout never reads a half-drawn frame.

use core::cell::RefCell;

use cortex_m::asm;
use defmt::*;
use embassy_futures::yield_now;
use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicU8, Ordering};

use rheo_core::{Panel, Rgb565};
use rheo_display::bcm::{plane_weight, row_plane_words, BCM_PLANES};
use rheo_display::{DoubleBuffer, FrameBuffer, PANEL_HEIGHT, PANEL_WIDTH};

/// Front/back frame pair shared between the marquee and the scanout.
static FRAMES: Mutex<CriticalSectionRawMutex, RefCell<DoubleBuffer>> =
    Mutex::new(RefCell::new(DoubleBuffer::new()));

/// Global brightness, read by the scanout each row.
static BRIGHTNESS: AtomicU8 = AtomicU8::new(0);

/// Display-enable hold per plane-weight unit at full brightness, in CPU
/// cycles. Raising this brightens the panel but lowers the refresh rate.
const OE_BASE_CYCLES: u32 = 24;

/// The HUB75 control lines.
///
/// R1/G1/B1 feed the top half shift register, R2/G2/B2 the bottom half;
/// ADDR selects the row pair, CLK shifts, LAT latches, OE (active low)
/// lights the selected rows.
pub struct Hub75Pins {
    r1: Output<'static>,
    g1: Output<'static>,
    b1: Output<'static>,
    r2: Output<'static>,
    g2: Output<'static>,
    b2: Output<'static>,
    addr: [Output<'static>; 5],
    clk: Output<'static>,
    lat: Output<'static>,
    oe: Output<'static>,
}

impl Hub75Pins {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        r1: Peri<'static, AnyPin>,
        g1: Peri<'static, AnyPin>,
        b1: Peri<'static, AnyPin>,
        r2: Peri<'static, AnyPin>,
        g2: Peri<'static, AnyPin>,
        b2: Peri<'static, AnyPin>,
        a: Peri<'static, AnyPin>,
        b: Peri<'static, AnyPin>,
        c: Peri<'static, AnyPin>,
        d: Peri<'static, AnyPin>,
        e: Peri<'static, AnyPin>,
        clk: Peri<'static, AnyPin>,
        lat: Peri<'static, AnyPin>,
        oe: Peri<'static, AnyPin>,
    ) -> Self {
        Self {
            r1: Output::new(r1, Level::Low),
            g1: Output::new(g1, Level::Low),
            b1: Output::new(b1, Level::Low),
            r2: Output::new(r2, Level::Low),
            g2: Output::new(g2, Level::Low),
            b2: Output::new(b2, Level::Low),
            addr: [
                Output::new(a, Level::Low),
                Output::new(b, Level::Low),
                Output::new(c, Level::Low),
                Output::new(d, Level::Low),
                Output::new(e, Level::Low),
            ],
            clk: Output::new(clk, Level::Low),
            lat: Output::new(lat, Level::Low),
            // Active low: start blanked
            oe: Output::new(oe, Level::High),
        }
    }

    /// Clock one row pair's column words into the shift registers.
    fn shift_row(&mut self, words: &[u8]) {
        for &w in words {
            self.r1.set_level(Level::from(w & 0x01 != 0));
            self.g1.set_level(Level::from(w & 0x02 != 0));
            self.b1.set_level(Level::from(w & 0x04 != 0));
            self.r2.set_level(Level::from(w & 0x08 != 0));
            self.g2.set_level(Level::from(w & 0x10 != 0));
            self.b2.set_level(Level::from(w & 0x20 != 0));
            self.clk.set_high();
            self.clk.set_low();
        }
    }

    /// Blank the panel, select the row pair, latch the shifted data.
    fn select_and_latch(&mut self, row: u8) {
        self.oe.set_high();
        for (i, pin) in self.addr.iter_mut().enumerate() {
            pin.set_level(Level::from((row >> i) & 1 != 0));
        }
        self.lat.set_high();
        self.lat.set_low();
    }
}

/// `Panel` implementation handed to the marquee loop.
///
/// Draw calls land in a private staging frame; `swap_buffers` copies it
/// into the shared back frame and flips, which is the only point the
/// scanout can observe. One short critical section per frame.
pub struct PanelHandle {
    staging: FrameBuffer,
}

impl PanelHandle {
    pub fn new() -> Self {
        Self {
            staging: FrameBuffer::new(),
        }
    }
}

impl Default for PanelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for PanelHandle {
    fn width(&self) -> u32 {
        PANEL_WIDTH as u32
    }

    fn height(&self) -> u32 {
        PANEL_HEIGHT as u32
    }

    fn draw_pixel(&mut self, x: u32, y: u32, color: Rgb565) {
        self.staging.set(x, y, color);
    }

    fn fill(&mut self, color: Rgb565) {
        self.staging.fill(color);
    }

    fn swap_buffers(&mut self) {
        FRAMES.lock(|frames| {
            let mut frames = frames.borrow_mut();
            frames.back_mut().copy_from(&self.staging);
            frames.swap();
        });
    }

    fn set_brightness(&mut self, level: u8) {
        BRIGHTNESS.store(level, Ordering::Relaxed);
    }
}

/// Continuous panel refresh.
#[embassy_executor::task]
pub async fn scan_task(mut pins: Hub75Pins) {
    info!("Panel scan task started");

    let mut top = [0u16; PANEL_WIDTH];
    let mut bottom = [0u16; PANEL_WIDTH];
    let mut words = [0u8; PANEL_WIDTH];

    loop {
        for row in 0..PANEL_HEIGHT / 2 {
            // Copy the row pair out under the lock; the slow clocking
            // below runs without holding it
            FRAMES.lock(|frames| {
                let frames = frames.borrow();
                let front = frames.front();
                top.copy_from_slice(front.row(row));
                bottom.copy_from_slice(front.row(row + PANEL_HEIGHT / 2));
            });

            let brightness = BRIGHTNESS.load(Ordering::Relaxed) as u32;

            for plane in 0..BCM_PLANES {
                row_plane_words(&top, &bottom, plane, &mut words);
                pins.shift_row(&words);
                pins.select_and_latch(row as u8);

                let hold = OE_BASE_CYCLES * plane_weight(plane) * brightness / 255;
                if hold > 0 {
                    pins.oe.set_low();
                    asm::delay(hold);
                    pins.oe.set_high();
                }
            }
        }

        // One full refresh done; let the marquee and serial tasks run
        yield_now().await;
    }
}
