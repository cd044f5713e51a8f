//! Marquee control loop
//!
//! One cooperative loop owns all marquee state: it waits on either the
//! next pending command or the next frame tick, never both at once. A
//! rebuild therefore always runs between frames, and the panel keeps
//! showing the last presented frame until the new canvas is complete.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};

use rheo_core::{Marquee, MarqueeConfig, Panel};

use crate::channels::COMMANDS;
use crate::display::PanelHandle;
use crate::font::GlyphRasterizer;

#[embassy_executor::task]
pub async fn marquee_task(config: MarqueeConfig, mut raster: GlyphRasterizer) {
    info!("Marquee task started");

    let mut panel = PanelHandle::new();
    panel.set_brightness(config.panel.brightness);

    let mut marquee = Marquee::new(&config);
    match marquee.rebuild(&mut raster) {
        Ok(()) => info!("Canvas ready: {} px wide", canvas_width(&marquee)),
        Err(e) => warn!("Initial render failed: {}", e),
    }

    let mut ticker = Ticker::every(Duration::from_millis(config.scroll.frame_ms as u64));

    loop {
        match select(COMMANDS.wait(), ticker.next()).await {
            Either::First(cmd) => match marquee.apply(cmd, &mut raster) {
                Ok(()) => info!("Canvas updated: {} px wide", canvas_width(&marquee)),
                Err(e) => warn!("Rebuild failed, keeping previous canvas: {}", e),
            },
            Either::Second(()) => marquee.tick(&mut panel),
        }
    }
}

fn canvas_width(marquee: &Marquee) -> usize {
    marquee.canvas().map(|c| c.width()).unwrap_or(0)
}
