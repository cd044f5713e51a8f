//! Rheo - Scrolling LED Matrix Marquee Firmware
//!
//! Renders the configured text once into a wide off-screen canvas on
//! the heap, recolors it, then scrolls a panel-sized window of it
//! across a 64x64 HUB75 matrix with double-buffered presentation.
//! Text and color change at runtime over the serial console.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use rheo_core::MarqueeConfig;

use crate::display::Hub75Pins;

// Heap allocator for the canvas pool and the parsed font
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 192KB - canvases grow with text length, the font is capped
// at 96KB (see font.rs)
const HEAP_SIZE: usize = 192 * 1024;

/// Embedded default configuration (compiled into firmware)
/// Edit marquee.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../marquee.toml");

mod channels;
mod config;
mod display;
mod font;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Rheo firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // The font is a hard requirement - nothing meaningful can be shown
    // without it, so a missing or corrupt partition parks the core
    let raster = match font::load(p.FLASH, config.text.font_size) {
        Ok(r) => r,
        Err(e) => {
            error!("Font load failed: {}", e);
            halt();
        }
    };

    // Serial console for runtime text/color commands
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();

    info!("UART initialized for command input");

    // HUB75 pin mapping: color data, row address, control
    let pins = Hub75Pins::new(
        AnyPin::from(p.PIN_2),  // R1
        AnyPin::from(p.PIN_3),  // G1
        AnyPin::from(p.PIN_4),  // B1
        AnyPin::from(p.PIN_5),  // R2
        AnyPin::from(p.PIN_6),  // G2
        AnyPin::from(p.PIN_7),  // B2
        AnyPin::from(p.PIN_8),  // A
        AnyPin::from(p.PIN_9),  // B
        AnyPin::from(p.PIN_10), // C
        AnyPin::from(p.PIN_11), // D
        AnyPin::from(p.PIN_12), // E
        AnyPin::from(p.PIN_13), // CLK
        AnyPin::from(p.PIN_14), // LAT
        AnyPin::from(p.PIN_15), // OE
    );

    // Spawn tasks
    spawner.spawn(display::scan_task(pins)).unwrap();
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::marquee_task(config, raster)).unwrap();

    info!("All tasks spawned, marquee running");
    info!("Send text over serial to change the message");
    info!("Send 'color 255 0 0' to change the color");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Parse the embedded configuration
///
/// build.rs validates marquee.toml, so a parse failure here means the
/// runtime parser and the validator disagree - fall back to defaults
/// rather than refuse to run.
fn load_config() -> MarqueeConfig {
    match config::parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            warn!("Using default configuration");
            MarqueeConfig::default()
        }
    }
}

/// Terminal state for unrecoverable setup failures.
///
/// There is no supervisor to restart into a safe state, so park the
/// core instead of letting a fault take it somewhere undefined.
fn halt() -> ! {
    error!("Setup failed permanently, halting");
    loop {
        cortex_m::asm::wfe();
    }
}
