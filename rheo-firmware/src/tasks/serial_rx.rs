//! Serial command receive task
//!
//! Accumulates UART bytes into lines and hands parsed commands to the
//! marquee loop. Malformed input is logged and dropped - only a
//! successfully parsed command reaches the marquee.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use rheo_core::{parse_line, CommandError};

use crate::channels::COMMANDS;

/// Line accumulator capacity; lines longer than this are discarded.
const LINE_BUF_SIZE: usize = 256;

/// Buffer size for each UART read
const RX_BUF_SIZE: usize = 64;

#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut line: heapless::Vec<u8, LINE_BUF_SIZE> = heapless::Vec::new();
    let mut overflowed = false;
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    if byte == b'\n' || byte == b'\r' {
                        if overflowed {
                            warn!("Oversized line discarded");
                        } else if !line.is_empty() {
                            dispatch(&line);
                        }
                        line.clear();
                        overflowed = false;
                    } else if line.push(byte).is_err() {
                        overflowed = true;
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Parse one complete line and signal the command, if valid.
fn dispatch(line: &[u8]) {
    let text = match core::str::from_utf8(line) {
        Ok(t) => t,
        Err(_) => {
            warn!("Non-UTF8 line dropped");
            return;
        }
    };

    match parse_line(text) {
        Ok(cmd) => {
            debug!("Command accepted");
            COMMANDS.signal(cmd);
        }
        Err(CommandError::Empty) => {}
        Err(e) => {
            warn!("Ignoring malformed command: {}", e);
        }
    }
}
