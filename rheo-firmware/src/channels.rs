//! Inter-task communication
//!
//! Uses embassy-sync primitives for safe async communication between
//! the serial reader and the marquee control loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use rheo_core::Command;

/// Latest pending command from the serial console.
///
/// A `Signal` rather than a channel: only the most recent value per
/// poll matters. Commands arriving faster than the marquee drains them
/// overwrite each other instead of queueing up stale rebuilds.
pub static COMMANDS: Signal<CriticalSectionRawMutex, Command> = Signal::new();
