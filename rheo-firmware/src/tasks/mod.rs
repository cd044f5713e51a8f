//! Embassy tasks
//!
//! - `marquee_task`: the cooperative control loop (commands + frames)
//! - `serial_rx_task`: line-oriented command input over UART

mod marquee;
mod serial_rx;

pub use marquee::marquee_task;
pub use serial_rx::serial_rx_task;
