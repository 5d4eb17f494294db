//! Serial log adapter.
//!
//! One reading per line on the console UART / USB-CDC.  On ESP-IDF,
//! stdout is routed to the console by the runtime, so the same code
//! serves both targets.  Lines go out unprefixed, unlike `log` records,
//! so a host-side plotter can parse them directly.

use std::io::Write;

use crate::app::ports::LogPort;

#[derive(Debug, Default)]
pub struct SerialLog;

impl SerialLog {
    pub fn new() -> Self {
        Self
    }
}

impl LogPort for SerialLog {
    fn write_line(&mut self, line: &str) {
        let mut out = std::io::stdout().lock();
        // Fire-and-forget: a stalled console must not stall the meter.
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}
