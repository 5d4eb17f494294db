//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured meter events to the
//! ESP-IDF logger (UART / USB-CDC in production).

use log::{debug, error, info, warn};

use crate::app::events::{MeterEvent, SinkKind};
use crate::app::ports::EventSink;

/// Adapter that logs every [`MeterEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &MeterEvent) {
        match event {
            MeterEvent::Started { batch_size } => {
                info!("START | batch={} samples", batch_size);
            }
            MeterEvent::DisplayAttemptFailed { attempt } => {
                warn!("DISPLAY | attempt {} failed", attempt);
            }
            MeterEvent::StartupFailed(e) => {
                error!("HALT | {}", e);
            }
            MeterEvent::CycleCompleted(r) => {
                debug!(
                    "CYCLE | #{} | {:.3} ppm [{}] | min={:.1} max={:.1} n={} | t={}ms",
                    r.cycle, r.estimate, r.band, r.min, r.max, r.samples, r.uptime_ms,
                );
            }
            MeterEvent::SinkFailed { sink, error } => {
                let name = match sink {
                    SinkKind::Led => "led",
                    SinkKind::Display => "display",
                };
                warn!("SINK | {} write failed: {}", name, error);
            }
        }
    }
}
