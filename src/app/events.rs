//! Outbound diagnostic events.
//!
//! The [`MeterService`](super::service::MeterService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  They describe what
//! the firmware is doing; the measured value itself goes out through the
//! presenter's sinks.

use crate::error::{Error, SinkError};
use crate::pipeline::classifier::Label;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum MeterEvent {
    /// Startup finished; measurement cycles follow.
    Started { batch_size: usize },

    /// A display bring-up attempt failed (1-based attempt number).
    DisplayAttemptFailed { attempt: u32 },

    /// Startup gave up; the failure blink follows.
    StartupFailed(Error),

    /// One measurement cycle completed.
    CycleCompleted(CycleReport),

    /// An output sink rejected a write during presentation.
    SinkFailed { sink: SinkKind, error: SinkError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Led,
    Display,
}

/// Summary of one cycle.  `min` / `max` come free from the sorted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub uptime_ms: u64,
    pub estimate: f32,
    pub band: Label,
    pub min: f32,
    pub max: f32,
    pub samples: usize,
}
