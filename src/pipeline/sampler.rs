//! Sampler — fills one fixed-capacity batch per measurement cycle.
//!
//! Two cadences are supported:
//!
//! - **Continuous**: back-to-back reads, relying on the probe's own
//!   refresh rate (fast updates, 2750-sample batches).
//! - **FixedDelay**: an explicit pause after each read (discrete polling,
//!   small batches, lower duty cycle).
//!
//! The sampler never filters.  Spikes and dropouts go into the batch
//! untouched; rejecting them is the estimator's job.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::app::ports::SensorPort;

/// Largest batch the firmware can hold (≈12 KiB of `f32`).
pub const MAX_BATCH_SIZE: usize = 3000;

/// Fixed-capacity sample buffer owned by one cycle.
pub type SampleBatch = Vec<f32, MAX_BATCH_SIZE>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SampleCadence {
    /// No pause between reads.
    #[default]
    Continuous,
    /// Pause `delay_ms` after every read.
    FixedDelay { delay_ms: u32 },
}

pub struct Sampler {
    batch_size: usize,
    cadence: SampleCadence,
}

impl Sampler {
    /// `batch_size` is clamped to [`MAX_BATCH_SIZE`]; config validation
    /// rejects larger values before this point.
    pub fn new(batch_size: usize, cadence: SampleCadence) -> Self {
        Self {
            batch_size: batch_size.min(MAX_BATCH_SIZE),
            cadence,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Read exactly `batch_size` values from `sensor`.
    pub fn collect(&self, sensor: &mut impl SensorPort, delay: &mut impl DelayNs) -> SampleBatch {
        let mut batch = SampleBatch::new();
        self.fill(sensor, delay, &mut batch);
        batch
    }

    /// Refill `batch` in place, discarding its previous contents.
    pub fn fill(
        &self,
        sensor: &mut impl SensorPort,
        delay: &mut impl DelayNs,
        batch: &mut SampleBatch,
    ) {
        batch.clear();
        for _ in 0..self.batch_size {
            sensor.refresh();
            // Capacity is MAX_BATCH_SIZE and batch_size never exceeds it.
            let _ = batch.push(sensor.current_value());
            if let SampleCadence::FixedDelay { delay_ms } = self.cadence {
                delay.delay_ms(delay_ms);
            }
        }
    }
}
