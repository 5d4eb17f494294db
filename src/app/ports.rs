//! Port traits — the hexagonal boundary between the measurement pipeline
//! and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MeterService (domain)
//! ```
//!
//! The sensor, the three output sinks, and the clock are driven adapters.
//! [`MeterService`](super::service::MeterService) consumes them through
//! generics, so the pipeline never touches hardware directly and every
//! stage runs on the host against mocks.

use serde::{Deserialize, Serialize};

use crate::drivers::led_patterns::Rgb;
use crate::error::SinkError;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The analog TDS probe.  Voltage-to-concentration conversion and
/// temperature compensation live behind this trait.
pub trait SensorPort {
    /// Select the ADC input and its scaling.
    fn configure(&mut self, adc_gpio: i32, reference_voltage: f32, adc_range: u32);

    /// Bring the probe up after [`configure`](Self::configure).
    fn begin(&mut self);

    /// Water temperature used for compensation (°C).
    fn set_temperature(&mut self, celsius: f32);

    /// Take one conversion and update the internal value.
    fn refresh(&mut self);

    /// Concentration (ppm) from the latest [`refresh`](Self::refresh).
    /// May be out of range; the estimator copes.
    fn current_value(&self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Output sinks (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Addressable status LED (one or more pixels).
pub trait LedPort {
    fn initialize(&mut self) -> Result<(), SinkError>;

    /// Global brightness, 1–255.
    fn set_brightness(&mut self, level: u8);

    /// Stage a colour for pixel `index`; shown on the next commit.
    fn set_color(&mut self, index: usize, colour: Rgb);

    /// Push staged colours to the strip.
    fn commit(&mut self) -> Result<(), SinkError>;
}

/// Panel supply mode passed to display bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoltageSource {
    /// Panel generates its drive voltage from 3.3 V via the charge pump.
    SwitchCapVcc,
    /// Drive voltage supplied externally.
    External,
}

/// Small monochrome frame-buffered display with a text cursor.
pub trait DisplayPort {
    /// Returns `false` when the panel does not come up.
    fn initialize(&mut self, voltage_source: VoltageSource, address: u8) -> bool;

    /// Blank the frame buffer.
    fn clear(&mut self);

    /// Move the text cursor (top-left of the next glyph), in pixels.
    fn set_cursor(&mut self, x: i32, y: i32);

    /// Text scale; 1 is the smallest.
    fn set_text_size(&mut self, size: u8);

    /// Draw at the cursor and advance it.
    fn write_text(&mut self, text: &str);

    /// Send the frame buffer to the panel.
    fn commit(&mut self) -> Result<(), SinkError>;
}

/// Line-oriented serial log.  Writes are fire-and-forget.
pub trait LogPort {
    fn write_line(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Time and supervision
// ───────────────────────────────────────────────────────────────

/// Monotonic time since startup.
pub trait ClockPort {
    fn uptime_ms(&self) -> u64;
}

/// Task watchdog.  Fed after every bounded unit of work: a display
/// bring-up attempt, a measurement cycle, a failure blink.
pub trait WatchdogPort {
    fn feed(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → diagnostics)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`MeterEvent`](super::events::MeterEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::MeterEvent);
}
