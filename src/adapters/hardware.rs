//! Hardware adapter — bridges the probe, the NeoPixel, and the task
//! watchdog to domain port traits.
//!
//! The drivers stay free of port types; this module is the only place
//! that knows both sides.  On non-espidf targets the underlying drivers
//! use cfg-gated simulation stubs.

use crate::app::ports::{LedPort, SensorPort, WatchdogPort};
use crate::drivers::led_patterns::Rgb;
use crate::drivers::status_led::StatusLed;
use crate::drivers::watchdog::Watchdog;
use crate::error::SinkError;
use crate::sensors::tds::TdsSensor;

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for TdsSensor {
    fn configure(&mut self, adc_gpio: i32, reference_voltage: f32, adc_range: u32) {
        TdsSensor::configure(self, adc_gpio, reference_voltage, adc_range);
    }

    fn begin(&mut self) {
        TdsSensor::begin(self);
    }

    fn set_temperature(&mut self, celsius: f32) {
        TdsSensor::set_temperature(self, celsius);
    }

    fn refresh(&mut self) {
        self.read();
    }

    fn current_value(&self) -> f32 {
        self.last().ppm
    }
}

// ── LedPort implementation ────────────────────────────────────

impl LedPort for StatusLed {
    fn initialize(&mut self) -> Result<(), SinkError> {
        self.begin()
    }

    fn set_brightness(&mut self, level: u8) {
        StatusLed::set_brightness(self, level);
    }

    fn set_color(&mut self, index: usize, colour: Rgb) {
        self.set_pixel(index, colour);
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        self.show()
    }
}

// ── WatchdogPort implementation ───────────────────────────────

impl WatchdogPort for Watchdog {
    fn feed(&mut self) {
        Watchdog::feed(self);
    }
}
