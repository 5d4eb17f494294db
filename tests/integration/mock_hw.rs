//! Mock hardware adapters for integration tests.
//!
//! Every mock records what it was asked to do so tests can assert on the
//! full call history without touching real ADC/RMT/I2C peripherals.

use embedded_hal::delay::DelayNs;
use tdsmeter::app::events::MeterEvent;
use tdsmeter::app::ports::{
    ClockPort, DisplayPort, EventSink, LedPort, LogPort, SensorPort, VoltageSource, WatchdogPort,
};
use tdsmeter::app::service::Devices;
use tdsmeter::drivers::led_patterns::Rgb;
use tdsmeter::error::SinkError;

pub type MockDevices =
    Devices<MockSensor, MockLed, MockDisplay, MockLog, MockTime, MockWatchdog>;

pub fn devices(values: Vec<f32>) -> MockDevices {
    Devices {
        sensor: MockSensor::new(values),
        led: MockLed::default(),
        display: MockDisplay::default(),
        log: MockLog::default(),
        time: MockTime::default(),
        watchdog: MockWatchdog::default(),
    }
}

// ── Sensor ────────────────────────────────────────────────────

/// Replays `values` cyclically, one per refresh.
pub struct MockSensor {
    values: Vec<f32>,
    next: usize,
    current: f32,
    pub configured: Option<(i32, f32, u32)>,
    pub begun: bool,
    pub temperature: Option<f32>,
    pub refreshes: usize,
}

impl MockSensor {
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            values,
            next: 0,
            current: 0.0,
            configured: None,
            begun: false,
            temperature: None,
            refreshes: 0,
        }
    }
}

impl SensorPort for MockSensor {
    fn configure(&mut self, adc_gpio: i32, reference_voltage: f32, adc_range: u32) {
        self.configured = Some((adc_gpio, reference_voltage, adc_range));
    }

    fn begin(&mut self) {
        self.begun = true;
    }

    fn set_temperature(&mut self, celsius: f32) {
        self.temperature = Some(celsius);
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
        if !self.values.is_empty() {
            self.current = self.values[self.next % self.values.len()];
            self.next += 1;
        }
    }

    fn current_value(&self) -> f32 {
        self.current
    }
}

// ── LED ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLed {
    staged: Rgb,
    pub brightness: Option<u8>,
    /// Colour staged at each successful commit, in order.
    pub shown: Vec<Rgb>,
    pub fail_commits: bool,
}

#[allow(dead_code)]
impl MockLed {
    pub fn last_shown(&self) -> Option<Rgb> {
        self.shown.last().copied()
    }
}

impl LedPort for MockLed {
    fn initialize(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = Some(level);
    }

    fn set_color(&mut self, _index: usize, colour: Rgb) {
        self.staged = colour;
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        if self.fail_commits {
            return Err(SinkError::Bus);
        }
        self.shown.push(self.staged);
        Ok(())
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    /// Number of initialise calls that fail before one succeeds.
    pub failing_inits: u32,
    pub init_attempts: u32,
    pub ready: bool,
    frame: Vec<String>,
    /// Text of the last committed frame.
    pub committed: Vec<String>,
    pub fail_commits: bool,
}

impl MockDisplay {
    pub fn never_ready() -> Self {
        Self {
            failing_inits: u32::MAX,
            ..Self::default()
        }
    }

    pub fn ready_after(failures: u32) -> Self {
        Self {
            failing_inits: failures,
            ..Self::default()
        }
    }
}

impl DisplayPort for MockDisplay {
    fn initialize(&mut self, _voltage_source: VoltageSource, _address: u8) -> bool {
        self.init_attempts += 1;
        self.ready = self.init_attempts > self.failing_inits;
        self.ready
    }

    fn clear(&mut self) {
        self.frame.clear();
    }

    fn set_cursor(&mut self, _x: i32, _y: i32) {}

    fn set_text_size(&mut self, _size: u8) {}

    fn write_text(&mut self, text: &str) {
        self.frame.push(text.to_string());
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        if self.fail_commits {
            return Err(SinkError::Bus);
        }
        self.committed = self.frame.clone();
        Ok(())
    }
}

// ── Serial log ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLog {
    pub lines: Vec<String>,
}

impl LogPort for MockLog {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

// ── Time ──────────────────────────────────────────────────────

/// Virtual clock: delays advance it instantly.
#[derive(Default)]
pub struct MockTime {
    pub now_ms: u64,
    pub delays_ms: Vec<u32>,
}

impl ClockPort for MockTime {
    fn uptime_ms(&self) -> u64 {
        self.now_ms
    }
}

impl DelayNs for MockTime {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ms += u64::from(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        self.now_ms += u64::from(ms);
    }
}

// ── Watchdog ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockWatchdog {
    pub feeds: u32,
}

impl WatchdogPort for MockWatchdog {
    fn feed(&mut self) {
        self.feeds += 1;
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<MeterEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &MeterEvent) {
        self.events.push(event.clone());
    }
}
