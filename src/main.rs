//! TDS Meter Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  TdsSensor        StatusLed       Ssd1306Display   SerialLog   │
//! │  (SensorPort)     (LedPort)       (DisplayPort)    (LogPort)   │
//! │  Esp32TimeAdapter (ClockPort + DelayNs)   LogEventSink         │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              MeterService (pure logic)                 │    │
//! │  │  Sampler · Estimator · BandTable · Presenter           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::rmt::TxRmtDriver;
use esp_idf_svc::hal::rmt::config::TransmitConfig;
use esp_idf_svc::hal::units::Hertz;
use log::{error, info};

use tdsmeter::adapters::display::Ssd1306Display;
use tdsmeter::adapters::log_sink::LogEventSink;
use tdsmeter::adapters::serial_log::SerialLog;
use tdsmeter::adapters::time::Esp32TimeAdapter;
use tdsmeter::app::service::{Devices, MeterService};
use tdsmeter::config::MeterConfig;
use tdsmeter::drivers::hw_init;
use tdsmeter::drivers::status_led::StatusLed;
use tdsmeter::drivers::task::{MEASUREMENT_STACK_KB, spawn_measurement_task};
use tdsmeter::drivers::watchdog::{self, Watchdog};
use tdsmeter::pins;
use tdsmeter::sensors::tds::TdsSensor;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TDS meter v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without the ADC there is nothing to measure; the watchdog
        // is not armed yet, so halt here.
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration ──────────────────────────────────────
    let config = MeterConfig::compiled_in()?;
    info!(
        "Config: {} samples, {:?}, {:?}",
        config.batch_size, config.cadence, config.estimator
    );

    // ── 4. Construct drivers ──────────────────────────────────
    // Pin numbers mirror `pins`: NeoPixel on GPIO39, I2C SDA/SCL on GPIO41/40.
    let peripherals = Peripherals::take()?;
    let rmt = TxRmtDriver::new(
        peripherals.rmt.channel0,
        peripherals.pins.gpio39,
        &TransmitConfig::new().clock_divider(1),
    )?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio41,
        peripherals.pins.gpio40,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ)),
    )?;

    let mut sensor = TdsSensor::new();
    sensor.set_k_value(config.sensor.k_value);
    let led = StatusLed::new(rmt);
    let display = Ssd1306Display::new(i2c);

    // ── 5. Hand everything to the measurement task ────────────
    let handle = spawn_measurement_task(MEASUREMENT_STACK_KB, "meter\0", move || {
        run_meter(config, sensor, led, display)
    })?;
    match handle.join() {
        Ok(result) => Ok(result?),
        Err(_) => anyhow::bail!("measurement task panicked"),
    }
}

// ── Measurement task ──────────────────────────────────────────

/// Startup, then measure forever.  Runs on the measurement task so the
/// watchdog subscribes this task and the sample buffer lives on its stack.
fn run_meter(
    config: MeterConfig,
    sensor: TdsSensor,
    led: StatusLed,
    display: Ssd1306Display<I2cDriver<'static>>,
) -> tdsmeter::error::Result<()> {
    let timeout_ms = watchdog::timeout_for(&config);
    let mut service = MeterService::new(config)?;
    let mut devices = Devices {
        sensor,
        led,
        display,
        log: SerialLog::new(),
        time: Esp32TimeAdapter::new(),
        watchdog: Watchdog::new(timeout_ms),
    };
    let mut events = LogEventSink::new();

    if service.start(&mut devices, &mut events).is_err() {
        // Terminal: blink until power-cycled.
        loop {
            service.signal_failure(&mut devices);
        }
    }

    loop {
        service.run_cycle(&mut devices, &mut events)?;
    }
}
