//! Meter service — the hexagonal core.
//!
//! [`MeterService`] owns the validated configuration and the pipeline
//! stages.  Device handles live in a [`Devices`] bundle created once by
//! the measurement task and lent to every call, so each device has
//! exactly one owner and one writer.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ LedPort
//!                 │         MeterService          │ ──▶ DisplayPort
//!  ClockPort  ──▶ │ Sampler · Estimator · Bands   │ ──▶ LogPort
//!                 └──────────────────────────────┘ ──▶ EventSink
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::app::events::{CycleReport, MeterEvent, SinkKind};
use crate::app::ports::{
    ClockPort, DisplayPort, EventSink, LedPort, LogPort, SensorPort, WatchdogPort,
};
use crate::app::startup::{self, FailureIndicator};
use crate::config::MeterConfig;
use crate::drivers::led_patterns::COLOUR_STARTUP;
use crate::error::{InitError, Result};
use crate::pipeline::presenter::{DisplayLayout, Presentation, Presenter};
use crate::pipeline::sampler::{SampleBatch, Sampler};

/// Device handles owned by the measurement task.  `time` provides both
/// the uptime clock and blocking delays.
pub struct Devices<S, L, D, W, T, G> {
    pub sensor: S,
    pub led: L,
    pub display: D,
    pub log: W,
    pub time: T,
    pub watchdog: G,
}

// ───────────────────────────────────────────────────────────────
// MeterService
// ───────────────────────────────────────────────────────────────

/// Holds the sample buffer inline (up to 12 KB); construct it on a task
/// whose stack is sized for that.
pub struct MeterService {
    config: MeterConfig,
    sampler: Sampler,
    batch: SampleBatch,
    presenter: Presenter,
    failure: FailureIndicator,
    cycle_count: u64,
    started: bool,
}

impl MeterService {
    /// Validate `config` and build the pipeline.
    ///
    /// Does **not** touch any device — call [`start`](Self::start) next.
    pub fn new(config: MeterConfig) -> Result<Self> {
        config.validate()?;
        let layout = DisplayLayout::default();
        Ok(Self {
            sampler: Sampler::new(config.batch_size, config.cadence),
            batch: SampleBatch::new(),
            presenter: Presenter::new(layout),
            failure: FailureIndicator::new(layout.led_index),
            config,
            cycle_count: 0,
            started: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring up LED, probe, and display.
    ///
    /// On `Err` the display never came up under a bounded policy; the
    /// caller must not run measurement cycles and should loop
    /// [`signal_failure`](Self::signal_failure) instead.
    pub fn start<S, L, D, W, T, G>(
        &mut self,
        dev: &mut Devices<S, L, D, W, T, G>,
        events: &mut impl EventSink,
    ) -> Result<()>
    where
        S: SensorPort,
        L: LedPort,
        D: DisplayPort,
        T: DelayNs,
        G: WatchdogPort,
    {
        let led_index = self.presenter.layout().led_index;

        // 1. Blue while booting.
        if let Err(e) = dev.led.initialize() {
            warn!("LED init failed: {}", e);
        }
        dev.led.set_brightness(self.config.led_brightness);
        dev.led.set_color(led_index, COLOUR_STARTUP);
        if let Err(e) = dev.led.commit() {
            warn!("LED commit failed: {}", e);
        }

        // 2. Probe.
        let s = &self.config.sensor;
        dev.sensor.configure(s.adc_gpio, s.reference_voltage, s.adc_range);
        dev.sensor.begin();
        dev.sensor.set_temperature(s.water_temperature_c);

        // 3. Let the supply settle, then the display.
        dev.time.delay_ms(self.config.display.settle_ms);
        if let Err(e) = startup::bring_up_display(
            &mut dev.display,
            &self.config.display,
            self.config.startup_retry,
            &mut dev.time,
            &mut dev.watchdog,
            events,
        ) {
            error!("Startup failed: {}", e);
            events.emit(&MeterEvent::StartupFailed(e));
            return Err(e);
        }

        self.started = true;
        events.emit(&MeterEvent::Started {
            batch_size: self.sampler.batch_size(),
        });
        info!(
            "MeterService started: {} samples/cycle, {:?}",
            self.sampler.batch_size(),
            self.config.estimator
        );
        Ok(())
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full cycle: sample → estimate → classify → present.
    pub fn run_cycle<S, L, D, W, T, G>(
        &mut self,
        dev: &mut Devices<S, L, D, W, T, G>,
        events: &mut impl EventSink,
    ) -> Result<CycleReport>
    where
        S: SensorPort,
        L: LedPort,
        D: DisplayPort,
        W: LogPort,
        T: ClockPort + DelayNs,
        G: WatchdogPort,
    {
        if !self.started {
            return Err(InitError::NotStarted.into());
        }
        self.cycle_count += 1;

        // 1. Sample (refills the buffer; nothing carries over)
        self.sampler.fill(&mut dev.sensor, &mut dev.time, &mut self.batch);

        // 2. Estimate (sorts the batch in place)
        let estimate = self.config.estimator.estimate(&mut self.batch);
        let min = self.batch.first().copied().unwrap_or(0.0);
        let max = self.batch.last().copied().unwrap_or(0.0);

        // 3. Classify
        let band = self.config.bands.classify(estimate);

        // 4. Present
        let uptime_ms = dev.time.uptime_ms();
        let outcome = self.presenter.present(
            &Presentation {
                estimate,
                band,
                uptime_ms,
            },
            &mut dev.led,
            &mut dev.display,
            &mut dev.log,
        );
        if let Some(error) = outcome.led {
            warn!("LED update failed: {}", error);
            events.emit(&MeterEvent::SinkFailed {
                sink: SinkKind::Led,
                error,
            });
        }
        if let Some(error) = outcome.display {
            warn!("Display update failed: {}", error);
            events.emit(&MeterEvent::SinkFailed {
                sink: SinkKind::Display,
                error,
            });
        }

        let report = CycleReport {
            cycle: self.cycle_count,
            uptime_ms,
            estimate,
            band: band.label.clone(),
            min,
            max,
            samples: self.batch.len(),
        };
        debug!(
            "cycle {}: {:.3} ppm [{}] range {:.1}..{:.1}",
            report.cycle, report.estimate, report.band, report.min, report.max
        );
        events.emit(&MeterEvent::CycleCompleted(report.clone()));

        if self.config.cycle_pause_ms > 0 {
            dev.time.delay_ms(self.config.cycle_pause_ms);
        }
        dev.watchdog.feed();
        Ok(report)
    }

    /// One period of the startup-failure blink.
    pub fn signal_failure<S, L, D, W, T, G>(&mut self, dev: &mut Devices<S, L, D, W, T, G>)
    where
        L: LedPort,
        T: DelayNs,
        G: WatchdogPort,
    {
        self.failure
            .blink_once(&mut dev.led, &mut dev.time, &mut dev.watchdog);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Measurement cycles completed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }
}
