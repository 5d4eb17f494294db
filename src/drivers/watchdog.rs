//! Task Watchdog Timer (TWDT) supervision for the measurement task.
//!
//! The timeout is derived from the configuration: the slowest unit of
//! work between two feeds (one sampling batch plus the cycle pause, the
//! boot settle, one retry gap, one failure-blink period), doubled, and
//! never below [`MIN_TIMEOUT_MS`].
//!
//! On ESP-IDF the calling task is subscribed to the TWDT and a missed
//! deadline panics (and so resets) the chip.  On host the watchdog only
//! counts feeds.

use crate::config::{MeterConfig, StartupRetryPolicy};
use crate::drivers::led_patterns::FAILURE_DWELL_MS;
use crate::pipeline::sampler::SampleCadence;

/// Floor for the derived timeout.
pub const MIN_TIMEOUT_MS: u32 = 5_000;

/// Allowance for one ADC conversion plus bookkeeping in a continuous batch.
const PER_SAMPLE_ALLOWANCE_MS: u32 = 1;

/// TWDT timeout for `config`.
pub fn timeout_for(config: &MeterConfig) -> u32 {
    let per_sample = match config.cadence {
        SampleCadence::Continuous => PER_SAMPLE_ALLOWANCE_MS,
        SampleCadence::FixedDelay { delay_ms } => delay_ms.saturating_add(PER_SAMPLE_ALLOWANCE_MS),
    };
    let cycle = (config.batch_size as u32)
        .saturating_mul(per_sample)
        .saturating_add(config.cycle_pause_ms);
    let retry_gap = match config.startup_retry {
        StartupRetryPolicy::Bounded { retry_delay_ms, .. }
        | StartupRetryPolicy::Unbounded { retry_delay_ms } => retry_delay_ms,
    };
    let slowest = cycle
        .max(config.display.settle_ms)
        .max(retry_gap)
        .max(2 * FAILURE_DWELL_MS);
    slowest.saturating_mul(2).max(MIN_TIMEOUT_MS)
}

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    #[cfg(not(target_os = "espidf"))]
    feeds: u64,
}

impl Watchdog {
    /// Subscribe the *calling* task.  Create it on the task that feeds it.
    #[cfg(target_os = "espidf")]
    pub fn new(timeout_ms: u32) -> Self {
        use esp_idf_svc::sys::{
            ESP_OK, esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_reconfigure,
        };

        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: plain FFI calls; the config outlives the call and a null
        // handle means "current task".
        let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
        if ret != ESP_OK as i32 {
            log::warn!("Watchdog: reconfigure returned {}", ret);
        }
        let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
        let subscribed = ret == ESP_OK as i32;
        if subscribed {
            log::info!("Watchdog: measurement task subscribed ({}ms)", timeout_ms);
        } else {
            log::warn!("Watchdog: subscribe failed ({})", ret);
        }
        Self {
            timeout_ms,
            subscribed,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(timeout_ms: u32) -> Self {
        log::info!("Watchdog(sim): {}ms, not enforced", timeout_ms);
        Self {
            timeout_ms,
            feeds: 0,
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn feed(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: resets the TWDT entry of the subscribed calling task.
                unsafe {
                    esp_idf_svc::sys::esp_task_wdt_reset();
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.feeds += 1;
        }
    }

    /// Feeds so far (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn feeds(&self) -> u64 {
        self.feeds
    }
}
