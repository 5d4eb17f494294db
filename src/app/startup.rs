//! Boot-time device bring-up and the permanent failure indication.
//!
//! Only the display can fail at boot.  Whether that is fatal depends on
//! the configured [`StartupRetryPolicy`]: a bounded policy gives up and
//! hands control to [`FailureIndicator`], an unbounded one keeps trying.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::events::MeterEvent;
use crate::app::ports::{DisplayPort, EventSink, LedPort, WatchdogPort};
use crate::config::{DisplaySettings, StartupRetryPolicy};
use crate::drivers::led_patterns::AlternatingBlink;
use crate::error::{InitError, Result};

/// Try to initialise the display according to `policy`.
///
/// Returns the number of attempts it took.  The watchdog is fed once
/// per attempt, so an unbounded policy can wait out a missing panel
/// indefinitely.
pub fn bring_up_display(
    display: &mut impl DisplayPort,
    settings: &DisplaySettings,
    policy: StartupRetryPolicy,
    delay: &mut impl DelayNs,
    watchdog: &mut impl WatchdogPort,
    events: &mut impl EventSink,
) -> Result<u32> {
    let mut attempt: u32 = 0;
    loop {
        attempt = attempt.saturating_add(1);
        watchdog.feed();
        if display.initialize(settings.voltage_source, settings.i2c_address) {
            info!(
                "Display: ready at 0x{:02X} (attempt {})",
                settings.i2c_address, attempt
            );
            return Ok(attempt);
        }

        warn!("Display: no response at 0x{:02X} (attempt {})", settings.i2c_address, attempt);
        events.emit(&MeterEvent::DisplayAttemptFailed { attempt });

        let retry_delay_ms = match policy {
            StartupRetryPolicy::Bounded { attempts, retry_delay_ms } => {
                if attempt >= attempts {
                    return Err(InitError::DisplayNotReady { attempts: attempt }.into());
                }
                retry_delay_ms
            }
            StartupRetryPolicy::Unbounded { retry_delay_ms } => retry_delay_ms,
        };
        delay.delay_ms(retry_delay_ms);
    }
}

/// Red/blue blink shown forever once startup has failed.
pub struct FailureIndicator {
    blink: AlternatingBlink,
    led_index: usize,
}

impl FailureIndicator {
    pub fn new(led_index: usize) -> Self {
        Self {
            blink: AlternatingBlink::failure(),
            led_index,
        }
    }

    /// Show each colour for one dwell period.
    pub fn blink_once(
        &mut self,
        led: &mut impl LedPort,
        delay: &mut impl DelayNs,
        watchdog: &mut impl WatchdogPort,
    ) {
        let dwell = self.blink.dwell_ms();
        for _ in 0..2 {
            let colour = self.blink.tick(dwell);
            led.set_color(self.led_index, colour);
            // Nothing left to report a failed LED to.
            let _ = led.commit();
            delay.delay_ms(dwell);
        }
        watchdog.feed();
    }
}
