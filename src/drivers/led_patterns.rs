//! Status LED colours and the failure blink pattern.
//!
//! The meter's LED is a single pixel that normally shows the quality
//! band colour.  Two moments are special:
//!
//! | Moment          | Output                                 |
//! |-----------------|----------------------------------------|
//! | Startup         | Solid blue until the display is up     |
//! | Startup failure | Red / blue alternating, 200 ms each    |
//!
//! [`AlternatingBlink`] generates the failure pattern from elapsed time;
//! the caller pushes the returned colour to the LED.

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Alternates between two colours with a fixed dwell per colour.
/// Stack-allocated, no heap.
#[derive(Debug, Clone, Copy)]
pub struct AlternatingBlink {
    first: Rgb,
    second: Rgb,
    dwell_ms: u32,
    phase_ms: u32,
}

impl AlternatingBlink {
    pub fn new(first: Rgb, second: Rgb, dwell_ms: u32) -> Self {
        Self {
            first,
            second,
            dwell_ms: dwell_ms.max(1),
            phase_ms: 0,
        }
    }

    /// The red/blue pattern shown when the display never comes up.
    pub fn failure() -> Self {
        Self::new(COLOUR_FAILURE_A, COLOUR_FAILURE_B, FAILURE_DWELL_MS)
    }

    /// Colour at the current phase, then advance by `delta_ms`.
    pub fn tick(&mut self, delta_ms: u32) -> Rgb {
        let colour = self.current();
        self.phase_ms = (self.phase_ms + delta_ms) % (2 * self.dwell_ms);
        colour
    }

    pub fn current(&self) -> Rgb {
        if self.phase_ms < self.dwell_ms {
            self.first
        } else {
            self.second
        }
    }

    pub fn dwell_ms(&self) -> u32 {
        self.dwell_ms
    }
}

// ── Well-known colour constants ───────────────────────────────

pub const COLOUR_OFF: Rgb = (0, 0, 0);
pub const COLOUR_STARTUP: Rgb = (0, 0, 255); // Blue
pub const COLOUR_FAILURE_A: Rgb = (255, 0, 0); // Red
pub const COLOUR_FAILURE_B: Rgb = (0, 0, 255); // Blue
pub const COLOUR_GREEN: Rgb = (0, 255, 0);
pub const COLOUR_YELLOW: Rgb = (128, 128, 0);
pub const COLOUR_RED: Rgb = (255, 0, 0);

pub const FAILURE_DWELL_MS: u32 = 200;
