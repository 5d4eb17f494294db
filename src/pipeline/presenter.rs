//! Presenter — fans one estimate out to the LED, the display, and the
//! serial log.
//!
//! Each sink is written independently: a failed LED or display commit is
//! reported in the [`PresentOutcome`] and the remaining sinks are still
//! written.  The presenter computes nothing beyond formatting.

use core::fmt::Write;

use heapless::String;

use crate::app::ports::{DisplayPort, LedPort, LogPort};
use crate::error::SinkError;
use crate::pipeline::classifier::QualityBand;

/// Unit suffix shared by the display and the log line.
pub const UNIT_SUFFIX: &str = " ppm";

/// Where things go on the 128×32 panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLayout {
    pub value_origin: (i32, i32),
    pub value_text_size: u8,
    pub unit_origin: (i32, i32),
    pub unit_text_size: u8,
    /// Pixel index on the status LED strip.
    pub led_index: usize,
}

impl Default for DisplayLayout {
    fn default() -> Self {
        Self {
            value_origin: (0, 0),
            value_text_size: 4,
            unit_origin: (80, 0),
            unit_text_size: 2,
            led_index: 0,
        }
    }
}

/// One value ready for output.
#[derive(Debug, Clone, Copy)]
pub struct Presentation<'a> {
    pub estimate: f32,
    pub band: &'a QualityBand,
    pub uptime_ms: u64,
}

/// Which sinks failed during one [`Presenter::present`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentOutcome {
    pub led: Option<SinkError>,
    pub display: Option<SinkError>,
}

impl PresentOutcome {
    pub fn all_ok(&self) -> bool {
        self.led.is_none() && self.display.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Presenter {
    layout: DisplayLayout,
}

impl Presenter {
    pub fn new(layout: DisplayLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &DisplayLayout {
        &self.layout
    }

    pub fn present(
        &self,
        p: &Presentation<'_>,
        led: &mut impl LedPort,
        display: &mut impl DisplayPort,
        log: &mut impl LogPort,
    ) -> PresentOutcome {
        let led = self.show_led(p.band, led).err();
        let display = self.show_display(p.estimate, display).err();
        log.write_line(&log_line(p.uptime_ms, p.estimate));
        PresentOutcome { led, display }
    }

    fn show_led(&self, band: &QualityBand, led: &mut impl LedPort) -> Result<(), SinkError> {
        led.set_color(self.layout.led_index, band.colour);
        led.commit()
    }

    fn show_display(&self, estimate: f32, display: &mut impl DisplayPort) -> Result<(), SinkError> {
        let l = &self.layout;
        display.clear();
        display.set_cursor(l.value_origin.0, l.value_origin.1);
        display.set_text_size(l.value_text_size);
        display.write_text(&display_digits(estimate));
        display.set_cursor(l.unit_origin.0, l.unit_origin.1);
        display.set_text_size(l.unit_text_size);
        display.write_text(UNIT_SUFFIX);
        display.commit()
    }
}

/// Rounded integer part, zero-padded to three digits (`"007"`).
pub fn display_digits(estimate: f32) -> String<16> {
    let mut s = String::new();
    let _ = write!(s, "{:03}", estimate.round() as i32);
    s
}

/// `"<uptime_ms> <estimate:.3> ppm"`.
pub fn log_line(uptime_ms: u64, estimate: f32) -> String<64> {
    let mut s = String::new();
    let _ = write!(s, "{} {:.3}{}", uptime_ms, estimate, UNIT_SUFFIX);
    s
}
