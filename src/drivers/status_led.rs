//! Addressable (WS2812 / NeoPixel) status LED driver.
//!
//! Colours are staged per pixel and only reach the strip on [`show`].
//! Global brightness scales every channel at transmit time so the staged
//! colours keep full precision.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: encodes GRB bits into an RMT pulse train and transmits it.
//! On host/test: records the last transmitted frame in memory only.
//!
//! [`show`]: StatusLed::show

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::rmt::TxRmtDriver;

use crate::drivers::led_patterns::{COLOUR_OFF, Rgb};
use crate::error::SinkError;

/// Pixels on the board (the QT Py carries one).
pub const PIXEL_COUNT: usize = 1;

pub struct StatusLed {
    staged: [Rgb; PIXEL_COUNT],
    shown: [Rgb; PIXEL_COUNT],
    brightness: u8,
    initialized: bool,
    #[cfg(target_os = "espidf")]
    rmt: TxRmtDriver<'static>,
}

#[cfg(not(target_os = "espidf"))]
impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLed {
    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            staged: [COLOUR_OFF; PIXEL_COUNT],
            shown: [COLOUR_OFF; PIXEL_COUNT],
            brightness: u8::MAX,
            initialized: false,
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn new(rmt: TxRmtDriver<'static>) -> Self {
        Self {
            staged: [COLOUR_OFF; PIXEL_COUNT],
            shown: [COLOUR_OFF; PIXEL_COUNT],
            brightness: u8::MAX,
            initialized: false,
            rmt,
        }
    }

    /// Blank the strip.
    pub fn begin(&mut self) -> Result<(), SinkError> {
        self.initialized = true;
        self.staged = [COLOUR_OFF; PIXEL_COUNT];
        self.show()
    }

    pub fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    /// Out-of-range indices are ignored.
    pub fn set_pixel(&mut self, index: usize, colour: Rgb) {
        if let Some(px) = self.staged.get_mut(index) {
            *px = colour;
        }
    }

    pub fn show(&mut self) -> Result<(), SinkError> {
        if !self.initialized {
            return Err(SinkError::NotInitialized);
        }
        let mut frame = [COLOUR_OFF; PIXEL_COUNT];
        for (out, &(r, g, b)) in frame.iter_mut().zip(self.staged.iter()) {
            *out = (
                scale(r, self.brightness),
                scale(g, self.brightness),
                scale(b, self.brightness),
            );
        }
        self.transmit(&frame)?;
        self.shown = frame;
        Ok(())
    }

    /// Brightness-scaled colour last sent to the strip.
    pub fn shown(&self, index: usize) -> Option<Rgb> {
        self.shown.get(index).copied()
    }

    #[cfg(target_os = "espidf")]
    fn transmit(&mut self, frame: &[Rgb]) -> Result<(), SinkError> {
        use core::time::Duration;
        use esp_idf_svc::hal::rmt::{PinState, Pulse, VariableLengthSignal};

        let ticks_hz = self.rmt.counter_clock().map_err(|_| SinkError::Bus)?;
        let pulse = |state, ns| {
            Pulse::new_with_duration(ticks_hz, state, &Duration::from_nanos(ns))
                .map_err(|_| SinkError::Bus)
        };
        let t0h = pulse(PinState::High, 350)?;
        let t0l = pulse(PinState::Low, 800)?;
        let t1h = pulse(PinState::High, 700)?;
        let t1l = pulse(PinState::Low, 600)?;

        let mut signal = VariableLengthSignal::new();
        for &(r, g, b) in frame {
            // WS2812 wire order is GRB, MSB first.
            let grb = (u32::from(g) << 16) | (u32::from(r) << 8) | u32::from(b);
            for bit in (0..24).rev() {
                let pair = if grb & (1 << bit) != 0 { [&t1h, &t1l] } else { [&t0h, &t0l] };
                signal.push(pair).map_err(|_| SinkError::Bus)?;
            }
        }
        self.rmt.start_blocking(&signal).map_err(|_| SinkError::Bus)
    }

    #[cfg(not(target_os = "espidf"))]
    fn transmit(&mut self, _frame: &[Rgb]) -> Result<(), SinkError> {
        Ok(())
    }
}

/// NeoPixel brightness: 255 passes through, otherwise `c * (level + 1) / 256`.
fn scale(channel: u8, level: u8) -> u8 {
    if level == u8::MAX {
        channel
    } else {
        ((u16::from(channel) * (u16::from(level) + 1)) >> 8) as u8
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn show_before_begin_fails() {
        let mut led = StatusLed::new();
        assert_eq!(led.show(), Err(SinkError::NotInitialized));
    }

    #[test]
    fn brightness_scales_on_show() {
        let mut led = StatusLed::new();
        led.begin().unwrap();
        led.set_brightness(10);
        led.set_pixel(0, (0, 0, 255));
        led.show().unwrap();
        assert_eq!(led.shown(0), Some((0, 0, 10)));
    }

    #[test]
    fn full_brightness_is_unscaled() {
        assert_eq!(scale(200, 255), 200);
        assert_eq!(scale(255, 0), 0);
    }

    #[test]
    fn out_of_range_pixel_ignored() {
        let mut led = StatusLed::new();
        led.begin().unwrap();
        led.set_pixel(PIXEL_COUNT, (1, 2, 3));
        led.show().unwrap();
        assert_eq!(led.shown(0), Some(COLOUR_OFF));
    }
}
