//! SSD1306 OLED adapter (128×32, I2C).
//!
//! Implements [`DisplayPort`] on top of the `ssd1306` buffered graphics
//! mode, drawing text with `embedded-graphics` mono fonts.  Text sizes
//! map onto the nearest built-in font; the cursor advances past each
//! drawn string.
//!
//! The adapter owns the bus.  A failed bring-up hands the bus back so
//! the next attempt can rebuild the driver on it.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_9X15, FONT_10X20},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use embedded_hal::i2c::I2c;
use log::{debug, warn};
use ssd1306::{I2CDisplayInterface, Ssd1306, mode::BufferedGraphicsMode, prelude::*};

use crate::app::ports::{DisplayPort, VoltageSource};
use crate::error::SinkError;

type Panel<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x32, BufferedGraphicsMode<DisplaySize128x32>>;

enum PanelState<I2C> {
    /// Bus owned, driver not (yet) initialised.
    Detached(I2C),
    Ready(Panel<I2C>),
}

pub struct Ssd1306Display<I2C> {
    state: Option<PanelState<I2C>>,
    cursor: Point,
    font: &'static MonoFont<'static>,
}

impl<I2C: I2c> Ssd1306Display<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            state: Some(PanelState::Detached(i2c)),
            cursor: Point::zero(),
            font: &FONT_6X10,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, Some(PanelState::Ready(_)))
    }

    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor.x, self.cursor.y)
    }
}

fn font_for_size(size: u8) -> &'static MonoFont<'static> {
    match size {
        0 | 1 => &FONT_6X10,
        2 => &FONT_9X15,
        _ => &FONT_10X20,
    }
}

impl<I2C: I2c> DisplayPort for Ssd1306Display<I2C> {
    fn initialize(&mut self, voltage_source: VoltageSource, address: u8) -> bool {
        let i2c = match self.state.take() {
            Some(PanelState::Detached(i2c)) => i2c,
            Some(PanelState::Ready(panel)) => panel.release().release(),
            None => return false,
        };
        if voltage_source == VoltageSource::External {
            warn!("SSD1306: external VCC not supported, using charge pump");
        }

        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let mut panel = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        match panel.init() {
            Ok(()) => {
                self.state = Some(PanelState::Ready(panel));
                true
            }
            Err(e) => {
                debug!("SSD1306: init at 0x{:02X} failed: {:?}", address, e);
                self.state = Some(PanelState::Detached(panel.release().release()));
                false
            }
        }
    }

    fn clear(&mut self) {
        if let Some(PanelState::Ready(panel)) = self.state.as_mut() {
            panel.clear_buffer();
        }
        self.cursor = Point::zero();
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn set_text_size(&mut self, size: u8) {
        self.font = font_for_size(size);
    }

    fn write_text(&mut self, text: &str) {
        let Some(PanelState::Ready(panel)) = self.state.as_mut() else {
            return;
        };
        let style = MonoTextStyle::new(self.font, BinaryColor::On);
        // Drawing only touches the RAM buffer.
        if let Ok(next) = Text::with_baseline(text, self.cursor, style, Baseline::Top).draw(panel) {
            self.cursor = next;
        }
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        match self.state.as_mut() {
            Some(PanelState::Ready(panel)) => panel.flush().map_err(|e| {
                debug!("SSD1306: flush failed: {:?}", e);
                SinkError::Bus
            }),
            _ => Err(SinkError::NotInitialized),
        }
    }
}
