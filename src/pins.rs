//! GPIO / peripheral pin assignments for the meter board (QT Py ESP32-S3).
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Gravity analog TDS probe signal.
/// ADC1 channel 8 (GPIO 9 on ESP32-S3).
pub const TDS_ADC_GPIO: i32 = 9;
/// ADC1 channel index matching [`TDS_ADC_GPIO`].
pub const TDS_ADC_CHANNEL: u32 = 8;
/// ADC reference used for voltage scaling (V).
pub const TDS_ADC_VREF: f32 = 3.3;
/// ADC full-scale count (12-bit).
pub const TDS_ADC_RANGE: u32 = 1 << 12;

// ---------------------------------------------------------------------------
// Status LED (on-board NeoPixel)
// ---------------------------------------------------------------------------

pub const NEOPIXEL_GPIO: i32 = 39;
/// Digital output: powers the NeoPixel (active HIGH).
pub const NEOPIXEL_POWER_GPIO: i32 = 38;

// ---------------------------------------------------------------------------
// I²C bus (STEMMA QT): SSD1306 128×32 OLED
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 41;
pub const I2C_SCL_GPIO: i32 = 40;
pub const I2C_BAUD_HZ: u32 = 400_000;
/// 7-bit address of the 128×32 panel.
pub const OLED_I2C_ADDR: u8 = 0x3C;
