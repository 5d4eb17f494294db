//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements          | Connects to              |
//! |--------------|---------------------|--------------------------|
//! | `hardware`   | SensorPort          | Gravity TDS probe (ADC1) |
//! |              | LedPort             | WS2812 NeoPixel (RMT)    |
//! | `display`    | DisplayPort         | SSD1306 OLED over I2C    |
//! | `serial_log` | LogPort             | Console stdout           |
//! | `log_sink`   | EventSink           | `log` records            |
//! | `time`       | ClockPort + DelayNs | ESP32 system timer       |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod serial_log;
pub mod time;
