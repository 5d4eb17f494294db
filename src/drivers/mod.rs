//! Output drivers, hardware initialisation, and supervision.

pub mod hw_init;
pub mod led_patterns;
pub mod status_led;
pub mod task;
pub mod watchdog;
