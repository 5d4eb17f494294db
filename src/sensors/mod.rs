//! Sensor drivers.
//!
//! The meter has a single probe; its driver is exposed to the pipeline
//! through [`SensorPort`](crate::app::ports::SensorPort) by the hardware
//! adapter.

pub mod tds;
