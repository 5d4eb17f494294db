//! TDS meter firmware library.
//!
//! Exposes the measurement pipeline, the application core, and the
//! adapters for integration testing.  All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod pipeline;
pub mod sensors;
