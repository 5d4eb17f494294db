//! Application core — measurement orchestration, zero direct I/O.
//!
//! Startup sequencing, the per-cycle pipeline run, and the failure
//! indication live here.  All interaction with hardware happens through
//! the **port traits** in [`ports`], keeping this layer testable without
//! real peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod startup;
