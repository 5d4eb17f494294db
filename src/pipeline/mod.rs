//! The measurement pipeline, one pass per loop iteration:
//!
//! ```text
//!   Sampler ──▶ Estimator ──▶ Classifier ──▶ Presenter
//! ```
//!
//! No stage keeps state between iterations; the sample batch is created
//! and dropped inside a single cycle.

pub mod classifier;
pub mod estimator;
pub mod presenter;
pub mod sampler;
