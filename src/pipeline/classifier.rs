//! Quality-band classifier.
//!
//! The band table is pure configuration: an ordered list of
//! `{upper_bound, label, colour}` records evaluated top-to-bottom with a
//! strict `<`, plus a catch-all band for everything above the last
//! bound.  An estimate exactly on a boundary therefore lands in the band
//! above it.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::drivers::led_patterns::Rgb;

/// Maximum number of bounded bands (the catch-all is extra).
pub const MAX_BANDS: usize = 8;

/// Band labels are short enough for a serial line or a BLE characteristic.
pub type Label = String<24>;

/// Build a [`Label`], truncating text that does not fit.
pub fn label(text: &str) -> Label {
    let mut out = Label::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityBand {
    pub label: Label,
    /// Status LED colour for this band.
    pub colour: Rgb,
}

impl QualityBand {
    pub fn new(text: &str, colour: Rgb) -> Self {
        Self {
            label: label(text),
            colour,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandThreshold {
    /// Estimates strictly below this value fall into `band`.
    pub upper_bound: f32,
    pub band: QualityBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    thresholds: Vec<BandThreshold, MAX_BANDS>,
    catch_all: QualityBand,
}

impl BandTable {
    /// A table with only the catch-all band; add bounds with [`with_band`].
    ///
    /// [`with_band`]: Self::with_band
    pub fn new(catch_all: QualityBand) -> Self {
        Self {
            thresholds: Vec::new(),
            catch_all,
        }
    }

    /// Append a band below `upper_bound`.  Bands must be added in
    /// ascending bound order; [`validate`](Self::validate) checks this.
    /// Bands past [`MAX_BANDS`] are dropped with a warning.
    pub fn with_band(mut self, upper_bound: f32, band: QualityBand) -> Self {
        if self
            .thresholds
            .push(BandThreshold { upper_bound, band })
            .is_err()
        {
            log::warn!("band table full ({} bands), dropping bound {}", MAX_BANDS, upper_bound);
        }
        self
    }

    /// First band whose bound is strictly greater than `estimate`, else
    /// the catch-all.
    pub fn classify(&self, estimate: f32) -> &QualityBand {
        self.thresholds
            .iter()
            .find(|t| estimate < t.upper_bound)
            .map_or(&self.catch_all, |t| &t.band)
    }

    /// Bounds must be finite and strictly ascending.
    pub fn validate(&self) -> Result<(), &'static str> {
        let mut prev = f32::NEG_INFINITY;
        for t in &self.thresholds {
            if !t.upper_bound.is_finite() {
                return Err("band bound must be finite");
            }
            if t.upper_bound <= prev {
                return Err("band bounds must be strictly ascending");
            }
            prev = t.upper_bound;
        }
        Ok(())
    }

    pub fn thresholds(&self) -> &[BandThreshold] {
        &self.thresholds
    }

    pub fn catch_all(&self) -> &QualityBand {
        &self.catch_all
    }
}
