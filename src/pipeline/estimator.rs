//! Robust estimator — reduces a full sample batch to one value.
//!
//! Both strategies are order statistics over the ascending-sorted batch,
//! so a single spike or dropout moves the result by at most the spacing
//! between neighbouring real samples, never by the outlier's magnitude.
//!
//! | Strategy      | Result                                             |
//! |---------------|----------------------------------------------------|
//! | `Median`      | `sorted[n / 2]` (upper-middle element for even n)  |
//! | `TrimmedMean` | mean of `sorted[n/2 - k .. n/2 + k]`               |

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// How a sorted batch is reduced to one estimate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorStrategy {
    /// Value at index `n / 2` of the sorted batch.
    #[default]
    Median,
    /// Mean of the `2 * half_width` sorted values around index `n / 2`.
    TrimmedMean { half_width: usize },
}

impl EstimatorStrategy {
    /// Sort `samples` ascending in place, then reduce them.
    ///
    /// The slice is the cycle-local batch; the caller must not rely on
    /// its original order afterwards.
    pub fn estimate(self, samples: &mut [f32]) -> f32 {
        sort_ascending(samples);
        self.estimate_sorted(samples)
    }

    /// Reduce an already ascending-sorted slice.
    ///
    /// An empty slice yields `0.0`.
    pub fn estimate_sorted(self, sorted: &[f32]) -> f32 {
        match self {
            Self::Median => median_of_sorted(sorted),
            Self::TrimmedMean { half_width } => trimmed_mean_of_sorted(sorted, half_width),
        }
    }
}

/// Ascending sort with plain `<` semantics.  The sensor never produces
/// NaN; if one slips through it compares equal to everything.
pub fn sort_ascending(samples: &mut [f32]) {
    samples.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

pub fn median_of_sorted(sorted: &[f32]) -> f32 {
    sorted.get(sorted.len() / 2).copied().unwrap_or(0.0)
}

/// Mean of the window `[n/2 - k, n/2 + k)`.
///
/// `k == 0` degenerates to the median.  `k` is clamped to `n / 2`, at
/// which point the window covers the whole batch (even n) or all but the
/// largest element (odd n).
pub fn trimmed_mean_of_sorted(sorted: &[f32], half_width: usize) -> f32 {
    let mid = sorted.len() / 2;
    let k = half_width.min(mid);
    if k == 0 {
        return median_of_sorted(sorted);
    }

    // f64 accumulator: 2750 f32 terms would otherwise lose the low bits.
    let sum: f64 = sorted[mid - k..mid + k].iter().map(|&v| f64::from(v)).sum();
    (sum / (2 * k) as f64) as f32
}
