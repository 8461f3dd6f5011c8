//! Streaming variance and standard deviation over a sliding window.
//!
//! [`VarianceTracker`] maintains `Σx` and `Σx²` and emits
//! `Σx²/n − (Σx/n)²` each step. This one-pass form trades precision for O(1)
//! updates: it loses accuracy when the running sums are large relative to
//! the variance, an accepted tradeoff here. Rounding can push the result a
//! hair below zero on near-constant data, so the square root for standard
//! deviation clamps negatives to zero.

use crate::error::Result;
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement};

/// Rolling sum / sum-of-squares accumulator.
#[derive(Debug, Clone)]
pub struct VarianceTracker<T> {
    sum: T,
    sum_sq: T,
    period_t: T,
}

impl<T: SeriesElement> VarianceTracker<T> {
    /// Creates a tracker for a `period`-bar window.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the period is not representable
    /// in `T`.
    pub fn new(period: usize) -> Result<Self> {
        Ok(Self {
            sum: T::zero(),
            sum_sq: T::zero(),
            period_t: T::from_usize(period)?,
        })
    }

    /// Adds a sample entering the window.
    #[inline]
    pub fn add(&mut self, value: T) {
        self.sum = self.sum + value;
        self.sum_sq = self.sum_sq + value * value;
    }

    /// Removes the sample leaving the window.
    #[inline]
    pub fn remove(&mut self, value: T) {
        self.sum = self.sum - value;
        self.sum_sq = self.sum_sq - value * value;
    }

    /// Population variance of the current window.
    #[inline]
    #[must_use]
    pub fn variance(&self) -> T {
        let mean = self.sum / self.period_t;
        self.sum_sq / self.period_t - mean * mean
    }
}

/// Lookback of the rolling variance: `period - 1`.
#[inline]
#[must_use]
pub const fn variance_lookback(period: usize) -> usize {
    if period == 0 {
        0
    } else {
        period - 1
    }
}

fn variance_impl<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    indicator: &'static str,
    out: &mut [T],
    mut finish: impl FnMut(T) -> T,
) -> Result<OutputRange> {
    validate_period(period, 1, indicator)?;
    range.check_within(data.len())?;

    let lookback = variance_lookback(period);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, indicator)?;

    let mut tracker = VarianceTracker::new(period)?;
    let mut trailing_idx = real_start - lookback;
    for &value in &data[trailing_idx..real_start] {
        tracker.add(value);
    }

    let mut out_idx = 0;
    for today in real_start..=range.end {
        tracker.add(data[today]);
        out[out_idx] = finish(tracker.variance());
        tracker.remove(data[trailing_idx]);
        trailing_idx += 1;
        out_idx += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Computes the rolling population variance into `out`.
///
/// # Errors
///
/// Returns an error if the period is zero, the range does not fit the input,
/// or the output buffer is too small. A range fully consumed by the lookback
/// yields `Ok(OutputRange::empty())`.
pub fn variance_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    out: &mut [T],
) -> Result<OutputRange> {
    variance_impl(data, range, period, "variance", out, |v| v)
}

/// Computes the rolling population standard deviation into `out`.
///
/// Negative variances from floating-point rounding yield 0.
///
/// # Errors
///
/// Same failure conditions as [`variance_into`].
pub fn stddev_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    out: &mut [T],
) -> Result<OutputRange> {
    variance_impl(data, range, period, "stddev", out, |v| {
        if v > T::zero() {
            v.sqrt()
        } else {
            T::zero()
        }
    })
}
