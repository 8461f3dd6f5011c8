//! Rolling extremum tracking over a sliding window.
//!
//! [`ExtremumTracker`] carries the index and value of the extreme element of
//! the current window. Each step either keeps the tracked extreme, replaces
//! it with the newest sample, or — only when the tracked extreme has fallen
//! out of the window — rescans the window linearly. Because the window
//! boundary advances by exactly one bar per step, the rescans amortize to
//! O(1) per bar.
//!
//! # Tie-breaking
//!
//! The newest sample replaces the tracked maximum when it is `>=` (not `>`)
//! the tracked value, and symmetrically `<=` for minima. This makes the
//! tracker report the *most recent* occurrence of a repeated extreme, which
//! is what "days since extreme" consumers (Aroon-style indicators,
//! [`max_index_into`], [`min_index_into`]) require.
//!
//! # Example
//!
//! ```
//! use ta_engine::kernels::extrema::rolling_max_into;
//! use ta_engine::range::{resolve_range, RangeSpec};
//!
//! let data = vec![3.0_f64, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
//! let range = resolve_range(RangeSpec::full(), &[data.len()]).unwrap();
//! let mut out = vec![0.0; data.len()];
//!
//! let written = rolling_max_into(&data, range, 3, &mut out).unwrap();
//! assert_eq!(written.first, 2);
//! assert!((out[0] - 4.0).abs() < 1e-10); // max of [3, 1, 4]
//! assert!((out[3] - 9.0).abs() < 1e-10); // max of [1, 5, 9]
//! ```

use crate::error::Result;
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement};

/// The index and value of a window's extreme element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extreme<T> {
    /// Input index the extreme was observed at.
    pub index: usize,
    /// The extreme value.
    pub value: T,
}

/// Which extreme a tracker follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Max,
    Min,
}

/// Sliding-window extreme tracker.
///
/// One tracker handles either maxima or minima, depending on which `advance`
/// method is called; do not mix the two on one instance.
#[derive(Debug, Clone)]
pub struct ExtremumTracker<T> {
    index: Option<usize>,
    value: T,
}

impl<T: SeriesElement> Default for ExtremumTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesElement> ExtremumTracker<T> {
    /// Creates a tracker with no extreme observed yet.
    ///
    /// The first `advance_*` call performs a full window scan.
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: None,
            value: T::zero(),
        }
    }

    /// Advances the maximum over the window `[window_start, today]`.
    ///
    /// `today` is the newest bar; the caller advances `window_start` by one
    /// per call.
    #[inline]
    pub fn advance_max(&mut self, data: &[T], window_start: usize, today: usize) -> Extreme<T> {
        self.advance(data, window_start, today, Mode::Max)
    }

    /// Advances the minimum over the window `[window_start, today]`.
    #[inline]
    pub fn advance_min(&mut self, data: &[T], window_start: usize, today: usize) -> Extreme<T> {
        self.advance(data, window_start, today, Mode::Min)
    }

    fn advance(&mut self, data: &[T], window_start: usize, today: usize, mode: Mode) -> Extreme<T> {
        let newest = data[today];
        match self.index {
            Some(index) if index >= window_start => {
                // Ties favor the most recent index.
                let replaces = match mode {
                    Mode::Max => newest >= self.value,
                    Mode::Min => newest <= self.value,
                };
                if replaces {
                    self.index = Some(today);
                    self.value = newest;
                }
            }
            _ => {
                // The tracked extreme fell out of the window: rescan it.
                let mut index = window_start;
                let mut value = data[window_start];
                for i in (window_start + 1)..=today {
                    let beats = match mode {
                        Mode::Max => data[i] > value,
                        Mode::Min => data[i] < value,
                    };
                    if beats {
                        index = i;
                        value = data[i];
                    }
                }
                self.index = Some(index);
                self.value = value;
            }
        }
        Extreme {
            index: self.index.unwrap_or(today),
            value: self.value,
        }
    }
}

/// Lookback of the rolling extremum functions: `period - 1`.
#[inline]
#[must_use]
pub const fn rolling_extrema_lookback(period: usize) -> usize {
    if period == 0 {
        0
    } else {
        period - 1
    }
}

fn rolling_extremum<T, O>(
    data: &[T],
    range: IndexRange,
    period: usize,
    mode: Mode,
    indicator: &'static str,
    out: &mut [O],
    mut write: impl FnMut(Extreme<T>) -> O,
) -> Result<OutputRange>
where
    T: SeriesElement,
    O: Copy,
{
    validate_period(period, 1, indicator)?;
    range.check_within(data.len())?;

    let lookback = rolling_extrema_lookback(period);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, indicator)?;

    let mut tracker = ExtremumTracker::new();
    let mut trailing = real_start - lookback;
    let mut out_idx = 0;
    for today in real_start..=range.end {
        let extreme = tracker.advance(data, trailing, today, mode);
        out[out_idx] = write(extreme);
        out_idx += 1;
        trailing += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Computes the rolling maximum over `period` bars into `out`.
///
/// # Errors
///
/// Returns an error if the period is zero, the range does not fit the input,
/// or the output buffer is too small. A range fully consumed by the lookback
/// yields `Ok(OutputRange::empty())`.
pub fn rolling_max_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    out: &mut [T],
) -> Result<OutputRange> {
    rolling_extremum(data, range, period, Mode::Max, "max", out, |e| e.value)
}

/// Computes the rolling minimum over `period` bars into `out`.
///
/// # Errors
///
/// Same failure conditions as [`rolling_max_into`].
pub fn rolling_min_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    out: &mut [T],
) -> Result<OutputRange> {
    rolling_extremum(data, range, period, Mode::Min, "min", out, |e| e.value)
}

/// Writes the input index of each window's maximum into `out`.
///
/// On repeated extremes the most recent index is reported.
///
/// # Errors
///
/// Same failure conditions as [`rolling_max_into`].
pub fn max_index_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    out: &mut [usize],
) -> Result<OutputRange> {
    rolling_extremum(data, range, period, Mode::Max, "max_index", out, |e| e.index)
}

/// Writes the input index of each window's minimum into `out`.
///
/// # Errors
///
/// Same failure conditions as [`rolling_max_into`].
pub fn min_index_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    out: &mut [usize],
) -> Result<OutputRange> {
    rolling_extremum(data, range, period, Mode::Min, "min_index", out, |e| e.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{resolve_range, RangeSpec};

    fn full_range(len: usize) -> IndexRange {
        resolve_range(RangeSpec::full(), &[len]).unwrap()
    }

    #[test]
    fn test_rolling_max_basic() {
        let data = vec![1.0_f64, 3.0, 2.0, 5.0, 4.0];
        let mut out = vec![0.0; 5];
        let range = rolling_max_into(&data, full_range(5), 3, &mut out).unwrap();
        assert_eq!(range, OutputRange::new(2, 3));
        assert_eq!(&out[..3], &[3.0, 5.0, 5.0]);
    }

    #[test]
    fn test_rolling_min_basic() {
        let data = vec![4.0_f64, 3.0, 5.0, 1.0, 2.0];
        let mut out = vec![0.0; 5];
        let range = rolling_min_into(&data, full_range(5), 2, &mut out).unwrap();
        assert_eq!(range, OutputRange::new(1, 4));
        assert_eq!(&out[..4], &[3.0, 3.0, 1.0, 1.0]);
    }

    #[test]
    fn test_tie_break_prefers_recent_index() {
        // Two equal maxima: the index output must point at the later one.
        let data = vec![5.0_f64, 3.0, 5.0, 4.0];
        let mut out = vec![0usize; 4];
        let range = max_index_into(&data, full_range(4), 3, &mut out).unwrap();
        assert_eq!(range.first, 2);
        assert_eq!(out[0], 2); // window [5, 3, 5]: most recent 5 wins
    }

    #[test]
    fn test_rescan_after_extreme_expires() {
        // The max at index 0 falls out of the window at today == 3.
        let data = vec![9.0_f64, 2.0, 3.0, 1.0];
        let mut out = vec![0.0; 4];
        rolling_max_into(&data, full_range(4), 3, &mut out).unwrap();
        assert_eq!(&out[..2], &[9.0, 3.0]);
    }

    #[test]
    fn test_period_one_is_identity() {
        let data = vec![2.0_f64, 7.0, 1.0];
        let mut out = vec![0.0; 3];
        let range = rolling_max_into(&data, full_range(3), 1, &mut out).unwrap();
        assert_eq!(range, OutputRange::new(0, 3));
        assert_eq!(&out[..], &data[..]);
    }

    #[test]
    fn test_empty_after_trim() {
        let data = vec![1.0_f64, 2.0, 3.0];
        let mut out = vec![0.0; 3];
        let range = resolve_range(RangeSpec::new(0, 1), &[3]).unwrap();
        let result = rolling_max_into(&data, range, 5, &mut out).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_zero_period_rejected() {
        let data = vec![1.0_f64, 2.0];
        let mut out = vec![0.0; 2];
        assert!(rolling_max_into(&data, full_range(2), 0, &mut out).is_err());
    }
}
