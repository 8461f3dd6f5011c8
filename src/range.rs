//! Range resolution and output-range bookkeeping.
//!
//! Every engine entry point operates on an inclusive [`IndexRange`] into the
//! input series and reports which input bars its output corresponds to via
//! [`OutputRange`]. Callers build an `IndexRange` with [`resolve_range`],
//! which validates a possibly relative-to-end [`RangeSpec`] against the
//! shortest of the involved input series.
//!
//! # Example
//!
//! ```
//! use ta_engine::range::{resolve_range, RangeSpec};
//!
//! // Whole series
//! let range = resolve_range(RangeSpec::full(), &[100]).unwrap();
//! assert_eq!((range.start, range.end), (0, 99));
//!
//! // Last 10 bars, validated against the shortest input
//! let range = resolve_range(RangeSpec::new(-10, -1), &[100, 95]).unwrap();
//! assert_eq!((range.start, range.end), (85, 94));
//! ```

use crate::error::{Error, Result};

/// A requested index window, before validation.
///
/// Positions are Python-style: non-negative values index from the front,
/// negative values from the end (`-1` is the last bar). Both bounds are
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    /// Requested first bar.
    pub start: isize,
    /// Requested last bar (inclusive).
    pub end: isize,
}

impl RangeSpec {
    /// Creates a range specification from inclusive positions.
    #[inline]
    #[must_use]
    pub const fn new(start: isize, end: isize) -> Self {
        Self { start, end }
    }

    /// The specification covering an entire series.
    #[inline]
    #[must_use]
    pub const fn full() -> Self {
        Self { start: 0, end: -1 }
    }
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self::full()
    }
}

/// A validated inclusive index window into one or more input series.
///
/// Invariant: `start <= end < len` for every series the range was resolved
/// against. Engine functions re-check the upper bound against their own
/// inputs, so a stale range cannot cause out-of-bounds reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    /// First bar to process.
    pub start: usize,
    /// Last bar to process (inclusive).
    pub end: usize,
}

impl IndexRange {
    /// Creates an index range, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRange` when the window is inverted.
    #[inline]
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange {
                start: start as isize,
                end: end as isize,
                len: 0,
            });
        }
        Ok(Self { start, end })
    }

    /// Number of bars in the window.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; a constructed range holds at least one bar.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Validates the range against a concrete series length.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRange` when `end >= len`.
    #[inline]
    pub fn check_within(&self, len: usize) -> Result<()> {
        if self.end >= len {
            return Err(Error::InvalidRange {
                start: self.start as isize,
                end: self.end as isize,
                len,
            });
        }
        Ok(())
    }

    /// Moves `start` forward to cover at least `lookback` warm-up bars.
    ///
    /// Returns the adjusted first output bar, or `None` when the trimmed
    /// window is empty (the legitimate "nothing to compute" case).
    #[inline]
    #[must_use]
    pub fn trimmed_start(&self, lookback: usize) -> Option<usize> {
        let real_start = if self.start < lookback {
            lookback
        } else {
            self.start
        };
        if real_start > self.end {
            None
        } else {
            Some(real_start)
        }
    }
}

/// Resolves a [`RangeSpec`] against one or more input lengths.
///
/// The window is validated against `min(lengths)` so that every involved
/// series covers it. Negative positions count from that minimum length.
///
/// # Errors
///
/// - `Error::EmptyInput` when no lengths are given or the shortest is zero.
/// - `Error::InvalidRange` when the resolved window violates
///   `0 <= start <= end < len`.
pub fn resolve_range(spec: RangeSpec, lengths: &[usize]) -> Result<IndexRange> {
    let len = lengths.iter().copied().min().ok_or(Error::EmptyInput)?;
    if len == 0 {
        return Err(Error::EmptyInput);
    }

    let invalid = Error::InvalidRange {
        start: spec.start,
        end: spec.end,
        len,
    };

    let len_i = len as isize;
    let start = if spec.start < 0 {
        spec.start + len_i
    } else {
        spec.start
    };
    let end = if spec.end < 0 { spec.end + len_i } else { spec.end };

    if start < 0 || end < start || end >= len_i {
        return Err(invalid);
    }

    Ok(IndexRange {
        start: start as usize,
        end: end as usize,
    })
}

/// Describes which input bars the values written to an output buffer map to.
///
/// `out[i]` corresponds to input index `first + i` for `i < len`. An empty
/// output range (`len == 0`) signals the degenerate-but-valid case where the
/// lookback consumed the whole requested window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRange {
    /// Input index of the first written value.
    pub first: usize,
    /// Number of values written.
    pub len: usize,
}

impl OutputRange {
    /// Creates an output range.
    #[inline]
    #[must_use]
    pub const fn new(first: usize, len: usize) -> Self {
        Self { first, len }
    }

    /// The empty output range: zero values written.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self { first: 0, len: 0 }
    }

    /// Returns true when no values were written.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Input index of the last written value, if any.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> Option<usize> {
        if self.len == 0 {
            None
        } else {
            Some(self.first + self.len - 1)
        }
    }
}
