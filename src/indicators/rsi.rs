//! Relative Strength Index.
//!
//! # Algorithm
//!
//! Bar-to-bar differences are split into gains and losses, averaged over the
//! first `period` bars, then smoothed with Wilder's recurrence:
//!
//! ```text
//! avg_gain = (avg_gain * (period - 1) + gain) / period
//! avg_loss = (avg_loss * (period - 1) + loss) / period
//! RSI      = 100 * avg_gain / (avg_gain + avg_loss)
//! ```
//!
//! A bar where both averages are zero emits 0.
//!
//! # Compatibility
//!
//! Metastock mode shortens the lookback by one bar: the very first output is
//! computed from plain (unsmoothed) averages over a window whose first
//! difference is pinned to zero, after which the recurrence restarts from the
//! same origin and proceeds normally. With a non-zero unstable period that
//! first value falls inside the discarded warm-up anyway, so only the
//! lookback reduction remains.

use crate::config::{Compatibility, Settings, UnstableKind};
use crate::error::Result;
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement};

/// Lookback of the RSI: `period` plus the unstable period, one bar less in
/// Metastock mode.
#[inline]
#[must_use]
pub fn rsi_lookback(period: usize, settings: &Settings) -> usize {
    let lookback = period + settings.unstable_period(UnstableKind::Rsi);
    match settings.compatibility() {
        Compatibility::Classic => lookback,
        Compatibility::Metastock => lookback - 1,
    }
}

/// Computes the Relative Strength Index into `out`.
///
/// # Errors
///
/// Returns an error if the period is below 2, the range does not fit the
/// input, or the output buffer is too small. A range fully consumed by the
/// lookback yields `Ok(OutputRange::empty())`.
pub fn rsi_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    validate_period(period, 2, "rsi")?;
    range.check_within(data.len())?;

    let lookback = rsi_lookback(period, settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "rsi")?;

    let period_t = T::from_usize(period)?;
    let period_minus_one = T::from_usize(period - 1)?;
    let unstable = settings.unstable_period(UnstableKind::Rsi);

    let mut today = real_start - lookback;
    let mut prev_value = data[today];
    let mut out_idx = 0;

    // Metastock's first output comes from plain averages over a window whose
    // first difference is zero (the seed bar diffed against itself). The
    // recurrence then restarts from the same origin.
    if settings.compatibility() == Compatibility::Metastock && unstable == 0 {
        let save_prev_value = prev_value;
        let mut gain = T::zero();
        let mut loss = T::zero();
        for _ in 0..period {
            let value = data[today];
            today += 1;
            let diff = value - prev_value;
            prev_value = value;
            if diff < T::zero() {
                loss = loss - diff;
            } else {
                gain = gain + diff;
            }
        }
        let avg_gain = gain / period_t;
        let total = avg_gain + loss / period_t;
        out[0] = if total.is_zero() {
            T::zero()
        } else {
            T::hundred() * (avg_gain / total)
        };
        out_idx = 1;
        if today > range.end {
            return Ok(OutputRange::new(real_start, out_idx));
        }
        today -= period;
        prev_value = save_prev_value;
    }

    // Seed the averages from the first `period` differences.
    let mut prev_gain = T::zero();
    let mut prev_loss = T::zero();
    today += 1;
    for _ in 0..period {
        let value = data[today];
        today += 1;
        let diff = value - prev_value;
        prev_value = value;
        if diff < T::zero() {
            prev_loss = prev_loss - diff;
        } else {
            prev_gain = prev_gain + diff;
        }
    }
    prev_gain = prev_gain / period_t;
    prev_loss = prev_loss / period_t;

    if today > real_start {
        let total = prev_gain + prev_loss;
        out[out_idx] = if total.is_zero() {
            T::zero()
        } else {
            T::hundred() * (prev_gain / total)
        };
        out_idx += 1;
    } else {
        // Burn through the unstable window without emitting.
        while today < real_start {
            let value = data[today];
            today += 1;
            let diff = value - prev_value;
            prev_value = value;
            prev_gain = prev_gain * period_minus_one;
            prev_loss = prev_loss * period_minus_one;
            if diff < T::zero() {
                prev_loss = prev_loss - diff;
            } else {
                prev_gain = prev_gain + diff;
            }
            prev_gain = prev_gain / period_t;
            prev_loss = prev_loss / period_t;
        }
    }

    while today <= range.end {
        let value = data[today];
        today += 1;
        let diff = value - prev_value;
        prev_value = value;
        prev_gain = prev_gain * period_minus_one;
        prev_loss = prev_loss * period_minus_one;
        if diff < T::zero() {
            prev_loss = prev_loss - diff;
        } else {
            prev_gain = prev_gain + diff;
        }
        prev_gain = prev_gain / period_t;
        prev_loss = prev_loss / period_t;
        let total = prev_gain + prev_loss;
        out[out_idx] = if total.is_zero() {
            T::zero()
        } else {
            T::hundred() * (prev_gain / total)
        };
        out_idx += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}
