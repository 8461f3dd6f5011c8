//! Absolute and percentage price oscillators.
//!
//! Both subtract a slow moving average from a fast one; the percentage
//! variant scales the difference by the slow average:
//!
//! ```text
//! APO = MA(data, fast) - MA(data, slow)
//! PPO = 100 * (MA(data, fast) - MA(data, slow)) / MA(data, slow)
//! ```
//!
//! The moving-average flavor is selectable via [`MaKind`]; inverted periods
//! are swapped. A zero slow average makes the PPO emit 0 for that bar.

use crate::config::Settings;
use crate::error::Result;
use crate::kernels::moving_average::{ma_into, ma_lookback, MaKind};
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, SeriesElement};

/// Lookback of both oscillators: the slow moving average's lookback.
#[inline]
#[must_use]
pub fn price_oscillator_lookback(
    fast_period: usize,
    slow_period: usize,
    kind: MaKind,
    settings: &Settings,
) -> usize {
    ma_lookback(fast_period.max(slow_period), kind, settings)
}

fn oscillator_impl<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    fast_period: usize,
    slow_period: usize,
    kind: MaKind,
    settings: &Settings,
    percentage: bool,
    out: &mut [T],
) -> Result<OutputRange> {
    let (fast_period, slow_period) = if fast_period > slow_period {
        (slow_period, fast_period)
    } else {
        (fast_period, slow_period)
    };
    range.check_within(data.len())?;

    let lookback = ma_lookback(slow_period, kind, settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    let out_len = range.end - real_start + 1;
    validate_output_len(out, out_len, "price_oscillator")?;

    // Both averages over the aligned window; the fast one into scratch, the
    // slow one straight into the output, combined in place.
    let aligned = IndexRange {
        start: real_start,
        end: range.end,
    };
    let mut fast_buf = vec![T::zero(); out_len];
    ma_into(data, aligned, fast_period, kind, settings, &mut fast_buf)?;
    ma_into(data, aligned, slow_period, kind, settings, out)?;

    for i in 0..out_len {
        let slow = out[i];
        out[i] = if percentage {
            if slow.is_zero() {
                T::zero()
            } else {
                T::hundred() * ((fast_buf[i] - slow) / slow)
            }
        } else {
            fast_buf[i] - slow
        };
    }
    Ok(OutputRange::new(real_start, out_len))
}

/// Computes the absolute price oscillator into `out`.
///
/// # Errors
///
/// Returns an error if a period is invalid for the selected flavor, the
/// range does not fit the input, or the output buffer is too small. A range
/// fully consumed by the lookback yields `Ok(OutputRange::empty())`.
#[allow(clippy::too_many_arguments)]
pub fn apo_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    fast_period: usize,
    slow_period: usize,
    kind: MaKind,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    oscillator_impl(
        data,
        range,
        fast_period,
        slow_period,
        kind,
        settings,
        false,
        out,
    )
}

/// Computes the percentage price oscillator into `out`.
///
/// # Errors
///
/// Same failure conditions as [`apo_into`].
#[allow(clippy::too_many_arguments)]
pub fn ppo_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    fast_period: usize,
    slow_period: usize,
    kind: MaKind,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    oscillator_impl(
        data,
        range,
        fast_period,
        slow_period,
        kind,
        settings,
        true,
        out,
    )
}
