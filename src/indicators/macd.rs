//! Moving Average Convergence/Divergence.
//!
//! # Algorithm
//!
//! ```text
//! macd      = EMA(data, fast) - EMA(data, slow)
//! signal    = EMA(macd, signal_period)
//! histogram = macd - signal
//! ```
//!
//! The two price EMAs are computed over an extended window so the signal
//! EMA has its own warm-up worth of MACD values to seed from; all three
//! outputs then align at the same first bar. If the caller passes a fast
//! period larger than the slow one, the two are swapped.
//!
//! EMA seeding (and with it the Metastock behavior of the whole composite)
//! follows the [`Compatibility`](crate::config::Compatibility) setting. In
//! Metastock mode the price EMAs seed from the very first bar of the input,
//! and the signal EMA from the first bar of the internal MACD series.

use crate::config::Settings;
use crate::error::Result;
use crate::kernels::moving_average::{ema_into, ema_lookback};
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement};

/// Lookback of the MACD: slow-EMA warm-up plus signal-EMA warm-up.
#[inline]
#[must_use]
pub fn macd_lookback(
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    settings: &Settings,
) -> usize {
    let slow = fast_period.max(slow_period);
    ema_lookback(slow, settings) + ema_lookback(signal_period, settings)
}

/// Computes MACD, signal, and histogram into the three output buffers.
///
/// All three buffers receive the same [`OutputRange`].
///
/// # Errors
///
/// Returns an error if any period is below 2, the range does not fit the
/// input, or an output buffer is too small. A range fully consumed by the
/// lookback yields `Ok(OutputRange::empty())`.
#[allow(clippy::too_many_arguments)]
pub fn macd_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    settings: &Settings,
    out_macd: &mut [T],
    out_signal: &mut [T],
    out_hist: &mut [T],
) -> Result<OutputRange> {
    let (fast_period, slow_period) = if fast_period > slow_period {
        (slow_period, fast_period)
    } else {
        (fast_period, slow_period)
    };
    validate_period(fast_period, 2, "macd")?;
    validate_period(signal_period, 2, "macd")?;
    range.check_within(data.len())?;

    let signal_lookback = ema_lookback(signal_period, settings);
    let lookback = ema_lookback(slow_period, settings) + signal_lookback;
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    let out_len = range.end - real_start + 1;
    validate_output_len(out_macd, out_len, "macd")?;
    validate_output_len(out_signal, out_len, "macd")?;
    validate_output_len(out_hist, out_len, "macd")?;

    // Extend the window backward so the signal EMA can warm up on real MACD
    // values instead of truncating the output.
    let temp_start = real_start - signal_lookback;
    let temp_range = IndexRange {
        start: temp_start,
        end: range.end,
    };
    let temp_len = range.end - temp_start + 1;
    let mut fast_buf = vec![T::zero(); temp_len];
    let mut slow_buf = vec![T::zero(); temp_len];
    ema_into(data, temp_range, slow_period, settings, &mut slow_buf)?;
    ema_into(data, temp_range, fast_period, settings, &mut fast_buf)?;

    // MACD line over the extended window, in place.
    for i in 0..temp_len {
        fast_buf[i] = fast_buf[i] - slow_buf[i];
    }

    let signal_range = IndexRange {
        start: 0,
        end: temp_len - 1,
    };
    let written = ema_into(&fast_buf, signal_range, signal_period, settings, out_signal)?;
    debug_assert_eq!(written.first, signal_lookback);
    debug_assert_eq!(written.len, out_len);

    for i in 0..out_len {
        out_macd[i] = fast_buf[signal_lookback + i];
        out_hist[i] = out_macd[i] - out_signal[i];
    }
    Ok(OutputRange::new(real_start, out_len))
}
