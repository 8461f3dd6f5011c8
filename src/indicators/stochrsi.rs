//! Stochastic RSI.
//!
//! Applies the fast stochastic to an RSI series instead of raw prices,
//! measuring where the RSI sits inside its own trailing range:
//!
//! ```text
//! rsi     = RSI(data, rsi_period)
//! fast_k  = 100 * (rsi - lowest(rsi)) / (highest(rsi) - lowest(rsi))
//! fast_d  = MA(fast_k, fast_d_period)
//! ```
//!
//! The RSI is computed over a window extended backward by the stochastic's
//! lookback, then fed to [`stoch_fast_into`] with the RSI series standing in
//! for high, low, and close at once.

use crate::config::Settings;
use crate::error::Result;
use crate::indicators::rsi::{rsi_into, rsi_lookback};
use crate::indicators::stochastic::{stoch_fast_into, stoch_fast_lookback};
use crate::kernels::moving_average::MaKind;
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement};

/// Lookback of the Stochastic RSI: RSI lookback plus fast-stochastic
/// lookback.
#[inline]
#[must_use]
pub fn stochrsi_lookback(
    rsi_period: usize,
    fast_k_period: usize,
    fast_d_period: usize,
    fast_d_kind: MaKind,
    settings: &Settings,
) -> usize {
    rsi_lookback(rsi_period, settings)
        + stoch_fast_lookback(fast_k_period, fast_d_period, fast_d_kind, settings)
}

/// Computes the Stochastic RSI (`fast %K`, `fast %D`) into the two output
/// buffers. Both receive the same [`OutputRange`].
///
/// # Errors
///
/// Returns an error if a period is invalid, the range does not fit the
/// input, or an output buffer is too small. A range fully consumed by the
/// lookback yields `Ok(OutputRange::empty())`.
#[allow(clippy::too_many_arguments)]
pub fn stochrsi_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    rsi_period: usize,
    fast_k_period: usize,
    fast_d_period: usize,
    fast_d_kind: MaKind,
    settings: &Settings,
    out_fast_k: &mut [T],
    out_fast_d: &mut [T],
) -> Result<OutputRange> {
    validate_period(rsi_period, 2, "stochrsi")?;
    validate_period(fast_k_period, 1, "stochrsi")?;
    range.check_within(data.len())?;

    let stoch_lookback = stoch_fast_lookback(fast_k_period, fast_d_period, fast_d_kind, settings);
    let lookback = rsi_lookback(rsi_period, settings) + stoch_lookback;
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    let out_len = range.end - real_start + 1;
    validate_output_len(out_fast_k, out_len, "stochrsi")?;
    validate_output_len(out_fast_d, out_len, "stochrsi")?;

    // RSI over a window extended by the stochastic's own lookback.
    let rsi_range = IndexRange {
        start: real_start - stoch_lookback,
        end: range.end,
    };
    let mut rsi_buf = vec![T::zero(); out_len + stoch_lookback];
    let rsi_written = rsi_into(data, rsi_range, rsi_period, settings, &mut rsi_buf)?;
    debug_assert_eq!(rsi_written.len, rsi_buf.len());

    let stoch_range = IndexRange {
        start: 0,
        end: rsi_buf.len() - 1,
    };
    let written = stoch_fast_into(
        &rsi_buf,
        &rsi_buf,
        &rsi_buf,
        stoch_range,
        fast_k_period,
        fast_d_period,
        fast_d_kind,
        settings,
        out_fast_k,
        out_fast_d,
    )?;
    debug_assert_eq!(written.len, out_len);
    Ok(OutputRange::new(real_start, out_len))
}
