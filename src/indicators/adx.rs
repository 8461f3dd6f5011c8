//! Average Directional Movement Index and its rating.
//!
//! # Algorithm
//!
//! ADX is a Wilder-smoothed average of the DX series produced by the
//! directional-movement engine. The warm-up has three phases:
//!
//! 1. seed bar plus `period - 1` raw accumulation bars (shared with DI/DX),
//! 2. `period` smoothed bars whose DX values average into the first ADX,
//! 3. the unstable period, already folding new DX values into the running
//!    average with `adx = (adx * (period - 1) + dx) / period`.
//!
//! Bars where DX is not computable (zero true range or zero DI sum) leave
//! the average untouched, so ADX carries forward through dead stretches.
//!
//! ADXR is the midpoint of today's ADX and the ADX from `period - 1` bars
//! earlier: `adxr[t] = (adx[t] + adx[t - period + 1]) / 2`.

use crate::config::{Settings, UnstableKind};
use crate::error::Result;
use crate::kernels::directional::DmState;
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement, ValidatedInput};

/// Lookback of the ADX: `2 * period - 1` plus the unstable period.
#[inline]
#[must_use]
pub fn adx_lookback(period: usize, settings: &Settings) -> usize {
    2 * period + settings.unstable_period(UnstableKind::Adx) - 1
}

/// Lookback of the ADXR: the ADX lookback plus `period - 1` rating bars.
#[inline]
#[must_use]
pub fn adxr_lookback(period: usize, settings: &Settings) -> usize {
    adx_lookback(period, settings) + period - 1
}

/// Computes the Average Directional Movement Index into `out`.
///
/// # Errors
///
/// Returns an error if the period is below 2, the inputs differ in length,
/// the range does not fit, or the output buffer is too small. A range fully
/// consumed by the lookback yields `Ok(OutputRange::empty())`.
pub fn adx_into<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    range: IndexRange,
    period: usize,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    validate_period(period, 2, "adx")?;
    low.validate_same_length(high.len())?;
    close.validate_same_length(high.len())?;
    range.check_within(high.len())?;

    let lookback = adx_lookback(period, settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "adx")?;

    let period_t = T::from_usize(period)?;
    let period_minus_one = T::from_usize(period - 1)?;

    let mut today = real_start - lookback;
    let mut state = DmState::new(high[today], low[today], close[today]);
    for _ in 0..period - 1 {
        today += 1;
        state.advance(high[today], low[today], close[today], period_t, true);
    }

    // First ADX: plain average of the next `period` DX values. Degenerate
    // bars contribute nothing but still divide.
    let mut sum_dx = T::zero();
    for _ in 0..period {
        today += 1;
        state.advance(high[today], low[today], close[today], period_t, false);
        if let Some(dx) = state.dx() {
            sum_dx = sum_dx + dx;
        }
    }
    let mut prev_adx = sum_dx / period_t;

    for _ in 0..settings.unstable_period(UnstableKind::Adx) {
        today += 1;
        state.advance(high[today], low[today], close[today], period_t, false);
        if let Some(dx) = state.dx() {
            prev_adx = (prev_adx * period_minus_one + dx) / period_t;
        }
    }

    out[0] = prev_adx;
    let mut out_idx = 1;
    while today < range.end {
        today += 1;
        state.advance(high[today], low[today], close[today], period_t, false);
        if let Some(dx) = state.dx() {
            prev_adx = (prev_adx * period_minus_one + dx) / period_t;
        }
        out[out_idx] = prev_adx;
        out_idx += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Computes the Average Directional Movement Index Rating into `out`.
///
/// # Errors
///
/// Same failure conditions as [`adx_into`].
pub fn adxr_into<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    range: IndexRange,
    period: usize,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    validate_period(period, 2, "adxr")?;
    low.validate_same_length(high.len())?;
    close.validate_same_length(high.len())?;
    range.check_within(high.len())?;

    let lookback = adxr_lookback(period, settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    let out_len = range.end - real_start + 1;
    validate_output_len(out, out_len, "adxr")?;

    // ADX over a window extended back by the rating offset.
    let adx_range = IndexRange {
        start: real_start - (period - 1),
        end: range.end,
    };
    let mut adx_buf = vec![T::zero(); out_len + period - 1];
    let written = adx_into(high, low, close, adx_range, period, settings, &mut adx_buf)?;
    debug_assert_eq!(written.len, out_len + period - 1);

    for i in 0..out_len {
        out[i] = (adx_buf[i + period - 1] + adx_buf[i]) * T::half();
    }
    Ok(OutputRange::new(real_start, out_len))
}
