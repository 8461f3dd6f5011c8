//! Directional movement, true range, and the DI/DX family.
//!
//! [`DmState`] carries the recurrence state of Wilder's directional-movement
//! system: the previous bar's high/low/close plus the smoothed `+DM`, `-DM`,
//! and true-range accumulators. The warm-up runs in two phases — an *init*
//! phase that sums raw deltas over the first `period` bars, then an *update*
//! phase applying full Wilder smoothing (`x = x - x/period + new`) for the
//! configured unstable period (always at least one pass).
//!
//! # Directional movement cases
//!
//! With `diffP = high[t] - high[t-1]` and `diffM = low[t-1] - low[t]`, the
//! classification is mutually exclusive, checked in this order:
//!
//! 1. `diffM > 0 && diffP < diffM` — downward expansion, accumulate `-DM`
//! 2. `diffP > 0 && diffP > diffM` — upward expansion, accumulate `+DM`
//! 3. anything else (inside bars, equal deltas, both non-positive) — neither
//!    accumulates; both smoothed DMs keep decaying.
//!
//! # Degeneracies
//!
//! `+DI`/`-DI` emit 0 on a zero true range. `DX` carries its previous output
//! forward when the true range or the DI sum is zero.

use crate::config::{Settings, UnstableKind};
use crate::error::Result;
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement, ValidatedInput};

/// One bar's raw directional deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmDelta<T> {
    /// Upward range expansion: `high[t] - high[t-1]`.
    pub plus: T,
    /// Downward range expansion: `low[t-1] - low[t]`.
    pub minus: T,
}

/// The largest of `high - low`, `|high - prev_close|`, `|low - prev_close|`.
#[inline]
#[must_use]
pub fn true_range<T: SeriesElement>(high: T, low: T, prev_close: T) -> T {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Recurrence state of Wilder's directional-movement system.
#[derive(Debug, Clone)]
pub struct DmState<T> {
    prev_high: T,
    prev_low: T,
    prev_close: T,
    plus_dm: T,
    minus_dm: T,
    tr: T,
}

impl<T: SeriesElement> DmState<T> {
    /// Seeds the state from the first bar of the warm-up window.
    #[must_use]
    pub fn new(high: T, low: T, close: T) -> Self {
        Self {
            prev_high: high,
            prev_low: low,
            prev_close: close,
            plus_dm: T::zero(),
            minus_dm: T::zero(),
            tr: T::zero(),
        }
    }

    /// Computes this bar's deltas and rolls the high/low memory forward.
    #[inline]
    pub fn delta(&mut self, high: T, low: T) -> DmDelta<T> {
        let delta = DmDelta {
            plus: high - self.prev_high,
            minus: self.prev_low - low,
        };
        self.prev_high = high;
        self.prev_low = low;
        delta
    }

    /// True range of this bar against the remembered close.
    #[inline]
    #[must_use]
    pub fn bar_true_range(&self, high: T, low: T) -> T {
        true_range(high, low, self.prev_close)
    }

    /// Rolls the close memory forward; call once per bar, after
    /// [`Self::bar_true_range`].
    #[inline]
    pub fn observe_close(&mut self, close: T) {
        self.prev_close = close;
    }

    /// Init-phase step: accumulates raw deltas without the decay term.
    #[inline]
    pub fn accumulate_raw(&mut self, delta: DmDelta<T>, tr: T) {
        if delta.minus > T::zero() && delta.plus < delta.minus {
            self.minus_dm = self.minus_dm + delta.minus;
        } else if delta.plus > T::zero() && delta.plus > delta.minus {
            self.plus_dm = self.plus_dm + delta.plus;
        }
        self.tr = self.tr + tr;
    }

    /// Update-phase step: full Wilder smoothing of both DMs and the TR.
    #[inline]
    pub fn smooth(&mut self, delta: DmDelta<T>, tr: T, period: T) {
        self.plus_dm = self.plus_dm - self.plus_dm / period;
        self.minus_dm = self.minus_dm - self.minus_dm / period;
        if delta.minus > T::zero() && delta.plus < delta.minus {
            self.minus_dm = self.minus_dm + delta.minus;
        } else if delta.plus > T::zero() && delta.plus > delta.minus {
            self.plus_dm = self.plus_dm + delta.plus;
        }
        self.tr = self.tr - self.tr / period + tr;
    }

    /// The smoothed plus directional movement.
    #[inline]
    #[must_use]
    pub fn plus_dm(&self) -> T {
        self.plus_dm
    }

    /// The smoothed minus directional movement.
    #[inline]
    #[must_use]
    pub fn minus_dm(&self) -> T {
        self.minus_dm
    }

    /// The smoothed true range.
    #[inline]
    #[must_use]
    pub fn tr(&self) -> T {
        self.tr
    }

    /// `100 * +DM / TR`, or 0 when the true range is zero.
    #[inline]
    #[must_use]
    pub fn plus_di(&self) -> T {
        if self.tr.is_zero() {
            T::zero()
        } else {
            T::hundred() * (self.plus_dm / self.tr)
        }
    }

    /// `100 * -DM / TR`, or 0 when the true range is zero.
    #[inline]
    #[must_use]
    pub fn minus_di(&self) -> T {
        if self.tr.is_zero() {
            T::zero()
        } else {
            T::hundred() * (self.minus_dm / self.tr)
        }
    }

    /// `100 * |+DI - -DI| / (+DI + -DI)`, or `None` when nothing is
    /// computable this bar (zero TR or zero DI sum); callers carry the
    /// previous output forward.
    #[inline]
    #[must_use]
    pub fn dx(&self) -> Option<T> {
        if self.tr.is_zero() {
            return None;
        }
        let plus_di = self.plus_di();
        let minus_di = self.minus_di();
        let di_sum = plus_di + minus_di;
        if di_sum.is_zero() {
            None
        } else {
            Some(T::hundred() * ((plus_di - minus_di).abs() / di_sum))
        }
    }

    /// Runs one full bar: delta, true range, the selected phase step, and
    /// the close roll-forward.
    #[inline]
    pub fn advance(&mut self, high: T, low: T, close: T, period: T, raw: bool) {
        let delta = self.delta(high, low);
        let tr = self.bar_true_range(high, low);
        if raw {
            self.accumulate_raw(delta, tr);
        } else {
            self.smooth(delta, tr, period);
        }
        self.observe_close(close);
    }
}

/// Lookback of the true range: 1 bar (the previous close).
#[inline]
#[must_use]
pub const fn true_range_lookback() -> usize {
    1
}

/// Computes the true range into `out`.
///
/// # Errors
///
/// Returns an error if the inputs differ in length, the range does not fit,
/// or the output buffer is too small.
pub fn true_range_into<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    range: IndexRange,
    out: &mut [T],
) -> Result<OutputRange> {
    low.validate_same_length(high.len())?;
    close.validate_same_length(high.len())?;
    range.check_within(high.len())?;

    let Some(real_start) = range.trimmed_start(true_range_lookback()) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "true_range")?;

    let mut out_idx = 0;
    for today in real_start..=range.end {
        out[out_idx] = true_range(high[today], low[today], close[today - 1]);
        out_idx += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Lookback of `+DI`: `period` plus the configured unstable period.
#[inline]
#[must_use]
pub fn plus_di_lookback(period: usize, settings: &Settings) -> usize {
    period + settings.unstable_period(UnstableKind::PlusDi)
}

/// Lookback of `-DI`: `period` plus the configured unstable period.
#[inline]
#[must_use]
pub fn minus_di_lookback(period: usize, settings: &Settings) -> usize {
    period + settings.unstable_period(UnstableKind::MinusDi)
}

/// Lookback of `DX`: `period` plus the configured unstable period.
#[inline]
#[must_use]
pub fn dx_lookback(period: usize, settings: &Settings) -> usize {
    period + settings.unstable_period(UnstableKind::Dx)
}

fn validate_hlc<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    range: IndexRange,
    period: usize,
) -> Result<()> {
    validate_period(period, 2, "directional movement")?;
    low.validate_same_length(high.len())?;
    close.validate_same_length(high.len())?;
    range.check_within(high.len())
}

/// Seeds a [`DmState`] so that `today == real_start` has been consumed.
///
/// Runs the raw init phase over `period - 1` bars, then `unstable + 1`
/// smoothed bars; the +1 guarantees at least one smoothing pass even when
/// the unstable period is zero.
fn warm_up_dm<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    real_start: usize,
    lookback: usize,
    period: usize,
    unstable: usize,
) -> Result<(DmState<T>, usize)> {
    let period_t = T::from_usize(period)?;
    let mut today = real_start - lookback;
    let mut state = DmState::new(high[today], low[today], close[today]);
    for _ in 0..period - 1 {
        today += 1;
        state.advance(high[today], low[today], close[today], period_t, true);
    }
    for _ in 0..=unstable {
        today += 1;
        state.advance(high[today], low[today], close[today], period_t, false);
    }
    Ok((state, today))
}

fn di_impl<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    range: IndexRange,
    period: usize,
    lookback: usize,
    unstable: usize,
    indicator: &'static str,
    out: &mut [T],
    read: impl Fn(&DmState<T>) -> T,
) -> Result<OutputRange> {
    validate_hlc(high, low, close, range, period)?;
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, indicator)?;

    let period_t = T::from_usize(period)?;
    let (mut state, mut today) =
        warm_up_dm(high, low, close, real_start, lookback, period, unstable)?;

    out[0] = read(&state);
    let mut out_idx = 1;
    while today < range.end {
        today += 1;
        state.advance(high[today], low[today], close[today], period_t, false);
        out[out_idx] = read(&state);
        out_idx += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Computes the plus directional indicator into `out`.
///
/// # Errors
///
/// Returns an error if the period is below 2, the inputs differ in length,
/// the range does not fit, or the output buffer is too small. A range fully
/// consumed by the lookback yields `Ok(OutputRange::empty())`.
pub fn plus_di_into<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    range: IndexRange,
    period: usize,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    let unstable = settings.unstable_period(UnstableKind::PlusDi);
    di_impl(
        high,
        low,
        close,
        range,
        period,
        plus_di_lookback(period, settings),
        unstable,
        "plus_di",
        out,
        DmState::plus_di,
    )
}

/// Computes the minus directional indicator into `out`.
///
/// # Errors
///
/// Same failure conditions as [`plus_di_into`].
pub fn minus_di_into<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    range: IndexRange,
    period: usize,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    let unstable = settings.unstable_period(UnstableKind::MinusDi);
    di_impl(
        high,
        low,
        close,
        range,
        period,
        minus_di_lookback(period, settings),
        unstable,
        "minus_di",
        out,
        DmState::minus_di,
    )
}

/// Computes the directional movement index into `out`.
///
/// Bars on which the true range or the DI sum is zero re-emit the previous
/// DX value (0 before the first computable bar).
///
/// # Errors
///
/// Same failure conditions as [`plus_di_into`].
pub fn dx_into<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    range: IndexRange,
    period: usize,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    validate_hlc(high, low, close, range, period)?;
    let lookback = dx_lookback(period, settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "dx")?;

    let unstable = settings.unstable_period(UnstableKind::Dx);
    let period_t = T::from_usize(period)?;
    let (mut state, mut today) =
        warm_up_dm(high, low, close, real_start, lookback, period, unstable)?;

    let mut prev_dx = state.dx().unwrap_or_else(T::zero);
    out[0] = prev_dx;
    let mut out_idx = 1;
    while today < range.end {
        today += 1;
        state.advance(high[today], low[today], close[today], period_t, false);
        if let Some(dx) = state.dx() {
            prev_dx = dx;
        }
        out[out_idx] = prev_dx;
        out_idx += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{resolve_range, RangeSpec};
    use crate::utils::{approx_eq, EPSILON};

    fn full_range(len: usize) -> IndexRange {
        resolve_range(RangeSpec::full(), &[len]).unwrap()
    }

    #[test]
    fn test_true_range_cases() {
        // Plain bar range
        assert!(approx_eq(true_range(10.0, 8.0, 9.0), 2.0, EPSILON));
        // Gap up: distance to previous close dominates
        assert!(approx_eq(true_range(15.0, 14.0, 9.0), 6.0, EPSILON));
        // Gap down
        assert!(approx_eq(true_range(5.0, 4.0, 9.0), 5.0, EPSILON));
    }

    #[test]
    fn test_true_range_into() {
        let high = vec![10.0_f64, 12.0, 11.0];
        let low = vec![9.0_f64, 10.5, 10.0];
        let close = vec![9.5_f64, 11.0, 10.2];
        let mut out = vec![0.0; 3];
        let range = true_range_into(&high, &low, &close, full_range(3), &mut out).unwrap();
        assert_eq!(range, OutputRange::new(1, 2));
        assert!(approx_eq(out[0], 2.5, EPSILON)); // max(1.5, |12-9.5|, |10.5-9.5|)
        assert!(approx_eq(out[1], 1.0, EPSILON));
    }

    #[test]
    fn test_dm_classification_cases() {
        // Case: up move dominates
        let mut state = DmState::new(10.0_f64, 9.0, 9.5);
        let delta = state.delta(12.0, 9.5);
        assert!(approx_eq(delta.plus, 2.0, EPSILON));
        assert!(approx_eq(delta.minus, -0.5, EPSILON));
        state.accumulate_raw(delta, 0.0);
        assert!(approx_eq(state.plus_dm(), 2.0, EPSILON));
        assert!(approx_eq(state.minus_dm(), 0.0, EPSILON));

        // Case: down move dominates
        let mut state = DmState::new(10.0_f64, 9.0, 9.5);
        let delta = state.delta(10.5, 7.0);
        state.accumulate_raw(delta, 0.0);
        assert!(approx_eq(state.plus_dm(), 0.0, EPSILON));
        assert!(approx_eq(state.minus_dm(), 2.0, EPSILON));

        // Case: equal expansion on both sides accumulates neither
        let mut state = DmState::new(10.0_f64, 9.0, 9.5);
        let delta = state.delta(11.0, 8.0);
        assert!(approx_eq(delta.plus, delta.minus, EPSILON));
        state.accumulate_raw(delta, 0.0);
        assert!(approx_eq(state.plus_dm(), 0.0, EPSILON));
        assert!(approx_eq(state.minus_dm(), 0.0, EPSILON));

        // Case: inside bar (both deltas non-positive)
        let mut state = DmState::new(10.0_f64, 9.0, 9.5);
        let delta = state.delta(9.8, 9.2);
        state.accumulate_raw(delta, 0.0);
        assert!(approx_eq(state.plus_dm(), 0.0, EPSILON));
        assert!(approx_eq(state.minus_dm(), 0.0, EPSILON));
    }

    #[test]
    fn test_wilder_smoothing_decays_both_sides() {
        let mut state = DmState::new(10.0_f64, 9.0, 9.5);
        let delta = state.delta(12.0, 9.5); // +DM case
        state.smooth(delta, 1.0, 4.0);
        assert!(approx_eq(state.plus_dm(), 2.0, EPSILON));

        // A neutral bar decays the accumulator without adding.
        let delta = state.delta(12.0, 9.5);
        state.smooth(delta, 1.0, 4.0);
        assert!(approx_eq(state.plus_dm(), 1.5, EPSILON));
    }

    #[test]
    fn test_flat_series_emits_zero() {
        let high = vec![5.0_f64; 12];
        let low = vec![5.0_f64; 12];
        let close = vec![5.0_f64; 12];
        let mut out = vec![9.9; 12];
        let settings = Settings::new();

        let range = plus_di_into(&high, &low, &close, full_range(12), 3, &settings, &mut out)
            .unwrap();
        assert_eq!(range.first, 3);
        for i in 0..range.len {
            assert!(approx_eq(out[i], 0.0, EPSILON));
        }

        let range =
            dx_into(&high, &low, &close, full_range(12), 3, &settings, &mut out).unwrap();
        for i in 0..range.len {
            assert!(approx_eq(out[i], 0.0, EPSILON));
        }
    }

    #[test]
    fn test_dx_carries_forward_on_flat_tail() {
        // Trending first half, then perfectly flat bars: DX must re-emit its
        // previous value instead of dropping to NaN or zero.
        let mut high = vec![0.0_f64; 20];
        let mut low = vec![0.0_f64; 20];
        let mut close = vec![0.0_f64; 20];
        for i in 0..10 {
            high[i] = 10.0 + i as f64;
            low[i] = 9.0 + i as f64;
            close[i] = 9.5 + i as f64;
        }
        for i in 10..20 {
            high[i] = high[9];
            low[i] = high[9];
            close[i] = high[9];
        }
        let mut out = vec![0.0; 20];
        let settings = Settings::new();
        let range = dx_into(&high, &low, &close, full_range(20), 3, &settings, &mut out).unwrap();
        // Wilder smoothing never empties TR here, so DX stays computable and
        // positive through the trend; on the flat tail it converges but must
        // stay finite and carried.
        for i in 1..range.len {
            assert!(out[i].is_finite());
        }
    }

    #[test]
    fn test_di_lookback_and_unstable() {
        let mut settings = Settings::new();
        assert_eq!(plus_di_lookback(14, &settings), 14);
        settings.set_unstable_period(UnstableKind::PlusDi, 5);
        assert_eq!(plus_di_lookback(14, &settings), 19);
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let high = vec![1.0_f64; 10];
        let low = vec![1.0_f64; 9];
        let close = vec![1.0_f64; 10];
        let mut out = vec![0.0; 10];
        let result = plus_di_into(
            &high,
            &low,
            &close,
            full_range(10),
            3,
            &Settings::new(),
            &mut out,
        );
        assert!(result.is_err());
    }
}
