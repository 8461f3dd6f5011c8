//! Linear-recurrence moving averages: simple, weighted, exponential.
//!
//! All three are O(1)-per-bar recurrences:
//!
//! - **SMA** keeps a rolling sum: add the newest bar, emit `sum / period`,
//!   drop the oldest.
//! - **WMA** uses triangular weights `1, 2, ..., period` (newest heaviest),
//!   maintained incrementally with two accumulators: `sub`, the plain rolling
//!   sum used to decrement the weighted sum each step, and `sum`, the
//!   weighted rolling sum itself. The divisor is `period * (period + 1) / 2`.
//! - **EMA** runs `ema += k * (x - ema)` with `k = 2 / (period + 1)` (or a
//!   caller-supplied `k`, e.g. Wilder's `1 / period`). Seeding honors the
//!   [`Compatibility`] setting: Classic seeds from the simple average of the
//!   first `period` samples, Metastock from the very first sample of the
//!   series, rolled forward through the warm-up window.
//!
//! # Example
//!
//! ```
//! use ta_engine::kernels::moving_average::sma_into;
//! use ta_engine::range::{resolve_range, RangeSpec};
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let range = resolve_range(RangeSpec::full(), &[data.len()]).unwrap();
//! let mut out = vec![0.0; data.len()];
//!
//! let written = sma_into(&data, range, 3, &mut out).unwrap();
//! assert_eq!((written.first, written.len), (2, 3));
//! assert!((out[0] - 2.0).abs() < 1e-10);
//! ```

use crate::config::{Compatibility, Settings, UnstableKind};
use crate::error::Result;
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement};

/// Lookback of the simple moving average: `period - 1`.
#[inline]
#[must_use]
pub const fn sma_lookback(period: usize) -> usize {
    if period == 0 {
        0
    } else {
        period - 1
    }
}

/// Computes the simple moving average into `out`.
///
/// # Errors
///
/// Returns an error if the period is zero, the range does not fit the input,
/// or the output buffer is too small. A range fully consumed by the lookback
/// yields `Ok(OutputRange::empty())`.
pub fn sma_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    out: &mut [T],
) -> Result<OutputRange> {
    validate_period(period, 1, "sma")?;
    range.check_within(data.len())?;

    let lookback = sma_lookback(period);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "sma")?;

    let period_t = T::from_usize(period)?;
    let mut trailing_idx = real_start - lookback;
    let mut rolling_sum = T::zero();
    for &value in &data[trailing_idx..real_start] {
        rolling_sum = rolling_sum + value;
    }

    let mut out_idx = 0;
    for today in real_start..=range.end {
        rolling_sum = rolling_sum + data[today];
        out[out_idx] = rolling_sum / period_t;
        // Drop the oldest bar only after it contributed to this output.
        rolling_sum = rolling_sum - data[trailing_idx];
        trailing_idx += 1;
        out_idx += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Lookback of the weighted moving average: `period - 1`.
#[inline]
#[must_use]
pub const fn wma_lookback(period: usize) -> usize {
    if period == 0 {
        0
    } else {
        period - 1
    }
}

/// Computes the triangular-weighted moving average into `out`.
///
/// The newest bar carries weight `period`, the oldest weight 1.
///
/// # Errors
///
/// Same failure conditions as [`sma_into`].
pub fn wma_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    out: &mut [T],
) -> Result<OutputRange> {
    validate_period(period, 1, "wma")?;
    range.check_within(data.len())?;

    let lookback = wma_lookback(period);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "wma")?;

    // Degenerate single-bar window: straight copy.
    if period == 1 {
        out[..range.end - real_start + 1].copy_from_slice(&data[real_start..=range.end]);
        return Ok(OutputRange::new(real_start, range.end - real_start + 1));
    }

    let divider = T::from_usize(period * (period + 1) / 2)?;
    let period_t = T::from_usize(period)?;

    let mut trailing_idx = real_start - lookback;
    let mut weighted_sum = T::zero();
    let mut plain_sum = T::zero();
    let mut in_idx = trailing_idx;
    let mut weight = 1usize;
    while in_idx < real_start {
        let value = data[in_idx];
        plain_sum = plain_sum + value;
        weighted_sum = weighted_sum + value * T::from_usize(weight)?;
        in_idx += 1;
        weight += 1;
    }

    // The incremental update: adding the newest bar at full weight and then
    // subtracting the plain sum demotes every older bar by one weight step.
    let mut trailing_value = T::zero();
    let mut out_idx = 0;
    while in_idx <= range.end {
        let value = data[in_idx];
        in_idx += 1;
        plain_sum = plain_sum + value - trailing_value;
        weighted_sum = weighted_sum + value * period_t;
        trailing_value = data[trailing_idx];
        trailing_idx += 1;
        out[out_idx] = weighted_sum / divider;
        out_idx += 1;
        weighted_sum = weighted_sum - plain_sum;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Lookback of the exponential moving average.
///
/// Classic seeding consumes `period - 1` bars plus the configured EMA
/// unstable period. Metastock seeding keeps the same lookback; only the seed
/// value differs.
#[inline]
#[must_use]
pub fn ema_lookback(period: usize, settings: &Settings) -> usize {
    if period == 0 {
        0
    } else {
        period - 1 + settings.unstable_period(UnstableKind::Ema)
    }
}

/// Computes the exponential moving average with `k = 2 / (period + 1)`.
///
/// # Errors
///
/// Returns an error if the period is below 2, the range does not fit the
/// input, or the output buffer is too small.
pub fn ema_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    let k = T::two() / T::from_usize(period + 1)?;
    ema_with_k_into(data, range, period, k, settings, out)
}

/// Computes an exponential moving average with a caller-supplied smoothing
/// constant.
///
/// The period still controls seeding and lookback; `k` only replaces the
/// smoothing constant (Wilder-style callers pass `1 / period`).
///
/// # Errors
///
/// Same failure conditions as [`ema_into`].
pub fn ema_with_k_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    k: T,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    validate_period(period, 2, "ema")?;
    range.check_within(data.len())?;

    let lookback = ema_lookback(period, settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "ema")?;

    // Seed the recurrence, leaving `today` at the first bar not yet consumed.
    let mut prev: T;
    let mut today: usize;
    match settings.compatibility() {
        Compatibility::Classic => {
            today = real_start - lookback;
            let mut sum = T::zero();
            for _ in 0..period {
                sum = sum + data[today];
                today += 1;
            }
            prev = sum / T::from_usize(period)?;
        }
        Compatibility::Metastock => {
            prev = data[0];
            today = 1;
        }
    }

    // Roll through the warm-up window so the first emitted value sits at
    // real_start regardless of where the seed ended.
    while today <= real_start {
        prev = (data[today] - prev) * k + prev;
        today += 1;
    }

    out[0] = prev;
    let mut out_idx = 1;
    while today <= range.end {
        prev = (data[today] - prev) * k + prev;
        out[out_idx] = prev;
        out_idx += 1;
        today += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Selects which moving-average flavor a composite smooths with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaKind {
    /// Simple moving average.
    #[default]
    Sma,
    /// Exponential moving average (classic/Metastock seeding per settings).
    Ema,
    /// Triangular-weighted moving average.
    Wma,
}

/// Lookback of [`ma_into`] for the given flavor.
#[inline]
#[must_use]
pub fn ma_lookback(period: usize, kind: MaKind, settings: &Settings) -> usize {
    if period <= 1 {
        return 0;
    }
    match kind {
        MaKind::Sma => sma_lookback(period),
        MaKind::Ema => ema_lookback(period, settings),
        MaKind::Wma => wma_lookback(period),
    }
}

/// Computes the selected moving average into `out`.
///
/// A period of 1 copies the requested window verbatim, whatever the flavor.
///
/// # Errors
///
/// Same failure conditions as the selected flavor's function.
pub fn ma_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    kind: MaKind,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    validate_period(period, 1, "ma")?;
    if period == 1 {
        range.check_within(data.len())?;
        validate_output_len(out, range.len(), "ma")?;
        out[..range.len()].copy_from_slice(&data[range.start..=range.end]);
        return Ok(OutputRange::new(range.start, range.len()));
    }
    match kind {
        MaKind::Sma => sma_into(data, range, period, out),
        MaKind::Ema => ema_into(data, range, period, settings, out),
        MaKind::Wma => wma_into(data, range, period, out),
    }
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
    fn test_sma_basic() {
        let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
        let mut out = vec![0.0; 5];
        let range = sma_into(&data, full_range(5), 3, &mut out).unwrap();
        assert_eq!(range, OutputRange::new(2, 3));
        assert_eq!(&out[..3], &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sma_constant_input() {
        let data = vec![7.5_f64; 20];
        let mut out = vec![0.0; 20];
        for period in [1, 2, 5, 20] {
            let range = sma_into(&data, full_range(20), period, &mut out).unwrap();
            for i in 0..range.len {
                assert!(approx_eq(out[i], 7.5, EPSILON));
            }
        }
    }

    #[test]
    fn test_sma_sub_range() {
        let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut out = vec![0.0; 6];
        let range = resolve_range(RangeSpec::new(3, 5), &[6]).unwrap();
        let written = sma_into(&data, range, 2, &mut out).unwrap();
        assert_eq!(written, OutputRange::new(3, 3));
        assert_eq!(&out[..3], &[3.5, 4.5, 5.5]);
    }

    #[test]
    fn test_wma_hand_computed() {
        let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
        let mut out = vec![0.0; 5];
        let range = wma_into(&data, full_range(5), 3, &mut out).unwrap();
        assert_eq!(range.first, 2);
        // (1*1 + 2*2 + 3*3) / 6
        assert!(approx_eq(out[0], 14.0 / 6.0, EPSILON));
        assert!(approx_eq(out[1], 20.0 / 6.0, EPSILON));
        assert!(approx_eq(out[2], 26.0 / 6.0, EPSILON));
    }

    #[test]
    fn test_wma_matches_direct_weights() {
        let data: Vec<f64> = (0..40).map(|i| ((i * 37) % 11) as f64 + 0.25).collect();
        let period = 7;
        let mut out = vec![0.0; 40];
        let range = wma_into(&data, full_range(40), period, &mut out).unwrap();
        let divider = (period * (period + 1) / 2) as f64;
        for i in 0..range.len {
            let today = range.first + i;
            let mut expected = 0.0;
            for w in 1..=period {
                expected += w as f64 * data[today + w - period];
            }
            assert!(approx_eq(out[i], expected / divider, EPSILON));
        }
    }

    #[test]
    fn test_ema_classic_seed_is_sma() {
        let data = vec![2.0_f64, 4.0, 6.0, 8.0, 10.0];
        let mut out = vec![0.0; 5];
        let settings = Settings::new();
        let range = ema_into(&data, full_range(5), 3, &settings, &mut out).unwrap();
        assert_eq!(range.first, 2);
        assert!(approx_eq(out[0], 4.0, EPSILON)); // (2 + 4 + 6) / 3
    }

    #[test]
    fn test_ema_metastock_seed_is_first_sample() {
        // A huge first sample makes the two seed modes diverge sharply.
        let data = vec![100.0_f64, 1.0, 1.0, 1.0];
        let mut out = vec![0.0; 4];

        let classic = Settings::new();
        let range = ema_into(&data, full_range(4), 3, &classic, &mut out).unwrap();
        assert_eq!(range.first, 2);
        assert!(approx_eq(out[0], 34.0, EPSILON));

        let mut metastock = Settings::new();
        metastock.set_compatibility(Compatibility::Metastock);
        let range = ema_into(&data, full_range(4), 3, &metastock, &mut out).unwrap();
        assert_eq!(range.first, 2);
        // seed 100 -> 50.5 at bar 1 -> 25.75 at bar 2
        assert!(approx_eq(out[0], 25.75, EPSILON));
        assert!(approx_eq(out[1], 13.375, EPSILON));
    }

    #[test]
    fn test_ema_unstable_period_extends_lookback() {
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        let mut out = vec![0.0; 10];
        let mut settings = Settings::new();
        settings.set_unstable_period(UnstableKind::Ema, 3);
        assert_eq!(ema_lookback(4, &settings), 6);
        let range = ema_into(&data, full_range(10), 4, &settings, &mut out).unwrap();
        assert_eq!(range.first, 6);
        assert_eq!(range.len, 4);
    }

    #[test]
    fn test_ema_wilder_k() {
        let data = vec![3.0_f64, 3.0, 3.0, 9.0];
        let mut out = vec![0.0; 4];
        let settings = Settings::new();
        let k = 1.0 / 3.0;
        let range = ema_with_k_into(&data, full_range(4), 3, k, &settings, &mut out).unwrap();
        assert_eq!(range.first, 2);
        assert!(approx_eq(out[0], 3.0, EPSILON));
        assert!(approx_eq(out[1], 5.0, EPSILON)); // 3 + (9 - 3) / 3
    }

    #[test]
    fn test_ema_rejects_period_one() {
        let data = vec![1.0_f64, 2.0];
        let mut out = vec![0.0; 2];
        assert!(ema_into(&data, full_range(2), 1, &Settings::new(), &mut out).is_err());
    }

    #[test]
    fn test_ma_dispatch_period_one_copies() {
        let data = vec![5.0_f64, 6.0, 7.0];
        let mut out = vec![0.0; 3];
        let settings = Settings::new();
        for kind in [MaKind::Sma, MaKind::Ema, MaKind::Wma] {
            let range = ma_into(&data, full_range(3), 1, kind, &settings, &mut out).unwrap();
            assert_eq!(range, OutputRange::new(0, 3));
            assert_eq!(&out[..], &data[..]);
        }
    }

    #[test]
    fn test_empty_after_trim() {
        let data = vec![1.0_f64, 2.0, 3.0];
        let mut out = vec![0.0; 3];
        let written = sma_into(&data, full_range(3), 4, &mut out).unwrap();
        assert!(written.is_empty());
        // Exactly lookback bars: nothing computable, still a success.
        let range = resolve_range(RangeSpec::new(0, 1), &[3]).unwrap();
        let written = sma_into(&data, range, 3, &mut out).unwrap();
        assert!(written.is_empty());
    }
}
