//! Stochastic oscillator, slow and fast variants.
//!
//! # Algorithm
//!
//! ```text
//! fast_k = 100 * (close - lowest_low) / (highest_high - lowest_low)
//! slow_k = MA(fast_k, slow_k_period)     (the fast variant's fast_d uses
//! slow_d = MA(slow_k, slow_d_period)      one smoothing stage instead)
//! ```
//!
//! over trailing `fast_k_period`-bar extrema of the high and low series. A
//! bar whose window spans no range at all (highest equals lowest) emits a
//! raw `%K` of 0.
//!
//! The raw `%K` series is computed over a window extended backward by the
//! smoothing lookbacks so that both final outputs align at the same bar.

use crate::config::Settings;
use crate::error::Result;
use crate::kernels::extrema::{rolling_extrema_lookback, ExtremumTracker};
use crate::kernels::moving_average::{ma_into, ma_lookback, MaKind};
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement, ValidatedInput};

/// Lookback of the slow stochastic.
#[inline]
#[must_use]
pub fn stoch_lookback(
    fast_k_period: usize,
    slow_k_period: usize,
    slow_k_kind: MaKind,
    slow_d_period: usize,
    slow_d_kind: MaKind,
    settings: &Settings,
) -> usize {
    rolling_extrema_lookback(fast_k_period)
        + ma_lookback(slow_k_period, slow_k_kind, settings)
        + ma_lookback(slow_d_period, slow_d_kind, settings)
}

/// Lookback of the fast stochastic.
#[inline]
#[must_use]
pub fn stoch_fast_lookback(
    fast_k_period: usize,
    fast_d_period: usize,
    fast_d_kind: MaKind,
    settings: &Settings,
) -> usize {
    rolling_extrema_lookback(fast_k_period) + ma_lookback(fast_d_period, fast_d_kind, settings)
}

/// Raw `%K` for bars `k_start..=end`, window extrema over `fast_k_period`.
fn raw_k<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    k_start: usize,
    end: usize,
    fast_k_period: usize,
) -> Vec<T> {
    let mut out = Vec::with_capacity(end - k_start + 1);
    let mut highest = ExtremumTracker::new();
    let mut lowest = ExtremumTracker::new();
    let mut trailing = k_start - rolling_extrema_lookback(fast_k_period);
    for today in k_start..=end {
        let hh = highest.advance_max(high, trailing, today).value;
        let ll = lowest.advance_min(low, trailing, today).value;
        let diff = hh - ll;
        out.push(if diff.is_zero() {
            T::zero()
        } else {
            T::hundred() * ((close[today] - ll) / diff)
        });
        trailing += 1;
    }
    out
}

/// Computes the slow stochastic (`slow %K`, `slow %D`) into the two output
/// buffers. Both receive the same [`OutputRange`].
///
/// # Errors
///
/// Returns an error if a period is invalid, the inputs differ in length,
/// the range does not fit, or an output buffer is too small. A range fully
/// consumed by the lookback yields `Ok(OutputRange::empty())`.
#[allow(clippy::too_many_arguments)]
pub fn stoch_into<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    range: IndexRange,
    fast_k_period: usize,
    slow_k_period: usize,
    slow_k_kind: MaKind,
    slow_d_period: usize,
    slow_d_kind: MaKind,
    settings: &Settings,
    out_slow_k: &mut [T],
    out_slow_d: &mut [T],
) -> Result<OutputRange> {
    validate_period(fast_k_period, 1, "stoch")?;
    low.validate_same_length(high.len())?;
    close.validate_same_length(high.len())?;
    range.check_within(high.len())?;

    let k_smooth_lookback = ma_lookback(slow_k_period, slow_k_kind, settings);
    let d_smooth_lookback = ma_lookback(slow_d_period, slow_d_kind, settings);
    let lookback =
        rolling_extrema_lookback(fast_k_period) + k_smooth_lookback + d_smooth_lookback;
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    let out_len = range.end - real_start + 1;
    validate_output_len(out_slow_k, out_len, "stoch")?;
    validate_output_len(out_slow_d, out_len, "stoch")?;

    // Raw %K over a window extended by both smoothing lookbacks.
    let k_start = real_start - k_smooth_lookback - d_smooth_lookback;
    let fast_k = raw_k(high, low, close, k_start, range.end, fast_k_period);

    let mut slow_k = vec![T::zero(); fast_k.len()];
    let k_range = IndexRange {
        start: 0,
        end: fast_k.len() - 1,
    };
    let k_written = ma_into(&fast_k, k_range, slow_k_period, slow_k_kind, settings, &mut slow_k)?;
    debug_assert_eq!(k_written.len, out_len + d_smooth_lookback);

    let d_range = IndexRange {
        start: 0,
        end: k_written.len - 1,
    };
    let d_written = ma_into(
        &slow_k[..k_written.len],
        d_range,
        slow_d_period,
        slow_d_kind,
        settings,
        out_slow_d,
    )?;
    debug_assert_eq!(d_written.len, out_len);

    out_slow_k[..out_len].copy_from_slice(&slow_k[d_smooth_lookback..d_smooth_lookback + out_len]);
    Ok(OutputRange::new(real_start, out_len))
}

/// Computes the fast stochastic (`fast %K`, `fast %D`) into the two output
/// buffers. Both receive the same [`OutputRange`].
///
/// # Errors
///
/// Same failure conditions as [`stoch_into`].
#[allow(clippy::too_many_arguments)]
pub fn stoch_fast_into<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    range: IndexRange,
    fast_k_period: usize,
    fast_d_period: usize,
    fast_d_kind: MaKind,
    settings: &Settings,
    out_fast_k: &mut [T],
    out_fast_d: &mut [T],
) -> Result<OutputRange> {
    validate_period(fast_k_period, 1, "stochf")?;
    low.validate_same_length(high.len())?;
    close.validate_same_length(high.len())?;
    range.check_within(high.len())?;

    let d_smooth_lookback = ma_lookback(fast_d_period, fast_d_kind, settings);
    let lookback = rolling_extrema_lookback(fast_k_period) + d_smooth_lookback;
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    let out_len = range.end - real_start + 1;
    validate_output_len(out_fast_k, out_len, "stochf")?;
    validate_output_len(out_fast_d, out_len, "stochf")?;

    let k_start = real_start - d_smooth_lookback;
    let fast_k = raw_k(high, low, close, k_start, range.end, fast_k_period);

    let d_range = IndexRange {
        start: 0,
        end: fast_k.len() - 1,
    };
    let d_written = ma_into(&fast_k, d_range, fast_d_period, fast_d_kind, settings, out_fast_d)?;
    debug_assert_eq!(d_written.len, out_len);

    out_fast_k[..out_len].copy_from_slice(&fast_k[d_smooth_lookback..]);
    Ok(OutputRange::new(real_start, out_len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{resolve_range, RangeSpec};
    use crate::utils::{approx_eq, EPSILON};

    fn full_range(len: usize) -> IndexRange {
        resolve_range(RangeSpec::full(), &[len]).unwrap()
    }

    fn wavy_bars(len: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..len)
            .map(|i| (i as f64 * 0.5).sin() * 10.0 + 50.0)
            .collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.5).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.5).collect();
        (high, low, close)
    }

    #[test]
    fn test_fast_k_hand_computed() {
        let high = vec![10.0_f64, 12.0, 14.0, 13.0];
        let low = vec![8.0_f64, 9.0, 11.0, 10.0];
        let close = vec![9.0_f64, 11.0, 13.0, 12.0];
        let mut k = vec![0.0; 4];
        let mut d = vec![0.0; 4];
        // fast_d period 1 disables smoothing: fast %K comes out raw.
        let range = stoch_fast_into(
            &high,
            &low,
            &close,
            full_range(4),
            3,
            1,
            MaKind::Sma,
            &Settings::new(),
            &mut k,
            &mut d,
        )
        .unwrap();
        assert_eq!(range, OutputRange::new(2, 2));
        // Window [0..2]: hh = 14, ll = 8 -> 100 * (13 - 8) / 6
        assert!(approx_eq(k[0], 100.0 * 5.0 / 6.0, EPSILON));
        // Window [1..3]: hh = 14, ll = 9 -> 100 * (12 - 9) / 5
        assert!(approx_eq(k[1], 60.0, EPSILON));
        // No smoothing: %D equals %K.
        assert!(approx_eq(d[0], k[0], EPSILON));
    }

    #[test]
    fn test_flat_window_emits_zero() {
        let high = vec![5.0_f64; 8];
        let low = vec![5.0_f64; 8];
        let close = vec![5.0_f64; 8];
        let mut k = vec![0.0; 8];
        let mut d = vec![0.0; 8];
        let range = stoch_fast_into(
            &high,
            &low,
            &close,
            full_range(8),
            3,
            2,
            MaKind::Sma,
            &Settings::new(),
            &mut k,
            &mut d,
        )
        .unwrap();
        for i in 0..range.len {
            assert!(approx_eq(k[i], 0.0, EPSILON));
            assert!(approx_eq(d[i], 0.0, EPSILON));
        }
    }

    #[test]
    fn test_slow_stoch_alignment_and_bounds() {
        let (high, low, close) = wavy_bars(60);
        let settings = Settings::new();
        let mut k = vec![0.0; 60];
        let mut d = vec![0.0; 60];
        let range = stoch_into(
            &high,
            &low,
            &close,
            full_range(60),
            5,
            3,
            MaKind::Sma,
            3,
            MaKind::Sma,
            &settings,
            &mut k,
            &mut d,
        )
        .unwrap();
        assert_eq!(
            range.first,
            stoch_lookback(5, 3, MaKind::Sma, 3, MaKind::Sma, &settings)
        );
        assert_eq!(range.len, 60 - range.first);
        for i in 0..range.len {
            assert!(k[i] >= 0.0 - EPSILON && k[i] <= 100.0 + EPSILON);
            assert!(d[i] >= 0.0 - EPSILON && d[i] <= 100.0 + EPSILON);
        }
    }

    #[test]
    fn test_slow_d_is_ma_of_slow_k() {
        let (high, low, close) = wavy_bars(50);
        let settings = Settings::new();
        let mut k = vec![0.0; 50];
        let mut d = vec![0.0; 50];
        let range = stoch_into(
            &high,
            &low,
            &close,
            full_range(50),
            5,
            3,
            MaKind::Sma,
            3,
            MaKind::Sma,
            &settings,
            &mut k,
            &mut d,
        )
        .unwrap();
        // %D at bar t is the 3-bar average of %K ending at t; check interior
        // bars where all three %K values are in the output.
        for i in 2..range.len {
            let expected = (k[i] + k[i - 1] + k[i - 2]) / 3.0;
            assert!(approx_eq(d[i], expected, 1e-9));
        }
    }

    #[test]
    fn test_fast_k_period_one_tracks_close_position() {
        // period 1: window is the bar itself, %K = position of close in
        // the bar's own range.
        let high = vec![10.0_f64, 20.0];
        let low = vec![0.0_f64, 10.0];
        let close = vec![5.0_f64, 17.5];
        let mut k = vec![0.0; 2];
        let mut d = vec![0.0; 2];
        let range = stoch_fast_into(
            &high,
            &low,
            &close,
            full_range(2),
            1,
            1,
            MaKind::Sma,
            &Settings::new(),
            &mut k,
            &mut d,
        )
        .unwrap();
        assert_eq!(range.len, 2);
        assert!(approx_eq(k[0], 50.0, EPSILON));
        assert!(approx_eq(k[1], 75.0, EPSILON));
    }

    #[test]
    fn test_stoch_empty_after_trim() {
        let (high, low, close) = wavy_bars(5);
        let mut k = vec![0.0; 5];
        let mut d = vec![0.0; 5];
        let range = stoch_into(
            &high,
            &low,
            &close,
            full_range(5),
            5,
            3,
            MaKind::Sma,
            3,
            MaKind::Sma,
            &Settings::new(),
            &mut k,
            &mut d,
        )
        .unwrap();
        assert!(range.is_empty());
    }
}
