//! Hilbert Transform indicator family.
//!
//! All six functions share one per-bar pipeline: the raw input is
//! conditioned by the 4-bar [`PriceSmoother`], pushed through the
//! [`CycleState`] cascade, and the resulting period/phasor estimates drive
//! the per-indicator output. They differ in what they read off the engine:
//!
//! - [`ht_dc_period_into`]: the smoothed dominant cycle period.
//! - [`ht_phasor_into`]: the raw in-phase and quadrature components.
//! - [`ht_dc_phase_into`]: the phase angle of the dominant cycle, from a
//!   sine/cosine correlation over the last dominant-cycle-worth of smoothed
//!   prices.
//! - [`ht_sine_into`]: sine of that phase, plus a 45-degree lead.
//! - [`ht_trendline_into`]: a FIR-smoothed per-cycle average of raw prices.
//! - [`ht_trendmode_into`]: a 0/1 classification of cycle versus trend mode,
//!   combining phase velocity, sine crossings, and trendline distance.
//!
//! The period and phasor functions need 32 warm-up bars; the phase-derived
//! functions need 63 so the smoothed-price ring covers a full 50-bar cycle
//! before the first output. Unstable-period settings add to either figure.

use crate::config::{Settings, UnstableKind};
use crate::error::Result;
use crate::kernels::hilbert::{CycleState, PriceSmoother, SmoothPriceRing, TrendlineFir};
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, SeriesElement, ValidatedInput};

// Base warm-up of the cycle engine, and how much of it the price smoother
// consumes before the cascade starts seeing data.
const CYCLE_LOOKBACK: usize = 32;
const CYCLE_SMOOTHER_WARMUP: usize = 9;
const PHASE_LOOKBACK: usize = 63;
const PHASE_SMOOTHER_WARMUP: usize = 34;

/// Lookback of the dominant cycle period: 32 bars plus the unstable period.
#[inline]
#[must_use]
pub fn ht_dc_period_lookback(settings: &Settings) -> usize {
    CYCLE_LOOKBACK + settings.unstable_period(UnstableKind::HtDcPeriod)
}

/// Lookback of the phasor components: 32 bars plus the unstable period.
#[inline]
#[must_use]
pub fn ht_phasor_lookback(settings: &Settings) -> usize {
    CYCLE_LOOKBACK + settings.unstable_period(UnstableKind::HtPhasor)
}

/// Lookback of the dominant cycle phase: 63 bars plus the unstable period.
#[inline]
#[must_use]
pub fn ht_dc_phase_lookback(settings: &Settings) -> usize {
    PHASE_LOOKBACK + settings.unstable_period(UnstableKind::HtDcPhase)
}

/// Lookback of the sine wave: 63 bars plus the unstable period.
#[inline]
#[must_use]
pub fn ht_sine_lookback(settings: &Settings) -> usize {
    PHASE_LOOKBACK + settings.unstable_period(UnstableKind::HtSine)
}

/// Lookback of the instantaneous trendline: 63 bars plus the unstable
/// period.
#[inline]
#[must_use]
pub fn ht_trendline_lookback(settings: &Settings) -> usize {
    PHASE_LOOKBACK + settings.unstable_period(UnstableKind::HtTrendline)
}

/// Lookback of the trend-versus-cycle classification: 63 bars plus the
/// unstable period.
#[inline]
#[must_use]
pub fn ht_trendmode_lookback(settings: &Settings) -> usize {
    PHASE_LOOKBACK + settings.unstable_period(UnstableKind::HtTrendmode)
}

fn validate<T: SeriesElement>(data: &[T], range: IndexRange) -> Result<()> {
    data.validate_not_empty()?;
    range.check_within(data.len())
}

/// Seeds the smoother and cycle engine; `today` lands on the first bar the
/// cascade itself consumes.
fn warm_up<T: SeriesElement>(
    data: &[T],
    real_start: usize,
    lookback: usize,
    smoother_warmup: usize,
) -> Result<(PriceSmoother<T>, CycleState<T>, usize)> {
    let (mut smoother, mut today) = PriceSmoother::new(data, real_start - lookback)?;
    for _ in 0..smoother_warmup {
        smoother.update(data, data[today]);
        today += 1;
    }
    Ok((smoother, CycleState::new()?, today))
}

/// Computes the Hilbert Transform dominant cycle period into `out`.
///
/// # Errors
///
/// Returns an error if the input is empty, the range does not fit, or the
/// output buffer is too small. A range fully consumed by the lookback
/// yields `Ok(OutputRange::empty())`.
pub fn ht_dc_period_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    validate(data, range)?;
    let lookback = ht_dc_period_lookback(settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "ht_dc_period")?;

    let (mut smoother, mut state, mut today) =
        warm_up(data, real_start, lookback, CYCLE_SMOOTHER_WARMUP)?;
    let mut out_idx = 0;
    while today <= range.end {
        let smoothed = smoother.update(data, data[today]);
        state.step(smoothed, today % 2 == 0);
        if today >= real_start {
            out[out_idx] = state.smooth_period();
            out_idx += 1;
        }
        today += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Computes the Hilbert Transform phasor components into the two output
/// buffers. Both receive the same [`OutputRange`].
///
/// # Errors
///
/// Same failure conditions as [`ht_dc_period_into`].
pub fn ht_phasor_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    settings: &Settings,
    out_in_phase: &mut [T],
    out_quadrature: &mut [T],
) -> Result<OutputRange> {
    validate(data, range)?;
    let lookback = ht_phasor_lookback(settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    let out_len = range.end - real_start + 1;
    validate_output_len(out_in_phase, out_len, "ht_phasor")?;
    validate_output_len(out_quadrature, out_len, "ht_phasor")?;

    let (mut smoother, mut state, mut today) =
        warm_up(data, real_start, lookback, CYCLE_SMOOTHER_WARMUP)?;
    let mut out_idx = 0;
    while today <= range.end {
        let smoothed = smoother.update(data, data[today]);
        state.step(smoothed, today % 2 == 0);
        if today >= real_start {
            out_in_phase[out_idx] = state.in_phase();
            out_quadrature[out_idx] = state.quadrature();
            out_idx += 1;
        }
        today += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Constants of the phase extraction, converted once per call.
struct PhaseCalc<T> {
    two_pi: T,
    deg_per_rad: T,
    rad_per_deg: T,
    ninety: T,
    one_eighty: T,
    three_sixty: T,
    wrap_limit: T,
}

impl<T: SeriesElement> PhaseCalc<T> {
    fn new() -> Result<Self> {
        Ok(Self {
            two_pi: T::from_f64(2.0 * std::f64::consts::PI)?,
            deg_per_rad: T::from_f64(180.0 / std::f64::consts::PI)?,
            rad_per_deg: T::from_f64(std::f64::consts::PI / 180.0)?,
            ninety: T::from_f64(90.0)?,
            one_eighty: T::from_f64(180.0)?,
            three_sixty: T::from_f64(360.0)?,
            wrap_limit: T::from_f64(315.0)?,
        })
    }

    /// Dominant cycle span in whole bars.
    fn cycle_span(&self, smooth_period: T) -> usize {
        (smooth_period + T::half()).to_usize().unwrap_or(0)
    }

    /// Phase angle of the dominant cycle, in degrees.
    ///
    /// Correlates the smoothed-price history against one cycle of sine and
    /// cosine. When the cosine correlation vanishes the previous phase is
    /// nudged a quarter turn toward the sine correlation's sign instead of
    /// dividing by zero.
    fn update(&self, ring: &SmoothPriceRing<T>, smooth_period: T, prev_phase: T) -> Result<T> {
        let span = self.cycle_span(smooth_period);
        let mut real_part = T::zero();
        let mut imag_part = T::zero();
        if span > 0 {
            let step = self.two_pi / T::from_usize(span)?;
            let mut angle = T::zero();
            for value in ring.iter_back().take(span) {
                real_part = real_part + angle.sin() * value;
                imag_part = imag_part + angle.cos() * value;
                angle = angle + step;
            }
        }

        let mut phase = prev_phase;
        if imag_part.abs() > T::zero() {
            phase = (real_part / imag_part).atan() * self.deg_per_rad;
        } else if real_part < T::zero() {
            phase = phase - self.ninety;
        } else if real_part > T::zero() {
            phase = phase + self.ninety;
        }
        phase = phase + self.ninety;
        if !smooth_period.is_zero() {
            phase = phase + self.three_sixty / smooth_period;
        }
        if imag_part < T::zero() {
            phase = phase + self.one_eighty;
        }
        if phase > self.wrap_limit {
            phase = phase - self.three_sixty;
        }
        Ok(phase)
    }
}

/// Computes the Hilbert Transform dominant cycle phase into `out`.
///
/// # Errors
///
/// Same failure conditions as [`ht_dc_period_into`].
pub fn ht_dc_phase_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    validate(data, range)?;
    let lookback = ht_dc_phase_lookback(settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "ht_dc_phase")?;

    let (mut smoother, mut state, mut today) =
        warm_up(data, real_start, lookback, PHASE_SMOOTHER_WARMUP)?;
    let calc = PhaseCalc::new()?;
    let mut ring = SmoothPriceRing::new();
    let mut phase = T::zero();
    let mut out_idx = 0;
    while today <= range.end {
        let smoothed = smoother.update(data, data[today]);
        ring.store(smoothed);
        state.step(smoothed, today % 2 == 0);
        phase = calc.update(&ring, state.smooth_period(), phase)?;
        if today >= real_start {
            out[out_idx] = phase;
            out_idx += 1;
        }
        ring.advance();
        today += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Computes the Hilbert Transform sine wave and its 45-degree lead into the
/// two output buffers. Both receive the same [`OutputRange`].
///
/// # Errors
///
/// Same failure conditions as [`ht_dc_period_into`].
pub fn ht_sine_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    settings: &Settings,
    out_sine: &mut [T],
    out_lead_sine: &mut [T],
) -> Result<OutputRange> {
    validate(data, range)?;
    let lookback = ht_sine_lookback(settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    let out_len = range.end - real_start + 1;
    validate_output_len(out_sine, out_len, "ht_sine")?;
    validate_output_len(out_lead_sine, out_len, "ht_sine")?;

    let (mut smoother, mut state, mut today) =
        warm_up(data, real_start, lookback, PHASE_SMOOTHER_WARMUP)?;
    let calc = PhaseCalc::new()?;
    let lead = T::from_f64(45.0)?;
    let mut ring = SmoothPriceRing::new();
    let mut phase = T::zero();
    let mut out_idx = 0;
    while today <= range.end {
        let smoothed = smoother.update(data, data[today]);
        ring.store(smoothed);
        state.step(smoothed, today % 2 == 0);
        phase = calc.update(&ring, state.smooth_period(), phase)?;
        if today >= real_start {
            out_sine[out_idx] = (phase * calc.rad_per_deg).sin();
            out_lead_sine[out_idx] = ((phase + lead) * calc.rad_per_deg).sin();
            out_idx += 1;
        }
        ring.advance();
        today += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Average of the raw input over the dominant cycle span ending at `today`.
fn cycle_average<T: SeriesElement>(data: &[T], today: usize, span: usize) -> Result<T> {
    if span == 0 {
        return Ok(T::zero());
    }
    let mut sum = T::zero();
    for back in 0..span {
        if back > today {
            break;
        }
        sum = sum + data[today - back];
    }
    Ok(sum / T::from_usize(span)?)
}

/// Computes the Hilbert Transform instantaneous trendline into `out`.
///
/// # Errors
///
/// Same failure conditions as [`ht_dc_period_into`].
pub fn ht_trendline_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    validate(data, range)?;
    let lookback = ht_trendline_lookback(settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "ht_trendline")?;

    let (mut smoother, mut state, mut today) =
        warm_up(data, real_start, lookback, PHASE_SMOOTHER_WARMUP)?;
    let calc = PhaseCalc::new()?;
    let mut fir = TrendlineFir::new()?;
    let mut out_idx = 0;
    while today <= range.end {
        let smoothed = smoother.update(data, data[today]);
        state.step(smoothed, today % 2 == 0);
        let span = calc.cycle_span(state.smooth_period());
        let average = cycle_average(data, today, span)?;
        let trendline = fir.apply(average);
        if today >= real_start {
            out[out_idx] = trendline;
            out_idx += 1;
        }
        today += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}

/// Computes the Hilbert Transform trend-versus-cycle classification into
/// `out`: 1 for trend mode, 0 for cycle mode.
///
/// # Errors
///
/// Same failure conditions as [`ht_dc_period_into`].
pub fn ht_trendmode_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    settings: &Settings,
    out: &mut [i32],
) -> Result<OutputRange> {
    validate(data, range)?;
    let lookback = ht_trendmode_lookback(settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "ht_trendmode")?;

    let (mut smoother, mut state, mut today) =
        warm_up(data, real_start, lookback, PHASE_SMOOTHER_WARMUP)?;
    let calc = PhaseCalc::new()?;
    let mut fir = TrendlineFir::new()?;
    let mut ring = SmoothPriceRing::new();

    let half = T::half();
    let lead = T::from_f64(45.0)?;
    let deviation_limit = T::from_f64(0.015)?;
    let velocity_low = T::from_f64(0.67)?;
    let velocity_high = T::from_f64(1.5)?;

    let mut phase = T::zero();
    let mut sine = T::zero();
    let mut lead_sine = T::zero();
    let mut days_in_trend = T::zero();
    let mut out_idx = 0;

    while today <= range.end {
        let smoothed = smoother.update(data, data[today]);
        ring.store(smoothed);
        state.step(smoothed, today % 2 == 0);
        let smooth_period = state.smooth_period();

        let span = calc.cycle_span(smooth_period);
        let average = cycle_average(data, today, span)?;
        let trendline = fir.apply(average);

        let prev_phase = phase;
        phase = calc.update(&ring, smooth_period, phase)?;
        let prev_sine = sine;
        let prev_lead_sine = lead_sine;
        sine = (phase * calc.rad_per_deg).sin();
        lead_sine = ((phase + lead) * calc.rad_per_deg).sin();

        let mut trend = 1;

        // A sine/lead-sine crossing marks the start of a cycle swing.
        if (sine > lead_sine && prev_sine <= prev_lead_sine)
            || (sine < lead_sine && prev_sine >= prev_lead_sine)
        {
            days_in_trend = T::zero();
            trend = 0;
        }
        days_in_trend = days_in_trend + T::one();
        if days_in_trend < half * smooth_period {
            trend = 0;
        }

        // Phase advancing at roughly one cycle per period is cycle motion.
        let delta_phase = phase - prev_phase;
        if !smooth_period.is_zero() {
            let unit = calc.three_sixty / smooth_period;
            if delta_phase > velocity_low * unit && delta_phase < velocity_high * unit {
                trend = 0;
            }
        }

        // A price well off the trendline overrides the cycle evidence.
        if !trendline.is_zero() && ((smoothed - trendline) / trendline).abs() >= deviation_limit {
            trend = 1;
        }

        if today >= real_start {
            out[out_idx] = trend;
            out_idx += 1;
        }
        ring.advance();
        today += 1;
    }
    Ok(OutputRange::new(real_start, out_idx))
}
