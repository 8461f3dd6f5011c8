//! Hilbert Transform cycle measurement primitives.
//!
//! The cycle engine estimates the dominant cycle period of a series by
//! running a detrender and three phase-shift stages through a shared
//! fixed-coefficient Hilbert filter, combining the stage outputs into an
//! in-phase/quadrature pair, and feeding that pair through a homodyne
//! discriminator. Even- and odd-numbered bars use separate coefficient
//! banks, so the filter keeps two interleaved delay lines per stage.
//!
//! Building blocks, composed by the `ht_*` indicator functions:
//!
//! - [`HilbertFilter`]: the four-stage delay-line bank.
//! - [`PriceSmoother`]: the 4-bar weighted moving average that conditions
//!   raw input before it enters the filter.
//! - [`CycleState`]: one full bar of the cascade plus the homodyne period
//!   recurrence; exposes the instantaneous period, the smoothed period, and
//!   the phasor components.
//! - [`SmoothPriceRing`]: a 50-slot history of smoothed prices for the
//!   dominant-cycle-phase correlation.
//! - [`TrendlineFir`]: the 4/3/2/1 FIR applied to the per-cycle average for
//!   the instantaneous trendline.
//!
//! The period recurrence clamps each raw estimate to [2/3, 3/2] of the
//! previous period before the absolute [6, 50] bar clamp, then blends it
//! 20/80 with the previous value. The period starts at zero; the caller's
//! warm-up (part of each indicator's lookback) runs the recurrence until
//! it stabilizes.

use crate::error::Result;
use crate::traits::SeriesElement;

/// Slots in the smoothed-price history ring.
pub const SMOOTH_PRICE_LEN: usize = 50;

const SLOTS: usize = 11;
const ODD0: usize = 0;
const EVEN0: usize = 3;
const PREV_ODD: usize = 6;
const PREV_EVEN: usize = 7;
const PREV_INPUT_ODD: usize = 8;
const PREV_INPUT_EVEN: usize = 9;
const CURRENT: usize = 10;

/// The four cascade stages sharing the [`HilbertFilter`] delay lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HilbertStage {
    /// Removes the local trend from the smoothed price.
    Detrender,
    /// Quadrature component, one stage behind the detrender.
    Quadrature,
    /// In-phase component advanced 90 degrees.
    JIn,
    /// Quadrature component advanced 90 degrees.
    JQuad,
}

impl HilbertStage {
    #[inline]
    fn base(self) -> usize {
        (self as usize) * SLOTS
    }
}

/// Delay-line bank for the four Hilbert stages.
///
/// Each stage owns eleven slots: three-deep even and odd tap histories,
/// previous outputs and previous inputs per parity, and the current output.
/// The three-deep taps rotate through a shared index that the caller
/// advances once per even bar.
#[derive(Debug, Clone)]
pub struct HilbertFilter<T> {
    buf: [T; 4 * SLOTS],
}

impl<T: SeriesElement> Default for HilbertFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesElement> HilbertFilter<T> {
    /// Creates a filter with all delay lines at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: [T::zero(); 4 * SLOTS],
        }
    }

    /// Runs `stage` on an even bar.
    ///
    /// `idx` is the shared tap index in `0..3`; `scale` is the
    /// period-adjusted output gain for this bar.
    #[inline]
    pub fn even(&mut self, stage: HilbertStage, input: T, idx: usize, a: T, b: T, scale: T) -> T {
        let base = stage.base();
        let temp = a * input;
        let mut out = -self.buf[base + EVEN0 + idx];
        self.buf[base + EVEN0 + idx] = temp;
        out = out + temp;
        out = out - self.buf[base + PREV_EVEN];
        self.buf[base + PREV_EVEN] = b * self.buf[base + PREV_INPUT_EVEN];
        out = out + self.buf[base + PREV_EVEN];
        self.buf[base + PREV_INPUT_EVEN] = input;
        out = out * scale;
        self.buf[base + CURRENT] = out;
        out
    }

    /// Runs `stage` on an odd bar.
    #[inline]
    pub fn odd(&mut self, stage: HilbertStage, input: T, idx: usize, a: T, b: T, scale: T) -> T {
        let base = stage.base();
        let temp = a * input;
        let mut out = -self.buf[base + ODD0 + idx];
        self.buf[base + ODD0 + idx] = temp;
        out = out + temp;
        out = out - self.buf[base + PREV_ODD];
        self.buf[base + PREV_ODD] = b * self.buf[base + PREV_INPUT_ODD];
        out = out + self.buf[base + PREV_ODD];
        self.buf[base + PREV_INPUT_ODD] = input;
        out = out * scale;
        self.buf[base + CURRENT] = out;
        out
    }

    /// The most recent output of `stage`.
    #[inline]
    #[must_use]
    pub fn current(&self, stage: HilbertStage) -> T {
        self.buf[stage.base() + CURRENT]
    }
}

/// Incremental 4-bar weighted moving average (weights 4/3/2/1).
///
/// Conditions raw prices before the Hilbert cascade. Seeding consumes three
/// bars; every [`PriceSmoother::update`] after that emits one smoothed
/// value and expires the bar four steps back.
#[derive(Debug, Clone)]
pub struct PriceSmoother<T> {
    sub: T,
    sum: T,
    trailing_value: T,
    trailing_idx: usize,
    four: T,
    tenth: T,
}

impl<T: SeriesElement> PriceSmoother<T> {
    /// Seeds the smoother from `data[start..start + 3]` and returns it with
    /// the index of the next bar to consume.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the weights are not
    /// representable in `T`.
    pub fn new(data: &[T], start: usize) -> Result<(Self, usize)> {
        let three = T::from_f64(3.0)?;
        let first = data[start];
        let second = data[start + 1];
        let third = data[start + 2];
        let smoother = Self {
            sub: first + second + third,
            sum: first + T::two() * second + three * third,
            trailing_value: T::zero(),
            trailing_idx: start,
            four: T::from_f64(4.0)?,
            tenth: T::from_f64(0.1)?,
        };
        Ok((smoother, start + 3))
    }

    /// Consumes the next bar's value and returns the smoothed price.
    #[inline]
    pub fn update(&mut self, data: &[T], value: T) -> T {
        self.sub = self.sub + value - self.trailing_value;
        self.sum = self.sum + self.four * value;
        self.trailing_value = data[self.trailing_idx];
        self.trailing_idx += 1;
        let smoothed = self.sum * self.tenth;
        self.sum = self.sum - self.sub;
        smoothed
    }
}

/// Constants of the cycle recurrence, converted once per state.
#[derive(Debug, Clone, Copy)]
struct CycleConsts<T> {
    a: T,
    b: T,
    adjust_mul: T,
    adjust_add: T,
    blend_new: T,
    blend_old: T,
    smooth_new: T,
    smooth_old: T,
    clamp_up: T,
    clamp_down: T,
    min_period: T,
    max_period: T,
    full_circle: T,
    rad_to_deg: T,
}

impl<T: SeriesElement> CycleConsts<T> {
    fn new() -> Result<Self> {
        Ok(Self {
            a: T::from_f64(0.0962)?,
            b: T::from_f64(0.5769)?,
            adjust_mul: T::from_f64(0.075)?,
            adjust_add: T::from_f64(0.54)?,
            blend_new: T::from_f64(0.2)?,
            blend_old: T::from_f64(0.8)?,
            smooth_new: T::from_f64(0.33)?,
            smooth_old: T::from_f64(0.67)?,
            clamp_up: T::from_f64(1.5)?,
            clamp_down: T::from_f64(0.67)?,
            min_period: T::from_f64(6.0)?,
            max_period: T::from_f64(50.0)?,
            full_circle: T::from_f64(360.0)?,
            rad_to_deg: T::from_f64(180.0 / std::f64::consts::PI)?,
        })
    }
}

/// Full per-bar state of the cycle engine.
///
/// Call [`CycleState::step`] once per bar with the smoothed price and the
/// bar's parity, then read the getters.
#[derive(Debug, Clone)]
pub struct CycleState<T> {
    consts: CycleConsts<T>,
    filter: HilbertFilter<T>,
    hilbert_idx: usize,
    period: T,
    smooth_period: T,
    i1_odd_prev2: T,
    i1_odd_prev3: T,
    i1_even_prev2: T,
    i1_even_prev3: T,
    prev_i2: T,
    prev_q2: T,
    re: T,
    im: T,
    q1: T,
    i1: T,
}

impl<T: SeriesElement> CycleState<T> {
    /// Creates a zeroed cycle state.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the recurrence constants are
    /// not representable in `T`.
    pub fn new() -> Result<Self> {
        Ok(Self {
            consts: CycleConsts::new()?,
            filter: HilbertFilter::new(),
            hilbert_idx: 0,
            period: T::zero(),
            smooth_period: T::zero(),
            i1_odd_prev2: T::zero(),
            i1_odd_prev3: T::zero(),
            i1_even_prev2: T::zero(),
            i1_even_prev3: T::zero(),
            prev_i2: T::zero(),
            prev_q2: T::zero(),
            re: T::zero(),
            im: T::zero(),
            q1: T::zero(),
            i1: T::zero(),
        })
    }

    /// Advances the engine by one bar.
    ///
    /// `even` is the parity of the bar's input index; the two parities use
    /// independent filter delay lines, and the shared tap index rotates on
    /// even bars only.
    pub fn step(&mut self, smoothed: T, even: bool) {
        let c = self.consts;
        let scale = c.adjust_mul * self.period + c.adjust_add;

        let (q2, i2) = if even {
            let detrender =
                self.filter
                    .even(HilbertStage::Detrender, smoothed, self.hilbert_idx, c.a, c.b, scale);
            let q1 =
                self.filter
                    .even(HilbertStage::Quadrature, detrender, self.hilbert_idx, c.a, c.b, scale);
            let i1 = self.i1_even_prev3;
            let ji = self.filter
                .even(HilbertStage::JIn, i1, self.hilbert_idx, c.a, c.b, scale);
            let jq = self.filter
                .even(HilbertStage::JQuad, q1, self.hilbert_idx, c.a, c.b, scale);
            self.hilbert_idx += 1;
            if self.hilbert_idx == 3 {
                self.hilbert_idx = 0;
            }
            let q2 = c.blend_new * (q1 + ji) + c.blend_old * self.prev_q2;
            let i2 = c.blend_new * (i1 - jq) + c.blend_old * self.prev_i2;
            self.i1_odd_prev3 = self.i1_odd_prev2;
            self.i1_odd_prev2 = detrender;
            self.q1 = q1;
            self.i1 = i1;
            (q2, i2)
        } else {
            let detrender =
                self.filter
                    .odd(HilbertStage::Detrender, smoothed, self.hilbert_idx, c.a, c.b, scale);
            let q1 =
                self.filter
                    .odd(HilbertStage::Quadrature, detrender, self.hilbert_idx, c.a, c.b, scale);
            let i1 = self.i1_odd_prev3;
            let ji = self.filter
                .odd(HilbertStage::JIn, i1, self.hilbert_idx, c.a, c.b, scale);
            let jq = self.filter
                .odd(HilbertStage::JQuad, q1, self.hilbert_idx, c.a, c.b, scale);
            let q2 = c.blend_new * (q1 + ji) + c.blend_old * self.prev_q2;
            let i2 = c.blend_new * (i1 - jq) + c.blend_old * self.prev_i2;
            self.i1_even_prev3 = self.i1_even_prev2;
            self.i1_even_prev2 = detrender;
            self.q1 = q1;
            self.i1 = i1;
            (q2, i2)
        };

        // Homodyne discriminator: correlate the phasor with itself one bar
        // back, then turn the resulting angle into a period estimate.
        self.re = c.blend_new * (i2 * self.prev_i2 + q2 * self.prev_q2) + c.blend_old * self.re;
        self.im = c.blend_new * (i2 * self.prev_q2 - q2 * self.prev_i2) + c.blend_old * self.im;
        self.prev_q2 = q2;
        self.prev_i2 = i2;

        let old_period = self.period;
        if !self.im.is_zero() && !self.re.is_zero() {
            self.period = c.full_circle / ((self.im / self.re).atan() * c.rad_to_deg);
        }
        let upper = c.clamp_up * old_period;
        if self.period > upper {
            self.period = upper;
        }
        let lower = c.clamp_down * old_period;
        if self.period < lower {
            self.period = lower;
        }
        if self.period < c.min_period {
            self.period = c.min_period;
        } else if self.period > c.max_period {
            self.period = c.max_period;
        }
        self.period = c.blend_new * self.period + c.blend_old * old_period;
        self.smooth_period = c.smooth_new * self.period + c.smooth_old * self.smooth_period;
    }

    /// The instantaneous period estimate, in bars.
    #[inline]
    #[must_use]
    pub fn period(&self) -> T {
        self.period
    }

    /// The smoothed dominant cycle period, in bars.
    #[inline]
    #[must_use]
    pub fn smooth_period(&self) -> T {
        self.smooth_period
    }

    /// In-phase phasor component of the last bar.
    #[inline]
    #[must_use]
    pub fn in_phase(&self) -> T {
        self.i1
    }

    /// Quadrature phasor component of the last bar.
    #[inline]
    #[must_use]
    pub fn quadrature(&self) -> T {
        self.q1
    }
}

/// Ring buffer of the last 50 smoothed prices.
#[derive(Debug, Clone)]
pub struct SmoothPriceRing<T> {
    values: [T; SMOOTH_PRICE_LEN],
    idx: usize,
}

impl<T: SeriesElement> Default for SmoothPriceRing<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesElement> SmoothPriceRing<T> {
    /// Creates a zero-filled ring.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: [T::zero(); SMOOTH_PRICE_LEN],
            idx: 0,
        }
    }

    /// Stores this bar's smoothed price at the current slot.
    #[inline]
    pub fn store(&mut self, value: T) {
        self.values[self.idx] = value;
    }

    /// Moves the current slot forward; call once per bar, after any reads.
    #[inline]
    pub fn advance(&mut self) {
        self.idx += 1;
        if self.idx == SMOOTH_PRICE_LEN {
            self.idx = 0;
        }
    }

    /// Walks backward from the current slot, newest first, wrapping.
    ///
    /// The iterator is endless; take as many values as the dominant cycle
    /// span requires.
    pub fn iter_back(&self) -> impl Iterator<Item = T> + '_ {
        let mut idx = self.idx;
        std::iter::from_fn(move || {
            let value = self.values[idx];
            idx = if idx == 0 { SMOOTH_PRICE_LEN - 1 } else { idx - 1 };
            Some(value)
        })
    }
}

/// Three-deep delay line for the instantaneous trendline's 4/3/2/1 FIR.
#[derive(Debug, Clone)]
pub struct TrendlineFir<T> {
    prev1: T,
    prev2: T,
    prev3: T,
    weights: [T; 3],
    tenth: T,
}

impl<T: SeriesElement> TrendlineFir<T> {
    /// Creates a zeroed delay line.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the FIR weights are not
    /// representable in `T`.
    pub fn new() -> Result<Self> {
        Ok(Self {
            prev1: T::zero(),
            prev2: T::zero(),
            prev3: T::zero(),
            weights: [
                T::from_f64(4.0)?,
                T::from_f64(3.0)?,
                T::from_f64(2.0)?,
            ],
            tenth: T::from_f64(0.1)?,
        })
    }

    /// Filters the per-cycle average and shifts the delay line.
    #[inline]
    pub fn apply(&mut self, average: T) -> T {
        let out = (self.weights[0] * average
            + self.weights[1] * self.prev1
            + self.weights[2] * self.prev2
            + self.prev3)
            * self.tenth;
        self.prev3 = self.prev2;
        self.prev2 = self.prev1;
        self.prev1 = average;
        out
    }
}
