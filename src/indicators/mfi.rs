//! Money Flow Index.
//!
//! A volume-weighted RSI over the typical price `(high + low + close) / 3`.
//! Each bar's raw money flow is `typical * volume`, classified as positive
//! or negative by comparing the typical price with the previous bar's; bars
//! with an unchanged typical price contribute to neither side. The index is
//! `100 * positive / (positive + negative)` over the trailing `period` bars,
//! maintained with a ring buffer of per-bar flows.
//!
//! A window whose total flow falls below 1 emits 0; money flows are
//! price-volume products, so that threshold only triggers on dead markets.

use crate::config::{Settings, UnstableKind};
use crate::error::Result;
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement, ValidatedInput};

/// One bar's classified money flow.
#[derive(Debug, Clone, Copy, Default)]
struct MoneyFlow<T> {
    positive: T,
    negative: T,
}

/// Lookback of the MFI: `period` plus the configured unstable period.
#[inline]
#[must_use]
pub fn mfi_lookback(period: usize, settings: &Settings) -> usize {
    period + settings.unstable_period(UnstableKind::Mfi)
}

#[inline]
fn typical_price<T: SeriesElement>(high: T, low: T, close: T, three: T) -> T {
    (high + low + close) / three
}

/// Computes the Money Flow Index into `out`.
///
/// # Errors
///
/// Returns an error if the period is below 2, the inputs differ in length,
/// the range does not fit, or the output buffer is too small. A range fully
/// consumed by the lookback yields `Ok(OutputRange::empty())`.
#[allow(clippy::too_many_arguments)]
pub fn mfi_into<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    volume: &[T],
    range: IndexRange,
    period: usize,
    settings: &Settings,
    out: &mut [T],
) -> Result<OutputRange> {
    validate_period(period, 2, "mfi")?;
    low.validate_same_length(high.len())?;
    close.validate_same_length(high.len())?;
    volume.validate_same_length(high.len())?;
    range.check_within(high.len())?;

    let lookback = mfi_lookback(period, settings);
    let Some(real_start) = range.trimmed_start(lookback) else {
        return Ok(OutputRange::empty());
    };
    validate_output_len(out, range.end - real_start + 1, "mfi")?;

    let mut flows = vec![MoneyFlow::<T>::default(); period];
    let mut flow_idx = 0;
    let mut positive_sum = T::zero();
    let mut negative_sum = T::zero();

    let three = T::from_f64(3.0)?;
    let mut today = real_start - lookback;
    let mut prev_typical = typical_price(high[today], low[today], close[today], three);
    today += 1;

    let classify = |today: usize, flow_idx: usize, flows: &mut [MoneyFlow<T>], prev: &mut T| {
        let typical = typical_price(high[today], low[today], close[today], three);
        let diff = typical - *prev;
        *prev = typical;
        let flow = typical * volume[today];
        if diff < T::zero() {
            flows[flow_idx] = MoneyFlow {
                positive: T::zero(),
                negative: flow,
            };
            (T::zero(), flow)
        } else if diff > T::zero() {
            flows[flow_idx] = MoneyFlow {
                positive: flow,
                negative: T::zero(),
            };
            (flow, T::zero())
        } else {
            flows[flow_idx] = MoneyFlow::default();
            (T::zero(), T::zero())
        }
    };

    // Fill the window.
    for _ in 0..period {
        let (pos, neg) = classify(today, flow_idx, &mut flows, &mut prev_typical);
        positive_sum = positive_sum + pos;
        negative_sum = negative_sum + neg;
        today += 1;
        flow_idx += 1;
        if flow_idx == period {
            flow_idx = 0;
        }
    }

    let mut out_idx = 0;
    if today > real_start {
        let total = positive_sum + negative_sum;
        out[0] = if total < T::one() {
            T::zero()
        } else {
            T::hundred() * (positive_sum / total)
        };
        out_idx = 1;
    } else {
        // Burn through the unstable window: evict and refill, no output.
        while today < real_start {
            positive_sum = positive_sum - flows[flow_idx].positive;
            negative_sum = negative_sum - flows[flow_idx].negative;
            let (pos, neg) = classify(today, flow_idx, &mut flows, &mut prev_typical);
            positive_sum = positive_sum + pos;
            negative_sum = negative_sum + neg;
            today += 1;
            flow_idx += 1;
            if flow_idx == period {
                flow_idx = 0;
            }
        }
    }

    while today <= range.end {
        positive_sum = positive_sum - flows[flow_idx].positive;
        negative_sum = negative_sum - flows[flow_idx].negative;
        let (pos, neg) = classify(today, flow_idx, &mut flows, &mut prev_typical);
        positive_sum = positive_sum + pos;
        negative_sum = negative_sum + neg;
        today += 1;
        let total = positive_sum + negative_sum;
        out[out_idx] = if total < T::one() {
            T::zero()
        } else {
            T::hundred() * (positive_sum / total)
        };
        out_idx += 1;
        flow_idx += 1;
        if flow_idx == period {
            flow_idx = 0;
        }
    }
    Ok(OutputRange::new(real_start, out_idx))
}
