//! Bollinger Bands.
//!
//! Middle band is the simple moving average; the upper and lower bands sit
//! a configurable number of population standard deviations above and below
//! it, both measured over the same `period`-bar window.

use crate::error::Result;
use crate::kernels::moving_average::sma_into;
use crate::kernels::variance::{stddev_into, variance_lookback};
use crate::range::{IndexRange, OutputRange};
use crate::traits::{validate_output_len, validate_period, SeriesElement};

/// Lookback of the bands: `period - 1`.
#[inline]
#[must_use]
pub const fn bollinger_lookback(period: usize) -> usize {
    variance_lookback(period)
}

/// Computes the upper, middle, and lower Bollinger Bands into the three
/// output buffers. All three receive the same [`OutputRange`].
///
/// `dev_up` and `dev_down` scale the standard deviation independently for
/// the two outer bands.
///
/// # Errors
///
/// Returns an error if the period is zero, the range does not fit the
/// input, or an output buffer is too small. A range fully consumed by the
/// lookback yields `Ok(OutputRange::empty())`.
#[allow(clippy::too_many_arguments)]
pub fn bollinger_into<T: SeriesElement>(
    data: &[T],
    range: IndexRange,
    period: usize,
    dev_up: T,
    dev_down: T,
    out_upper: &mut [T],
    out_middle: &mut [T],
    out_lower: &mut [T],
) -> Result<OutputRange> {
    validate_period(period, 1, "bollinger")?;
    range.check_within(data.len())?;

    let Some(real_start) = range.trimmed_start(bollinger_lookback(period)) else {
        return Ok(OutputRange::empty());
    };
    let out_len = range.end - real_start + 1;
    validate_output_len(out_upper, out_len, "bollinger")?;
    validate_output_len(out_middle, out_len, "bollinger")?;
    validate_output_len(out_lower, out_len, "bollinger")?;

    // Standard deviation lands in the upper buffer first and is replaced in
    // place once the middle band is known.
    stddev_into(data, range, period, out_upper)?;
    sma_into(data, range, period, out_middle)?;

    for i in 0..out_len {
        let deviation = out_upper[i];
        out_upper[i] = out_middle[i] + dev_up * deviation;
        out_lower[i] = out_middle[i] - dev_down * deviation;
    }
    Ok(OutputRange::new(real_start, out_len))
}
