//! Core traits for generic numeric operations on data series.
//!
//! The primary trait is [`SeriesElement`], a common interface for numeric
//! operations on time-series data that abstracts over `f32` and `f64`.
//! Validation helpers are provided through [`ValidatedInput`] and standalone
//! functions.
//!
//! # Example
//!
//! ```
//! use ta_engine::traits::{SeriesElement, validate_period};
//!
//! fn mean<T: SeriesElement>(data: &[T]) -> ta_engine::error::Result<T> {
//!     let n = T::from_usize(data.len())?;
//!     let sum = data.iter().fold(T::zero(), |acc, &x| acc + x);
//!     Ok(sum / n)
//! }
//!
//! let data = vec![1.0_f64, 2.0, 3.0];
//! assert!((mean(&data).unwrap() - 2.0).abs() < 1e-10);
//! assert!(validate_period(3, 1, "mean").is_ok());
//! ```

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A trait for types that can be used as elements in a data series.
///
/// Extends `num_traits::Float` with conversions and constants that the
/// recurrence kernels need. Blanket-implemented for `f32` and `f64`.
pub trait SeriesElement: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Creates a series element from a `usize` value.
    ///
    /// Commonly used for converting period parameters to the element type.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates a series element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Returns the constant 2 as this type.
    ///
    /// Used in the EMA smoothing constant `k = 2 / (period + 1)`.
    #[inline]
    #[must_use]
    fn two() -> Self {
        // Safe unwrap: 2 is always representable in Float types
        <Self as NumCast>::from(2).unwrap()
    }

    /// Returns the constant 100 as this type.
    ///
    /// Used for percentage-scaled outputs (DI, DX, RSI, MFI, Stochastic).
    #[inline]
    #[must_use]
    fn hundred() -> Self {
        // Safe unwrap: 100 is always representable in Float types
        <Self as NumCast>::from(100).unwrap()
    }

    /// Returns the constant 1/2 as this type.
    #[inline]
    #[must_use]
    fn half() -> Self {
        // Safe unwrap: 0.5 is always representable in Float types
        <Self as NumCast>::from(0.5).unwrap()
    }
}

// Blanket implementation for all types that satisfy the bounds
impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> SeriesElement for T {}

/// Trait for validating input series before a computation starts.
pub trait ValidatedInput {
    /// The element type of the series.
    type Element: SeriesElement;

    /// Returns the length of the series.
    fn len(&self) -> usize;

    /// Returns true if the series is empty.
    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates that the series is not empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` if the series is empty.
    #[inline]
    fn validate_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyInput)
        } else {
            Ok(())
        }
    }

    /// Validates that the series is exactly `expected` elements long.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` otherwise.
    #[inline]
    fn validate_same_length(&self, expected: usize) -> Result<()> {
        if self.len() == expected {
            Ok(())
        } else {
            Err(Error::LengthMismatch {
                expected,
                actual: self.len(),
            })
        }
    }
}

impl<T: SeriesElement> ValidatedInput for [T] {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }
}

impl<T: SeriesElement> ValidatedInput for Vec<T> {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }
}

/// Validates that a period is at least `min` bars.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` when the period is below the minimum the
/// recurrence requires (1 for plain windows, 2 for the smoothed ones).
#[inline]
pub fn validate_period(period: usize, min: usize, _indicator: &'static str) -> Result<()> {
    if period < min {
        Err(Error::InvalidPeriod {
            period,
            reason: if min <= 1 {
                "period must be at least 1"
            } else {
                "period must be at least 2"
            },
        })
    } else {
        Ok(())
    }
}

/// Validates that a caller-provided output buffer can hold `required` slots.
///
/// # Errors
///
/// Returns `Error::BufferTooSmall` otherwise.
#[inline]
pub fn validate_output_len<T>(
    out: &[T],
    required: usize,
    indicator: &'static str,
) -> Result<()> {
    if out.len() < required {
        Err(Error::BufferTooSmall {
            indicator,
            required,
            actual: out.len(),
        })
    } else {
        Ok(())
    }
}
