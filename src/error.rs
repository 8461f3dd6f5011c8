//! Error types for the engine.
//!
//! Every fallible entry point in this crate returns [`Result`], and every
//! failure is reported *before* any output slot is written. A valid call
//! whose computable range is empty after lookback trimming is not an error;
//! it returns an empty [`crate::range::OutputRange`] instead.

use thiserror::Error;

/// The main error type for engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input data series is empty.
    #[error("empty input: no data provided")]
    EmptyInput,

    /// The period parameter is invalid for the requested operation.
    #[error("invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The invalid period value that was provided.
        period: usize,
        /// Description of why the period is invalid.
        reason: &'static str,
    },

    /// The requested index range is not a valid window into the input.
    ///
    /// Returned when the resolved `start`/`end` pair violates
    /// `0 <= start <= end < len`.
    #[error("invalid range [{start}, {end}] for series of length {len}")]
    InvalidRange {
        /// Requested start position (possibly relative-to-end, i.e. negative).
        start: isize,
        /// Requested end position (possibly relative-to-end, i.e. negative).
        end: isize,
        /// The series length the range was resolved against.
        len: usize,
    },

    /// Two input series that must be the same length are not.
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Length of the first series.
        expected: usize,
        /// Length of the offending series.
        actual: usize,
    },

    /// A caller-provided output buffer cannot hold the worst-case output.
    #[error("{indicator}: output buffer too small, required {required} slots, got {actual}")]
    BufferTooSmall {
        /// Name of the operation that rejected the buffer.
        indicator: &'static str,
        /// The number of output slots required.
        required: usize,
        /// The number of output slots provided.
        actual: usize,
    },

    /// Failed to convert a numeric value to the series element type.
    ///
    /// This occurs when `NumCast::from()` cannot represent a value (e.g. a
    /// `usize` period) in the generic float type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },
}

/// Convenience type alias for Results using the engine Error type.
pub type Result<T> = std::result::Result<T, Error>;
