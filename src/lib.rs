//! ta-engine: sliding-window technical analysis computation engine
//!
//! This crate computes technical indicators over arbitrary sub-ranges of
//! time series, writing compacted results into caller-provided buffers.
//!
//! # Features
//!
//! - **Range-based API**: every function takes an inclusive [`range::IndexRange`]
//!   and reports which input bars its output covers via [`range::OutputRange`]
//! - **Compacted output**: results start at index 0 of the output buffer,
//!   with no NaN warm-up prefix; the lookback is trimmed off the front of
//!   the requested range instead
//! - **Generics**: works with both `f32` and `f64` data types
//! - **Explicit configuration**: seeding compatibility and per-indicator
//!   unstable periods travel in a [`config::Settings`] value, never in
//!   global state
//!
//! # Quick Start
//!
//! ```
//! use ta_engine::prelude::*;
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let range = resolve_range(RangeSpec::full(), &[data.len()]).unwrap();
//! let mut out = vec![0.0; data.len()];
//!
//! let written = sma_into(&data, range, 3, &mut out).unwrap();
//! // First output bar is index 2 of the input; out[0] holds its value.
//! assert_eq!((written.first, written.len), (2, 3));
//! assert!((out[0] - 2.0).abs() < 1e-10);
//! ```
//!
//! # Available Indicators
//!
//! ## Kernels
//! - [`kernels::moving_average`]: SMA, WMA, EMA (classic and Metastock
//!   seeding), and the [`kernels::moving_average::MaKind`] dispatcher
//! - [`kernels::extrema`]: rolling max/min values and indices
//! - [`kernels::variance`]: rolling variance and standard deviation
//! - [`kernels::directional`]: true range, `+DI`, `-DI`, `DX`
//! - [`kernels::hilbert`]: the Hilbert Transform cycle engine
//!
//! ## Composites
//! - [`indicators::macd`], [`indicators::price_oscillator`]: moving-average
//!   difference oscillators
//! - [`indicators::rsi`], [`indicators::mfi`]: Wilder-smoothed gain/loss
//!   ratios
//! - [`indicators::adx`]: ADX and ADXR over the directional engine
//! - [`indicators::stochastic`], [`indicators::stochrsi`]: range-position
//!   oscillators
//! - [`indicators::bollinger`]: Bollinger Bands
//! - [`indicators::ht`]: dominant cycle period/phase, phasor, sine wave,
//!   trendline, and trend-mode classification
//!
//! # Error Handling
//!
//! All engine functions return [`Result<T, Error>`]. A requested range that
//! the lookback consumes entirely is not an error: it yields an empty
//! [`range::OutputRange`] with nothing written.
//!
//! ```
//! use ta_engine::prelude::*;
//!
//! let data = vec![1.0_f64, 2.0];
//! let range = resolve_range(RangeSpec::full(), &[data.len()]).unwrap();
//! let mut out = vec![0.0; 2];
//!
//! // Period longer than the data: valid call, empty result.
//! let written = sma_into(&data, range, 10, &mut out).unwrap();
//! assert!(written.is_empty());
//!
//! // An inverted range is an error before any computation starts.
//! assert!(resolve_range(RangeSpec::new(5, 3), &[data.len()]).is_err());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod indicators;
pub mod kernels;
pub mod prelude;
pub mod range;
pub mod traits;
pub mod utils;

// Re-export commonly used types at crate root
pub use config::{Compatibility, Settings, UnstableKind};
pub use error::{Error, Result};
pub use range::{resolve_range, IndexRange, OutputRange, RangeSpec};
pub use traits::{SeriesElement, ValidatedInput};
pub use utils::{approx_eq, approx_eq_relative, EPSILON, LOOSE_EPSILON};
