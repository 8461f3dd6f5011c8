//! Commonly used types, traits, and functions for convenient importing.
//!
//! # Usage
//!
//! ```
//! use ta_engine::prelude::*;
//!
//! let prices = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//! let range = resolve_range(RangeSpec::full(), &[prices.len()]).unwrap();
//! let mut out = vec![0.0; prices.len()];
//!
//! let written = ema_into(&prices, range, 3, &Settings::new(), &mut out).unwrap();
//! assert_eq!(written.first, 2);
//! ```
//!
//! # Contents
//!
//! - Error handling: [`Error`], [`Result`]
//! - Range plumbing: [`RangeSpec`], [`IndexRange`], [`OutputRange`],
//!   [`resolve_range`]
//! - Configuration: [`Settings`], [`Compatibility`], [`UnstableKind`]
//! - Traits: [`SeriesElement`], [`ValidatedInput`]
//! - Every engine `_into` function and its `_lookback` companion

// Error types
pub use crate::error::{Error, Result};

// Range plumbing
pub use crate::range::{resolve_range, IndexRange, OutputRange, RangeSpec};

// Configuration
pub use crate::config::{Compatibility, Settings, UnstableKind};

// Traits
pub use crate::traits::{SeriesElement, ValidatedInput};

// Kernels
pub use crate::kernels::directional::{
    dx_into, dx_lookback, minus_di_into, minus_di_lookback, plus_di_into, plus_di_lookback,
    true_range, true_range_into, true_range_lookback,
};
pub use crate::kernels::extrema::{
    max_index_into, min_index_into, rolling_extrema_lookback, rolling_max_into, rolling_min_into,
};
pub use crate::kernels::moving_average::{
    ema_into, ema_lookback, ema_with_k_into, ma_into, ma_lookback, sma_into, sma_lookback,
    wma_into, wma_lookback, MaKind,
};
pub use crate::kernels::variance::{
    stddev_into, variance_into, variance_lookback,
};

// Composite indicators
pub use crate::indicators::adx::{adx_into, adx_lookback, adxr_into, adxr_lookback};
pub use crate::indicators::bollinger::{bollinger_into, bollinger_lookback};
pub use crate::indicators::ht::{
    ht_dc_period_into, ht_dc_period_lookback, ht_dc_phase_into, ht_dc_phase_lookback,
    ht_phasor_into, ht_phasor_lookback, ht_sine_into, ht_sine_lookback, ht_trendline_into,
    ht_trendline_lookback, ht_trendmode_into, ht_trendmode_lookback,
};
pub use crate::indicators::macd::{macd_into, macd_lookback};
pub use crate::indicators::mfi::{mfi_into, mfi_lookback};
pub use crate::indicators::price_oscillator::{
    apo_into, ppo_into, price_oscillator_lookback,
};
pub use crate::indicators::rsi::{rsi_into, rsi_lookback};
pub use crate::indicators::stochastic::{
    stoch_fast_into, stoch_fast_lookback, stoch_into, stoch_lookback,
};
pub use crate::indicators::stochrsi::{stochrsi_into, stochrsi_lookback};
