//! Composite indicators assembled from the sliding-window kernels.

pub mod adx;
pub mod bollinger;
pub mod ht;
pub mod macd;
pub mod mfi;
pub mod price_oscillator;
pub mod rsi;
pub mod stochastic;
pub mod stochrsi;
