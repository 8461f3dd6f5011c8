//! Reusable sliding-window computation kernels.
//!
//! The composite indicators in [`crate::indicators`] are assembled from
//! these engines: rolling extrema, the moving-average family, streaming
//! variance, Wilder's directional-movement system, and the Hilbert
//! Transform cycle machinery.

pub mod directional;
pub mod extrema;
pub mod hilbert;
pub mod moving_average;
pub mod variance;
