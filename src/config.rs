//! Process-wide compatibility settings, threaded explicitly into each call.
//!
//! Two knobs live here, both consumed as given and read once at the start of
//! a call:
//!
//! - [`Compatibility`] selects the seeding strategy of the exponentially
//!   smoothed recurrences (EMA, RSI). Classic seeds from a plain average of
//!   the first `period` samples; Metastock seeds from the very first sample
//!   of the series.
//! - Per-indicator *unstable periods*: extra warm-up bars run before the
//!   first output of a smoothed recurrence is trusted, compensating for
//!   initialization transients.
//!
//! Rather than hiding these in global state, [`Settings`] is passed by
//! reference into every function that consumes them, keeping each call
//! independently reentrant.
//!
//! # Example
//!
//! ```
//! use ta_engine::config::{Compatibility, Settings, UnstableKind};
//!
//! let mut settings = Settings::new();
//! settings.set_compatibility(Compatibility::Metastock);
//! settings.set_unstable_period(UnstableKind::Ema, 5);
//! assert_eq!(settings.unstable_period(UnstableKind::Ema), 5);
//! assert_eq!(settings.unstable_period(UnstableKind::Rsi), 0);
//! ```

/// Seeding strategy for exponentially smoothed recurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compatibility {
    /// Seed from the simple average of the first `period` samples.
    #[default]
    Classic,
    /// Seed from the very first sample of the series (Metastock-compatible).
    Metastock,
}

/// Identifies which indicator an unstable-period setting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnstableKind {
    /// Exponential moving average.
    Ema,
    /// Relative strength index.
    Rsi,
    /// Plus directional indicator.
    PlusDi,
    /// Minus directional indicator.
    MinusDi,
    /// Directional movement index.
    Dx,
    /// Average directional index (and ADXR).
    Adx,
    /// Money flow index.
    Mfi,
    /// Hilbert Transform dominant cycle period.
    HtDcPeriod,
    /// Hilbert Transform dominant cycle phase.
    HtDcPhase,
    /// Hilbert Transform phasor components.
    HtPhasor,
    /// Hilbert Transform sine wave.
    HtSine,
    /// Hilbert Transform instantaneous trendline.
    HtTrendline,
    /// Hilbert Transform trend-versus-cycle mode.
    HtTrendmode,
}

impl UnstableKind {
    /// Number of distinct unstable-period slots.
    pub const COUNT: usize = 13;

    #[inline]
    const fn index(self) -> usize {
        match self {
            Self::Ema => 0,
            Self::Rsi => 1,
            Self::PlusDi => 2,
            Self::MinusDi => 3,
            Self::Dx => 4,
            Self::Adx => 5,
            Self::Mfi => 6,
            Self::HtDcPeriod => 7,
            Self::HtDcPhase => 8,
            Self::HtPhasor => 9,
            Self::HtSine => 10,
            Self::HtTrendline => 11,
            Self::HtTrendmode => 12,
        }
    }
}

/// Compatibility-mode and unstable-period configuration for one call.
///
/// The default is Classic seeding with every unstable period at zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    compatibility: Compatibility,
    unstable: [usize; UnstableKind::COUNT],
}

impl Settings {
    /// Creates the default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active seeding strategy.
    #[inline]
    #[must_use]
    pub const fn compatibility(&self) -> Compatibility {
        self.compatibility
    }

    /// Sets the seeding strategy.
    #[inline]
    pub fn set_compatibility(&mut self, compatibility: Compatibility) {
        self.compatibility = compatibility;
    }

    /// Extra warm-up bars configured for `kind`.
    #[inline]
    #[must_use]
    pub const fn unstable_period(&self, kind: UnstableKind) -> usize {
        self.unstable[kind.index()]
    }

    /// Sets the unstable period for one indicator.
    #[inline]
    pub fn set_unstable_period(&mut self, kind: UnstableKind, bars: usize) {
        self.unstable[kind.index()] = bars;
    }

    /// Sets the same unstable period for every indicator.
    #[inline]
    pub fn set_unstable_period_all(&mut self, bars: usize) {
        self.unstable = [bars; UnstableKind::COUNT];
    }
}
