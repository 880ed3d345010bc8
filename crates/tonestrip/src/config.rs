//! Engine configuration.
//!
//! Static settings fixed at construction. Stream settings (sample rate,
//! block size, channels) arrive later through
//! [`AudioSetup`](tonestrip_core::AudioSetup) at prepare time.
//!
//! ```
//! use tonestrip::{EngineConfig, SmoothingStyle};
//!
//! pub static CONFIG: EngineConfig = EngineConfig::new("Strip A")
//!     .with_gain_ramp(SmoothingStyle::Linear(20.0));
//! assert_eq!(CONFIG.ramp_seconds(), 0.02);
//! ```

use tonestrip_core::SmoothingStyle;

use crate::coefficients::BUTTERWORTH_Q;

/// Construction-time engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Name used in log lines.
    pub name: &'static str,

    /// Curve and duration of the gain ramp.
    pub gain_ramp: SmoothingStyle,

    /// Quality factor of the low-pass section.
    pub filter_q: f64,
}

impl EngineConfig {
    /// Default settings: 50 ms linear gain ramp, Butterworth low-pass.
    pub const DEFAULT: Self = Self::new("Tonestrip");

    /// Create a configuration with default values.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            gain_ramp: SmoothingStyle::Linear(50.0),
            filter_q: BUTTERWORTH_Q,
        }
    }

    /// Set the gain ramp curve and duration.
    ///
    /// Only a linear ramp reaches its target within the ramp time and moves
    /// by at most one fixed step per sample. [`SmoothingStyle::Exponential`]
    /// covers about 63% of the distance per time constant and
    /// [`SmoothingStyle::None`] jumps at once. The default is a 50 ms linear
    /// ramp.
    pub const fn with_gain_ramp(mut self, gain_ramp: SmoothingStyle) -> Self {
        self.gain_ramp = gain_ramp;
        self
    }

    /// Set the low-pass Q.
    pub const fn with_filter_q(mut self, filter_q: f64) -> Self {
        self.filter_q = filter_q;
        self
    }

    /// Gain ramp duration in seconds (0 without smoothing).
    pub fn ramp_seconds(&self) -> f64 {
        match self.gain_ramp {
            SmoothingStyle::None => 0.0,
            SmoothingStyle::Linear(ms) | SmoothingStyle::Exponential(ms) => ms / 1000.0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
