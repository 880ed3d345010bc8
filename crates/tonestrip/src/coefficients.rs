//! Parameter → DSP coefficient conversion.
//!
//! Pure functions of sample rate and plain parameter values. The engine calls
//! them at block boundaries when a parameter is dirty, never inside the
//! sample loop.
//!
//! The low-pass is the RBJ Audio EQ Cookbook second-order low-pass. With
//! `Q = 1/√2` it is a Butterworth response: unity gain at DC and a
//! -12 dB/octave rolloff above the cutoff.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Butterworth Q for a second-order section.
pub const BUTTERWORTH_Q: f64 = FRAC_1_SQRT_2;

/// Fraction of Nyquist a cutoff is pulled down to when it reaches Nyquist.
pub const NYQUIST_MARGIN: f64 = 0.99;

/// Normalized biquad coefficients (`a0` divided out).
///
/// Transfer function:
///
/// ```text
///         b0 + b1·z⁻¹ + b2·z⁻²
/// H(z) = ──────────────────────
///         1 + a1·z⁻¹ + a2·z⁻²
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoefficients {
    /// Pass-through (`H(z) = 1`).
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Second-order low-pass at `cutoff_hz`.
    ///
    /// Cutoffs at or above Nyquist are pulled down to
    /// [`NYQUIST_MARGIN`] × Nyquist. `sample_rate` must be positive.
    pub fn lowpass(cutoff_hz: f64, sample_rate: f64, q: f64) -> Self {
        debug_assert!(sample_rate > 0.0);
        let freq = clamp_below_nyquist(cutoff_hz, sample_rate);

        let omega0 = 2.0 * PI * freq / sample_rate;
        let sin_omega = omega0.sin();
        let cos_omega = omega0.cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Magnitude response at `freq_hz`.
    pub fn magnitude(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * freq_hz / sample_rate;
        let (s1, c1) = w.sin_cos();
        let (s2, c2) = (2.0 * w).sin_cos();

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }

    /// Whether both poles lie strictly inside the unit circle.
    pub fn is_stable(&self) -> bool {
        // Stability triangle for 1 + a1·z⁻¹ + a2·z⁻²
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Pull a frequency below Nyquist.
///
/// Values at or above `sample_rate / 2` become `0.99 × sample_rate / 2`.
#[inline]
pub fn clamp_below_nyquist(freq_hz: f64, sample_rate: f64) -> f64 {
    let nyquist = sample_rate * 0.5;
    if freq_hz >= nyquist {
        NYQUIST_MARGIN * nyquist
    } else {
        freq_hz
    }
}

/// Decibels to a linear multiplier: `10^(dB/20)`.
#[inline]
pub fn db_to_gain(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}
