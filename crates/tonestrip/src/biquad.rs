//! Per-channel second-order IIR filter.
//!
//! Direct Form I with the delay line kept in `f64` whatever the buffer
//! precision. Coefficients come from [`BiquadCoefficients`] and are swapped
//! at block boundaries; history survives a coefficient swap and is only
//! cleared by [`Biquad::reset`].

use tonestrip_core::Sample;

use crate::coefficients::BiquadCoefficients;

/// One channel of biquad filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Biquad {
    coefficients: BiquadCoefficients,

    // State variables (delay line)
    x1: f64, // x[n-1]
    x2: f64, // x[n-2]
    y1: f64, // y[n-1]
    y2: f64, // y[n-2]
}

impl Biquad {
    /// Create a pass-through filter with empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter with the given coefficients.
    pub fn with_coefficients(coefficients: BiquadCoefficients) -> Self {
        Self {
            coefficients,
            ..Self::default()
        }
    }

    /// Replace the coefficients. History is kept.
    #[inline]
    pub fn set_coefficients(&mut self, coefficients: BiquadCoefficients) {
        self.coefficients = coefficients;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }

    /// Reset filter state (clear delay line). Coefficients are kept.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Filter one sample.
    ///
    /// A non-finite result (NaN or infinite input) clears the delay line and
    /// yields silence, so one bad sample cannot poison later output.
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let c = &self.coefficients;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        if !output.is_finite() {
            self.reset();
            return 0.0;
        }

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Filter a channel in place.
    #[inline]
    pub fn process<S: Sample>(&mut self, samples: &mut [S]) {
        for sample in samples.iter_mut() {
            *sample = S::from_f64(self.process_sample(sample.to_f64()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::BUTTERWORTH_Q;
    use std::f64::consts::PI;

    #[test]
    fn test_identity_passes_through() {
        let mut filter = Biquad::new();
        let mut samples = [0.25f32, -0.5, 1.0, 0.0];
        filter.process(&mut samples);
        assert_eq!(samples, [0.25, -0.5, 1.0, 0.0]);
    }

    #[test]
    fn test_bounded_output_for_all_cutoffs() {
        for &fs in &[22050.0, 44100.0, 48000.0, 96000.0] {
            let mut f = 20.0;
            while f <= 20000.0 {
                let mut filter =
                    Biquad::with_coefficients(BiquadCoefficients::lowpass(f, fs, BUTTERWORTH_Q));
                let mut max_out: f64 = 0.0;
                for n in 0..10_000 {
                    // Alternating unit input exercises the response near Nyquist,
                    // a unit step near DC
                    let input = if n % 2 == 0 { 1.0 } else { -1.0 };
                    let step = filter.process_sample(input);
                    max_out = max_out.max(step.abs());
                }
                let mut filter =
                    Biquad::with_coefficients(BiquadCoefficients::lowpass(f, fs, BUTTERWORTH_Q));
                for _ in 0..10_000 {
                    max_out = max_out.max(filter.process_sample(1.0).abs());
                }
                assert!(max_out.is_finite() && max_out < 2.0, "f={} fs={} peak={}", f, fs, max_out);
                f *= 1.5;
            }
        }
    }

    #[test]
    fn test_dc_settles_to_unity() {
        let mut filter =
            Biquad::with_coefficients(BiquadCoefficients::lowpass(1000.0, 44100.0, BUTTERWORTH_Q));
        let mut out = 0.0;
        for _ in 0..4410 {
            out = filter.process_sample(1.0);
        }
        assert!((out - 1.0).abs() < 1e-6, "out={}", out);
    }

    #[test]
    fn test_attenuates_above_cutoff() {
        let fs = 44100.0;
        let mut filter =
            Biquad::with_coefficients(BiquadCoefficients::lowpass(200.0, fs, BUTTERWORTH_Q));
        let mut peak: f64 = 0.0;
        for n in 0..8820 {
            let x = (2.0 * PI * 5000.0 * n as f64 / fs).sin();
            let y = filter.process_sample(x);
            if n >= 4410 {
                peak = peak.max(y.abs());
            }
        }
        // ~ -56 dB at 25x the cutoff
        assert!(peak < 0.01, "peak={}", peak);
    }

    #[test]
    fn test_reset_clears_history_only() {
        let coefficients = BiquadCoefficients::lowpass(500.0, 48000.0, BUTTERWORTH_Q);
        let mut filter = Biquad::with_coefficients(coefficients);
        for _ in 0..64 {
            filter.process_sample(0.7);
        }
        filter.reset();
        assert_eq!(filter, Biquad::with_coefficients(coefficients));
        assert_eq!(filter.process_sample(0.0), 0.0);
    }

    #[test]
    fn test_non_finite_input_recovers() {
        let coefficients = BiquadCoefficients::lowpass(1000.0, 44100.0, BUTTERWORTH_Q);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut filter = Biquad::with_coefficients(coefficients);
            for _ in 0..32 {
                filter.process_sample(0.1);
            }
            assert_eq!(filter.process_sample(bad), 0.0);
            assert_eq!(filter, Biquad::with_coefficients(coefficients));

            let mut out = 0.0;
            for _ in 0..4410 {
                out = filter.process_sample(0.1);
                assert!(out.is_finite());
            }
            assert!((out - 0.1).abs() < 1e-6, "out={}", out);
        }
    }

    #[test]
    fn test_f32_and_f64_agree() {
        let coefficients = BiquadCoefficients::lowpass(3000.0, 48000.0, BUTTERWORTH_Q);
        let mut a = Biquad::with_coefficients(coefficients);
        let mut b = Biquad::with_coefficients(coefficients);
        let mut narrow: Vec<f32> = (0..256).map(|n| ((n as f32) * 0.1).sin()).collect();
        let mut wide: Vec<f64> = narrow.iter().map(|&s| s as f64).collect();
        a.process(&mut narrow);
        b.process(&mut wide);
        for (x, y) in narrow.iter().zip(&wide) {
            assert!((*x as f64 - y).abs() < 1e-5);
        }
    }
}
