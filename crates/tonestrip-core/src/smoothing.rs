//! Value smoothing for click-free control changes.
//!
//! [`Smoother`] ramps a value toward a target one sample at a time.
//! [`SmoothingStyle`] selects the curve and its duration.
//!
//! ```
//! use tonestrip_core::{Smoother, SmoothingStyle};
//!
//! let mut smoother = Smoother::new(SmoothingStyle::Linear(50.0));
//! smoother.set_sample_rate(1000.0);
//! smoother.reset(1.0);
//! smoother.set_target(2.0);
//! for _ in 0..50 {
//!     smoother.next();
//! }
//! assert_eq!(smoother.current(), 2.0);
//! ```
//!
//! # Thread Safety
//!
//! `Smoother` requires `&mut self` to advance and lives on the audio thread.
//! Targets arrive from the control context through atomic parameters and are
//! applied at block boundaries.

/// Threshold for snapping an exponential ramp onto its target.
const SNAP_THRESHOLD: f64 = 1e-8;

/// Smoothing algorithm selection.
///
/// The `f64` parameter is the smoothing time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SmoothingStyle {
    /// No smoothing - value changes instantly.
    #[default]
    None,

    /// Linear interpolation that lands exactly on the target after the
    /// given time. Never overshoots.
    Linear(f64),

    /// One-pole exponential smoothing with the given time constant.
    /// Reaches ~63% of the distance per time constant and snaps onto the
    /// target once within 1e-8.
    Exponential(f64),
}

impl SmoothingStyle {
    /// Same curve with a different duration.
    pub fn with_time(self, ms: f64) -> Self {
        match self {
            SmoothingStyle::None => SmoothingStyle::None,
            SmoothingStyle::Linear(_) => SmoothingStyle::Linear(ms),
            SmoothingStyle::Exponential(_) => SmoothingStyle::Exponential(ms),
        }
    }
}

/// A value smoother.
///
/// State is `{current, target, step size, samples remaining}`; the linear
/// step is recomputed from the current value whenever the target moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Smoother {
    style: SmoothingStyle,
    sample_rate: f64,

    current: f64,
    target: f64,

    coefficient: f64,     // For exponential: pole coefficient
    step_size: f64,       // For linear: increment per sample
    steps_remaining: u32, // For linear: samples until target reached
}

impl Smoother {
    /// Create a new smoother with the given style.
    ///
    /// Sample rate must be set before use via [`set_sample_rate()`](Self::set_sample_rate).
    pub fn new(style: SmoothingStyle) -> Self {
        Self {
            style,
            sample_rate: 0.0,
            current: 0.0,
            target: 0.0,
            coefficient: 0.0,
            step_size: 0.0,
            steps_remaining: 0,
        }
    }

    /// Get the smoothing style.
    pub fn style(&self) -> SmoothingStyle {
        self.style
    }

    /// Change the style (and duration). Any ramp in progress is finished.
    pub fn set_style(&mut self, style: SmoothingStyle) {
        self.style = style;
        self.reset(self.target);
        self.recompute_coefficients();
    }

    /// Set the sample rate and recompute time-dependent coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.recompute_coefficients();
    }

    /// Number of samples a linear ramp takes at the current sample rate.
    pub fn ramp_samples(&self) -> u32 {
        match self.style {
            SmoothingStyle::Linear(ms) => ((ms * self.sample_rate / 1000.0) as u32).max(1),
            _ => 0,
        }
    }

    /// Set a new target value.
    ///
    /// Call at a block boundary. A linear ramp restarts from the current
    /// value and takes the full ramp time.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() < 1e-12 {
            return;
        }
        self.target = target;

        match self.style {
            SmoothingStyle::None => {
                self.current = target;
            }
            SmoothingStyle::Linear(_) => {
                self.steps_remaining = self.ramp_samples();
                self.step_size = (target - self.current) / self.steps_remaining as f64;
            }
            SmoothingStyle::Exponential(_) => {}
        }
    }

    /// Snap immediately to a value (no ramp).
    pub fn reset(&mut self, value: f64) {
        self.current = value;
        self.target = value;
        self.steps_remaining = 0;
        self.step_size = 0.0;
    }

    /// Advance one sample and return the smoothed value.
    #[inline]
    pub fn next(&mut self) -> f64 {
        match self.style {
            SmoothingStyle::None => self.target,
            SmoothingStyle::Linear(_) => {
                if self.steps_remaining > 0 {
                    self.steps_remaining -= 1;
                    self.current = if self.steps_remaining == 0 {
                        self.target
                    } else if self.step_size > 0.0 {
                        (self.current + self.step_size).min(self.target)
                    } else {
                        (self.current + self.step_size).max(self.target)
                    };
                }
                self.current
            }
            SmoothingStyle::Exponential(_) => {
                self.current += self.coefficient * (self.target - self.current);
                if (self.current - self.target).abs() < SNAP_THRESHOLD {
                    self.current = self.target;
                }
                self.current
            }
        }
    }

    /// Get the current value without advancing.
    #[inline]
    pub fn current(&self) -> f64 {
        match self.style {
            SmoothingStyle::None => self.target,
            _ => self.current,
        }
    }

    /// Get the target value.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Per-sample increment of the running linear ramp (0 when idle).
    #[inline]
    pub fn step_size(&self) -> f64 {
        if self.steps_remaining > 0 {
            self.step_size
        } else {
            0.0
        }
    }

    /// Returns true if still moving toward the target.
    #[inline]
    pub fn is_smoothing(&self) -> bool {
        match self.style {
            SmoothingStyle::None => false,
            SmoothingStyle::Linear(_) => self.steps_remaining > 0,
            SmoothingStyle::Exponential(_) => self.current != self.target,
        }
    }

    fn recompute_coefficients(&mut self) {
        if self.sample_rate <= 0.0 {
            return;
        }

        if let SmoothingStyle::Exponential(ms) = self.style {
            // coef = 1 - e^(-1 / (tau * sr))
            let samples_per_tau = ms / 1000.0 * self.sample_rate;
            self.coefficient = if samples_per_tau > 0.0 {
                1.0 - (-1.0 / samples_per_tau).exp()
            } else {
                1.0
            };
        }
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(SmoothingStyle::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_smoothing() {
        let mut s = Smoother::new(SmoothingStyle::None);
        s.set_sample_rate(44100.0);
        s.reset(0.0);
        s.set_target(1.0);
        assert_eq!(s.next(), 1.0);
        assert!(!s.is_smoothing());
    }

    #[test]
    fn test_linear_reaches_target_in_ramp_time() {
        let mut s = Smoother::new(SmoothingStyle::Linear(50.0));
        s.set_sample_rate(44100.0);
        s.reset(1.0);
        s.set_target(100.0);
        assert_eq!(s.ramp_samples(), 2205);

        for _ in 0..2205 {
            s.next();
        }
        assert_eq!(s.current(), 100.0);
        assert!(!s.is_smoothing());
    }

    #[test]
    fn test_linear_is_monotonic_without_overshoot() {
        for (from, to) in [(1.0, 100.0), (100.0, 0.01), (0.5, 0.75), (3.0, -2.0)] {
            let mut s = Smoother::new(SmoothingStyle::Linear(50.0));
            s.set_sample_rate(48000.0);
            s.reset(from);
            s.set_target(to);
            let step = s.step_size().abs();

            let mut prev = from;
            for _ in 0..3000 {
                let v = s.next();
                if to > from {
                    assert!(v >= prev && v <= to);
                } else {
                    assert!(v <= prev && v >= to);
                }
                assert!((v - prev).abs() <= step * (1.0 + 1e-6) + 1e-12);
                prev = v;
            }
            assert_eq!(prev, to);
        }
    }

    #[test]
    fn test_retarget_mid_ramp() {
        let mut s = Smoother::new(SmoothingStyle::Linear(10.0));
        s.set_sample_rate(1000.0);
        s.reset(0.0);
        s.set_target(1.0);
        for _ in 0..5 {
            s.next();
        }
        s.set_target(0.0);
        assert!((s.current() - 0.5).abs() < 1e-12);
        for _ in 0..10 {
            s.next();
        }
        assert_eq!(s.current(), 0.0);
    }

    #[test]
    fn test_exponential_approaches_target() {
        let mut s = Smoother::new(SmoothingStyle::Exponential(5.0));
        s.set_sample_rate(44100.0);
        s.reset(0.0);
        s.set_target(1.0);

        let mut prev = 0.0;
        for _ in 0..10000 {
            let v = s.next();
            assert!(v >= prev && v <= 1.0);
            prev = v;
        }
        assert!((s.current() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_style_changes_duration() {
        let mut s = Smoother::new(SmoothingStyle::Linear(50.0));
        s.set_sample_rate(1000.0);
        s.set_style(s.style().with_time(20.0));
        assert_eq!(s.ramp_samples(), 20);
    }
}
