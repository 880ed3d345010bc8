//! Range mapping for parameter normalization.
//!
//! Parameters store plain values in natural units (Hz, dB). Control surfaces
//! and hosts talk in normalized positions (0.0 to 1.0). A [`RangeMapper`]
//! converts between the two and defines the skew of the control:
//!
//! - [`LinearMapper`] - even spacing (volume in dB)
//! - [`LogMapper`] - logarithmic spacing for positive ranges (cutoff in Hz)
//! - [`PowerMapper`] - skew exponent for any range
//!
//! ```
//! use tonestrip_core::{LogMapper, RangeMapper};
//!
//! let cutoff = LogMapper::new(20.0..=20000.0);
//! // sqrt(20 * 20000) sits at the slider midpoint
//! assert!((cutoff.denormalize(0.5) - 632.45).abs() < 0.01);
//! ```

use std::ops::RangeInclusive;

/// Trait for mapping between plain values and normalized values.
///
/// Implementations must be `Send + Sync`: they are read from both the
/// control and the audio context.
pub trait RangeMapper: Send + Sync {
    /// Convert a plain value to normalized (0.0-1.0).
    ///
    /// Values outside the range are clamped.
    fn normalize(&self, plain: f64) -> f64;

    /// Convert a normalized value (0.0-1.0) to plain.
    ///
    /// Values outside 0.0-1.0 are clamped.
    fn denormalize(&self, normalized: f64) -> f64;

    /// Get the plain value range as (min, max).
    fn range(&self) -> (f64, f64);

    /// Clamp a plain value into the range. NaN maps to the minimum.
    fn clamp(&self, plain: f64) -> f64 {
        let (min, max) = self.range();
        if plain.is_nan() {
            min
        } else {
            plain.clamp(min, max)
        }
    }
}

/// Linear range mapping.
#[derive(Debug, Clone)]
pub struct LinearMapper {
    min: f64,
    max: f64,
}

impl LinearMapper {
    /// Create a new linear mapper with the given range.
    ///
    /// # Panics
    ///
    /// Panics if the range end is less than the range start.
    pub fn new(range: RangeInclusive<f64>) -> Self {
        let min = *range.start();
        let max = *range.end();
        assert!(
            max >= min,
            "LinearMapper requires max >= min, got min={}, max={}",
            min, max
        );
        Self { min, max }
    }
}

impl RangeMapper for LinearMapper {
    fn normalize(&self, plain: f64) -> f64 {
        if (self.max - self.min).abs() < f64::EPSILON {
            return 0.5;
        }
        ((plain - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    fn denormalize(&self, normalized: f64) -> f64 {
        let normalized = normalized.clamp(0.0, 1.0);
        self.min + normalized * (self.max - self.min)
    }

    fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Logarithmic range mapping for frequency-like parameters.
///
/// Equal slider travel covers equal frequency ratios (octaves).
#[derive(Debug, Clone)]
pub struct LogMapper {
    min: f64,
    max: f64,
    min_log: f64,
    max_log: f64,
}

impl LogMapper {
    /// Create a new logarithmic mapper with the given range.
    ///
    /// # Panics
    ///
    /// Panics if the range start is not positive or the end is not greater
    /// than the start.
    pub fn new(range: RangeInclusive<f64>) -> Self {
        let min = *range.start();
        let max = *range.end();
        assert!(
            min > 0.0,
            "LogMapper requires positive range start, got min={}",
            min
        );
        assert!(
            max > min,
            "LogMapper requires max > min, got min={}, max={}",
            min, max
        );
        Self {
            min,
            max,
            min_log: min.ln(),
            max_log: max.ln(),
        }
    }
}

impl RangeMapper for LogMapper {
    fn normalize(&self, plain: f64) -> f64 {
        let plain = plain.max(self.min);
        ((plain.ln() - self.min_log) / (self.max_log - self.min_log)).clamp(0.0, 1.0)
    }

    fn denormalize(&self, normalized: f64) -> f64 {
        let normalized = normalized.clamp(0.0, 1.0);
        (self.min_log + normalized * (self.max_log - self.min_log))
            .exp()
            .clamp(self.min, self.max)
    }

    fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Power curve (skew) range mapping.
///
/// `normalized = linear ^ exponent`, where `linear` is the plain value's
/// linear position in the range.
///
/// - `exponent > 1.0`: more slider travel near the maximum
/// - `exponent < 1.0`: more slider travel near the minimum
/// - `exponent = 1.0`: same as [`LinearMapper`]
#[derive(Debug, Clone)]
pub struct PowerMapper {
    min: f64,
    max: f64,
    exponent: f64,
}

impl PowerMapper {
    /// Create a new power curve mapper.
    ///
    /// # Panics
    ///
    /// Panics if `exponent <= 0.0` or `max <= min`.
    pub fn new(range: RangeInclusive<f64>, exponent: f64) -> Self {
        let min = *range.start();
        let max = *range.end();
        assert!(
            max > min,
            "PowerMapper requires max > min, got min={}, max={}",
            min, max
        );
        assert!(
            exponent > 0.0,
            "PowerMapper requires positive exponent, got {}",
            exponent
        );
        Self { min, max, exponent }
    }
}

impl RangeMapper for PowerMapper {
    fn normalize(&self, plain: f64) -> f64 {
        let linear = ((plain - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        linear.powf(self.exponent)
    }

    fn denormalize(&self, normalized: f64) -> f64 {
        let normalized = normalized.clamp(0.0, 1.0);
        let linear = normalized.powf(1.0 / self.exponent);
        self.min + linear * (self.max - self.min)
    }

    fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_volume_range() {
        let mapper = LinearMapper::new(-40.0..=40.0);
        assert_eq!(mapper.normalize(0.0), 0.5);
        assert_eq!(mapper.denormalize(1.0), 40.0);
        assert_eq!(mapper.normalize(100.0), 1.0);
        assert_eq!(mapper.clamp(-55.0), -40.0);
    }

    #[test]
    fn test_log_cutoff_range() {
        let mapper = LogMapper::new(20.0..=20000.0);
        assert!((mapper.denormalize(0.0) - 20.0).abs() < 1e-9);
        assert!((mapper.denormalize(1.0) - 20000.0).abs() < 1e-6);
        // One decade per third of the travel
        assert!((mapper.normalize(200.0) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(mapper.normalize(1.0), 0.0);
    }

    #[test]
    fn test_power_skew_inverse() {
        let mapper = PowerMapper::new(0.0..=100.0, 0.3);
        for plain in [0.0, 1.0, 25.0, 50.0, 99.0, 100.0] {
            let back = mapper.denormalize(mapper.normalize(plain));
            assert!((back - plain).abs() < 1e-9, "{} -> {}", plain, back);
        }
        // exponent < 1 spends more travel near the minimum
        assert!(mapper.normalize(10.0) > 0.1);
    }

    #[test]
    fn test_clamp_nan() {
        let mapper = LinearMapper::new(-40.0..=40.0);
        assert_eq!(mapper.clamp(f64::NAN), -40.0);
    }

    #[test]
    #[should_panic(expected = "positive range start")]
    fn test_log_rejects_zero_start() {
        let _ = LogMapper::new(0.0..=10.0);
    }
}
