//! Sample type abstraction for f32/f64 audio processing.
//!
//! The signal chain is written once against [`Sample`] and monomorphized for
//! both host precisions. DSP state (filter history, gain ramp) is kept in
//! `f64` regardless of the buffer precision.

use std::ops::{Add, Div, Mul, Sub};

/// Trait for audio sample types (f32, f64).
///
/// Only the operations the signal chain needs in its inner loops. All
/// methods are inlined.
pub trait Sample:
    Copy
    + Default
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + PartialOrd
{
    /// Zero value (0.0).
    const ZERO: Self;

    /// Unit value (1.0).
    const ONE: Self;

    /// Convert from f64.
    fn from_f64(value: f64) -> Self;

    /// Convert to f64.
    fn to_f64(self) -> f64;

    /// Absolute value.
    fn abs(self) -> Self;

    /// Minimum of two values.
    fn min(self, other: Self) -> Self;

    /// Maximum of two values.
    fn max(self, other: Self) -> Self;

    /// Whether the value is NaN.
    fn is_nan(self) -> bool;

    /// Clamp value between min and max.
    ///
    /// NaN collapses to `min`, so the result is always inside the bounds.
    fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }
}

impl Sample for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline(always)]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        f32::min(self, other)
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        f32::max(self, other)
    }

    #[inline(always)]
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }
}

impl Sample for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline(always)]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        f64::min(self, other)
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        f64::max(self, other)
    }

    #[inline(always)]
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clamp_generic<S: Sample>(x: S) -> S {
        x.clamp(S::ZERO - S::ONE, S::ONE)
    }

    #[test]
    fn test_clamp_both_precisions() {
        assert_eq!(clamp_generic(2.5f32), 1.0);
        assert_eq!(clamp_generic(-2.5f64), -1.0);
        assert_eq!(clamp_generic(0.25f32), 0.25);
    }

    #[test]
    fn test_nan_clamps_into_range() {
        let y = clamp_generic(f32::NAN);
        assert!((-1.0..=1.0).contains(&y));
    }

    #[test]
    fn test_is_nan() {
        assert!(Sample::is_nan(f32::NAN));
        assert!(!Sample::is_nan(f64::INFINITY));
    }

    #[test]
    fn test_f64_round_trip() {
        assert_eq!(f32::from_f64(0.5).to_f64(), 0.5);
    }
}
