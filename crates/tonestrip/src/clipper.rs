//! Symmetric hard clipper.
//!
//! Stateless and last in the chain: whatever the filter and gain do, the
//! output stays inside `[-CEILING, CEILING]`.

use tonestrip_core::Sample;

/// Output ceiling (full scale).
pub const CEILING: f64 = 1.0;

/// Clip one sample to `[-1, 1]`.
///
/// NaN maps to silence, so the result is always in range.
#[inline]
pub fn clip<S: Sample>(x: S) -> S {
    if x.is_nan() {
        return S::ZERO;
    }
    x.clamp(S::ZERO - S::ONE, S::ONE)
}

/// Clip a channel in place.
#[inline]
pub fn clip_block<S: Sample>(samples: &mut [S]) {
    for sample in samples.iter_mut() {
        *sample = clip(*sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_in_range() {
        let inputs = [
            -1e9f32,
            -100.0,
            -1.0001,
            1.0001,
            3.5,
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::MAX,
            f32::MIN,
            f32::NAN,
        ];
        for x in inputs {
            let y = clip(x);
            assert!((-1.0..=1.0).contains(&y), "clip({}) = {}", x, y);
        }
        assert_eq!(clip(f32::NAN), 0.0);
        assert_eq!(clip(f64::NAN), 0.0);
        assert_eq!(clip(7.0f64), 1.0);
        assert_eq!(clip(-7.0f64), -1.0);
    }

    #[test]
    fn test_identity_inside_range() {
        let mut x = -1.0f64;
        while x <= 1.0 {
            assert_eq!(clip(x), x);
            x += 0.001;
        }
        assert_eq!(clip(1.0f32), 1.0);
        assert_eq!(clip(-1.0f32), -1.0);
        assert_eq!(clip(0.0f32), 0.0);
    }

    #[test]
    fn test_clip_block() {
        let mut samples = [0.5f32, 2.0, -3.0, -0.25];
        clip_block(&mut samples);
        assert_eq!(samples, [0.5, 1.0, -1.0, -0.25]);
        assert_eq!(CEILING, 1.0);
    }
}
