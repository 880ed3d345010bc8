//! Smoothed gain stage.
//!
//! One [`Smoother`] per channel ramps the linear gain multiplier toward its
//! target. All channels receive the same target at the same block boundary,
//! so they ramp in lockstep. The ramp never overshoots and never moves by
//! more than one step per sample.

use tonestrip_core::{Sample, Smoother, SmoothingStyle};

/// Per-channel smoothed gain.
#[derive(Debug, Clone, PartialEq)]
pub struct GainStage {
    style: SmoothingStyle,
    target: f64,
    smoothers: Vec<Smoother>,
}

impl GainStage {
    /// Create a stage with unity target and no channels.
    ///
    /// `style` selects the ramp curve; its duration is replaced on
    /// [`reset`](Self::reset).
    pub fn new(style: SmoothingStyle) -> Self {
        Self {
            style,
            target: 1.0,
            smoothers: Vec::new(),
        }
    }

    /// Allocate ramp state for `num_channels`. Control context only.
    pub fn set_channels(&mut self, num_channels: usize) {
        let mut smoother = Smoother::new(self.style);
        smoother.reset(self.target);
        self.smoothers = vec![smoother; num_channels];
    }

    /// Number of channels with ramp state.
    pub fn num_channels(&self) -> usize {
        self.smoothers.len()
    }

    /// Set the destination gain (linear). Call at a block boundary.
    pub fn set_target(&mut self, gain: f64) {
        self.target = gain;
        for smoother in &mut self.smoothers {
            smoother.set_target(gain);
        }
    }

    /// Destination gain (linear).
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Gain currently applied to `channel` (linear), 0 for a missing channel.
    pub fn current(&self, channel: usize) -> f64 {
        self.smoothers.get(channel).map_or(0.0, Smoother::current)
    }

    /// Whether any channel is still ramping.
    pub fn is_smoothing(&self) -> bool {
        self.smoothers.iter().any(Smoother::is_smoothing)
    }

    /// Set the ramp duration and snap every channel onto the target.
    pub fn reset(&mut self, sample_rate: f64, ramp_seconds: f64) {
        let style = self.style.with_time(ramp_seconds * 1000.0);
        for smoother in &mut self.smoothers {
            smoother.set_style(style);
            smoother.set_sample_rate(sample_rate);
            smoother.reset(self.target);
        }
    }

    /// Multiply a channel in place by its ramped gain.
    ///
    /// Channels without ramp state are left untouched.
    #[inline]
    pub fn process<S: Sample>(&mut self, channel: usize, samples: &mut [S]) {
        let Some(smoother) = self.smoothers.get_mut(channel) else {
            return;
        };

        if !smoother.is_smoothing() {
            let gain = S::from_f64(smoother.current());
            for sample in samples.iter_mut() {
                *sample = *sample * gain;
            }
            return;
        }

        for sample in samples.iter_mut() {
            *sample = *sample * S::from_f64(smoother.next());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 44100.0;
    const RAMP_SECONDS: f64 = 0.05;
    const RAMP_SAMPLES: usize = 2205;

    fn stage(channels: usize) -> GainStage {
        let mut gain = GainStage::new(SmoothingStyle::Linear(50.0));
        gain.set_channels(channels);
        gain.reset(SAMPLE_RATE, RAMP_SECONDS);
        gain
    }

    fn run_ones(gain: &mut GainStage, channel: usize, n: usize) -> Vec<f64> {
        let mut samples = vec![1.0f64; n];
        gain.process(channel, &mut samples);
        samples
    }

    #[test]
    fn test_reset_snaps_to_target() {
        let mut gain = stage(2);
        gain.set_target(4.0);
        gain.reset(SAMPLE_RATE, RAMP_SECONDS);
        assert!(!gain.is_smoothing());
        assert_eq!(run_ones(&mut gain, 0, 4), vec![4.0; 4]);
    }

    #[test]
    fn test_reaches_target_within_ramp_without_overshoot() {
        let targets = [100.0, 0.01, 1.0, 2.5, 0.5, 0.5001, 39.0];
        let mut gain = stage(1);
        let mut previous = gain.current(0);
        for &target in &targets {
            gain.set_target(target);
            let out = run_ones(&mut gain, 0, RAMP_SAMPLES);
            let rising = target >= previous;
            let mut last = previous;
            for &g in &out {
                if rising {
                    assert!(g >= last - 1e-12 && g <= target + 1e-12);
                } else {
                    assert!(g <= last + 1e-12 && g >= target - 1e-12);
                }
                last = g;
            }
            assert_eq!(gain.current(0), target);
            assert!(!gain.is_smoothing());
            previous = target;
        }
    }

    #[test]
    fn test_step_never_exceeds_ramp_step() {
        let mut gain = stage(1);
        gain.set_target(100.0);
        let step = (100.0 - 1.0) / RAMP_SAMPLES as f64;
        let out = run_ones(&mut gain, 0, RAMP_SAMPLES + 100);
        let mut last = 1.0;
        for &g in &out {
            assert!((g - last).abs() <= step * (1.0 + 1e-9));
            last = g;
        }
        assert_eq!(out[RAMP_SAMPLES - 1], 100.0);
    }

    #[test]
    fn test_idempotent_once_reached() {
        let mut gain = stage(1);
        gain.set_target(2.0);
        run_ones(&mut gain, 0, RAMP_SAMPLES);
        let settled = gain.clone();
        gain.set_target(2.0);
        assert_eq!(run_ones(&mut gain, 0, 16), vec![2.0; 16]);
        assert_eq!(gain, settled);
    }

    #[test]
    fn test_channels_ramp_in_lockstep() {
        let mut gain = stage(2);
        gain.set_target(10.0);
        let left = run_ones(&mut gain, 0, 300);
        let right = run_ones(&mut gain, 1, 300);
        assert_eq!(left, right);
    }

    #[test]
    fn test_missing_channel_untouched() {
        let mut gain = stage(1);
        gain.set_target(3.0);
        assert_eq!(run_ones(&mut gain, 5, 3), vec![1.0; 3]);
        assert_eq!(gain.current(5), 0.0);
    }
}
