//! Peak metering.
//!
//! The audio context measures, the control context reads. [`PeakMeter`] is
//! owned by the audio context and accumulates per-channel peaks while a block
//! is processed; at the end of the block it publishes two scalars into
//! [`MeterReadings`], plain `f32` bit patterns in `AtomicU32`s.
//!
//! - **block peak**: mean over channels of each channel's peak absolute
//!   sample, overwritten every block and reported in `[0, 1]`
//! - **session peak**: largest absolute sample seen on any channel since the
//!   last reset, non-decreasing until then
//!
//! The meter taps the signal after the gain stage and before the clipper, so
//! the session peak can exceed full scale.

use std::sync::atomic::{AtomicU32, Ordering};

use tonestrip_core::Sample;

/// Lock-free meter scalars shared with the control context.
#[derive(Debug, Default)]
pub struct MeterReadings {
    block_peak: AtomicU32,
    session_peak: AtomicU32,
}

impl MeterReadings {
    /// Both readings at zero.
    pub const fn new() -> Self {
        Self {
            block_peak: AtomicU32::new(0),
            session_peak: AtomicU32::new(0),
        }
    }

    /// Peak of the most recent block, in `[0, 1]`.
    #[inline]
    pub fn block_peak(&self) -> f32 {
        f32::from_bits(self.block_peak.load(Ordering::Relaxed))
    }

    /// Largest absolute sample since the last reset, in `[0, ∞)`.
    #[inline]
    pub fn session_peak(&self) -> f32 {
        f32::from_bits(self.session_peak.load(Ordering::Relaxed))
    }

    fn store(&self, block_peak: f32, session_peak: f32) {
        self.block_peak.store(block_peak.to_bits(), Ordering::Relaxed);
        self.session_peak
            .store(session_peak.to_bits(), Ordering::Relaxed);
    }
}

/// Audio-side peak accumulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakMeter {
    channel_peak_sum: f32,
    channels_measured: usize,
    session_peak: f32,
}

impl PeakMeter {
    /// Create a meter with zero readings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new block.
    #[inline]
    pub fn begin_block(&mut self) {
        self.channel_peak_sum = 0.0;
        self.channels_measured = 0;
    }

    /// Measure one channel of the current block.
    #[inline]
    pub fn accumulate<S: Sample>(&mut self, samples: &[S]) {
        let peak = samples
            .iter()
            .fold(0.0f32, |peak, &s| peak.max(s.to_f64().abs() as f32));
        self.channel_peak_sum += peak;
        self.channels_measured += 1;
        self.session_peak = self.session_peak.max(peak);
    }

    /// Block peak of the channels measured so far.
    pub fn block_peak(&self) -> f32 {
        if self.channels_measured == 0 {
            return 0.0;
        }
        (self.channel_peak_sum / self.channels_measured as f32).min(1.0)
    }

    /// Largest absolute sample since the last reset.
    pub fn session_peak(&self) -> f32 {
        self.session_peak
    }

    /// Publish the finished block.
    #[inline]
    pub fn publish(&self, readings: &MeterReadings) {
        readings.store(self.block_peak(), self.session_peak);
    }

    /// Zero both readings and publish them.
    pub fn reset(&mut self, readings: &MeterReadings) {
        *self = Self::default();
        self.publish(readings);
    }
}
