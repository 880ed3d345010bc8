//! Processing lifecycle.
//!
//! An [`AudioProcessor`] moves through three states: it starts inactive,
//! becomes active after a successful [`prepare`](AudioProcessor::prepare) and
//! returns to inactive on [`release`](AudioProcessor::release). `process`
//! calls made while inactive must leave the buffer untouched.
//!
//! ```text
//!            prepare(ok)              release
//! Inactive ─────────────▶ Active ─────────────▶ Inactive
//!     ▲                     │
//!     └─────────────────────┘ prepare(err)
//! ```

use crate::buffer::Buffer;
use crate::error::{EngineError, EngineResult};
use crate::process_context::ProcessContext;

/// Channel counts the engine accepts.
pub const SUPPORTED_CHANNELS: std::ops::RangeInclusive<usize> = 1..=2;

/// Stream configuration passed to [`AudioProcessor::prepare`].
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSetup {
    /// Sample rate in Hz (e.g., 44100.0, 48000.0, 96000.0)
    pub sample_rate: f64,
    /// Maximum number of samples per process() call
    pub max_buffer_size: usize,
    /// Number of main channels (1 = mono, 2 = stereo)
    pub num_channels: usize,
}

impl AudioSetup {
    /// Stereo setup.
    pub const fn new(sample_rate: f64, max_buffer_size: usize) -> Self {
        Self {
            sample_rate,
            max_buffer_size,
            num_channels: 2,
        }
    }

    /// Override the channel count.
    pub const fn with_channels(mut self, num_channels: usize) -> Self {
        self.num_channels = num_channels;
        self
    }

    /// Check that the setup can be rendered.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.max_buffer_size == 0 {
            return Err(EngineError::InvalidConfiguration(
                "block size must be at least one sample".to_string(),
            ));
        }
        if !SUPPORTED_CHANNELS.contains(&self.num_channels) {
            return Err(EngineError::InvalidConfiguration(format!(
                "unsupported channel count {} (mono or stereo only)",
                self.num_channels
            )));
        }
        Ok(())
    }
}

/// Lifecycle of a block processor.
pub trait AudioProcessor: Send {
    /// Configure for a stream and become active.
    ///
    /// On error the processor stays (or becomes) inactive.
    fn prepare(&mut self, setup: AudioSetup) -> EngineResult<()>;

    /// Stop processing and become inactive.
    fn release(&mut self);

    /// Clear all signal history (filters, ramps, meters) without changing
    /// parameters. Must not run concurrently with `process`.
    fn reset(&mut self);

    /// Whether blocks are currently rendered.
    fn is_active(&self) -> bool;

    /// Process a block of single-precision audio in place.
    fn process(&mut self, buffer: &mut Buffer<f32>, context: &ProcessContext);

    /// Process a block of double-precision audio in place.
    fn process_f64(&mut self, buffer: &mut Buffer<f64>, context: &ProcessContext);

    /// Serialize parameter state to bytes.
    fn save_state(&self) -> EngineResult<Vec<u8>> {
        Ok(Vec::new())
    }

    /// Restore parameter state from bytes.
    fn load_state(&mut self, _data: &[u8]) -> EngineResult<()> {
        Ok(())
    }
}
