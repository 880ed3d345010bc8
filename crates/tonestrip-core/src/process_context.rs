//! Per-block processing context.
//!
//! [`ProcessContext`] bundles the host's [`Transport`] state with the sample
//! rate and block length. The engine only cares whether playback is running:
//! a stop or restart clears filter history so the next take starts clean.

/// Host transport state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transport {
    /// Whether the host transport is playing.
    pub is_playing: bool,
}

impl Transport {
    /// Transport in the playing state.
    #[inline]
    pub const fn playing() -> Self {
        Self { is_playing: true }
    }

    /// Transport in the stopped state.
    #[inline]
    pub const fn stopped() -> Self {
        Self { is_playing: false }
    }
}

/// Context passed alongside each audio block.
#[derive(Debug, Clone, Copy)]
pub struct ProcessContext {
    /// Current sample rate in Hz.
    ///
    /// Same value passed to `prepare`, provided here for convenience.
    pub sample_rate: f64,

    /// Number of samples in this block.
    pub num_samples: usize,

    /// Host transport information.
    pub transport: Transport,
}

impl ProcessContext {
    /// Creates a new context.
    #[inline]
    pub fn new(sample_rate: f64, num_samples: usize, transport: Transport) -> Self {
        Self {
            sample_rate,
            num_samples,
            transport,
        }
    }

    /// Creates a context with default (stopped) transport.
    ///
    /// Used when the host doesn't report transport state.
    #[inline]
    pub fn with_empty_transport(sample_rate: f64, num_samples: usize) -> Self {
        Self::new(sample_rate, num_samples, Transport::default())
    }
}
