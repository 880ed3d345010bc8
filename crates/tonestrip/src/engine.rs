//! Block processing orchestrator.
//!
//! [`Engine`] owns everything the audio context touches (filters, gain ramps,
//! meter accumulator) and shares the rest with its [`ControlHandle`]s.
//!
//! # Lifecycle
//!
//! ```text
//! Inactive ──prepare──▶ Preparing ──▶ Active ──release──▶ Inactive
//!                           │
//!                           └── invalid setup ──▶ Inactive
//! ```
//!
//! While not `Active`, process calls return at once and leave the buffer
//! untouched.
//!
//! # Per block
//!
//! 1. take the dirty flags; recompute filter coefficients if the cutoff
//!    changed and the gain target if the volume changed
//! 2. per channel, in place: low-pass → gain → meter → clip
//! 3. publish the meter readings
//!
//! The block body runs with denormals flushed to zero. The render path never
//! allocates, locks or logs.

use std::sync::Arc;

use no_denormals::no_denormals;
use tonestrip_core::{
    AudioProcessor, AudioSetup, Buffer, EngineResult, ParameterState, ProcessContext, Sample,
    Transport,
};

use crate::biquad::Biquad;
use crate::clipper;
use crate::coefficients::{db_to_gain, BiquadCoefficients};
use crate::config::EngineConfig;
use crate::control::{ControlHandle, Shared};
use crate::gain::GainStage;
use crate::meter::PeakMeter;
use crate::params::{build_registry, CUTOFF_INDEX, VOLUME_INDEX};

/// Processing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Not prepared, or released. Blocks are ignored.
    #[default]
    Inactive,
    /// Inside `prepare`, configuring for a new stream.
    Preparing,
    /// Rendering blocks.
    Active,
}

/// Low-pass → smoothed gain → hard clipper, with peak metering.
///
/// # Example
///
/// ```
/// use tonestrip::{AudioProcessor, AudioSetup, Buffer, Engine, CUTOFF};
///
/// let mut engine = Engine::new();
/// let control = engine.controller();
/// engine.prepare(AudioSetup::new(44100.0, 256).with_channels(1)).unwrap();
///
/// control.set_parameter(CUTOFF, 800.0).unwrap();
///
/// let mut samples = [2.0f32; 256];
/// engine.process_block(&mut Buffer::new([&mut samples[..]], 256));
/// assert!(samples.iter().all(|s| s.abs() <= 1.0));
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    shared: Arc<Shared>,
    state: EngineState,

    // Stream settings from the last successful prepare
    sample_rate: f64,
    max_buffer_size: usize,
    num_channels: usize,

    // Audio-context state
    filters: Vec<Biquad>,
    gain: GainStage,
    meter: PeakMeter,
    was_playing: Option<bool>,
}

impl Engine {
    /// Create an inactive engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::DEFAULT)
    }

    /// Create an inactive engine.
    pub fn with_config(config: EngineConfig) -> Self {
        let gain = GainStage::new(config.gain_ramp);
        Self {
            config,
            shared: Arc::new(Shared::new(build_registry())),
            state: EngineState::Inactive,
            sample_rate: 0.0,
            max_buffer_size: 0,
            num_channels: 0,
            filters: Vec::new(),
            gain,
            meter: PeakMeter::new(),
            was_playing: None,
        }
    }

    /// A handle for the control context.
    pub fn controller(&self) -> ControlHandle {
        ControlHandle::new(Arc::clone(&self.shared))
    }

    /// Construction-time configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current processing state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Sample rate of the last successful prepare (0 before).
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Channel count of the last successful prepare (0 before).
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Tail length in seconds. The filter rings out within a block.
    pub fn tail_seconds(&self) -> f64 {
        0.0
    }

    /// Processing latency in samples.
    pub fn latency_samples(&self) -> u32 {
        0
    }

    /// Process a block without host transport information.
    pub fn process_block<S: Sample>(&mut self, buffer: &mut Buffer<S>) {
        self.render(buffer, None);
    }

    /// Snapshot of every parameter value.
    pub fn export_state(&self) -> ParameterState {
        self.shared.registry.export_state()
    }

    /// Apply a snapshot and mark every parameter dirty.
    pub fn import_state(&self, state: &ParameterState) -> usize {
        self.shared.import_state(state)
    }

    // =========================================================================
    // Render path
    // =========================================================================

    fn render<S: Sample>(&mut self, buffer: &mut Buffer<S>, transport: Option<Transport>) {
        if self.state != EngineState::Active {
            return;
        }
        debug_assert!(
            buffer.num_samples() <= self.max_buffer_size,
            "block of {} samples exceeds prepared maximum {}",
            buffer.num_samples(),
            self.max_buffer_size
        );

        no_denormals(|| {
            if let Some(transport) = transport {
                self.follow_transport(transport);
            }
            self.apply_parameter_changes();

            let processed = buffer.num_channels().min(self.num_channels);
            self.meter.begin_block();
            for channel in 0..processed {
                if let Some(samples) = buffer.channel_mut(channel) {
                    self.filters[channel].process(samples);
                    self.gain.process(channel, samples);
                    self.meter.accumulate(samples);
                    clipper::clip_block(samples);
                }
            }
            for channel in processed..buffer.num_channels() {
                buffer.clear_channel(channel);
            }
            self.meter.publish(&self.shared.meters);
        });
    }

    fn follow_transport(&mut self, transport: Transport) {
        if let Some(was_playing) = self.was_playing {
            if was_playing != transport.is_playing {
                self.reset_filters();
            }
        }
        self.was_playing = Some(transport.is_playing);
    }

    fn apply_parameter_changes(&mut self) {
        let dirty = self.shared.dirty.take();
        if dirty.contains(CUTOFF_INDEX) {
            self.update_filter();
        }
        if dirty.contains(VOLUME_INDEX) {
            self.update_gain();
        }
    }

    fn parameter_value(&self, index: usize) -> f64 {
        self.shared
            .registry
            .parameter(index)
            .map_or(0.0, |parameter| parameter.get())
    }

    fn update_filter(&mut self) {
        let coefficients = BiquadCoefficients::lowpass(
            self.parameter_value(CUTOFF_INDEX),
            self.sample_rate,
            self.config.filter_q,
        );
        for filter in &mut self.filters {
            filter.set_coefficients(coefficients);
        }
    }

    fn update_gain(&mut self) {
        self.gain.set_target(db_to_gain(self.parameter_value(VOLUME_INDEX)));
    }

    fn reset_filters(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioProcessor for Engine {
    fn prepare(&mut self, setup: AudioSetup) -> EngineResult<()> {
        if let Err(err) = setup.validate() {
            log::warn!("{}: prepare rejected: {}", self.config.name, err);
            self.state = EngineState::Inactive;
            return Err(err);
        }

        self.state = EngineState::Preparing;
        self.sample_rate = setup.sample_rate;
        self.max_buffer_size = setup.max_buffer_size;
        self.num_channels = setup.num_channels;
        self.filters = vec![Biquad::new(); setup.num_channels];
        self.gain.set_channels(setup.num_channels);

        // Everything is recomputed below; pending marks are already covered.
        self.shared.dirty.take();
        self.update_filter();
        self.update_gain();
        self.reset();

        self.state = EngineState::Active;
        log::debug!(
            "{}: prepared at {} Hz, {} samples, {} channel(s)",
            self.config.name,
            setup.sample_rate,
            setup.max_buffer_size,
            setup.num_channels
        );
        Ok(())
    }

    fn release(&mut self) {
        self.state = EngineState::Inactive;
        log::debug!("{}: released", self.config.name);
    }

    fn reset(&mut self) {
        self.reset_filters();
        self.gain.reset(self.sample_rate, self.config.ramp_seconds());
        self.meter.reset(&self.shared.meters);
        self.was_playing = None;
        log::debug!("{}: reset", self.config.name);
    }

    fn is_active(&self) -> bool {
        self.state == EngineState::Active
    }

    fn process(&mut self, buffer: &mut Buffer<f32>, context: &ProcessContext) {
        self.render(buffer, Some(context.transport));
    }

    fn process_f64(&mut self, buffer: &mut Buffer<f64>, context: &ProcessContext) {
        self.render(buffer, Some(context.transport));
    }

    fn save_state(&self) -> EngineResult<Vec<u8>> {
        Ok(self.shared.registry.save_state())
    }

    fn load_state(&mut self, data: &[u8]) -> EngineResult<()> {
        match self.shared.registry.load_state(data) {
            Ok(applied) => {
                self.shared.dirty.mark_all();
                log::debug!("{}: loaded {} parameter(s)", self.config.name, applied);
                Ok(())
            }
            Err(err) => {
                log::warn!("{}: state rejected: {}", self.config.name, err);
                Err(err)
            }
        }
    }
}
