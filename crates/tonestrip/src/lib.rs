//! # tonestrip
//!
//! A real-time channel strip: second-order low-pass → smoothed gain → hard
//! clipper, with a lock-free peak meter.
//!
//! The audio context owns an [`Engine`] and calls it once per host block.
//! The control context holds [`ControlHandle`]s obtained from
//! [`Engine::controller`]; they write parameters and read meters through
//! atomics only, so neither side ever waits on the other.
//!
//! ```
//! use tonestrip::{AudioProcessor, AudioSetup, Buffer, Engine, VOLUME};
//!
//! let mut engine = Engine::new();
//! let control = engine.controller();
//! engine.prepare(AudioSetup::new(48000.0, 128)).unwrap();
//!
//! control.set_parameter(VOLUME, -6.0).unwrap();
//!
//! let mut left = [0.25f32; 128];
//! let mut right = [0.25f32; 128];
//! engine.process_block(&mut Buffer::new([&mut left[..], &mut right[..]], 128));
//! assert!(control.block_peak() > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`coefficients`] - cutoff/volume → filter coefficients and gain
//! - [`biquad`] - per-channel IIR filter
//! - [`gain`] - per-channel gain ramps
//! - [`clipper`] - output limiting
//! - [`meter`] - block and session peaks
//! - [`engine`] - lifecycle and block orchestration
//! - [`control`] - the control-context handle
//! - [`surface`] - editor capability types (themes, slider bindings)

pub mod biquad;
pub mod clipper;
pub mod coefficients;
pub mod config;
pub mod control;
pub mod engine;
pub mod gain;
pub mod meter;
pub mod params;
pub mod surface;

pub use biquad::Biquad;
pub use coefficients::{db_to_gain, BiquadCoefficients, BUTTERWORTH_Q};
pub use config::EngineConfig;
pub use control::ControlHandle;
pub use engine::{Engine, EngineState};
pub use gain::GainStage;
pub use meter::{MeterReadings, PeakMeter};
pub use params::{CUTOFF, VOLUME};
pub use surface::{ControlListener, Rgb, SliderAttachment, Size, StyleTable, Surface, Theme};

// Core re-exports
pub use tonestrip_core::{
    AudioProcessor, AudioSetup, Buffer, EngineError, EngineResult, ParameterInfo, ParameterState,
    ProcessContext, Sample, SmoothingStyle, Transport,
};
