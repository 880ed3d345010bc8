//! # tonestrip-core
//!
//! Format-agnostic building blocks for the Tonestrip engine.
//!
//! Nothing in this crate knows about filters or gain. It provides the
//! plumbing the engine is assembled from:
//!
//! - [`Buffer`] / [`Sample`] - planar in-place audio, generic over f32/f64
//! - [`FloatParameter`] / [`ParameterRegistry`] - lock-free parameter storage
//! - [`RangeMapper`] / [`Formatter`] - plain ↔ normalized mapping and text
//! - [`DirtyFlags`] - control → audio change notification
//! - [`Smoother`] - per-sample value ramps
//! - [`AudioProcessor`] / [`AudioSetup`] - processing lifecycle
//! - [`EngineError`] - error types

pub mod buffer;
pub mod dirty;
pub mod error;
pub mod parameter;
pub mod parameter_format;
pub mod parameter_range;
pub mod process_context;
pub mod processor;
pub mod registry;
pub mod sample;
pub mod smoothing;
pub mod types;

pub use buffer::Buffer;
pub use dirty::{DirtyFlags, DirtySet};
pub use error::{EngineError, EngineResult};
pub use parameter::{FloatParameter, FromText, ParameterInfo, ToText};
pub use parameter_format::Formatter;
pub use parameter_range::{LinearMapper, LogMapper, PowerMapper, RangeMapper};
pub use process_context::{ProcessContext, Transport};
pub use processor::{AudioProcessor, AudioSetup, SUPPORTED_CHANNELS};
pub use registry::{ParameterRegistry, ParameterState};
pub use sample::Sample;
pub use smoothing::{Smoother, SmoothingStyle};
pub use types::{ParameterId, ParameterValue, MAX_CHANNELS, MAX_PARAMETERS};
