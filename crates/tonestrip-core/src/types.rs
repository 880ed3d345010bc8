//! Common types used throughout the Tonestrip engine.

/// Maximum number of channels a [`Buffer`](crate::Buffer) can address.
///
/// This is the storage ceiling of the buffer view, not what the engine
/// accepts at prepare time. Channels beyond it are silently ignored.
pub const MAX_CHANNELS: usize = 32;

/// Maximum number of parameters in one registry.
///
/// Bounded by the width of the [`DirtyFlags`](crate::DirtyFlags) bit set.
pub const MAX_PARAMETERS: usize = 32;

/// Numeric parameter identifier (FNV-1a hash of the string key).
pub type ParameterId = u32;

/// Plain parameter value in natural units (dB, Hz, ...).
pub type ParameterValue = f64;
