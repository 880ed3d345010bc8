//! Error types for the Tonestrip engine.
//!
//! Only control-context operations can fail. The render path has no error
//! channel: unexpected call ordering is a no-op and out-of-range values are
//! clamped.

use std::fmt;

/// Errors surfaced to the host or control surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Rejected audio configuration (sample rate, block size, channel count).
    InvalidConfiguration(String),
    /// No parameter is registered under the given key.
    UnknownParameter(String),
    /// Text that the parameter's text rule cannot read as a value.
    InvalidValue(String),
    /// State serialization/deserialization error.
    StateError(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::UnknownParameter(key) => write!(f, "Unknown parameter: {}", key),
            Self::InvalidValue(text) => write!(f, "Invalid value: {}", text),
            Self::StateError(msg) => write!(f, "State error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type for Tonestrip operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = EngineError::InvalidConfiguration("sample rate must be positive".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: sample rate must be positive"
        );
        assert_eq!(
            EngineError::UnknownParameter("Q".into()).to_string(),
            "Unknown parameter: Q"
        );
    }
}
