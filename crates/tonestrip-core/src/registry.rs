//! Parameter registry shared by the control and render contexts.
//!
//! The registry is built once, before the engine is shared: every control is
//! [`declare`](ParameterRegistry::declare)d exactly once and the set never
//! changes afterwards. After that, all access goes through `&self`. Values
//! live in per-parameter atomics, so the control surface writing a value
//! never blocks the audio thread reading it.
//!
//! The registry only stores values. It does not notify anyone; the owner
//! pairs writes with [`DirtyFlags`](crate::DirtyFlags) marks.
//!
//! # State
//!
//! Two representations of the same id → value mapping:
//!
//! - [`ParameterState`] - a serde-serializable map for structured documents
//! - [`save_state`](ParameterRegistry::save_state) /
//!   [`load_state`](ParameterRegistry::load_state) - a compact binary chunk
//!   for hosts that store opaque bytes. Format per entry:
//!   `[key_len: u8][key: utf8][value: f64 le]`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tonestrip_utils::fnv1a_32;

use crate::error::{EngineError, EngineResult};
use crate::parameter::FloatParameter;
use crate::types::{ParameterValue, MAX_PARAMETERS};

/// Flat mapping of parameter key → plain value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterState(BTreeMap<String, ParameterValue>);

impl ParameterState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored for `key`.
    pub fn get(&self, key: &str) -> Option<ParameterValue> {
        self.0.get(key).copied()
    }

    /// Store a value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: ParameterValue) {
        self.0.insert(key.into(), value);
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ParameterValue)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the state holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ParameterValue)> for ParameterState {
    fn from_iter<I: IntoIterator<Item = (String, ParameterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Ordered collection of declared parameters.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    parameters: Vec<FloatParameter>,
}

impl ParameterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter and return its index.
    ///
    /// # Panics
    ///
    /// Declaring the same key twice, two keys whose ids collide, or more
    /// than [`MAX_PARAMETERS`] parameters is a programming error.
    pub fn declare(&mut self, parameter: FloatParameter) -> usize {
        for existing in &self.parameters {
            assert!(
                existing.key() != parameter.key(),
                "parameter '{}' declared twice",
                parameter.key()
            );
            assert!(
                existing.id() != parameter.id(),
                "parameter ids collide: '{}' and '{}'",
                existing.key(),
                parameter.key()
            );
        }
        assert!(
            self.parameters.len() < MAX_PARAMETERS,
            "registry holds at most {} parameters",
            MAX_PARAMETERS
        );
        self.parameters.push(parameter);
        self.parameters.len() - 1
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether no parameter has been declared.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Iterate over parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FloatParameter> + '_ {
        self.parameters.iter()
    }

    /// Parameter at a declaration index.
    #[inline]
    pub fn parameter(&self, index: usize) -> Option<&FloatParameter> {
        self.parameters.get(index)
    }

    /// Declaration index of `key`.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        let id = fnv1a_32(key);
        self.parameters
            .iter()
            .position(|p| p.id() == id && p.key() == key)
    }

    /// Look up a parameter by key.
    pub fn by_key(&self, key: &str) -> EngineResult<&FloatParameter> {
        self.index_of(key)
            .map(|index| &self.parameters[index])
            .ok_or_else(|| EngineError::UnknownParameter(key.to_string()))
    }

    /// Current plain value of `key`.
    pub fn get(&self, key: &str) -> EngineResult<ParameterValue> {
        Ok(self.by_key(key)?.get())
    }

    /// Store a plain value (clamped) and return the parameter's index.
    pub fn set(&self, key: &str, value: ParameterValue) -> EngineResult<usize> {
        let index = self.require_index(key)?;
        self.parameters[index].set(value);
        Ok(index)
    }

    /// Store a normalized position (clamped) and return the parameter's index.
    pub fn set_normalized(&self, key: &str, normalized: f64) -> EngineResult<usize> {
        let index = self.require_index(key)?;
        self.parameters[index].set_normalized(normalized);
        Ok(index)
    }

    /// Display text of the current value of `key`.
    pub fn text(&self, key: &str) -> EngineResult<String> {
        Ok(self.by_key(key)?.display())
    }

    /// Parse `text` with the parameter's text rule, store it and return the index.
    pub fn set_text(&self, key: &str, text: &str) -> EngineResult<usize> {
        let index = self.require_index(key)?;
        let parameter = &self.parameters[index];
        let value = parameter
            .parse(text)
            .ok_or_else(|| EngineError::InvalidValue(text.to_string()))?;
        parameter.set(value);
        Ok(index)
    }

    /// Restore every parameter to its default.
    pub fn reset_to_defaults(&self) {
        for parameter in &self.parameters {
            parameter.reset_to_default();
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Snapshot every parameter's current value.
    pub fn export_state(&self) -> ParameterState {
        self.parameters
            .iter()
            .map(|p| (p.key().to_string(), p.get()))
            .collect()
    }

    /// Apply a snapshot. Values are clamped; unknown keys are ignored so that
    /// state written by a newer layout still loads.
    ///
    /// Returns the number of parameters that were set.
    pub fn import_state(&self, state: &ParameterState) -> usize {
        let mut applied = 0;
        for (key, value) in state.iter() {
            match self.index_of(key) {
                Some(index) => {
                    self.parameters[index].set(value);
                    applied += 1;
                }
                None => log::debug!("ignoring unknown parameter '{}' in state", key),
            }
        }
        applied
    }

    /// Serialize all parameters to the binary state chunk.
    pub fn save_state(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.parameters.len() * 16);
        for parameter in &self.parameters {
            let key = parameter.key().as_bytes();
            data.push(key.len() as u8);
            data.extend_from_slice(key);
            data.extend_from_slice(&parameter.get().to_le_bytes());
        }
        data
    }

    /// Restore parameters from a binary state chunk.
    ///
    /// The whole chunk is decoded before anything is applied, so a truncated
    /// chunk leaves every value untouched. Entries with unknown or non-UTF-8
    /// keys are skipped. Returns the number of parameters that were set.
    pub fn load_state(&self, data: &[u8]) -> EngineResult<usize> {
        let state = decode_state(data)?;
        Ok(self.import_state(&state))
    }

    fn require_index(&self, key: &str) -> EngineResult<usize> {
        self.index_of(key)
            .ok_or_else(|| EngineError::UnknownParameter(key.to_string()))
    }
}

fn decode_state(data: &[u8]) -> EngineResult<ParameterState> {
    let mut state = ParameterState::new();
    let mut cursor = 0;

    while cursor < data.len() {
        let key_len = data[cursor] as usize;
        cursor += 1;

        if cursor + key_len + 8 > data.len() {
            return Err(EngineError::StateError(format!(
                "truncated entry at byte {}",
                cursor - 1
            )));
        }

        let key = std::str::from_utf8(&data[cursor..cursor + key_len]);
        cursor += key_len;

        let value_bytes: [u8; 8] = data[cursor..cursor + 8]
            .try_into()
            .map_err(|_| EngineError::StateError("invalid value bytes".to_string()))?;
        cursor += 8;

        match key {
            Ok(key) => state.insert(key, f64::from_le_bytes(value_bytes)),
            Err(_) => log::debug!("skipping state entry with non UTF-8 key"),
        }
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ParameterRegistry {
        let mut registry = ParameterRegistry::new();
        registry.declare(FloatParameter::db("VOL", "Volume", 0.0, -40.0..=40.0));
        registry.declare(FloatParameter::hz("LPF", "Low-Pass", 20000.0, 20.0..=20000.0));
        registry
    }

    #[test]
    fn test_declare_returns_indices() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.index_of("VOL"), Some(0));
        assert_eq!(registry.index_of("LPF"), Some(1));
        assert_eq!(registry.index_of("Q"), None);
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    fn test_duplicate_key_panics() {
        let mut registry = registry();
        registry.declare(FloatParameter::db("VOL", "Other", 0.0, -1.0..=1.0));
    }

    #[test]
    fn test_set_get_clamps() {
        let registry = registry();
        assert_eq!(registry.set("VOL", 12.0), Ok(0));
        assert_eq!(registry.get("VOL"), Ok(12.0));
        registry.set("VOL", 80.0).unwrap();
        assert_eq!(registry.get("VOL"), Ok(40.0));
    }

    #[test]
    fn test_unknown_key() {
        let registry = registry();
        assert_eq!(
            registry.set("Q", 1.0),
            Err(EngineError::UnknownParameter("Q".to_string()))
        );
        assert!(registry.get("Q").is_err());
        assert!(registry.text("Q").is_err());
    }

    #[test]
    fn test_text_round_trip() {
        let registry = registry();
        registry.set_text("LPF", "1.5 kHz").unwrap();
        assert_eq!(registry.get("LPF"), Ok(1500.0));
        assert_eq!(registry.text("LPF").unwrap(), "1.50 kHz");
        assert_eq!(
            registry.set_text("LPF", "bright"),
            Err(EngineError::InvalidValue("bright".to_string()))
        );
    }

    #[test]
    fn test_export_import_state() {
        let registry = registry();
        registry.set("VOL", -6.0).unwrap();
        registry.set("LPF", 800.0).unwrap();
        let state = registry.export_state();
        assert_eq!(state.get("VOL"), Some(-6.0));

        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"LPF":800.0,"VOL":-6.0}"#);

        let other = self::registry();
        let mut decoded: ParameterState = serde_json::from_str(&json).unwrap();
        decoded.insert("FUTURE", 1.0);
        assert_eq!(other.import_state(&decoded), 2);
        assert_eq!(other.get("LPF"), Ok(800.0));
        assert_eq!(other.get("VOL"), Ok(-6.0));
    }

    #[test]
    fn test_import_clamps() {
        let registry = registry();
        let mut state = ParameterState::new();
        state.insert("VOL", 1000.0);
        registry.import_state(&state);
        assert_eq!(registry.get("VOL"), Ok(40.0));
    }

    #[test]
    fn test_binary_state_round_trip() {
        let registry = registry();
        registry.set("VOL", 3.5).unwrap();
        registry.set("LPF", 440.0).unwrap();
        let chunk = registry.save_state();
        assert_eq!(chunk.len(), 2 * (1 + 3 + 8));

        let other = self::registry();
        assert_eq!(other.load_state(&chunk), Ok(2));
        assert_eq!(other.get("VOL"), Ok(3.5));
        assert_eq!(other.get("LPF"), Ok(440.0));
    }

    #[test]
    fn test_truncated_chunk_changes_nothing() {
        let registry = registry();
        registry.set("VOL", 3.5).unwrap();
        let chunk = registry.save_state();

        let other = self::registry();
        let result = other.load_state(&chunk[..chunk.len() - 4]);
        assert!(matches!(result, Err(EngineError::StateError(_))));
        assert_eq!(other.get("VOL"), Ok(0.0));
    }

    #[test]
    fn test_empty_chunk_is_noop() {
        assert_eq!(registry().load_state(&[]), Ok(0));
    }

    #[test]
    fn test_reset_to_defaults() {
        let registry = registry();
        registry.set("VOL", 9.0).unwrap();
        registry.set("LPF", 100.0).unwrap();
        registry.reset_to_defaults();
        assert_eq!(registry.get("VOL"), Ok(0.0));
        assert_eq!(registry.get("LPF"), Ok(20000.0));
    }
}
