//! Control-context access to a running engine.
//!
//! Everything the control surface may touch lives in one [`Shared`] block
//! behind an `Arc`: the parameter registry, the dirty flags and the meter
//! readings. A [`ControlHandle`] wraps that `Arc`; it is cheap to clone and
//! can be sent to any thread.
//!
//! Writes go value first, flag second: the registry stores the clamped value
//! and the parameter's dirty bit is marked with release ordering. The engine
//! takes the flags at the next block boundary and recomputes only what
//! changed. Nothing here blocks, so a slow UI can never stall rendering.

use std::sync::Arc;

use tonestrip_core::{
    DirtyFlags, EngineResult, ParameterInfo, ParameterRegistry, ParameterState, ParameterValue,
};

use crate::meter::MeterReadings;

/// State shared between the engine and its control handles.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) registry: ParameterRegistry,
    pub(crate) dirty: DirtyFlags,
    pub(crate) meters: MeterReadings,
}

impl Shared {
    pub(crate) fn new(registry: ParameterRegistry) -> Self {
        Self {
            registry,
            dirty: DirtyFlags::new(),
            meters: MeterReadings::new(),
        }
    }

    pub(crate) fn set_parameter(&self, key: &str, value: ParameterValue) -> EngineResult<()> {
        let index = self.registry.set(key, value)?;
        self.dirty.mark(index);
        Ok(())
    }

    pub(crate) fn import_state(&self, state: &ParameterState) -> usize {
        let applied = self.registry.import_state(state);
        self.dirty.mark_all();
        applied
    }
}

/// Handle for reading and writing parameters and reading meters.
///
/// Obtained from [`Engine::controller`](crate::Engine::controller).
#[derive(Debug, Clone)]
pub struct ControlHandle {
    shared: Arc<Shared>,
}

impl ControlHandle {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Metadata of every parameter in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterInfo> + '_ {
        self.shared.registry.iter().map(|p| p.info())
    }

    /// Set a plain value (clamped to the parameter's range).
    pub fn set_parameter(&self, key: &str, value: ParameterValue) -> EngineResult<()> {
        self.shared.set_parameter(key, value)
    }

    /// Set a normalized position in `[0, 1]` (clamped).
    pub fn set_parameter_normalized(&self, key: &str, normalized: f64) -> EngineResult<()> {
        let index = self.shared.registry.set_normalized(key, normalized)?;
        self.shared.dirty.mark(index);
        Ok(())
    }

    /// Parse display text with the parameter's text rules and set it.
    pub fn set_parameter_text(&self, key: &str, text: &str) -> EngineResult<()> {
        let index = self.shared.registry.set_text(key, text)?;
        self.shared.dirty.mark(index);
        Ok(())
    }

    /// Current plain value.
    pub fn get_parameter(&self, key: &str) -> EngineResult<ParameterValue> {
        self.shared.registry.get(key)
    }

    /// Current normalized position.
    pub fn get_parameter_normalized(&self, key: &str) -> EngineResult<f64> {
        Ok(self.shared.registry.by_key(key)?.get_normalized())
    }

    /// Current value as display text.
    pub fn get_parameter_text(&self, key: &str) -> EngineResult<String> {
        self.shared.registry.text(key)
    }

    /// Restore every parameter to its default.
    pub fn reset_to_defaults(&self) {
        self.shared.registry.reset_to_defaults();
        self.shared.dirty.mark_all();
    }

    // =========================================================================
    // Meters
    // =========================================================================

    /// Peak of the most recent block, in `[0, 1]`.
    pub fn block_peak(&self) -> f32 {
        self.shared.meters.block_peak()
    }

    /// Largest absolute sample since the last prepare or reset.
    pub fn session_peak(&self) -> f32 {
        self.shared.meters.session_peak()
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Snapshot of every parameter value.
    pub fn export_state(&self) -> ParameterState {
        self.shared.registry.export_state()
    }

    /// Apply a snapshot; returns how many parameters were set.
    pub fn import_state(&self, state: &ParameterState) -> usize {
        self.shared.import_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{build_registry, CUTOFF, CUTOFF_INDEX, VOLUME, VOLUME_INDEX};
    use tonestrip_core::EngineError;

    fn handle() -> ControlHandle {
        ControlHandle::new(Arc::new(Shared::new(build_registry())))
    }

    #[test]
    fn test_handle_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ControlHandle>();
    }

    #[test]
    fn test_set_marks_only_that_parameter() {
        let handle = handle();
        handle.set_parameter(CUTOFF, 800.0).unwrap();
        let dirty = handle.shared.dirty.take();
        assert!(dirty.contains(CUTOFF_INDEX));
        assert!(!dirty.contains(VOLUME_INDEX));

        handle.set_parameter_normalized(VOLUME, 1.0).unwrap();
        let dirty = handle.shared.dirty.take();
        assert!(dirty.contains(VOLUME_INDEX));
        assert!(!dirty.contains(CUTOFF_INDEX));
        assert_eq!(handle.get_parameter(VOLUME), Ok(40.0));
    }

    #[test]
    fn test_unknown_key_marks_nothing() {
        let handle = handle();
        assert_eq!(
            handle.set_parameter("DRIVE", 1.0),
            Err(EngineError::UnknownParameter("DRIVE".to_string()))
        );
        assert!(!handle.shared.dirty.is_dirty());
    }

    #[test]
    fn test_text_access() {
        let handle = handle();
        handle.set_parameter_text(CUTOFF, "2 kHz").unwrap();
        assert_eq!(handle.get_parameter(CUTOFF), Ok(2000.0));
        assert_eq!(handle.get_parameter_text(CUTOFF).unwrap(), "2.00 kHz");
        assert_eq!(handle.get_parameter_text(VOLUME).unwrap(), "0.0000");
    }

    #[test]
    fn test_import_marks_everything() {
        let handle = handle();
        let mut state = ParameterState::new();
        state.insert(VOLUME, -12.0);
        assert_eq!(handle.import_state(&state), 1);
        let dirty = handle.shared.dirty.take();
        assert!(dirty.contains(VOLUME_INDEX) && dirty.contains(CUTOFF_INDEX));
        assert_eq!(handle.export_state().get(VOLUME), Some(-12.0));
    }

    #[test]
    fn test_parameters_in_order() {
        let keys: Vec<_> = handle().parameters().map(|info| info.key).collect();
        assert_eq!(keys, vec![VOLUME, CUTOFF]);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let handle = handle();
        let writer = {
            let handle = handle.clone();
            std::thread::spawn(move || {
                for n in 0..1000 {
                    handle.set_parameter(VOLUME, (n % 80) as f64 - 40.0).unwrap();
                }
            })
        };
        for _ in 0..1000 {
            let v = handle.get_parameter(VOLUME).unwrap();
            assert!((-40.0..=40.0).contains(&v));
        }
        writer.join().unwrap();
    }
}
