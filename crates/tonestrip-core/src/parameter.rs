//! Float parameter with encapsulated atomic storage.
//!
//! A [`FloatParameter`] bundles everything the registry needs to know about
//! one control: its string key and numeric id, display name, unit label,
//! range and skew, default, text rules and the current value.
//!
//! The current value is a plain `f64` kept in an `AtomicU64` (via
//! `to_bits`/`from_bits`), so the control context can write it while the
//! audio context reads it without a lock.
//!
//! ```
//! use tonestrip_core::FloatParameter;
//!
//! let cutoff = FloatParameter::hz("LPF", "Low-Pass", 20000.0, 20.0..=20000.0);
//! cutoff.set(800.0);
//! assert_eq!(cutoff.get(), 800.0);
//!
//! cutoff.set(96000.0); // clamped
//! assert_eq!(cutoff.get(), 20000.0);
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};

use tonestrip_utils::fnv1a_32;

use crate::parameter_format::Formatter;
use crate::parameter_range::{LinearMapper, LogMapper, PowerMapper, RangeMapper};
use crate::types::{ParameterId, ParameterValue};

/// Custom value-to-text function.
pub type ToText = fn(ParameterValue) -> String;

/// Custom text-to-value function. Returns `None` when the input is not a value.
pub type FromText = fn(&str) -> Option<ParameterValue>;

/// Metadata describing a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    /// Numeric identifier, the FNV-1a hash of `key`.
    pub id: ParameterId,
    /// String key used by the control surface and in saved state (e.g. "VOL").
    pub key: &'static str,
    /// Full parameter name (e.g., "Volume").
    pub name: &'static str,
    /// Short name for constrained UIs.
    pub short_name: &'static str,
    /// Unit label (e.g., "dB", "Hz").
    pub units: &'static str,
    /// Default value in plain units.
    pub default_value: ParameterValue,
    /// Lower bound of the plain range.
    pub min: ParameterValue,
    /// Upper bound of the plain range.
    pub max: ParameterValue,
}

/// Continuous parameter with atomic storage, range mapping and text rules.
///
/// # Specialized Constructors
///
/// - [`FloatParameter::new`]: generic float, linear mapping
/// - [`FloatParameter::db`]: decibel value, linear mapping, dB text
/// - [`FloatParameter::hz`]: frequency, logarithmic mapping, Hz/kHz text
pub struct FloatParameter {
    info: ParameterInfo,
    /// Plain value bits
    value: AtomicU64,
    range: Box<dyn RangeMapper>,
    formatter: Formatter,
    to_text: Option<ToText>,
    from_text: Option<FromText>,
}

impl FloatParameter {
    /// Create a generic float parameter with linear mapping.
    ///
    /// `default` is clamped into `range`.
    pub fn new(
        key: &'static str,
        name: &'static str,
        default: ParameterValue,
        range: RangeInclusive<f64>,
    ) -> Self {
        Self::with_mapper(key, name, default, Box::new(LinearMapper::new(range)))
            .with_formatter(Formatter::default())
    }

    /// Create a decibel parameter. The stored value is in dB.
    pub fn db(
        key: &'static str,
        name: &'static str,
        default_db: ParameterValue,
        range_db: RangeInclusive<f64>,
    ) -> Self {
        let min_db = *range_db.start();
        Self::with_mapper(key, name, default_db, Box::new(LinearMapper::new(range_db)))
            .with_formatter(Formatter::DecibelDirect { precision: 1, min_db })
    }

    /// Create a frequency parameter with logarithmic skew.
    pub fn hz(
        key: &'static str,
        name: &'static str,
        default_hz: ParameterValue,
        range_hz: RangeInclusive<f64>,
    ) -> Self {
        Self::with_mapper(key, name, default_hz, Box::new(LogMapper::new(range_hz)))
            .with_formatter(Formatter::Frequency)
    }

    fn with_mapper(
        key: &'static str,
        name: &'static str,
        default: ParameterValue,
        range: Box<dyn RangeMapper>,
    ) -> Self {
        let (min, max) = range.range();
        let default_value = range.clamp(default);
        Self {
            info: ParameterInfo {
                id: fnv1a_32(key),
                key,
                name,
                short_name: name,
                units: "",
                default_value,
                min,
                max,
            },
            value: AtomicU64::new(default_value.to_bits()),
            range,
            formatter: Formatter::default(),
            to_text: None,
            from_text: None,
        }
    }

    // === Builder methods ===

    /// Replace the range mapping with a skew exponent over the same range.
    ///
    /// See [`PowerMapper`] for the curve.
    pub fn with_skew(mut self, exponent: f64) -> Self {
        self.range = Box::new(PowerMapper::new(self.info.min..=self.info.max, exponent));
        self
    }

    /// Set the default text rule. Also adopts the formatter's unit label.
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self.info.units = formatter.units();
        self
    }

    /// Override the unit label.
    pub fn with_units(mut self, units: &'static str) -> Self {
        self.info.units = units;
        self
    }

    /// Set the short name for constrained UIs.
    pub fn with_short_name(mut self, short: &'static str) -> Self {
        self.info.short_name = short;
        self
    }

    /// Use custom text conversion instead of the formatter.
    pub fn with_text(mut self, to_text: ToText, from_text: FromText) -> Self {
        self.to_text = Some(to_text);
        self.from_text = Some(from_text);
        self
    }

    // === Metadata ===

    /// Get the parameter metadata.
    pub fn info(&self) -> &ParameterInfo {
        &self.info
    }

    /// String key.
    #[inline]
    pub fn key(&self) -> &'static str {
        self.info.key
    }

    /// Numeric id.
    #[inline]
    pub fn id(&self) -> ParameterId {
        self.info.id
    }

    // === Value access ===

    // Cross-context ordering comes from `DirtyFlags`; the value itself only
    // needs to be read untorn.

    /// Get the current plain value in natural units.
    #[inline]
    pub fn get(&self) -> ParameterValue {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Set the plain value, clamped to the range.
    #[inline]
    pub fn set(&self, value: ParameterValue) {
        let value = self.range.clamp(value);
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Get the current value as a normalized position (0.0-1.0).
    #[inline]
    pub fn get_normalized(&self) -> f64 {
        self.range.normalize(self.get())
    }

    /// Set the value from a normalized position (clamped to 0.0-1.0).
    #[inline]
    pub fn set_normalized(&self, normalized: f64) {
        let normalized = if normalized.is_nan() { 0.0 } else { normalized };
        self.set(self.range.denormalize(normalized));
    }

    /// Convert a normalized position to a plain value.
    pub fn normalized_to_plain(&self, normalized: f64) -> ParameterValue {
        self.range.denormalize(normalized)
    }

    /// Convert a plain value to a normalized position.
    pub fn plain_to_normalized(&self, plain: ParameterValue) -> f64 {
        self.range.normalize(plain)
    }

    /// Restore the default value.
    pub fn reset_to_default(&self) {
        self.set(self.info.default_value);
    }

    // === Text ===

    /// Format the current value for display.
    pub fn display(&self) -> String {
        self.display_value(self.get())
    }

    /// Format a plain value for display.
    pub fn display_value(&self, plain: ParameterValue) -> String {
        match self.to_text {
            Some(to_text) => to_text(plain),
            None => self.formatter.format(plain),
        }
    }

    /// Parse user text to a plain value, clamped to the range.
    pub fn parse(&self, text: &str) -> Option<ParameterValue> {
        let plain = match self.from_text {
            Some(from_text) => from_text(text),
            None => self.formatter.parse(text),
        }?;
        Some(self.range.clamp(plain))
    }
}

impl fmt::Debug for FloatParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloatParameter")
            .field("key", &self.info.key)
            .field("value", &self.get())
            .field("range", &(self.info.min, self.info.max))
            .finish()
    }
}
