//! Parameter layout.
//!
//! Two controls, declared in this order:
//!
//! | Key   | Name     | Range           | Default  | Skew        |
//! |-------|----------|-----------------|----------|-------------|
//! | `VOL` | Volume   | -40 ..= +40 dB  | 0 dB     | linear      |
//! | `LPF` | Low-Pass | 20 ..= 20000 Hz | 20000 Hz | logarithmic |

use tonestrip_core::{FloatParameter, ParameterRegistry, ParameterValue};

/// Key of the output volume parameter.
pub const VOLUME: &str = "VOL";

/// Key of the low-pass cutoff parameter.
pub const CUTOFF: &str = "LPF";

/// Registry index of [`VOLUME`].
pub const VOLUME_INDEX: usize = 0;

/// Registry index of [`CUTOFF`].
pub const CUTOFF_INDEX: usize = 1;

/// Volume shown with four decimals ("-6.0000").
fn volume_to_text(value: ParameterValue) -> String {
    format!("{:.4}", value)
}

/// Reads the leading number of the input, ignoring any trailing unit.
/// Input without a leading number reads as 0.
fn volume_from_text(text: &str) -> Option<ParameterValue> {
    Some(leading_float(text).unwrap_or(0.0))
}

fn leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_point = false;
    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    text[..end].parse().ok()
}

/// Build the registry with every parameter at its default.
pub fn build_registry() -> ParameterRegistry {
    let mut registry = ParameterRegistry::new();

    let volume = registry.declare(
        FloatParameter::db(VOLUME, "Volume", 0.0, -40.0..=40.0)
            .with_short_name("Vol")
            .with_text(volume_to_text, volume_from_text),
    );
    let cutoff = registry.declare(
        FloatParameter::hz(CUTOFF, "Low-Pass", 20000.0, 20.0..=20000.0).with_short_name("LPF"),
    );

    debug_assert_eq!(volume, VOLUME_INDEX);
    debug_assert_eq!(cutoff, CUTOFF_INDEX);
    registry
}
