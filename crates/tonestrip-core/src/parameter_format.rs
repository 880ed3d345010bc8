//! Parameter value formatting and parsing.
//!
//! [`Formatter`] is the default text rule of a parameter: how the control
//! surface shows a plain value and how typed input is read back. A parameter
//! can override it with its own function pair (see
//! [`FloatParameter::with_text`](crate::FloatParameter::with_text)).
//!
//! ```
//! use tonestrip_core::Formatter;
//!
//! assert_eq!(Formatter::Frequency.format(800.0), "800 Hz");
//! assert_eq!(Formatter::Frequency.format(1500.0), "1.50 kHz");
//! assert_eq!(Formatter::Frequency.parse("2.5 kHz"), Some(2500.0));
//! ```

/// Parameter value formatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Formatter {
    /// Generic float with configurable precision (e.g., "1.2300").
    Float {
        /// Number of decimal places.
        precision: usize,
    },

    /// Decibel formatter where the plain value is already in dB.
    ///
    /// Display: "+12.0 dB", "-40.0 dB"
    DecibelDirect {
        /// Number of decimal places.
        precision: usize,
        /// Values below this display as "-inf dB".
        min_db: f64,
    },

    /// Frequency formatter with automatic Hz/kHz scaling.
    ///
    /// Display: "20.0 Hz", "800 Hz", "1.50 kHz"
    Frequency,
}

impl Formatter {
    /// Format a plain value to a display string.
    pub fn format(&self, value: f64) -> String {
        match self {
            Formatter::Float { precision } => {
                format!("{:.prec$}", value, prec = *precision)
            }

            Formatter::DecibelDirect { precision, min_db } => {
                if value < *min_db {
                    "-inf dB".to_string()
                } else if value >= 0.0 {
                    format!("+{:.prec$} dB", value, prec = *precision)
                } else {
                    format!("{:.prec$} dB", value, prec = *precision)
                }
            }

            Formatter::Frequency => {
                // Pick the branch on the value as displayed, so 999.7 reads
                // "1.00 kHz" and 99.97 reads "100 Hz"
                if value.round() >= 1000.0 {
                    format!("{:.2} kHz", value / 1000.0)
                } else if (value * 10.0).round() >= 1000.0 {
                    format!("{:.0} Hz", value)
                } else {
                    format!("{:.1} Hz", value)
                }
            }
        }
    }

    /// Parse a display string to a plain value.
    ///
    /// Accepts input with or without the unit suffix. Returns `None` if the
    /// string cannot be parsed.
    pub fn parse(&self, s: &str) -> Option<f64> {
        let s = s.trim();

        match self {
            Formatter::Float { .. } => s.parse().ok(),

            Formatter::DecibelDirect { min_db, .. } => {
                let trimmed = s
                    .trim_end_matches(" dB")
                    .trim_end_matches("dB")
                    .trim();

                if trimmed.eq_ignore_ascii_case("-inf") || trimmed == "-∞" {
                    return Some(*min_db);
                }

                trimmed.trim_start_matches('+').parse().ok()
            }

            Formatter::Frequency => {
                if let Some(khz) = s
                    .strip_suffix("kHz")
                    .or_else(|| s.strip_suffix("khz"))
                {
                    return khz.trim().parse::<f64>().ok().map(|v| v * 1000.0);
                }

                s.trim_end_matches("Hz")
                    .trim_end_matches("hz")
                    .trim()
                    .parse()
                    .ok()
            }
        }
    }

    /// Unit label for this formatter.
    pub fn units(&self) -> &'static str {
        match self {
            Formatter::Float { .. } => "",
            Formatter::DecibelDirect { .. } => "dB",
            Formatter::Frequency => "Hz",
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::Float { precision: 2 }
    }
}
