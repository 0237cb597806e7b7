//! Performance data entries (`label=value<uom>;warn;crit;min;max`).
//!
//! Units of measurement understood by graphing backends:
//! none (a count of things), `s`/`ms`/`us`, `%`, `B`/`KB`/`MB`/`TB`, and `c`
//! for continuous counters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One performance-data entry. Unset optional fields render as empty strings
/// so the five-field layout is always kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfDatum {
    pub label: String,
    pub value: String,
    pub uom: Option<String>,
    pub warn: Option<String>,
    pub crit: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

impl PerfDatum {
    pub fn new(label: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
            uom: None,
            warn: None,
            crit: None,
            min: None,
            max: None,
        }
    }

    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    pub fn with_warn(mut self, warn: impl fmt::Display) -> Self {
        self.warn = Some(warn.to_string());
        self
    }

    pub fn with_crit(mut self, crit: impl fmt::Display) -> Self {
        self.crit = Some(crit.to_string());
        self
    }

    pub fn with_min(mut self, min: impl fmt::Display) -> Self {
        self.min = Some(min.to_string());
        self
    }

    pub fn with_max(mut self, max: impl fmt::Display) -> Self {
        self.max = Some(max.to_string());
        self
    }
}

impl fmt::Display for PerfDatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |v: &Option<String>| v.as_deref().unwrap_or("").to_string();
        write!(
            f,
            "{}={}{};{};{};{};{}",
            self.label,
            self.value,
            field(&self.uom),
            field(&self.warn),
            field(&self.crit),
            field(&self.min),
            field(&self.max),
        )
    }
}

/// Render entries in order, each followed by a single space.
pub fn render(entries: &[PerfDatum]) -> String {
    entries.iter().map(|d| format!("{d} ")).collect()
}
