//! Finalised plugin output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// The `(severity, message, metrics)` triple a finished check produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutput {
    pub severity: Severity,
    pub message: String,
    /// Rendered perf data, each entry followed by a space. Empty when none.
    pub metrics: String,
}

impl CheckOutput {
    /// Process exit status expected by the monitoring system.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.severity.code())
    }
}

/// Plugin text: the message, then `|` and the perf data when there is any.
impl fmt::Display for CheckOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.metrics.is_empty() {
            write!(f, "|{}", self.metrics)?;
        }
        Ok(())
    }
}
