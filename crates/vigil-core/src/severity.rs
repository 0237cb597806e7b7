//! Check severity levels and the escalation rule.
//!
//! [`Severity::escalate`] is the single transition function every setter on
//! [`CheckResult`](crate::CheckResult) goes through:
//!
//! | current  | request Ok | request Warning | request Critical |
//! |----------|------------|-----------------|------------------|
//! | Unknown  | Ok         | Warning         | Critical         |
//! | Ok       | Ok         | Warning         | Critical         |
//! | Warning  | Warning    | Warning         | Critical         |
//! | Critical | Critical   | Critical        | Critical         |
//!
//! Requesting `Unknown` never changes anything.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CheckError;

/// Verdict level of a check. The discriminant is the plugin exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Severity {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Ok,
        Severity::Warning,
        Severity::Critical,
        Severity::Unknown,
    ];

    /// Numeric code, used as the process exit status.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Resolve a numeric code, rejecting anything outside 0..=3.
    pub fn from_code(code: i64) -> Result<Self, CheckError> {
        match code {
            0 => Ok(Self::Ok),
            1 => Ok(Self::Warning),
            2 => Ok(Self::Critical),
            3 => Ok(Self::Unknown),
            other => Err(CheckError::InvalidStateRequest(other)),
        }
    }

    /// Uppercase label used as the first-line prefix.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Title-case label used as the prefix of individual message lines.
    pub fn title(self) -> &'static str {
        match self {
            Self::Ok => "Ok",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
        }
    }

    /// Apply a severity request to `self` and return the resulting state.
    pub fn escalate(self, requested: Severity) -> Severity {
        match (self, requested) {
            (Self::Unknown, Self::Ok) => Self::Ok,
            (_, Self::Ok) => self,
            (Self::Critical, Self::Warning) => Self::Critical,
            (_, Self::Warning) => Self::Warning,
            (_, Self::Critical) => Self::Critical,
            (_, Self::Unknown) => self,
        }
    }

    /// Merge rule for independently accumulated results: the worse decided
    /// state wins and an undecided (`Unknown`) side never overrides.
    pub fn merge(self, other: Severity) -> Severity {
        match (self, other) {
            (Self::Unknown, other) => other,
            (decided, Self::Unknown) => decided,
            (a, b) => a.escalate(b),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<i64> for Severity {
    type Error = CheckError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ok" | "0" => Ok(Self::Ok),
            "warning" | "warn" | "1" => Ok(Self::Warning),
            "critical" | "crit" | "2" => Ok(Self::Critical),
            "unknown" | "3" => Ok(Self::Unknown),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}
