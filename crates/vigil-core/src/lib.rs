//! Vigil Core Library
//!
//! Building blocks for Nagios/Icinga-style monitoring checks:
//! - [`Severity`]: verdict levels and the one-way escalation rule
//! - [`Range`]: Icinga threshold range parsing and evaluation
//! - [`CheckResult`]: accumulates findings and renders the plugin output
//! - [`telemetry`]: logging setup for check binaries

pub mod check;
pub mod config;
pub mod error;
pub mod output;
pub mod perfdata;
pub mod range;
pub mod severity;
pub mod telemetry;
pub mod threshold;

pub use check::{CheckOptions, CheckResult, LineFormat, Lookup, Measurement, NonNumericPolicy};
pub use config::{LoggingConfig, DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL, LOG_LEVELS};
pub use error::{CheckError, ConfigError, RangeError, Result};
pub use output::CheckOutput;
pub use perfdata::PerfDatum;
pub use range::{parse_numeric, Comparison, Range, Verdict};
pub use severity::Severity;
pub use telemetry::init_logging;
pub use threshold::{evaluate_expressions, evaluate_thresholds, ThresholdOutcome};
