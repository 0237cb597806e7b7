//! Warning/critical threshold evaluation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RangeError;
use crate::range::{Comparison, Range};
use crate::severity::Severity;

/// Severity and explanation produced by a warning/critical pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdOutcome {
    pub severity: Severity,
    /// Explanation of the dominant violation; empty when `severity` is Ok.
    pub explanation: String,
}

/// Evaluate `value` against optional warning and critical ranges.
///
/// Warning is evaluated first and critical after it, so a violated critical
/// range always determines both severity and explanation. A missing range is
/// never violated.
pub fn evaluate_thresholds(
    value: f64,
    warning: Option<&Range>,
    critical: Option<&Range>,
    comparison: Comparison,
) -> ThresholdOutcome {
    let mut outcome = ThresholdOutcome {
        severity: Severity::Ok,
        explanation: String::new(),
    };

    if let Some(range) = warning {
        let verdict = range.evaluate(value, comparison);
        if verdict.violated {
            outcome.severity = Severity::Warning;
            outcome.explanation = verdict.explanation;
        }
    }

    if let Some(range) = critical {
        let verdict = range.evaluate(value, comparison);
        if verdict.violated {
            outcome.severity = Severity::Critical;
            outcome.explanation = verdict.explanation;
        }
    }

    debug!(
        value,
        severity = %outcome.severity,
        explanation = %outcome.explanation,
        "evaluated thresholds"
    );
    outcome
}

/// Parse optional warning/critical expressions, then evaluate `value`.
pub fn evaluate_expressions(
    value: f64,
    warning: Option<&str>,
    critical: Option<&str>,
    comparison: Comparison,
) -> Result<ThresholdOutcome, RangeError> {
    let warning = warning.map(Range::parse).transpose()?;
    let critical = critical.map(Range::parse).transpose()?;
    Ok(evaluate_thresholds(
        value,
        warning.as_ref(),
        critical.as_ref(),
        comparison,
    ))
}
