//! Icinga-style threshold ranges.
//!
//! A range expression names the *acceptable* band of a measurement; a value
//! outside it violates the threshold. Supported forms:
//!
//! | expression | violates when           |
//! |------------|-------------------------|
//! | `10`       | `< 0` or `> 10`         |
//! | `10:`      | `< 10`                  |
//! | `~:10`     | `> 10`                  |
//! | `10:20`    | `< 10` or `> 20`        |
//! | `@10:20`   | `>= 10` and `<= 20`     |
//! | `5:5`      | `!= 5`                  |
//!
//! Reversed bounds (`20:10`) are read as the band between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RangeError;

/// How bound comparisons treat a value sitting exactly on a bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `<` / `>`: a value on the bound is inside the band.
    #[default]
    Strict,
    /// `<=` / `>=`: a value on the bound is outside the band.
    Inclusive,
}

impl Comparison {
    fn below(self, value: f64, bound: f64) -> bool {
        match self {
            Self::Strict => value < bound,
            Self::Inclusive => value <= bound,
        }
    }

    fn above(self, value: f64, bound: f64) -> bool {
        match self {
            Self::Strict => value > bound,
            Self::Inclusive => value >= bound,
        }
    }

    fn below_symbol(self) -> &'static str {
        match self {
            Self::Strict => "<",
            Self::Inclusive => "<=",
        }
    }

    fn above_symbol(self) -> &'static str {
        match self {
            Self::Strict => ">",
            Self::Inclusive => ">=",
        }
    }
}

/// A parsed threshold range.
///
/// # Invariants
///
/// Exactly one of `exact` or (`lower`, `upper` with at least one set) is
/// populated, and `lower <= upper` when both are set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub exact: Option<f64>,
    /// Alert inside the band instead of outside it.
    pub inverted: bool,
}

/// Outcome of testing one value against one range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub violated: bool,
    /// Which bound was crossed; empty when not violated.
    pub explanation: String,
}

impl Verdict {
    fn pass() -> Self {
        Self {
            violated: false,
            explanation: String::new(),
        }
    }

    fn fail(explanation: String) -> Self {
        Self {
            violated: true,
            explanation,
        }
    }
}

impl Range {
    /// Parse a range expression.
    pub fn parse(expression: &str) -> Result<Self, RangeError> {
        let trimmed = expression.trim();
        let (inverted, body) = match trimmed.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if body.is_empty() {
            return Err(RangeError::parse(expression, "empty range"));
        }

        let (lower, upper, has_colon) = match body.split_once(':') {
            None => (Some(0.0), Some(parse_bound(expression, body, "bound")?), false),
            Some((_, end)) if end.contains(':') => {
                return Err(RangeError::parse(expression, "more than one ':'"));
            }
            Some((start, end)) => {
                let lower = match start.trim() {
                    "~" => None,
                    "" => Some(0.0),
                    s => Some(parse_bound(expression, s, "start")?),
                };
                let upper = match end.trim() {
                    "" => None,
                    e => Some(parse_bound(expression, e, "end")?),
                };
                (lower, upper, true)
            }
        };

        let range = match (lower, upper) {
            (None, None) => {
                return Err(RangeError::parse(expression, "range has no bounds"));
            }
            (Some(l), Some(u)) if l == u && has_colon => Self {
                lower: None,
                upper: None,
                exact: Some(l),
                inverted,
            },
            (Some(l), Some(u)) if u < l => Self {
                lower: Some(u),
                upper: Some(l),
                exact: None,
                inverted,
            },
            (lower, upper) => Self {
                lower,
                upper,
                exact: None,
                inverted,
            },
        };
        debug!(expression = %expression, range = %range, "parsed threshold range");
        Ok(range)
    }

    /// Test `value` against this range.
    pub fn evaluate(&self, value: f64, comparison: Comparison) -> Verdict {
        let verdict = if let Some(exact) = self.exact {
            match (value == exact, self.inverted) {
                (false, false) => Verdict::fail(format!("{value} != {exact}")),
                (true, true) => Verdict::fail(format!("{value} == {exact}")),
                _ => Verdict::pass(),
            }
        } else {
            let crossed = self.crossed_bound(value, comparison);
            match (crossed, self.inverted) {
                (Some(explanation), false) => Verdict::fail(explanation),
                (None, true) => Verdict::fail(format!("{value} inside {self}")),
                _ => Verdict::pass(),
            }
        };
        debug!(
            value,
            range = %self,
            violated = verdict.violated,
            "evaluated threshold range"
        );
        verdict
    }

    fn crossed_bound(&self, value: f64, comparison: Comparison) -> Option<String> {
        if let Some(lower) = self.lower {
            if comparison.below(value, lower) {
                return Some(format!("{value} {} {lower}", comparison.below_symbol()));
            }
        }
        if let Some(upper) = self.upper {
            if comparison.above(value, upper) {
                return Some(format!("{value} {} {upper}", comparison.above_symbol()));
            }
        }
        None
    }
}

fn parse_bound(expression: &str, part: &str, which: &str) -> Result<f64, RangeError> {
    parse_numeric(part)
        .map_err(|_| RangeError::parse(expression, format!("{which} '{part}' is not numeric")))
}

/// Parse a measured value as a finite float.
pub fn parse_numeric(value: &str) -> Result<f64, RangeError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RangeError::NotNumeric {
            value: value.to_string(),
        }),
    }
}

impl FromStr for Range {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("@")?;
        }
        if let Some(exact) = self.exact {
            return write!(f, "{exact}:{exact}");
        }
        match (self.lower, self.upper) {
            (Some(l), Some(u)) if l == u => write!(f, "{u}"),
            (Some(l), Some(u)) if l == 0.0 && !self.inverted => write!(f, "{u}"),
            (Some(l), Some(u)) => write!(f, "{l}:{u}"),
            (Some(l), None) => write!(f, "{l}:"),
            (None, Some(u)) => write!(f, "~:{u}"),
            (None, None) => f.write_str("~:"),
        }
    }
}
