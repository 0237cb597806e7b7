//! Check result accumulator.
//!
//! A [`CheckResult`] is created when a check starts, receives findings from
//! the check body, and is rendered once by [`CheckResult::finalize`]. Its
//! severity only ever moves through [`Severity::escalate`], so no report can
//! lower a verdict another report already raised.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CheckError, Result};
use crate::output::CheckOutput;
use crate::perfdata::{self, PerfDatum};
use crate::range::{parse_numeric, Comparison, Range};
use crate::severity::Severity;
use crate::threshold::evaluate_thresholds;

/// Raw value → display label, used to make report lines readable.
pub type Lookup = BTreeMap<String, String>;

const INFO_PREFIX: &str = "Info:     ";
const DEFAULT_LABEL_WIDTH: usize = 31;

/// What to do with a measurement that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "severity", rename_all = "snake_case")]
pub enum NonNumericPolicy {
    /// Report a line at the given severity and keep going.
    Report(Severity),
    /// Return [`RangeError::NotNumeric`](crate::RangeError::NotNumeric) to the caller.
    Fail,
}

impl Default for NonNumericPolicy {
    fn default() -> Self {
        Self::Report(Severity::Ok)
    }
}

/// Per-check behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    pub non_numeric: NonNumericPolicy,
    pub comparison: Comparison,
    /// Width the `"{indent}{label}:"` column of report lines is padded to.
    pub label_width: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            non_numeric: NonNumericPolicy::default(),
            comparison: Comparison::Strict,
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }
}

/// Presentation of a single report line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat<'a> {
    pub indent: &'a str,
    pub lookup: Option<&'a Lookup>,
}

impl<'a> LineFormat<'a> {
    pub fn indent(mut self, indent: &'a str) -> Self {
        self.indent = indent;
        self
    }

    pub fn lookup(mut self, lookup: &'a Lookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    fn display(&self, raw: &str) -> String {
        match self.lookup {
            Some(lookup) => {
                let shown = lookup.get(raw).map_or("Unexpected Value", String::as_str);
                format!("{shown} ({raw})")
            }
            None => raw.to_string(),
        }
    }
}

/// Threshold and perf-data settings for [`CheckResult::report_measurement`].
#[derive(Debug, Clone, Copy)]
pub struct Measurement<'a> {
    pub warning: Option<&'a str>,
    pub critical: Option<&'a str>,
    /// Record a perf datum for parseable values.
    pub perf: bool,
    pub uom: &'a str,
    pub min: Option<&'a str>,
    pub max: Option<&'a str>,
    pub format: LineFormat<'a>,
}

impl Default for Measurement<'_> {
    fn default() -> Self {
        Self {
            warning: None,
            critical: None,
            perf: true,
            uom: "",
            min: None,
            max: None,
            format: LineFormat::default(),
        }
    }
}

impl<'a> Measurement<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning(mut self, expression: &'a str) -> Self {
        self.warning = Some(expression);
        self
    }

    pub fn critical(mut self, expression: &'a str) -> Self {
        self.critical = Some(expression);
        self
    }

    pub fn uom(mut self, uom: &'a str) -> Self {
        self.uom = uom;
        self
    }

    pub fn min(mut self, min: &'a str) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: &'a str) -> Self {
        self.max = Some(max);
        self
    }

    pub fn without_perf(mut self) -> Self {
        self.perf = false;
        self
    }

    pub fn format(mut self, format: LineFormat<'a>) -> Self {
        self.format = format;
        self
    }
}

/// Accumulated state of one check invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    severity: Severity,
    label: Option<String>,
    message_lines: Vec<String>,
    metric_lines: Vec<PerfDatum>,
    success_summaries: IndexSet<String>,
    failure_summaries: IndexSet<String>,
    options: CheckOptions,
}

impl Default for CheckResult {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckResult {
    /// Unlabelled result in the `Unknown` state.
    pub fn new() -> Self {
        Self {
            severity: Severity::Unknown,
            label: None,
            message_lines: Vec::new(),
            metric_lines: Vec::new(),
            success_summaries: IndexSet::new(),
            failure_summaries: IndexSet::new(),
            options: CheckOptions::default(),
        }
    }

    /// Result whose rendered first line starts with `"{label} check"`.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new()
        }
    }

    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    pub fn message_lines(&self) -> &[String] {
        &self.message_lines
    }

    pub fn metric_lines(&self) -> &[PerfDatum] {
        &self.metric_lines
    }

    pub fn success_summaries(&self) -> impl Iterator<Item = &str> {
        self.success_summaries.iter().map(String::as_str)
    }

    pub fn failure_summaries(&self) -> impl Iterator<Item = &str> {
        self.failure_summaries.iter().map(String::as_str)
    }

    // -----------------------------------------------------------------------
    // Severity
    // -----------------------------------------------------------------------

    /// Unknown → Ok; a no-op in every other state.
    pub fn set_ok(&mut self) -> Severity {
        self.set_severity(Severity::Ok)
    }

    /// Raise to Warning unless already Critical.
    pub fn set_warning(&mut self) -> Severity {
        self.set_severity(Severity::Warning)
    }

    pub fn set_critical(&mut self) -> Severity {
        self.set_severity(Severity::Critical)
    }

    /// Request `requested` and return the (possibly unchanged) severity.
    pub fn set_severity(&mut self, requested: Severity) -> Severity {
        let previous = self.severity;
        self.severity = previous.escalate(requested);
        debug!(
            from = %previous,
            requested = %requested,
            to = %self.severity,
            "severity request"
        );
        self.severity
    }

    // -----------------------------------------------------------------------
    // Messages and summaries
    // -----------------------------------------------------------------------

    /// Append a line verbatim.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.message_lines.push(text.into());
    }

    /// Append `"{Title}: {text}"`, titled with `severity` or, when `None`,
    /// the current severity. With `escalate` the severity is also requested.
    pub fn add_message(&mut self, text: &str, severity: Option<Severity>, escalate: bool) {
        let severity = severity.unwrap_or(self.severity);
        if escalate {
            self.set_severity(severity);
        }
        self.message_lines
            .push(format!("{}: {text}", severity.title()));
    }

    pub fn add_success_summary(&mut self, fragment: impl Into<String>) {
        self.success_summaries.insert(fragment.into());
    }

    pub fn add_failure_summary(&mut self, fragment: impl Into<String>) {
        self.failure_summaries.insert(fragment.into());
    }

    // -----------------------------------------------------------------------
    // Reports
    // -----------------------------------------------------------------------

    fn label_data_line(
        &self,
        label: &str,
        value: Option<&str>,
        extra: Option<&str>,
        format: &LineFormat<'_>,
    ) -> String {
        let indent = format.indent;
        let head = format!("{indent}{label}:");
        let width = self.options.label_width;
        let shown = value.map(|v| format.display(v));
        match (shown, extra.filter(|e| !e.is_empty())) {
            (Some(v), Some(e)) => format!("{head:<width$} {v} {e}"),
            (Some(v), None) => format!("{head:<width$} {v}"),
            (None, Some(e)) => format!("{head:<width$} {e}"),
            (None, None) => format!("{indent}{label}"),
        }
    }

    /// Append a labelled value line.
    ///
    /// With `severity` set the line carries its title-case prefix and the
    /// severity is requested; without it the line is informational and the
    /// severity is left alone.
    pub fn report_line(
        &mut self,
        label: &str,
        value: Option<&str>,
        severity: Option<Severity>,
        extra: Option<&str>,
        format: &LineFormat<'_>,
    ) -> Severity {
        let line = self.label_data_line(label, value, extra, format);
        match severity {
            Some(severity) => self.add_message(&line, Some(severity), true),
            None => self.add_text(format!("{INFO_PREFIX}{line}")),
        }
        self.severity
    }

    /// Request `severity` when `value` is not one of `acceptable`, otherwise
    /// report it as Ok.
    pub fn report_line_if_not<S: AsRef<str>>(
        &mut self,
        severity: Severity,
        label: &str,
        value: &str,
        acceptable: &[S],
        format: &LineFormat<'_>,
    ) -> Severity {
        let line = self.label_data_line(label, Some(value), None, format);
        if acceptable.iter().any(|a| a.as_ref() == value) {
            self.add_message(&line, Some(Severity::Ok), true);
        } else {
            let expected = acceptable
                .iter()
                .map(|a| format.display(a.as_ref()))
                .collect::<Vec<_>>()
                .join(",");
            debug!(label, value, expected = %expected, "value not acceptable");
            self.add_message(
                &format!("{line} (expected: {expected})"),
                Some(severity),
                true,
            );
        }
        self.severity
    }

    /// Evaluate a measured value against warning/critical ranges, record its
    /// perf datum and report it.
    ///
    /// Malformed threshold expressions are always returned as errors. A
    /// value that is not numeric follows [`CheckOptions::non_numeric`].
    pub fn report_measurement(
        &mut self,
        label: &str,
        value: &str,
        measurement: &Measurement<'_>,
    ) -> Result<Severity> {
        let warning = measurement.warning.map(Range::parse).transpose()?;
        let critical = measurement.critical.map(Range::parse).transpose()?;
        let value = value.trim();

        let (severity, explanation) = match parse_numeric(value) {
            Ok(numeric) => {
                let outcome = evaluate_thresholds(
                    numeric,
                    warning.as_ref(),
                    critical.as_ref(),
                    self.options.comparison,
                );
                if measurement.perf {
                    self.record_metric(PerfDatum {
                        label: label.to_string(),
                        value: value.to_string(),
                        uom: Some(measurement.uom.to_string()),
                        warn: measurement.warning.map(str::to_string),
                        crit: measurement.critical.map(str::to_string),
                        min: measurement.min.map(str::to_string),
                        max: measurement.max.map(str::to_string),
                    });
                }
                (outcome.severity, outcome.explanation)
            }
            Err(err) => match self.options.non_numeric {
                NonNumericPolicy::Fail => return Err(CheckError::Range(err)),
                NonNumericPolicy::Report(severity) => {
                    let explanation = format!("Could not get value from '{value}'");
                    warn!("{label}: {explanation}");
                    (severity, explanation)
                }
            },
        };

        let mut line =
            self.label_data_line(label, Some(value), Some(measurement.uom), &measurement.format);
        if !explanation.is_empty() {
            line.push_str(&format!(" ({explanation})"));
        }
        self.add_message(&line, Some(severity), true);
        Ok(self.severity)
    }

    /// Append one perf-data entry.
    pub fn record_metric(&mut self, datum: PerfDatum) {
        self.metric_lines.push(datum);
    }

    // -----------------------------------------------------------------------
    // Merge and finalize
    // -----------------------------------------------------------------------

    /// Fold an independently accumulated result into this one.
    pub fn absorb(&mut self, other: CheckResult) {
        let previous = self.severity;
        self.severity = previous.merge(other.severity);
        debug!(from = %previous, other = %other.severity, to = %self.severity, "absorbed result");
        self.message_lines.extend(other.message_lines);
        self.metric_lines.extend(other.metric_lines);
        self.success_summaries.extend(other.success_summaries);
        self.failure_summaries.extend(other.failure_summaries);
    }

    /// Render the final output.
    ///
    /// `exit_state` replaces the accumulated severity only when its code is
    /// higher, when nothing was decided yet (`Unknown`), or when `force` is
    /// set. Rendering does not mutate the result.
    pub fn finalize(&self, exit_state: Option<Severity>, force: bool) -> CheckOutput {
        let mut severity = self.severity;
        if let Some(requested) = exit_state {
            if severity.code() < requested.code() || severity == Severity::Unknown || force {
                severity = requested;
            }
        }

        let summaries = if severity == Severity::Ok {
            &self.success_summaries
        } else {
            &self.failure_summaries
        };
        let summary = summaries
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let first_line = match &self.label {
            Some(label) => format!("{label} check {summary}"),
            None => summary,
        };

        info!(severity = %severity, "exiting check with state {}", severity.code());
        CheckOutput {
            severity,
            message: format!(
                "{}: {first_line}\n{}",
                severity.label(),
                self.message_lines.join("\n")
            ),
            metrics: perfdata::render(&self.metric_lines),
        }
    }

    /// [`finalize`](Self::finalize) with a numeric exit state, validated
    /// against the severity codes.
    pub fn finalize_with_code(&self, exit_state: i64, force: bool) -> Result<CheckOutput> {
        let requested = Severity::from_code(exit_state)?;
        Ok(self.finalize(Some(requested), force))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RangeError;

    fn pad(head: &str) -> String {
        format!("{head:<31}")
    }

    #[test]
    fn test_initial_state() {
        let check = CheckResult::new();
        assert_eq!(check.severity(), Severity::Unknown);
        assert!(check.message_lines().is_empty());
        assert!(check.metric_lines().is_empty());
        assert_eq!(check.success_summaries().count(), 0);
        assert_eq!(check.failure_summaries().count(), 0);
        assert_eq!(check.label(), None);
        assert_eq!(CheckResult::labelled("Example").label(), Some("Example"));
    }

    #[test]
    fn test_state_transitions() {
        let mut check = CheckResult::new();
        assert_eq!(check.set_ok(), Severity::Ok);
        assert_eq!(check.set_warning(), Severity::Warning);
        assert_eq!(check.set_ok(), Severity::Warning);
        assert_eq!(check.set_critical(), Severity::Critical);
        assert_eq!(check.set_ok(), Severity::Critical);
        assert_eq!(check.set_warning(), Severity::Critical);
        assert_eq!(check.set_severity(Severity::Unknown), Severity::Critical);
    }

    #[test]
    fn test_add_message_prefixes_with_title_case() {
        let mut check = CheckResult::new();
        check.add_message("Test Message", Some(Severity::Ok), true);
        check.add_message("inherits current", None, false);
        check.add_message("not escalated", Some(Severity::Critical), false);
        assert_eq!(
            check.message_lines(),
            ["Ok: Test Message", "Ok: inherits current", "Critical: not escalated"]
        );
        assert_eq!(check.severity(), Severity::Ok);
    }

    #[test]
    fn test_finalize_matches_plugin_layout() {
        let mut check = CheckResult::labelled("Test");
        check.add_message("Test Message", Some(Severity::Ok), true);
        check.record_metric(PerfDatum::new("test", 5));
        let out = check.finalize(None, false);
        assert_eq!(out.severity, Severity::Ok);
        assert_eq!(out.message, "OK: Test check \nOk: Test Message");
        assert_eq!(out.metrics, "test=5;;;; ");
    }

    #[test]
    fn test_finalize_unlabelled_without_lines() {
        let out = CheckResult::new().finalize(None, false);
        assert_eq!(out.severity, Severity::Unknown);
        assert_eq!(out.message, "UNKNOWN: \n");
        assert_eq!(out.metrics, "");
    }

    #[test]
    fn test_exit_state_only_escalates_unless_forced() {
        let mut check = CheckResult::new();
        check.set_warning();
        assert_eq!(check.finalize(Some(Severity::Ok), false).severity, Severity::Warning);
        assert_eq!(
            check.finalize(Some(Severity::Critical), false).severity,
            Severity::Critical
        );
        assert_eq!(check.finalize(Some(Severity::Ok), true).severity, Severity::Ok);
        // Unknown has the highest code, so it replaces a decided state.
        assert_eq!(
            check.finalize(Some(Severity::Unknown), false).severity,
            Severity::Unknown
        );
        // Nothing decided yet: any exit state applies.
        assert_eq!(
            CheckResult::new().finalize(Some(Severity::Ok), false).severity,
            Severity::Ok
        );
    }

    #[test]
    fn test_finalize_with_invalid_code() {
        let check = CheckResult::new();
        assert_eq!(
            check.finalize_with_code(9, false),
            Err(CheckError::InvalidStateRequest(9))
        );
        assert_eq!(
            check.finalize_with_code(2, false).unwrap().severity,
            Severity::Critical
        );
    }

    #[test]
    fn test_summary_picks_side_by_final_severity() {
        let mut check = CheckResult::labelled("Disk");
        check.add_success_summary("all mounted");
        check.add_failure_summary("/var full");
        check.set_ok();
        assert!(check
            .finalize(None, false)
            .message
            .starts_with("OK: Disk check all mounted\n"));
        check.set_critical();
        assert!(check
            .finalize(None, false)
            .message
            .starts_with("CRITICAL: Disk check /var full\n"));
    }

    #[test]
    fn test_report_line_info_does_not_escalate() {
        let mut check = CheckResult::new();
        let severity = check.report_line(
            "Uptime",
            Some("12"),
            None,
            Some("days"),
            &LineFormat::default(),
        );
        assert_eq!(severity, Severity::Unknown);
        assert_eq!(
            check.message_lines(),
            [format!("Info:     {} 12 days", pad("Uptime:"))]
        );
    }

    #[test]
    fn test_report_line_with_severity_and_indent() {
        let mut check = CheckResult::new();
        check.report_line(
            "Fan",
            Some("failed"),
            Some(Severity::Warning),
            None,
            &LineFormat::default().indent("  "),
        );
        assert_eq!(check.severity(), Severity::Warning);
        assert_eq!(
            check.message_lines(),
            [format!("Warning: {} failed", pad("  Fan:"))]
        );
    }

    #[test]
    fn test_report_line_without_value_or_extra() {
        let mut check = CheckResult::new();
        check.report_line("Section", None, None, None, &LineFormat::default());
        assert_eq!(check.message_lines(), ["Info:     Section"]);
    }

    #[test]
    fn test_lookup_is_display_only() {
        let lookup: Lookup = [("1".to_string(), "Up".to_string())].into();
        let format = LineFormat::default().lookup(&lookup);
        let mut check = CheckResult::new();
        check.report_line("Link", Some("1"), Some(Severity::Ok), None, &format);
        check.report_line("Link", Some("7"), Some(Severity::Ok), None, &format);
        assert_eq!(check.severity(), Severity::Ok);
        assert_eq!(
            check.message_lines(),
            [
                format!("Ok: {} Up (1)", pad("Link:")),
                format!("Ok: {} Unexpected Value (7)", pad("Link:")),
            ]
        );
    }

    #[test]
    fn test_report_line_if_not() {
        let lookup: Lookup = [
            ("1".to_string(), "Up".to_string()),
            ("2".to_string(), "Down".to_string()),
        ]
        .into();
        let format = LineFormat::default().lookup(&lookup);
        let mut check = CheckResult::new();

        check.report_line_if_not(Severity::Critical, "Link", "1", &["1"], &format);
        assert_eq!(check.severity(), Severity::Ok);

        check.report_line_if_not(Severity::Critical, "Link", "2", &["1", "3"], &format);
        assert_eq!(check.severity(), Severity::Critical);
        assert_eq!(
            check.message_lines()[1],
            format!(
                "Critical: {} Down (2) (expected: Up (1),Unexpected Value (3))",
                pad("Link:")
            )
        );

        // An acceptable value afterwards never lowers the verdict.
        check.report_line_if_not(Severity::Warning, "Link", "1", &["1"], &format);
        assert_eq!(check.severity(), Severity::Critical);
        assert!(check.message_lines()[2].starts_with("Ok: "));
    }

    #[test]
    fn test_report_measurement_records_perf_and_explanation() {
        let mut check = CheckResult::new();
        let severity = check
            .report_measurement(
                "load",
                "7.5",
                &Measurement::new().warning("5").critical("10").min("0"),
            )
            .unwrap();
        assert_eq!(severity, Severity::Warning);
        assert_eq!(
            check.message_lines(),
            [format!("Warning: {} 7.5 (7.5 > 5)", pad("load:"))]
        );
        assert_eq!(perfdata::render(check.metric_lines()), "load=7.5;5;10;0; ");
    }

    #[test]
    fn test_report_measurement_trims_value_for_perf_data() {
        let mut check = CheckResult::new();
        check
            .report_measurement("x", " 5 ", &Measurement::new().warning("10"))
            .unwrap();
        assert_eq!(perfdata::render(check.metric_lines()), "x=5;10;;; ");
        assert_eq!(check.message_lines(), [format!("Ok: {} 5", pad("x:"))]);
    }

    #[test]
    fn test_report_measurement_with_uom_and_no_perf() {
        let mut check = CheckResult::new();
        check
            .report_measurement(
                "rtt",
                "12",
                &Measurement::new().critical("~:100").uom("ms").without_perf(),
            )
            .unwrap();
        assert_eq!(check.severity(), Severity::Ok);
        assert!(check.metric_lines().is_empty());
        assert_eq!(check.message_lines(), [format!("Ok: {} 12 ms", pad("rtt:"))]);
    }

    #[test]
    fn test_non_numeric_measurement_is_lenient_by_default() {
        let mut check = CheckResult::new();
        check.set_warning();
        let severity = check
            .report_measurement("temp", "n/a", &Measurement::new().critical("0:50"))
            .unwrap();
        assert_eq!(severity, Severity::Warning);
        assert!(check.metric_lines().is_empty());
        assert_eq!(
            check.message_lines(),
            [format!("Ok: {} n/a (Could not get value from 'n/a')", pad("temp:"))]
        );
    }

    #[test]
    fn test_non_numeric_measurement_policies() {
        let mut strict = CheckResult::new().with_options(CheckOptions {
            non_numeric: NonNumericPolicy::Report(Severity::Critical),
            ..CheckOptions::default()
        });
        assert_eq!(
            strict
                .report_measurement("temp", "n/a", &Measurement::new())
                .unwrap(),
            Severity::Critical
        );

        let mut failing = CheckResult::new().with_options(CheckOptions {
            non_numeric: NonNumericPolicy::Fail,
            ..CheckOptions::default()
        });
        let err = failing
            .report_measurement("temp", "n/a", &Measurement::new())
            .unwrap_err();
        assert!(matches!(
            err,
            CheckError::Range(RangeError::NotNumeric { .. })
        ));
        assert!(failing.message_lines().is_empty());
    }

    #[test]
    fn test_malformed_threshold_is_surfaced_before_value_check() {
        let mut check = CheckResult::new();
        let err = check
            .report_measurement("temp", "n/a", &Measurement::new().warning("1:2:3"))
            .unwrap_err();
        assert!(matches!(err, CheckError::Range(RangeError::Parse { .. })));
        assert_eq!(check.severity(), Severity::Unknown);
    }

    #[test]
    fn test_inclusive_comparison_option() {
        let mut check = CheckResult::new().with_options(CheckOptions {
            comparison: Comparison::Inclusive,
            ..CheckOptions::default()
        });
        check
            .report_measurement("q", "20", &Measurement::new().warning("10:20"))
            .unwrap();
        assert_eq!(check.severity(), Severity::Warning);
    }

    #[test]
    fn test_absorb_merges_sub_results() {
        let mut parent = CheckResult::labelled("Cluster");
        parent.set_ok();
        parent.add_failure_summary("node-b down");

        let mut node_a = CheckResult::new();
        node_a.add_text("node-a fine");
        let mut node_b = CheckResult::new();
        node_b.add_message("node-b down", Some(Severity::Critical), true);
        node_b.add_failure_summary("node-b down");
        node_b.record_metric(PerfDatum::new("nodes_up", 1));

        parent.absorb(node_a);
        assert_eq!(parent.severity(), Severity::Ok);
        parent.absorb(node_b);
        assert_eq!(parent.severity(), Severity::Critical);
        assert_eq!(parent.message_lines(), ["node-a fine", "Critical: node-b down"]);
        assert_eq!(parent.failure_summaries().count(), 1);
        assert_eq!(parent.metric_lines().len(), 1);
    }
}
