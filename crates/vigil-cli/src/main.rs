//! Vigil - monitoring check driver
//!
//! Runs a check built on `vigil-core`, prints the plugin output and exits
//! with the severity code (0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN).
//!
//! ## Commands
//!
//! - `measure`: evaluate a value against warning/critical ranges
//! - `expect`: require a value to be one of an accepted set
//! - `day-of-week`: compare today with an expected weekday

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, Weekday};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use vigil_core::{
    init_logging, CheckOptions, CheckOutput, CheckResult, Comparison, ConfigError, LineFormat,
    LoggingConfig, Lookup, Measurement, NonNumericPolicy, Severity, LOG_LEVELS,
};

/// sysexits(3) code for configuration errors.
const EX_CONFIG: u8 = 78;

#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Nagios/Icinga compatible monitoring checks", long_about = None)]
struct Cli {
    #[command(flatten)]
    logging: LoggingArgs,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plugin text (`message|perfdata`)
    Text,
    /// The check output as a JSON object
    Json,
}

#[derive(Args, Debug)]
struct LoggingArgs {
    /// Sets the log level to DEBUG
    #[arg(long, global = true)]
    debug: bool,

    /// Enables screen logging to standard error
    #[arg(long, global = true)]
    enable_screen_debug: bool,

    /// Disables file logging
    #[arg(long, global = true)]
    disable_log_file: bool,

    /// The path to the log file
    #[arg(long, global = true, env = "VIGIL_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// The logging level
    #[arg(long, global = true, ignore_case = true, value_parser = PossibleValuesParser::new(LOG_LEVELS))]
    log_level: Option<String>,

    /// Write the log file as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// JSON logging configuration; command-line flags override it
    #[arg(long, global = true, env = "VIGIL_LOG_CONFIG")]
    log_config: Option<PathBuf>,
}

impl LoggingArgs {
    fn to_config(&self) -> Result<LoggingConfig> {
        let mut config = match &self.log_config {
            Some(path) => LoggingConfig::from_json_file(path)
                .with_context(|| format!("Failed to load logging config {}", path.display()))?,
            None => LoggingConfig::default(),
        };
        config.debug |= self.debug;
        config.screen_debug |= self.enable_screen_debug;
        config.json |= self.log_json;
        if self.disable_log_file {
            config.log_file_enabled = false;
        }
        if let Some(path) = &self.log_file {
            config.log_file = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.level = level.to_ascii_uppercase();
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a measured value against warning/critical threshold ranges
    Measure(MeasureArgs),

    /// Require a value to be one of an accepted set
    Expect(ExpectArgs),

    /// Check that today is the expected day of the week
    DayOfWeek {
        /// Day of the week
        #[arg(long)]
        day: String,
    },
}

#[derive(Args, Debug)]
struct MeasureArgs {
    /// Label used in the message and perf data
    #[arg(short, long)]
    label: String,

    /// Measured value
    #[arg(long, allow_hyphen_values = true)]
    value: String,

    /// Warning range (Icinga syntax, e.g. `10:20`, `@10:20`, `~:20`)
    #[arg(short, long, allow_hyphen_values = true)]
    warning: Option<String>,

    /// Critical range
    #[arg(short, long, allow_hyphen_values = true)]
    critical: Option<String>,

    /// Unit of measurement (s, ms, us, %, B, KB, MB, TB, c)
    #[arg(long, default_value = "")]
    uom: String,

    /// Minimum possible value, for perf data
    #[arg(long, allow_hyphen_values = true)]
    min: Option<String>,

    /// Maximum possible value, for perf data
    #[arg(long, allow_hyphen_values = true)]
    max: Option<String>,

    /// Do not emit perf data
    #[arg(long)]
    no_perf: bool,

    /// Treat a value sitting on a bound as outside the range
    #[arg(long)]
    inclusive: bool,

    /// Report a non-numeric value as CRITICAL instead of OK
    #[arg(long)]
    strict: bool,

    /// Check name shown on the first output line
    #[arg(long)]
    check_type: Option<String>,

    /// Exit state code applied on finalize (only escalates unless forced)
    #[arg(long)]
    exit_state: Option<i64>,

    /// Apply --exit-state even if it lowers the severity
    #[arg(long, requires = "exit_state")]
    force_state: bool,
}

#[derive(Args, Debug)]
struct ExpectArgs {
    /// Label used in the message
    #[arg(short, long)]
    label: String,

    /// Observed value
    #[arg(long, allow_hyphen_values = true)]
    value: String,

    /// Accepted values, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    acceptable: Vec<String>,

    /// Severity requested when the value is not accepted
    #[arg(long, default_value = "critical")]
    severity: Severity,

    /// Display names for raw values, as `raw=name`
    #[arg(long = "lookup", value_parser = parse_lookup_pair)]
    lookup: Vec<(String, String)>,

    /// Check name shown on the first output line
    #[arg(long)]
    check_type: Option<String>,
}

fn parse_lookup_pair(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected raw=name, got '{raw}'"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.logging.to_config() {
        Ok(config) => config,
        Err(err) => {
            println!("UNKNOWN: {err:#}");
            return ExitCode::from(Severity::Unknown.code());
        }
    };
    if let Err(err) = init_logging(&config) {
        if let Some(code) = logging_failure_code(&err) {
            println!("{err}");
            return ExitCode::from(code);
        }
    }

    let output = run(&cli.command).unwrap_or_else(|err| unknown_output(&err));
    emit(&output, cli.output);
    ExitCode::from(output.severity.code())
}

/// Exit code that aborts the run for a logging setup error. Only an existing
/// log file without write permission stops the check; other failures leave
/// it running without the file sink.
fn logging_failure_code(err: &ConfigError) -> Option<u8> {
    match err {
        ConfigError::LogFileNotWritable(_) => Some(EX_CONFIG),
        ConfigError::Io(_) | ConfigError::Json(_) => None,
    }
}

fn run(command: &Commands) -> Result<CheckOutput> {
    match command {
        Commands::Measure(args) => cmd_measure(args),
        Commands::Expect(args) => cmd_expect(args),
        Commands::DayOfWeek { day } => Ok(check_day_of_week(Local::now().weekday(), day)),
    }
}

fn new_check(check_type: Option<&str>) -> CheckResult {
    match check_type {
        Some(label) => CheckResult::labelled(label),
        None => CheckResult::new(),
    }
}

fn cmd_measure(args: &MeasureArgs) -> Result<CheckOutput> {
    let options = CheckOptions {
        non_numeric: if args.strict {
            NonNumericPolicy::Report(Severity::Critical)
        } else {
            NonNumericPolicy::default()
        },
        comparison: if args.inclusive {
            Comparison::Inclusive
        } else {
            Comparison::Strict
        },
        ..CheckOptions::default()
    };
    let mut check = new_check(args.check_type.as_deref()).with_options(options);

    let measurement = Measurement {
        warning: args.warning.as_deref(),
        critical: args.critical.as_deref(),
        perf: !args.no_perf,
        uom: &args.uom,
        min: args.min.as_deref(),
        max: args.max.as_deref(),
        format: LineFormat::default(),
    };
    let severity = check
        .report_measurement(&args.label, &args.value, &measurement)
        .with_context(|| format!("Failed to evaluate {}", args.label))?;
    debug!(label = %args.label, severity = %severity, "measurement reported");

    match args.exit_state {
        Some(code) => Ok(check.finalize_with_code(code, args.force_state)?),
        None => Ok(check.finalize(None, false)),
    }
}

fn cmd_expect(args: &ExpectArgs) -> Result<CheckOutput> {
    let mut check = new_check(args.check_type.as_deref());
    let lookup: Lookup = args.lookup.iter().cloned().collect();
    let format = if lookup.is_empty() {
        LineFormat::default()
    } else {
        LineFormat::default().lookup(&lookup)
    };
    check.report_line_if_not(
        args.severity,
        &args.label,
        &args.value,
        &args.acceptable,
        &format,
    );
    if check.severity() == Severity::Ok {
        check.add_success_summary(format!("{} is {}", args.label, args.value));
    } else {
        check.add_failure_summary(format!("unexpected {} {}", args.label, args.value));
    }
    Ok(check.finalize(None, false))
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// OK when `wanted` is today, WARNING when it is tomorrow, CRITICAL
/// otherwise or when `wanted` is not a weekday name.
fn check_day_of_week(today: Weekday, wanted: &str) -> CheckOutput {
    let mut check = CheckResult::labelled("Day of the week");
    let current = weekday_name(today);
    let wanted = capitalize(wanted);
    info!("today is {current}");

    check.add_text(format!("Info: Today is {current}"));

    if wanted == current {
        check.add_message(&format!("We want it to be {wanted}"), Some(Severity::Ok), true);
        check.add_success_summary(format!("matches {wanted}"));
        return check.finalize(None, false);
    }

    check.add_failure_summary(format!("{wanted} isn't today"));
    let Some(target) = WEEK.iter().copied().find(|d| weekday_name(*d) == wanted) else {
        check.add_failure_summary(format!("invalid day {wanted}"));
        check.add_message(
            &format!("Day \"{wanted}\" isn't even a real day"),
            Some(Severity::Critical),
            true,
        );
        return check.finalize(None, false);
    };

    let days_until = (target.number_from_monday() + 7 - today.number_from_monday()) % 7;
    debug!(days_until, "days until target day");
    let severity = if days_until == 1 {
        Severity::Warning
    } else {
        Severity::Critical
    };
    check.add_message(
        &format!("Day {wanted} is {days_until} day(s) away"),
        Some(severity),
        true,
    );
    check.finalize(None, false)
}

fn unknown_output(err: &anyhow::Error) -> CheckOutput {
    let mut check = CheckResult::new();
    check.add_failure_summary(format!("{err:#}"));
    check.finalize(None, false)
}

fn emit(output: &CheckOutput, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{output}"),
        OutputFormat::Json => match serde_json::to_string(output) {
            Ok(json) => println!("{json}"),
            Err(_) => println!("{output}"),
        },
    }
}
