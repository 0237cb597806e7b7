//! Tracing initialisation for check binaries.
//!
//! Call [`init_logging`] once at program start. It installs a registry with
//! up to two sinks:
//!
//! * a stderr layer at DEBUG when `screen_debug` is set, and
//! * an append-mode file layer at the configured level (or `RUST_LOG`), as
//!   plain text or newline-delimited JSON.
//!
//! Later calls leave the first subscriber in place. A file sink that cannot
//! be opened is dropped with a warning, except for an existing log file
//! without write permission, which is reported to the caller.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Mutex;

use tracing::{debug, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;
use crate::error::ConfigError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Open `path` for appending, creating it and its parent directories when
/// missing.
///
/// Only an existing file that cannot be written maps to
/// [`ConfigError::LogFileNotWritable`]; every other failure is
/// [`ConfigError::Io`].
pub fn open_log_file(path: &Path) -> Result<File, ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| match err.kind() {
            ErrorKind::PermissionDenied if path.exists() => {
                ConfigError::LogFileNotWritable(path.to_path_buf())
            }
            _ => ConfigError::Io(err),
        })
}

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut dropped_sink = None;

    if config.screen_debug {
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(LevelFilter::DEBUG)
                .boxed(),
        );
    }

    let log_file = if config.log_file_enabled {
        match open_log_file(&config.log_file) {
            Ok(file) => Some(file),
            Err(err @ ConfigError::LogFileNotWritable(_)) => return Err(err),
            Err(err) => {
                dropped_sink = Some(err);
                None
            }
        }
    } else {
        None
    };

    if let Some(file) = log_file {
        let level = config.effective_level();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_str()));
        let layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file));
        if config.json {
            layers.push(layer.json().with_filter(filter).boxed());
        } else {
            layers.push(layer.with_filter(filter).boxed());
        }
    }

    tracing_subscriber::registry().with(layers).try_init().ok();

    if let Some(err) = dropped_sink {
        warn!(
            log_file = %config.log_file.display(),
            error = %err,
            "log file unavailable, continuing without file logging"
        );
    }

    debug!(
        level = %config.effective_level(),
        screen_debug = config.screen_debug,
        log_file_enabled = config.log_file_enabled,
        log_file = %config.log_file.display(),
        json = config.json,
        "logging initialised"
    );
    Ok(())
}
