// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process logging setup for cron-driven scripts.
//!
//! Installs the classic three-way split: everything goes to a logfile,
//! routine output (info, and debug when enabled) goes to stdout, and
//! warnings and errors go to stderr so that cron mails only the failures.
//!
//! # Example
//!
//! ```no_run
//! use homeops::runtime::{init_logging, LoggingOptions};
//!
//! # fn main() -> homeops::Result<()> {
//! init_logging(&LoggingOptions::new("/var/log/myscript.log").with_debug(true))?;
//! tracing::info!("starting up");
//! # Ok(())
//! # }
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::filter::{filter_fn, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::error::{OpsError, Result};

/// Options for [`init_logging`].
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// File receiving every record at or above the active level.
    pub logfile: PathBuf,
    /// Enable debug-level records.
    pub debug: bool,
    /// Include the source file in each record.
    pub file_info: bool,
    /// Include the source line number in each record.
    pub line_numbers: bool,
}

impl LoggingOptions {
    /// Create options with the given logfile and the defaults: info level,
    /// file info and line numbers on.
    #[must_use]
    pub fn new(logfile: impl Into<PathBuf>) -> Self {
        Self {
            logfile: logfile.into(),
            debug: false,
            file_info: true,
            line_numbers: true,
        }
    }

    /// Enable or disable debug-level records.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Include or omit the source file in each record.
    #[must_use]
    pub fn with_file_info(mut self, enabled: bool) -> Self {
        self.file_info = enabled;
        self
    }

    /// Include or omit the source line number in each record.
    #[must_use]
    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }
}

/// Install the global subscriber described by `options`.
///
/// # Errors
///
/// Returns an error if the logfile cannot be opened or a global subscriber
/// is already installed.
pub fn init_logging(options: &LoggingOptions) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&options.logfile)
        .map_err(|e| {
            OpsError::Config(format!(
                "Failed to open logfile {}: {e}",
                options.logfile.display()
            ))
        })?;

    let base_level = if options.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let debug = options.debug;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_file(options.file_info)
        .with_line_number(options.line_numbers)
        .with_filter(base_level);

    // Stdout carries only the routine levels; warnings and above go to
    // stderr so cron output stays quiet on success.
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_file(options.file_info)
        .with_line_number(options.line_numbers)
        .with_filter(filter_fn(move |meta| {
            *meta.level() == Level::INFO || (debug && *meta.level() == Level::DEBUG)
        }));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(options.file_info)
        .with_line_number(options.line_numbers)
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| OpsError::Config(format!("Failed to install logger: {e}")))?;
    Ok(())
}
