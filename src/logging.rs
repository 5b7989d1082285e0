//! Structured logging for the WSPR comparison tool.
//!
//! Provides context-rich logging with receiver/callsign identifiers,
//! timestamps, and severity levels. Supports both console output and an
//! optional append-only log file. Until `init_logger` is called every
//! logging function is a no-op, which keeps library use and tests quiet.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Message Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    WsprLive,
    Analysis,
    Config,
    System,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::WsprLive => write!(f, "WSPR"),
            Source::Analysis => write!(f, "ANALYSIS"),
            Source::Config => write!(f, "CONFIG"),
            Source::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - e.g. nothing was heard in the requested window
    Expected,
    /// Unexpected failure - service degradation, API change or bad config
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

#[derive(Debug)]
pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn format_entry(level: LogLevel, source: &Source, context: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let context_part = context.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, source, context_part, message)
    }

    fn log(&self, level: LogLevel, source: &Source, context: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, source, context, message);
        let context_part = context.map(|s| format!(" [{}]", s)).unwrap_or_default();

        // Console output. Report text goes to stdout, so diagnostics stay on stderr.
        if self.console_timestamps {
            eprintln!("{}", log_entry);
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, context_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, context_part, message),
                LogLevel::Info => eprintln!("   {}", message),
                LogLevel::Debug => eprintln!("   [DEBUG] {}", message),
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn log_with_global(level: LogLevel, source: Source, context: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, &source, context, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: Source, context: Option<&str>, message: &str) {
    log_with_global(LogLevel::Info, source, context, message);
}

/// Log a warning message
pub fn warn(source: Source, context: Option<&str>, message: &str) {
    log_with_global(LogLevel::Warning, source, context, message);
}

/// Log an error message
pub fn error(source: Source, context: Option<&str>, message: &str) {
    log_with_global(LogLevel::Error, source, context, message);
}

/// Log a debug message
pub fn debug(source: Source, context: Option<&str>, message: &str) {
    log_with_global(LogLevel::Debug, source, context, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a wspr.live fetch failure from its error message
pub fn classify_fetch_failure(error_message: &str) -> FailureType {
    if error_message.contains("no reception reports found") {
        // Quiet band or a callsign that wasn't on the air
        FailureType::Expected
    } else if error_message.contains("HTTP error") || error_message.contains("Parse error") {
        // Server trouble or a change to the response format
        FailureType::Unexpected
    } else {
        // Includes timeouts and DNS failures, which may be local
        FailureType::Unknown
    }
}

/// Log a wspr.live failure with automatic classification
pub fn log_fetch_failure(target: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_fetch_failure(&error_msg);

    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(Source::WsprLive, Some(target), &message),
        FailureType::Unexpected => error(Source::WsprLive, Some(target), &message),
        FailureType::Unknown => warn(Source::WsprLive, Some(target), &message),
    }
}

/// Log a summary of the grouping and filtering passes
pub fn log_filter_summary(total_groups: usize, kept_groups: usize) {
    let message = format!(
        "Distance filter kept {}/{} report groups",
        kept_groups, total_groups
    );

    if total_groups > 0 && kept_groups == 0 {
        warn(Source::Analysis, None, &message);
    } else {
        info(Source::Analysis, None, &message);
    }
}
