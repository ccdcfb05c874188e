//! Internal logging system for Strata
//!
//! This module provides a flexible logging system with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Thread-safe logging with RwLock
//! - File and line information for detailed ERROR logs

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to route encoder diagnostics elsewhere (file, GPU
/// debugger overlay, test capture, ...).
///
/// # Example
///
/// ```no_run
/// use strata_render::strata::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "strata::encoder", "strata::vulkan")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-barrier / per-cache-hit detail
    Trace,

    /// Per-encode summaries
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (potential issues)
    Warn,

    /// Error messages (critical issues with file:line details)
    Error,
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render an entry as a single line (without color codes when `colored`
    /// is disabled through `colored::control`)
    pub fn format_entry(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            )
        } else {
            format!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message)
        }
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", Self::format_entry(entry));
        } else {
            println!("{}", Self::format_entry(entry));
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically filtered out)
#[macro_export]
macro_rules! strata_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::strata::Strata::log(
            $crate::strata::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
#[macro_export]
macro_rules! strata_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::strata::Strata::log(
            $crate::strata::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
#[macro_export]
macro_rules! strata_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::strata::Strata::log(
            $crate::strata::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (potential issues)
#[macro_export]
macro_rules! strata_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::strata::Strata::log(
            $crate::strata::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! strata_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::strata::Strata::log_detailed(
            $crate::strata::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR message and build the matching `Error` variant
///
/// # Example
///
/// ```ignore
/// let err = strata_err!(PassCreationFailed, "strata::vulkan", "vkCreateRenderPass: {:?}", result);
/// ```
#[macro_export]
macro_rules! strata_err {
    ($kind:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::strata::Strata::log_detailed(
            $crate::strata::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::strata::Error::$kind(message)
    }};
}

/// Log an ERROR message and return early with the matching `Error` variant
#[macro_export]
macro_rules! strata_bail {
    ($kind:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::strata_err!($kind, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
