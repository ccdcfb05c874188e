//! Unit tests for log.rs and the Strata logging facade
//!
//! Tests touching the global logger are serialized; captured entries are
//! filtered by source so logs emitted by concurrently running encoder tests
//! never leak into assertions.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use crate::strata_core::Strata;
use crate::error::Error;
use serial_test::serial;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

struct CaptureLogger {
    source: &'static str,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogger {
    fn new(source: &'static str) -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { source, entries: entries.clone() }, entries)
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == self.source {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_default_logger_format_without_location() {
    colored::control::set_override(false);
    let entry = LogEntry {
        severity: LogSeverity::Info,
        timestamp: SystemTime::now(),
        source: "strata::encoder".to_string(),
        message: "encoded 3 commands".to_string(),
        file: None,
        line: None,
    };

    let line = DefaultLogger::format_entry(&entry);
    assert!(line.contains("[INFO ]"));
    assert!(line.contains("[strata::encoder]"));
    assert!(line.ends_with("encoded 3 commands"));
    colored::control::unset_override();
}

#[test]
#[serial]
fn test_default_logger_format_with_location() {
    colored::control::set_override(false);
    let entry = LogEntry {
        severity: LogSeverity::Error,
        timestamp: SystemTime::now(),
        source: "strata::vulkan".to_string(),
        message: "framebuffer rejected".to_string(),
        file: Some("vulkan_graphics_device.rs"),
        line: Some(42),
    };

    let line = DefaultLogger::format_entry(&entry);
    assert!(line.contains("[ERROR]"));
    assert!(line.ends_with("framebuffer rejected (vulkan_graphics_device.rs:42)"));
    colored::control::unset_override();
}

// ============================================================================
// FACADE TESTS
// ============================================================================

#[test]
#[serial]
fn test_custom_logger_receives_entries() {
    let (capture, entries) = CaptureLogger::new("test::capture");
    Strata::set_logger(capture);

    crate::strata_info!("test::capture", "info {}", 1);
    crate::strata_warn!("test::capture", "warn {}", 2);
    crate::strata_error!("test::capture", "error {}", 3);

    Strata::reset_logger();

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].severity, LogSeverity::Info);
    assert_eq!(entries[0].message, "info 1");
    assert!(entries[0].file.is_none());
    assert_eq!(entries[2].severity, LogSeverity::Error);
    assert!(entries[2].file.is_some());
    assert!(entries[2].line.is_some());
}

#[test]
#[serial]
fn test_min_severity_filters_entries() {
    let (capture, entries) = CaptureLogger::new("test::filter");
    Strata::set_logger(capture);
    Strata::set_min_severity(LogSeverity::Warn);

    crate::strata_debug!("test::filter", "dropped");
    crate::strata_info!("test::filter", "dropped");
    crate::strata_warn!("test::filter", "kept");

    Strata::set_min_severity(LogSeverity::Debug);
    Strata::reset_logger();

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "kept");
}

#[test]
#[serial]
fn test_err_macro_logs_and_builds_variant() {
    let (capture, entries) = CaptureLogger::new("test::err");
    Strata::set_logger(capture);

    let err = crate::strata_err!(PassCreationFailed, "test::err", "rejected with {}", -3);

    Strata::reset_logger();

    assert!(matches!(&err, Error::PassCreationFailed(msg) if msg == "rejected with -3"));
    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Error);
}

#[test]
#[serial]
fn test_bail_macro_returns_early() {
    fn failing() -> crate::error::Result<u32> {
        crate::strata_bail!(InvalidCommand, "test::bail", "command {} has no vertex buffer", 4);
    }

    let (capture, entries) = CaptureLogger::new("test::bail");
    Strata::set_logger(capture);
    let result = failing();
    Strata::reset_logger();

    assert!(matches!(result, Err(Error::InvalidCommand(_))));
    assert_eq!(entries.lock().unwrap().len(), 1);
}
