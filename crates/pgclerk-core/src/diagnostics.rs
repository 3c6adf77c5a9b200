//! Diagnostic sinks.
//!
//! Procedures report noteworthy events (failed statements, rejected requests)
//! to an injected [`Diagnostics`] sink instead of writing to the process
//! output directly. The default sink forwards to `tracing`; tests use
//! [`RecordingDiagnostics`] to assert on what was reported.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Get the level name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    /// Name of the procedure that reported the event
    pub procedure: String,
    pub message: String,
    /// Statement text involved, if any
    pub sql: Option<String>,
}

impl Diagnostic {
    pub fn new(level: Level, procedure: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            procedure: procedure.into(),
            message: message.into(),
            sql: None,
        }
    }

    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }
}

/// A sink for diagnostic events.
pub trait Diagnostics: Send + Sync + fmt::Debug {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, d: Diagnostic) {
        let sql = d.sql.as_deref().unwrap_or("");
        match d.level {
            Level::Debug => tracing::debug!(procedure = %d.procedure, sql = %sql, "{}", d.message),
            Level::Info => tracing::info!(procedure = %d.procedure, sql = %sql, "{}", d.message),
            Level::Warn => tracing::warn!(procedure = %d.procedure, sql = %sql, "{}", d.message),
            Level::Error => tracing::error!(procedure = %d.procedure, sql = %sql, "{}", d.message),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Keeps every event in memory.
///
/// Clones share the same buffer, so a test can keep one handle and give the
/// other to the code under test.
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    events: Arc<Mutex<Vec<Diagnostic>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events at or above `level`.
    pub fn count_at_least(&self, level: Level) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|d| d.level >= level)
            .count()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_shares_buffer_between_clones() {
        let sink = RecordingDiagnostics::new();
        let handle = sink.clone();
        sink.report(Diagnostic::new(Level::Warn, "delete", "failed").with_sql("DELETE FROM `t`"));
        sink.report(Diagnostic::new(Level::Debug, "delete", "built statement"));

        let events = handle.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sql.as_deref(), Some("DELETE FROM `t`"));
        assert_eq!(handle.count_at_least(Level::Warn), 1);
    }

    #[test]
    fn test_level_order_and_display() {
        assert!(Level::Error > Level::Warn);
        assert_eq!(Level::Info.to_string(), "INFO");
    }

    #[test]
    fn test_null_and_tracing_do_not_panic() {
        NullDiagnostics.report(Diagnostic::new(Level::Error, "create", "x"));
        TracingDiagnostics.report(Diagnostic::new(Level::Error, "create", "x"));
    }
}
