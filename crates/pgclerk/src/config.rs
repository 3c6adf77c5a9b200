//! Procedure configuration.

use pgclerk_core::{ConfigError, Diagnostics, Error, Result, TracingDiagnostics};
use std::sync::Arc;

/// Environment variable read by [`ProcedureConfig::from_env`].
pub const DELETE_REQUIRES_AFFECTED_ROW_ENV: &str = "PGCLERK_DELETE_REQUIRES_AFFECTED_ROW";

/// Settings shared by the built-in procedures.
#[derive(Debug, Clone)]
pub struct ProcedureConfig {
    /// Report a delete as failed when no row was removed (default: false)
    pub delete_requires_affected_row: bool,
    /// Where procedures report failures
    pub diagnostics: Arc<dyn Diagnostics>,
}

impl Default for ProcedureConfig {
    fn default() -> Self {
        Self {
            delete_requires_affected_row: false,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }
}

impl ProcedureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether a delete must remove at least one row to succeed.
    pub fn delete_requires_affected_row(mut self, required: bool) -> Self {
        self.delete_requires_affected_row = required;
        self
    }

    /// Set the diagnostics sink.
    pub fn diagnostics(mut self, sink: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(DELETE_REQUIRES_AFFECTED_ROW_ENV) {
            config.delete_requires_affected_row =
                parse_flag(DELETE_REQUIRES_AFFECTED_ROW_ENV, &raw)?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config(ConfigError {
            message: format!("{key}: expected a boolean, got '{other}'"),
            source: None,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProcedureConfig::default();
        assert!(!config.delete_requires_affected_row);
    }

    #[test]
    fn test_from_lookup() {
        let config = ProcedureConfig::from_lookup(|key| {
            (key == DELETE_REQUIRES_AFFECTED_ROW_ENV).then(|| "Yes".to_string())
        })
        .unwrap();
        assert!(config.delete_requires_affected_row);

        let config = ProcedureConfig::from_lookup(|_| None).unwrap();
        assert!(!config.delete_requires_affected_row);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = ProcedureConfig::from_lookup(|_| Some("maybe".to_string())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(DELETE_REQUIRES_AFFECTED_ROW_ENV));
    }
}
