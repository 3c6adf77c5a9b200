//! Error types for pgclerk operations.

use std::fmt;

/// The primary error type for all pgclerk operations.
#[derive(Debug)]
pub enum Error {
    /// Connection-related errors (connect, disconnect, timeout)
    Connection(ConnectionError),
    /// Statement execution errors reported by the driver
    Query(QueryError),
    /// Request validation errors (missing required properties)
    Validation(ValidationError),
    /// Procedure precondition errors
    Procedure(ProcedureError),
    /// Filter translation errors
    Filter(FilterError),
    /// Configuration errors
    Config(ConfigError),
    /// Custom error with message
    Custom(String),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// Failed to establish connection
    Connect,
    /// Connection lost during operation
    Disconnected,
    /// Connection refused
    Refused,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub sql: Option<String>,
    pub sqlstate: Option<String>,
    pub message: String,
    pub detail: Option<String>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Syntax error in SQL
    Syntax,
    /// Constraint violation (unique, foreign key, etc.)
    Constraint,
    /// Table or column not found
    NotFound,
    /// Permission denied
    Permission,
    /// Other database error
    Database,
}

/// Validation error for request-level checks.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The errors grouped by property name
    pub errors: Vec<PropertyValidationError>,
}

/// A single validation error for a property.
#[derive(Debug, Clone)]
pub struct PropertyValidationError {
    /// The property name that failed validation
    pub property: String,
    /// The kind of validation that failed
    pub kind: ValidationErrorKind,
    /// Human-readable error message
    pub message: String,
}

/// The type of validation constraint that was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required property is missing
    Required,
}

#[derive(Debug)]
pub struct ProcedureError {
    pub kind: ProcedureErrorKind,
    pub procedure: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureErrorKind {
    /// The archive does not expose the SQL capability
    UnsupportedArchive,
    /// No procedure is registered under the requested name
    UnknownProcedure,
    /// Column and value sequences are empty or differ in length
    ParameterMismatch,
    /// A batch update was requested without any values to set
    EmptyUpdate,
}

#[derive(Debug)]
pub struct FilterError {
    pub kind: FilterErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterErrorKind {
    /// A named placeholder has no bound value
    MissingParameter,
    /// The filter cannot be rendered (e.g. empty IN list, bad property name)
    InvalidFilter,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ValidationError {
    /// Create a new empty validation error container.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Check if there are any validation errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add a property validation error.
    pub fn add(
        &mut self,
        property: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) {
        self.errors.push(PropertyValidationError {
            property: property.into(),
            kind,
            message: message.into(),
        });
    }

    /// Add a required property error.
    pub fn add_required(&mut self, property: impl Into<String>) {
        self.add(
            property,
            ValidationErrorKind::Required,
            "is marked as required but was not set",
        );
    }

    /// Convert to Result, returning Ok(()) if no errors, Err(self) otherwise.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Default for ValidationError {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcedureError {
    pub fn new(
        kind: ProcedureErrorKind,
        procedure: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            procedure: procedure.into(),
            message: message.into(),
        }
    }
}

impl FilterError {
    pub fn new(kind: FilterErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl QueryError {
    /// Build a database error carrying only a message and optional detail.
    pub fn database(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            kind: QueryErrorKind::Database,
            sql: None,
            sqlstate: None,
            message: message.into(),
            detail,
            source: None,
        }
    }
}

impl Error {
    /// Is this a connection error that likely requires reconnection?
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Connect
                    | ConnectionErrorKind::Disconnected
                    | ConnectionErrorKind::Refused,
                ..
            })
        )
    }

    /// Is this a precondition failure raised before any SQL executed?
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Procedure(_) | Error::Filter(_)
        )
    }

    /// Get SQLSTATE if available (e.g., "23505" for unique violation)
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Error::Query(q) => q.sqlstate.as_deref(),
            _ => None,
        }
    }

    /// Get the SQL that caused this error, if available
    pub fn sql(&self) -> Option<&str> {
        match self {
            Error::Query(q) => q.sql.as_deref(),
            _ => None,
        }
    }

    /// The driver-level detail surfaced in failure responses.
    ///
    /// Falls back to the error message when the driver gave no detail.
    pub fn detail(&self) -> String {
        match self {
            Error::Query(q) => q.detail.clone().unwrap_or_else(|| q.message.clone()),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e.message),
            Error::Query(e) => {
                if let Some(sqlstate) = &e.sqlstate {
                    write!(f, "Query error (SQLSTATE {}): {}", sqlstate, e.message)
                } else {
                    write!(f, "Query error: {}", e.message)
                }
            }
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Procedure(e) => write!(f, "Procedure '{}' failed: {}", e.procedure, e.message),
            Error::Filter(e) => write!(f, "Filter error: {}", e.message),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Query(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sqlstate) = &self.sqlstate {
            write!(f, "{} (SQLSTATE {})", self.message, sqlstate)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl fmt::Display for ProcedureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "validation passed")
        } else if self.errors.len() == 1 {
            let err = &self.errors[0];
            write!(f, "property '{}' {}", err.property, err.message)
        } else {
            writeln!(f, "validation errors:")?;
            for err in &self.errors {
                writeln!(f, "  - {}: {}", err.property, err.message)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Connection(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::Query(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

impl From<ProcedureError> for Error {
    fn from(err: ProcedureError) -> Self {
        Error::Procedure(err)
    }
}

impl From<FilterError> for Error {
    fn from(err: FilterError) -> Self {
        Error::Filter(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Result type alias for pgclerk operations.
pub type Result<T> = std::result::Result<T, Error>;
