//! Core types and traits for pgclerk.
//!
//! This crate provides the shared vocabulary of the procedure layer:
//!
//! - `Value` for bind parameters
//! - `Entity` / `PropertyDescriptor` for table metadata
//! - `Model` trait for record instances (and `Record`, an in-memory model)
//! - `Filter` for structured predicates
//! - `Archive` / `SqlArchive` for backends, `Connection` for drivers
//! - `Diagnostics` sinks
//! - `Outcome` and `Cx` re-exported from asupersync

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod archive;
pub mod connection;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod filter;
pub mod model;
pub mod value;

pub use archive::{Archive, ExecuteResult, NamedParams, ParsedQuery, SqlArchive};
pub use connection::Connection;
pub use diagnostics::{
    Diagnostic, Diagnostics, Level, NullDiagnostics, RecordingDiagnostics, TracingDiagnostics,
};
pub use entity::{Entity, Identifier, PropertyDescriptor};
pub use error::{
    ConfigError, ConnectionError, ConnectionErrorKind, Error, FilterError, FilterErrorKind,
    ProcedureError, ProcedureErrorKind, PropertyValidationError, QueryError, QueryErrorKind,
    Result, ValidationError, ValidationErrorKind,
};
pub use filter::{ComparisonOp, Filter};
pub use model::{BoxFuture, Model, PropertyValues, Record};
pub use value::Value;
