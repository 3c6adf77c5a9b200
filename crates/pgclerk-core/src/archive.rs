//! Archive traits.
//!
//! An archive encapsulates one backend. Procedures do not care which concrete
//! archive they are given, only whether it exposes the relational capability:
//!
//! - [`Archive`] - Any backend; advertises capabilities
//! - [`SqlArchive`] - Statement execution and filter translation for SQL backends
//!
//! Both traits are object-safe so procedures and registries can work with
//! `&dyn Archive`.

use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::model::BoxFuture;
use crate::value::Value;
use asupersync::{Cx, Outcome};

/// Raw result of executing a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteResult {
    /// Rows affected as reported by the driver
    pub row_count: u64,
}

impl ExecuteResult {
    pub const fn new(row_count: u64) -> Self {
        Self { row_count }
    }
}

/// Named parameter map produced by filter translation.
///
/// Insertion order is preserved so translated fragments are deterministic.
pub type NamedParams = Vec<(String, Value)>;

/// A SQL fragment with positional `?` placeholders and its ordered values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedQuery {
    pub query: String,
    pub params: Vec<Value>,
}

/// A backend that procedures can be executed against.
pub trait Archive: Send + Sync {
    /// Human-readable backend name, used in diagnostics.
    fn name(&self) -> &str;

    /// The relational capability, if this backend has one.
    fn as_sql(&self) -> Option<&dyn SqlArchive> {
        None
    }
}

/// Relational capability of an archive.
pub trait SqlArchive: Send + Sync {
    /// Execute a statement (INSERT, UPDATE, DELETE) and report rows affected.
    fn execute<'a>(
        &'a self,
        cx: &'a Cx,
        sql: &'a str,
        params: &'a [Value],
    ) -> BoxFuture<'a, Outcome<ExecuteResult, Error>>;

    /// Render a filter as SQL with `:name` placeholders, recording the bound
    /// values in `params`.
    fn sql_from_filter(&self, filter: &Filter, params: &mut NamedParams) -> Result<String>;

    /// Rewrite `:name` placeholders into positional `?` placeholders and
    /// collect their values in occurrence order.
    fn parse_named_attributes(&self, fragment: &str, params: &NamedParams) -> Result<ParsedQuery>;
}
