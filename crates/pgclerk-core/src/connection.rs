//! Database driver trait.
//!
//! [`Connection`] is the seam to an external driver that owns the wire
//! protocol and any pooling. Archives are built on top of it.
//!
//! All operations integrate with asupersync's structured concurrency via `Cx`
//! context for proper cancellation and timeout handling.

use crate::error::Error;
use crate::value::Value;
use asupersync::{Cx, Outcome};
use std::future::Future;

/// A database connection capable of executing statements.
///
/// Implementations must be `Send + Sync` for use across async boundaries.
///
/// # Example
///
/// ```rust,ignore
/// let affected = conn
///     .execute(&cx, "DELETE FROM \"users\" WHERE \"id\" = $1", &[Value::BigInt(42)])
///     .await?;
/// ```
pub trait Connection: Send + Sync {
    /// Execute a statement (INSERT, UPDATE, DELETE) and return rows affected.
    ///
    /// Statements use PostgreSQL `$n` placeholders.
    fn execute(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, Error>> + Send;

    /// Check if the connection is still valid by sending a ping.
    fn ping(&self, cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send;
}
