//! Procedure traits and the built-in procedures.
//!
//! A procedure turns one request into one parameterized statement, runs it
//! through the archive's relational capability and describes the result.
//!
//! Failures come in two shapes:
//!
//! - Preconditions (unsupported archive, missing required property, bad
//!   filter) return `Outcome::Err` before anything is executed.
//! - Execution errors are reported to the diagnostics sink and returned as a
//!   response with `success == false` and the driver detail in `errors`.
//!
//! Cancellation and panics are propagated as they are.

mod batch_update;
mod create;
mod delete;

pub use batch_update::{BATCH_UPDATE, BatchUpdateProcedure, build_batch_update};
pub use create::{CREATE, CreateProcedure, build_insert};
pub use delete::{DELETE, DeleteProcedure, build_delete};

use crate::request::{BatchUpdateContext, EntityRequest, ModelRequest};
use crate::response::ProcedureResponse;
use pgclerk_core::{
    Archive, BoxFuture, Cx, Diagnostic, Diagnostics, Error, Level, Outcome, ProcedureError,
    ProcedureErrorKind, Result, SqlArchive, Value,
};

/// A procedure acting on a single model instance.
pub trait ModelProcedure: Send + Sync {
    /// Stable name used for registry lookup.
    fn name(&self) -> &'static str;

    fn execute<'a>(
        &'a self,
        cx: &'a Cx,
        archive: &'a dyn Archive,
        request: ModelRequest,
    ) -> BoxFuture<'a, Outcome<ProcedureResponse<ModelRequest>, Error>>;
}

/// A procedure acting on a whole entity with a context of type `C`.
pub trait EntityProcedure<C = BatchUpdateContext>: Send + Sync {
    /// Stable name used for registry lookup.
    fn name(&self) -> &'static str;

    fn execute<'a>(
        &'a self,
        cx: &'a Cx,
        archive: &'a dyn Archive,
        request: EntityRequest<C>,
    ) -> BoxFuture<'a, Outcome<ProcedureResponse<EntityRequest<C>>, Error>>;
}

/// A built statement: SQL text and its positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// The archive's relational capability, or an `UnsupportedArchive` error.
pub(crate) fn require_sql<'a>(
    procedure: &'static str,
    archive: &'a dyn Archive,
) -> Result<&'a dyn SqlArchive> {
    archive.as_sql().ok_or_else(|| {
        ProcedureError::new(
            ProcedureErrorKind::UnsupportedArchive,
            procedure,
            format!("archive '{}' has no SQL capability", archive.name()),
        )
        .into()
    })
}

pub(crate) fn report_failure(
    diagnostics: &dyn Diagnostics,
    procedure: &'static str,
    message: &str,
    sql: &str,
    error: &Error,
) {
    diagnostics.report(
        Diagnostic::new(Level::Error, procedure, format!("{message}: {error}")).with_sql(sql),
    );
}
