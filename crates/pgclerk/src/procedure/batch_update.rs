//! The `batch-update` procedure: UPDATE every row matching a filter.

use super::{EntityProcedure, Statement, report_failure, require_sql};
use crate::config::ProcedureConfig;
use crate::request::{BatchUpdateContext, EntityRequest};
use crate::response::ProcedureResponse;
use pgclerk_core::{
    Archive, BoxFuture, Cx, Entity, Error, NamedParams, Outcome, ProcedureError,
    ProcedureErrorKind, Result, SqlArchive,
};
use pgclerk_query::Dialect;

pub const BATCH_UPDATE: &str = "batch-update";

/// Build the UPDATE statement for `context`, translating its filter through
/// `archive`.
///
/// SET values are bound first, in assignment order, followed by the values
/// of the WHERE fragment in occurrence order. Like [`build_delete`] the SET
/// clause is archive-neutral text (backticks and `?`, spelled with
/// [`Dialect::Mysql`]); the WHERE fragment is whatever the archive rendered.
///
/// [`build_delete`]: super::build_delete
pub fn build_batch_update(
    entity: &Entity,
    context: &BatchUpdateContext,
    archive: &dyn SqlArchive,
) -> Result<Statement> {
    if context.values.is_empty() {
        return Err(ProcedureError::new(
            ProcedureErrorKind::EmptyUpdate,
            BATCH_UPDATE,
            format!("no assignments given for '{}'", entity.source),
        )
        .into());
    }

    let dialect = Dialect::Mysql;
    let mut params = Vec::with_capacity(context.values.len());
    let assignments: Vec<String> = context
        .values
        .iter()
        .map(|(property, value)| {
            params.push(value.clone());
            format!(
                "{} = {}",
                dialect.quote_qualified(&entity.source, property),
                dialect.placeholder(params.len())
            )
        })
        .collect();

    let mut named = NamedParams::new();
    let fragment = archive.sql_from_filter(&context.filter, &mut named)?;
    let parsed = archive.parse_named_attributes(&fragment, &named)?;
    params.extend(parsed.params);

    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        dialect.quote_identifier(&entity.source),
        assignments.join(" , "),
        parsed.query
    );
    Ok(Statement { sql, params })
}

/// Applies one set of assignments to every row matching a filter.
#[derive(Debug, Clone, Default)]
pub struct BatchUpdateProcedure {
    config: ProcedureConfig,
}

impl BatchUpdateProcedure {
    pub fn new(config: ProcedureConfig) -> Self {
        Self { config }
    }

    /// Update the matching rows; the response succeeds when at least one row
    /// changed.
    #[tracing::instrument(
        level = "debug",
        skip(self, cx, archive, request),
        fields(entity = %request.entity.name)
    )]
    pub async fn run(
        &self,
        cx: &Cx,
        archive: &dyn Archive,
        request: EntityRequest<BatchUpdateContext>,
    ) -> Outcome<ProcedureResponse<EntityRequest<BatchUpdateContext>>, Error> {
        let sql_archive = match require_sql(BATCH_UPDATE, archive) {
            Ok(a) => a,
            Err(e) => return Outcome::Err(e),
        };

        let Statement { sql, params } =
            match build_batch_update(&request.entity, &request.context, sql_archive) {
                Ok(statement) => statement,
                Err(e) => return Outcome::Err(e),
            };
        tracing::debug!(sql = %sql, params = params.len(), "Executing batch update");

        let executed = sql_archive.execute(cx, &sql, &params).await;
        match executed {
            Outcome::Ok(result) => {
                tracing::debug!(rows = result.row_count, "Batch update complete");
                Outcome::Ok(ProcedureResponse::new(
                    BATCH_UPDATE,
                    result.row_count > 0,
                    sql,
                    params,
                    request,
                ))
            }
            Outcome::Err(e) => {
                report_failure(
                    self.config.diagnostics.as_ref(),
                    BATCH_UPDATE,
                    "failed to update entity",
                    &sql,
                    &e,
                );
                Outcome::Ok(ProcedureResponse::failed(
                    BATCH_UPDATE,
                    sql,
                    params,
                    request,
                    e.detail(),
                ))
            }
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }
}

impl EntityProcedure for BatchUpdateProcedure {
    fn name(&self) -> &'static str {
        BATCH_UPDATE
    }

    fn execute<'a>(
        &'a self,
        cx: &'a Cx,
        archive: &'a dyn Archive,
        request: EntityRequest<BatchUpdateContext>,
    ) -> BoxFuture<'a, Outcome<ProcedureResponse<EntityRequest<BatchUpdateContext>>, Error>> {
        Box::pin(self.run(cx, archive, request))
    }
}
