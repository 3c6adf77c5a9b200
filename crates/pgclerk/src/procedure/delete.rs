//! The `delete` procedure: DELETE one model by identifier.

use super::{ModelProcedure, Statement, report_failure, require_sql};
use crate::config::ProcedureConfig;
use crate::request::ModelRequest;
use crate::response::ProcedureResponse;
use pgclerk_core::{Archive, BoxFuture, Cx, Entity, Error, Outcome, Value};
use pgclerk_query::Dialect;
use std::sync::Arc;

pub const DELETE: &str = "delete";

/// Build the DELETE statement removing the row identified by `id`.
///
/// The text is archive-neutral: backtick-quoted identifiers and a single `?`
/// placeholder, spelled with [`Dialect::Mysql`]. Each archive rewrites it for
/// its own driver.
pub fn build_delete(entity: &Entity, id: Value) -> Statement {
    let dialect = Dialect::Mysql;
    let sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        dialect.quote_identifier(&entity.source),
        dialect.quote_identifier(&entity.identifier.name),
        dialect.placeholder(1)
    );
    Statement {
        sql,
        params: vec![id],
    }
}

/// Deletes a model by its identifier.
#[derive(Debug, Clone, Default)]
pub struct DeleteProcedure {
    config: ProcedureConfig,
}

impl DeleteProcedure {
    pub fn new(config: ProcedureConfig) -> Self {
        Self { config }
    }

    /// Resolve the model's identifier and delete the matching row.
    ///
    /// The response succeeds whether or not a row was removed, unless the
    /// configuration asks for at least one affected row.
    #[tracing::instrument(
        level = "debug",
        skip(self, cx, archive, request),
        fields(entity = %request.entity.name)
    )]
    pub async fn run(
        &self,
        cx: &Cx,
        archive: &dyn Archive,
        request: ModelRequest,
    ) -> Outcome<ProcedureResponse<ModelRequest>, Error> {
        let sql_archive = match require_sql(DELETE, archive) {
            Ok(a) => a,
            Err(e) => return Outcome::Err(e),
        };

        let resolved = request.model.id(cx).await;
        let id = match resolved {
            Outcome::Ok(id) => id,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };

        let Statement { sql, params } = build_delete(&request.entity, id);
        tracing::debug!(sql = %sql, "Executing delete");

        let executed = sql_archive.execute(cx, &sql, &params).await;
        let model = Arc::clone(&request.model);
        match executed {
            Outcome::Ok(result) => {
                let success = !self.config.delete_requires_affected_row || result.row_count > 0;
                if result.row_count == 0 {
                    tracing::debug!(sql = %sql, "Delete matched no rows");
                }
                Outcome::Ok(
                    ProcedureResponse::new(DELETE, success, sql, params, request).with_model(model),
                )
            }
            Outcome::Err(e) => {
                report_failure(
                    self.config.diagnostics.as_ref(),
                    DELETE,
                    "failed to delete model",
                    &sql,
                    &e,
                );
                Outcome::Ok(
                    ProcedureResponse::failed(DELETE, sql, params, request, e.detail())
                        .with_model(model),
                )
            }
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }
}

impl ModelProcedure for DeleteProcedure {
    fn name(&self) -> &'static str {
        DELETE
    }

    fn execute<'a>(
        &'a self,
        cx: &'a Cx,
        archive: &'a dyn Archive,
        request: ModelRequest,
    ) -> BoxFuture<'a, Outcome<ProcedureResponse<ModelRequest>, Error>> {
        Box::pin(self.run(cx, archive, request))
    }
}
