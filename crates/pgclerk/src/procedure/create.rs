//! The `create` procedure: INSERT one model.

use super::{ModelProcedure, Statement, report_failure, require_sql};
use crate::config::ProcedureConfig;
use crate::request::ModelRequest;
use crate::response::ProcedureResponse;
use pgclerk_core::{
    Archive, BoxFuture, Cx, Entity, Error, Outcome, ProcedureError, ProcedureErrorKind,
    PropertyValues, Result, ValidationError,
};
use pgclerk_query::Dialect;
use std::sync::Arc;

pub const CREATE: &str = "create";

/// Build the INSERT statement for `entity` from committed property values.
///
/// Columns and placeholders follow the iteration order of `values`. Every
/// required property of the entity must be present.
pub fn build_insert(entity: &Entity, values: PropertyValues) -> Result<Statement> {
    let (names, params): (Vec<String>, Vec<_>) = values.into_iter().unzip();

    let mut missing = ValidationError::new();
    for property in entity.required_properties() {
        if !names.iter().any(|n| *n == property.name) {
            missing.add_required(&property.name);
        }
    }
    missing.into_result()?;

    if names.is_empty() {
        return Err(ProcedureError::new(
            ProcedureErrorKind::ParameterMismatch,
            CREATE,
            format!("no property values to insert into '{}'", entity.source),
        )
        .into());
    }

    let dialect = Dialect::Postgres;
    let columns: Vec<String> = names.iter().map(|n| dialect.quote_identifier(n)).collect();
    let placeholders: Vec<String> = (1..=params.len())
        .map(|i| format!(" {} ", dialect.placeholder(i)))
        .collect();

    let sql = format!(
        "INSERT INTO {} ( {} ) VALUES ( {} )",
        dialect.quote_identifier(&entity.source),
        columns.join(" , "),
        placeholders.join(" , ")
    );
    Ok(Statement { sql, params })
}

/// Inserts a model after committing its pending changes.
#[derive(Debug, Clone, Default)]
pub struct CreateProcedure {
    config: ProcedureConfig,
}

impl CreateProcedure {
    pub fn new(config: ProcedureConfig) -> Self {
        Self { config }
    }

    /// Commit the model, insert its values and report whether exactly one
    /// row was written.
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
        let sql_archive = match require_sql(CREATE, archive) {
            Ok(a) => a,
            Err(e) => return Outcome::Err(e),
        };

        let committed = request.model.commit(cx).await;
        let values = match committed {
            Outcome::Ok(values) => values,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };

        let Statement { sql, params } = match build_insert(&request.entity, values) {
            Ok(statement) => statement,
            Err(e) => return Outcome::Err(e),
        };
        tracing::debug!(sql = %sql, params = params.len(), "Executing insert");

        let executed = sql_archive.execute(cx, &sql, &params).await;
        let model = Arc::clone(&request.model);
        match executed {
            Outcome::Ok(result) => Outcome::Ok(
                ProcedureResponse::new(CREATE, result.row_count == 1, sql, params, request)
                    .with_model(model),
            ),
            Outcome::Err(e) => {
                report_failure(
                    self.config.diagnostics.as_ref(),
                    CREATE,
                    "failed to create model",
                    &sql,
                    &e,
                );
                Outcome::Ok(
                    ProcedureResponse::failed(CREATE, sql, params, request, e.detail())
                        .with_model(model),
                )
            }
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }
}

impl ModelProcedure for CreateProcedure {
    fn name(&self) -> &'static str {
        CREATE
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
