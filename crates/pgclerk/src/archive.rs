//! PostgreSQL archive over a [`Connection`] driver.

use pgclerk_core::{
    Archive, BoxFuture, Connection, Cx, Error, ExecuteResult, Filter, NamedParams, Outcome,
    ParsedQuery, QueryError, QueryErrorKind, Result, SqlArchive, Value,
};
use pgclerk_query::{
    Dialect, normalize_for_postgres, parse_named_attributes, placeholder_count, sql_from_filter,
};

/// An archive that runs statements on a PostgreSQL connection.
///
/// Statements are normalized before they reach the driver: `?` placeholders
/// become `$n` and backtick-quoted identifiers become double-quoted.
#[derive(Debug)]
pub struct PgArchive<C> {
    name: String,
    conn: C,
}

impl<C: Connection> PgArchive<C> {
    pub fn new(conn: C) -> Self {
        Self {
            name: "postgres".to_string(),
            conn,
        }
    }

    /// Set the name reported in diagnostics.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check that the underlying connection is alive.
    pub async fn ping(&self, cx: &Cx) -> Outcome<(), Error> {
        self.conn.ping(cx).await
    }

    #[tracing::instrument(level = "debug", skip(self, cx, params), fields(archive = %self.name))]
    async fn run(&self, cx: &Cx, sql: &str, params: &[Value]) -> Outcome<ExecuteResult, Error> {
        let statement = normalize_for_postgres(sql);
        let expected = placeholder_count(&statement);
        if expected != params.len() {
            return Outcome::Err(Error::Query(QueryError {
                kind: QueryErrorKind::Syntax,
                message: format!(
                    "statement expects {expected} parameters but {} were bound",
                    params.len()
                ),
                sql: Some(statement),
                sqlstate: None,
                detail: None,
                source: None,
            }));
        }

        tracing::trace!(sql = %statement, params = params.len(), "Executing statement");
        match self.conn.execute(cx, &statement, params).await {
            Outcome::Ok(rows) => Outcome::Ok(ExecuteResult::new(rows)),
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }
}

impl<C: Connection> Archive for PgArchive<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_sql(&self) -> Option<&dyn SqlArchive> {
        Some(self)
    }
}

impl<C: Connection> SqlArchive for PgArchive<C> {
    fn execute<'a>(
        &'a self,
        cx: &'a Cx,
        sql: &'a str,
        params: &'a [Value],
    ) -> BoxFuture<'a, Outcome<ExecuteResult, Error>> {
        Box::pin(self.run(cx, sql, params))
    }

    fn sql_from_filter(&self, filter: &Filter, params: &mut NamedParams) -> Result<String> {
        sql_from_filter(filter, Dialect::Postgres, params)
    }

    fn parse_named_attributes(&self, fragment: &str, params: &NamedParams) -> Result<ParsedQuery> {
        parse_named_attributes(fragment, params)
    }
}
