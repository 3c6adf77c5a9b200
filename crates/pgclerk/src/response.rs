//! Procedure responses.

use pgclerk_core::{Model, Value};
use serde_json::json;
use std::sync::Arc;

/// Result of one procedure call.
///
/// A response is produced whenever a statement was built, including when the
/// driver rejected it: `success` is then `false` and `errors` carries the
/// driver's detail. Precondition failures never produce a response.
#[derive(Debug, Clone)]
pub struct ProcedureResponse<R> {
    /// Name of the procedure that produced this response
    pub procedure: &'static str,
    pub success: bool,
    /// The statement as sent to the archive
    pub sql: String,
    /// Bind values, positionally aligned with the placeholders in `sql`
    pub bind_params: Vec<Value>,
    /// The request this response answers
    pub request: R,
    /// The affected model, for model procedures
    pub model: Option<Arc<dyn Model>>,
    /// Driver detail when execution failed
    pub errors: Option<String>,
}

impl<R> ProcedureResponse<R> {
    pub fn new(
        procedure: &'static str,
        success: bool,
        sql: String,
        bind_params: Vec<Value>,
        request: R,
    ) -> Self {
        Self {
            procedure,
            success,
            sql,
            bind_params,
            request,
            model: None,
            errors: None,
        }
    }

    /// A response for a statement the archive failed to execute.
    pub fn failed(
        procedure: &'static str,
        sql: String,
        bind_params: Vec<Value>,
        request: R,
        errors: impl Into<String>,
    ) -> Self {
        Self {
            errors: Some(errors.into()),
            ..Self::new(procedure, false, sql, bind_params, request)
        }
    }

    pub fn with_model(mut self, model: Arc<dyn Model>) -> Self {
        self.model = Some(model);
        self
    }

    /// JSON summary of the statement and its outcome, without the request.
    pub fn summary(&self) -> serde_json::Value {
        let params: Vec<serde_json::Value> = self.bind_params.iter().map(Value::to_json).collect();
        json!({
            "procedure": self.procedure,
            "success": self.success,
            "sql": self.sql,
            "bindParams": params,
            "errors": self.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_keeps_statement() {
        let response = ProcedureResponse::failed(
            "delete",
            "DELETE FROM `t` WHERE `id` = ?".to_string(),
            vec![Value::Int(42)],
            (),
            "relation \"t\" does not exist",
        );
        assert!(!response.success);
        assert_eq!(response.bind_params, vec![Value::Int(42)]);
        assert_eq!(
            response.errors.as_deref(),
            Some("relation \"t\" does not exist")
        );
        assert!(response.model.is_none());
    }

    #[test]
    fn test_summary() {
        let response = ProcedureResponse::new(
            "create",
            true,
            "INSERT INTO \"t\" ( \"a\" ) VALUES (  $1  )".to_string(),
            vec![Value::Text("x".to_string())],
            (),
        );
        let summary = response.summary();
        assert_eq!(summary["procedure"], "create");
        assert_eq!(summary["success"], true);
        assert_eq!(summary["bindParams"][0], "x");
        assert!(summary["errors"].is_null());
    }
}
