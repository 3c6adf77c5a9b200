//! Name-based procedure lookup.

use crate::config::ProcedureConfig;
use crate::procedure::{
    BatchUpdateProcedure, CreateProcedure, DeleteProcedure, EntityProcedure, ModelProcedure,
};
use crate::request::{EntityRequest, ModelRequest};
use crate::response::ProcedureResponse;
use pgclerk_core::{Archive, Cx, Error, Outcome, ProcedureError, ProcedureErrorKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Procedures registered under stable names.
#[derive(Default, Clone)]
pub struct ProcedureRegistry {
    model: HashMap<&'static str, Arc<dyn ModelProcedure>>,
    entity: HashMap<&'static str, Arc<dyn EntityProcedure>>,
}

impl ProcedureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `create`, `delete` and `batch-update`.
    pub fn with_defaults(config: &ProcedureConfig) -> Self {
        let mut registry = Self::new();
        registry.register_model(Arc::new(CreateProcedure::new(config.clone())));
        registry.register_model(Arc::new(DeleteProcedure::new(config.clone())));
        registry.register_entity(Arc::new(BatchUpdateProcedure::new(config.clone())));
        registry
    }

    /// Register a model procedure, returning any procedure it replaces.
    pub fn register_model(
        &mut self,
        procedure: Arc<dyn ModelProcedure>,
    ) -> Option<Arc<dyn ModelProcedure>> {
        self.model.insert(procedure.name(), procedure)
    }

    /// Register an entity procedure, returning any procedure it replaces.
    pub fn register_entity(
        &mut self,
        procedure: Arc<dyn EntityProcedure>,
    ) -> Option<Arc<dyn EntityProcedure>> {
        self.entity.insert(procedure.name(), procedure)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.model.keys().chain(self.entity.keys()).copied().collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.model.contains_key(name) || self.entity.contains_key(name)
    }

    /// Run the model procedure registered as `name`.
    #[tracing::instrument(level = "debug", skip(self, cx, archive, request))]
    pub async fn execute_model(
        &self,
        name: &str,
        cx: &Cx,
        archive: &dyn Archive,
        request: ModelRequest,
    ) -> Outcome<ProcedureResponse<ModelRequest>, Error> {
        match self.model.get(name) {
            Some(procedure) => procedure.execute(cx, archive, request).await,
            None => Outcome::Err(unknown(name)),
        }
    }

    /// Run the entity procedure registered as `name`.
    #[tracing::instrument(level = "debug", skip(self, cx, archive, request))]
    pub async fn execute_entity(
        &self,
        name: &str,
        cx: &Cx,
        archive: &dyn Archive,
        request: EntityRequest,
    ) -> Outcome<ProcedureResponse<EntityRequest>, Error> {
        match self.entity.get(name) {
            Some(procedure) => procedure.execute(cx, archive, request).await,
            None => Outcome::Err(unknown(name)),
        }
    }
}

fn unknown(name: &str) -> Error {
    ProcedureError::new(
        ProcedureErrorKind::UnknownProcedure,
        name,
        format!("no procedure registered as '{name}'"),
    )
    .into()
}

impl fmt::Debug for ProcedureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcedureRegistry")
            .field("procedures", &self.names())
            .finish()
    }
}
