//! pgclerk - persistence procedures for PostgreSQL-backed entities.
//!
//! Three procedures turn entity operations into parameterized SQL and run it
//! through an [`Archive`](pgclerk_core::Archive):
//!
//! - [`CreateProcedure`] - commit a model and INSERT its values
//! - [`DeleteProcedure`] - DELETE a model by identifier
//! - [`BatchUpdateProcedure`] - UPDATE every row matching a [`Filter`]
//!
//! Each returns a [`ProcedureResponse`] carrying the statement, its bind
//! values and whether it succeeded. [`PgArchive`] adapts any
//! [`Connection`] driver into an archive.
//!
//! # Quick Start
//!
//! ```ignore
//! use pgclerk::prelude::*;
//!
//! async fn insert_user(cx: &Cx, archive: &PgArchive<impl Connection>) {
//!     let users = Arc::new(
//!         Entity::new("users").property(PropertyDescriptor::new("name").required()),
//!     );
//!     let record = Arc::new(Record::new("id").with("name", "Al").with("age", 30));
//!
//!     let registry = ProcedureRegistry::with_defaults(&ProcedureConfig::default());
//!     let response = registry
//!         .execute_model("create", cx, archive, ModelRequest::new(users, record))
//!         .await;
//! }
//! ```

pub mod archive;
pub mod config;
pub mod procedure;
pub mod registry;
pub mod request;
pub mod response;

pub use archive::PgArchive;
pub use config::{DELETE_REQUIRES_AFFECTED_ROW_ENV, ProcedureConfig};
pub use procedure::{
    BATCH_UPDATE, BatchUpdateProcedure, CREATE, CreateProcedure, DELETE, DeleteProcedure,
    EntityProcedure, ModelProcedure, Statement, build_batch_update, build_delete, build_insert,
};
pub use registry::ProcedureRegistry;
pub use request::{BatchUpdateContext, EntityRequest, ModelRequest};
pub use response::ProcedureResponse;

pub use pgclerk_core::{
    Archive, Connection, Cx, Diagnostics, Entity, Error, Filter, Model, Outcome,
    PropertyDescriptor, Record, Result, SqlArchive, Value,
};

/// Common imports.
pub mod prelude {
    pub use crate::{
        BatchUpdateContext, BatchUpdateProcedure, CreateProcedure, DeleteProcedure,
        EntityProcedure, EntityRequest, ModelProcedure, ModelRequest, PgArchive,
        ProcedureConfig, ProcedureRegistry, ProcedureResponse,
    };
    pub use pgclerk_core::{
        Archive, Connection, Cx, Entity, Error, Filter, Model, Outcome, PropertyDescriptor,
        Record, Value,
    };
    pub use std::sync::Arc;
}
