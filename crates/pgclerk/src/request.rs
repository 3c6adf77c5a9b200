//! Procedure request types.

use pgclerk_core::{Entity, Filter, Model, PropertyValues, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request for a procedure that acts on a single model instance.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub entity: Arc<Entity>,
    pub model: Arc<dyn Model>,
}

impl ModelRequest {
    pub fn new(entity: Arc<Entity>, model: Arc<dyn Model>) -> Self {
        Self { entity, model }
    }
}

/// Request for a procedure that acts on a whole entity, with a
/// procedure-specific context.
#[derive(Debug, Clone)]
pub struct EntityRequest<C = BatchUpdateContext> {
    pub entity: Arc<Entity>,
    pub context: C,
}

impl<C> EntityRequest<C> {
    pub fn new(entity: Arc<Entity>, context: C) -> Self {
        Self { entity, context }
    }
}

/// Context for a batch update: the assignments to apply and the filter
/// selecting the rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchUpdateContext {
    /// Property → new value, applied in order
    pub values: PropertyValues,
    /// Row selection; all rows when omitted
    #[serde(default)]
    pub filter: Filter,
}

impl BatchUpdateContext {
    pub fn new(filter: Filter) -> Self {
        Self {
            values: PropertyValues::new(),
            filter,
        }
    }

    /// Add an assignment. Setting the same property twice replaces the
    /// earlier value and keeps its position.
    pub fn set(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        let property = property.into();
        let value = value.into();
        match self.values.iter_mut().find(|(name, _)| *name == property) {
            Some(slot) => slot.1 = value,
            None => self.values.push((property, value)),
        }
        self
    }
}
