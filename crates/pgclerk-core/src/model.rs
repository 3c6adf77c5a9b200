//! Model trait for record instances handed to procedures.
//!
//! A model belongs to the entity framework: it owns pending in-memory changes
//! and decides what a commit means. Procedures only ever ask it for two
//! things, both asynchronously: the committed property values and the
//! identifier value.

use crate::error::{Error, ValidationError};
use crate::value::Value;
use asupersync::{Cx, Outcome};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

/// Boxed future used by the object-safe traits in this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Ordered property → value mapping.
///
/// Order is significant: it fixes the column list and the bind order of the
/// statements built from it.
pub type PropertyValues = Vec<(String, Value)>;

/// A mutable record instance bound to one entity.
///
/// The trait is object-safe so requests can carry `Arc<dyn Model>`.
/// Implementations that need mutation on commit use interior mutability;
/// serializing concurrent commits on the same instance is their concern.
pub trait Model: fmt::Debug + Send + Sync {
    /// Finalize pending changes and return every property value to persist.
    fn commit<'a>(&'a self, cx: &'a Cx) -> BoxFuture<'a, Outcome<PropertyValues, Error>>;

    /// Read the identifier (primary-key) value.
    fn id<'a>(&'a self, cx: &'a Cx) -> BoxFuture<'a, Outcome<Value, Error>>;
}

#[derive(Debug, Default)]
struct RecordState {
    committed: PropertyValues,
    pending: PropertyValues,
}

/// In-memory [`Model`] with pending-change tracking.
///
/// Values set through [`Record::set`] stay pending until [`Model::commit`]
/// folds them into the committed state. Property order is first-set order.
pub struct Record {
    identifier: String,
    state: Mutex<RecordState>,
}

fn upsert(values: &mut PropertyValues, name: String, value: Value) {
    match values.iter_mut().find(|(n, _)| *n == name) {
        Some(slot) => slot.1 = value,
        None => values.push((name, value)),
    }
}

impl Record {
    /// Create an empty record whose identifier lives in `identifier`.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            state: Mutex::new(RecordState::default()),
        }
    }

    /// Create a record from already-persisted values (nothing pending).
    pub fn from_committed(identifier: impl Into<String>, values: PropertyValues) -> Self {
        Self {
            identifier: identifier.into(),
            state: Mutex::new(RecordState {
                committed: values,
                pending: Vec::new(),
            }),
        }
    }

    /// Set a property value; it stays pending until the next commit.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        upsert(&mut state.pending, name.into(), value.into());
    }

    /// Builder-style [`Record::set`].
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Current value of a property, pending changes included.
    pub fn get(&self, name: &str) -> Option<Value> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .pending
            .iter()
            .chain(state.committed.iter())
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Whether there are uncommitted changes.
    pub fn is_dirty(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        !state.pending.is_empty()
    }

    fn commit_now(&self) -> PropertyValues {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let pending = std::mem::take(&mut state.pending);
        for (name, value) in pending {
            upsert(&mut state.committed, name, value);
        }
        state.committed.clone()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Record")
            .field("identifier", &self.identifier)
            .field("committed", &state.committed)
            .field("pending", &state.pending)
            .finish()
    }
}

impl Model for Record {
    fn commit<'a>(&'a self, _cx: &'a Cx) -> BoxFuture<'a, Outcome<PropertyValues, Error>> {
        Box::pin(async move { Outcome::Ok(self.commit_now()) })
    }

    /// Fails with a validation error when the identifier is unset or null.
    fn id<'a>(&'a self, _cx: &'a Cx) -> BoxFuture<'a, Outcome<Value, Error>> {
        Box::pin(async move {
            match self.get(&self.identifier) {
                Some(value) if !value.is_null() => Outcome::Ok(value),
                _ => {
                    let mut missing = ValidationError::new();
                    missing.add_required(&self.identifier);
                    Outcome::Err(missing.into())
                }
            }
        })
    }
}
