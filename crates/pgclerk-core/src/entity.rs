//! Entity and property descriptors.
//!
//! An [`Entity`] describes one table: its name (`source`), its primary-key
//! column (`identifier`) and the properties a model of that entity carries.
//!
//! Table and column names are spliced into SQL text as quoted identifiers;
//! they are never bound as parameters. Entity definitions must therefore come
//! from trusted code or configuration, never from end-user input.

use serde::{Deserialize, Serialize};

/// The primary-key descriptor of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    /// Column name of the primary key
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::new("id")
    }
}

/// Metadata about one entity property/column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name (also the column name)
    pub name: String,
    /// Whether an INSERT must carry a value for this property
    #[serde(default)]
    pub required: bool,
}

impl PropertyDescriptor {
    /// Create an optional property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }

    /// Mark this property as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Table metadata consumed by procedures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity name as known to the application
    pub name: String,
    /// Table name
    pub source: String,
    /// Primary-key column
    #[serde(default)]
    pub identifier: Identifier,
    /// Property descriptors in declaration order
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl Entity {
    /// Create an entity whose name and source table coincide.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            name: source.clone(),
            source,
            identifier: Identifier::default(),
            properties: Vec::new(),
        }
    }

    /// Set the application-level entity name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the identifier column.
    pub fn identifier(mut self, name: impl Into<String>) -> Self {
        self.identifier = Identifier::new(name);
        self
    }

    /// Append a property descriptor.
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Look up a property by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Iterate over the properties marked required, in declaration order.
    pub fn required_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|p| p.is_required())
    }
}
