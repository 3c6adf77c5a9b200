//! Structured filter expressions.
//!
//! Procedures treat a [`Filter`] as opaque and hand it to the archive for
//! translation into SQL. The JSON form is tagged by `op`:
//!
//! ```json
//! {"op": "and", "filters": [
//!     {"op": "compare", "property": "status", "comparison": "eq", "value": {"Text": "active"}},
//!     {"op": "is_null", "property": "deleted_at"}
//! ]}
//! ```

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Comparison operators supported by [`Filter::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl ComparisonOp {
    /// SQL operator text.
    pub const fn as_sql(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Like => "LIKE",
        }
    }
}

/// A structured predicate over entity properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    /// Matches every row
    #[default]
    All,
    /// `property <op> value`
    Compare {
        property: String,
        comparison: ComparisonOp,
        value: Value,
    },
    /// `property IN (values...)`, or `NOT IN` when negated
    In {
        property: String,
        values: Vec<Value>,
        #[serde(default)]
        negated: bool,
    },
    /// `property IS NULL`, or `IS NOT NULL` when negated
    IsNull {
        property: String,
        #[serde(default)]
        negated: bool,
    },
    /// Conjunction; an empty list matches every row
    And { filters: Vec<Filter> },
    /// Disjunction; an empty list matches no row
    Or { filters: Vec<Filter> },
    /// Negation
    Not { filter: Box<Filter> },
}

impl Filter {
    fn compare(property: impl Into<String>, comparison: ComparisonOp, value: impl Into<Value>) -> Self {
        Filter::Compare {
            property: property.into(),
            comparison,
            value: value.into(),
        }
    }

    pub fn eq(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(property, ComparisonOp::Eq, value)
    }

    pub fn ne(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(property, ComparisonOp::Ne, value)
    }

    pub fn lt(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(property, ComparisonOp::Lt, value)
    }

    pub fn le(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(property, ComparisonOp::Le, value)
    }

    pub fn gt(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(property, ComparisonOp::Gt, value)
    }

    pub fn ge(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(property, ComparisonOp::Ge, value)
    }

    pub fn like(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::compare(property, ComparisonOp::Like, Value::Text(pattern.into()))
    }

    pub fn in_list<V: Into<Value>>(
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Filter::In {
            property: property.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    pub fn not_in_list<V: Into<Value>>(
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Filter::In {
            property: property.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    pub fn is_null(property: impl Into<String>) -> Self {
        Filter::IsNull {
            property: property.into(),
            negated: false,
        }
    }

    pub fn is_not_null(property: impl Into<String>) -> Self {
        Filter::IsNull {
            property: property.into(),
            negated: true,
        }
    }

    /// Combine with another filter using AND, flattening nested conjunctions.
    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And { mut filters } => {
                filters.push(other);
                Filter::And { filters }
            }
            first => Filter::And {
                filters: vec![first, other],
            },
        }
    }

    /// Combine with another filter using OR, flattening nested disjunctions.
    pub fn or(self, other: Filter) -> Self {
        match self {
            Filter::Or { mut filters } => {
                filters.push(other);
                Filter::Or { filters }
            }
            first => Filter::Or {
                filters: vec![first, other],
            },
        }
    }

    /// Negate this filter.
    pub fn not(self) -> Self {
        Filter::Not {
            filter: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_flattens() {
        let f = Filter::eq("a", 1_i32).and(Filter::eq("b", 2_i32)).and(Filter::is_null("c"));
        match f {
            Filter::And { filters } => assert_eq!(filters.len(), 3),
            other => panic!("expected AND, got {other:?}"),
        }
    }

    #[test]
    fn test_json_form() {
        let json = r#"{"op": "and", "filters": [
            {"op": "compare", "property": "status", "comparison": "eq", "value": {"Text": "active"}},
            {"op": "in", "property": "id", "values": [{"Int": 1}, {"Int": 2}]}
        ]}"#;
        let filter: Filter = serde_json::from_str(json).unwrap();
        assert_eq!(
            filter,
            Filter::eq("status", "active").and(Filter::in_list("id", [1_i32, 2]))
        );
    }

    #[test]
    fn test_operator_sql() {
        assert_eq!(ComparisonOp::Ne.as_sql(), "<>");
        assert_eq!(ComparisonOp::Like.as_sql(), "LIKE");
    }
}
