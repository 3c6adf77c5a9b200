//! Filter → SQL translation with named placeholders.
//!
//! [`sql_from_filter`] renders a [`Filter`] into a WHERE fragment using
//! `:name` placeholders, recording every bound value in a [`NamedParams`]
//! map. Names are derived from property names and made unique by suffixing
//! (`age`, `age_1`, `age_2`, ...), so one property can appear several times.

use crate::dialect::Dialect;
use pgclerk_core::{Filter, FilterError, FilterErrorKind, NamedParams, Result, Value};

/// Render `filter` as SQL, appending bound values to `params`.
///
/// Column references are quoted for `dialect`. Existing entries in `params`
/// are kept and never reused, so several filters can share one map.
#[tracing::instrument(level = "trace", skip(filter, params))]
pub fn sql_from_filter(
    filter: &Filter,
    dialect: Dialect,
    params: &mut NamedParams,
) -> Result<String> {
    match filter {
        Filter::All => Ok("1 = 1".to_string()),
        Filter::Compare {
            property,
            comparison,
            value,
        } => {
            let column = column(dialect, property)?;
            let name = bind(params, property, value.clone());
            Ok(format!("{} {} :{}", column, comparison.as_sql(), name))
        }
        Filter::In {
            property,
            values,
            negated,
        } => {
            if values.is_empty() {
                return Err(FilterError::new(
                    FilterErrorKind::InvalidFilter,
                    format!("IN list for property '{property}' is empty"),
                )
                .into());
            }
            let column = column(dialect, property)?;
            let names: Vec<String> = values
                .iter()
                .map(|v| format!(":{}", bind(params, property, v.clone())))
                .collect();
            let op = if *negated { "NOT IN" } else { "IN" };
            Ok(format!("{} {} ({})", column, op, names.join(", ")))
        }
        Filter::IsNull { property, negated } => {
            let column = column(dialect, property)?;
            let op = if *negated { "IS NOT NULL" } else { "IS NULL" };
            Ok(format!("{} {}", column, op))
        }
        Filter::And { filters } => join(filters, " AND ", "1 = 1", dialect, params),
        Filter::Or { filters } => join(filters, " OR ", "1 = 0", dialect, params),
        Filter::Not { filter } => Ok(format!("NOT ({})", sql_from_filter(filter, dialect, params)?)),
    }
}

fn join(
    filters: &[Filter],
    separator: &str,
    empty: &str,
    dialect: Dialect,
    params: &mut NamedParams,
) -> Result<String> {
    match filters {
        [] => Ok(empty.to_string()),
        [only] => sql_from_filter(only, dialect, params),
        many => {
            let parts = many
                .iter()
                .map(|f| sql_from_filter(f, dialect, params))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("({})", parts.join(separator)))
        }
    }
}

fn column(dialect: Dialect, property: &str) -> Result<String> {
    if property.is_empty() {
        return Err(FilterError::new(
            FilterErrorKind::InvalidFilter,
            "filter references an empty property name",
        )
        .into());
    }
    Ok(dialect.quote_identifier(property))
}

/// Record `value` under a fresh name derived from `property`.
fn bind(params: &mut NamedParams, property: &str, value: Value) -> String {
    let mut base: String = property
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if !base.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        base.insert_str(0, "p_");
    }

    let taken = |candidate: &str| params.iter().any(|(n, _)| n == candidate);
    let mut name = base.clone();
    let mut suffix = 1;
    while taken(&name) {
        name = format!("{base}_{suffix}");
        suffix += 1;
    }

    params.push((name.clone(), value));
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare() {
        let mut params = NamedParams::new();
        let sql = sql_from_filter(&Filter::eq("id", 5_i32), Dialect::Postgres, &mut params).unwrap();
        assert_eq!(sql, "\"id\" = :id");
        assert_eq!(params, vec![("id".to_string(), Value::Int(5))]);
    }

    #[test]
    fn test_repeated_property_gets_unique_names() {
        let mut params = NamedParams::new();
        let filter = Filter::ge("age", 18_i32).and(Filter::lt("age", 65_i32));
        let sql = sql_from_filter(&filter, Dialect::Postgres, &mut params).unwrap();
        assert_eq!(sql, "(\"age\" >= :age AND \"age\" < :age_1)");
        assert_eq!(params[1], ("age_1".to_string(), Value::Int(65)));
    }

    #[test]
    fn test_in_and_null() {
        let mut params = NamedParams::new();
        let filter = Filter::in_list("status", ["a", "b"]).or(Filter::is_not_null("deleted_at"));
        let sql = sql_from_filter(&filter, Dialect::Postgres, &mut params).unwrap();
        assert_eq!(
            sql,
            "(\"status\" IN (:status, :status_1) OR \"deleted_at\" IS NOT NULL)"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_not_and_empty_groups() {
        let mut params = NamedParams::new();
        let sql = sql_from_filter(
            &Filter::like("name", "A%").not(),
            Dialect::Postgres,
            &mut params,
        )
        .unwrap();
        assert_eq!(sql, "NOT (\"name\" LIKE :name)");

        let all = sql_from_filter(&Filter::And { filters: vec![] }, Dialect::Postgres, &mut params);
        assert_eq!(all.unwrap(), "1 = 1");
        let none = sql_from_filter(&Filter::Or { filters: vec![] }, Dialect::Postgres, &mut params);
        assert_eq!(none.unwrap(), "1 = 0");
    }

    #[test]
    fn test_sanitized_names() {
        let mut params = NamedParams::new();
        let sql = sql_from_filter(&Filter::eq("2nd-col", 1_i32), Dialect::Postgres, &mut params)
            .unwrap();
        assert_eq!(sql, "\"2nd-col\" = :p_2nd_col");
    }

    #[test]
    fn test_existing_params_are_not_reused() {
        let mut params = vec![("id".to_string(), Value::Int(1))];
        let sql = sql_from_filter(&Filter::eq("id", 2_i32), Dialect::Postgres, &mut params).unwrap();
        assert_eq!(sql, "\"id\" = :id_1");
    }

    #[test]
    fn test_invalid_filters() {
        let mut params = NamedParams::new();
        let empty_in = Filter::In {
            property: "id".to_string(),
            values: Vec::new(),
            negated: false,
        };
        assert!(matches!(
            sql_from_filter(&empty_in, Dialect::Postgres, &mut params),
            Err(pgclerk_core::Error::Filter(FilterError {
                kind: FilterErrorKind::InvalidFilter,
                ..
            }))
        ));
        assert!(sql_from_filter(&Filter::is_null(""), Dialect::Postgres, &mut params).is_err());
    }
}
