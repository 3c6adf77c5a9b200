//! Named placeholder rewriting.

use pgclerk_core::{FilterError, FilterErrorKind, NamedParams, ParsedQuery, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Matches, in priority order: a double-quoted identifier, a single-quoted
/// literal, a `::` cast (all three kept verbatim), or a `:name` placeholder.
const PLACEHOLDER_PATTERN: &str =
    r#""(?:[^"]|"")*"|'(?:[^']|'')*'|::|:([A-Za-z_][A-Za-z0-9_]*)"#;

fn placeholder_regex() -> Result<&'static Regex> {
    static REGEX: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(PLACEHOLDER_PATTERN))
        .as_ref()
        .map_err(|e| {
            FilterError::new(
                FilterErrorKind::InvalidFilter,
                format!("placeholder pattern failed to compile: {e}"),
            )
            .into()
        })
}

/// Rewrite every `:name` placeholder in `fragment` into `?` and collect the
/// bound values in occurrence order.
///
/// A name used twice yields its value twice. Quoted identifiers, single-quoted
/// literals and `::` casts are left alone. A placeholder with no entry in
/// `params` is an error; unused entries are ignored.
pub fn parse_named_attributes(fragment: &str, params: &NamedParams) -> Result<ParsedQuery> {
    let regex = placeholder_regex()?;
    let mut query = String::with_capacity(fragment.len());
    let mut values = Vec::new();
    let mut last = 0;

    for caps in regex.captures_iter(fragment) {
        let Some(name) = caps.get(1) else {
            continue;
        };
        let whole = caps.get(0).map_or(name.range(), |m| m.range());

        let value = params
            .iter()
            .find(|(n, _)| n == name.as_str())
            .map(|(_, v)| v.clone())
            .ok_or_else(|| {
                FilterError::new(
                    FilterErrorKind::MissingParameter,
                    format!("no value bound for placeholder ':{}'", name.as_str()),
                )
            })?;

        query.push_str(&fragment[last..whole.start]);
        query.push('?');
        values.push(value);
        last = whole.end;
    }
    query.push_str(&fragment[last..]);

    tracing::trace!(query = %query, count = values.len(), "Parsed named attributes");

    Ok(ParsedQuery {
        query,
        params: values,
    })
}
