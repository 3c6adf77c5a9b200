//! SQL text helpers for pgclerk.
//!
//! - [`Dialect`] - placeholders and identifier quoting
//! - [`sql_from_filter`] - structured filter → SQL with `:name` placeholders
//! - [`parse_named_attributes`] - `:name` placeholders → positional `?`
//! - [`normalize_for_postgres`] - `?`/backtick statements → `$n`/`"` statements

pub mod dialect;
pub mod filter;
pub mod named;
pub mod normalize;

pub use dialect::Dialect;
pub use filter::sql_from_filter;
pub use named::parse_named_attributes;
pub use normalize::{normalize_for_postgres, placeholder_count};
