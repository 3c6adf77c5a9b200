//! Statement normalization for PostgreSQL drivers.
//!
//! Procedures emit `?` placeholders and backtick-quoted identifiers for
//! DELETE and UPDATE statements. PostgreSQL understands neither, so the
//! archive rewrites statements before they reach the driver:
//!
//! - `?` → `$1`, `$2`, ... in order of appearance
//! - `` `ident` `` → `"ident"` (embedded `"` doubled, doubled backticks collapsed)
//!
//! Single-quoted literals and double-quoted identifiers pass through untouched.
//! Statements that already use `$n` placeholders are left as they are.

use crate::dialect::Dialect;

/// Rewrite `sql` into PostgreSQL placeholder and quoting style.
pub fn normalize_for_postgres(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut chars = sql.chars().peekable();
    let mut index = 0;

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                copy_quoted(c, &mut chars, &mut out);
            }
            '`' => {
                let mut ident = String::new();
                while let Some(n) = chars.next() {
                    if n == '`' {
                        if chars.peek() == Some(&'`') {
                            chars.next();
                            ident.push('`');
                        } else {
                            break;
                        }
                    } else {
                        ident.push(n);
                    }
                }
                out.push_str(&Dialect::Postgres.quote_identifier(&ident));
            }
            '?' => {
                index += 1;
                out.push_str(&Dialect::Postgres.placeholder(index));
            }
            other => out.push(other),
        }
    }

    out
}

/// Copy the remainder of a quoted run (the opening quote is already written),
/// honouring doubled-quote escapes.
fn copy_quoted(
    quote: char,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    out: &mut String,
) {
    while let Some(n) = chars.next() {
        out.push(n);
        if n == quote {
            if chars.peek() == Some(&quote) {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else {
                return;
            }
        }
    }
}

/// Number of parameters a statement expects once normalized.
///
/// This is the highest `$n` index outside quoted runs, so a reused `$1`
/// counts once.
pub fn placeholder_count(sql: &str) -> usize {
    let normalized = normalize_for_postgres(sql);
    let mut highest = 0;
    let mut chars = normalized.chars().peekable();
    let mut scratch = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => copy_quoted(c, &mut chars, &mut scratch),
            '$' => {
                let mut digits = String::new();
                while let Some(d) = chars.next_if(char::is_ascii_digit) {
                    digits.push(d);
                }
                if let Ok(n) = digits.parse::<usize>() {
                    highest = highest.max(n);
                }
            }
            _ => {}
        }
    }
    highest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_statement() {
        assert_eq!(
            normalize_for_postgres("DELETE FROM `users` WHERE `id` = ?"),
            "DELETE FROM \"users\" WHERE \"id\" = $1"
        );
    }

    #[test]
    fn test_update_statement() {
        assert_eq!(
            normalize_for_postgres(
                "UPDATE `users` SET `users`.`a` = ? , `users`.`b` = ? WHERE \"id\" = ?"
            ),
            "UPDATE \"users\" SET \"users\".\"a\" = $1 , \"users\".\"b\" = $2 WHERE \"id\" = $3"
        );
    }

    #[test]
    fn test_literals_untouched() {
        assert_eq!(
            normalize_for_postgres("SELECT '?', 'it''s `x`', \"q?\" FROM t WHERE a = ?"),
            "SELECT '?', 'it''s `x`', \"q?\" FROM t WHERE a = $1"
        );
    }

    #[test]
    fn test_backtick_escapes() {
        assert_eq!(normalize_for_postgres("`a``b`"), "\"a`b\"");
        assert_eq!(normalize_for_postgres("`we\"ird`"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_dollar_placeholders_pass_through() {
        let insert = "INSERT INTO \"users\" ( \"name\" ) VALUES (  $1  )";
        assert_eq!(normalize_for_postgres(insert), insert);
    }

    #[test]
    fn test_placeholder_count() {
        assert_eq!(placeholder_count("DELETE FROM `t` WHERE `id` = ?"), 1);
        assert_eq!(
            placeholder_count("INSERT INTO \"t\" ( \"a\" , \"b\" ) VALUES (  $1  ,  $2  )"),
            2
        );
        assert_eq!(placeholder_count("SELECT '$7' WHERE a = ?"), 1);
        assert_eq!(placeholder_count("a = $1 OR b = $1"), 1);
        assert_eq!(placeholder_count("SELECT 1"), 0);
    }
}
