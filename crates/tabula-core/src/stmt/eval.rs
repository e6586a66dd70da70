//! In-process evaluation of conditions against rows. Used by drivers that
//! do not speak SQL.

use super::{Condition, Row, Value};

use std::cmp::Ordering;

impl Condition {
    /// Returns `true` when `row` satisfies the condition. Missing columns read
    /// as `NULL`, and comparisons against `NULL` are false as in SQL.
    pub fn eval(&self, row: &Row) -> bool {
        let get = |column: &str| row.get(column).unwrap_or(&Value::Null);

        match self {
            Condition::Eq(column, value) => get(column).sql_eq(value),
            Condition::Ne(column, value) => {
                matches!(get(column).compare(value), Some(Ordering::Less | Ordering::Greater))
            }
            Condition::Lt(column, value) => get(column).compare(value) == Some(Ordering::Less),
            Condition::Le(column, value) => {
                matches!(get(column).compare(value), Some(Ordering::Less | Ordering::Equal))
            }
            Condition::Gt(column, value) => get(column).compare(value) == Some(Ordering::Greater),
            Condition::Ge(column, value) => {
                matches!(get(column).compare(value), Some(Ordering::Greater | Ordering::Equal))
            }
            Condition::Like(column, pattern) => match get(column) {
                Value::Null => false,
                Value::String(s) => like(s, pattern),
                other => other.to_key().is_some_and(|s| like(&s, pattern)),
            },
            Condition::IsNull(column) => get(column).is_null(),
            Condition::IsNotNull(column) => !get(column).is_null(),
            Condition::In(column, values) => {
                let actual = get(column);
                values.iter().any(|value| actual.sql_eq(value))
            }
            Condition::And(items) => items.iter().all(|item| item.eval(row)),
            Condition::Or(items) => items.iter().any(|item| item.eval(row)),
            Condition::Not(inner) => !inner.eval(row),
        }
    }
}

/// Case-insensitive `LIKE` matching.
fn like(input: &str, pattern: &str) -> bool {
    let input: Vec<char> = input.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    // Classic wildcard matching with backtracking on the last `%`.
    let (mut i, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while i < input.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == input[i]) {
            i += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            star = Some((p, i));
            p += 1;
        } else if let Some((star_p, star_i)) = star {
            p = star_p + 1;
            i = star_i + 1;
            star = Some((star_p, star_i + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new()
            .set("id", 7)
            .set("name", "Ann")
            .set("note", Value::Null)
    }

    #[test]
    fn comparisons() {
        assert!(Condition::eq("id", 7).eval(&row()));
        assert!(Condition::gt("id", 6).and(Condition::le("id", 7)).eval(&row()));
        assert!(!Condition::ne("id", 7).eval(&row()));
        assert!(Condition::in_list("id", [1, 7]).eval(&row()));
    }

    #[test]
    fn null_semantics() {
        assert!(Condition::is_null("note").eval(&row()));
        assert!(Condition::is_null("missing").eval(&row()));
        assert!(!Condition::eq("note", Value::Null).eval(&row()));
        assert!(!Condition::ne("note", 1).eval(&row()));
    }

    #[test]
    fn like_patterns() {
        assert!(like("Hello world", "hello%"));
        assert!(like("Hello world", "%WORLD"));
        assert!(like("abc", "a_c"));
        assert!(!like("abc", "a_d"));
        assert!(like("", "%"));
        assert!(like("aXbXc", "a%b%c"));
    }

    #[test]
    fn negation_and_or() {
        let cond = Condition::eq("name", "Bob").or(Condition::eq("name", "Ann"));
        assert!(cond.eval(&row()));
        assert!(!cond.not().eval(&row()));
    }
}
