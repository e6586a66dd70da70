use super::Value;
use crate::Result;

/// A typed where-clause.
///
/// Columns are named, not resolved: the query builder checks every name
/// against the schema before the condition is attached to a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    Ne(String, Value),
    Lt(String, Value),
    Le(String, Value),
    Gt(String, Value),
    Ge(String, Value),

    /// SQL `LIKE` with `%` and `_` wildcards.
    Like(String, String),

    IsNull(String),
    IsNotNull(String),
    In(String, Vec<Value>),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(column.into(), value.into())
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne(column.into(), value.into())
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt(column.into(), value.into())
    }

    pub fn le(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Le(column.into(), value.into())
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt(column.into(), value.into())
    }

    pub fn ge(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ge(column.into(), value.into())
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Like(column.into(), pattern.into())
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::IsNull(column.into())
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::IsNotNull(column.into())
    }

    pub fn in_list<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    /// Conjunction, flattening nested `And`s.
    pub fn and(self, other: Condition) -> Self {
        match (self, other) {
            (Self::And(mut lhs), Self::And(rhs)) => {
                lhs.extend(rhs);
                Self::And(lhs)
            }
            (Self::And(mut lhs), rhs) => {
                lhs.push(rhs);
                Self::And(lhs)
            }
            (lhs, rhs) => Self::And(vec![lhs, rhs]),
        }
    }

    pub fn or(self, other: Condition) -> Self {
        match (self, other) {
            (Self::Or(mut lhs), Self::Or(rhs)) => {
                lhs.extend(rhs);
                Self::Or(lhs)
            }
            (Self::Or(mut lhs), rhs) => {
                lhs.push(rhs);
                Self::Or(lhs)
            }
            (lhs, rhs) => Self::Or(vec![lhs, rhs]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Visits every column name and the values compared against it, letting
    /// the caller rename the column and rewrite the values in place.
    pub fn try_visit_columns_mut(
        &mut self,
        f: &mut impl FnMut(&mut String, &mut [Value]) -> Result<()>,
    ) -> Result<()> {
        match self {
            Self::Eq(column, value)
            | Self::Ne(column, value)
            | Self::Lt(column, value)
            | Self::Le(column, value)
            | Self::Gt(column, value)
            | Self::Ge(column, value) => f(column, std::slice::from_mut(value)),
            Self::Like(column, _) | Self::IsNull(column) | Self::IsNotNull(column) => {
                f(column, &mut [])
            }
            Self::In(column, values) => f(column, values),
            Self::And(items) | Self::Or(items) => {
                for item in items {
                    item.try_visit_columns_mut(f)?;
                }
                Ok(())
            }
            Self::Not(inner) => inner.try_visit_columns_mut(f),
        }
    }
}
