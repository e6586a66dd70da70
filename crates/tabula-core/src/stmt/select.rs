use super::{Condition, Limit, OrderBy, Query};

/// Reads rows from one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Table to read from
    pub table: String,

    /// Columns to return. Empty means every column.
    pub columns: Vec<String>,

    /// Row filter
    pub filter: Option<Condition>,

    pub order_by: Vec<OrderBy>,

    pub limit: Option<Limit>,

    /// When set, the query returns a single `COUNT(*)` value instead of rows.
    pub count: bool,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: vec![],
            filter: None,
            order_by: vec![],
            limit: None,
            count: false,
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }
}

impl From<Select> for Query {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
