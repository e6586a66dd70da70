use super::{Condition, Query};

/// Deletes the rows matching a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Remove {
    pub table: String,

    pub filter: Condition,

    /// Upper bound on the number of deleted rows
    pub limit: Option<u64>,
}

impl Remove {
    pub fn new(table: impl Into<String>, filter: Condition) -> Self {
        Self {
            table: table.into(),
            filter,
            limit: None,
        }
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl From<Remove> for Query {
    fn from(value: Remove) -> Self {
        Self::Remove(value)
    }
}
