use super::{Query, Row};

/// Creates one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,

    /// Column values, already coerced to the declared column types. An
    /// auto-increment primary key left out of the row is assigned by the
    /// database.
    pub row: Row,
}

impl Insert {
    pub fn new(table: impl Into<String>, row: Row) -> Self {
        Self {
            table: table.into(),
            row,
        }
    }
}

impl From<Insert> for Query {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
