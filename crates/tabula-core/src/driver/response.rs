use super::ResultSet;
use crate::{err, stmt::Value, Result};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,

    /// Key assigned by the database to an inserted row
    pub last_insert_id: Option<Value>,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, as a cursor over rows
    Values(ResultSet),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
            last_insert_id: None,
        }
    }

    pub fn values(values: ResultSet) -> Self {
        Self {
            rows: Rows::Values(values),
            last_insert_id: None,
        }
    }

    pub fn empty_values() -> Self {
        Self::values(ResultSet::empty())
    }

    pub fn with_last_insert_id(mut self, id: impl Into<Value>) -> Self {
        self.last_insert_id = Some(id.into());
        self
    }

    pub fn into_count(self) -> Result<u64> {
        self.rows.into_count()
    }

    pub fn into_values(self) -> Result<ResultSet> {
        self.rows.into_values()
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            Rows::Values(_) => Err(err!("expected a row count, got a result set")),
        }
    }

    pub fn into_values(self) -> Result<ResultSet> {
        match self {
            Rows::Values(values) => Ok(values),
            Rows::Count(_) => Err(err!("expected a result set, got a row count")),
        }
    }
}
