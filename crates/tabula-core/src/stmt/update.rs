use super::{Condition, Query, Value};

/// Changes columns of the rows matching a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,

    pub assignments: Vec<Assignment>,

    /// Rows to update. Never empty: updates always target a key or an
    /// explicit where-clause.
    pub filter: Condition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// Replace the whole column value
    Set { column: String, value: Value },

    /// Replace one element inside an array-typed column. The stored array is
    /// read, patched and rewritten when the update is applied.
    Patch {
        column: String,
        path: Vec<String>,
        value: Value,
    },
}

impl Assignment {
    pub fn column(&self) -> &str {
        match self {
            Self::Set { column, .. } | Self::Patch { column, .. } => column,
        }
    }

    pub fn is_patch(&self) -> bool {
        matches!(self, Self::Patch { .. })
    }
}

impl Update {
    pub fn new(table: impl Into<String>, filter: Condition) -> Self {
        Self {
            table: table.into(),
            assignments: vec![],
            filter,
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assignments.push(Assignment::Set {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn patch(
        mut self,
        column: impl Into<String>,
        path: Vec<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.assignments.push(Assignment::Patch {
            column: column.into(),
            path,
            value: value.into(),
        });
        self
    }

    pub fn has_patches(&self) -> bool {
        self.assignments.iter().any(Assignment::is_patch)
    }
}

impl From<Update> for Query {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
