use super::{Insert, Remove, Select, Update};

/// A dialect-independent query, built once and consumed by a driver or
/// placed in the transaction queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Remove(Remove),
}

impl Query {
    pub fn table(&self) -> &str {
        match self {
            Self::Select(stmt) => &stmt.table,
            Self::Insert(stmt) => &stmt.table,
            Self::Update(stmt) => &stmt.table,
            Self::Remove(stmt) => &stmt.table,
        }
    }

    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Select(_))
    }

    pub fn as_select(&self) -> Option<&Select> {
        match self {
            Self::Select(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn as_update(&self) -> Option<&Update> {
        match self {
            Self::Update(stmt) => Some(stmt),
            _ => None,
        }
    }

    /// Short verb used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Remove(_) => "remove",
        }
    }
}
