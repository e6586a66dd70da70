use super::Column;
use crate::{Error, Result};

use indexmap::IndexMap;

/// A database table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Canonical (lower-case) name of the table
    pub name: String,

    /// The table's columns, keyed by canonical name, in declaration order
    pub columns: IndexMap<String, Column>,

    /// Name of the primary key column, if the table has one
    pub primary_key: Option<String>,

    pub readonly: bool,
}

impl Table {
    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Option<&Column> {
        match self.columns.get(name) {
            Some(column) => Some(column),
            None => self.columns.get(&name.to_lowercase()),
        }
    }

    pub fn get_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| Error::column_not_found(&self.name, name))
    }

    pub fn is_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn primary_key_column(&self) -> Option<&Column> {
        self.primary_key
            .as_deref()
            .and_then(|name| self.columns.get(name))
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = &Column> + '_ {
        self.columns.values()
    }
}
