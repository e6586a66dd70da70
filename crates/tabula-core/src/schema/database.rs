use super::{Builder, Table, View};
use crate::{Error, Result};

use indexmap::IndexMap;

/// In-memory definition of one database: its tables and views.
///
/// A `Schema` is immutable once built. Connections share it behind an
/// `Arc`; see [`SchemaFactory`](super::SchemaFactory) for loading and caching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub name: String,

    /// Tables keyed by canonical (lower-case) name, in declaration order
    pub tables: IndexMap<String, Table>,

    /// Views keyed by canonical (lower-case) name
    pub views: IndexMap<String, View>,

    pub readonly: bool,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> Builder {
        Builder::new(name)
    }

    /// Case-insensitive table lookup.
    pub fn table(&self, name: &str) -> Option<&Table> {
        match self.tables.get(name) {
            Some(table) => Some(table),
            None => self.tables.get(&name.to_lowercase()),
        }
    }

    pub fn get_table(&self, name: &str) -> Result<&Table> {
        self.table(name)
            .ok_or_else(|| Error::table_not_found(name))
    }

    pub fn is_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    /// Name of the table's primary key column. `None` when the table does not
    /// exist or has no primary key.
    pub fn primary_key(&self, table: &str) -> Option<&str> {
        self.table(table)?.primary_key.as_deref()
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn view(&self, name: &str) -> Option<&View> {
        match self.views.get(name) {
            Some(view) => Some(view),
            None => self.views.get(&name.to_lowercase()),
        }
    }

    pub fn get_view(&self, name: &str) -> Result<&View> {
        self.view(name).ok_or_else(|| Error::table_not_found(name))
    }

    pub fn is_view(&self, name: &str) -> bool {
        self.view(name).is_some()
    }

    /// Fails with a not-writeable error when the schema or the table is
    /// flagged read-only.
    pub fn check_writeable(&self, table: &str) -> Result<&Table> {
        if self.readonly {
            return Err(Error::not_writeable(format!("database `{}`", self.name)));
        }

        let table = self.get_table(table)?;
        if table.readonly {
            return Err(Error::not_writeable(format!("table `{}`", table.name)));
        }

        Ok(table)
    }

    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Table> + '_ {
        self.tables.values()
    }

    pub fn views(&self) -> impl ExactSizeIterator<Item = &View> + '_ {
        self.views.values()
    }

    /// Parses and verifies a JSON schema definition.
    pub fn from_json(src: &str) -> Result<Schema> {
        let def: super::SchemaDef = serde_json::from_str(src)
            .map_err(|err| Error::invalid_schema(err.to_string()))?;
        Schema::from_def(def)
    }
}
