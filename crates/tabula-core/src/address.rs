//! Dotted addresses: `table[.row][.column[.subindex...]]`.

use crate::{schema::Schema, Error, Result};

use std::fmt;

/// A parsed, schema-checked address.
///
/// Table and column names are canonical schema names. Row keys and sub-path
/// segments are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub table: String,

    /// `None` addresses the whole table
    pub row: Option<RowRef>,

    pub column: Option<String>,

    /// Path into an array-typed column value. Opaque to the resolver.
    pub path: Vec<String>,
}

/// The row segment of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRef {
    /// A primary key value, as written in the address
    Key(String),

    /// `*`: a row that does not exist yet (insert target)
    New,

    /// `?`: the rows selected by a where-clause passed next to the address
    Current,
}

impl Address {
    /// Parses `address` and checks the table and column against `schema`.
    pub fn parse(schema: &Schema, address: &str) -> Result<Address> {
        if address.is_empty() {
            return Err(Error::invalid_argument("address must not be empty"));
        }

        let mut segments = address.split('.');

        // `split` always yields at least one item
        let table_name = segments.next().unwrap_or_default();
        if table_name.is_empty() {
            return Err(Error::invalid_argument(format!(
                "address `{address}` does not name a table"
            )));
        }
        let table = schema.get_table(table_name)?;

        let row = segments.next().map(|segment| match segment {
            "*" => RowRef::New,
            "?" => RowRef::Current,
            key => RowRef::Key(key.to_string()),
        });

        let column = match segments.next() {
            Some(name) => Some(table.get_column(name)?.name.clone()),
            None => None,
        };

        let path = segments.map(str::to_string).collect();

        Ok(Address {
            table: table.name.clone(),
            row,
            column,
            path,
        })
    }

    /// Whole-table address, e.g. `guestbook`.
    pub fn is_table(&self) -> bool {
        self.row.is_none()
    }

    /// Whole-row address, e.g. `guestbook.7`.
    pub fn is_row(&self) -> bool {
        self.row.is_some() && self.column.is_none()
    }

    /// Column or sub-path address, e.g. `guestbook.7.guestbook_message`.
    pub fn is_column(&self) -> bool {
        self.column.is_some()
    }

    pub fn key(&self) -> Option<&str> {
        match &self.row {
            Some(RowRef::Key(key)) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table)?;

        if let Some(row) = &self.row {
            match row {
                RowRef::Key(key) => write!(f, ".{key}")?,
                RowRef::New => f.write_str(".*")?,
                RowRef::Current => f.write_str(".?")?,
            }
        }

        if let Some(column) = &self.column {
            write!(f, ".{column}")?;
        }

        for segment in &self.path {
            write!(f, ".{segment}")?;
        }

        Ok(())
    }
}
