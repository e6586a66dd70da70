use super::{Column, Schema, Table, View};
use crate::Result;

use indexmap::IndexMap;

/// Programmatic construction of a [`Schema`]. Names are canonicalized to
/// lower case and the result is verified by [`Builder::build`].
#[derive(Debug)]
pub struct Builder {
    name: String,
    readonly: bool,
    tables: Vec<TableBuilder>,
    views: Vec<View>,
}

#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    columns: Vec<Column>,
    primary_key: Option<String>,
    readonly: bool,
}

impl Builder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readonly: false,
            tables: vec![],
            views: vec![],
        }
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn table(mut self, table: TableBuilder) -> Self {
        self.tables.push(table);
        self
    }

    pub fn view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut tables = IndexMap::new();

        for table in self.tables {
            let name = table.name.to_lowercase();
            let primary_key = table.primary_key.map(|pk| pk.to_lowercase());
            let mut columns = IndexMap::new();

            for mut column in table.columns {
                column.name = column.name.to_lowercase();
                if primary_key.as_deref() == Some(column.name.as_str()) {
                    column.nullable = false;
                }
                if let Some(default) = column.default.take() {
                    column.default = Some(column.coerce(&name, default)?);
                }
                if columns.insert(column.name.clone(), column).is_some() {
                    return Err(crate::Error::invalid_schema(format!(
                        "table `{name}` defines a column twice"
                    )));
                }
            }

            let table = Table {
                name: name.clone(),
                columns,
                primary_key,
                readonly: table.readonly,
            };

            if tables.insert(name.clone(), table).is_some() {
                return Err(crate::Error::invalid_schema(format!(
                    "table `{name}` is defined twice"
                )));
            }
        }

        let mut views = IndexMap::new();
        for mut view in self.views {
            view.name = view.name.to_lowercase();
            for table in &mut view.tables {
                *table = table.to_lowercase();
            }
            for field in &mut view.fields {
                field.table = field.table.to_lowercase();
                field.column = field.column.to_lowercase();
            }
            views.insert(view.name.clone(), view);
        }

        let schema = Schema {
            name: self.name,
            tables,
            views,
            readonly: self.readonly,
        };

        schema.verify()?;
        Ok(schema)
    }
}

impl TableBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![],
            primary_key: None,
            readonly: false,
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Declares the primary key. The column becomes `NOT NULL`.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }
}
