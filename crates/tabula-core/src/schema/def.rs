//! Declarative schema definitions, as stored in JSON files.
//!
//! ```json
//! {
//!   "name": "guestbook",
//!   "tables": {
//!     "guestbook": {
//!       "primary_key": "guestbook_id",
//!       "columns": {
//!         "guestbook_id": { "type": "integer", "auto_increment": true },
//!         "guestbook_name": { "type": "string", "length": 64, "nullable": false }
//!       }
//!     }
//!   }
//! }
//! ```

use super::{Builder, CheckOption, Column, Schema, TableBuilder, Type, View};
use crate::{stmt::Value, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaDef {
    pub name: String,

    #[serde(default)]
    pub readonly: bool,

    #[serde(default)]
    pub tables: IndexMap<String, TableDef>,

    #[serde(default)]
    pub views: IndexMap<String, ViewDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableDef {
    #[serde(default)]
    pub primary_key: Option<String>,

    #[serde(default)]
    pub readonly: bool,

    pub columns: IndexMap<String, ColumnDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnDef {
    #[serde(rename = "type")]
    pub ty: TypeDef,

    /// Maximum length of string columns
    #[serde(default)]
    pub length: Option<u64>,

    #[serde(default = "default_nullable")]
    pub nullable: bool,

    #[serde(default)]
    pub default: Option<serde_json::Value>,

    #[serde(default)]
    pub auto_increment: bool,

    #[serde(default)]
    pub readonly: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeDef {
    #[serde(alias = "int")]
    Integer,
    #[serde(alias = "double")]
    Float,
    #[serde(alias = "bool")]
    Boolean,
    String,
    Text,
    #[serde(alias = "set", alias = "list")]
    Array,
    Blob,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewDef {
    pub tables: Vec<String>,

    #[serde(default)]
    pub fields: Vec<FieldDef>,

    #[serde(default, rename = "where")]
    pub where_clause: Option<String>,

    #[serde(default)]
    pub order_by: Vec<String>,

    #[serde(default)]
    pub descending: bool,

    #[serde(default = "default_view_readonly")]
    pub readonly: bool,

    #[serde(default)]
    pub check_option: CheckOption,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldDef {
    pub column: String,

    /// Source table; may be left out when the view has a single table
    #[serde(default)]
    pub table: Option<String>,

    #[serde(default)]
    pub alias: Option<String>,
}

fn default_nullable() -> bool {
    true
}

fn default_view_readonly() -> bool {
    true
}

impl Schema {
    /// Builds and verifies a schema from its declarative definition.
    pub fn from_def(def: SchemaDef) -> Result<Schema> {
        let mut builder = Builder::new(def.name).readonly(def.readonly);

        for (name, table) in def.tables {
            let mut table_builder = TableBuilder::new(name).readonly(table.readonly);

            if let Some(pk) = table.primary_key {
                table_builder = table_builder.primary_key(pk);
            }

            for (name, column) in table.columns {
                table_builder = table_builder.column(column.into_column(name));
            }

            builder = builder.table(table_builder);
        }

        for (name, view) in def.views {
            builder = builder.view(view.into_view(name));
        }

        builder.build()
    }
}

impl ColumnDef {
    fn into_column(self, name: String) -> Column {
        let ty = match self.ty {
            TypeDef::Integer => Type::Integer,
            TypeDef::Float => Type::Float,
            TypeDef::Boolean => Type::Boolean,
            TypeDef::String => Type::String(self.length),
            TypeDef::Text => Type::Text,
            TypeDef::Array => Type::Array,
            TypeDef::Blob => Type::Blob,
        };

        Column {
            name,
            ty,
            nullable: self.nullable && !self.auto_increment,
            default: self.default.map(Value::from_json),
            auto_increment: self.auto_increment,
            readonly: self.readonly,
        }
    }
}

impl ViewDef {
    fn into_view(self, name: String) -> View {
        let single_table = match &self.tables[..] {
            [table] => Some(table.clone()),
            _ => None,
        };

        let mut view = View::new(name, self.tables);
        view.where_clause = self.where_clause;
        view.order_by = self.order_by;
        view.descending = self.descending;
        view.readonly = self.readonly;
        view.check_option = self.check_option;

        for field in self.fields {
            // An unqualified field in a multi-table view has no source table;
            // verification reports it as not belonging to the view.
            let table = field
                .table
                .or_else(|| single_table.clone())
                .unwrap_or_default();
            view = match field.alias {
                Some(alias) => view.field_as(table, field.column, alias),
                None => view.field(table, field.column),
            };
        }

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GUESTBOOK: &str = r#"{
        "name": "guestbook",
        "tables": {
            "guestbook": {
                "primary_key": "guestbook_id",
                "columns": {
                    "guestbook_id": { "type": "integer", "auto_increment": true },
                    "guestbook_name": { "type": "string", "length": 64, "nullable": false },
                    "guestbook_message": { "type": "text" },
                    "guestbook_opt": { "type": "array" },
                    "guestbook_public": { "type": "bool", "default": true },
                    "guestbook_hits": { "type": "integer", "readonly": true }
                }
            }
        },
        "views": {
            "public_entries": {
                "tables": ["guestbook"],
                "fields": [{ "column": "guestbook_name", "alias": "name" }],
                "where": "guestbook_public = 1",
                "check_option": "local"
            }
        }
    }"#;

    #[test]
    fn parse_guestbook() {
        let schema = Schema::from_json(GUESTBOOK).unwrap();
        let table = schema.get_table("guestbook").unwrap();

        assert_eq!(table.primary_key.as_deref(), Some("guestbook_id"));
        assert_eq!(
            table.get_column("guestbook_name").unwrap().ty,
            Type::String(Some(64))
        );
        assert!(!table.get_column("guestbook_name").unwrap().nullable);
        assert_eq!(
            table.get_column("guestbook_public").unwrap().default,
            Some(Value::Bool(true))
        );
        assert!(table.get_column("guestbook_hits").unwrap().readonly);
        assert!(!table.get_column("guestbook_message").unwrap().readonly);

        let view = schema.get_view("public_entries").unwrap();
        assert_eq!(view.fields[0].table, "guestbook");
        assert_eq!(view.fields[0].alias.as_deref(), Some("name"));
        assert_eq!(view.check_option, CheckOption::Local);
        assert!(view.readonly);
    }

    #[test]
    fn malformed_json_is_an_invalid_schema() {
        let err = Schema::from_json("{ \"tables\": 3 }").unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn bad_default_is_rejected() {
        let err = Schema::from_json(
            r#"{ "name": "db", "tables": { "t": { "columns": {
                "n": { "type": "integer", "default": "abc" }
            } } } }"#,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}
