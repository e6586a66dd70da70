use super::Type;
use crate::{stmt::Value, Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Canonical (lower-case) column name
    pub name: String,

    pub ty: Type,

    /// Whether or not the column accepts `NULL`
    pub nullable: bool,

    /// Value used when an insert leaves the column out
    pub default: Option<Value>,

    /// True if the database assigns the value on insert. Only valid for an
    /// integer primary key.
    pub auto_increment: bool,

    /// Computed or database-maintained column; reads only.
    pub readonly: bool,
}

impl Column {
    /// A nullable column without default.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
            default: None,
            auto_increment: false,
            readonly: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self.nullable = false;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Fails with `NotWriteable` if writes may not assign this column.
    pub fn check_writeable(&self, table: &str) -> Result<&Self> {
        if self.readonly {
            return Err(Error::not_writeable(format!("column `{table}.{}`", self.name)));
        }
        Ok(self)
    }

    /// Validates `value` for this column of `table` and coerces it to the
    /// declared type.
    pub fn coerce(&self, table: &str, value: Value) -> Result<Value> {
        if value.is_null() {
            return if self.nullable {
                Ok(Value::Null)
            } else {
                Err(Error::validation(
                    table,
                    &self.name,
                    "column does not accept NULL",
                ))
            };
        }

        self.ty
            .coerce(value)
            .map_err(|message| Error::validation(table, &self.name, message))
    }
}
