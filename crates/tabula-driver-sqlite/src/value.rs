use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};
use tabula_core::{schema::Type, stmt::Value as CoreValue, Error, Result};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core Tabula value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite value within a row to a Tabula value, using the
    /// declared column type when the column is known.
    pub fn from_sql(row: &Row<'_>, index: usize, ty: Option<Type>) -> Result<Self> {
        let value: SqlValue = row.get(index).map_err(Error::driver)?;

        let core_value = match value {
            SqlValue::Null => CoreValue::Null,
            SqlValue::Integer(value) => CoreValue::I64(value),
            SqlValue::Real(value) => CoreValue::F64(value),
            SqlValue::Text(value) => CoreValue::String(value),
            SqlValue::Blob(value) => CoreValue::Bytes(value),
        };

        Ok(Value(match ty {
            Some(ty) => ty.decode(core_value),
            None => core_value,
        }))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match &self.0 {
            CoreValue::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            CoreValue::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            CoreValue::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            CoreValue::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            CoreValue::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            CoreValue::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            CoreValue::Bytes(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            value @ CoreValue::Array(_) => {
                Ok(ToSqlOutput::Owned(SqlValue::Text(value.to_json_string())))
            }
        }
    }
}
