use super::{Formatter, ToSql};

use tabula_core::{driver::Dialect, stmt::Value};

pub trait Params {
    fn push(&mut self, param: &Value) -> Placeholder;
}

/// 1-based position of a bound parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

impl Params for Vec<Value> {
    fn push(&mut self, value: &Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use std::fmt::Write;

        let _ = match f.serializer.dialect {
            Dialect::Sqlite => write!(f.dst, "?{}", self.0),
            Dialect::Postgresql => write!(f.dst, "${}", self.0),
            Dialect::Mssql => write!(f.dst, "@p{}", self.0),
            Dialect::Oracle => write!(f.dst, ":{}", self.0),
            Dialect::Mysql | Dialect::Db2 | Dialect::Generic => write!(f.dst, "?"),
        };
    }
}

impl ToSql for &Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        // Array-typed columns are stored as JSON text.
        let placeholder = match self {
            Value::Array(_) => f.params.push(&Value::String(self.to_json_string())),
            value => f.params.push(value),
        };
        fmt!(f, placeholder)
    }
}
