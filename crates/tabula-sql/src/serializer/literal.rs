use super::{Formatter, Params, ToSql};

use tabula_core::{driver::Dialect, stmt::Value};

use std::fmt::Write;

/// A value written inline, for DDL where placeholders are not accepted.
pub(super) struct Literal<'a>(pub(super) &'a Value);

impl ToSql for Literal<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self.0 {
            Value::Null => fmt!(f, "NULL"),
            Value::Bool(v) if f.serializer.numeric_booleans() => {
                fmt!(f, if *v { "1" } else { "0" })
            }
            Value::Bool(v) => fmt!(f, if *v { "TRUE" } else { "FALSE" }),
            Value::I64(v) => {
                let _ = write!(f.dst, "{v}");
            }
            Value::F64(v) => {
                let _ = write!(f.dst, "{v:?}");
            }
            Value::String(v) => string(f, v),
            Value::Bytes(v) => {
                let hex: String = v.iter().map(|b| format!("{b:02X}")).collect();
                match f.serializer.dialect {
                    Dialect::Mssql => fmt!(f, "0x", &hex),
                    Dialect::Postgresql => fmt!(f, "'\\x", &hex, "'"),
                    _ => fmt!(f, "X'", &hex, "'"),
                }
            }
            value @ Value::Array(_) => string(f, &value.to_json_string()),
        }
    }
}

fn string<P: Params>(f: &mut Formatter<'_, P>, value: &str) {
    f.dst.push('\'');
    f.dst.push_str(&value.replace('\'', "''"));
    f.dst.push('\'');
}
