use super::{Formatter, Params, ToSql};

use tabula_core::{driver::Dialect, schema::Type};

/// Column type as spelled in `CREATE TABLE`.
pub(super) struct ColumnType(pub(super) Type);

impl ToSql for ColumnType {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use Dialect::*;

        let dialect = f.serializer.dialect;

        match self.0 {
            Type::Integer => fmt!(
                f,
                match dialect {
                    Sqlite | Generic => "INTEGER",
                    Oracle => "NUMBER(19)",
                    _ => "BIGINT",
                }
            ),
            Type::Float => fmt!(
                f,
                match dialect {
                    Sqlite => "REAL",
                    Mysql => "DOUBLE",
                    Mssql => "FLOAT",
                    Oracle => "BINARY_DOUBLE",
                    _ => "DOUBLE PRECISION",
                }
            ),
            Type::Boolean => fmt!(
                f,
                match dialect {
                    Mssql => "BIT",
                    Oracle => "NUMBER(1)",
                    Db2 => "SMALLINT",
                    _ => "BOOLEAN",
                }
            ),
            Type::String(len) => {
                let name = match dialect {
                    Oracle => "VARCHAR2",
                    Mssql => "NVARCHAR",
                    _ => "VARCHAR",
                };
                fmt!(f, name, "(", len.unwrap_or(255), ")");
            }
            // Arrays are stored as JSON text.
            Type::Text | Type::Array => fmt!(
                f,
                match dialect {
                    Mssql => "NVARCHAR(MAX)",
                    Oracle | Db2 => "CLOB",
                    _ => "TEXT",
                }
            ),
            Type::Blob => fmt!(
                f,
                match dialect {
                    Postgresql => "BYTEA",
                    Mssql => "VARBINARY(MAX)",
                    Mysql => "LONGBLOB",
                    _ => "BLOB",
                }
            ),
        }
    }
}
