use super::{ty::ColumnType, Formatter, Ident, Literal, Params, ToSql};

use tabula_core::{
    driver::Dialect,
    schema::{Column, Table},
};

struct ColumnsWithConstraints<'a>(&'a Table);

struct ColumnDef<'a> {
    column: &'a Column,

    /// The column is the table's primary key
    primary_key: bool,
}

impl ToSql for &Table {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let if_not_exists = if f.serializer.supports_if_not_exists() {
            "IF NOT EXISTS "
        } else {
            ""
        };

        fmt!(
            f,
            "CREATE TABLE ", if_not_exists, Ident(&self.name), " (", ColumnsWithConstraints(self), ")"
        );
    }
}

impl ToSql for ColumnsWithConstraints<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = self.0;

        // SQLite declares an auto-incrementing key inline, as the only
        // primary key.
        let inline_pk = f.serializer.is_sqlite()
            && table.primary_key_column().is_some_and(|pk| pk.auto_increment);

        for (index, column) in table.columns().enumerate() {
            let primary_key = table.primary_key.as_deref() == Some(column.name.as_str());
            fmt!(f, "\n    ", ColumnDef { column, primary_key });
            if index < table.columns.len() - 1 {
                fmt!(f, ",");
            }
        }

        match &table.primary_key {
            Some(pk) if !inline_pk => fmt!(f, ",\n    PRIMARY KEY (", Ident(pk), ")\n"),
            _ => fmt!(f, "\n"),
        }
    }
}

impl ToSql for ColumnDef<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let column = self.column;
        fmt!(f, Ident(&column.name), " ");

        if column.auto_increment && self.primary_key {
            match f.serializer.dialect {
                Dialect::Sqlite => return fmt!(f, "INTEGER PRIMARY KEY AUTOINCREMENT"),
                Dialect::Mysql => return fmt!(f, ColumnType(column.ty), " NOT NULL AUTO_INCREMENT"),
                Dialect::Mssql => return fmt!(f, ColumnType(column.ty), " IDENTITY(1,1) NOT NULL"),
                Dialect::Postgresql | Dialect::Oracle | Dialect::Db2 => {
                    return fmt!(f, ColumnType(column.ty), " GENERATED BY DEFAULT AS IDENTITY")
                }
                Dialect::Generic => {}
            }
        }

        fmt!(f, ColumnType(column.ty));

        if !column.nullable {
            fmt!(f, " NOT NULL");
        }

        if let Some(default) = &column.default {
            fmt!(f, " DEFAULT ", Literal(default));
        }
    }
}
