use super::{Comma, Formatter, Ident, Params, Period, ToSql};

use tabula_core::{
    driver::Dialect,
    schema::{CheckOption, Field, View},
};

impl ToSql for &View {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let dialect = f.serializer.dialect;

        let create = match dialect {
            Dialect::Sqlite => "CREATE VIEW IF NOT EXISTS ",
            Dialect::Mysql | Dialect::Postgresql => "CREATE OR REPLACE VIEW ",
            _ => "CREATE VIEW ",
        };

        fmt!(f, create, Ident(&self.name), " AS SELECT ");

        if self.fields.is_empty() {
            fmt!(f, "*");
        } else {
            fmt!(f, Comma(&self.fields));
        }

        fmt!(f, " FROM ", Comma(self.tables.iter().map(Ident)));

        if let Some(clause) = &self.where_clause {
            fmt!(f, " WHERE ", clause);
        }

        // SQL Server rejects ORDER BY in a view definition.
        if !self.order_by.is_empty() && dialect != Dialect::Mssql {
            let direction = if self.descending { " DESC" } else { " ASC" };
            fmt!(f, " ORDER BY ");
            for (i, column) in self.order_by.iter().enumerate() {
                if i > 0 {
                    fmt!(f, ", ");
                }
                fmt!(f, Ident(column), direction);
            }
        }

        let check = match (self.check_option, dialect) {
            (CheckOption::None, _) | (_, Dialect::Sqlite) => None,
            (_, Dialect::Mssql | Dialect::Oracle) => Some(" WITH CHECK OPTION"),
            (CheckOption::Local, _) => Some(" WITH LOCAL CHECK OPTION"),
            (CheckOption::Cascaded, _) => Some(" WITH CASCADED CHECK OPTION"),
        };
        fmt!(f, check);
    }
}

impl ToSql for &Field {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Period([Ident(&self.table), Ident(&self.column)]));

        if let Some(alias) = &self.alias {
            fmt!(f, " AS ", Ident(alias));
        }
    }
}
