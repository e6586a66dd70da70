use super::{limit::Window, Comma, Formatter, Ident, Params, ToSql};

use tabula_core::stmt::{Direction, Insert, OrderBy, Remove, Select, Update};

impl ToSql for &Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "SELECT ");

        if self.count {
            fmt!(f, "COUNT(*)");
        } else if self.columns.is_empty() {
            fmt!(f, "*");
        } else {
            fmt!(f, Comma(self.columns.iter().map(Ident)));
        }

        fmt!(f, " FROM ", Ident(&self.table));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }

        // Ordering and paging do not change a count.
        if self.count {
            return;
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY ", Comma(&self.order_by));
        }

        if let Some(limit) = &self.limit {
            let window = Window {
                limit: limit.limit,
                offset: limit.offset,
                ordered: !self.order_by.is_empty(),
            };
            fmt!(f, window);
        }
    }
}

impl ToSql for &OrderBy {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let direction = match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, Ident(&self.column), direction);
    }
}

impl ToSql for &Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = Ident(&self.table);

        if self.row.is_empty() {
            if f.serializer.is_mysql() {
                fmt!(f, "INSERT INTO ", table, " () VALUES ()");
            } else {
                fmt!(f, "INSERT INTO ", table, " DEFAULT VALUES");
            }
            return;
        }

        let columns = Comma(self.row.columns().map(Ident));
        let values = Comma(self.row.iter().map(|(_, value)| value));

        fmt!(f, "INSERT INTO ", table, " (", columns, ") VALUES (", values, ")");
    }
}

impl ToSql for &Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let assignments = Comma(&self.assignments);

        fmt!(
            f,
            "UPDATE ", Ident(&self.table), " SET ", assignments, " WHERE ", &self.filter
        );
    }
}

impl ToSql for &Remove {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = Ident(&self.table);

        match self.limit {
            None => fmt!(f, "DELETE FROM ", table, " WHERE ", &self.filter),
            Some(limit) if f.serializer.supports_delete_limit() => {
                fmt!(f, "DELETE FROM ", table, " WHERE ", &self.filter, " LIMIT ", limit)
            }
            Some(limit) => {
                let serializer = f.serializer;
                let Some(pk) = serializer.schema.primary_key(&self.table) else {
                    // Rejected by `Serializer::serialize`.
                    fmt!(f, "DELETE FROM ", table, " WHERE ", &self.filter);
                    return;
                };

                let window = Window {
                    limit: Some(limit),
                    offset: 0,
                    ordered: false,
                };

                fmt!(
                    f,
                    "DELETE FROM ", table, " WHERE ", Ident(pk), " IN (SELECT ", Ident(pk),
                    " FROM ", Ident(&self.table), " WHERE ", &self.filter, window, ")"
                );
            }
        }
    }
}
