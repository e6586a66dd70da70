use super::{Formatter, Params, ToSql};

/// A paging clause: `LIMIT/OFFSET` or `OFFSET .. FETCH NEXT`, depending on
/// the dialect.
pub(super) struct Window {
    pub(super) limit: Option<u64>,
    pub(super) offset: u64,

    /// True when the statement already carries an `ORDER BY`
    pub(super) ordered: bool,
}

impl ToSql for Window {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if self.limit.is_none() && self.offset == 0 {
            return;
        }

        if f.serializer.uses_fetch_next() {
            // SQL Server only accepts OFFSET after an ORDER BY.
            if !self.ordered && f.serializer.dialect == tabula_core::driver::Dialect::Mssql {
                fmt!(f, " ORDER BY (SELECT NULL)");
            }

            fmt!(f, " OFFSET ", self.offset, " ROWS");

            if let Some(limit) = self.limit {
                fmt!(f, " FETCH NEXT ", limit, " ROWS ONLY");
            }
            return;
        }

        match self.limit {
            Some(limit) => fmt!(f, " LIMIT ", limit),
            None if f.serializer.is_sqlite() => fmt!(f, " LIMIT -1"),
            None if f.serializer.is_mysql() => fmt!(f, " LIMIT ", u64::MAX),
            None => {}
        }

        if self.offset > 0 {
            fmt!(f, " OFFSET ", self.offset);
        }
    }
}
