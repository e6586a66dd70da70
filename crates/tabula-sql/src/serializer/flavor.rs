use super::Serializer;

use tabula_core::{driver::Dialect, schema::Schema};

impl<'a> Serializer<'a> {
    pub fn sqlite(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Dialect::Sqlite)
    }

    pub fn mysql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Dialect::Mysql)
    }

    pub fn postgresql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Dialect::Postgresql)
    }

    pub fn mssql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Dialect::Mssql)
    }

    pub fn oracle(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Dialect::Oracle)
    }

    pub fn db2(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Dialect::Db2)
    }

    pub(super) fn is_sqlite(&self) -> bool {
        self.dialect == Dialect::Sqlite
    }

    pub(super) fn is_mysql(&self) -> bool {
        self.dialect == Dialect::Mysql
    }

    /// `DELETE ... LIMIT n`
    pub(super) fn supports_delete_limit(&self) -> bool {
        self.is_mysql()
    }

    /// `CREATE TABLE IF NOT EXISTS`
    pub(super) fn supports_if_not_exists(&self) -> bool {
        matches!(
            self.dialect,
            Dialect::Sqlite | Dialect::Mysql | Dialect::Postgresql
        )
    }

    /// Paging through `OFFSET n ROWS FETCH NEXT m ROWS ONLY`
    pub(super) fn uses_fetch_next(&self) -> bool {
        matches!(self.dialect, Dialect::Mssql | Dialect::Oracle | Dialect::Db2)
    }

    /// Boolean literals are written as `1`/`0`.
    pub(super) fn numeric_booleans(&self) -> bool {
        matches!(self.dialect, Dialect::Mssql | Dialect::Oracle | Dialect::Db2)
    }
}
