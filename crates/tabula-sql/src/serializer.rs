#[macro_use]
mod fmt;
use fmt::ToSql;

mod condition;

mod create_table;

mod create_view;

mod delim;
use delim::{Comma, Delimited, Period};

mod flavor;

mod ident;
use ident::Ident;

mod limit;

mod literal;
use literal::Literal;

mod params;
pub use params::{Params, Placeholder};

mod statement;

mod ty;

use tabula_core::{
    driver::Dialect,
    schema::{Schema, Table, View},
    stmt::{Assignment, Query},
    Error, Result,
};

/// Serialize a statement to a SQL string
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Schema against which the statement is to be serialized
    schema: &'a Schema,

    /// Handles the differences between SQL dialects: identifier quoting,
    /// placeholders, paging and column types.
    dialect: Dialect,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

/// Transaction control statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOp {
    Begin,
    Commit,
    Rollback,
}

impl<'a> Serializer<'a> {
    pub fn new(schema: &'a Schema, dialect: Dialect) -> Serializer<'a> {
        Serializer { schema, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Serializes a query. Values are pushed to `params` and referenced by
    /// placeholders.
    ///
    /// Array sub-path assignments must be resolved into whole-column values
    /// before a query reaches SQL.
    pub fn serialize(&self, query: &Query, params: &mut impl Params) -> Result<String> {
        match query {
            Query::Update(update) => {
                if let Some(patch) = update.assignments.iter().find(|a| a.is_patch()) {
                    return Err(Error::invalid_argument(format!(
                        "unresolved sub-path assignment to {}.{}",
                        update.table,
                        patch.column()
                    )));
                }
                if update.assignments.is_empty() {
                    return Err(Error::invalid_argument(format!(
                        "update of {} assigns no columns",
                        update.table
                    )));
                }
            }
            Query::Remove(remove) if remove.limit.is_some() && !self.supports_delete_limit() => {
                if self.schema.primary_key(&remove.table).is_none() {
                    return Err(Error::unsupported_feature(format!(
                        "limited delete from {} without primary key on {}",
                        remove.table, self.dialect
                    )));
                }
            }
            _ => {}
        }

        Ok(self.render(params, |f| query.to_sql(f)))
    }

    /// Serializes `CREATE TABLE` for `table`.
    pub fn serialize_create_table(&self, table: &Table) -> String {
        self.render(&mut Vec::new(), |f| table.to_sql(f))
    }

    /// Serializes `CREATE VIEW` for `view`.
    pub fn serialize_create_view(&self, view: &View) -> String {
        self.render(&mut Vec::new(), |f| view.to_sql(f))
    }

    /// Appends the dialect's paging clause to a raw SQL statement.
    pub fn paginate(&self, sql: &str, limit: Option<u64>, offset: Option<u64>) -> String {
        let window = limit::Window {
            limit,
            offset: offset.unwrap_or(0),
            ordered: sql.to_uppercase().contains("ORDER BY"),
        };

        self.render(&mut Vec::new(), |f| {
            fmt!(f, sql.trim_end().trim_end_matches(';'), window);
        })
    }

    /// Serializes a transaction control statement.
    pub fn serialize_transaction(&self, op: TransactionOp) -> String {
        match (op, self.dialect) {
            (TransactionOp::Begin, Dialect::Mysql) => "START TRANSACTION",
            (TransactionOp::Begin, Dialect::Mssql) => "BEGIN TRANSACTION",
            (TransactionOp::Begin, Dialect::Oracle | Dialect::Db2) => "SET TRANSACTION READ WRITE",
            (TransactionOp::Begin, _) => "BEGIN",
            (TransactionOp::Commit, _) => "COMMIT",
            (TransactionOp::Rollback, _) => "ROLLBACK",
        }
        .to_string()
    }

    fn render<P: Params>(&self, params: &mut P, write: impl FnOnce(&mut Formatter<'_, P>)) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        write(&mut fmt);
        ret
    }

}

impl ToSql for &Query {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Query::Select(stmt) => stmt.to_sql(f),
            Query::Insert(stmt) => stmt.to_sql(f),
            Query::Update(stmt) => stmt.to_sql(f),
            Query::Remove(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &Assignment {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Assignment::Set { column, value } => fmt!(f, Ident(column), " = ", value),
            Assignment::Patch { .. } => unreachable!("patches are rejected before serialization"),
        }
    }
}
