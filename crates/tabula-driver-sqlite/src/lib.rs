mod value;
pub(crate) use value::Value;

use rusqlite::Connection as RusqliteConnection;
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tabula_core::{
    async_trait,
    driver::{Capability, Dialect, Driver, Response, ResultSet, TableField, TableIndex},
    schema::{Schema, Type},
    stmt::{Query, Row},
    Error, Result,
};
use tabula_sql::{Serializer, TransactionOp};
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),

    /// Every connection shares the one database, so data survives a
    /// connection being dropped and reopened.
    InMemory(Arc<Mutex<RusqliteConnection>>),
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::connection)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_argument(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        match url.path() {
            "" | ":memory:" => Self::in_memory(),
            path => Ok(Self::open(path)),
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::connection)?;
        Ok(Self::InMemory(Arc::new(Mutex::new(connection))))
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn tabula_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory(shared) => Connection {
                connection: shared.clone(),
            },
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: Arc<Mutex<RusqliteConnection>>,
}

impl Connection {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, RusqliteConnection> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn execute_batch(&self, sql: &str) -> Result<()> {
        debug!(%sql, "sqlite execute");
        self.lock().execute_batch(sql).map_err(Error::driver)
    }

    /// Runs a statement returning rows. `types` maps result columns to the
    /// declared column types used to decode them.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
        types: impl Fn(&str) -> Option<Type>,
    ) -> Result<ResultSet> {
        let connection = self.lock();
        let mut stmt = connection.prepare_cached(sql).map_err(Error::driver)?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|name| name.to_lowercase())
            .collect();
        let tys: Vec<Option<Type>> = columns.iter().map(|name| types(name)).collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::driver)? {
            let mut record = Row::new();
            for (index, name) in columns.iter().enumerate() {
                let value = Value::from_sql(row, index, tys[index])?;
                record.insert(name, value.into_inner());
            }
            ret.push(record);
        }

        Ok(ResultSet::new(columns, ret.into_iter()))
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let connection = self.lock();
        let mut stmt = connection.prepare_cached(sql).map_err(Error::driver)?;
        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver)?;
        Ok(count as u64)
    }

    fn last_insert_rowid(&self) -> i64 {
        self.lock().last_insert_rowid()
    }
}

#[async_trait]
impl tabula_core::Connection for Connection {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn send_query_object(&mut self, schema: &Schema, query: &Query) -> Result<Response> {
        let mut params: Vec<tabula_core::stmt::Value> = vec![];
        let sql = Serializer::sqlite(schema).serialize(query, &mut params)?;
        let params: Vec<Value> = params.into_iter().map(Value::from).collect();

        debug!(%sql, params = params.len(), "sqlite query");

        match query {
            Query::Select(select) => {
                let table = schema.table(&select.table);
                let types = |name: &str| {
                    if select.count {
                        return None;
                    }
                    table.and_then(|t| t.column(name)).map(|c| c.ty)
                };
                Ok(Response::values(self.query(&sql, &params, types)?))
            }
            Query::Insert(insert) => {
                let count = self.execute(&sql, &params)?;
                let response = Response::count(count);

                // Report the key SQLite assigned when the row left it out.
                let assigned = schema
                    .primary_key(&insert.table)
                    .is_some_and(|pk| !insert.row.contains(pk));

                Ok(if assigned {
                    response.with_last_insert_id(self.last_insert_rowid())
                } else {
                    response
                })
            }
            Query::Update(_) | Query::Remove(_) => {
                Ok(Response::count(self.execute(&sql, &params)?))
            }
        }
    }

    async fn send_query_string(
        &mut self,
        sql: &str,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Response> {
        let schema = Schema::default();
        let sql = Serializer::sqlite(&schema).paginate(sql, limit, offset);

        debug!(%sql, "sqlite raw query");

        let returns_rows = {
            let connection = self.lock();
            let stmt = connection.prepare_cached(&sql).map_err(Error::driver)?;
            stmt.column_count() > 0
        };

        if returns_rows {
            Ok(Response::values(self.query(&sql, &[], |_| None)?))
        } else {
            Ok(Response::count(self.execute(&sql, &[])?))
        }
    }

    async fn begin_transaction(&mut self) -> Result<()> {
        self.execute_batch(&transaction_sql(TransactionOp::Begin))
    }

    async fn commit(&mut self) -> Result<()> {
        self.execute_batch(&transaction_sql(TransactionOp::Commit))
    }

    async fn rollback(&mut self) -> Result<()> {
        self.execute_batch(&transaction_sql(TransactionOp::Rollback))
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let mut rs = self.query(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite_%' ORDER BY name",
            &[],
            |_| None,
        )?;

        Ok(rs
            .fetch_column(0)?
            .into_iter()
            .filter_map(|name| name.as_str().map(str::to_string))
            .collect())
    }

    async fn list_table_fields(&mut self, table: &str) -> Result<Vec<TableField>> {
        let sql = format!(
            "PRAGMA table_info({})",
            Dialect::Sqlite.quote_identifier(table)
        );
        let rows = self.query(&sql, &[], |_| None)?.into_rows()?;

        if rows.is_empty() {
            return Err(Error::table_not_found(table));
        }

        Ok(rows
            .iter()
            .map(|row| TableField {
                name: text(row, "name"),
                ty: text(row, "type"),
                nullable: row.get("notnull").and_then(|v| v.as_i64()) == Some(0),
                primary_key: row.get("pk").and_then(|v| v.as_i64()).unwrap_or(0) > 0,
            })
            .collect())
    }

    async fn list_table_indexes(&mut self, table: &str) -> Result<Vec<TableIndex>> {
        let sql = format!(
            "PRAGMA index_list({})",
            Dialect::Sqlite.quote_identifier(table)
        );
        let indexes = self.query(&sql, &[], |_| None)?.into_rows()?;

        let mut ret = vec![];

        for index in indexes {
            let name = text(&index, "name");
            let sql = format!(
                "PRAGMA index_info({})",
                Dialect::Sqlite.quote_identifier(&name)
            );
            let columns = self
                .query(&sql, &[], |_| None)?
                .into_rows()?
                .iter()
                .map(|row| text(row, "name"))
                .collect();

            ret.push(TableIndex {
                name,
                columns,
                unique: index.get("unique").and_then(|v| v.as_i64()) == Some(1),
            });
        }

        Ok(ret)
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        let serializer = Serializer::sqlite(schema);

        for table in schema.tables() {
            self.execute_batch(&serializer.serialize_create_table(table))?;
        }

        for view in schema.views() {
            self.execute_batch(&serializer.serialize_create_view(view))?;
        }

        Ok(())
    }
}

fn transaction_sql(op: TransactionOp) -> String {
    let schema = Schema::default();
    Serializer::sqlite(&schema).serialize_transaction(op)
}

fn text(row: &Row, column: &str) -> String {
    row.get(column)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}
