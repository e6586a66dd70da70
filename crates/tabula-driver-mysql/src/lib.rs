mod value;
pub(crate) use value::Value;

use mysql_async::{
    prelude::{Queryable, ToValue},
    Conn, Params, Pool,
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
pub struct MySQL {
    pool: Pool,
}

impl MySQL {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::connection)?;

        if url.scheme() != "mysql" {
            return Err(Error::invalid_argument(format!(
                "connection url does not have a `mysql` scheme; url={url}"
            )));
        }

        if url.host_str().is_none() {
            return Err(Error::invalid_argument(format!(
                "missing host in connection URL; url={url}"
            )));
        }

        if url.path().trim_start_matches('/').is_empty() {
            return Err(Error::invalid_argument(format!(
                "no database specified - missing path in connection URL; url={url}"
            )));
        }

        let opts = mysql_async::Opts::from_url(url.as_ref()).map_err(Error::connection)?;
        let opts = mysql_async::OptsBuilder::from_opts(opts).client_found_rows(true);

        let pool = Pool::new(opts);
        Ok(Self { pool })
    }
}

impl From<Pool> for MySQL {
    fn from(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Driver for MySQL {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }

    async fn connect(&self) -> Result<Box<dyn tabula_core::Connection>> {
        let conn = self.pool.get_conn().await.map_err(Error::connection)?;
        Ok(Box::new(Connection::new(conn)))
    }
}

#[derive(Debug)]
pub struct Connection {
    conn: Conn,
}

impl Connection {
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }

    /// Runs a statement returning rows. `types` maps result columns to the
    /// declared column types used to decode them.
    async fn query(
        &mut self,
        sql: &str,
        params: Params,
        types: impl Fn(&str) -> Option<Type>,
    ) -> Result<ResultSet> {
        let mut result = self.conn.exec_iter(sql, params).await.map_err(Error::driver)?;

        let columns: Vec<String> = result
            .columns()
            .map(|columns| {
                columns
                    .iter()
                    .map(|column| column.name_str().to_lowercase())
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<mysql_async::Row> = result.collect().await.map_err(Error::driver)?;

        let tys: Vec<Option<Type>> = columns.iter().map(|name| types(name)).collect();
        let mut ret = Vec::with_capacity(rows.len());

        for mut row in rows {
            let mut record = Row::new();
            for (index, name) in columns.iter().enumerate() {
                let value = row
                    .take::<mysql_async::Value, usize>(index)
                    .unwrap_or(mysql_async::Value::NULL);
                record.insert(name, Value::from_sql(value, tys[index]).into_inner());
            }
            ret.push(record);
        }

        Ok(ResultSet::new(columns, ret.into_iter()))
    }

    async fn execute(&mut self, sql: &str, params: Params) -> Result<(u64, Option<u64>)> {
        let result = self.conn.exec_iter(sql, params).await.map_err(Error::driver)?;
        let counts = (result.affected_rows(), result.last_insert_id());
        result.drop_result().await.map_err(Error::driver)?;
        Ok(counts)
    }

    async fn query_drop(&mut self, sql: &str) -> Result<()> {
        debug!(%sql, "mysql execute");
        self.conn.query_drop(sql).await.map_err(Error::driver)
    }
}

impl From<Conn> for Connection {
    fn from(conn: Conn) -> Self {
        Self { conn }
    }
}

fn positional(params: Vec<tabula_core::stmt::Value>) -> Params {
    if params.is_empty() {
        return Params::Empty;
    }

    Params::Positional(
        params
            .into_iter()
            .map(|value| Value::from(value).to_value())
            .collect(),
    )
}

#[async_trait]
impl tabula_core::Connection for Connection {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    async fn send_query_object(&mut self, schema: &Schema, query: &Query) -> Result<Response> {
        let mut params: Vec<tabula_core::stmt::Value> = vec![];
        let sql = Serializer::mysql(schema).serialize(query, &mut params)?;

        debug!(%sql, params = params.len(), "mysql query");

        let params = positional(params);

        match query {
            Query::Select(select) => {
                let table = schema.table(&select.table);
                let types = |name: &str| {
                    if select.count {
                        return None;
                    }
                    table.and_then(|t| t.column(name)).map(|c| c.ty)
                };
                Ok(Response::values(self.query(&sql, params, types).await?))
            }
            Query::Insert(insert) => {
                let (count, last_insert_id) = self.execute(&sql, params).await?;
                let response = Response::count(count);

                let assigned = schema
                    .primary_key(&insert.table)
                    .is_some_and(|pk| !insert.row.contains(pk));

                Ok(match last_insert_id {
                    Some(id) if assigned && id > 0 => {
                        response.with_last_insert_id(i64::try_from(id).map_err(Error::driver)?)
                    }
                    _ => response,
                })
            }
            Query::Update(_) | Query::Remove(_) => {
                let (count, _) = self.execute(&sql, params).await?;
                Ok(Response::count(count))
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
        let sql = Serializer::mysql(&schema).paginate(sql, limit, offset);

        debug!(%sql, "mysql raw query");

        let mut result = self.conn.query_iter(&sql).await.map_err(Error::driver)?;

        let columns: Vec<String> = result
            .columns()
            .map(|columns| {
                columns
                    .iter()
                    .map(|column| column.name_str().to_lowercase())
                    .collect()
            })
            .unwrap_or_default();

        if columns.is_empty() {
            let count = result.affected_rows();
            result.drop_result().await.map_err(Error::driver)?;
            return Ok(Response::count(count));
        }

        let rows: Vec<mysql_async::Row> = result.collect().await.map_err(Error::driver)?;
        let rows = rows
            .into_iter()
            .map(|mut row| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(index, name)| {
                        let value = row
                            .take::<mysql_async::Value, usize>(index)
                            .unwrap_or(mysql_async::Value::NULL);
                        (name.clone(), Value::from_sql(value, None).into_inner())
                    })
                    .collect::<Row>()
            })
            .collect::<Vec<_>>();

        Ok(Response::values(ResultSet::new(columns, rows.into_iter())))
    }

    async fn begin_transaction(&mut self) -> Result<()> {
        self.query_drop(&transaction_sql(TransactionOp::Begin)).await
    }

    async fn commit(&mut self) -> Result<()> {
        self.query_drop(&transaction_sql(TransactionOp::Commit)).await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.query_drop(&transaction_sql(TransactionOp::Rollback)).await
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let mut rs = self
            .query(
                "SELECT table_name FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
                 ORDER BY table_name",
                Params::Empty,
                |_| None,
            )
            .await?;

        Ok(rs
            .fetch_column(0)?
            .into_iter()
            .filter_map(|name| name.as_str().map(str::to_string))
            .collect())
    }

    async fn list_table_fields(&mut self, table: &str) -> Result<Vec<TableField>> {
        let rows = self
            .query(
                "SELECT column_name, column_type, is_nullable, column_key \
                 FROM information_schema.columns \
                 WHERE table_schema = DATABASE() AND table_name = ? \
                 ORDER BY ordinal_position",
                Params::Positional(vec![mysql_async::Value::Bytes(table.as_bytes().to_vec())]),
                |_| None,
            )
            .await?
            .into_rows()?;

        if rows.is_empty() {
            return Err(Error::table_not_found(table));
        }

        Ok(rows
            .iter()
            .map(|row| TableField {
                name: text(row, "column_name"),
                ty: text(row, "column_type"),
                nullable: text(row, "is_nullable") == "YES",
                primary_key: text(row, "column_key") == "PRI",
            })
            .collect())
    }

    async fn list_table_indexes(&mut self, table: &str) -> Result<Vec<TableIndex>> {
        let rows = self
            .query(
                "SELECT index_name, column_name, non_unique \
                 FROM information_schema.statistics \
                 WHERE table_schema = DATABASE() AND table_name = ? \
                 ORDER BY index_name, seq_in_index",
                Params::Positional(vec![mysql_async::Value::Bytes(table.as_bytes().to_vec())]),
                |_| None,
            )
            .await?
            .into_rows()?;

        let mut ret: Vec<TableIndex> = vec![];

        for row in rows {
            let name = text(&row, "index_name");
            let column = text(&row, "column_name");

            match ret.last_mut() {
                Some(index) if index.name == name => index.columns.push(column),
                _ => ret.push(TableIndex {
                    name,
                    columns: vec![column],
                    unique: row.get("non_unique").and_then(|v| v.as_i64()) == Some(0),
                }),
            }
        }

        Ok(ret)
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        let serializer = Serializer::mysql(schema);

        for table in schema.tables() {
            self.query_drop(&serializer.serialize_create_table(table))
                .await?;
        }

        for view in schema.views() {
            self.query_drop(&serializer.serialize_create_view(view))
                .await?;
        }

        Ok(())
    }
}

fn transaction_sql(op: TransactionOp) -> String {
    let schema = Schema::default();
    Serializer::mysql(&schema).serialize_transaction(op)
}

fn text(row: &Row, column: &str) -> String {
    row.get(column)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}
