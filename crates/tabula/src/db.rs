mod builder;
pub use builder::Builder;

mod connect;
pub use connect::driver;

use crate::{
    query::{Options, QueryBuilder},
    transaction::{State, TransactionQueue},
    Dsn, EditWindow,
};

use by_address::ByAddress;
use indexmap::IndexMap;
use std::{fmt, sync::Arc};
use tabula_core::{
    address::RowRef,
    driver::{Dialect, Response},
    schema::Table,
    stmt::{Array, Condition, Row, Select, Value},
    Address, Connection, Driver, Error, Result, Schema, WriteOp,
};
use tracing::info;

/// The connection facade: one schema, one lazily opened driver connection
/// and one queue of pending writes.
///
/// Reads go to the database immediately. Writes are validated and queued,
/// then applied in order by [`Db::commit`].
pub struct Db {
    schema: Arc<Schema>,
    dsn: Dsn,
    driver: Option<Arc<dyn Driver>>,
    connection: Option<Box<dyn Connection>>,
    queue: TransactionQueue,

    /// Keys generated by the last commit, by table
    last_insert_ids: IndexMap<String, Value>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn dsn(&self) -> &Dsn {
        &self.dsn
    }

    /// Dialect of the resolved driver, or of the DSN before one is resolved.
    pub fn dialect(&self) -> Dialect {
        match &self.driver {
            Some(driver) => driver.dialect(),
            None => self.dsn.dialect(),
        }
    }

    pub fn quote_identifier(&self, name: &str) -> String {
        self.dialect().quote_identifier(name).into_owned()
    }

    /// Number of writes waiting for `commit`.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn state(&self) -> State {
        self.queue.state()
    }

    /// Key the database generated for `table` during the last commit. A
    /// failed commit leaves no keys behind.
    pub fn last_insert_id(&self, table: &str) -> Option<&Value> {
        self.last_insert_ids.get(&table.to_lowercase())
    }

    /// Reads the value at `address`.
    ///
    /// * a table returns an array of rows keyed by primary key (by position
    ///   for tables without one)
    /// * a row returns an array of its columns, empty when the row does not
    ///   exist
    /// * a column returns its value, `NULL` when the row does not exist
    /// * a sub-path returns the addressed element of an array column
    pub async fn select(&mut self, address: &str) -> Result<Value> {
        self.select_with(address, Options::default()).await
    }

    pub async fn select_with(&mut self, address: &str, options: Options) -> Result<Value> {
        let address = Address::parse(&self.schema, address)?;
        let select = QueryBuilder::new(&self.schema).build_select(&address, &options)?;
        let rows = self.fetch(select).await?;

        let table = self.schema.get_table(&address.table)?;
        Ok(shape(table, &address, rows))
    }

    /// Reads the rows at `address` without reshaping them.
    pub async fn select_rows(&mut self, address: &str, options: Options) -> Result<Vec<Row>> {
        let address = Address::parse(&self.schema, address)?;
        let select = QueryBuilder::new(&self.schema).build_select(&address, &options)?;
        self.fetch(select).await
    }

    /// Reads the row at a keyed row address, failing when it does not exist.
    pub async fn get(&mut self, address: &str) -> Result<Row> {
        let address = Address::parse(&self.schema, address)?;
        if address.key().is_none() || address.is_column() {
            return Err(Error::invalid_argument(format!(
                "`{address}` does not address a single row"
            )));
        }

        let select = QueryBuilder::new(&self.schema).build_select(&address, &Options::default())?;
        self.fetch(select)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::record_not_found(address.to_string()))
    }

    /// Returns `true` when `select(address)` would return a non-empty value.
    pub async fn exists(&mut self, address: &str) -> Result<bool> {
        let parsed = Address::parse(&self.schema, address)?;

        if parsed.is_column() {
            return Ok(!self.select(address).await?.is_empty());
        }

        let select = QueryBuilder::new(&self.schema).build_count(&parsed, None)?;
        Ok(self.count(select).await? > 0)
    }

    /// Number of rows in `table` matching `filter`.
    pub async fn length(&mut self, table: &str, filter: Option<Condition>) -> Result<u64> {
        let address = Address::parse(&self.schema, table)?;
        let select = QueryBuilder::new(&self.schema).build_count(&address, filter.as_ref())?;
        self.count(select).await
    }

    /// Queues an insert of `values` at a table, `table.*` or `table.key`
    /// address.
    pub fn insert(&mut self, address: &str, values: impl Into<Value>) -> Result<&mut Self> {
        let address = Address::parse(&self.schema, address)?;
        let insert = QueryBuilder::new(&self.schema).build_insert(&address, values.into())?;
        self.queue.enqueue(WriteOp::Insert, insert);
        Ok(self)
    }

    /// Queues an update of the keyed row, column or array element at
    /// `address`.
    pub fn update(&mut self, address: &str, values: impl Into<Value>) -> Result<&mut Self> {
        self.queue_update(address, values.into(), None)
    }

    /// Queues an update of the rows matching `filter`, for `table` and
    /// `table.?` addresses.
    pub fn update_where(
        &mut self,
        address: &str,
        filter: Condition,
        values: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.queue_update(address, values.into(), Some(&filter))
    }

    fn queue_update(
        &mut self,
        address: &str,
        values: Value,
        filter: Option<&Condition>,
    ) -> Result<&mut Self> {
        let address = Address::parse(&self.schema, address)?;
        let update = QueryBuilder::new(&self.schema).build_update(&address, values, filter)?;
        self.queue.enqueue(WriteOp::Update, update);
        Ok(self)
    }

    /// Queues an update when the keyed row exists and an insert otherwise.
    ///
    /// Existence is checked now, not at commit time.
    pub async fn insert_or_update(
        &mut self,
        address: &str,
        values: impl Into<Value>,
    ) -> Result<&mut Self> {
        let parsed = Address::parse(&self.schema, address)?;

        let exists = match &parsed.row {
            Some(RowRef::Key(_)) => {
                let row = Address {
                    column: None,
                    path: vec![],
                    ..parsed.clone()
                };
                let select = QueryBuilder::new(&self.schema).build_count(&row, None)?;
                self.count(select).await? > 0
            }
            Some(RowRef::Current) => {
                return Err(Error::invalid_argument(format!(
                    "cannot insert or update `{parsed}`: use `*` or an explicit key"
                )))
            }
            None | Some(RowRef::New) => false,
        };

        if exists {
            self.update(address, values)
        } else {
            self.insert(address, values)
        }
    }

    /// Queues removal of the keyed row at `address`.
    pub fn remove(&mut self, address: &str) -> Result<&mut Self> {
        self.queue_remove(address, None, None)
    }

    /// Queues removal of up to `limit` rows matching `filter`.
    pub fn remove_where(
        &mut self,
        address: &str,
        filter: Condition,
        limit: Option<u64>,
    ) -> Result<&mut Self> {
        self.queue_remove(address, Some(&filter), limit)
    }

    fn queue_remove(
        &mut self,
        address: &str,
        filter: Option<&Condition>,
        limit: Option<u64>,
    ) -> Result<&mut Self> {
        let address = Address::parse(&self.schema, address)?;
        let remove = QueryBuilder::new(&self.schema).build_remove(&address, filter, limit)?;
        self.queue.enqueue(WriteOp::Remove, remove);
        Ok(self)
    }

    /// Applies every queued write, in order, inside one transaction.
    ///
    /// The queue is empty afterwards whether or not the commit succeeded.
    /// Committing an empty queue does nothing.
    pub async fn commit(&mut self) -> Result<&mut Self> {
        if self.queue.len() == 0 {
            return Ok(self);
        }

        self.last_insert_ids.clear();

        let opened = match self.driver() {
            Ok(driver) => self.take_connection().await.map(|c| (driver, c)),
            Err(err) => Err(err),
        };

        let (driver, mut connection) = match opened {
            Ok(opened) => opened,
            Err(err) => {
                self.queue.clear();
                return Err(err);
            }
        };

        let result = self
            .queue
            .commit(
                connection.as_mut(),
                &self.schema,
                driver.capability().transactions,
            )
            .await;
        self.connection = Some(connection);

        self.last_insert_ids = result?.last_insert_ids;
        Ok(self)
    }

    /// Commits unless `window` has expired. An expired window discards the
    /// queue and fails with a transaction timeout.
    pub async fn commit_within(&mut self, window: &EditWindow) -> Result<&mut Self> {
        if let Err(err) = window.check() {
            self.rollback();
            return Err(err);
        }
        self.commit().await
    }

    /// Discards the queue and the connection handle. The next operation
    /// opens a fresh connection.
    pub fn rollback(&mut self) -> &mut Self {
        let discarded = self.queue.clear();
        self.connection = None;

        if discarded > 0 {
            info!(discarded, "queued writes rolled back");
        }
        self
    }

    /// Same as [`Db::rollback`].
    pub fn reset(&mut self) -> &mut Self {
        self.rollback()
    }

    /// Creates the schema's tables and views.
    pub async fn push_schema(&mut self) -> Result<()> {
        let mut connection = self.take_connection().await?;
        let result = connection.push_schema(&self.schema).await;
        self.connection = Some(connection);
        result
    }

    /// Sends a raw SQL statement, paged by the driver.
    pub async fn execute_sql(
        &mut self,
        sql: &str,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Response> {
        let mut connection = self.take_connection().await?;
        let result = connection.send_query_string(sql, limit, offset).await;
        self.connection = Some(connection);
        result
    }

    pub async fn list_tables(&mut self) -> Result<Vec<String>> {
        let mut connection = self.take_connection().await?;
        let result = connection.list_tables().await;
        self.connection = Some(connection);
        result
    }

    async fn fetch(&mut self, select: Select) -> Result<Vec<Row>> {
        let mut connection = self.take_connection().await?;
        let result = connection
            .send_query_object(&self.schema, &select.into())
            .await;
        self.connection = Some(connection);

        result?.into_values()?.into_rows()
    }

    async fn count(&mut self, select: Select) -> Result<u64> {
        let rows = self.fetch(select).await?;

        let count = rows
            .first()
            .and_then(|row| row.get_index(0))
            .and_then(|(_, value)| value.as_i64())
            .unwrap_or_default();

        u64::try_from(count).map_err(|_| Error::invalid_argument("negative row count"))
    }

    fn driver(&mut self) -> Result<Arc<dyn Driver>> {
        match &self.driver {
            Some(driver) => Ok(driver.clone()),
            None => {
                let driver = connect::driver(&self.dsn)?;
                self.driver = Some(driver.clone());
                Ok(driver)
            }
        }
    }

    /// Hands out the connection, opening one first if needed. Callers put
    /// it back once done.
    async fn take_connection(&mut self) -> Result<Box<dyn Connection>> {
        match self.connection.take() {
            Some(connection) => Ok(connection),
            None => self.driver()?.connect().await,
        }
    }
}

/// Reshapes fetched rows into the value `select` returns for `address`.
fn shape(table: &Table, address: &Address, rows: Vec<Row>) -> Value {
    let pick = |row: &Row| match &address.column {
        Some(column) => row
            .get(column)
            .and_then(|value| value.get_path(address.path.as_slice()))
            .cloned()
            .unwrap_or_default(),
        None => Value::from(row.clone()),
    };

    match &address.row {
        Some(RowRef::Key(_)) => match rows.first() {
            Some(row) => pick(row),
            None if address.column.is_some() => Value::Null,
            None => Value::Array(Array::new()),
        },
        _ => {
            let keyed = rows
                .iter()
                .enumerate()
                .map(|(position, row)| {
                    let key = table
                        .primary_key
                        .as_deref()
                        .and_then(|pk| row.get(pk))
                        .and_then(Value::to_key)
                        .unwrap_or_else(|| position.to_string());
                    (key, pick(row))
                })
                .collect();
            Value::Array(keyed)
        }
    }
}

/// Two facades are equal when they share one schema instance and have
/// equal DSNs. Their queues are never shared.
impl PartialEq for Db {
    fn eq(&self, other: &Self) -> bool {
        ByAddress(&*self.schema) == ByAddress(&*other.schema) && self.dsn == other.dsn
    }
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("schema", &self.schema.name)
            .field("dsn", &self.dsn.dbms)
            .field("connected", &self.connection.is_some())
            .field("queued", &self.queue.len())
            .field("state", &self.queue.state())
            .finish()
    }
}
