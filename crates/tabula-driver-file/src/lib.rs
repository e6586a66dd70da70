//! A driver that keeps every table in a JSON document, for running without a
//! database server.
//!
//! Queries are evaluated in process. Transactions are simulated: `begin`
//! takes a snapshot of the data, `rollback` restores it and `commit` writes
//! the document back to disk.

mod store;
use store::Data;

use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tabula_core::{
    async_trait,
    driver::{Capability, Dialect, Driver, Response, ResultSet, TableField, TableIndex},
    schema::{Schema, Table},
    stmt::{Assignment, Direction, Insert, Query, Remove, Row, Select, Update, Value},
    Error, Result,
};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub struct File {
    store: Arc<Mutex<Store>>,
}

#[derive(Debug)]
struct Store {
    /// Where the document lives. `None` keeps everything in memory.
    path: Option<PathBuf>,

    data: Data,
}

impl Store {
    fn flush(&self) -> Result<()> {
        match &self.path {
            Some(path) => {
                debug!(path = %path.display(), "file driver flush");
                self.data.save(path)
            }
            None => Ok(()),
        }
    }
}

impl File {
    /// Create a file driver from a URL: `file:///path/to/db.json`, or
    /// `file::memory:` for an in-memory store.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::connection)?;

        if url.scheme() != "file" {
            return Err(Error::invalid_argument(format!(
                "connection URL does not have a `file` scheme; url={url_str}"
            )));
        }

        // `file:` URLs always carry an absolute path
        match url.path() {
            "" | "/" | ":memory:" | "/:memory:" => Ok(Self::in_memory()),
            path => Self::open(path),
        }
    }

    pub fn in_memory() -> Self {
        File::from_store(Store {
            path: None,
            data: Data::default(),
        })
    }

    /// Opens the document at `path`. A missing file is an empty database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = Data::load(&path).map_err(Error::connection)?;
        Ok(File::from_store(Store {
            path: Some(path),
            data,
        }))
    }

    fn from_store(store: Store) -> Self {
        File {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

#[async_trait]
impl Driver for File {
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    fn capability(&self) -> &'static Capability {
        &Capability::FILE
    }

    async fn connect(&self) -> Result<Box<dyn tabula_core::Connection>> {
        Ok(Box::new(Connection {
            store: self.store.clone(),
            snapshot: None,
        }))
    }
}

#[derive(Debug)]
pub struct Connection {
    store: Arc<Mutex<Store>>,

    /// Data as it was when the open transaction began
    snapshot: Option<Data>,
}

impl Connection {
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persists the document unless a transaction is open.
    fn autocommit(&self, store: &Store) -> Result<()> {
        match self.snapshot {
            Some(_) => Ok(()),
            None => store.flush(),
        }
    }

    fn select(&self, table: &Table, select: &Select) -> Result<ResultSet> {
        let store = self.lock();

        let mut rows: Vec<Row> = match store.data.tables.get(&table.name) {
            Some(stored) => stored
                .rows
                .iter()
                .map(|row| store::decode(table, row))
                .filter(|row| select.filter.as_ref().is_none_or(|filter| filter.eval(row)))
                .collect(),
            None => vec![],
        };

        if select.count {
            let count = i64::try_from(rows.len()).map_err(Error::driver)?;
            let row = Row::new().set("count(*)", count);
            return Ok(ResultSet::from_rows(vec!["count(*)".to_string()], vec![row]));
        }

        if !select.order_by.is_empty() {
            rows.sort_by(|a, b| {
                for order_by in &select.order_by {
                    let lhs = a.get(&order_by.column).unwrap_or(&Value::Null);
                    let rhs = b.get(&order_by.column).unwrap_or(&Value::Null);

                    // NULLs sort first, as in SQLite and MySQL.
                    let ordering = match (lhs.is_null(), rhs.is_null()) {
                        (true, true) => Ordering::Equal,
                        (true, false) => Ordering::Less,
                        (false, true) => Ordering::Greater,
                        (false, false) => lhs.compare(rhs).unwrap_or(Ordering::Equal),
                    };

                    let ordering = match order_by.direction {
                        Direction::Asc => ordering,
                        Direction::Desc => ordering.reverse(),
                    };

                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        if let Some(limit) = &select.limit {
            rows = limit.apply(rows);
        }

        let columns: Vec<String> = if select.columns.is_empty() {
            table.columns().map(|column| column.name.clone()).collect()
        } else {
            select.columns.iter().map(|c| c.to_lowercase()).collect()
        };

        let rows = rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|name| (name.as_str(), row.get(name).cloned().unwrap_or_default()))
                    .collect::<Row>()
            })
            .collect::<Vec<_>>();

        Ok(ResultSet::new(columns, rows.into_iter()))
    }

    fn insert(&self, table: &Table, insert: &Insert) -> Result<Response> {
        let mut store = self.lock();
        let stored = store.data.table_mut(table);

        let mut row = Row::new();
        let mut assigned = None;

        for column in table.columns() {
            let value = match insert.row.get(&column.name) {
                Some(value) if !value.is_null() => value.clone(),
                _ if column.auto_increment => {
                    let next = stored
                        .rows
                        .iter()
                        .filter_map(|row| row.get(&column.name).and_then(|v| v.as_i64()))
                        .fold(stored.last_id, i64::max)
                        + 1;
                    stored.last_id = next;
                    assigned = Some(next);
                    Value::I64(next)
                }
                Some(value) => value.clone(),
                None => column.default.clone().unwrap_or_default(),
            };
            row.insert(&column.name, value);
        }

        if let Some(pk) = &table.primary_key {
            let key = row.get(pk).map(Value::to_json);
            if stored.rows.iter().any(|existing| existing.get(pk) == key.as_ref()) {
                return Err(Error::driver(DuplicateKey {
                    table: table.name.clone(),
                    key: row.get(pk).cloned().unwrap_or_default(),
                }));
            }
        }

        stored.rows.push(store::encode(&row));
        self.autocommit(&store)?;

        let response = Response::count(1);
        Ok(match assigned {
            Some(id) => response.with_last_insert_id(id),
            None => response,
        })
    }

    fn update(&self, table: &Table, update: &Update) -> Result<Response> {
        let mut store = self.lock();
        let Some(stored) = store.data.tables.get_mut(&table.name) else {
            return Ok(Response::count(0));
        };

        let mut count = 0;

        for stored_row in &mut stored.rows {
            let mut row = store::decode(table, stored_row);
            if !update.filter.eval(&row) {
                continue;
            }

            for assignment in &update.assignments {
                match assignment {
                    Assignment::Set { column, value } => {
                        row.insert(column, value.clone());
                    }
                    Assignment::Patch { column, path, value } => {
                        let mut current = row.get(column).cloned().unwrap_or_default();
                        if !current.is_array() {
                            current = Value::Array(Default::default());
                        }
                        current.set_path(path.as_slice(), value.clone())?;
                        row.insert(column, current);
                    }
                }
            }

            *stored_row = store::encode(&row);
            count += 1;
        }

        self.autocommit(&store)?;
        Ok(Response::count(count))
    }

    fn remove(&self, table: &Table, remove: &Remove) -> Result<Response> {
        let mut store = self.lock();
        let Some(stored) = store.data.tables.get_mut(&table.name) else {
            return Ok(Response::count(0));
        };

        let limit = remove.limit.unwrap_or(u64::MAX);
        let mut count = 0;

        stored.rows.retain(|stored_row| {
            if count >= limit {
                return true;
            }
            let matched = remove.filter.eval(&store::decode(table, stored_row));
            if matched {
                count += 1;
            }
            !matched
        });

        self.autocommit(&store)?;
        Ok(Response::count(count))
    }

    fn stored<T>(&self, table: &str, f: impl FnOnce(&store::TableData) -> T) -> Result<T> {
        let store = self.lock();
        match store.data.tables.get(&table.to_lowercase()) {
            Some(stored) => Ok(f(stored)),
            None => Err(Error::table_not_found(table)),
        }
    }
}

#[async_trait]
impl tabula_core::Connection for Connection {
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    async fn send_query_object(&mut self, schema: &Schema, query: &Query) -> Result<Response> {
        let table = schema.get_table(query.table())?;

        debug!(kind = query.kind(), table = %table.name, "file query");

        match query {
            Query::Select(select) => Ok(Response::values(self.select(table, select)?)),
            Query::Insert(insert) => self.insert(table, insert),
            Query::Update(update) => self.update(table, update),
            Query::Remove(remove) => self.remove(table, remove),
        }
    }

    async fn begin_transaction(&mut self) -> Result<()> {
        if self.snapshot.is_some() {
            return Err(Error::invalid_argument("transaction already open"));
        }
        let data = self.lock().data.clone();
        self.snapshot = Some(data);
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        let Some(snapshot) = self.snapshot.take() else {
            return Err(Error::invalid_argument("no open transaction"));
        };

        // A commit that cannot be saved leaves the store as it was
        let mut store = self.lock();
        if let Err(err) = store.flush() {
            store.data = snapshot;
            return Err(err);
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        if let Some(snapshot) = self.snapshot.take() {
            self.lock().data = snapshot;
        }
        Ok(())
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        Ok(self.lock().data.tables.keys().cloned().collect())
    }

    async fn list_table_fields(&mut self, table: &str) -> Result<Vec<TableField>> {
        self.stored(table, store::TableData::describe)
    }

    async fn list_table_indexes(&mut self, table: &str) -> Result<Vec<TableIndex>> {
        self.stored(table, store::TableData::indexes)
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        let mut store = self.lock();
        for table in schema.tables() {
            store.data.table_mut(table);
        }
        self.autocommit(&store)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // An abandoned transaction is rolled back.
        if let Some(snapshot) = self.snapshot.take() {
            self.lock().data = snapshot;
        }
    }
}

#[derive(Debug)]
struct DuplicateKey {
    table: String,
    key: Value,
}

impl std::error::Error for DuplicateKey {}

impl std::fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "duplicate primary key {} in {}", self.key, self.table)
    }
}
