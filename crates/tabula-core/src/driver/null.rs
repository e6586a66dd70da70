//! A driver that talks to no database.
//!
//! Every operation is recorded in an [`ExecLog`]; reads return empty result
//! sets and writes report zero affected rows. The driver can be told to fail
//! on the N-th write it receives.

use super::{Capability, Connection, Dialect, Driver, Response};
use crate::{async_trait, schema::Schema, stmt::Query, Error, Result};

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// One operation received by a null connection.
#[derive(Debug, Clone, PartialEq)]
pub enum LoggedOp {
    Query(Query),
    Sql(String),
    Begin,
    Commit,
    Rollback,
}

impl LoggedOp {
    pub fn as_query(&self) -> Option<&Query> {
        match self {
            LoggedOp::Query(query) => Some(query),
            _ => None,
        }
    }

    pub fn is_write(&self) -> bool {
        self.as_query().is_some_and(Query::is_write)
    }
}

#[derive(Debug, Default)]
struct Shared {
    ops: Mutex<Vec<LoggedOp>>,
    fail_on: Mutex<Option<usize>>,
    fail_commit: Mutex<bool>,
    writes: Mutex<usize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Default)]
pub struct NullDriver {
    shared: Arc<Shared>,
}

impl NullDriver {
    pub fn new() -> NullDriver {
        NullDriver::default()
    }

    /// Makes the `n`-th write query (1-based, counted across all
    /// connections) fail.
    pub fn fail_on(self, n: usize) -> NullDriver {
        *lock(&self.shared.fail_on) = Some(n);
        self
    }

    /// Makes every `commit` fail after it is logged.
    pub fn fail_commit(self) -> NullDriver {
        *lock(&self.shared.fail_commit) = true;
        self
    }

    /// Handle on the operations received so far.
    pub fn log(&self) -> ExecLog {
        ExecLog {
            shared: self.shared.clone(),
        }
    }
}

#[async_trait]
impl Driver for NullDriver {
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    fn capability(&self) -> &'static Capability {
        &Capability::NULL
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(NullConnection {
            shared: self.shared.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct NullConnection {
    shared: Arc<Shared>,
}

impl NullConnection {
    fn record(&self, op: LoggedOp) {
        lock(&self.shared.ops).push(op);
    }
}

#[async_trait]
impl Connection for NullConnection {
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    async fn send_query_object(&mut self, _schema: &Schema, query: &Query) -> Result<Response> {
        self.record(LoggedOp::Query(query.clone()));

        if !query.is_write() {
            return Ok(Response::empty_values());
        }

        let nth = {
            let mut writes = lock(&self.shared.writes);
            *writes += 1;
            *writes
        };

        if *lock(&self.shared.fail_on) == Some(nth) {
            return Err(Error::driver(SimulatedFailure(nth)));
        }

        Ok(Response::count(0))
    }

    async fn send_query_string(
        &mut self,
        sql: &str,
        _limit: Option<u64>,
        _offset: Option<u64>,
    ) -> Result<Response> {
        self.record(LoggedOp::Sql(sql.to_string()));
        Ok(Response::empty_values())
    }

    async fn begin_transaction(&mut self) -> Result<()> {
        self.record(LoggedOp::Begin);
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.record(LoggedOp::Commit);
        if *lock(&self.shared.fail_commit) {
            return Err(Error::driver(std::io::Error::other("simulated commit failure")));
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.record(LoggedOp::Rollback);
        Ok(())
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        Ok(vec![])
    }

    async fn push_schema(&mut self, _schema: &Schema) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct SimulatedFailure(usize);

impl std::error::Error for SimulatedFailure {}

impl fmt::Display for SimulatedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "simulated failure on write #{}", self.0)
    }
}

/// Operations received by a [`NullDriver`], oldest first.
pub struct ExecLog {
    shared: Arc<Shared>,
}

impl ExecLog {
    pub fn len(&self) -> usize {
        lock(&self.shared.ops).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.shared.ops).is_empty()
    }

    pub fn clear(&mut self) {
        lock(&self.shared.ops).clear();
    }

    /// Snapshot of every logged operation.
    pub fn ops(&self) -> Vec<LoggedOp> {
        lock(&self.shared.ops).clone()
    }

    /// Write queries only, in the order they were received.
    pub fn writes(&self) -> Vec<Query> {
        lock(&self.shared.ops)
            .iter()
            .filter(|op| op.is_write())
            .filter_map(|op| op.as_query().cloned())
            .collect()
    }

    /// Removes and returns the oldest operation.
    #[track_caller]
    pub fn pop(&mut self) -> LoggedOp {
        let mut ops = lock(&self.shared.ops);
        if ops.is_empty() {
            panic!("no operations in log");
        }
        ops.remove(0)
    }
}

impl fmt::Debug for ExecLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ops = lock(&self.shared.ops);
        f.debug_struct("ExecLog").field("ops", &*ops).finish()
    }
}
