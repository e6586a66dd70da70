//! The per-connection queue of pending writes.

use crate::apply_update::resolve_patches;

use indexmap::IndexMap;
use tabula_core::{
    stmt::{Query, Value},
    Connection, Error, Result, Schema, WriteOp,
};
use tracing::{debug, info, warn};

/// Lifecycle of a [`crate::Db`]'s write queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Nothing queued
    #[default]
    Empty,

    /// At least one write is waiting for `commit`
    Pending,

    /// The queue is being sent to the driver
    Committing,

    /// The last commit applied every queued write
    Committed,

    /// The last commit failed and its writes were rolled back
    RolledBack,
}

#[derive(Debug)]
struct Write {
    op: WriteOp,
    query: Query,
}

#[derive(Debug, Default)]
pub(crate) struct TransactionQueue {
    writes: Vec<Write>,
    state: State,
}

/// What a successful commit did.
#[derive(Debug, Default)]
pub(crate) struct Applied {
    pub(crate) writes: usize,

    /// Keys the database generated, by table
    pub(crate) last_insert_ids: IndexMap<String, Value>,
}

impl TransactionQueue {
    pub(crate) fn state(&self) -> State {
        self.state
    }

    pub(crate) fn len(&self) -> usize {
        self.writes.len()
    }

    /// Appends a write. Existing entries are never touched.
    pub(crate) fn enqueue(&mut self, op: WriteOp, query: impl Into<Query>) {
        let query = query.into();
        debug!(kind = query.kind(), table = query.table(), position = self.writes.len(), "queued write");

        self.writes.push(Write { op, query });
        self.state = State::Pending;
    }

    /// Drops every queued write. Returns how many were discarded.
    pub(crate) fn clear(&mut self) -> usize {
        let discarded = self.writes.len();
        self.writes.clear();
        self.state = State::Empty;
        discarded
    }

    /// Sends every queued write, in order, inside one driver transaction.
    ///
    /// The queue is emptied whatever the outcome. On the first failing write
    /// the remaining writes are never sent, the driver transaction is rolled
    /// back and a commit-failed error wrapping the cause is returned.
    pub(crate) async fn commit(
        &mut self,
        connection: &mut dyn Connection,
        schema: &Schema,
        transactions: bool,
    ) -> Result<Applied> {
        if self.writes.is_empty() {
            return Ok(Applied::default());
        }

        let writes = std::mem::take(&mut self.writes);
        self.state = State::Committing;

        if transactions {
            if let Err(err) = connection.begin_transaction().await {
                self.state = State::RolledBack;
                return Err(err.context(Error::commit_not_started()));
            }
        } else {
            warn!("driver has no transactions; a failed commit may leave earlier writes applied");
        }

        let mut applied = Applied::default();

        for (position, write) in writes.iter().enumerate() {
            let result = send(connection, schema, &write.query).await;

            let (count, last_insert_id) = match result {
                Ok(ok) => ok,
                Err(cause) => {
                    self.state = State::RolledBack;

                    if transactions {
                        if let Err(err) = connection.rollback().await {
                            warn!(error = %err, "rollback after failed write also failed");
                        }
                    }

                    info!(
                        position,
                        discarded = writes.len() - position - 1,
                        "transaction rolled back"
                    );

                    return Err(cause
                        .context(Error::write_failed(write.op, write.query.table()))
                        .context(Error::commit_failed(position)));
                }
            };

            if count == 0 {
                warn!(kind = write.query.kind(), table = write.query.table(), "write touched no rows");
            }

            if let Some(id) = last_insert_id {
                applied.last_insert_ids.insert(write.query.table().to_string(), id);
            }
            applied.writes += 1;
        }

        if transactions {
            if let Err(err) = connection.commit().await {
                self.state = State::RolledBack;
                if let Err(err) = connection.rollback().await {
                    warn!(error = %err, "rollback after failed commit also failed");
                }
                return Err(err.context(Error::commit_not_finished()));
            }
        }

        self.state = State::Committed;
        info!(writes = applied.writes, "transaction committed");

        Ok(applied)
    }
}

/// Sends one queued write, resolving array patches first. Returns the number
/// of rows touched and the generated key, if any.
async fn send(
    connection: &mut dyn Connection,
    schema: &Schema,
    query: &Query,
) -> Result<(u64, Option<Value>)> {
    let Query::Update(update) = query else {
        let response = connection.send_query_object(schema, query).await?;
        let last_insert_id = response.last_insert_id.clone();
        return Ok((response.into_count()?, last_insert_id));
    };

    let mut count = 0;
    for update in resolve_patches(connection, schema, update).await? {
        count += connection
            .send_query_object(schema, &update.into())
            .await?
            .into_count()?;
    }

    Ok((count, None))
}
