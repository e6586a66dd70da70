use super::Db;
use crate::{transaction::TransactionQueue, Dsn};

use indexmap::IndexMap;
use std::sync::Arc;
use tabula_core::{Driver, Error, Result, Schema};

#[derive(Default)]
pub struct Builder {
    schema: Option<Arc<Schema>>,

    dsn: Dsn,

    /// Process-wide fallbacks for keys the DSN leaves out
    defaults: Option<Dsn>,

    /// Injected driver. Takes precedence over the DSN's `DBMS`.
    driver: Option<Arc<dyn Driver>>,
}

impl Builder {
    pub fn schema(&mut self, schema: impl Into<Arc<Schema>>) -> &mut Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn dsn(&mut self, dsn: Dsn) -> &mut Self {
        self.dsn = dsn;
        self
    }

    pub fn defaults(&mut self, defaults: Dsn) -> &mut Self {
        self.defaults = Some(defaults);
        self
    }

    /// Uses the `TABULA_*` environment variables as defaults.
    pub fn env_defaults(&mut self) -> Result<&mut Self> {
        self.defaults = Some(Dsn::from_env()?);
        Ok(self)
    }

    pub fn driver(&mut self, driver: impl Driver) -> &mut Self {
        self.driver = Some(Arc::new(driver));
        self
    }

    /// Shares one driver, and so one store, between several facades.
    pub fn shared_driver(&mut self, driver: Arc<dyn Driver>) -> &mut Self {
        self.driver = Some(driver);
        self
    }

    /// The driver is not resolved until the first operation needs it.
    pub fn build(&mut self) -> Result<Db> {
        let Some(schema) = self.schema.take() else {
            return Err(Error::invalid_argument("a schema is required to build a Db"));
        };

        let mut dsn = std::mem::take(&mut self.dsn);
        if let Some(defaults) = &self.defaults {
            dsn = dsn.with_defaults(defaults);
        }

        Ok(Db {
            schema,
            dsn,
            driver: self.driver.take(),
            connection: None,
            queue: TransactionQueue::default(),
            last_insert_ids: IndexMap::new(),
        })
    }
}
