use crate::{guestbook, Dsn, Schema, Setup};

use std::sync::Arc;
use tabula::Driver;
use tabula_driver_sqlite::Sqlite;

/// In-memory SQLite database shared by every facade of one test.
pub struct SetupSqlite {
    schema: Arc<Schema>,
    driver: Arc<dyn Driver>,
}

impl SetupSqlite {
    pub fn new() -> Self {
        Self {
            schema: Arc::new(guestbook()),
            driver: Arc::new(Sqlite::in_memory().unwrap()),
        }
    }
}

impl Default for SetupSqlite {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup for SetupSqlite {
    fn driver(&self) -> Arc<dyn Driver> {
        self.driver.clone()
    }

    fn schema(&self) -> Arc<Schema> {
        self.schema.clone()
    }

    fn dsn(&self) -> Dsn {
        Dsn::new("sqlite")
    }
}
