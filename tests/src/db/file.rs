use crate::{guestbook, Dsn, Schema, Setup};

use std::{path::PathBuf, sync::Arc};
use tabula::Driver;
use tabula_driver_file::File;
use tempfile::TempDir;

/// File driver backed by a JSON document in a temporary directory.
pub struct SetupFile {
    dir: TempDir,
    schema: Arc<Schema>,
    driver: Arc<dyn Driver>,
}

impl SetupFile {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let driver = File::open(dir.path().join("db.json")).unwrap();

        Self {
            dir,
            schema: Arc::new(guestbook()),
            driver: Arc::new(driver),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("db.json")
    }
}

impl Default for SetupFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup for SetupFile {
    fn driver(&self) -> Arc<dyn Driver> {
        self.driver.clone()
    }

    fn schema(&self) -> Arc<Schema> {
        self.schema.clone()
    }

    fn dsn(&self) -> Dsn {
        Dsn::new("file").database(self.path().display().to_string())
    }
}
