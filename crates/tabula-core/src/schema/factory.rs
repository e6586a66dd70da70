use super::Schema;
use crate::{Error, Result};

use std::{collections::HashMap, path::PathBuf, sync::Arc};

/// Loads schema definitions by name and hands out shared, immutable copies.
///
/// The factory is an ordinary value: construct one per process (or per
/// request) and pass it to whoever needs schemas.
#[derive(Debug, Default)]
pub struct SchemaFactory {
    /// Directory holding `<name>.json` definitions
    dir: Option<PathBuf>,

    loaded: HashMap<String, Arc<Schema>>,
}

impl SchemaFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory that loads `<dir>/<name>.json` on first request.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            loaded: HashMap::new(),
        }
    }

    /// Registers an already-built schema under its own name.
    pub fn insert(&mut self, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        self.loaded
            .insert(schema.name.to_lowercase(), schema.clone());
        schema
    }

    /// Returns the schema called `name`, loading it on first use.
    pub fn get(&mut self, name: &str) -> Result<Arc<Schema>> {
        let key = name.to_lowercase();
        if let Some(schema) = self.loaded.get(&key) {
            return Ok(schema.clone());
        }

        let Some(dir) = &self.dir else {
            return Err(Error::invalid_argument(format!(
                "schema `{name}` is not loaded and no schema directory is configured"
            )));
        };

        let path = dir.join(format!("{key}.json"));
        tracing::debug!(path = %path.display(), "loading schema");

        let src = std::fs::read_to_string(&path).map_err(|err| {
            Error::driver(err).context(Error::invalid_schema(format!(
                "cannot read {}",
                path.display()
            )))
        })?;
        let schema = Arc::new(Schema::from_json(&src)?);
        self.loaded.insert(key, schema.clone());
        Ok(schema)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(&name.to_lowercase())
    }
}
