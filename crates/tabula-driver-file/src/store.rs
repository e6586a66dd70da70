use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{fs, io::Write, path::Path};
use tabula_core::{
    driver::{TableField, TableIndex},
    schema::Table,
    stmt::{Row, Value},
    Error, Result,
};

type JsonRow = serde_json::Map<String, serde_json::Value>;

/// The whole database, as written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Data {
    pub(crate) tables: IndexMap<String, TableData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct TableData {
    #[serde(default)]
    pub(crate) fields: Vec<StoredField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) primary_key: Option<String>,

    /// Last key handed out for an auto-increment primary key
    #[serde(default)]
    pub(crate) last_id: i64,

    #[serde(default)]
    pub(crate) rows: Vec<JsonRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredField {
    pub(crate) name: String,

    #[serde(rename = "type")]
    pub(crate) ty: String,

    pub(crate) nullable: bool,
}

impl Data {
    pub(crate) fn load(path: &Path) -> Result<Data> {
        if !path.exists() {
            return Ok(Data::default());
        }

        let bytes = fs::read(path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Data::default());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Writes to a temporary file next to `path`, then renames it into place.
    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(self)?;

        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });

        if let Err(err) = written.and_then(|_| fs::rename(&temp_path, path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::from(err));
        }

        Ok(())
    }

    /// Returns the stored table, creating it from the schema definition on
    /// first use.
    pub(crate) fn table_mut(&mut self, table: &Table) -> &mut TableData {
        self.tables
            .entry(table.name.clone())
            .or_insert_with(|| TableData::new(table))
    }
}

impl TableData {
    pub(crate) fn new(table: &Table) -> TableData {
        TableData {
            fields: table
                .columns()
                .map(|column| StoredField {
                    name: column.name.clone(),
                    ty: column.ty.name().to_string(),
                    nullable: column.nullable,
                })
                .collect(),
            primary_key: table.primary_key.clone(),
            last_id: 0,
            rows: vec![],
        }
    }

    pub(crate) fn describe(&self) -> Vec<TableField> {
        self.fields
            .iter()
            .map(|field| TableField {
                name: field.name.clone(),
                ty: field.ty.clone(),
                nullable: field.nullable,
                primary_key: self.primary_key.as_deref() == Some(field.name.as_str()),
            })
            .collect()
    }

    pub(crate) fn indexes(&self) -> Vec<TableIndex> {
        self.primary_key
            .iter()
            .map(|pk| TableIndex {
                name: "PRIMARY".to_string(),
                columns: vec![pk.clone()],
                unique: true,
            })
            .collect()
    }
}

/// Decodes a stored row using the table's declared column types.
pub(crate) fn decode(table: &Table, stored: &JsonRow) -> Row {
    stored
        .iter()
        .map(|(name, json)| {
            let value = Value::from_json(json.clone());
            let value = match table.column(name) {
                Some(column) => column.ty.decode(value),
                None => value,
            };
            (name.clone(), value)
        })
        .collect()
}

pub(crate) fn encode(row: &Row) -> JsonRow {
    row.iter()
        .map(|(name, value)| (name.to_string(), value.to_json()))
        .collect()
}
