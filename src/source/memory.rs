//! In-memory database backed by a JSON dump of records.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Database, Record};
use crate::error::ConvertError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Dump {
    records: Vec<Record>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    records: BTreeMap<i64, Record>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut db = Self::new();
        for record in records {
            db.insert(record);
        }
        db
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, record: Record) {
        self.records.insert(record.db_id, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConvertError> {
        let dump: Dump = serde_json::from_str(json)
            .map_err(|e| ConvertError::fatal("F003", format!("Failed to parse database dump: {}", e)))?;
        Ok(Self::from_records(dump.records))
    }

    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::fatal(
                "F003",
                format!("Failed to read database dump {}: {}", path.display(), e),
            )
        })?;
        Self::from_json_str(&json)
    }
}

impl Database for MemoryDatabase {
    fn list_by_class(&self, class_name: &str) -> Vec<&Record> {
        self.records
            .values()
            .filter(|r| r.schema_class == class_name)
            .collect()
    }

    fn record(&self, db_id: i64) -> Option<&Record> {
        self.records.get(&db_id)
    }
}
