//! Read-only access to the pathway database.
//!
//! The converter only ever lists records by schema class and reads typed
//! attributes from them. There is no write path.

pub mod class;
pub mod memory;

pub use memory::MemoryDatabase;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Capability handle over the source database.
pub trait Database {
    /// All records of exactly `class_name`, in ascending `dbId` order.
    fn list_by_class(&self, class_name: &str) -> Vec<&Record>;

    fn record(&self, db_id: i64) -> Option<&Record>;
}

/// A typed attribute value as stored on a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Ref {
        #[serde(rename = "ref")]
        target: i64,
    },
    List(Vec<AttrValue>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub db_id: i64,
    pub schema_class: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Record {
    pub fn new(db_id: i64, schema_class: impl Into<String>) -> Self {
        Record {
            db_id,
            schema_class: schema_class.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, name: &str, value: AttrValue) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    pub fn id(&self) -> i64 {
        self.db_id
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.attr(name)? {
            AttrValue::Text(s) => Some(s.as_str()),
            AttrValue::List(items) => items.iter().find_map(|v| match v {
                AttrValue::Text(s) => Some(s.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }

    /// First referenced record id of a (possibly multi-valued) instance attribute.
    pub fn reference(&self, name: &str) -> Option<i64> {
        self.references(name).into_iter().next()
    }

    /// All referenced record ids, in stored order.
    pub fn references(&self, name: &str) -> Vec<i64> {
        match self.attr(name) {
            Some(AttrValue::Ref { target }) => vec![*target],
            Some(AttrValue::List(items)) => items
                .iter()
                .filter_map(|v| match v {
                    AttrValue::Ref { target } => Some(*target),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.text(class::attr::DISPLAY_NAME)
    }
}

/// Resolve the stable identifier of a record: either stored inline as text or
/// through a referenced `StableIdentifier` record.
pub fn stable_identifier(db: &dyn Database, record: &Record) -> Option<String> {
    match record.attr(class::attr::STABLE_IDENTIFIER)? {
        AttrValue::Text(s) => Some(s.clone()),
        _ => {
            let target = record.reference(class::attr::STABLE_IDENTIFIER)?;
            db.record(target)?
                .text(class::attr::IDENTIFIER)
                .map(str::to_string)
        }
    }
}

/// Reference identifier of a physical entity (e.g. `CHEBI:15377`), taken from
/// its `referenceEntity`. The database name prefixes the identifier when known.
pub fn reference_identifier(db: &dyn Database, record: &Record) -> Option<String> {
    let reference = db.record(record.reference(class::attr::REFERENCE_ENTITY)?)?;
    let identifier = reference.text(class::attr::IDENTIFIER)?;
    match reference.text(class::attr::DATABASE_NAME) {
        Some(db_name) if !identifier.contains(':') => Some(format!("{}:{}", db_name, identifier)),
        _ => Some(identifier.to_string()),
    }
}
