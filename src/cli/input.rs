use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::core::item::Diffable;

/// One JSON row, keyed by one of its fields
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    key: String,
    value: Value,
}

impl Record {
    /// Build a record from a JSON object, reading its key from `key_field`
    pub fn from_value(value: Value, key_field: &str) -> Option<Self> {
        let key = match value.get(key_field)? {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Some(Self { key, value })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Diffable for Record {
    type Key = String;

    fn diff_key(&self) -> String {
        self.key.clone()
    }

    fn content_eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Parse a JSON array of objects into records
pub fn parse_records(content: &str, key_field: &str) -> Result<Vec<Record>> {
    let values: Vec<Value> = serde_json::from_str(content).context("Expected a JSON array of rows")?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Record::from_value(value, key_field)
                .with_context(|| format!("Row {} has no '{}' field", index, key_field))
        })
        .collect()
}

/// Read records from a JSON file
pub fn load_records(path: &Path, key_field: &str) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rows file: {}", path.display()))?;

    parse_records(&content, key_field)
        .with_context(|| format!("Failed to parse rows file: {}", path.display()))
}
