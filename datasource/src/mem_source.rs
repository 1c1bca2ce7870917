//! In-memory data source.
//!
//! `MemSource` implements `DataSource` using a `BTreeMap`. It is both the
//! production implementation (populated from a JSON document at startup)
//! and the test double for unit and integration tests.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::value::RawValue;

use crate::error::DataSourceError;
use crate::source::DataSource;

/// In-memory data source backed by `BTreeMap`.
///
/// Values are the verbatim serialized text of each entry in the source
/// document, not a re-serialization.
#[derive(Debug, Clone, Default)]
pub struct MemSource {
    data: BTreeMap<String, Vec<u8>>,
}

impl MemSource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    /// Create a source pre-populated with data.
    pub fn with_data(data: BTreeMap<String, Vec<u8>>) -> Self {
        Self { data }
    }

    /// Decode a JSON object (`{"key": <any value>, ...}`) into a source.
    ///
    /// Each value is kept as its raw serialized text, so the guest sees
    /// exactly the bytes that appeared in the document.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DataSourceError> {
        let entries: BTreeMap<String, Box<RawValue>> = serde_json::from_slice(bytes)?;
        let data = entries
            .into_iter()
            .map(|(key, value)| (key, value.get().as_bytes().to_vec()))
            .collect();
        Ok(Self { data })
    }

    /// Load and decode a JSON document from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, DataSourceError> {
        let bytes = std::fs::read(path)?;
        Self::from_json_slice(&bytes)
    }

    /// Insert a key-value pair into the source.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.data.insert(key.into(), value.into());
    }

    /// Returns the number of entries in the source.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl DataSource for MemSource {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }
}
