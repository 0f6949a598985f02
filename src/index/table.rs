//! Index implementation
//!
//! HashMap-based key → offset table.

use std::collections::HashMap;

/// Key → offset of the most recent record for that key
#[derive(Debug, Default)]
pub struct Index {
    offsets: HashMap<Vec<u8>, u64>,
}

impl Index {
    /// Create a new empty Index
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `key` at `offset`, replacing any earlier offset
    ///
    /// Callers only ever move forward through the log, so the
    /// replaced offset is always a stale version.
    pub fn upsert(&mut self, key: Vec<u8>, offset: u64) -> Option<u64> {
        self.offsets.insert(key, offset)
    }

    pub fn get(&self, key: &[u8]) -> Option<u64> {
        self.offsets.get(key).copied()
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.offsets.contains_key(key)
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterate `(key, offset)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], u64)> {
        self.offsets.iter().map(|(k, &off)| (k.as_slice(), off))
    }

    /// All live keys, sorted
    pub fn keys(&self) -> Vec<Vec<u8>> {
        let mut keys: Vec<Vec<u8>> = self.offsets.keys().cloned().collect();
        keys.sort();
        keys
    }
}
