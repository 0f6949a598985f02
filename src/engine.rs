//! Engine Module
//!
//! The store engine: owns the log file and the index.
//!
//! ## Responsibilities
//! - Rebuild the index by replaying the log on open
//! - Append records and keep the index pointing at the newest version
//! - Serve lookups through positioned reads
//! - Compact the log when the store closes

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::compaction::{self, CompactionStats};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::index::Index;
use crate::log::{append_record, read_record_at, replay, Record, ReplayStats};

/// Shared mutable state, guarded as one lock domain
struct Inner {
    /// `None` once the store has been closed
    file: Option<File>,
    index: Index,
}

/// The log-structured store
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader
///
/// - **Writes** (put/close): exclusive `RwLock` write guard
///   - appends are serialized, so concurrent puts get disjoint offset ranges
///
/// - **Reads** (get): shared read guard
///   - index lookup and decode both run under the read guard
///   - decode uses positioned reads, so readers never contend on a cursor
///   - a read can never overlap a put or a close
///
/// ## Lifecycle
/// `close` is terminal. The compacted file invalidates every offset in the
/// index, so a closed store answers all further calls with `StoreError::Closed`.
/// Reopen the path to use the data again.
pub struct Store {
    config: Config,
    inner: RwLock<Inner>,
    replay_stats: ReplayStats,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the parent directory if missing
    /// 2. Open (or create) the log file for read/write
    /// 3. Replay the whole log into a fresh index
    pub fn open(config: Config) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&config.path)?;

        let mut index = Index::new();
        let replay_stats = replay(&file, &mut index)?;

        info!(
            path = %config.path.display(),
            records = replay_stats.records_replayed,
            live_keys = replay_stats.live_keys,
            bytes = replay_stats.bytes_scanned,
            "Store opened"
        );

        Ok(Self {
            config,
            inner: RwLock::new(Inner {
                file: Some(file),
                index,
            }),
            replay_stats,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified log file
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(Config::builder().path(path.as_ref()).build())
    }

    /// Append a record and make it the visible version of its key
    pub fn put(&self, record: Record) -> Result<()> {
        if record.key.is_empty() {
            return Err(StoreError::InvalidArgument("key must not be empty".to_string()));
        }

        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let file = inner.file.as_mut().ok_or(StoreError::Closed)?;

        let offset = append_record(file, &record, self.config.sync_strategy)?;
        debug!(key = %String::from_utf8_lossy(&record.key), offset, "Record appended");

        inner.index.upsert(record.key, offset);
        Ok(())
    }

    /// Put a raw value stamped with the current time
    pub fn put_value(&self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Result<()> {
        self.put(Record::new(key, value))
    }

    /// Serialize `value` as JSON and put it under `key`
    pub fn put_json<T: Serialize + ?Sized>(&self, key: impl Into<Vec<u8>>, value: &T) -> Result<()> {
        let payload = serde_json::to_vec(value)?;
        self.put(Record::new(key, payload))
    }

    /// Get the newest record for `key`
    ///
    /// Returns:
    /// - `Err(KeyNotFound)` — key was never written (expected, "no prior value")
    /// - `Err(InvalidArgument)` — empty key
    /// - `Err(Io | Corruption)` — the indexed record could not be read
    pub fn get(&self, key: &[u8]) -> Result<Record> {
        if key.is_empty() {
            return Err(StoreError::InvalidArgument("key must not be empty".to_string()));
        }

        let inner = self.inner.read();
        let file = inner.file.as_ref().ok_or(StoreError::Closed)?;
        let offset = inner.index.get(key).ok_or(StoreError::KeyNotFound)?;

        debug!(key = %String::from_utf8_lossy(key), offset, "Reading record");
        read_record_at(file, offset)?.ok_or_else(|| StoreError::Corruption {
            offset,
            reason: "indexed record is past end of log".to_string(),
        })
    }

    /// Get the value for `key` and deserialize it from JSON
    pub fn get_json<T: DeserializeOwned>(&self, key: &[u8]) -> Result<T> {
        let record = self.get(key)?;
        Ok(serde_json::from_slice(&record.value)?)
    }

    /// Close the store, compacting the log first if configured
    ///
    /// The file handle is released whatever the compaction outcome; a
    /// compaction error is returned afterwards. Closing twice is a no-op.
    pub fn close(&self) -> Result<Option<CompactionStats>> {
        let mut inner = self.inner.write();
        let Some(file) = inner.file.take() else {
            return Ok(None);
        };

        if !self.config.compact_on_close {
            drop(file);
            info!(path = %self.config.path.display(), "Store closed without compaction");
            return Ok(None);
        }

        match compaction::compact(&self.config.path, file, &inner.index) {
            Ok(stats) => {
                info!(
                    path = %self.config.path.display(),
                    live_keys = stats.live_keys,
                    bytes_before = stats.bytes_before,
                    bytes_after = stats.bytes_after,
                    "Store compacted and closed"
                );
                Ok(Some(stats))
            }
            Err(e) => {
                warn!(path = %self.config.path.display(), error = %e, "Compaction failed, store closed");
                Err(e)
            }
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.inner.read().index.contains(key)
    }

    /// All live keys, sorted
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.inner.read().index.keys()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.inner.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().index.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().file.is_none()
    }

    /// Current log file size in bytes
    pub fn log_size(&self) -> Result<u64> {
        let inner = self.inner.read();
        let file = inner.file.as_ref().ok_or(StoreError::Closed)?;
        Ok(file.metadata()?.len())
    }

    /// Statistics from the replay performed at open
    pub fn replay_stats(&self) -> ReplayStats {
        self.replay_stats
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if self.inner.get_mut().file.is_none() {
            return;
        }
        if let Err(e) = self.close() {
            error!(path = %self.config.path.display(), error = %e, "Failed to close store on drop");
        }
    }
}
