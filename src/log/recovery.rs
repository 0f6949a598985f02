//! Log Replay
//!
//! Rebuilds the in-memory index by scanning the log from offset 0.

use std::fs::File;

use crate::error::Result;
use crate::index::Index;
use super::read_record_at;

/// Result of a replay pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Number of records decoded, including shadowed versions
    pub records_replayed: u64,

    /// Distinct keys in the rebuilt index
    pub live_keys: u64,

    /// Bytes consumed, equal to the file length on success
    pub bytes_scanned: u64,
}

impl ReplayStats {
    /// Records that a compaction would discard
    pub fn shadowed_records(&self) -> u64 {
        self.records_replayed - self.live_keys
    }
}

/// Replay every record in `file` into `index`
///
/// Later records overwrite earlier ones, so each key ends up pointing at its
/// most recent write. Any decode failure other than end-of-data aborts the
/// replay; no partial recovery is attempted.
pub fn replay(file: &File, index: &mut Index) -> Result<ReplayStats> {
    let mut offset = 0u64;
    let mut records_replayed = 0u64;

    while let Some(record) = read_record_at(file, offset)? {
        let len = record.encoded_len();
        index.upsert(record.key, offset);
        offset += len;
        records_replayed += 1;
    }

    Ok(ReplayStats {
        records_replayed,
        live_keys: index.len() as u64,
        bytes_scanned: offset,
    })
}
