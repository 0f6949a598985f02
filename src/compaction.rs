//! Compaction Module
//!
//! Rewrites the log so it holds exactly one record per live key.
//!
//! ## Steps
//! 1. Create a temp file in the log's own directory (rename stays on one filesystem)
//! 2. Copy the newest record of every indexed key into it
//! 3. Sync the temp file and release the old log handle
//! 4. Rename the temp file over the log path, then sync the directory entry
//!
//! A failure before step 4 leaves the original log untouched and the temp
//! file is removed when it goes out of scope.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::index::Index;
use crate::log::{encode, read_record_at};

const TEMP_PREFIX: &str = "temp-";
const TEMP_SUFFIX: &str = ".db";

/// Result of a compaction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionStats {
    /// Records written to the new log (one per key)
    pub live_keys: u64,

    /// Log size before compaction
    pub bytes_before: u64,

    /// Log size after compaction
    pub bytes_after: u64,
}

impl CompactionStats {
    pub fn bytes_reclaimed(&self) -> u64 {
        self.bytes_before.saturating_sub(self.bytes_after)
    }
}

/// Compact the log at `path`, consuming its open handle
///
/// `index` must resolve every key to its newest offset in `file`. The handle
/// is dropped before the rename whether or not compaction succeeds.
pub fn compact(path: &Path, file: File, index: &Index) -> Result<CompactionStats> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let bytes_before = file.metadata()?.len();

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;
    debug!(temp = %temp.path().display(), "Compaction started");

    let mut bytes_after = 0u64;
    let mut live_keys = 0u64;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());

        for (key, offset) in index.iter() {
            let record = read_record_at(&file, offset)?.ok_or_else(|| StoreError::Corruption {
                offset,
                reason: format!(
                    "indexed record for key {:?} is past end of log",
                    String::from_utf8_lossy(key)
                ),
            })?;

            let bytes = encode(&record)?;
            writer.write_all(&bytes)?;
            bytes_after += bytes.len() as u64;
            live_keys += 1;
        }

        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    drop(file);

    temp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    if let Err(e) = sync_dir(dir) {
        warn!(dir = %dir.display(), error = %e, "Failed to sync log directory after rename");
    }

    Ok(CompactionStats {
        live_keys,
        bytes_before,
        bytes_after,
    })
}

/// Make the rename durable by syncing the directory that holds the log
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
