//! Log Writer
//!
//! Appends encoded records at end-of-file. Existing bytes are never rewritten.

use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};

use tracing::warn;

use crate::config::SyncStrategy;
use crate::error::Result;
use super::{encode, Record};

/// A file-like target that can be cut back after a failed append
trait AppendTarget: Write + Seek {
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
    fn sync_data(&mut self) -> io::Result<()>;
}

impl AppendTarget for File {
    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync_data(&mut self) -> io::Result<()> {
        File::sync_data(self)
    }
}

/// Append a record and return the offset its header was written at
///
/// Caller must hold exclusive access to `file`. If the write fails part way,
/// the file is cut back to its previous end so no partial record is left
/// for replay to trip over.
pub fn append_record(file: &mut File, record: &Record, sync: SyncStrategy) -> Result<u64> {
    append_to(file, record, sync)
}

fn append_to<T: AppendTarget>(target: &mut T, record: &Record, sync: SyncStrategy) -> Result<u64> {
    let bytes = encode(record)?;

    let offset = target.seek(SeekFrom::End(0))?;
    let written = target.write_all(&bytes).and_then(|_| match sync {
        SyncStrategy::EveryWrite => target.sync_data(),
        SyncStrategy::Never => Ok(()),
    });

    if let Err(e) = written {
        if let Err(trunc) = target.truncate_to(offset) {
            warn!(offset, error = %trunc, "Failed to roll back partial append");
        }
        return Err(e.into());
    }

    Ok(offset)
}
