//! Log Reader
//!
//! Decodes records at a given offset using positioned reads, so any number
//! of readers can share one file handle without touching its cursor.

use std::fs::File;
use std::io;

use crate::error::{Result, StoreError};
use super::{Record, RecordHeader, HEADER_SIZE};

/// Read the record whose header starts at `offset`
///
/// Returns:
/// - `Ok(Some(record))` — a complete record was decoded
/// - `Ok(None)` — `offset` is at (or past) end-of-file: no more records
/// - `Err(Corruption)` — the header or body runs past end-of-file
/// - `Err(Io)` — the underlying read failed
pub fn read_record_at(file: &File, offset: u64) -> Result<Option<Record>> {
    let file_len = file.metadata()?.len();
    if offset >= file_len {
        return Ok(None);
    }

    if offset + HEADER_SIZE as u64 > file_len {
        return Err(StoreError::Corruption {
            offset,
            reason: format!(
                "truncated header: {} of {} bytes present",
                file_len - offset,
                HEADER_SIZE
            ),
        });
    }

    let mut header = [0u8; HEADER_SIZE];
    read_exact_at(file, &mut header, offset)?;
    let header = RecordHeader::parse(&header);

    let body_offset = offset + HEADER_SIZE as u64;
    if body_offset + header.body_len() > file_len {
        return Err(StoreError::Corruption {
            offset,
            reason: format!(
                "truncated body: need {} bytes, {} present",
                header.body_len(),
                file_len - body_offset
            ),
        });
    }

    let mut key = vec![0u8; header.key_len as usize];
    read_exact_at(file, &mut key, body_offset)?;

    let mut value = vec![0u8; header.value_len as usize];
    read_exact_at(file, &mut value, body_offset + header.key_len as u64)?;

    Ok(Some(Record {
        timestamp: header.timestamp,
        key,
        value,
    }))
}

#[cfg(unix)]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buf, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_read(buf, offset) {
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => {
                buf = &mut std::mem::take(&mut buf)[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
