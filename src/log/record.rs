//! Record definitions
//!
//! A record is the unit of storage: a fixed 12-byte header followed by
//! the key bytes and the value bytes.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, StoreError};

/// Header size: timestamp (4) + key length (4) + value length (4)
pub const HEADER_SIZE: usize = 12;

/// A single record in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Seconds since the unix epoch. Informational only.
    pub timestamp: u32,

    /// Lookup key, treated as an opaque byte string
    pub key: Vec<u8>,

    /// Opaque payload
    pub value: Vec<u8>,
}

impl Record {
    /// Create a record stamped with the current time
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self::with_timestamp(unix_now(), key, value)
    }

    pub fn with_timestamp(timestamp: u32, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            timestamp,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Total size of this record on disk
    pub fn encoded_len(&self) -> u64 {
        (HEADER_SIZE + self.key.len() + self.value.len()) as u64
    }
}

/// Parsed fixed-size record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub timestamp: u32,
    pub key_len: u32,
    pub value_len: u32,
}

impl RecordHeader {
    pub fn parse(buf: &[u8; HEADER_SIZE]) -> Self {
        let mut buf = &buf[..];
        Self {
            timestamp: buf.get_u32_le(),
            key_len: buf.get_u32_le(),
            value_len: buf.get_u32_le(),
        }
    }

    /// Length of key + value following the header
    pub fn body_len(&self) -> u64 {
        self.key_len as u64 + self.value_len as u64
    }
}

/// Serialize a record into its on-disk layout
pub fn encode(record: &Record) -> Result<Bytes> {
    let key_len = length_field("key", record.key.len())?;
    let value_len = length_field("value", record.value.len())?;

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + record.key.len() + record.value.len());
    buf.put_u32_le(record.timestamp);
    buf.put_u32_le(key_len);
    buf.put_u32_le(value_len);
    buf.put_slice(&record.key);
    buf.put_slice(&record.value);

    Ok(buf.freeze())
}

fn length_field(field: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| StoreError::RecordTooLarge { field, len })
}

fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}
