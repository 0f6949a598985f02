//! Log Module
//!
//! The append-only record log that backs the store.
//!
//! ## Responsibilities
//! - Encode/decode individual records
//! - Append records at end-of-file
//! - Positioned reads, safe for concurrent readers
//! - Replay the whole file to rebuild the index
//!
//! ## File Format
//! No file header or footer: the file is a plain concatenation of records.
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Record 1                                             │
//! │ ┌────────┬────────────┬────────────┬─────┬───────┐   │
//! │ │ TS (4) │ KeyLen (4) │ ValLen (4) │ Key │ Value │   │
//! │ └────────┴────────────┴────────────┴─────┴───────┘   │
//! ├──────────────────────────────────────────────────────┤
//! │ Record 2                                             │
//! │ ...                                                  │
//! └──────────────────────────────────────────────────────┘
//! ```
//! All integers are little-endian.

mod record;
mod reader;
mod writer;
mod recovery;

pub use record::{encode, Record, RecordHeader, HEADER_SIZE};
pub use reader::read_record_at;
pub use writer::append_record;
pub use recovery::{replay, ReplayStats};
