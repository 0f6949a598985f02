//! Index Module
//!
//! In-memory map from key to the offset of that key's newest record.
//!
//! ## Responsibilities
//! - Resolve a key to a log offset in O(1)
//! - Insert-or-update as the only mutation (there is no delete)
//! - Enumerate live keys for compaction
//!
//! The index is never persisted; it is rebuilt by replaying the log on open.
//! Locking is the owner's job: the engine guards the index and the log file
//! with a single `RwLock`.

mod table;

pub use table::Index;
