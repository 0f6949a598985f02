//! # kaido-store
//!
//! A small embedded log-structured key-value store with:
//! - An append-only binary log as the single source of truth
//! - A complete in-memory index of key → offset, rebuilt by replay on open
//! - Single-writer/multi-reader concurrency model
//! - Compaction on close down to one record per key
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      StoreContext                            │
//! │              (one engine, many Arc handles)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Store                                  │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │     Log     │          │    Index    │
//!   │  (Append)   │          │ key→offset  │
//!   └──────┬──────┘          └─────────────┘
//!          │ on close
//!          ▼
//!   ┌─────────────┐
//!   │ Compaction  │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod index;
pub mod compaction;
pub mod engine;
pub mod context;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, SyncStrategy};
pub use engine::Store;
pub use context::StoreContext;
pub use log::Record;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kaido-store
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
