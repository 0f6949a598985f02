//! Store Context
//!
//! Startup-owned holder for the process's one store engine.
//!
//! The application builds a `StoreContext` once during startup and hands
//! `Arc<Store>` handles to its workers. Shutdown consumes the context, so
//! the engine is torn down exactly once; handles that outlive it get
//! `StoreError::Closed`.

use std::sync::Arc;

use tracing::info;

use crate::compaction::CompactionStats;
use crate::config::Config;
use crate::engine::Store;
use crate::error::Result;

pub struct StoreContext {
    store: Arc<Store>,
}

impl StoreContext {
    /// Open the engine eagerly
    pub fn init(config: Config) -> Result<Self> {
        let store = Store::open(config)?;
        info!(path = %store.path().display(), "Store context initialized");
        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// A shareable handle to the engine
    pub fn handle(&self) -> Arc<Store> {
        Arc::clone(&self.store)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Close the engine, compacting the log
    pub fn shutdown(self) -> Result<Option<CompactionStats>> {
        info!(
            path = %self.store.path().display(),
            outstanding_handles = Arc::strong_count(&self.store) - 1,
            "Store context shutting down"
        );
        self.store.close()
    }
}
