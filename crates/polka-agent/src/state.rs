//! Shared state for one agent worker

use std::sync::Arc;
use std::time::Instant;

use polka_engines::Engine;
use polka_types::{catalog_entry, AgentKind, CatalogEntry};

/// State shared by the worker's handlers: the engine plus process metadata
pub struct WorkerState {
    engine: Arc<dyn Engine>,
    started_at: Instant,
}

impl WorkerState {
    /// Wrap an engine for serving
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            started_at: Instant::now(),
        }
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Agent kind served by this worker
    pub fn kind(&self) -> AgentKind {
        self.engine.kind()
    }

    /// Catalog entry for the served kind (display name, default port)
    pub fn catalog_entry(&self) -> &'static CatalogEntry {
        catalog_entry(self.kind())
    }

    /// Seconds since the worker started
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
