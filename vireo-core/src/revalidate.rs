//! The control loop that refreshes physical folders and propagates
//! invalidation to virtual collection folders.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use vireo_model::EntityId;

use crate::collection::CollectionFolder;
use crate::entity::EntityArena;
use crate::error::Result;
use crate::scanner::{LibraryScanner, ScanReport};

/// Periodically (or on demand) rescans the physical library roots and then
/// invalidates every registered collection folder's derived caches.
pub struct RevalidationDriver {
    arena: Arc<EntityArena>,
    scanner: LibraryScanner,
    roots: Vec<PathBuf>,
    collections: DashMap<EntityId, Arc<CollectionFolder>>,
}

impl std::fmt::Debug for RevalidationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevalidationDriver")
            .field("roots", &self.roots)
            .field("collection_count", &self.collections.len())
            .finish()
    }
}

impl RevalidationDriver {
    pub fn new(arena: Arc<EntityArena>, scanner: LibraryScanner, roots: Vec<PathBuf>) -> Self {
        Self {
            arena,
            scanner,
            roots,
            collections: DashMap::new(),
        }
    }

    pub fn arena(&self) -> &Arc<EntityArena> {
        &self.arena
    }

    /// Register a collection folder and attach its node under the tree
    /// root so identifier lookups can reach it.
    pub fn register_collection(&self, collection: Arc<CollectionFolder>) -> Result<()> {
        self.arena
            .attach(self.arena.root_id(), collection.entity())?;
        self.collections.insert(collection.id(), collection);
        Ok(())
    }

    pub fn collection(&self, id: EntityId) -> Option<Arc<CollectionFolder>> {
        self.collections.get(&id).map(|c| c.clone())
    }

    pub fn collections(&self) -> Vec<Arc<CollectionFolder>> {
        self.collections.iter().map(|c| c.clone()).collect()
    }

    /// One full revalidation pass: rescan the physical roots, then drop
    /// every collection's index cache. Safe to call repeatedly; collection
    /// invalidation is idempotent.
    pub fn revalidate_all(&self, token: &CancellationToken) -> Result<ScanReport> {
        let report = self.scanner.scan_into(&self.arena, &self.roots, token)?;
        for collection in self.collections.iter() {
            collection.revalidate();
        }
        info!(
            resolved = report.resolved,
            collections = self.collections.len(),
            "revalidation pass complete"
        );
        Ok(report)
    }

    /// Periodic revalidation until cancelled. Scan failures are logged and
    /// the loop keeps running; the next tick gets a fresh chance.
    pub async fn run(&self, interval: Duration, token: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so construction does not
        // imply an instant scan.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("revalidation driver stopping");
                    return;
                }
                _ = ticker.tick() => {
                    match self.revalidate_all(&token) {
                        Ok(report) => {
                            if !report.errors.is_empty() {
                                warn!(errors = report.errors.len(), "revalidation pass had errors");
                            }
                        }
                        Err(e) => error!("revalidation pass failed: {e}"),
                    }
                }
            }
        }
    }
}
