//! Virtual collection folders.
//!
//! A collection folder points at a subset of the physical folders in the
//! system. It never owns children: its child view is computed on every read
//! by locating the real folder entities for its declared source locations
//! inside the global tree and unioning their children. The only state it
//! keeps is a disposable index cache, dropped wholesale on revalidation.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use vireo_model::{EntityId, MediaKind, SourceLocation};

use crate::entity::{Entity, EntityArena, sort_snapshot};
use crate::error::{LibraryError, Result};

/// A folder whose children are merged from independently-scanned physical
/// folders elsewhere in the tree.
pub struct CollectionFolder {
    id: EntityId,
    name: String,
    locations: Vec<SourceLocation>,
    /// Derived key -> entity-id lookup tables. Replaced wholesale on
    /// invalidation so concurrent readers see either the old cache or a
    /// fresh empty one, never a mix.
    index_cache: RwLock<Arc<DashMap<String, Vec<EntityId>>>>,
}

impl std::fmt::Debug for CollectionFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionFolder")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("locations", &self.locations)
            .field("cached_indexes", &self.index_cache.read().len())
            .finish()
    }
}

impl CollectionFolder {
    pub fn new(name: impl Into<String>, locations: Vec<SourceLocation>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            locations,
            index_cache: RwLock::new(Arc::new(DashMap::new())),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locations(&self) -> &[SourceLocation] {
        &self.locations
    }

    /// The node representing this collection inside an entity tree.
    pub fn entity(&self) -> Entity {
        Entity::new(self.id, MediaKind::Collection, self.name.clone(), None)
    }

    /// Derive the join keys for the declared source locations.
    ///
    /// A location whose path no longer resolves is logged and omitted;
    /// partial results are preferred over failing the whole view.
    fn location_ids(&self) -> HashSet<EntityId> {
        let mut ids = HashSet::with_capacity(self.locations.len());
        for location in &self.locations {
            match location.resolve_id() {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(e) => {
                    warn!(
                        collection = %self.name,
                        path = %location.path.display(),
                        "skipping unresolvable source location: {e}"
                    );
                }
            }
        }
        ids
    }

    /// Compute the live child view.
    ///
    /// Walks the global tree (not the filesystem) for folders matching the
    /// declared locations and unions their children, deduplicated by
    /// identifier. Recomputed on every call; callers needing stability
    /// across a logical operation must hold on to the returned snapshot.
    pub fn children(
        &self,
        arena: &EntityArena,
        token: &CancellationToken,
    ) -> Result<Vec<Arc<Entity>>> {
        let wanted = self.location_ids();
        if token.is_cancelled() {
            return Err(LibraryError::Cancelled(format!(
                "child computation for {} cancelled",
                self.name
            )));
        }
        if wanted.is_empty() {
            // No resolvable locations: a valid, empty view.
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut merged: Vec<Arc<Entity>> = Vec::new();
        for folder in arena.folders_matching(&wanted) {
            if token.is_cancelled() {
                return Err(LibraryError::Cancelled(format!(
                    "child computation for {} cancelled",
                    self.name
                )));
            }
            for child in arena.children_of(folder.id()) {
                if seen.insert(child.id()) {
                    merged.push(child);
                }
            }
        }
        sort_snapshot(&mut merged);
        Ok(merged)
    }

    /// Look up (or lazily build) an index over the composed child view.
    ///
    /// `select` receives the current children and picks the entities
    /// satisfying `key`; the resulting id list is cached until the next
    /// invalidation. Keys are case-insensitive.
    pub fn indexed_children<F>(
        &self,
        arena: &EntityArena,
        token: &CancellationToken,
        key: &str,
        select: F,
    ) -> Result<Vec<Arc<Entity>>>
    where
        F: FnOnce(&[Arc<Entity>]) -> Vec<Arc<Entity>>,
    {
        let key = key.to_lowercase();
        let cache = self.index_cache.read().clone();
        if let Some(ids) = cache.get(&key) {
            debug!(collection = %self.name, key, "index cache hit");
            // Entities that vanished since the index was built contribute
            // nothing; the cache is disposable, not authoritative.
            return Ok(ids.iter().filter_map(|id| arena.get(*id)).collect());
        }

        let children = self.children(arena, token)?;
        let selected = select(&children);
        cache.insert(key, selected.iter().map(|e| e.id()).collect());
        Ok(selected)
    }

    /// Drop the index cache. Idempotent; called by the revalidation driver
    /// after any scan pass that may have changed physical folder membership.
    pub fn invalidate(&self) {
        *self.index_cache.write() = Arc::new(DashMap::new());
    }

    /// Revalidation for a collection folder never rescans the filesystem:
    /// the authoritative physical data is owned and refreshed by the
    /// physical folders themselves. Only the derived index cache is dropped.
    pub fn revalidate(&self) {
        debug!(collection = %self.name, "revalidating collection folder");
        self.invalidate();
    }
}
