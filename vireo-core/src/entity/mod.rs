//! The typed node graph the rest of the system operates on.
//!
//! Entities are addressed through an arena keyed by [`EntityId`] with
//! explicit parent/child identifier links, so aggregation views can locate
//! folders anywhere in the tree by index lookup instead of walking a live
//! object graph. Child sets are concurrent maps; add/remove is a single
//! atomic operation and readers only ever observe complete snapshots.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use tracing::debug;
use vireo_model::{EntityId, MediaKind, ResolveProbe};

use crate::error::{LibraryError, Result};

/// A node in the library tree: folder or leaf item.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    kind: MediaKind,
    name: String,
    path: Option<PathBuf>,
    parent: Option<EntityId>,
}

impl Entity {
    pub fn new(id: EntityId, kind: MediaKind, name: String, path: Option<PathBuf>) -> Self {
        Self {
            id,
            kind,
            name,
            path,
            parent: None,
        }
    }

    /// Build the entity a resolver produces for a probe: identifier derived
    /// from the probed path and resolved kind, name from the path.
    pub fn from_probe(probe: &ResolveProbe, kind: MediaKind) -> Self {
        Self::new(
            EntityId::derive(&probe.path, kind),
            kind,
            probe.display_name(),
            Some(probe.path.clone()),
        )
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Weak link to the owning folder, by identifier.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }
}

/// Id-addressed store for the global entity tree.
///
/// The arena is passed as context into readers (scanner, composer, session
/// facade) rather than held as global state, so tests can build isolated
/// trees.
#[derive(Debug)]
pub struct EntityArena {
    nodes: DashMap<EntityId, Arc<Entity>>,
    children: DashMap<EntityId, Arc<DashSet<EntityId>>>,
    root: EntityId,
}

impl EntityArena {
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Entity::new(EntityId::new(), MediaKind::Folder, root_name.into(), None);
        let root_id = root.id();
        let nodes = DashMap::new();
        nodes.insert(root_id, Arc::new(root));
        let children = DashMap::new();
        children.insert(root_id, Arc::new(DashSet::new()));
        Self {
            nodes,
            children,
            root: root_id,
        }
    }

    pub fn root_id(&self) -> EntityId {
        self.root
    }

    pub fn get(&self, id: EntityId) -> Option<Arc<Entity>> {
        self.nodes.get(&id).map(|e| e.clone())
    }

    /// Entity lookup with a typed failure for unknown identifiers.
    pub fn require(&self, id: EntityId) -> Result<Arc<Entity>> {
        self.get(id)
            .ok_or_else(|| LibraryError::NotFound(format!("entity {id} is not in the tree")))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `target` is reachable from `from` through any chain of child
    /// links. The weak `parent()` reference only records the first owner, so
    /// ancestry questions have to walk the link graph itself.
    fn links_down_to(&self, from: EntityId, to: EntityId) -> bool {
        if from == to {
            return true;
        }
        let mut visited = HashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(set) = self.children.get(&current) {
                for child in set.iter() {
                    if *child == to {
                        return true;
                    }
                    stack.push(*child);
                }
            }
        }
        false
    }

    /// Whether any surviving child set still links to `id`.
    fn has_surviving_link(&self, id: EntityId) -> bool {
        self.children.iter().any(|set| set.contains(&id))
    }

    /// Attach an entity under a folder and return the stored node.
    ///
    /// Attaching an identifier that is already in the tree adds a second
    /// reachability link instead of duplicating the node: the same logical
    /// item (same path, same kind, therefore same derived id) can be
    /// discovered under several physical folders. The node's weak parent
    /// reference stays with the first owner. Attaching a node above itself
    /// is rejected: a folder may not become its own ancestor.
    pub fn attach(&self, parent_id: EntityId, mut entity: Entity) -> Result<Arc<Entity>> {
        let parent = self.require(parent_id)?;
        if !parent.is_folder() {
            return Err(LibraryError::InvalidEntity(format!(
                "cannot attach {} under non-folder {}",
                entity.id(),
                parent_id
            )));
        }
        if self.links_down_to(entity.id(), parent_id) {
            return Err(LibraryError::InvalidEntity(format!(
                "attaching {} under {} would create a cycle",
                entity.id(),
                parent_id
            )));
        }

        let stored = if let Some(existing) = self.get(entity.id()) {
            existing
        } else {
            entity.parent = Some(parent_id);
            let stored = Arc::new(entity);
            self.nodes.insert(stored.id(), stored.clone());
            stored
        };
        let id = stored.id();
        if stored.is_folder() {
            self.children.entry(id).or_default();
        }
        if let Some(set) = self.children.get(&parent_id) {
            set.insert(id);
        }
        debug!(entity = %id, parent = %parent_id, kind = %stored.kind(), "attached entity");
        Ok(stored)
    }

    /// Detach an entity, destroying it and every descendant that becomes
    /// unreachable. A descendant still linked under a folder outside the
    /// detached subtree keeps its node and that link.
    pub fn detach(&self, id: EntityId) -> Result<Arc<Entity>> {
        let node = self.require(id)?;
        if id == self.root {
            return Err(LibraryError::InvalidEntity(
                "the root folder cannot be detached".to_string(),
            ));
        }
        // Drop every reachability link, not just the owning parent's.
        for set in self.children.iter() {
            set.remove(&id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            // Removing the child set first means the surviving-link scan
            // below never counts links held by a node being destroyed.
            if let Some((_, set)) = self.children.remove(&current) {
                for child in set.iter() {
                    if !self.has_surviving_link(*child) {
                        stack.push(*child);
                    }
                }
            }
            self.nodes.remove(&current);
        }
        Ok(node)
    }

    /// Ordered snapshot of a folder's direct children.
    pub fn children_of(&self, folder: EntityId) -> Vec<Arc<Entity>> {
        let Some(set) = self.children.get(&folder).map(|s| s.clone()) else {
            return Vec::new();
        };
        let mut out: Vec<Arc<Entity>> = set.iter().filter_map(|id| self.get(*id)).collect();
        sort_snapshot(&mut out);
        out
    }

    /// Walk the whole tree from the root, collecting folders whose
    /// identifier is in `wanted`.
    pub fn folders_matching(&self, wanted: &HashSet<EntityId>) -> Vec<Arc<Entity>> {
        let mut matched = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if wanted.contains(&current)
                && let Some(node) = self.get(current)
                && node.is_folder()
            {
                matched.push(node);
            }
            if let Some(set) = self.children.get(&current) {
                for child in set.iter() {
                    if self.get(*child).is_some_and(|c| c.is_folder()) {
                        stack.push(*child);
                    }
                }
            }
        }
        matched
    }
}

/// Deterministic child ordering: display name, then identifier.
pub(crate) fn sort_snapshot(entities: &mut [Arc<Entity>]) {
    entities.sort_by(|a, b| {
        a.name()
            .cmp(b.name())
            .then_with(|| a.id().cmp(&b.id()))
    });
}
