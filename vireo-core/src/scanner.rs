use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vireo_model::{EntityId, MediaKind, ProbeEntry, ResolveProbe, normalize_path};
use walkdir::WalkDir;

use crate::entity::{Entity, EntityArena};
use crate::error::{LibraryError, Result};
use crate::resolver::ResolverRegistry;

/// Walks physical library roots, classifies each path through the resolver
/// registry, and attaches the resulting entities into the tree.
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    registry: Arc<ResolverRegistry>,
    /// Maximum depth for directory traversal (None = unlimited)
    pub max_depth: Option<usize>,
    /// Whether to follow symbolic links
    pub follow_links: bool,
}

/// Outcome of one scan pass. Per-entry failures are collected here and never
/// abort the pass.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ScanReport {
    pub total_entries: usize,
    pub resolved: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl LibraryScanner {
    pub fn new(registry: Arc<ResolverRegistry>) -> Self {
        Self {
            registry,
            max_depth: None,
            follow_links: false,
        }
    }

    /// Set maximum directory depth for scanning
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Enable following symbolic links
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Scan a set of physical roots into the arena.
    ///
    /// Each root becomes (or refreshes) a plain folder entity directly under
    /// the arena root, with its identifier derived from the normalized path,
    /// so virtual collections can join against it later. A root that fails
    /// to normalize is recorded and skipped; the remaining roots still scan.
    pub fn scan_into(
        &self,
        arena: &EntityArena,
        roots: &[PathBuf],
        token: &CancellationToken,
    ) -> Result<ScanReport> {
        let mut report = ScanReport::default();
        for root in roots {
            if token.is_cancelled() {
                return Err(LibraryError::Cancelled("library scan cancelled".into()));
            }
            let normalized = match normalize_path(root) {
                Ok(p) => p,
                Err(e) => {
                    warn!("failed to normalize library root {}: {e}", root.display());
                    report
                        .errors
                        .push(format!("{}: {e}", root.display()));
                    continue;
                }
            };
            if let Err(e) = self.scan_root(arena, &normalized, token, &mut report) {
                if matches!(e, LibraryError::Cancelled(_)) {
                    return Err(e);
                }
                warn!("failed to scan library root {}: {e}", normalized.display());
                report.errors.push(format!("{}: {e}", normalized.display()));
            }
        }
        info!(
            "library scan complete: {} entries, {} resolved, {} skipped, {} errors",
            report.total_entries,
            report.resolved,
            report.skipped,
            report.errors.len()
        );
        Ok(report)
    }

    fn scan_root(
        &self,
        arena: &EntityArena,
        root: &Path,
        token: &CancellationToken,
        report: &mut ScanReport,
    ) -> Result<()> {
        debug!(
            "scanning {} (follow_links: {})",
            root.display(),
            self.follow_links
        );

        // The root itself is always a plain folder; its derived identifier
        // is the join key source locations resolve to.
        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string_lossy().into_owned());
        let root_entity = arena.attach(
            arena.root_id(),
            Entity::new(
                EntityId::derive(root, MediaKind::Folder),
                MediaKind::Folder,
                root_name,
                Some(root.to_path_buf()),
            ),
        )?;

        // path -> attached folder id, for parent lookups during the walk.
        let mut attached_dirs: HashMap<PathBuf, EntityId> = HashMap::new();
        attached_dirs.insert(root.to_path_buf(), root_entity.id());
        // Directory listings double as probe entries for the directory
        // itself and as sibling lists for the files inside it.
        let mut listings: HashMap<PathBuf, Vec<ProbeEntry>> = HashMap::new();
        listings.insert(root.to_path_buf(), list_directory(root, report));

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.follow_links);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker {
            if token.is_cancelled() {
                return Err(LibraryError::Cancelled("library scan cancelled".into()));
            }
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("error walking directory: {e}");
                    report.errors.push(format!("directory walk error: {e}"));
                    continue;
                }
            };
            report.total_entries += 1;

            let path = entry.path();
            let is_dir = entry.file_type().is_dir();
            let Some(parent_id) = path
                .parent()
                .and_then(|p| attached_dirs.get(p))
                .copied()
            else {
                // Parent directory yielded no entity; its subtree is
                // excluded from the tree.
                report.skipped += 1;
                continue;
            };

            let entries = if is_dir {
                let listing = list_directory(path, report);
                listings.insert(path.to_path_buf(), listing.clone());
                listing
            } else {
                path.parent()
                    .and_then(|p| listings.get(p))
                    .cloned()
                    .unwrap_or_default()
            };

            let probe = ResolveProbe::new(path.to_path_buf(), is_dir, entries);
            let Some(entity) = self.registry.resolve(&probe) else {
                report.skipped += 1;
                continue;
            };

            match arena.attach(parent_id, entity) {
                Ok(attached) => {
                    report.resolved += 1;
                    if is_dir {
                        attached_dirs.insert(path.to_path_buf(), attached.id());
                    }
                }
                Err(e) => {
                    warn!("failed to attach {}: {e}", path.display());
                    report.errors.push(format!("{}: {e}", path.display()));
                }
            }
        }
        Ok(())
    }
}

fn list_directory(path: &Path, report: &mut ScanReport) -> Vec<ProbeEntry> {
    match std::fs::read_dir(path) {
        Ok(read) => read
            .filter_map(|e| match e {
                Ok(entry) => {
                    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                    Some(ProbeEntry::new(entry.path(), is_dir))
                }
                Err(err) => {
                    report.errors.push(format!("{}: {err}", path.display()));
                    None
                }
            })
            .collect(),
        Err(err) => {
            warn!("failed to list {}: {err}", path.display());
            report.errors.push(format!("{}: {err}", path.display()));
            Vec::new()
        }
    }
}
