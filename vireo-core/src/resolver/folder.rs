use vireo_model::{MediaKind, ResolveProbe};

use super::{ItemResolver, ResolverPriority};
use crate::entity::Entity;
use crate::error::Result;

/// Fallback: any directory nothing more specific claimed becomes a plain
/// folder.
#[derive(Debug, Default)]
pub struct FolderResolver;

impl ItemResolver for FolderResolver {
    fn name(&self) -> &'static str {
        "folder"
    }

    fn priority(&self) -> ResolverPriority {
        ResolverPriority::Last
    }

    fn resolve(&self, probe: &ResolveProbe) -> Result<Option<Entity>> {
        if probe.is_directory {
            return Ok(Some(Entity::from_probe(probe, MediaKind::Folder)));
        }
        Ok(None)
    }
}
