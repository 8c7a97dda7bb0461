use vireo_model::{MediaKind, ResolveProbe};

use super::{ItemResolver, ResolverPriority};
use crate::entity::Entity;
use crate::error::Result;

/// Matches standalone video files as movies.
///
/// Runs after the TV-shape resolver so video files inside a season folder
/// are claimed as episodes before this resolver ever sees them.
#[derive(Debug, Default)]
pub struct MovieResolver;

impl ItemResolver for MovieResolver {
    fn name(&self) -> &'static str {
        "movie"
    }

    fn priority(&self) -> ResolverPriority {
        ResolverPriority::Third
    }

    fn resolve(&self, probe: &ResolveProbe) -> Result<Option<Entity>> {
        if !probe.is_directory && probe.is_video_file() {
            return Ok(Some(Entity::from_probe(probe, MediaKind::Movie)));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn matches_video_files() {
        let resolver = MovieResolver;
        let probe = ResolveProbe::new(PathBuf::from("/m/Heat (1995).mkv"), false, Vec::new());
        let resolved = resolver.resolve(&probe).unwrap().unwrap();
        assert_eq!(resolved.kind(), MediaKind::Movie);
        assert_eq!(resolved.name(), "Heat (1995)");
    }

    #[test]
    fn ignores_directories_and_non_video() {
        let resolver = MovieResolver;
        let dir = ResolveProbe::new(PathBuf::from("/m/Heat"), true, Vec::new());
        assert!(resolver.resolve(&dir).unwrap().is_none());
        let text = ResolveProbe::new(PathBuf::from("/m/notes.txt"), false, Vec::new());
        assert!(resolver.resolve(&text).unwrap().is_none());
    }
}
