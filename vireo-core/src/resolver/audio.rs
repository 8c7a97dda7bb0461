use vireo_model::{MediaKind, ResolveProbe};

use super::{ItemResolver, ResolverPriority};
use crate::entity::Entity;
use crate::error::Result;

/// Matches standalone audio files.
///
/// Deliberately sits in the `Last` tier so that more specific shapes (a
/// multi-track album directory, for instance) get first claim on the path.
#[derive(Debug, Default)]
pub struct AudioResolver;

impl ItemResolver for AudioResolver {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn priority(&self) -> ResolverPriority {
        ResolverPriority::Last
    }

    fn resolve(&self, probe: &ResolveProbe) -> Result<Option<Entity>> {
        // Return audio if the path is a file and has a matching extension.
        if !probe.is_directory && probe.is_audio_file() {
            return Ok(Some(Entity::from_probe(probe, MediaKind::Audio)));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn matches_audio_files_only() {
        let resolver = AudioResolver;

        let track = ResolveProbe::new(PathBuf::from("/m/track.flac"), false, Vec::new());
        let resolved = resolver.resolve(&track).unwrap().unwrap();
        assert_eq!(resolved.kind(), MediaKind::Audio);
        assert_eq!(resolved.name(), "track");

        let video = ResolveProbe::new(PathBuf::from("/m/film.mkv"), false, Vec::new());
        assert!(resolver.resolve(&video).unwrap().is_none());
    }

    #[test]
    fn never_matches_directories() {
        let resolver = AudioResolver;
        // A directory named like an audio file is still a directory.
        let dir = ResolveProbe::new(PathBuf::from("/m/album.mp3"), true, Vec::new());
        assert!(resolver.resolve(&dir).unwrap().is_none());
    }
}
