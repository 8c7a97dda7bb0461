use once_cell::sync::Lazy;
use regex::Regex;
use vireo_model::{MediaKind, ResolveProbe};

use super::{ItemResolver, ResolverPriority};
use crate::entity::Entity;
use crate::error::Result;

/// Season folder patterns.
static SEASON_FOLDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Season 01, Season 1
        Regex::new(r"(?i)^season\s*(\d+)$").unwrap(),
        // S01, S1, S02, etc.
        Regex::new(r"(?i)^s(\d{1,2})$").unwrap(),
        // Season01, Season1
        Regex::new(r"(?i)^season(\d+)$").unwrap(),
        // Specials
        Regex::new(r"(?i)^specials?$").unwrap(),
        // Series 1 (British convention)
        Regex::new(r"(?i)^series\s*(\d+)$").unwrap(),
    ]
});

pub(crate) fn is_season_folder_name(name: &str) -> bool {
    SEASON_FOLDER_PATTERNS.iter().any(|p| p.is_match(name))
}

/// Recognizes TV shapes: series directories, season directories, and the
/// episode files inside a season.
///
/// Sits in the `Second` tier so these directory shapes pre-empt the generic
/// folder fallback and the movie resolver.
#[derive(Debug, Default)]
pub struct SeriesResolver;

impl ItemResolver for SeriesResolver {
    fn name(&self) -> &'static str {
        "series"
    }

    fn priority(&self) -> ResolverPriority {
        ResolverPriority::Second
    }

    fn resolve(&self, probe: &ResolveProbe) -> Result<Option<Entity>> {
        if probe.is_directory {
            let name = probe.display_name();
            if is_season_folder_name(&name) {
                return Ok(Some(Entity::from_probe(probe, MediaKind::Season)));
            }
            // A directory holding at least one season subfolder is a series.
            if probe
                .entries
                .iter()
                .any(|e| e.is_directory && is_season_folder_name(&e.name))
            {
                return Ok(Some(Entity::from_probe(probe, MediaKind::Series)));
            }
            return Ok(None);
        }

        // Video files directly inside a season folder are episodes.
        if probe.is_video_file()
            && let Some(parent_name) = probe
                .path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
            && is_season_folder_name(parent_name)
        {
            return Ok(Some(Entity::from_probe(probe, MediaKind::Episode)));
        }

        Ok(None)
    }
}
