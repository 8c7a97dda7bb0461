use std::path::{Path, PathBuf};

use normpath::PathExt;

use crate::error::{ModelError, Result};
use crate::ids::EntityId;
use crate::kind::MediaKind;

/// Normalize a path against the filesystem.
///
/// Resolution touches the filesystem, so a vanished path fails with an I/O
/// error rather than producing an identifier that can never match anything.
pub fn normalize_path(path: &Path) -> Result<PathBuf> {
    Ok(path.normalize()?.into_path_buf())
}

/// A declared physical source of a virtual collection folder: a filesystem
/// path plus the entity kind expected to represent it in the library tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLocation {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl SourceLocation {
    pub fn new(path: impl Into<PathBuf>, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Shorthand for the common case of aggregating plain physical folders.
    pub fn folder(path: impl Into<PathBuf>) -> Self {
        Self::new(path, MediaKind::Folder)
    }

    /// Derive the stable identifier of the real folder entity backing this
    /// location. Fails when the declared path no longer resolves.
    pub fn resolve_id(&self) -> Result<EntityId> {
        if !self.kind.is_folder() {
            return Err(ModelError::InvalidLocation(format!(
                "source location {} declares non-folder kind {}",
                self.path.display(),
                self.kind
            )));
        }
        let normalized = normalize_path(&self.path)?;
        Ok(EntityId::derive(&normalized, self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanished_path_fails_resolution() {
        let loc = SourceLocation::folder("/definitely/not/a/real/path");
        assert!(matches!(loc.resolve_id(), Err(ModelError::Io(_))));
    }

    #[test]
    fn non_folder_kind_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let loc = SourceLocation::new(dir.path(), MediaKind::Movie);
        assert!(matches!(
            loc.resolve_id(),
            Err(ModelError::InvalidLocation(_))
        ));
    }

    #[test]
    fn resolved_id_matches_derived_id() {
        let dir = tempfile::tempdir().unwrap();
        let loc = SourceLocation::folder(dir.path());
        let id = loc.resolve_id().unwrap();
        let normalized = normalize_path(dir.path()).unwrap();
        assert_eq!(id, EntityId::derive(&normalized, MediaKind::Folder));
    }
}
