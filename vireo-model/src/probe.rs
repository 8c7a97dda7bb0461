use std::path::{Path, PathBuf};

/// Supported video file extensions.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "webm", "flv", "wmv", "m4v", "mpg", "mpeg", "3gp", "ogv", "ts",
    "mts", "m2ts",
];

/// Supported audio file extensions.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "aac", "m4a", "ogg", "oga", "opus", "wav", "wma", "ape", "mpc",
];

/// Pre-computed file-type classification carried on a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileKind {
    Video,
    Audio,
}

impl FileKind {
    /// Classify a path by extension; `None` for directories and unknown types.
    pub fn from_path(path: &Path) -> Option<FileKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileKind::Video)
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileKind::Audio)
        } else {
            None
        }
    }
}

/// One sibling entry visible next to (or inside) the probed path.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbeEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
}

impl ProbeEntry {
    pub fn new(path: PathBuf, is_directory: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path,
            is_directory,
        }
    }
}

/// Everything a resolver is allowed to look at for one filesystem path.
///
/// The probe is assembled once per path by the scanner; resolvers never list
/// directories themselves. For directories `entries` holds the directory's
/// own contents, for files it holds the sibling listing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolveProbe {
    /// Absolute, normalized path being classified.
    pub path: PathBuf,
    pub is_directory: bool,
    pub entries: Vec<ProbeEntry>,
    pub file_kind: Option<FileKind>,
}

impl ResolveProbe {
    pub fn new(path: PathBuf, is_directory: bool, entries: Vec<ProbeEntry>) -> Self {
        let file_kind = if is_directory {
            None
        } else {
            FileKind::from_path(&path)
        };
        Self {
            path,
            is_directory,
            entries,
            file_kind,
        }
    }

    /// Display name for the entity this probe would produce.
    pub fn display_name(&self) -> String {
        let stem = if self.is_directory {
            self.path.file_name()
        } else {
            self.path.file_stem()
        };
        stem.map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    pub fn is_audio_file(&self) -> bool {
        !self.is_directory && self.file_kind == Some(FileKind::Audio)
    }

    pub fn is_video_file(&self) -> bool {
        !self.is_directory && self.file_kind == Some(FileKind::Video)
    }
}
