/// The kind of content a library entity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub enum MediaKind {
    Movie,
    Series,
    Season,
    Episode,
    Audio,
    Folder,
    Collection,
}

impl MediaKind {
    /// Whether entities of this kind expose a child set.
    pub fn is_folder(self) -> bool {
        matches!(
            self,
            MediaKind::Series | MediaKind::Season | MediaKind::Folder | MediaKind::Collection
        )
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "Movie"),
            MediaKind::Series => write!(f, "Series"),
            MediaKind::Season => write!(f, "Season"),
            MediaKind::Episode => write!(f, "Episode"),
            MediaKind::Audio => write!(f, "Audio"),
            MediaKind::Folder => write!(f, "Folder"),
            MediaKind::Collection => write!(f, "Collection"),
        }
    }
}
