use std::path::Path;

use uuid::Uuid;

use crate::kind::MediaKind;

/// Namespace for path-derived entity identifiers.
///
/// Changing this value changes every derived identifier in existing
/// libraries, so it is fixed for the lifetime of the on-disk format.
const PATH_NAMESPACE: Uuid = Uuid::from_u128(0x9f1c_7b52_6a0e_4b8d_b1c3_5e7a_2d94_f06a);

/// Strongly typed identifier for library entities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub Uuid);

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityId {
    /// Mint a fresh identifier for an entity with no stable path identity.
    pub fn new() -> Self {
        EntityId(Uuid::now_v7())
    }

    /// Derive the stable identifier for a physical path and entity kind.
    ///
    /// The result is a v5 (namespaced SHA-1) UUID over the normalized
    /// absolute path plus the kind, so it is identical across process runs
    /// and across rescans. This is the join key virtual collection folders
    /// use to locate the real folder entity for a declared source location.
    /// Callers must pass an already-normalized path; see
    /// [`crate::location::normalize_path`].
    pub fn derive(path: &Path, kind: MediaKind) -> Self {
        let key = format!("{}|{kind}", path.to_string_lossy());
        EntityId(Uuid::new_v5(&PATH_NAMESPACE, key.as_bytes()))
    }

    pub fn as_str(&self) -> String {
        self.0.to_string()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for EntityId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed identifier for remote-control sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionId(pub Uuid);

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for SessionId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
