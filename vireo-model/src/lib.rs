//! Core data model definitions shared across Vireo crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod kind;
pub mod location;
pub mod probe;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::{EntityId, SessionId};
pub use kind::MediaKind;
pub use location::{SourceLocation, normalize_path};
pub use probe::{FileKind, ProbeEntry, ResolveProbe};
