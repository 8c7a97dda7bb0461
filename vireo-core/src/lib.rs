//! # Vireo Core
//!
//! Resolution-and-composition core of the Vireo media library manager: it
//! turns raw filesystem entries into typed library entities and assembles
//! virtual folders whose contents are merged from multiple independent
//! physical folder trees.
//!
//! ## Overview
//!
//! - **Entity arena**: the id-addressed node graph (folders, leaf items)
//!   shared by concurrent readers, with atomic child-set mutation and cycle
//!   rejection at attach time.
//! - **Resolver chain**: priority-ordered classifiers mapping filesystem
//!   probes to entities, first match wins.
//! - **Virtual collections**: folders whose child view is computed on read
//!   by joining declared source locations against the global tree, with a
//!   disposable per-collection index cache.
//! - **Revalidation driver**: the loop that rescans physical roots and
//!   propagates cache invalidation.
//! - **Sessions**: entity lookup and remote-control directives with typed
//!   not-found / unsupported / channel-unavailable failures.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use vireo_core::{CollectionFolder, EntityArena, LibraryScanner, ResolverRegistry};
//! use vireo_model::SourceLocation;
//!
//! fn compose() -> vireo_core::Result<()> {
//!     let arena = EntityArena::new("library");
//!     let scanner = LibraryScanner::new(Arc::new(ResolverRegistry::with_defaults()));
//!     let token = CancellationToken::new();
//!     scanner.scan_into(&arena, &["/media/movies-a".into(), "/media/movies-b".into()], &token)?;
//!
//!     let all = CollectionFolder::new(
//!         "All Movies",
//!         vec![
//!             SourceLocation::folder("/media/movies-a"),
//!             SourceLocation::folder("/media/movies-b"),
//!         ],
//!     );
//!     for child in all.children(&arena, &token)? {
//!         println!("{} ({})", child.name(), child.kind());
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Virtual collection folders and their index caches
pub mod collection;

/// The entity arena: the typed node graph everything operates on
pub mod entity;

/// Error types and error handling utilities
pub mod error;

/// Revalidation driver glue
pub mod revalidate;

/// Priority-ordered resolver chain and registry
pub mod resolver;

/// Filesystem scanning into the entity tree
pub mod scanner;

/// Remote-control session facade
pub mod session;

pub use collection::CollectionFolder;
pub use entity::{Entity, EntityArena};
pub use error::{LibraryError, Result};
pub use revalidate::RevalidationDriver;
pub use resolver::{
    AudioResolver, FolderResolver, ItemResolver, MovieResolver, ResolverPriority,
    ResolverRegistry, SeriesResolver,
};
pub use scanner::{LibraryScanner, ScanReport};
pub use session::{
    BrowseRequest, DirectiveChannel, PlayCommand, PlayRequest, RemoteMessage, Session,
    SessionManager,
};
