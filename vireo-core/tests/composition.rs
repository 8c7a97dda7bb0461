//! End-to-end composition: scan real directory trees, then read virtual
//! collection folders against the populated arena.

use std::fs;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use vireo_core::{
    CollectionFolder, EntityArena, LibraryError, LibraryScanner, ResolverRegistry,
    RevalidationDriver,
};
use vireo_model::SourceLocation;

fn scanner() -> LibraryScanner {
    // RUST_LOG=vireo_core=debug surfaces scan/composition traces on failure.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    LibraryScanner::new(Arc::new(ResolverRegistry::with_defaults()))
}

#[test]
fn union_of_two_physical_folders() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("movies-a");
    let b = dir.path().join("movies-b");
    fs::create_dir(&a).unwrap();
    fs::create_dir(&b).unwrap();
    fs::write(a.join("m1.mkv"), b"x").unwrap();
    fs::write(a.join("m2.mkv"), b"x").unwrap();
    fs::write(b.join("m3.mkv"), b"x").unwrap();

    let arena = EntityArena::new("library");
    let token = CancellationToken::new();
    scanner()
        .scan_into(&arena, &[a.clone(), b.clone()], &token)
        .unwrap();

    let collection = CollectionFolder::new(
        "All Movies",
        vec![SourceLocation::folder(&a), SourceLocation::folder(&b)],
    );
    let names: Vec<_> = collection
        .children(&arena, &token)
        .unwrap()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, vec!["m1", "m2", "m3"]);
}

#[test]
fn shared_file_appears_once() {
    // The same physical folder declared twice: every child is reachable via
    // two matched folders and must still appear exactly once.
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("movies-a");
    fs::create_dir(&a).unwrap();
    fs::write(a.join("m1.mkv"), b"x").unwrap();

    let arena = EntityArena::new("library");
    let token = CancellationToken::new();
    scanner().scan_into(&arena, &[a.clone()], &token).unwrap();

    let collection = CollectionFolder::new(
        "Twice",
        vec![SourceLocation::folder(&a), SourceLocation::folder(&a)],
    );
    assert_eq!(collection.children(&arena, &token).unwrap().len(), 1);
}

#[test]
fn vanished_source_location_degrades_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("movies-a");
    let doomed = dir.path().join("doomed");
    fs::create_dir(&a).unwrap();
    fs::create_dir(&doomed).unwrap();
    fs::write(a.join("m1.mkv"), b"x").unwrap();
    fs::write(doomed.join("m9.mkv"), b"x").unwrap();

    let arena = EntityArena::new("library");
    let token = CancellationToken::new();
    scanner()
        .scan_into(&arena, &[a.clone(), doomed.clone()], &token)
        .unwrap();

    let collection = CollectionFolder::new(
        "Partial",
        vec![SourceLocation::folder(&a), SourceLocation::folder(&doomed)],
    );
    assert_eq!(collection.children(&arena, &token).unwrap().len(), 2);

    // The location's path disappears between scans: its identifier can no
    // longer be derived, so it contributes nothing, and the view is built
    // from what remains.
    fs::remove_dir_all(&doomed).unwrap();
    let names: Vec<_> = collection
        .children(&arena, &token)
        .unwrap()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, vec!["m1"]);
}

#[test]
fn composed_view_tracks_underlying_mutations() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("movies-a");
    fs::create_dir(&a).unwrap();
    fs::write(a.join("m1.mkv"), b"x").unwrap();

    let arena = Arc::new(EntityArena::new("library"));
    let driver = RevalidationDriver::new(arena.clone(), scanner(), vec![a.clone()]);
    let collection = Arc::new(CollectionFolder::new(
        "All",
        vec![SourceLocation::folder(&a)],
    ));
    driver.register_collection(collection.clone()).unwrap();

    let token = CancellationToken::new();
    driver.revalidate_all(&token).unwrap();
    assert_eq!(collection.children(&arena, &token).unwrap().len(), 1);

    // No persistent merged set: the next read sees the new child without any
    // cache interaction.
    fs::write(a.join("m2.mkv"), b"x").unwrap();
    driver.revalidate_all(&token).unwrap();
    assert_eq!(collection.children(&arena, &token).unwrap().len(), 2);
}

#[test]
fn cancelled_composition_returns_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("movies-a");
    fs::create_dir(&a).unwrap();

    let arena = EntityArena::new("library");
    let token = CancellationToken::new();
    scanner().scan_into(&arena, &[a.clone()], &token).unwrap();

    let collection = CollectionFolder::new("All", vec![SourceLocation::folder(&a)]);
    token.cancel();
    assert!(matches!(
        collection.children(&arena, &token),
        Err(LibraryError::Cancelled(_))
    ));
}
