//! Identifier derivation sanity: deterministic, and collision-free across a
//! large generated fixture.

use std::collections::HashSet;
use std::path::PathBuf;

use vireo_model::{EntityId, MediaKind};

#[test]
fn derivation_is_deterministic() {
    let path = PathBuf::from("/media/movies/Heat (1995)");
    assert_eq!(
        EntityId::derive(&path, MediaKind::Folder),
        EntityId::derive(&path, MediaKind::Folder)
    );
}

#[test]
fn ten_thousand_pairs_do_not_collide() {
    let kinds = [
        MediaKind::Movie,
        MediaKind::Series,
        MediaKind::Season,
        MediaKind::Episode,
        MediaKind::Folder,
    ];
    let mut seen = HashSet::new();
    let mut pairs = 0usize;
    for i in 0..2000 {
        let path = PathBuf::from(format!("/media/library-{}/title {}", i % 7, i));
        for kind in kinds {
            assert!(
                seen.insert(EntityId::derive(&path, kind)),
                "collision for {} / {kind}",
                path.display()
            );
            pairs += 1;
        }
    }
    assert_eq!(pairs, 10_000);
}
