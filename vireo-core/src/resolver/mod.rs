//! Priority-ordered entity resolution.
//!
//! Each resolver classifies one filesystem probe into at most one entity.
//! The registry keeps resolvers sorted ascending by priority tier and
//! returns the first non-empty result; the short-circuit is what lets a
//! specific resolver (season shapes, say) pre-empt the generic folder
//! fallback.

use std::sync::Arc;

use tracing::{debug, warn};
use vireo_model::ResolveProbe;

use crate::entity::Entity;
use crate::error::Result;

mod audio;
mod folder;
mod movie;
mod series;

pub use audio::AudioResolver;
pub use folder::FolderResolver;
pub use movie::MovieResolver;
pub use series::SeriesResolver;

/// Trial order for resolvers. Lower tiers run first; `Last` is the fallback
/// bucket and only sees probes nothing else claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolverPriority {
    First,
    Second,
    Third,
    Last,
}

/// A classifier mapping probe data to at most one typed entity.
///
/// An `Err` from `resolve` means this resolver could not inspect the path
/// (permissions, vanished file); the registry logs it and moves on to the
/// next resolver.
pub trait ItemResolver: Send + Sync {
    fn name(&self) -> &'static str;
    fn priority(&self) -> ResolverPriority;
    fn resolve(&self, probe: &ResolveProbe) -> Result<Option<Entity>>;
}

/// Holds all registered resolvers sorted by priority.
pub struct ResolverRegistry {
    resolvers: Vec<Arc<dyn ItemResolver>>,
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field(
                "resolvers",
                &self.resolvers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Registry pre-loaded with the stock resolvers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SeriesResolver));
        registry.register(Arc::new(MovieResolver));
        registry.register(Arc::new(AudioResolver));
        registry.register(Arc::new(FolderResolver));
        registry
    }

    /// Insert a resolver keeping the list sorted ascending by priority.
    /// Registration order is preserved within a tier.
    pub fn register(&mut self, resolver: Arc<dyn ItemResolver>) {
        let at = self
            .resolvers
            .iter()
            .position(|r| r.priority() > resolver.priority())
            .unwrap_or(self.resolvers.len());
        self.resolvers.insert(at, resolver);
    }

    pub fn resolvers(&self) -> &[Arc<dyn ItemResolver>] {
        &self.resolvers
    }

    /// Classify one probe: first non-empty result wins, remaining resolvers
    /// are not invoked. A resolver failure counts as no-match for that
    /// resolver only. `None` means the path yields no entity and is simply
    /// excluded from the tree.
    pub fn resolve(&self, probe: &ResolveProbe) -> Option<Entity> {
        for resolver in &self.resolvers {
            match resolver.resolve(probe) {
                Ok(Some(entity)) => {
                    debug!(
                        resolver = resolver.name(),
                        path = %probe.path.display(),
                        kind = %entity.kind(),
                        "resolved entity"
                    );
                    return Some(entity);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        resolver = resolver.name(),
                        path = %probe.path.display(),
                        "resolver failed, continuing chain: {e}"
                    );
                }
            }
        }
        None
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vireo_model::MediaKind;

    struct Recording {
        label: &'static str,
        priority: ResolverPriority,
        matches: bool,
        fails: bool,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ItemResolver for Recording {
        fn name(&self) -> &'static str {
            self.label
        }

        fn priority(&self) -> ResolverPriority {
            self.priority
        }

        fn resolve(&self, probe: &ResolveProbe) -> Result<Option<Entity>> {
            self.calls.lock().unwrap().push(self.label);
            if self.fails {
                return Err(std::io::Error::other("probe exploded").into());
            }
            if self.matches {
                return Ok(Some(Entity::from_probe(probe, MediaKind::Movie)));
            }
            Ok(None)
        }
    }

    fn probe() -> ResolveProbe {
        ResolveProbe::new(PathBuf::from("/m/file.mkv"), false, Vec::new())
    }

    #[test]
    fn first_match_short_circuits() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ResolverRegistry::new();
        registry.register(Arc::new(Recording {
            label: "specific",
            priority: ResolverPriority::Second,
            matches: true,
            fails: false,
            calls: calls.clone(),
        }));
        registry.register(Arc::new(Recording {
            label: "generic",
            priority: ResolverPriority::Last,
            matches: true,
            fails: false,
            calls: calls.clone(),
        }));

        assert!(registry.resolve(&probe()).is_some());
        assert_eq!(*calls.lock().unwrap(), vec!["specific"]);
    }

    #[test]
    fn registration_order_breaks_priority_ties() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ResolverRegistry::new();
        for label in ["a", "b", "c"] {
            registry.register(Arc::new(Recording {
                label,
                priority: ResolverPriority::Last,
                matches: false,
                fails: false,
                calls: calls.clone(),
            }));
        }

        assert!(registry.resolve(&probe()).is_none());
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn lower_tier_runs_before_earlier_registered_higher_tier() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ResolverRegistry::new();
        registry.register(Arc::new(Recording {
            label: "fallback",
            priority: ResolverPriority::Last,
            matches: false,
            fails: false,
            calls: calls.clone(),
        }));
        registry.register(Arc::new(Recording {
            label: "eager",
            priority: ResolverPriority::First,
            matches: false,
            fails: false,
            calls: calls.clone(),
        }));

        registry.resolve(&probe());
        assert_eq!(*calls.lock().unwrap(), vec!["eager", "fallback"]);
    }

    #[test]
    fn resolver_failure_does_not_abort_the_chain() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ResolverRegistry::new();
        registry.register(Arc::new(Recording {
            label: "broken",
            priority: ResolverPriority::First,
            matches: true,
            fails: true,
            calls: calls.clone(),
        }));
        registry.register(Arc::new(Recording {
            label: "healthy",
            priority: ResolverPriority::Last,
            matches: true,
            fails: false,
            calls: calls.clone(),
        }));

        let resolved = registry.resolve(&probe());
        assert!(resolved.is_some());
        assert_eq!(*calls.lock().unwrap(), vec!["broken", "healthy"]);
    }

    #[test]
    fn no_match_yields_none_not_error() {
        let hits = Arc::new(AtomicUsize::new(0));
        struct Never(Arc<AtomicUsize>);
        impl ItemResolver for Never {
            fn name(&self) -> &'static str {
                "never"
            }
            fn priority(&self) -> ResolverPriority {
                ResolverPriority::Last
            }
            fn resolve(&self, _probe: &ResolveProbe) -> Result<Option<Entity>> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }
        }

        let mut registry = ResolverRegistry::new();
        registry.register(Arc::new(Never(hits.clone())));
        assert!(registry.resolve(&probe()).is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
