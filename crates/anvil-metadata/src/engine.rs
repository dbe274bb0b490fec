use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::{DependencyRegistry, MetadataError, MetadataId, MetadataItem, MetadataProvider};

/// Cache counters, readable for tests and diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// The orchestrating context for all metadata computation.
///
/// Owns the dependency registry, the provider registry (metadata-class tag →
/// provider) and the memoizing item cache. One engine exists per session; it
/// is passed explicitly into every component that needs it rather than
/// reached through globals, and [`reset`](Self::reset) restores the pristine
/// state for tests.
///
/// Locks are held only across map access, never across a provider call, so
/// providers are free to recurse into the engine while computing.
pub struct MetadataEngine {
    registry: Mutex<DependencyRegistry>,
    providers: RwLock<HashMap<String, Arc<dyn MetadataProvider>>>,
    cache: Mutex<HashMap<MetadataId, Arc<dyn MetadataItem>>>,
    in_flight: Mutex<HashSet<MetadataId>>,
    stats: Mutex<CacheStats>,
}

impl Default for MetadataEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataEngine {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(DependencyRegistry::new()),
            providers: RwLock::new(HashMap::new()),
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Registers a provider as the owner of its metadata class. A later
    /// registration for the same class replaces the earlier one.
    pub fn register_provider(&self, provider: Arc<dyn MetadataProvider>) {
        let class = provider.provides_class().to_string();
        tracing::debug!(class = %class, "registering metadata provider");
        self.providers.write().insert(class, provider);
    }

    pub fn deregister_provider(&self, class: &str) {
        self.providers.write().remove(class);
    }

    pub fn provider_for(&self, class: &str) -> Option<Arc<dyn MetadataProvider>> {
        self.providers.read().get(class).cloned()
    }

    /// Returns the cached item for `id`, computing it through the owning
    /// provider on a miss.
    pub fn get(&self, id: &MetadataId) -> Result<Option<Arc<dyn MetadataItem>>, MetadataError> {
        self.get_with(id, false)
    }

    /// Like [`get`](Self::get); with `force` the cached value is evicted and
    /// the node recomputed unconditionally.
    pub fn get_with(
        &self,
        id: &MetadataId,
        force: bool,
    ) -> Result<Option<Arc<dyn MetadataItem>>, MetadataError> {
        if !id.is_instance_level() {
            return Err(MetadataError::ProtocolViolation {
                id: id.clone(),
                message: "only instance-level metadata can be retrieved".to_string(),
            });
        }
        let provider = self
            .provider_for(id.metadata_class())
            .ok_or_else(|| MetadataError::NoProvider(id.clone()))?;

        if force {
            if self.cache.lock().remove(id).is_some() {
                self.stats.lock().evictions += 1;
            }
        } else if let Some(hit) = self.cache.lock().get(id).cloned() {
            self.stats.lock().hits += 1;
            return Ok(Some(hit));
        }

        // A request for a node whose computation is already on the call stack
        // is answered from the cache (possibly absent) instead of recursing;
        // the in-flight computation will refresh it on the way out.
        {
            let mut in_flight = self.in_flight.lock();
            if in_flight.contains(id) {
                tracing::trace!(%id, "re-entrant metadata request answered from cache");
                return Ok(self.cache.lock().get(id).cloned());
            }
            in_flight.insert(id.clone());
        }
        self.stats.lock().misses += 1;

        tracing::debug!(%id, force, "computing metadata");
        let result = provider.get(self, id);
        self.in_flight.lock().remove(id);

        let item = result?;
        if let Some(item) = &item {
            self.cache.lock().insert(id.clone(), item.clone());
        }
        Ok(item)
    }

    /// Removes one cached item.
    pub fn evict(&self, id: &MetadataId) {
        if self.cache.lock().remove(id).is_some() {
            self.stats.lock().evictions += 1;
        }
    }

    pub fn evict_all(&self) {
        let mut cache = self.cache.lock();
        self.stats.lock().evictions += cache.len() as u64;
        cache.clear();
    }

    /// Restores the pristine state: cache, registry, stats. Registered
    /// providers survive a reset.
    pub fn reset(&self) {
        self.cache.lock().clear();
        *self.registry.lock() = DependencyRegistry::new();
        self.in_flight.lock().clear();
        *self.stats.lock() = CacheStats::default();
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }

    // Registry surface. Providers use these to declare edges while
    // computing; the registry itself stays private so every mutation goes
    // through the engine's lock.

    pub fn register_dependency(
        &self,
        upstream: &MetadataId,
        downstream: &MetadataId,
    ) -> Result<(), MetadataError> {
        self.registry.lock().register(upstream, downstream)
    }

    pub fn deregister_dependency(&self, upstream: &MetadataId, downstream: &MetadataId) {
        self.registry.lock().deregister(upstream, downstream);
    }

    /// Clears every edge terminating at `downstream`, ahead of that node
    /// re-declaring the edges still relevant to its next computation.
    pub fn deregister_dependencies(&self, downstream: &MetadataId) {
        self.registry.lock().deregister_all(downstream);
    }

    pub fn is_dependency_registered(&self, upstream: &MetadataId, downstream: &MetadataId) -> bool {
        self.registry.lock().is_registered(upstream, downstream)
    }

    pub fn downstream_of(&self, upstream: &MetadataId) -> Vec<MetadataId> {
        self.registry.lock().downstream_of(upstream)
    }

    /// Delivers a change notification for `upstream` to the owning provider
    /// of every registered downstream identifier — including downstreams
    /// subscribed at `upstream`'s class level — class-level targets first.
    ///
    /// A downstream class with no registered provider is skipped with a
    /// warning; it becomes reachable again once its provider registers.
    pub fn notify_downstream(&self, upstream: &MetadataId) -> Result<(), MetadataError> {
        let targets = self.registry.lock().notification_targets(upstream);
        if targets.is_empty() {
            return Ok(());
        }
        tracing::debug!(%upstream, count = targets.len(), "notifying downstream");
        for downstream in targets {
            let Some(provider) = self.provider_for(downstream.metadata_class()) else {
                tracing::warn!(%downstream, "no provider for downstream metadata class; skipping");
                continue;
            };
            provider.notify(self, upstream, &downstream)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for MetadataEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataEngine")
            .field("providers", &self.providers.read().keys().collect::<Vec<_>>())
            .field("cached_items", &self.cache.lock().len())
            .field("stats", &self.stats())
            .finish()
    }
}
