//! Lazily built registry of lock policies keyed by resource type name.
//!
//! The map is built from every registered [`DescriptorSource`] the first
//! time it is needed and published as an immutable `Arc`. Readers never see
//! a partially built map. [`LockDescriptorRegistry::reload`] drops the cached
//! map so the next lookup rebuilds it from the providers; it never touches
//! existing lock entries.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use editlock_core::locking::LockDescriptor;

use crate::providers::DescriptorSource;

type DescriptorMap = HashMap<String, LockDescriptor>;

pub struct LockDescriptorRegistry {
    providers: Vec<Arc<dyn DescriptorSource>>,
    cache: RwLock<Option<Arc<DescriptorMap>>>,
}

impl LockDescriptorRegistry {
    pub fn new(providers: Vec<Arc<dyn DescriptorSource>>) -> Self {
        Self {
            providers,
            cache: RwLock::new(None),
        }
    }

    /// Registry with a single provider.
    pub fn with_provider(provider: impl DescriptorSource + 'static) -> Self {
        let provider: Arc<dyn DescriptorSource> = Arc::new(provider);
        Self::new(vec![provider])
    }

    /// Policy for `resource_type`, or `None` if the type is not lockable.
    pub fn get(&self, resource_type: &str) -> Option<LockDescriptor> {
        self.descriptors().get(resource_type).cloned()
    }

    /// The current fully built map, building it on first use.
    pub fn descriptors(&self) -> Arc<DescriptorMap> {
        if let Some(map) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Arc::clone(map);
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished the build while we waited.
        if let Some(map) = cache.as_ref() {
            return Arc::clone(map);
        }

        let map = Arc::new(self.build());
        *cache = Some(Arc::clone(&map));
        map
    }

    /// Discard the cached map; the next lookup re-runs every provider.
    pub fn reload(&self) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::info!("Lock descriptor registry invalidated");
    }

    fn build(&self) -> DescriptorMap {
        let mut map = DescriptorMap::new();
        for provider in &self.providers {
            match provider.list_lock_descriptors() {
                Ok(descriptors) => {
                    for descriptor in descriptors {
                        map.insert(descriptor.name.clone(), descriptor);
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Lock descriptor provider failed, skipping");
                }
            }
        }
        tracing::info!(count = map.len(), "Lock descriptor registry built");
        map
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    use editlock_core::error::CoreError;

    use super::*;
    use crate::providers::StaticDescriptorProvider;

    /// Counts how many times the registry asked it for descriptors.
    struct CountingProvider {
        calls: AtomicUsize,
        descriptors: RwLock<Vec<LockDescriptor>>,
    }

    impl CountingProvider {
        fn new(descriptors: Vec<LockDescriptor>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                descriptors: RwLock::new(descriptors),
            }
        }
    }

    impl DescriptorSource for CountingProvider {
        fn list_lock_descriptors(&self) -> Result<Vec<LockDescriptor>, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.descriptors.read().unwrap().clone())
        }
    }

    struct FailingProvider;

    impl DescriptorSource for FailingProvider {
        fn list_lock_descriptors(&self) -> Result<Vec<LockDescriptor>, CoreError> {
            Err(CoreError::Configuration("boom".into()))
        }
    }

    // -----------------------------------------------------------------------
    // Lookup and merge of providers
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_type_has_no_descriptor() {
        let registry = LockDescriptorRegistry::with_provider(StaticDescriptorProvider::new(vec![
            LockDescriptor::new("invoice", Some(60)),
        ]));

        assert_eq!(
            registry.get("invoice"),
            Some(LockDescriptor::new("invoice", Some(60)))
        );
        assert_eq!(registry.get("order"), None);
    }

    #[test]
    fn later_provider_wins_on_duplicate_name() {
        let registry = LockDescriptorRegistry::new(vec![
            Arc::new(StaticDescriptorProvider::new(vec![LockDescriptor::new(
                "invoice",
                Some(60),
            )])),
            Arc::new(StaticDescriptorProvider::new(vec![LockDescriptor::new(
                "invoice",
                Some(300),
            )])),
        ]);

        assert_eq!(registry.get("invoice").unwrap().timeout_secs, Some(300));
    }

    #[test]
    fn failing_provider_is_skipped() {
        let registry = LockDescriptorRegistry::new(vec![
            Arc::new(FailingProvider),
            Arc::new(StaticDescriptorProvider::new(vec![LockDescriptor::new(
                "invoice", None,
            )])),
        ]);

        assert!(registry.get("invoice").is_some());
    }

    // -----------------------------------------------------------------------
    // Lazy build and reload
    // -----------------------------------------------------------------------

    #[test]
    fn build_is_lazy_and_cached() {
        let provider = Arc::new(CountingProvider::new(vec![LockDescriptor::new(
            "invoice", None,
        )]));
        let registry = LockDescriptorRegistry::new(vec![provider.clone()]);

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        registry.get("invoice");
        registry.get("order");
        registry.get("invoice");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reload_rebuilds_from_providers() {
        let provider = Arc::new(CountingProvider::new(vec![LockDescriptor::new(
            "invoice", None,
        )]));
        let registry = LockDescriptorRegistry::new(vec![provider.clone()]);
        assert!(registry.get("invoice").is_some());

        *provider.descriptors.write().unwrap() = vec![LockDescriptor::new("order", None)];
        // Still cached.
        assert!(registry.get("invoice").is_some());

        registry.reload();
        assert!(registry.get("invoice").is_none());
        assert!(registry.get("order").is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_cold_start_builds_once() {
        let provider = Arc::new(CountingProvider::new(vec![LockDescriptor::new(
            "invoice",
            Some(60),
        )]));
        let registry = Arc::new(LockDescriptorRegistry::new(vec![provider.clone()]));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    registry.descriptors()
                })
            })
            .collect();

        let maps: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        for map in &maps {
            assert!(Arc::ptr_eq(map, &maps[0]));
            assert_eq!(map.len(), 1);
        }
    }
}
