use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use anvil_metadata::{
    downcast_item, HashTrackingNotifier, MetadataEngine, MetadataError, MetadataId, MetadataItem,
    MetadataProvider,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ValueItem {
    id: MetadataId,
    value: u64,
}

impl MetadataItem for ValueItem {
    fn id(&self) -> &MetadataId {
        &self.id
    }

    fn content_hash(&self) -> u64 {
        self.value
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider computing items from a mutable source map, counting computations.
#[derive(Default)]
struct ValueProvider {
    source: Mutex<HashMap<MetadataId, u64>>,
    computes: Mutex<u64>,
}

impl ValueProvider {
    fn set(&self, id: &MetadataId, value: u64) {
        self.source.lock().insert(id.clone(), value);
    }

    fn computes(&self) -> u64 {
        *self.computes.lock()
    }
}

impl MetadataProvider for ValueProvider {
    fn provides_class(&self) -> &str {
        "value"
    }

    fn get(
        &self,
        _engine: &MetadataEngine,
        id: &MetadataId,
    ) -> Result<Option<Arc<dyn MetadataItem>>, MetadataError> {
        *self.computes.lock() += 1;
        Ok(self.source.lock().get(id).map(|value| {
            Arc::new(ValueItem {
                id: id.clone(),
                value: *value,
            }) as Arc<dyn MetadataItem>
        }))
    }
}

/// Provider that records every notification it receives.
#[derive(Default)]
struct RecordingProvider {
    class: String,
    notifications: Mutex<Vec<(MetadataId, MetadataId)>>,
}

impl RecordingProvider {
    fn new(class: &str) -> Self {
        Self {
            class: class.to_string(),
            notifications: Mutex::new(Vec::new()),
        }
    }

    fn notifications(&self) -> Vec<(MetadataId, MetadataId)> {
        self.notifications.lock().clone()
    }
}

impl MetadataProvider for RecordingProvider {
    fn provides_class(&self) -> &str {
        &self.class
    }

    fn get(
        &self,
        _engine: &MetadataEngine,
        _id: &MetadataId,
    ) -> Result<Option<Arc<dyn MetadataItem>>, MetadataError> {
        Ok(None)
    }

    fn notify(
        &self,
        _engine: &MetadataEngine,
        upstream: &MetadataId,
        downstream: &MetadataId,
    ) -> Result<(), MetadataError> {
        self.notifications
            .lock()
            .push((upstream.clone(), downstream.clone()));
        Ok(())
    }
}

fn id(token: &str) -> MetadataId {
    MetadataId::parse(token).unwrap()
}

#[test]
fn recompute_is_idempotent_and_cached() {
    let engine = MetadataEngine::new();
    let provider = Arc::new(ValueProvider::default());
    engine.register_provider(provider.clone());

    let node = id("md:value#a");
    provider.set(&node, 7);

    let first = engine.get(&node).unwrap().expect("item exists");
    let second = engine.get(&node).unwrap().expect("item exists");

    assert_eq!(
        downcast_item::<ValueItem>(&first),
        downcast_item::<ValueItem>(&second)
    );
    assert_eq!(provider.computes(), 1, "second read must hit the cache");
    assert_eq!(engine.stats().hits, 1);
    assert_eq!(engine.stats().misses, 1);
}

#[test]
fn force_recompute_refreshes_the_cache() {
    let engine = MetadataEngine::new();
    let provider = Arc::new(ValueProvider::default());
    engine.register_provider(provider.clone());

    let node = id("md:value#a");
    provider.set(&node, 1);
    engine.get(&node).unwrap();

    provider.set(&node, 2);
    let stale = engine.get(&node).unwrap().unwrap();
    assert_eq!(downcast_item::<ValueItem>(&stale).unwrap().value, 1);

    let fresh = engine.get_with(&node, true).unwrap().unwrap();
    assert_eq!(downcast_item::<ValueItem>(&fresh).unwrap().value, 2);
    assert_eq!(provider.computes(), 2);

    // The refreshed value is what subsequent cached reads see.
    let cached = engine.get(&node).unwrap().unwrap();
    assert_eq!(downcast_item::<ValueItem>(&cached).unwrap().value, 2);
}

#[test]
fn absent_items_are_not_cached_as_present() {
    let engine = MetadataEngine::new();
    let provider = Arc::new(ValueProvider::default());
    engine.register_provider(provider.clone());

    let node = id("md:value#missing");
    assert!(engine.get(&node).unwrap().is_none());
    assert!(engine.get(&node).unwrap().is_none());
    assert_eq!(provider.computes(), 2, "absence is recomputed on demand");

    provider.set(&node, 5);
    assert!(engine.get(&node).unwrap().is_some());
}

#[test]
fn class_level_get_is_a_protocol_violation() {
    let engine = MetadataEngine::new();
    engine.register_provider(Arc::new(ValueProvider::default()));
    assert!(matches!(
        engine.get(&id("md:value")),
        Err(MetadataError::ProtocolViolation { .. })
    ));
}

#[test]
fn unknown_class_has_no_provider() {
    let engine = MetadataEngine::new();
    assert!(matches!(
        engine.get(&id("md:value#a")),
        Err(MetadataError::NoProvider(_))
    ));
}

#[test]
fn notifications_deliver_class_level_first_in_registration_order() {
    let engine = MetadataEngine::new();
    let provider = Arc::new(RecordingProvider::new("listener"));
    engine.register_provider(provider.clone());

    let upstream = id("md:value#changed");
    let first_instance = id("md:listener#one");
    let class = id("md:listener");
    let second_instance = id("md:listener#two");
    engine.register_dependency(&upstream, &first_instance).unwrap();
    engine.register_dependency(&upstream, &class).unwrap();
    engine.register_dependency(&upstream, &second_instance).unwrap();

    engine.notify_downstream(&upstream).unwrap();

    let received: Vec<MetadataId> = provider
        .notifications()
        .into_iter()
        .map(|(_, downstream)| downstream)
        .collect();
    assert_eq!(received, vec![class, first_instance, second_instance]);
}

#[test]
fn notification_without_provider_is_skipped() {
    let engine = MetadataEngine::new();
    let upstream = id("md:value#u");
    engine
        .register_dependency(&upstream, &id("md:orphan#d"))
        .unwrap();
    engine.notify_downstream(&upstream).unwrap();
}

#[test]
fn hash_tracking_suppresses_unchanged_notifications() {
    let engine = MetadataEngine::new();
    let listener = Arc::new(RecordingProvider::new("listener"));
    engine.register_provider(listener.clone());

    let node = id("md:value#a");
    let downstream = id("md:listener#d");
    engine.register_dependency(&node, &downstream).unwrap();

    let notifier = HashTrackingNotifier::new();
    let item = ValueItem {
        id: node.clone(),
        value: 1,
    };
    notifier.notify_if_changed(&engine, &item).unwrap();
    notifier.notify_if_changed(&engine, &item).unwrap();
    assert_eq!(listener.notifications().len(), 1, "same hash notifies once");

    let changed = ValueItem {
        id: node.clone(),
        value: 2,
    };
    notifier.notify_if_changed(&engine, &changed).unwrap();
    assert_eq!(listener.notifications().len(), 2);
}

#[test]
fn reset_clears_cache_and_registry_but_keeps_providers() {
    let engine = MetadataEngine::new();
    let provider = Arc::new(ValueProvider::default());
    engine.register_provider(provider.clone());

    let node = id("md:value#a");
    provider.set(&node, 3);
    engine.get(&node).unwrap();
    engine
        .register_dependency(&node, &id("md:value#b"))
        .unwrap();

    engine.reset();
    assert!(engine.downstream_of(&node).is_empty());
    assert_eq!(engine.stats().hits, 0);

    engine.get(&node).unwrap();
    assert_eq!(provider.computes(), 2, "cache was cleared by reset");
}
