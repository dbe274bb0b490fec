use std::collections::HashMap;

use parking_lot::Mutex;

use crate::{MetadataEngine, MetadataError, MetadataId, MetadataItem};

/// Per-provider change gate for downstream notification.
///
/// Providers route freshly computed items through this before returning them:
/// the notifier remembers the last content hash seen per identifier and only
/// fans out [`MetadataEngine::notify_downstream`] when the hash actually
/// changed, so a recompute that produced an identical value stays silent.
#[derive(Debug, Default)]
pub struct HashTrackingNotifier {
    hashes: Mutex<HashMap<MetadataId, u64>>,
}

impl HashTrackingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify_if_changed(
        &self,
        engine: &MetadataEngine,
        item: &dyn MetadataItem,
    ) -> Result<(), MetadataError> {
        let changed = {
            let mut hashes = self.hashes.lock();
            hashes.insert(item.id().clone(), item.content_hash()) != Some(item.content_hash())
        };
        if changed {
            engine.notify_downstream(item.id())
        } else {
            tracing::trace!(id = %item.id(), "metadata unchanged; suppressing notification");
            Ok(())
        }
    }
}
