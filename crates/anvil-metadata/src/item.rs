use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::MetadataId;

/// An immutable computed value keyed by one instance-level identifier.
///
/// Items are replaced wholesale on recomputation, never mutated. The content
/// hash stands in for value equality across recomputations: providers use it
/// to suppress downstream notification when a recompute produced no real
/// change (see [`crate::HashTrackingNotifier`]).
pub trait MetadataItem: Any + Send + Sync + fmt::Debug {
    fn id(&self) -> &MetadataId;

    /// Hash of the computed content. Two items for the same identifier with
    /// equal hashes are considered unchanged.
    fn content_hash(&self) -> u64;

    fn as_any(&self) -> &dyn Any;
}

/// Downcasts a cached item to its concrete type.
pub fn downcast_item<T: MetadataItem>(item: &Arc<dyn MetadataItem>) -> Option<&T> {
    item.as_any().downcast_ref::<T>()
}
