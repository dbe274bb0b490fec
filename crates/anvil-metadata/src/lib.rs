//! Incremental metadata engine for Anvil.
//!
//! This crate is the dependency-tracking and cache-invalidation core:
//! - [`MetadataId`]: the opaque identifier every metadata node is keyed by
//! - [`DependencyRegistry`]: the upstream → downstream notification graph
//! - [`MetadataEngine`]: the memoizing front end that owns the registry, the
//!   provider registry and the item cache, and dispatches notifications
//! - [`MetadataProvider`] / [`MetadataItem`]: the pluggable computor protocol
//! - [`HashTrackingNotifier`]: no-real-change suppression for providers
//!
//! ## Execution model
//!
//! Recomputation recurses synchronously: a provider's `get` may call back
//! into [`MetadataEngine::get`] for upstream nodes, which may fan out further
//! notifications before returning. Every lock in this crate is therefore held
//! only around map access and released before any provider is invoked, so
//! recursive recomputation can never self-deadlock.

mod engine;
mod error;
mod id;
mod item;
mod notifier;
mod registry;

pub use engine::{CacheStats, MetadataEngine};
pub use error::MetadataError;
pub use id::MetadataId;
pub use item::{downcast_item, MetadataItem};
pub use notifier::HashTrackingNotifier;
pub use registry::DependencyRegistry;

use std::sync::Arc;

/// A pluggable computor owning one metadata class of node.
///
/// `get` computes (or recomputes) the value of one instance-level node;
/// absent links in the underlying project are not errors, they yield
/// `Ok(None)` and the node simply does not currently exist. `notify` reacts
/// to an upstream change; the default implementation asserts the downstream
/// identifier is an instance of this provider's class and force-recomputes
/// it. Providers that accept class-level downstream identifiers (resolving
/// them to a concrete instance first) override `notify`.
pub trait MetadataProvider: Send + Sync {
    /// The metadata class tag this provider owns.
    fn provides_class(&self) -> &str;

    fn get(
        &self,
        engine: &MetadataEngine,
        id: &MetadataId,
    ) -> Result<Option<Arc<dyn MetadataItem>>, MetadataError>;

    fn notify(
        &self,
        engine: &MetadataEngine,
        upstream: &MetadataId,
        downstream: &MetadataId,
    ) -> Result<(), MetadataError> {
        let _ = upstream;
        if downstream.is_class_level() || downstream.metadata_class() != self.provides_class() {
            return Err(MetadataError::ProtocolViolation {
                id: downstream.clone(),
                message: format!(
                    "unexpected downstream notification for a provider of `{}`",
                    self.provides_class()
                ),
            });
        }
        engine.get_with(downstream, true)?;
        Ok(())
    }
}
