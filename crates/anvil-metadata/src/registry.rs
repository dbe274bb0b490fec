use std::collections::{HashMap, HashSet};

use crate::{MetadataError, MetadataId};

/// Directed dependency graph over metadata identifiers.
///
/// Edges run upstream → downstream ("whose change" → "who must react") and
/// are discovered dynamically while providers recompute, so the registry only
/// validates the one structural invariant it can: the graph stays acyclic.
/// Downstream sets preserve registration order, which is also delivery order.
#[derive(Debug, Default)]
pub struct DependencyRegistry {
    downstream: HashMap<MetadataId, Vec<MetadataId>>,
    upstream: HashMap<MetadataId, Vec<MetadataId>>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an edge. Re-registering an existing edge is a no-op.
    pub fn register(
        &mut self,
        upstream: &MetadataId,
        downstream: &MetadataId,
    ) -> Result<(), MetadataError> {
        if self.is_registered(upstream, downstream) {
            return Ok(());
        }
        if upstream == downstream || self.reaches(downstream, upstream) {
            return Err(MetadataError::CircularDependency {
                upstream: upstream.clone(),
                downstream: downstream.clone(),
            });
        }
        self.downstream
            .entry(upstream.clone())
            .or_default()
            .push(downstream.clone());
        self.upstream
            .entry(downstream.clone())
            .or_default()
            .push(upstream.clone());
        Ok(())
    }

    /// Removes an edge. Removing a missing edge is a no-op.
    pub fn deregister(&mut self, upstream: &MetadataId, downstream: &MetadataId) {
        if let Some(entries) = self.downstream.get_mut(upstream) {
            entries.retain(|id| id != downstream);
        }
        if let Some(entries) = self.upstream.get_mut(downstream) {
            entries.retain(|id| id != upstream);
        }
    }

    /// Removes every edge terminating at `downstream`.
    ///
    /// Providers call this before recomputing a node so only the edges still
    /// relevant after recomputation survive.
    pub fn deregister_all(&mut self, downstream: &MetadataId) {
        for upstream in self.upstream.remove(downstream).unwrap_or_default() {
            if let Some(entries) = self.downstream.get_mut(&upstream) {
                entries.retain(|id| id != downstream);
            }
        }
    }

    pub fn is_registered(&self, upstream: &MetadataId, downstream: &MetadataId) -> bool {
        self.downstream
            .get(upstream)
            .is_some_and(|entries| entries.contains(downstream))
    }

    /// Snapshot of the downstream identifiers of `upstream`, in registration
    /// order.
    pub fn downstream_of(&self, upstream: &MetadataId) -> Vec<MetadataId> {
        self.downstream.get(upstream).cloned().unwrap_or_default()
    }

    /// The delivery list for a change to `upstream`: edges registered on the
    /// identifier itself plus, for an instance-level change, edges registered
    /// on its class-level identifier (standing subscriptions to "any instance
    /// of this class"). Class-level downstream identifiers are delivered
    /// first, then instance-level, each group in registration order.
    pub fn notification_targets(&self, upstream: &MetadataId) -> Vec<MetadataId> {
        let mut entries = self.downstream_of(upstream);
        if upstream.is_instance_level() {
            for entry in self.downstream_of(&upstream.class_of()) {
                if !entries.contains(&entry) {
                    entries.push(entry);
                }
            }
        }
        let (class_level, instance_level): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(MetadataId::is_class_level);
        class_level.into_iter().chain(instance_level).collect()
    }

    fn reaches(&self, from: &MetadataId, to: &MetadataId) -> bool {
        let mut stack = vec![from.clone()];
        let mut visited = HashSet::new();
        while let Some(current) = stack.pop() {
            if &current == to {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(entries) = self.downstream.get(&current) {
                stack.extend(entries.iter().cloned());
            }
        }
        false
    }
}
