//! Connector registry
//!
//! Maps connector ids to live nodes. A node detached after the client has
//! seen it stays mapped (but hidden from lookups) until the next sweep, so a
//! re-attach within the same request keeps its registration.

use crate::{ConnectorId, NodeId, UiError, UiResult};
use std::collections::{HashMap, HashSet};

/// Outcome of [`ConnectorRegistry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The id was free and is now bound
    Registered,
    /// The node was detached earlier in this cycle and is back
    Reattached,
    /// The node was already registered under this id
    AlreadyRegistered,
}

/// What a sweep removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Mappings of nodes unregistered since the previous sweep
    pub released: Vec<(ConnectorId, NodeId)>,
    /// Mappings of nodes no longer inside the owning root
    pub stale: Vec<(ConnectorId, NodeId)>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.released.is_empty() && self.stale.is_empty()
    }
}

/// Identity registry for one root
#[derive(Debug, Default)]
pub struct ConnectorRegistry {
    by_id: HashMap<ConnectorId, NodeId>,
    /// Registered nodes whose state has never reached the client
    uninitialized: HashSet<NodeId>,
    /// Detached nodes still mapped until the next sweep
    unregistered: HashSet<NodeId>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to `node`
    pub fn register(&mut self, id: &ConnectorId, node: NodeId) -> UiResult<Registration> {
        match self.by_id.get(id) {
            None => {
                if let Some(previous) = self.id_of(node).cloned() {
                    // One id per node: the old binding goes, grace entry included
                    self.by_id.remove(&previous);
                    self.unregistered.remove(&node);
                    tracing::warn!("{:?} moved from id {} to {}", node, previous, id);
                }
                self.by_id.insert(id.clone(), node);
                self.uninitialized.insert(node);
                tracing::debug!("Registered {:?} ({})", node, id);
                Ok(Registration::Registered)
            }
            Some(&registered) if registered != node => Err(UiError::DuplicateIdentifier {
                id: id.clone(),
                registered,
                rejected: node,
            }),
            Some(_) => {
                if self.unregistered.remove(&node) {
                    tracing::debug!("Re-registered {:?} ({})", node, id);
                    Ok(Registration::Reattached)
                } else {
                    tracing::warn!("An already registered connector was registered again: {:?} ({})", node, id);
                    Ok(Registration::AlreadyRegistered)
                }
            }
        }
    }

    /// Release `id`. Returns `false` (with a warning) when the id is unknown.
    pub fn unregister(&mut self, id: &ConnectorId, node: NodeId) -> UiResult<bool> {
        let Some(&registered) = self.by_id.get(id) else {
            tracing::warn!("Tried to unregister {:?} ({}) which is not registered", node, id);
            return Ok(false);
        };
        if registered != node {
            return Err(UiError::IdentityMismatch {
                id: id.clone(),
                registered,
                given: node,
            });
        }

        if self.uninitialized.contains(&node) {
            // The client never heard of it, nothing to keep
            self.by_id.remove(id);
            self.uninitialized.remove(&node);
            self.unregistered.remove(&node);
            tracing::debug!("Unregistered {:?} ({}) before it reached the client", node, id);
        } else if self.unregistered.insert(node) {
            tracing::debug!("Unregistered {:?} ({})", node, id);
        } else {
            tracing::warn!("Unregistered {:?} ({}) that was already unregistered", node, id);
        }
        Ok(true)
    }

    /// Find a live node by id
    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.by_id
            .get(id)
            .copied()
            .filter(|node| !self.unregistered.contains(node))
    }

    /// Find the node bound to `id`, including ones awaiting a sweep
    pub(crate) fn binding(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    /// Id bound to `node`, including bindings awaiting a sweep
    pub(crate) fn id_of(&self, node: NodeId) -> Option<&ConnectorId> {
        self.by_id.iter().find(|&(_, &n)| n == node).map(|(id, _)| id)
    }

    /// Whether `node` is registered (and not awaiting release) under `id`
    pub fn is_registered(&self, id: &str, node: NodeId) -> bool {
        self.lookup(id) == Some(node)
    }

    /// Drop released mappings and every mapping whose node `in_scope`
    /// rejects. Calling it again without changes removes nothing.
    pub fn sweep<F>(&mut self, mut in_scope: F) -> SweepReport
    where
        F: FnMut(NodeId) -> bool,
    {
        let mut report = SweepReport::default();

        let unregistered = std::mem::take(&mut self.unregistered);
        self.by_id.retain(|id, node| {
            let node = *node;
            if unregistered.contains(&node) {
                report.released.push((id.clone(), node));
                false
            } else if !in_scope(node) {
                report.stale.push((id.clone(), node));
                false
            } else {
                true
            }
        });

        for (_, node) in report.released.iter().chain(report.stale.iter()) {
            self.uninitialized.remove(node);
        }
        report.released.sort();
        report.stale.sort();
        report
    }

    pub fn is_client_side_initialized(&self, node: NodeId) -> bool {
        !self.uninitialized.contains(&node)
    }

    pub fn mark_client_side_initialized(&mut self, node: NodeId) {
        self.uninitialized.remove(&node);
    }

    /// Force the full state of `node` to be sent again
    pub fn mark_uninitialized(&mut self, node: NodeId) {
        if self.by_id.values().any(|&n| n == node) {
            self.uninitialized.insert(node);
        }
    }

    /// Used when the client side has been reset but server state is kept
    pub fn mark_all_client_sides_uninitialized(&mut self) {
        self.uninitialized.extend(self.by_id.values().copied());
    }

    /// Live (id, node) pairs sorted by node
    pub fn entries(&self) -> Vec<(ConnectorId, NodeId)> {
        let mut entries: Vec<_> = self
            .by_id
            .iter()
            .filter(|(_, node)| !self.unregistered.contains(node))
            .map(|(id, node)| (id.clone(), *node))
            .collect();
        entries.sort_by_key(|(_, node)| *node);
        entries
    }

    /// Live connector ids, sorted
    pub fn ids(&self) -> Vec<ConnectorId> {
        let mut ids: Vec<_> = self.entries().into_iter().map(|(id, _)| id).collect();
        ids.sort();
        ids
    }

    /// Number of live mappings
    pub fn len(&self) -> usize {
        self.by_id.len() - self.unregistered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
