//! Dirty connector tracking
//!
//! The set of nodes whose state has to be sent with the next response.

use crate::tree::ComponentTree;
use crate::NodeId;
use std::collections::HashSet;

/// Dirty set for one root
#[derive(Debug, Default)]
pub struct DirtyTracker {
    dirty: HashSet<NodeId>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the node was not dirty before
    pub fn mark_dirty(&mut self, node: NodeId) -> bool {
        self.dirty.insert(node)
    }

    /// Returns `true` if the node was dirty before
    pub fn mark_clean(&mut self, node: NodeId) -> bool {
        self.dirty.remove(&node)
    }

    /// Mark `root` and its descendants dirty, skipping every subtree below an
    /// invisible node. Returns the nodes that were not dirty before.
    pub fn mark_all_dirty(&mut self, tree: &ComponentTree, root: NodeId) -> Vec<NodeId> {
        let mut newly_dirty = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let Some(data) = tree.get(node) else { continue };
            if !data.is_visible() {
                continue;
            }
            if self.dirty.insert(node) {
                newly_dirty.push(node);
            }
            stack.extend(data.all_children().into_iter().rev());
        }
        newly_dirty
    }

    pub fn mark_all_clean(&mut self) {
        self.dirty.clear();
    }

    pub fn is_dirty(&self, node: NodeId) -> bool {
        self.dirty.contains(&node)
    }

    /// Dirty nodes in arena order
    pub fn snapshot(&self) -> Vec<NodeId> {
        let mut nodes: Vec<_> = self.dirty.iter().copied().collect();
        nodes.sort();
        nodes
    }

    /// Drop nodes the predicate rejects
    pub(crate) fn retain<F: FnMut(NodeId) -> bool>(&mut self, mut keep: F) {
        self.dirty.retain(|&node| keep(node));
    }

    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }
}
