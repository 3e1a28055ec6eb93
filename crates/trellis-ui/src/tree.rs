//! Component tree (arena-based allocation)

use crate::container::Slots;
use crate::node::{Node, NodeData};
use crate::{NodeId, UiError, UiResult};

/// Arena of nodes. Node 0 is always the root.
#[derive(Debug)]
pub struct ComponentTree {
    nodes: Vec<Node>,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    /// Create a tree holding only the root node
    pub fn new() -> Self {
        let root = Node::new("UI", NodeData::Container(Slots::root()));
        Self { nodes: vec![root] }
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub(crate) fn node(&self, id: NodeId) -> UiResult<&Node> {
        self.get(id).ok_or(UiError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> UiResult<&mut Node> {
        self.get_mut(id).ok_or(UiError::UnknownNode(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Ancestors from the parent upwards
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: self.parent(id) }
    }

    /// Topmost ancestor (the node itself when it has no parent)
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Whether the node is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.get(id).is_some() && self.root_of(id) == NodeId::ROOT
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Components and extensions directly under a node
    pub fn all_children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id).map(Node::all_children).unwrap_or_default()
    }

    /// The node and every descendant, parents before children
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let children = self.all_children(current);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty (never true: the root always exists)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator over a node's ancestors
pub struct Ancestors<'a> {
    tree: &'a ComponentTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
