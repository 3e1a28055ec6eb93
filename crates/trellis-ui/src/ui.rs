//! UI root
//!
//! One `Ui` owns one component tree together with its connector registry,
//! dirty set and listeners. Nothing is shared between roots.

use crate::events::EventRouter;
use crate::node::{Node, NodeData};
use crate::{
    AttachEvent, ComponentAttachEvent, ComponentDetachEvent, ComponentTree, ConnectorId,
    ConnectorRegistry, ContainerKind, DetachEvent, DirtyTracker, ListenerId, MarkedDirtyEvent,
    NodeId, SweepReport, UiConfig, UiError, UiResult,
};
use std::collections::HashSet;

/// Parent/child inconsistency found by [`Ui::verify_hierarchy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyIssue {
    /// `parent` lists `child`, but the child records another parent
    ParentMismatch {
        parent: NodeId,
        child: NodeId,
        recorded_parent: Option<NodeId>,
    },
    /// A registered connector that cannot be reached from the root
    Dangling {
        connector: NodeId,
        recorded_parent: Option<NodeId>,
    },
}

/// Root of one component tree
#[derive(Debug)]
pub struct Ui {
    pub(crate) tree: ComponentTree,
    pub(crate) registry: ConnectorRegistry,
    pub(crate) dirty: DirtyTracker,
    pub(crate) events: EventRouter,
    config: UiConfig,
    next_connector_id: u64,
    sync_id: u64,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    /// Create a root with default settings
    pub fn new() -> Self {
        Self::with_config(UiConfig::default())
    }

    /// Create a root; the root node is registered and dirty right away
    pub fn with_config(config: UiConfig) -> Self {
        let mut ui = Self {
            tree: ComponentTree::new(),
            registry: ConnectorRegistry::new(),
            dirty: DirtyTracker::new(),
            events: EventRouter::default(),
            config,
            next_connector_id: 0,
            sync_id: 0,
        };
        let id = ui.ensure_connector_id(NodeId::ROOT, &HashSet::new());
        let registration = ui.registry.register(&id, NodeId::ROOT);
        debug_assert!(registration.is_ok(), "a fresh registry rejected the root");
        ui.dirty.mark_dirty(NodeId::ROOT);
        ui
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Node creation and lookup
    // ------------------------------------------------------------------

    /// Create a detached leaf component
    pub fn create_component(&mut self, type_name: &str) -> NodeId {
        self.tree.push(Node::new(type_name, NodeData::Leaf))
    }

    /// Create a detached, empty container
    pub fn create_container(&mut self, kind: ContainerKind) -> NodeId {
        self.tree
            .push(Node::new(kind.type_name(), NodeData::Container(kind.empty_slots())))
    }

    /// Create a detached extension
    pub fn create_extension(&mut self, type_name: &str) -> NodeId {
        self.tree.push(Node::new(type_name, NodeData::Extension))
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id)
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.tree.is_attached(id)
    }

    pub fn registry(&self) -> &ConnectorRegistry {
        &self.registry
    }

    /// Connector id, assigned on first attach
    pub fn connector_id(&self, id: NodeId) -> Option<&ConnectorId> {
        self.tree.get(id).and_then(Node::connector_id)
    }

    /// Find a registered connector by id
    pub fn connector(&self, connector_id: &str) -> Option<NodeId> {
        self.registry.lookup(connector_id)
    }

    /// Preassign the connector id of a node that is not attached. A node
    /// detached in this cycle keeps its old id until the next sweep.
    pub fn set_connector_id(&mut self, id: NodeId, connector_id: &str) -> UiResult<()> {
        if self.tree.is_attached(id) {
            return Err(UiError::unsupported(id, "the connector id of an attached connector cannot change"));
        }
        let bound = self.registry.id_of(id);
        if bound.is_some_and(|bound| bound.as_str() != connector_id) {
            return Err(UiError::unsupported(id, "the connector id is bound until the next sweep"));
        }
        self.tree.node_mut(id)?.connector_id = Some(ConnectorId::from(connector_id));
        Ok(())
    }

    /// Give `id` a generated connector id unless it has one. Generated ids
    /// skip registry bindings and the `reserved` ids.
    pub(crate) fn ensure_connector_id(&mut self, id: NodeId, reserved: &HashSet<ConnectorId>) -> ConnectorId {
        if let Some(existing) = self.connector_id(id) {
            return existing.clone();
        }
        let connector_id = loop {
            let candidate = ConnectorId::new(format!(
                "{}{}",
                self.config.connector_id_prefix, self.next_connector_id
            ));
            self.next_connector_id += 1;
            if self.registry.binding(candidate.as_str()).is_none() && !reserved.contains(&candidate) {
                break candidate;
            }
        };
        if let Some(node) = self.tree.get_mut(id) {
            node.connector_id = Some(connector_id.clone());
        }
        connector_id
    }

    // ------------------------------------------------------------------
    // Component state
    // ------------------------------------------------------------------

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(Node::is_visible)
    }

    /// Showing a node repaints its whole subtree; any change repaints the parent
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> UiResult<()> {
        let node = self.tree.node_mut(id)?;
        if node.visible == visible {
            return Ok(());
        }
        node.visible = visible;
        let parent = node.parent;

        if visible {
            self.mark_as_dirty_recursive(id);
        }
        if let Some(parent) = parent {
            self.mark_as_dirty(parent);
        }
        Ok(())
    }

    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(Node::is_enabled)
    }

    /// Containers repaint their subtree since children inherit the state
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> UiResult<()> {
        let node = self.tree.node_mut(id)?;
        if node.enabled == enabled {
            return Ok(());
        }
        node.enabled = enabled;
        let is_container = node.is_container();

        if is_container {
            self.mark_as_dirty_recursive(id);
        } else {
            self.mark_as_dirty(id);
        }
        Ok(())
    }

    /// Enabled as seen by the client: visible and enabled up to the root
    pub fn is_connector_enabled(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some()
            && std::iter::once(id)
                .chain(self.tree.ancestors(id))
                .all(|n| self.is_visible(n) && self.is_enabled(n))
    }

    /// Attached and visible up to the root
    pub fn is_visible_to_client(&self, id: NodeId) -> bool {
        self.tree.is_attached(id)
            && std::iter::once(id)
                .chain(self.tree.ancestors(id))
                .all(|n| self.is_visible(n))
    }

    pub fn set_caption(&mut self, id: NodeId, caption: Option<&str>) -> UiResult<()> {
        let node = self.tree.node_mut(id)?;
        let caption = caption.map(str::to_string);
        if node.caption == caption {
            return Ok(());
        }
        node.caption = caption;
        self.mark_as_dirty(id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------

    /// Record pending changes. Detached nodes are ignored; returns whether
    /// the node was clean before.
    pub fn mark_as_dirty(&mut self, id: NodeId) -> bool {
        if !self.tree.is_attached(id) {
            return false;
        }
        if !self.dirty.mark_dirty(id) {
            return false;
        }
        tracing::debug!("{} is now dirty", self.describe(id));
        self.events.marked_dirty(id);
        true
    }

    /// Mark a node and every descendant dirty, visible or not
    pub fn mark_as_dirty_recursive(&mut self, id: NodeId) {
        for node in self.tree.subtree(id) {
            self.mark_as_dirty(node);
        }
    }

    /// Mark every visible connector dirty
    pub fn mark_all_dirty(&mut self) {
        let newly_dirty = self.dirty.mark_all_dirty(&self.tree, NodeId::ROOT);
        for node in newly_dirty {
            self.events.marked_dirty(node);
        }
        tracing::debug!("All connectors are now dirty");
    }

    pub fn mark_clean(&mut self, id: NodeId) -> bool {
        let was_dirty = self.dirty.mark_clean(id);
        if was_dirty {
            tracing::debug!("{} is no longer dirty", self.describe(id));
        }
        was_dirty
    }

    pub fn mark_all_clean(&mut self) {
        self.dirty.mark_all_clean();
        tracing::debug!("All connectors are now clean");
    }

    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.dirty.is_dirty(id)
    }

    /// Dirty connectors in arena order; may include invisible ones
    pub fn dirty_connectors(&self) -> Vec<NodeId> {
        self.dirty.snapshot()
    }

    pub fn has_dirty_connectors(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Dirty connectors the client can actually see
    pub fn dirty_visible_connectors(&self) -> Vec<NodeId> {
        self.dirty
            .snapshot()
            .into_iter()
            .filter(|&id| self.is_visible_to_client(id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub fn add_component_attach_listener<F>(&mut self, container: NodeId, listener: F) -> ListenerId
    where
        F: FnMut(&ComponentAttachEvent) + Send + 'static,
    {
        self.events.on_component_attach(container, Box::new(listener))
    }

    pub fn add_component_detach_listener<F>(&mut self, container: NodeId, listener: F) -> ListenerId
    where
        F: FnMut(&ComponentDetachEvent) + Send + 'static,
    {
        self.events.on_component_detach(container, Box::new(listener))
    }

    pub fn add_attach_listener<F>(&mut self, connector: NodeId, listener: F) -> ListenerId
    where
        F: FnMut(&AttachEvent) + Send + 'static,
    {
        self.events.on_attach(connector, Box::new(listener))
    }

    pub fn add_detach_listener<F>(&mut self, connector: NodeId, listener: F) -> ListenerId
    where
        F: FnMut(&DetachEvent) + Send + 'static,
    {
        self.events.on_detach(connector, Box::new(listener))
    }

    pub fn add_marked_dirty_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&MarkedDirtyEvent) + Send + 'static,
    {
        self.events.on_marked_dirty(Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove(id)
    }

    // ------------------------------------------------------------------
    // Registry maintenance and sync
    // ------------------------------------------------------------------

    pub fn is_client_side_initialized(&self, id: NodeId) -> bool {
        self.registry.is_client_side_initialized(id)
    }

    pub fn mark_client_side_initialized(&mut self, id: NodeId) {
        self.registry.mark_client_side_initialized(id);
    }

    pub fn mark_all_client_sides_uninitialized(&mut self) {
        self.registry.mark_all_client_sides_uninitialized();
    }

    /// Sweep the registry of connectors that left this tree. Without
    /// `force` the sweep only runs when something is dirty.
    pub fn clean_connector_map(&mut self, force: bool) -> SweepReport {
        if !force && self.dirty.is_empty() {
            return SweepReport::default();
        }

        let tree = &self.tree;
        let report = self.registry.sweep(|node| tree.is_attached(node));
        for (id, node) in &report.stale {
            tracing::warn!(
                "clean_connector_map unregistered {:?} ({}). This should have been done when the connector was detached.",
                node,
                id
            );
        }
        self.dirty.retain(|node| tree.is_attached(node));

        if self.config.verify_hierarchy {
            for issue in self.verify_hierarchy() {
                tracing::warn!("Connector hierarchy is corrupted: {:?}", issue);
            }
        }

        if self.config.forget_hidden_state {
            let hidden: Vec<NodeId> = self
                .registry
                .entries()
                .into_iter()
                .map(|(_, node)| node)
                .filter(|&node| {
                    self.registry.is_client_side_initialized(node) && !self.is_visible_to_client(node)
                })
                .collect();
            for node in hidden {
                tracing::debug!("Forgetting client state of {} as it is not visible", self.describe(node));
                self.registry.mark_uninitialized(node);
            }
        }

        report
    }

    /// Check that every listed child records its container as parent and
    /// that every registered connector is reachable from the root
    pub fn verify_hierarchy(&self) -> Vec<HierarchyIssue> {
        let mut issues = Vec::new();
        let mut reachable = HashSet::new();
        let mut stack = vec![NodeId::ROOT];

        while let Some(node) = stack.pop() {
            if !reachable.insert(node) {
                continue;
            }
            for child in self.tree.all_children(node) {
                let recorded_parent = self.tree.parent(child);
                if recorded_parent != Some(node) {
                    issues.push(HierarchyIssue::ParentMismatch { parent: node, child, recorded_parent });
                }
                stack.push(child);
            }
        }

        for (_, connector) in self.registry.entries() {
            if !reachable.contains(&connector) {
                issues.push(HierarchyIssue::Dangling {
                    connector,
                    recorded_parent: self.tree.parent(connector),
                });
            }
        }
        issues
    }

    /// Number of completed flush cycles
    pub fn sync_id(&self) -> u64 {
        self.sync_id
    }

    /// Finish a flush cycle: the `written` connectors reached the client,
    /// the dirty set is cleared and the registry swept
    pub fn complete_sync(&mut self, written: &[NodeId]) -> SweepReport {
        for &node in written {
            self.registry.mark_client_side_initialized(node);
        }
        self.mark_all_clean();
        self.sync_id += 1;
        self.clean_connector_map(true)
    }

    /// `Type(id) (parent: Type(id))` for logs
    pub(crate) fn describe(&self, id: NodeId) -> String {
        let describe_one = |id: NodeId| match self.tree.get(id) {
            Some(node) => match &node.connector_id {
                Some(connector_id) => format!("{}({})", node.type_name, connector_id),
                None => format!("{}({:?})", node.type_name, id),
            },
            None => "(none)".to_string(),
        };
        match self.tree.parent(id) {
            Some(parent) => format!("{} (parent: {})", describe_one(id), describe_one(parent)),
            None => describe_one(id),
        }
    }
}
