//! Tree mutation
//!
//! Every structural change runs through the same two primitives: `link`
//! places a component in a container slot and `unlink` takes it out. They
//! keep parent pointers, the registry, the dirty set and the listeners in
//! step for all container variants.

use crate::container::Slots;
use crate::{ConnectorId, NodeId, Ui, UiError, UiResult};
use std::collections::{HashMap, HashSet};

/// Where `link` stores a component
#[derive(Debug, Clone, Copy)]
enum Placement<'a> {
    End,
    Index(usize),
    Content,
    First,
    Second,
    Location(&'a str),
    Window,
}

impl Ui {
    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    /// Child components in iteration order; empty for non-containers
    pub fn components(&self, container: NodeId) -> Vec<NodeId> {
        self.tree
            .get(container)
            .and_then(|node| node.slots())
            .map(Slots::components)
            .unwrap_or_default()
    }

    pub fn component_count(&self, container: NodeId) -> usize {
        self.tree
            .get(container)
            .and_then(|node| node.slots())
            .map_or(0, Slots::len)
    }

    /// Position of `component` in an ordered container
    pub fn component_index(&self, container: NodeId, component: NodeId) -> Option<usize> {
        match self.slots(container).ok()? {
            Slots::Ordered { children, .. } => children.iter().position(|&c| c == component),
            _ => None,
        }
    }

    /// Component at `index` of an ordered container
    pub fn component_at(&self, container: NodeId, index: usize) -> Option<NodeId> {
        match self.slots(container).ok()? {
            Slots::Ordered { children, .. } => children.get(index).copied(),
            _ => None,
        }
    }

    /// Content of a single-slot container or of the root
    pub fn content(&self, container: NodeId) -> Option<NodeId> {
        match self.slots(container).ok()? {
            Slots::Single { content, .. } | Slots::Root { content, .. } => *content,
            _ => None,
        }
    }

    pub fn first_component(&self, split: NodeId) -> Option<NodeId> {
        match self.slots(split).ok()? {
            Slots::Split { first, .. } => *first,
            _ => None,
        }
    }

    pub fn second_component(&self, split: NodeId) -> Option<NodeId> {
        match self.slots(split).ok()? {
            Slots::Split { second, .. } => *second,
            _ => None,
        }
    }

    /// Component stored under `location` in a keyed layout
    pub fn component_at_location(&self, layout: NodeId, location: &str) -> Option<NodeId> {
        match self.slots(layout).ok()? {
            Slots::Keyed { slots } => slots.get(location).copied(),
            _ => None,
        }
    }

    /// Location of `component` in a keyed layout
    pub fn location_of(&self, layout: NodeId, component: NodeId) -> Option<&str> {
        match self.slots(layout).ok()? {
            Slots::Keyed { slots } => slots
                .iter()
                .find(|&(_, &c)| c == component)
                .map(|(location, _)| location.as_str()),
            _ => None,
        }
    }

    /// Top-level windows of the root
    pub fn windows(&self) -> Vec<NodeId> {
        match self.slots(NodeId::ROOT) {
            Ok(Slots::Root { windows, .. }) => windows.clone(),
            _ => Vec::new(),
        }
    }

    pub fn extensions(&self, target: NodeId) -> Vec<NodeId> {
        self.tree
            .get(target)
            .map(|node| node.extensions().to_vec())
            .unwrap_or_default()
    }

    fn slots(&self, container: NodeId) -> UiResult<&Slots> {
        self.tree
            .node(container)?
            .slots()
            .ok_or(UiError::unsupported(container, "not a container"))
    }

    // ------------------------------------------------------------------
    // Generic container operations
    // ------------------------------------------------------------------

    /// Add `component` in the container's natural position: the end of an
    /// ordered layout, the first free split slot, or the unnamed location
    /// of a keyed layout
    pub fn add_component(&mut self, container: NodeId, component: NodeId) -> UiResult<()> {
        match self.slots(container)? {
            Slots::Ordered { .. } => {
                self.preflight(container, component)?;
                self.link(container, component, Placement::End)
            }
            &Slots::Split { first, second, .. } => {
                if first == Some(component) || second == Some(component) {
                    return Ok(());
                }
                if first.is_none() {
                    self.set_first_component(container, Some(component))
                } else if second.is_none() {
                    self.set_second_component(container, Some(component))
                } else {
                    Err(UiError::unsupported(container, "a split panel can contain only two components"))
                }
            }
            Slots::Keyed { .. } => self.add_component_at_location(container, component, ""),
            Slots::Single { .. } | Slots::Root { .. } => Err(UiError::unsupported(
                container,
                "single-component containers are filled with set_content",
            )),
        }
    }

    pub fn add_component_as_first(&mut self, container: NodeId, component: NodeId) -> UiResult<()> {
        self.add_component_at(container, component, 0)
    }

    /// Insert into an ordered layout. Moving a component within the same
    /// layout counts the index as if it were still in its old position.
    pub fn add_component_at(&mut self, container: NodeId, component: NodeId, index: usize) -> UiResult<()> {
        let Slots::Ordered { children, .. } = self.slots(container)? else {
            return Err(UiError::unsupported(container, "only ordered layouts support indexed insertion"));
        };

        let (index, len) = match children.iter().position(|&c| c == component) {
            Some(current) if index > current => (index - 1, children.len() - 1),
            Some(_) => (index, children.len() - 1),
            None => (index, children.len()),
        };
        if index > len {
            return Err(UiError::IndexOutOfBounds { container, index, len });
        }

        self.preflight(container, component)?;
        self.link(container, component, Placement::Index(index))
    }

    /// Returns `false` when `component` is not a child of `container`
    pub fn remove_component(&mut self, container: NodeId, component: NodeId) -> UiResult<bool> {
        self.slots(container)?;
        self.unlink(container, component)
    }

    pub fn remove_all_components(&mut self, container: NodeId) -> UiResult<()> {
        for component in self.slots(container)?.components() {
            self.unlink(container, component)?;
        }
        Ok(())
    }

    /// Put `new` where `old` is. Two children of the same ordered layout
    /// swap places without being detached.
    pub fn replace_component(&mut self, container: NodeId, old: NodeId, new: NodeId) -> UiResult<()> {
        if old == new {
            return Ok(());
        }

        match self.slots(container)? {
            Slots::Ordered { children, .. } => {
                let old_index = children.iter().position(|&c| c == old);
                let new_index = children.iter().position(|&c| c == new);
                match (old_index, new_index) {
                    (None, _) => self.add_component(container, new),
                    (Some(old_index), None) => {
                        self.preflight(container, new)?;
                        self.unlink(container, old)?;
                        self.link(container, new, Placement::Index(old_index))
                    }
                    (Some(old_index), Some(new_index)) => {
                        if let Some(Slots::Ordered { children, .. }) =
                            self.tree.node_mut(container)?.slots_mut()
                        {
                            children.swap(old_index, new_index);
                        }
                        self.mark_as_dirty(container);
                        Ok(())
                    }
                }
            }
            &Slots::Split { first, second, .. } => {
                if first == Some(old) {
                    self.set_first_component(container, Some(new))
                } else if second == Some(old) {
                    self.set_second_component(container, Some(new))
                } else {
                    self.add_component(container, new)
                }
            }
            Slots::Keyed { slots } => {
                let location = slots
                    .iter()
                    .find(|&(_, &c)| c == old)
                    .map(|(location, _)| location.clone());
                match location {
                    Some(location) => self.add_component_at_location(container, new, &location),
                    None => self.add_component(container, new),
                }
            }
            &(Slots::Single { content, .. } | Slots::Root { content, .. }) => {
                if content == Some(old) {
                    self.set_content(container, Some(new))
                } else {
                    Err(UiError::unsupported(container, "the replaced component is not the content"))
                }
            }
        }
    }

    /// Move every component of `source` into `target`, in iteration order.
    /// Nothing moves unless `target` can take all of them.
    pub fn move_components_from(&mut self, target: NodeId, source: NodeId) -> UiResult<()> {
        let components = self.slots(source)?.components();
        if target == source || components.is_empty() {
            self.slots(target)?;
            return Ok(());
        }

        match self.slots(target)? {
            Slots::Ordered { .. } | Slots::Keyed { .. } => {}
            &Slots::Split { first, second, .. } => {
                let free = usize::from(first.is_none()) + usize::from(second.is_none());
                if components.len() > free {
                    return Err(UiError::unsupported(target, "a split panel can contain only two components"));
                }
            }
            Slots::Single { .. } | Slots::Root { .. } => {
                return Err(UiError::unsupported(
                    target,
                    "single-component containers are filled with set_content",
                ));
            }
        }
        for &component in &components {
            self.preflight(target, component)?;
        }
        if self.tree.is_attached(target) && !self.tree.is_attached(source) {
            self.check_identifiers(&components)?;
        }

        for component in components {
            self.add_component(target, component)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Variant specific operations
    // ------------------------------------------------------------------

    /// Set or clear the content of a single-slot container or of the root
    pub fn set_content(&mut self, container: NodeId, content: Option<NodeId>) -> UiResult<()> {
        let current = match self.slots(container)? {
            Slots::Single { content, .. } | Slots::Root { content, .. } => *content,
            _ => return Err(UiError::unsupported(container, "only single-component containers have content")),
        };
        self.replace_slot(container, current, content, Placement::Content)
    }

    pub fn set_first_component(&mut self, split: NodeId, component: Option<NodeId>) -> UiResult<()> {
        let &Slots::Split { first, .. } = self.slots(split)? else {
            return Err(UiError::unsupported(split, "not a split panel"));
        };
        self.replace_slot(split, first, component, Placement::First)
    }

    pub fn set_second_component(&mut self, split: NodeId, component: Option<NodeId>) -> UiResult<()> {
        let &Slots::Split { second, .. } = self.slots(split)? else {
            return Err(UiError::unsupported(split, "not a split panel"));
        };
        self.replace_slot(split, second, component, Placement::Second)
    }

    /// Store `component` under `location`, evicting the previous occupant
    pub fn add_component_at_location(&mut self, layout: NodeId, component: NodeId, location: &str) -> UiResult<()> {
        let Slots::Keyed { slots } = self.slots(layout)? else {
            return Err(UiError::unsupported(layout, "only custom layouts have named locations"));
        };
        let current = slots.get(location).copied();
        self.replace_slot(layout, current, Some(component), Placement::Location(location))
    }

    pub fn add_window(&mut self, window: NodeId) -> UiResult<()> {
        if !self.tree.node(window)?.is_window() {
            return Err(UiError::unsupported(window, "only windows can be added as windows"));
        }
        if self.windows().contains(&window) {
            return Ok(());
        }
        self.preflight(NodeId::ROOT, window)?;
        self.link(NodeId::ROOT, window, Placement::Window)
    }

    pub fn remove_window(&mut self, window: NodeId) -> UiResult<bool> {
        if !self.windows().contains(&window) {
            return Ok(false);
        }
        self.unlink(NodeId::ROOT, window)
    }

    /// Attach an extension to `target`. Extensions cannot move between
    /// targets.
    pub fn add_extension(&mut self, target: NodeId, extension: NodeId) -> UiResult<()> {
        if self.tree.node(target)?.is_extension() {
            return Err(UiError::unsupported(target, "extensions cannot be extended"));
        }
        let ext = self.tree.node(extension)?;
        if !ext.is_extension() {
            return Err(UiError::unsupported(extension, "not an extension"));
        }
        match ext.parent {
            Some(parent) if parent == target => return Ok(()),
            Some(_) => return Err(UiError::unsupported(extension, "an extension cannot be moved to a new target")),
            None => {}
        }
        if self.tree.is_attached(target) {
            self.check_identifiers(&[extension])?;
        }

        self.tree.node_mut(target)?.extensions.push(extension);
        self.tree.node_mut(extension)?.parent = Some(target);
        if self.tree.is_attached(target) {
            self.attach_subtree(extension)?;
        }
        self.mark_as_dirty(target);
        Ok(())
    }

    pub fn remove_extension(&mut self, target: NodeId, extension: NodeId) -> UiResult<bool> {
        if self.tree.parent(extension) != Some(target) || !self.tree.node(extension)?.is_extension() {
            return Ok(false);
        }
        if self.tree.is_attached(extension) {
            self.detach_subtree(extension)?;
        }
        self.tree.node_mut(target)?.extensions.retain(|&e| e != extension);
        self.tree.node_mut(extension)?.parent = None;
        self.mark_as_dirty(target);
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    /// Swap the occupant of a fixed slot, evicting `current` first
    fn replace_slot(
        &mut self,
        container: NodeId,
        current: Option<NodeId>,
        component: Option<NodeId>,
        placement: Placement<'_>,
    ) -> UiResult<()> {
        if current == component {
            return Ok(());
        }
        if let Some(component) = component {
            self.preflight(container, component)?;
        }
        if let Some(current) = current {
            self.unlink(container, current)?;
        }
        match component {
            Some(component) => self.link(container, component, placement),
            None => Ok(()),
        }
    }

    /// Checks that must pass before anything is modified
    fn preflight(&self, container: NodeId, component: NodeId) -> UiResult<()> {
        let node = self.tree.node(component)?;
        if component == NodeId::ROOT {
            return Err(UiError::unsupported(component, "the root cannot be added to a container"));
        }
        if node.is_extension() {
            return Err(UiError::unsupported(component, "extensions are added with add_extension"));
        }
        if self.tree.is_ancestor_or_self(component, container) {
            return Err(UiError::CyclicContainment { container, child: component });
        }
        if self.tree.is_attached(container) && !self.tree.is_attached(component) {
            self.check_identifiers(&[component])?;
        }
        Ok(())
    }

    /// Reject subtrees whose connector ids collide with registered ones or
    /// with each other
    fn check_identifiers(&self, roots: &[NodeId]) -> UiResult<()> {
        let mut seen: HashMap<&ConnectorId, NodeId> = HashMap::new();
        for node in roots.iter().flat_map(|&root| self.tree.subtree(root)) {
            let Some(id) = self.tree.get(node).and_then(|n| n.connector_id()) else {
                continue;
            };
            if let Some(registered) = self.registry.binding(id.as_str()) {
                if registered != node {
                    return Err(UiError::DuplicateIdentifier { id: id.clone(), registered, rejected: node });
                }
            }
            if let Some(registered) = seen.insert(id, node) {
                return Err(UiError::DuplicateIdentifier { id: id.clone(), registered, rejected: node });
            }
        }
        Ok(())
    }

    /// Move `component` into `container`, detaching it from its old parent
    fn link(&mut self, container: NodeId, component: NodeId, placement: Placement<'_>) -> UiResult<()> {
        if let Some(old_parent) = self.tree.parent(component) {
            self.unlink(old_parent, component)?;
        }

        let slots = self
            .tree
            .node_mut(container)?
            .slots_mut()
            .ok_or(UiError::unsupported(container, "not a container"))?;
        match (placement, slots) {
            (Placement::End, Slots::Ordered { children, .. }) => children.push(component),
            (Placement::Index(index), Slots::Ordered { children, .. }) => {
                children.insert(index.min(children.len()), component)
            }
            (Placement::Content, Slots::Single { content, .. } | Slots::Root { content, .. }) => {
                *content = Some(component)
            }
            (Placement::First, Slots::Split { first, .. }) => *first = Some(component),
            (Placement::Second, Slots::Split { second, .. }) => *second = Some(component),
            (Placement::Location(location), Slots::Keyed { slots }) => {
                slots.insert(location.to_string(), component);
            }
            (Placement::Window, Slots::Root { windows, .. }) => windows.push(component),
            _ => return Err(UiError::unsupported(container, "placement does not fit the container")),
        }
        self.tree.node_mut(component)?.parent = Some(container);

        if self.tree.is_attached(container) {
            self.attach_subtree(component)?;
        }
        tracing::debug!("Added {}", self.describe(component));
        self.events.component_attached(container, component);
        self.mark_as_dirty(container);
        Ok(())
    }

    /// Take `component` out of `container`. Returns `false` when it is not
    /// stored there.
    fn unlink(&mut self, container: NodeId, component: NodeId) -> UiResult<bool> {
        let Some(slots) = self.tree.get(container).and_then(|node| node.slots()) else {
            return Ok(false);
        };
        if self.tree.parent(component) != Some(container) || !slots.contains(component) {
            return Ok(false);
        }
        let detach_first = slots.fires_detach_before_clear();

        if self.tree.is_attached(component) {
            self.detach_subtree(component)?;
        }
        tracing::debug!("Removing {}", self.describe(component));
        if detach_first {
            self.events.component_detached(container, component);
        }

        self.tree.node_mut(component)?.parent = None;
        if let Some(slots) = self.tree.node_mut(container)?.slots_mut() {
            slots.take(component);
        }

        if !detach_first {
            self.events.component_detached(container, component);
        }
        self.mark_as_dirty(container);
        Ok(true)
    }

    /// Register and dirty a subtree that just became reachable, parents first
    pub(crate) fn attach_subtree(&mut self, node: NodeId) -> UiResult<()> {
        // Ids preassigned further down are off limits for generated ones
        let reserved: HashSet<ConnectorId> = self
            .tree
            .subtree(node)
            .into_iter()
            .filter_map(|n| self.connector_id(n).cloned())
            .collect();
        self.attach_walk(node, &reserved)
    }

    fn attach_walk(&mut self, node: NodeId, reserved: &HashSet<ConnectorId>) -> UiResult<()> {
        let id = self.ensure_connector_id(node, reserved);
        self.registry.register(&id, node)?;
        self.mark_as_dirty(node);
        self.events.attached(node);

        for child in self.tree.all_children(node) {
            self.attach_walk(child, reserved)?;
        }
        Ok(())
    }

    /// Unregister a subtree that is leaving the tree, children first
    pub(crate) fn detach_subtree(&mut self, node: NodeId) -> UiResult<()> {
        for child in self.tree.all_children(node) {
            self.detach_subtree(child)?;
        }

        self.events.detached(node);
        if let Some(id) = self.tree.get(node).and_then(|n| n.connector_id().cloned()) {
            self.registry.unregister(&id, node)?;
        }
        self.dirty.mark_clean(node);
        Ok(())
    }
}
