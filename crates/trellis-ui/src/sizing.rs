//! Relative size validation
//!
//! A component with a percentage size needs a parent that can give it a
//! size to be a percentage of. When a container switches between defined
//! and undefined size, the set of children that satisfy this changes and
//! those children have to be repainted.

use crate::container::{Orientation, SingleKind, Slots};
use crate::{Axis, NodeId, Size, Ui, UiResult, Unit};
use std::collections::BTreeSet;

/// A component whose relative size cannot be honoured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLayout {
    pub component: NodeId,
    pub invalid_width: bool,
    pub invalid_height: bool,
    /// Problems further down the same subtree
    pub sub_errors: Vec<InvalidLayout>,
}

impl Ui {
    pub fn width(&self, id: NodeId) -> Size {
        self.tree.get(id).map(|n| n.width).unwrap_or_default()
    }

    pub fn height(&self, id: NodeId) -> Size {
        self.tree.get(id).map(|n| n.height).unwrap_or_default()
    }

    pub fn set_width(&mut self, id: NodeId, width: Size) -> UiResult<()> {
        self.set_size_on(id, Axis::Width, width)
    }

    pub fn set_height(&mut self, id: NodeId, height: Size) -> UiResult<()> {
        self.set_size_on(id, Axis::Height, height)
    }

    pub fn set_size_full(&mut self, id: NodeId) -> UiResult<()> {
        self.set_width(id, Size::FULL)?;
        self.set_height(id, Size::FULL)
    }

    pub fn set_size_undefined(&mut self, id: NodeId) -> UiResult<()> {
        self.set_width(id, Size::Undefined)?;
        self.set_height(id, Size::Undefined)
    }

    fn set_size_on(&mut self, id: NodeId, axis: Axis, size: Size) -> UiResult<()> {
        let node = self.tree.node(id)?;
        let current = node.size(axis);
        if current == size {
            return Ok(());
        }

        // Snapshot of invalid children, and whether the change can only
        // invalidate more of them
        let mut before = None;
        let mut may_become_invalid = false;
        if node.is_container() {
            if current.is_undefined() && size.is_defined() {
                before = Some(self.invalid_sized_children(id, axis));
            } else if (size.is_undefined() && current.is_defined())
                || (size.unit() == Some(Unit::Percentage)
                    && current.unit() != Some(Unit::Percentage)
                    && !self.parent_can_define(id, axis))
            {
                may_become_invalid = true;
                before = Some(self.invalid_sized_children(id, axis));
            }
        }

        let node = self.tree.node_mut(id)?;
        match axis {
            Axis::Width => node.width = size,
            Axis::Height => node.height = size,
        }
        self.mark_as_dirty(id);

        if let Some(before) = before {
            let after = self.invalid_sized_children(id, axis);
            let changed: Vec<NodeId> = if may_become_invalid {
                after.difference(&before).copied().collect()
            } else {
                before.difference(&after).copied().collect()
            };
            for child in changed {
                tracing::debug!(
                    "{} of {} changed validity, repainting",
                    axis.name(),
                    self.describe(child)
                );
                self.mark_as_dirty_recursive(child);
            }
        }
        Ok(())
    }

    /// Direct children whose relative size along `axis` is not satisfiable
    fn invalid_sized_children(&self, container: NodeId, axis: Axis) -> BTreeSet<NodeId> {
        self.components(container)
            .into_iter()
            .filter(|&child| !self.check_size(child, axis))
            .collect()
    }

    fn has_relative_size(&self, id: NodeId, axis: Axis) -> bool {
        self.tree.get(id).is_some_and(|n| n.size(axis).is_relative())
    }

    /// Whether the relative size of `id` along `axis` can be honoured
    pub fn check_size(&self, id: NodeId, axis: Axis) -> bool {
        let Some(node) = self.tree.get(id) else {
            return true;
        };
        if !node.size(axis).is_relative() || node.is_window() || node.parent.is_none() {
            return true;
        }
        self.parent_can_define(id, axis)
    }

    /// Whether the parent of `id` gives it something to be relative to
    pub fn parent_can_define(&self, id: NodeId, axis: Axis) -> bool {
        let Some(parent_id) = self.tree.parent(id) else {
            return true;
        };
        let Some(parent) = self.tree.get(parent_id) else {
            return true;
        };
        if axis == Axis::Width && parent.is_window() {
            return true;
        }

        let parent_size = parent.size(axis);
        if parent_size.is_undefined() {
            match parent.slots() {
                Some(Slots::Single { kind: SingleKind::Window, .. }) => true,
                Some(Slots::Single { .. } | Slots::Split { .. }) => false,
                Some(Slots::Ordered { orientation, children }) => match (orientation, axis) {
                    (Orientation::Vertical, Axis::Height) | (Orientation::Horizontal, Axis::Width) => false,
                    (Orientation::Vertical, Axis::Width) | (Orientation::Horizontal, Axis::Height) => {
                        children.iter().any(|&c| !self.has_relative_size(c, axis))
                    }
                    (Orientation::Flow, _) => true,
                },
                Some(Slots::Keyed { .. } | Slots::Root { .. }) | None => true,
            }
        } else if parent_size.is_relative() {
            // Relative inside relative: whatever defines the parent defines us
            parent.parent.is_none() || self.parent_can_define(parent_id, axis)
        } else {
            true
        }
    }

    /// Every component below the root whose relative size cannot be honoured
    pub fn invalid_layouts(&self) -> Vec<InvalidLayout> {
        let mut errors = Vec::new();
        self.collect_invalid_layouts(NodeId::ROOT, &mut errors);
        errors
    }

    fn collect_invalid_layouts(&self, id: NodeId, out: &mut Vec<InvalidLayout>) {
        let invalid_width = !self.check_size(id, Axis::Width);
        let invalid_height = !self.check_size(id, Axis::Height);

        if invalid_width || invalid_height {
            let mut error = InvalidLayout {
                component: id,
                invalid_width,
                invalid_height,
                sub_errors: Vec::new(),
            };
            for child in self.components(id) {
                self.collect_invalid_layouts(child, &mut error.sub_errors);
            }
            out.push(error);
        } else {
            for child in self.components(id) {
                self.collect_invalid_layouts(child, out);
            }
        }
    }
}
