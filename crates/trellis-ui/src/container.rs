//! Container storage
//!
//! Every container variant keeps its children in its own shape of storage.
//! The tree operations in `structure.rs` honour the same attach/detach
//! contract for all of them.

use crate::NodeId;
use std::collections::HashMap;

/// Layout direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Vertical,
    Horizontal,
    /// CSS flow layout, no fixed direction
    Flow,
}

/// Single-slot container flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleKind {
    Panel,
    Window,
    /// Facade around an internally managed root; forbids generic add
    CustomComponent,
}

/// Container types that can be created through [`crate::Ui::create_container`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    VerticalLayout,
    HorizontalLayout,
    CssLayout,
    Panel,
    Window,
    CustomComponent,
    HorizontalSplitPanel,
    VerticalSplitPanel,
    CustomLayout,
}

impl ContainerKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ContainerKind::VerticalLayout => "VerticalLayout",
            ContainerKind::HorizontalLayout => "HorizontalLayout",
            ContainerKind::CssLayout => "CssLayout",
            ContainerKind::Panel => "Panel",
            ContainerKind::Window => "Window",
            ContainerKind::CustomComponent => "CustomComponent",
            ContainerKind::HorizontalSplitPanel => "HorizontalSplitPanel",
            ContainerKind::VerticalSplitPanel => "VerticalSplitPanel",
            ContainerKind::CustomLayout => "CustomLayout",
        }
    }

    pub(crate) fn empty_slots(self) -> Slots {
        match self {
            ContainerKind::VerticalLayout => Slots::ordered(Orientation::Vertical),
            ContainerKind::HorizontalLayout => Slots::ordered(Orientation::Horizontal),
            ContainerKind::CssLayout => Slots::ordered(Orientation::Flow),
            ContainerKind::Panel => Slots::single(SingleKind::Panel),
            ContainerKind::Window => Slots::single(SingleKind::Window),
            ContainerKind::CustomComponent => Slots::single(SingleKind::CustomComponent),
            ContainerKind::HorizontalSplitPanel => Slots::split(Orientation::Horizontal),
            ContainerKind::VerticalSplitPanel => Slots::split(Orientation::Vertical),
            ContainerKind::CustomLayout => Slots::Keyed { slots: HashMap::new() },
        }
    }
}

/// Child storage of a container
#[derive(Debug, Clone, PartialEq)]
pub enum Slots {
    /// Tree root: one content slot plus top-level windows
    Root {
        content: Option<NodeId>,
        windows: Vec<NodeId>,
    },
    /// Ordered list of children
    Ordered {
        orientation: Orientation,
        children: Vec<NodeId>,
    },
    /// Exactly one optional child
    Single {
        kind: SingleKind,
        content: Option<NodeId>,
    },
    /// Two fixed slots
    Split {
        orientation: Orientation,
        first: Option<NodeId>,
        second: Option<NodeId>,
    },
    /// Children keyed by location name. Iteration order is unspecified.
    Keyed { slots: HashMap<String, NodeId> },
}

impl Slots {
    pub(crate) fn root() -> Self {
        Slots::Root { content: None, windows: Vec::new() }
    }

    fn ordered(orientation: Orientation) -> Self {
        Slots::Ordered { orientation, children: Vec::new() }
    }

    fn single(kind: SingleKind) -> Self {
        Slots::Single { kind, content: None }
    }

    fn split(orientation: Orientation) -> Self {
        Slots::Split { orientation, first: None, second: None }
    }

    /// Child components in iteration order
    pub fn components(&self) -> Vec<NodeId> {
        match self {
            Slots::Root { content, windows } => content.iter().chain(windows.iter()).copied().collect(),
            Slots::Ordered { children, .. } => children.clone(),
            Slots::Single { content, .. } => content.iter().copied().collect(),
            Slots::Split { first, second, .. } => first.iter().chain(second.iter()).copied().collect(),
            Slots::Keyed { slots } => slots.values().copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Slots::Root { content, windows } => content.is_some() as usize + windows.len(),
            Slots::Ordered { children, .. } => children.len(),
            Slots::Single { content, .. } => content.is_some() as usize,
            Slots::Split { first, second, .. } => first.is_some() as usize + second.is_some() as usize,
            Slots::Keyed { slots } => slots.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, child: NodeId) -> bool {
        match self {
            Slots::Root { content, windows } => *content == Some(child) || windows.contains(&child),
            Slots::Ordered { children, .. } => children.contains(&child),
            Slots::Single { content, .. } => *content == Some(child),
            Slots::Split { first, second, .. } => *first == Some(child) || *second == Some(child),
            Slots::Keyed { slots } => slots.values().any(|&c| c == child),
        }
    }

    /// Remove `child` from storage; returns whether it was present
    pub(crate) fn take(&mut self, child: NodeId) -> bool {
        match self {
            Slots::Root { content, windows } => {
                if *content == Some(child) {
                    *content = None;
                    return true;
                }
                let before = windows.len();
                windows.retain(|&w| w != child);
                windows.len() != before
            }
            Slots::Ordered { children, .. } => match children.iter().position(|&c| c == child) {
                Some(index) => {
                    children.remove(index);
                    true
                }
                None => false,
            },
            Slots::Single { content, .. } => {
                if *content == Some(child) {
                    *content = None;
                    true
                } else {
                    false
                }
            }
            Slots::Split { first, second, .. } => {
                if *first == Some(child) {
                    *first = None;
                    true
                } else if *second == Some(child) {
                    *second = None;
                    true
                } else {
                    false
                }
            }
            Slots::Keyed { slots } => {
                let location = slots.iter().find(|&(_, &c)| c == child).map(|(k, _)| k.clone());
                match location {
                    Some(location) => slots.remove(&location).is_some(),
                    None => false,
                }
            }
        }
    }

    /// Whether the detach event fires before the slot is cleared
    pub(crate) fn fires_detach_before_clear(&self) -> bool {
        matches!(self, Slots::Split { .. })
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            Slots::Ordered { orientation, .. } | Slots::Split { orientation, .. } => Some(*orientation),
            _ => None,
        }
    }

    pub fn single_kind(&self) -> Option<SingleKind> {
        match self {
            Slots::Single { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
