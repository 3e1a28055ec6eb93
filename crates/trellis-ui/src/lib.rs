//! Trellis UI - server-side component tree
//!
//! Arena-based component tree with connector identity, dirty tracking
//! and relative-size validation.
//!
//! # Overview
//! A [`Ui`] owns one tree. Nodes are created detached and become *attached*
//! once their ancestor chain reaches [`NodeId::ROOT`]. Attaching assigns a
//! [`ConnectorId`], registers the node in the [`ConnectorRegistry`] and
//! marks it dirty; detaching unregisters it. The flush layer drains
//! [`Ui::dirty_connectors`] once per request cycle.
//!
//! ```rust,ignore
//! use trellis_ui::{ContainerKind, NodeId, Ui};
//!
//! let mut ui = Ui::new();
//! let layout = ui.create_container(ContainerKind::VerticalLayout);
//! let label = ui.create_component("Label");
//! ui.set_content(NodeId::ROOT, Some(layout))?;
//! ui.add_component(layout, label)?;
//! assert!(ui.connector_id(label).is_some());
//! ```

mod config;
mod container;
mod dirty;
mod error;
mod events;
mod node;
mod registry;
mod size;
mod sizing;
mod structure;
mod tree;
mod ui;

pub use config::UiConfig;
pub use container::{ContainerKind, Orientation, SingleKind, Slots};
pub use dirty::DirtyTracker;
pub use error::{UiError, UiResult};
pub use events::{
    AttachEvent, ComponentAttachEvent, ComponentDetachEvent, DetachEvent, ListenerId,
    MarkedDirtyEvent,
};
pub use node::{Node, NodeData};
pub use registry::{ConnectorRegistry, Registration, SweepReport};
pub use size::{Axis, Size, SizeParseError, Unit};
pub use sizing::InvalidLayout;
pub use tree::ComponentTree;
pub use ui::{HierarchyIssue, Ui};

use std::fmt;

/// Node identifier (index into the component arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The root node of every [`Ui`]
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable connector identifier, unique within one [`Ui`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ConnectorId(String);

impl ConnectorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::borrow::Borrow<str> for ConnectorId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
