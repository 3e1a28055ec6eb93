//! Tree nodes

use crate::container::Slots;
use crate::{ConnectorId, NodeId, Size};

/// A node in the component arena: a component, a container or an extension
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent container, or the extended node for extensions
    pub(crate) parent: Option<NodeId>,
    pub(crate) data: NodeData,
    pub(crate) type_name: String,
    pub(crate) connector_id: Option<ConnectorId>,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) width: Size,
    pub(crate) height: Size,
    pub(crate) caption: Option<String>,
    pub(crate) extensions: Vec<NodeId>,
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Plain component without children
    Leaf,
    /// Component container
    Container(Slots),
    /// Extension attached to another node
    Extension,
}

impl Node {
    pub(crate) fn new(type_name: &str, data: NodeData) -> Self {
        Self {
            parent: None,
            data,
            type_name: type_name.to_string(),
            connector_id: None,
            visible: true,
            enabled: true,
            width: Size::Undefined,
            height: Size::Undefined,
            caption: None,
            extensions: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn connector_id(&self) -> Option<&ConnectorId> {
        self.connector_id.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn width(&self) -> Size {
        self.width
    }

    pub fn height(&self) -> Size {
        self.height
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn extensions(&self) -> &[NodeId] {
        &self.extensions
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Container(_))
    }

    #[inline]
    pub fn is_extension(&self) -> bool {
        matches!(self.data, NodeData::Extension)
    }

    /// Container storage if this is a container
    #[inline]
    pub fn slots(&self) -> Option<&Slots> {
        match &self.data {
            NodeData::Container(slots) => Some(slots),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn slots_mut(&mut self) -> Option<&mut Slots> {
        match &mut self.data {
            NodeData::Container(slots) => Some(slots),
            _ => None,
        }
    }

    /// Whether this node is a top-level window or a window-like container
    pub fn is_window(&self) -> bool {
        matches!(
            self.data,
            NodeData::Container(Slots::Single { kind: crate::SingleKind::Window, .. })
        )
    }

    pub fn size(&self, axis: crate::Axis) -> Size {
        match axis {
            crate::Axis::Width => self.width,
            crate::Axis::Height => self.height,
        }
    }

    /// Components followed by extensions
    pub(crate) fn all_children(&self) -> Vec<NodeId> {
        let mut children = self.slots().map(Slots::components).unwrap_or_default();
        children.extend_from_slice(&self.extensions);
        children
    }
}
