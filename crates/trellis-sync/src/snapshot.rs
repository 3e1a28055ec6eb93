//! Connector snapshots
//!
//! The serializable view of one dirty connector. Snapshots are captured from
//! a shared borrow of the tree, so nothing can change while they are written.

use serde::{Deserialize, Serialize};
use trellis_ui::{ConnectorId, NodeId, Ui};

/// State of one connector as sent to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSnapshot {
    pub id: ConnectorId,
    #[serde(rename = "type")]
    pub type_name: String,
    pub parent: Option<ConnectorId>,
    pub visible: bool,
    /// Effective enabled state, including ancestors
    pub enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub width: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub height: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<ConnectorId>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub extensions: Vec<ConnectorId>,
    /// The client has not seen this connector before
    pub initial: bool,
}

impl ConnectorSnapshot {
    /// Capture a registered connector; `None` if it has no id yet
    pub fn capture(ui: &Ui, node: NodeId) -> Option<Self> {
        let data = ui.node(node)?;
        let id = data.connector_id()?.clone();
        let ids = |nodes: Vec<NodeId>| -> Vec<ConnectorId> {
            nodes
                .into_iter()
                .filter_map(|n| ui.connector_id(n).cloned())
                .collect()
        };

        Some(Self {
            id,
            type_name: data.type_name().to_string(),
            parent: data.parent().and_then(|p| ui.connector_id(p).cloned()),
            visible: data.is_visible(),
            enabled: ui.is_connector_enabled(node),
            width: data.width().to_string(),
            height: data.height().to_string(),
            caption: data.caption().map(str::to_string),
            children: ids(ui.components(node)),
            extensions: ids(ui.extensions(node)),
            initial: !ui.is_client_side_initialized(node),
        })
    }
}
