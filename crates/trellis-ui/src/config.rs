//! Tree configuration

use serde::{Deserialize, Serialize};

/// Per-root settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Prepended to generated connector ids
    pub connector_id_prefix: String,
    /// Check parent/child consistency on every registry sweep
    pub verify_hierarchy: bool,
    /// On sweep, forget client state of registered connectors that are no
    /// longer visible so they are sent in full when shown again
    pub forget_hidden_state: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            connector_id_prefix: String::new(),
            verify_hierarchy: cfg!(debug_assertions),
            forget_hidden_state: true,
        }
    }
}
