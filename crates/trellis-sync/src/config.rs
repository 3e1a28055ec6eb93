//! Flush configuration

use serde::{Deserialize, Serialize};

/// Flush settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlushConfig {
    /// Also write dirty connectors the client cannot see
    pub include_invisible: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
}
