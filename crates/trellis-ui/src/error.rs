//! Tree and registry errors

use crate::{ConnectorId, NodeId};

/// Result type for tree operations
pub type UiResult<T> = Result<T, UiError>;

/// Errors raised by structural operations.
///
/// Every variant except [`UiError::UnsupportedStructure`],
/// [`UiError::IndexOutOfBounds`] and [`UiError::UnknownNode`] signals a
/// broken invariant and must end the current request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UiError {
    #[error("{child:?} cannot be added to {container:?}: a container cannot be added inside its own content")]
    CyclicContainment { container: NodeId, child: NodeId },

    #[error("a connector with id {id} is already registered ({registered:?}), cannot register {rejected:?}")]
    DuplicateIdentifier {
        id: ConnectorId,
        registered: NodeId,
        rejected: NodeId,
    },

    #[error("{given:?} is not the connector registered for id {id} ({registered:?})")]
    IdentityMismatch {
        id: ConnectorId,
        registered: NodeId,
        given: NodeId,
    },

    #[error("unsupported operation on {node:?}: {reason}")]
    UnsupportedStructure { node: NodeId, reason: &'static str },

    #[error("index {index} out of bounds for {container:?} with {len} components")]
    IndexOutOfBounds {
        container: NodeId,
        index: usize,
        len: usize,
    },

    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),
}

impl UiError {
    pub(crate) fn unsupported(node: NodeId, reason: &'static str) -> Self {
        Self::UnsupportedStructure { node, reason }
    }

    /// Whether the tree was left untouched and the caller may carry on
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedStructure { .. } | Self::IndexOutOfBounds { .. } | Self::UnknownNode(_)
        )
    }
}
