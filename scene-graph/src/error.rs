//! Error types for structural contract violations

use crate::types::NodeId;
use thiserror::Error;

/// Errors returned by graph operations
///
/// All of these are caller contract violations; the graph is left unchanged
/// when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {0:?} does not exist in this graph")]
    NodeNotFound(NodeId),

    #[error("node {0:?} cannot be its own parent")]
    SelfParent(NodeId),

    #[error("attaching {child:?} to {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("node {child:?} is already a child of {parent:?}")]
    AlreadyChild { parent: NodeId, child: NodeId },

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("the root node {0:?} cannot be attached or removed")]
    RootNode(NodeId),

    #[error("drawable is already attached to node {0:?}")]
    DuplicateDrawable(NodeId),

    #[error("drawable is not attached to node {0:?}")]
    DrawableNotAttached(NodeId),
}

pub type Result<T> = std::result::Result<T, SceneError>;
