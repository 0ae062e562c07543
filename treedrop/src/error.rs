//! Error types for rejected moves and drops.

use thiserror::Error;

use crate::node::NodeId;

/// A move that would break the tree's structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// A node cannot become its own parent.
    #[error("node {0} cannot be dropped onto itself")]
    OntoSelf(NodeId),

    /// A node cannot be moved under one of its own descendants.
    #[error("node {drag_source} cannot be dropped onto its descendant {drop_target}")]
    OntoDescendant {
        /// The dragged node.
        drag_source: NodeId,
        /// The descendant it was dropped on.
        drop_target: NodeId,
    },

    /// The drop target is neither the root nor a node in the tree.
    #[error("drop target {0} is not in the tree")]
    UnknownTarget(NodeId),
}

/// Why a drop was not committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropError {
    /// The host's `can_drop` predicate denied the drop.
    #[error("drop of {drag_source} onto {drop_target} was vetoed")]
    Vetoed {
        /// The dragged node.
        drag_source: NodeId,
        /// The drop target.
        drop_target: NodeId,
    },

    /// The move failed the structural precondition check.
    #[error(transparent)]
    InvalidMove(#[from] MoveError),
}
