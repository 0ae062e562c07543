//! Node records that make up a tree snapshot.

use serde::{Deserialize, Serialize};

/// Stable identifier for a tree node.
///
/// `NodeId::ROOT` is the sentinel parent of top-level nodes and never names
/// a real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The root sentinel.
    pub const ROOT: NodeId = NodeId(0);

    /// Whether this id is the root sentinel.
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A single node in a flat tree snapshot.
///
/// The hierarchy is expressed through `parent` links rather than nested
/// children, so a tree is just an ordered `Vec<Node<T>>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<T> {
    /// Unique, stable identifier.
    pub id: NodeId,
    /// Parent id, or `NodeId::ROOT` for top-level nodes.
    pub parent: NodeId,
    /// Whether other nodes may be dropped into this one.
    #[serde(default)]
    pub droppable: bool,
    /// Display text.
    pub text: String,
    /// Opaque host payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Node<T> {
    /// Create a non-droppable leaf under `parent`.
    pub fn leaf(id: u64, parent: u64, text: impl Into<String>) -> Self {
        Self {
            id: NodeId(id),
            parent: NodeId(parent),
            droppable: false,
            text: text.into(),
            data: None,
        }
    }

    /// Create a droppable container under `parent`.
    pub fn folder(id: u64, parent: u64, text: impl Into<String>) -> Self {
        Self {
            droppable: true,
            ..Self::leaf(id, parent, text)
        }
    }

    /// Attach a payload.
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether this node sits directly under the root.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_root()
    }
}
