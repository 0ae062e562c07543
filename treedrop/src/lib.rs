//! State core for drag-and-drop tree views.
//!
//! A tree is a flat `Vec<Node<T>>` where each node names its parent. This
//! crate provides the lookups over such a snapshot ([`query`]), the pure
//! move operations ([`mutate`]), the expand/collapse state ([`open_ids`])
//! and the [`provider`] that turns drag, drop and toggle events into host
//! callbacks. Rendering and pointer tracking belong to the embedding UI.

pub mod config;
pub mod error;
pub mod monitor;
pub mod mutate;
pub mod node;
pub mod open_ids;
pub mod provider;
pub mod query;

pub use config::{TreeConfig, TreeOverrides};
pub use error::{DropError, MoveError};
pub use node::{Node, NodeId};
pub use provider::{TreeHandle, TreeProvider, TreeState};

pub mod prelude {
    pub use crate::config::{TreeConfig, TreeOverrides};
    pub use crate::error::{DropError, MoveError};
    pub use crate::monitor::{DragMonitor, ManualMonitor, native_types};
    pub use crate::mutate::{check_move, insert_external, mutate_tree, mutate_tree_with_index};
    pub use crate::node::{Node, NodeId};
    pub use crate::open_ids::{InitialOpen, OpenAction, OpenIds, OpenState, reduce};
    pub use crate::provider::{
        DropContext, DropOptions, NativeSourceDropOptions, Permission, TreeHandle, TreeProps,
        TreeProvider, TreeState,
    };
    pub use crate::query::{
        ModifiedIndex, children, descendants, droppable_ids, get_modified_index, get_tree_item,
        is_ancestor, is_droppable, sibling_index,
    };
}
