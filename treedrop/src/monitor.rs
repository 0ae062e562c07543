//! Read-only view of the drag-and-drop backend.

use std::sync::{Arc, RwLock};

use crate::node::Node;

/// Item types the platform backend reports for drags that did not start on
/// a tree node.
pub mod native_types {
    /// Files dragged in from the desktop.
    pub const FILE: &str = "__NATIVE_FILE__";
    /// A dragged link.
    pub const URL: &str = "__NATIVE_URL__";
    /// Dragged plain text.
    pub const TEXT: &str = "__NATIVE_TEXT__";
    /// Dragged markup.
    pub const HTML: &str = "__NATIVE_HTML__";
}

/// What the backend knows about the drag in flight.
///
/// The tree only ever reads from the monitor. Registering sources and
/// targets is the backend's business.
pub trait DragMonitor<T>: Send + Sync {
    /// The node being dragged, which may not belong to this tree.
    fn item(&self) -> Option<Node<T>>;

    /// Backend item type of the current drag, if any.
    fn item_type(&self) -> Option<String> {
        None
    }

    /// Whether the current drag carries something from outside the app.
    fn is_native(&self) -> bool {
        self.item_type()
            .is_some_and(|kind| kind.starts_with("__NATIVE_"))
    }
}

#[derive(Debug)]
struct DragSlot<T> {
    item: Option<Node<T>>,
    item_type: Option<String>,
}

/// A monitor whose drag state is set by hand.
///
/// Useful for backends that push drag updates into the tree and for tests.
/// Clones share the same slot.
#[derive(Debug)]
pub struct ManualMonitor<T> {
    slot: Arc<RwLock<DragSlot<T>>>,
}

impl<T> ManualMonitor<T> {
    /// A monitor with nothing being dragged.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(RwLock::new(DragSlot {
                item: None,
                item_type: None,
            })),
        }
    }

    /// Start dragging a node.
    pub fn begin(&self, item: Node<T>) {
        if let Ok(mut guard) = self.slot.write() {
            guard.item = Some(item);
            guard.item_type = None;
        }
    }

    /// Start a native drag of the given type.
    pub fn begin_native(&self, item_type: &str) {
        if let Ok(mut guard) = self.slot.write() {
            guard.item = None;
            guard.item_type = Some(item_type.to_string());
        }
    }

    /// End the current drag.
    pub fn end(&self) {
        if let Ok(mut guard) = self.slot.write() {
            guard.item = None;
            guard.item_type = None;
        }
    }
}

impl<T> Default for ManualMonitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ManualMonitor<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Clone + Send + Sync> DragMonitor<T> for ManualMonitor<T> {
    fn item(&self) -> Option<Node<T>> {
        self.slot.read().ok().and_then(|g| g.item.clone())
    }

    fn item_type(&self) -> Option<String> {
        self.slot.read().ok().and_then(|g| g.item_type.clone())
    }
}
