//! Coordinator between the drag-and-drop backend, the tree mutations and the
//! expand state.
//!
//! The host owns the tree. Each render it hands the current snapshot to
//! [`TreeProvider::render`] and gets back a [`TreeState`] that presentation
//! code reads and calls into. A drop never changes the snapshot in place:
//! the provider computes the next tree and passes it to the host's
//! `on_drop`, and the host supplies it on the next render.
//!
//! # Example
//!
//! ```ignore
//! let monitor = Arc::new(ManualMonitor::new());
//! let props = TreeProps::new(|tree, options| store.commit(tree, options))
//!     .overrides(TreeOverrides::new().sort(false));
//! let provider = TreeProvider::new(props, monitor.clone(), &tree);
//! let handle = provider.handle();
//!
//! let state = provider.render(&tree);
//! state.on_drop(node, NodeId(3), 0)?;
//! handle.open_all();
//! ```

use std::sync::{Arc, RwLock};

use log::{debug, warn};

use crate::config::{TreeConfig, TreeOverrides};
use crate::error::DropError;
use crate::monitor::DragMonitor;
use crate::mutate::{check_move, insert_external, mutate_tree, mutate_tree_with_index};
use crate::node::{Node, NodeId};
use crate::open_ids::{ChangeOpenCallback, OpenIds, OpenState};
use crate::query::{destination_index, get_modified_index, get_tree_item, is_droppable};

/// Host commit callback: receives the next tree and what happened.
pub type DropCallback<T> = Arc<dyn Fn(Vec<Node<T>>, DropOptions<T>) + Send + Sync>;

/// Host handler for drops that did not start on a tree node.
pub type NativeDropCallback<T> =
    Arc<dyn Fn(&dyn DragMonitor<T>, NativeSourceDropOptions<T>) + Send + Sync>;

/// Host drop predicate. `None` means no opinion.
pub type CanDropCallback<T> = Arc<dyn Fn(&[Node<T>], &DropContext<T>) -> Option<bool> + Send + Sync>;

/// Host drag predicate over the resolved node.
pub type CanDragCallback<T> = Arc<dyn Fn(Option<&Node<T>>) -> bool + Send + Sync>;

// =============================================================================
// Payloads
// =============================================================================

/// Describes a committed drop. Built fresh for every drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DropOptions<T> {
    /// Id of the dragged node.
    pub drag_source_id: NodeId,
    /// Id of the node (or root) it was dropped on.
    pub drop_target_id: NodeId,
    /// The dragged node as it was before the drop.
    pub drag_source: Option<Node<T>>,
    /// The target node, `None` for the root.
    pub drop_target: Option<Node<T>>,
    /// Sequence position the node was reinserted at. Index mode only.
    pub destination_index: Option<usize>,
    /// Gap among the target's children the node was dropped into. Index
    /// mode only.
    pub relative_index: Option<usize>,
}

/// Describes a drop whose source came from outside the app.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeSourceDropOptions<T> {
    /// Id of the node (or root) it was dropped on.
    pub drop_target_id: NodeId,
    /// The target node, `None` for the root.
    pub drop_target: Option<Node<T>>,
    /// Sequence position a node created from the drop should go to. Index
    /// mode only.
    pub destination_index: Option<usize>,
    /// Gap among the target's children. Index mode only.
    pub relative_index: Option<usize>,
}

/// What the host's `can_drop` predicate gets to look at.
#[derive(Debug, Clone, PartialEq)]
pub struct DropContext<T> {
    pub drag_source_id: NodeId,
    pub drop_target_id: NodeId,
    /// The item the backend is dragging, possibly external.
    pub drag_source: Option<Node<T>>,
    pub drop_target: Option<Node<T>>,
}

/// Outcome of a host predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    Allow,
    Deny,
    /// The host gave no predicate or no opinion.
    #[default]
    Unspecified,
}

impl Permission {
    /// Whether the operation may go ahead. `Unspecified` allows.
    pub fn is_allowed(self) -> bool {
        !matches!(self, Self::Deny)
    }

    /// The host's answer, if it gave one.
    pub fn as_option(self) -> Option<bool> {
        match self {
            Self::Allow => Some(true),
            Self::Deny => Some(false),
            Self::Unspecified => None,
        }
    }
}

impl From<bool> for Permission {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

impl From<Option<bool>> for Permission {
    fn from(answer: Option<bool>) -> Self {
        answer.map_or(Self::Unspecified, Self::from)
    }
}

// =============================================================================
// TreeProps
// =============================================================================

/// Everything the host supplies besides the tree itself.
pub struct TreeProps<T> {
    pub on_drop: DropCallback<T>,
    pub on_native_source_drop: Option<NativeDropCallback<T>>,
    pub can_drop: Option<CanDropCallback<T>>,
    pub can_drag: Option<CanDragCallback<T>>,
    pub on_change_open: Option<ChangeOpenCallback>,
    pub overrides: TreeOverrides,
}

impl<T> TreeProps<T> {
    /// Props with only the required commit callback.
    pub fn new(on_drop: impl Fn(Vec<Node<T>>, DropOptions<T>) + Send + Sync + 'static) -> Self {
        Self {
            on_drop: Arc::new(on_drop),
            on_native_source_drop: None,
            can_drop: None,
            can_drag: None,
            on_change_open: None,
            overrides: TreeOverrides::default(),
        }
    }

    /// Handle drops from outside the app.
    pub fn on_native_source_drop(
        mut self,
        handler: impl Fn(&dyn DragMonitor<T>, NativeSourceDropOptions<T>) + Send + Sync + 'static,
    ) -> Self {
        self.on_native_source_drop = Some(Arc::new(handler));
        self
    }

    /// Gate drops.
    pub fn can_drop(
        mut self,
        predicate: impl Fn(&[Node<T>], &DropContext<T>) -> Option<bool> + Send + Sync + 'static,
    ) -> Self {
        self.can_drop = Some(Arc::new(predicate));
        self
    }

    /// Gate drags.
    pub fn can_drag(
        mut self,
        predicate: impl Fn(Option<&Node<T>>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.can_drag = Some(Arc::new(predicate));
        self
    }

    /// Be told about every change to the open set.
    pub fn on_change_open(mut self, callback: impl Fn(&OpenIds) + Send + Sync + 'static) -> Self {
        self.on_change_open = Some(Arc::new(callback));
        self
    }

    /// Configuration overrides.
    pub fn overrides(mut self, overrides: TreeOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

impl<T> std::fmt::Debug for TreeProps<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeProps")
            .field("on_native_source_drop", &self.on_native_source_drop.is_some())
            .field("can_drop", &self.can_drop.is_some())
            .field("can_drag", &self.can_drag.is_some())
            .field("on_change_open", &self.on_change_open.is_some())
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TreeProvider
// =============================================================================

type SharedNotify = Arc<RwLock<Option<ChangeOpenCallback>>>;

fn current_notify(notify: &SharedNotify) -> Option<ChangeOpenCallback> {
    notify.read().ok().and_then(|g| g.clone())
}

/// Long-lived coordinator for one tree view.
pub struct TreeProvider<T> {
    props: TreeProps<T>,
    config: TreeConfig,
    monitor: Arc<dyn DragMonitor<T>>,
    open: OpenState,
    notify: SharedNotify,
}

impl<T: Clone + Send + Sync + 'static> TreeProvider<T> {
    /// Create a provider and seed the expand state from `tree`.
    pub fn new(props: TreeProps<T>, monitor: Arc<dyn DragMonitor<T>>, tree: &[Node<T>]) -> Self {
        let config = props.overrides.clone().resolve();
        let open = OpenState::new(tree, &config.initial_open);
        let notify = Arc::new(RwLock::new(props.on_change_open.clone()));
        debug!(
            "TreeProvider created: {} nodes, sort={}, {} open",
            tree.len(),
            config.sort,
            open.snapshot().len()
        );
        Self {
            props,
            config,
            monitor,
            open,
            notify,
        }
    }

    /// Replace the host props. The expand state is kept; `initial_open` only
    /// applies at construction.
    pub fn set_props(&mut self, props: TreeProps<T>) {
        self.config = props.overrides.clone().resolve();
        if let Ok(mut guard) = self.notify.write() {
            *guard = props.on_change_open.clone();
        }
        self.props = props;
    }

    /// Resolved configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Current open set.
    pub fn open_ids(&self) -> OpenIds {
        self.open.snapshot()
    }

    /// Imperative handle for driving the expand state from outside a render.
    pub fn handle(&self) -> TreeHandle {
        TreeHandle {
            open: self.open.clone(),
            notify: Arc::clone(&self.notify),
        }
    }

    /// Compose the state for one render pass over `tree`.
    pub fn render<'a>(&'a self, tree: &'a [Node<T>]) -> TreeState<'a, T> {
        self.open.sync_tree(tree);
        TreeState {
            config: &self.config,
            tree,
            open_ids: self.open.snapshot(),
            props: &self.props,
            monitor: self.monitor.as_ref(),
            open: &self.open,
            notify: &self.notify,
        }
    }
}

impl<T> std::fmt::Debug for TreeProvider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeProvider")
            .field("props", &self.props)
            .field("config", &self.config)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TreeState
// =============================================================================

/// Configuration and callbacks for one render pass.
pub struct TreeState<'a, T> {
    /// Resolved configuration.
    pub config: &'a TreeConfig,
    /// The snapshot being rendered.
    pub tree: &'a [Node<T>],
    /// Open set at the start of this render.
    pub open_ids: OpenIds,
    props: &'a TreeProps<T>,
    monitor: &'a dyn DragMonitor<T>,
    open: &'a OpenState,
    notify: &'a SharedNotify,
}

impl<T: Clone + Send + Sync + 'static> TreeState<'_, T> {
    /// Handle a drop of `drag_source` onto `drop_target_id` at gap
    /// `hover_index` among the target's children.
    ///
    /// The host's `can_drop` is asked first; a denial stops the drop before
    /// anything is computed. The move then has to pass [`check_move`]. On
    /// success the next tree goes to the host's `on_drop` and the same
    /// options are returned.
    pub fn on_drop(
        &self,
        drag_source: Node<T>,
        drop_target_id: NodeId,
        hover_index: usize,
    ) -> Result<DropOptions<T>, DropError> {
        let drag_source_id = drag_source.id;
        let drop_target = get_tree_item(self.tree, drop_target_id).cloned();

        let context = DropContext {
            drag_source_id,
            drop_target_id,
            drag_source: Some(drag_source.clone()),
            drop_target: drop_target.clone(),
        };
        if self.ask_can_drop(&context) == Permission::Deny {
            debug!("drop of {} onto {} vetoed by host", drag_source_id, drop_target_id);
            return Err(DropError::Vetoed {
                drag_source: drag_source_id,
                drop_target: drop_target_id,
            });
        }

        if let Err(e) = check_move(self.tree, drag_source_id, drop_target_id) {
            warn!("rejected drop: {}", e);
            return Err(e.into());
        }

        let mut options = DropOptions {
            drag_source_id,
            drop_target_id,
            drag_source: Some(drag_source.clone()),
            drop_target,
            destination_index: None,
            relative_index: None,
        };

        // A source missing from the tree was dragged in from elsewhere.
        let tree = insert_external(self.tree, drag_source);

        let next = if self.config.sort {
            mutate_tree(&tree, drag_source_id, drop_target_id)
        } else {
            let index = get_modified_index(&tree, drag_source_id, drop_target_id, hover_index);
            options.destination_index = Some(index.destination);
            options.relative_index = Some(hover_index);
            mutate_tree_with_index(&tree, drag_source_id, drop_target_id, hover_index)
        };

        debug!(
            "drop committed: {} -> {} ({} nodes)",
            drag_source_id,
            drop_target_id,
            next.len()
        );
        (self.props.on_drop)(next, options.clone());
        Ok(options)
    }

    /// Handle a drop whose source is not a tree node.
    ///
    /// Returns false, doing nothing, when the host has no handler. Indices
    /// are only computed when sort mode is off.
    pub fn on_native_source_drop(&self, drop_target_id: NodeId, hover_index: usize) -> bool {
        let Some(handler) = &self.props.on_native_source_drop else {
            return false;
        };

        let mut options = NativeSourceDropOptions {
            drop_target_id,
            drop_target: get_tree_item(self.tree, drop_target_id).cloned(),
            destination_index: None,
            relative_index: None,
        };
        if !self.config.sort {
            options.destination_index =
                Some(destination_index(self.tree, drop_target_id, hover_index));
            options.relative_index = Some(hover_index);
        }

        debug!("native drop onto {}", drop_target_id);
        handler(self.monitor, options);
        true
    }

    /// Ask the host whether the current drag may land on `drop_target_id`.
    ///
    /// The source is resolved through the monitor because it may not be in
    /// this tree. `Unspecified` when the host has no predicate.
    pub fn can_drop(&self, drag_source_id: NodeId, drop_target_id: NodeId) -> Permission {
        let context = DropContext {
            drag_source_id,
            drop_target_id,
            drag_source: self.monitor.item(),
            drop_target: get_tree_item(self.tree, drop_target_id).cloned(),
        };
        self.ask_can_drop(&context)
    }

    /// Hover feedback: the host's answer, or the built-in rules when it has
    /// none. A host `Allow` still cannot let a node onto its own subtree.
    pub fn accepts_drop(&self, drag_source_id: NodeId, drop_target_id: NodeId) -> bool {
        match self.can_drop(drag_source_id, drop_target_id) {
            Permission::Deny => false,
            Permission::Allow => check_move(self.tree, drag_source_id, drop_target_id).is_ok(),
            Permission::Unspecified => {
                is_droppable(self.tree, drag_source_id, drop_target_id, self.config.sort)
            }
        }
    }

    fn ask_can_drop(&self, context: &DropContext<T>) -> Permission {
        match &self.props.can_drop {
            Some(predicate) => Permission::from(predicate(self.tree, context)),
            None => Permission::Unspecified,
        }
    }

    /// Ask the host whether `id` may be dragged.
    pub fn can_drag(&self, id: NodeId) -> Permission {
        match &self.props.can_drag {
            Some(predicate) => Permission::from(predicate(get_tree_item(self.tree, id))),
            None => Permission::Unspecified,
        }
    }

    /// Flip the expand state of `id` and notify the host.
    pub fn on_toggle(&self, id: NodeId) -> OpenIds {
        let notify = current_notify(self.notify);
        self.open.toggle(id, notify.as_ref())
    }

    /// Whether `id` was open at the start of this render.
    pub fn is_open(&self, id: NodeId) -> bool {
        self.open_ids.contains(id)
    }
}

impl<T> std::fmt::Debug for TreeState<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeState")
            .field("config", self.config)
            .field("nodes", &self.tree.len())
            .field("open_ids", &self.open_ids)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TreeHandle
// =============================================================================

/// Imperative control over the expand state.
///
/// Obtained from [`TreeProvider::handle`]; clones share state with the
/// provider and stay valid across renders. Every call notifies the host's
/// `on_change_open`.
#[derive(Clone)]
pub struct TreeHandle {
    open: OpenState,
    notify: SharedNotify,
}

impl TreeHandle {
    /// Expand nodes.
    pub fn open(&self, ids: &[NodeId]) -> OpenIds {
        self.open.open(ids, current_notify(&self.notify).as_ref())
    }

    /// Collapse nodes.
    pub fn close(&self, ids: &[NodeId]) -> OpenIds {
        self.open.close(ids, current_notify(&self.notify).as_ref())
    }

    /// Expand every droppable node of the last rendered tree.
    pub fn open_all(&self) -> OpenIds {
        self.open.open_all(current_notify(&self.notify).as_ref())
    }

    /// Collapse everything.
    pub fn close_all(&self) -> OpenIds {
        self.open.close_all(current_notify(&self.notify).as_ref())
    }

    /// Current open set.
    pub fn open_ids(&self) -> OpenIds {
        self.open.snapshot()
    }
}

impl std::fmt::Debug for TreeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeHandle")
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}
