//! Expand/collapse state for tree nodes.
//!
//! [`OpenIds`] is an immutable snapshot of the expanded node ids, and
//! [`reduce`] computes the next snapshot for an [`OpenAction`]. [`OpenState`]
//! holds the current snapshot behind a shared lock so the same state can be
//! driven from toggle events and from an imperative handle.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeId};
use crate::query::droppable_ids;

/// Callback invoked with the full open set after every change.
pub type ChangeOpenCallback = Arc<dyn Fn(&OpenIds) + Send + Sync>;

// =============================================================================
// OpenIds
// =============================================================================

/// Snapshot of the expanded node ids.
///
/// Operations never modify a snapshot in place; they return a new one, so a
/// caller holding an older snapshot can keep it for undo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenIds(BTreeSet<NodeId>);

impl OpenIds {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the set from the host's initial-open setting.
    pub fn initial<T>(tree: &[Node<T>], initial: &InitialOpen) -> Self {
        match initial {
            InitialOpen::None => Self::new(),
            InitialOpen::All => droppable_ids(tree).into_iter().collect(),
            InitialOpen::Ids(ids) => ids.iter().copied().collect(),
        }
    }

    /// Whether `id` is expanded.
    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }

    /// Number of expanded nodes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expanded ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    /// Expanded ids as a vec, ascending.
    pub fn to_vec(&self) -> Vec<NodeId> {
        self.iter().collect()
    }

    /// A copy with `id` flipped.
    pub fn toggled(&self, id: NodeId) -> Self {
        let mut next = self.0.clone();
        if !next.remove(&id) {
            next.insert(id);
        }
        Self(next)
    }

    /// A copy with `ids` added.
    pub fn opened(&self, ids: &[NodeId]) -> Self {
        let mut next = self.0.clone();
        next.extend(ids.iter().copied());
        Self(next)
    }

    /// A copy with `ids` removed.
    pub fn closed(&self, ids: &[NodeId]) -> Self {
        let mut next = self.0.clone();
        for id in ids {
            next.remove(id);
        }
        Self(next)
    }
}

impl FromIterator<NodeId> for OpenIds {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// InitialOpen
// =============================================================================

/// How the open set is seeded when the tree is first shown.
///
/// In configuration files this is either a boolean (`true` opens every
/// droppable node) or a list of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InitialOpenRepr", into = "InitialOpenRepr")]
pub enum InitialOpen {
    /// Start fully collapsed.
    #[default]
    None,
    /// Open every droppable node.
    All,
    /// Open exactly these ids.
    Ids(Vec<NodeId>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum InitialOpenRepr {
    Flag(bool),
    Ids(Vec<NodeId>),
}

impl From<InitialOpenRepr> for InitialOpen {
    fn from(repr: InitialOpenRepr) -> Self {
        match repr {
            InitialOpenRepr::Flag(true) => Self::All,
            InitialOpenRepr::Flag(false) => Self::None,
            InitialOpenRepr::Ids(ids) => Self::Ids(ids),
        }
    }
}

impl From<InitialOpen> for InitialOpenRepr {
    fn from(initial: InitialOpen) -> Self {
        match initial {
            InitialOpen::None => Self::Flag(false),
            InitialOpen::All => Self::Flag(true),
            InitialOpen::Ids(ids) => Self::Ids(ids),
        }
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// A change to the open set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAction {
    /// Flip one id.
    Toggle(NodeId),
    /// Add ids.
    Open(Vec<NodeId>),
    /// Remove ids.
    Close(Vec<NodeId>),
    /// Open every droppable node of the current tree.
    OpenAll,
    /// Collapse everything.
    CloseAll,
}

/// Compute the open set that follows `action`.
///
/// `droppable` is the list of droppable ids in the current tree, used by
/// [`OpenAction::OpenAll`].
pub fn reduce(state: &OpenIds, action: &OpenAction, droppable: &[NodeId]) -> OpenIds {
    match action {
        OpenAction::Toggle(id) => state.toggled(*id),
        OpenAction::Open(ids) => state.opened(ids),
        OpenAction::Close(ids) => state.closed(ids),
        OpenAction::OpenAll => droppable.iter().copied().collect(),
        OpenAction::CloseAll => OpenIds::new(),
    }
}

// =============================================================================
// OpenState
// =============================================================================

#[derive(Debug, Default)]
struct OpenInner {
    /// Current snapshot.
    open: OpenIds,
    /// Droppable ids of the most recently rendered tree.
    droppable: Vec<NodeId>,
}

/// Shared holder of the current open set.
///
/// Clones share the same state, which is what lets an imperative handle live
/// outside the render pass. A poisoned lock turns every operation into a
/// no-op returning an empty snapshot.
#[derive(Debug, Clone, Default)]
pub struct OpenState {
    inner: Arc<RwLock<OpenInner>>,
    /// Set whenever a new snapshot is committed.
    dirty: Arc<AtomicBool>,
}

impl OpenState {
    /// Create state seeded from `initial` over `tree`.
    pub fn new<T>(tree: &[Node<T>], initial: &InitialOpen) -> Self {
        Self {
            inner: Arc::new(RwLock::new(OpenInner {
                open: OpenIds::initial(tree, initial),
                droppable: droppable_ids(tree),
            })),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> OpenIds {
        self.inner
            .read()
            .map(|g| g.open.clone())
            .unwrap_or_default()
    }

    /// Check if a node is expanded.
    pub fn is_open(&self, id: NodeId) -> bool {
        self.inner
            .read()
            .map(|g| g.open.contains(id))
            .unwrap_or(false)
    }

    /// Record the droppable ids of the tree being rendered.
    pub fn sync_tree<T>(&self, tree: &[Node<T>]) {
        if let Ok(mut guard) = self.inner.write() {
            guard.droppable = droppable_ids(tree);
        }
    }

    /// Apply an action, commit the result, and notify.
    ///
    /// The callback runs after the lock is released, so it may read this
    /// state again.
    pub fn dispatch(&self, action: OpenAction, notify: Option<&ChangeOpenCallback>) -> OpenIds {
        let next = {
            let Ok(mut guard) = self.inner.write() else {
                return OpenIds::new();
            };
            let next = reduce(&guard.open, &action, &guard.droppable);
            trace!("open state {:?}: {} open", action, next.len());
            guard.open = next.clone();
            next
        };
        self.dirty.store(true, Ordering::SeqCst);

        if let Some(notify) = notify {
            notify(&next);
        }
        next
    }

    /// Toggle expand/collapse for a node.
    pub fn toggle(&self, id: NodeId, notify: Option<&ChangeOpenCallback>) -> OpenIds {
        self.dispatch(OpenAction::Toggle(id), notify)
    }

    /// Expand nodes.
    pub fn open(&self, ids: &[NodeId], notify: Option<&ChangeOpenCallback>) -> OpenIds {
        self.dispatch(OpenAction::Open(ids.to_vec()), notify)
    }

    /// Collapse nodes.
    pub fn close(&self, ids: &[NodeId], notify: Option<&ChangeOpenCallback>) -> OpenIds {
        self.dispatch(OpenAction::Close(ids.to_vec()), notify)
    }

    /// Expand every droppable node.
    pub fn open_all(&self, notify: Option<&ChangeOpenCallback>) -> OpenIds {
        self.dispatch(OpenAction::OpenAll, notify)
    }

    /// Collapse all nodes.
    pub fn close_all(&self, notify: Option<&ChangeOpenCallback>) -> OpenIds {
        self.dispatch(OpenAction::CloseAll, notify)
    }

    /// Check if the open set changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
