//! Read-only lookups over a tree snapshot.
//!
//! Everything here takes `&[Node<T>]` and never allocates a new tree. Absence
//! is reported as `None`: a missing id usually means the item is external to
//! the tree or is the root sentinel, and callers decide what that implies.

use crate::node::{Node, NodeId};

/// Find a node by id.
pub fn get_tree_item<T>(tree: &[Node<T>], id: NodeId) -> Option<&Node<T>> {
    tree.iter().find(|node| node.id == id)
}

/// Sequence position of a node in the flat tree.
pub fn position<T>(tree: &[Node<T>], id: NodeId) -> Option<usize> {
    tree.iter().position(|node| node.id == id)
}

/// Direct children of `parent`, in sequence order.
pub fn children<T>(tree: &[Node<T>], parent: NodeId) -> Vec<&Node<T>> {
    tree.iter().filter(|node| node.parent == parent).collect()
}

/// Index of a node among its siblings.
pub fn sibling_index<T>(tree: &[Node<T>], id: NodeId) -> Option<usize> {
    let node = get_tree_item(tree, id)?;
    tree.iter()
        .filter(|sibling| sibling.parent == node.parent)
        .position(|sibling| sibling.id == id)
}

/// Whether `ancestor` appears on the parent chain of `id`.
///
/// A node is not its own ancestor. The walk is bounded by the tree length so
/// a snapshot that already contains a cycle cannot loop forever.
pub fn is_ancestor<T>(tree: &[Node<T>], ancestor: NodeId, id: NodeId) -> bool {
    if ancestor.is_root() {
        return !id.is_root();
    }

    let mut current = get_tree_item(tree, id).map(|node| node.parent);
    for _ in 0..tree.len() {
        match current {
            Some(parent) if parent == ancestor => return true,
            Some(parent) if !parent.is_root() => {
                current = get_tree_item(tree, parent).map(|node| node.parent);
            }
            _ => return false,
        }
    }
    false
}

/// All descendants of `id`, depth first.
pub fn descendants<T>(tree: &[Node<T>], id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![id];
    while let Some(parent) = stack.pop() {
        for child in tree.iter().filter(|node| node.parent == parent) {
            // Guard against malformed input with a cycle back to `id`.
            if child.id == id || out.contains(&child.id) {
                continue;
            }
            out.push(child.id);
            stack.push(child.id);
        }
    }
    out
}

/// Ids of every droppable node, in sequence order.
pub fn droppable_ids<T>(tree: &[Node<T>]) -> Vec<NodeId> {
    tree.iter()
        .filter(|node| node.droppable)
        .map(|node| node.id)
        .collect()
}

/// Source and destination sequence positions for an index-mode move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifiedIndex {
    /// Where the dragged node sits now (`None` for an external source).
    pub origin: Option<usize>,
    /// Where it must be reinserted once it has been removed.
    pub destination: usize,
}

/// Sequence position that corresponds to gap `hover_index` among the
/// children of `drop_target`, before anything is removed.
///
/// Hover indices past the last child clamp to "after the last child". A
/// target with no children maps to the end of the sequence.
pub fn destination_index<T>(tree: &[Node<T>], drop_target_id: NodeId, hover_index: usize) -> usize {
    let mut seen = 0;
    let mut after_last = None;
    for (pos, node) in tree.iter().enumerate() {
        if node.parent != drop_target_id {
            continue;
        }
        if seen == hover_index {
            return pos;
        }
        seen += 1;
        after_last = Some(pos + 1);
    }
    after_last.unwrap_or(tree.len())
}

/// Compute where the dragged node comes from and where it goes.
///
/// `hover_index` is the gap among the target's current children the pointer
/// was over, counted on the snapshot as it was before the drop (the dragged
/// node included when it already lives under the target). When the
/// destination lies after the origin it is shifted left by one, because
/// removing the node moves every later entry down.
pub fn get_modified_index<T>(
    tree: &[Node<T>],
    drag_source_id: NodeId,
    drop_target_id: NodeId,
    hover_index: usize,
) -> ModifiedIndex {
    let origin = position(tree, drag_source_id);
    let mut destination = destination_index(tree, drop_target_id, hover_index);
    if let Some(origin) = origin
        && destination > origin
    {
        destination -= 1;
    }
    ModifiedIndex {
        origin,
        destination,
    }
}

/// Built-in drop eligibility, used when the host has no opinion.
///
/// A drop is refused when the node lands on itself, when the target is a
/// non-droppable node or one of the source's descendants, and in sort mode
/// when the target is already the source's parent (nothing would change).
/// External sources may go onto the root or any droppable node.
pub fn is_droppable<T>(
    tree: &[Node<T>],
    drag_source_id: NodeId,
    drop_target_id: NodeId,
    sort: bool,
) -> bool {
    if drag_source_id == drop_target_id {
        return false;
    }

    if !drop_target_id.is_root() {
        match get_tree_item(tree, drop_target_id) {
            Some(target) if target.droppable => {}
            _ => return false,
        }
    }

    let Some(source) = get_tree_item(tree, drag_source_id) else {
        return true;
    };

    if sort && source.parent == drop_target_id {
        return false;
    }

    !is_ancestor(tree, drag_source_id, drop_target_id)
}
