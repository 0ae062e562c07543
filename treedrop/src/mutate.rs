//! Pure tree mutations for drag-and-drop moves.
//!
//! Every function here returns a fresh `Vec` and leaves the input snapshot
//! untouched, so a renderer still holding the old tree keeps a consistent
//! view until the host swaps in the new one.
//!
//! The mutation functions assume the move has already passed
//! [`check_move`]. They do not look for cycles themselves; the coordinator
//! runs the check before calling them.

use log::{debug, trace};

use crate::error::MoveError;
use crate::node::{Node, NodeId};
use crate::query::{ModifiedIndex, get_modified_index, get_tree_item, is_ancestor};

/// Reparent `drag_source_id` under `drop_target_id` (sort mode).
///
/// Sibling order is left alone; presentation code is expected to sort. An
/// unknown source leaves the tree unchanged.
pub fn mutate_tree<T: Clone>(
    tree: &[Node<T>],
    drag_source_id: NodeId,
    drop_target_id: NodeId,
) -> Vec<Node<T>> {
    if get_tree_item(tree, drag_source_id).is_none() {
        debug!("mutate_tree: source {} not in tree, nothing to move", drag_source_id);
        return tree.to_vec();
    }

    trace!("mutate_tree: {} -> parent {}", drag_source_id, drop_target_id);
    tree.iter()
        .map(|node| {
            if node.id == drag_source_id {
                Node {
                    parent: drop_target_id,
                    ..node.clone()
                }
            } else {
                node.clone()
            }
        })
        .collect()
}

/// Move `drag_source_id` under `drop_target_id` at gap `hover_index` among
/// the target's children (index mode).
///
/// The node is removed from its current position, reparented, and
/// reinserted at the position computed by [`get_modified_index`]. All other
/// nodes keep their relative order. An unknown source leaves the tree
/// unchanged.
pub fn mutate_tree_with_index<T: Clone>(
    tree: &[Node<T>],
    drag_source_id: NodeId,
    drop_target_id: NodeId,
    hover_index: usize,
) -> Vec<Node<T>> {
    let ModifiedIndex {
        origin,
        destination,
    } = get_modified_index(tree, drag_source_id, drop_target_id, hover_index);

    let Some(origin) = origin else {
        debug!(
            "mutate_tree_with_index: source {} not in tree, nothing to move",
            drag_source_id
        );
        return tree.to_vec();
    };

    trace!(
        "mutate_tree_with_index: {} from {} to {} under {}",
        drag_source_id, origin, destination, drop_target_id
    );

    let mut next = tree.to_vec();
    let mut moved = next.remove(origin);
    moved.parent = drop_target_id;
    let destination = destination.min(next.len());
    next.insert(destination, moved);
    next
}

/// Append a node dragged in from outside the tree.
///
/// If a node with the same id already exists the tree is returned as is.
pub fn insert_external<T: Clone>(tree: &[Node<T>], node: Node<T>) -> Vec<Node<T>> {
    let mut next = tree.to_vec();
    if get_tree_item(tree, node.id).is_none() {
        debug!("inserting external node {} under {}", node.id, node.parent);
        next.push(node);
    }
    next
}

/// Structural precondition for moving `drag_source_id` under
/// `drop_target_id`.
///
/// Rejects dropping a node onto itself or onto one of its descendants, and
/// targets that are neither the root nor in the tree. A source that is not
/// in the tree (an external drag) is accepted.
pub fn check_move<T>(
    tree: &[Node<T>],
    drag_source_id: NodeId,
    drop_target_id: NodeId,
) -> Result<(), MoveError> {
    if drag_source_id == drop_target_id {
        return Err(MoveError::OntoSelf(drag_source_id));
    }

    if !drop_target_id.is_root() && get_tree_item(tree, drop_target_id).is_none() {
        return Err(MoveError::UnknownTarget(drop_target_id));
    }

    if is_ancestor(tree, drag_source_id, drop_target_id) {
        return Err(MoveError::OntoDescendant {
            drag_source: drag_source_id,
            drop_target: drop_target_id,
        });
    }

    Ok(())
}
