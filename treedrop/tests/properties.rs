//! Property tests for the move operations and the open-set reducer.

use proptest::prelude::*;
use treedrop::prelude::*;

/// Random forest of up to 12 nodes. Node `i` gets a parent among `0..i`, so
/// the input itself is always acyclic; the order is shuffled afterwards.
fn arb_tree() -> impl Strategy<Value = Vec<Node<()>>> {
    (1usize..12)
        .prop_flat_map(|n| {
            let parents: Vec<_> = (1..=n as u64).map(|id| 0..id).collect();
            (parents, prop::collection::vec(any::<bool>(), n))
        })
        .prop_map(|(parents, droppable)| {
            parents
                .into_iter()
                .zip(droppable)
                .enumerate()
                .map(|(i, (parent, droppable))| {
                    let id = i as u64 + 1;
                    let mut node = Node::<()>::leaf(id, parent, format!("n{id}"));
                    node.droppable = droppable;
                    node
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn pick(tree: &[Node<()>], sel: usize) -> NodeId {
    tree[sel % tree.len()].id
}

fn pick_target(tree: &[Node<()>], sel: usize) -> NodeId {
    let sel = sel % (tree.len() + 1);
    if sel == tree.len() {
        NodeId::ROOT
    } else {
        tree[sel].id
    }
}

fn ids_without(tree: &[Node<()>], skip: NodeId) -> Vec<NodeId> {
    tree.iter().map(|n| n.id).filter(|&id| id != skip).collect()
}

fn is_acyclic(tree: &[Node<()>]) -> bool {
    tree.iter().all(|node| {
        let mut current = node.parent;
        for _ in 0..=tree.len() {
            if current.is_root() {
                return true;
            }
            match get_tree_item(tree, current) {
                Some(parent) => current = parent.parent,
                None => return false,
            }
        }
        false
    })
}

proptest! {
    #[test]
    fn prop_mutate_tree_only_reparents_source(
        tree in arb_tree(),
        a_sel in 0usize..64,
        b_sel in 0usize..64,
    ) {
        let a = pick(&tree, a_sel);
        let b = pick_target(&tree, b_sel);
        let next = mutate_tree(&tree, a, b);

        prop_assert_eq!(next.len(), tree.len());
        for (before, after) in tree.iter().zip(&next) {
            prop_assert_eq!(before.id, after.id);
            if before.id == a {
                prop_assert_eq!(after.parent, b);
            } else {
                prop_assert_eq!(before.parent, after.parent);
            }
        }
    }

    #[test]
    fn prop_mutate_with_index_keeps_order_and_lands_at_index(
        tree in arb_tree(),
        a_sel in 0usize..64,
        b_sel in 0usize..64,
        hover in 0usize..16,
    ) {
        let a = pick(&tree, a_sel);
        let b = pick_target(&tree, b_sel);
        prop_assume!(check_move(&tree, a, b).is_ok());

        let before_children: Vec<NodeId> = children(&tree, b).iter().map(|n| n.id).collect();
        let next = mutate_tree_with_index(&tree, a, b, hover);

        prop_assert_eq!(next.len(), tree.len());
        prop_assert_eq!(ids_without(&next, a), ids_without(&tree, a));
        prop_assert_eq!(get_tree_item(&next, a).map(|n| n.parent), Some(b));

        // The gap index counts the source when it already lived under `b`.
        let mut expected = hover.min(before_children.len());
        if let Some(origin) = before_children.iter().position(|&id| id == a)
            && origin < expected
        {
            expected -= 1;
        }
        prop_assert_eq!(sibling_index(&next, a), Some(expected));
    }

    #[test]
    fn prop_checked_moves_stay_acyclic(
        tree in arb_tree(),
        a_sel in 0usize..64,
        b_sel in 0usize..64,
        hover in 0usize..16,
    ) {
        let a = pick(&tree, a_sel);
        let b = pick_target(&tree, b_sel);
        prop_assume!(check_move(&tree, a, b).is_ok());

        prop_assert!(is_acyclic(&mutate_tree(&tree, a, b)));
        prop_assert!(is_acyclic(&mutate_tree_with_index(&tree, a, b, hover)));
    }

    #[test]
    fn prop_external_drop_grows_tree(
        tree in arb_tree(),
        b_sel in 0usize..64,
    ) {
        let b = pick_target(&tree, b_sel);
        let external = Node::leaf(1000, 0, "external");
        let next = mutate_tree(&insert_external(&tree, external), NodeId(1000), b);

        prop_assert_eq!(next.len(), tree.len() + 1);
        prop_assert_eq!(get_tree_item(&next, NodeId(1000)).map(|n| n.parent), Some(b));
    }

    #[test]
    fn prop_open_and_toggle_idempotence(
        tree in arb_tree(),
        start in prop::collection::vec(1u64..12, 0..6),
        x in 1u64..12,
    ) {
        let start: OpenIds = start.into_iter().map(NodeId).collect();
        let x = NodeId(x);

        let once = start.opened(&[x]);
        prop_assert_eq!(once.opened(&[x]), once.clone());
        prop_assert_eq!(start.toggled(x).toggled(x), start.clone());

        let all = reduce(&start, &OpenAction::OpenAll, &droppable_ids(&tree));
        prop_assert!(all.iter().all(|id| get_tree_item(&tree, id).is_some_and(|n| n.droppable)));
        prop_assert_eq!(all.len(), droppable_ids(&tree).len());
    }
}
