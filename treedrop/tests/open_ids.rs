use std::sync::{Arc, Mutex};

use treedrop::open_ids::ChangeOpenCallback;
use treedrop::prelude::*;

fn mixed() -> Vec<Node<()>> {
    vec![
        Node::folder(1, 0, "one"),
        Node::leaf(2, 1, "two"),
        Node::folder(3, 0, "three"),
        Node::leaf(4, 3, "four"),
        Node::folder(5, 3, "five"),
    ]
}

fn set(ids: &[u64]) -> OpenIds {
    ids.iter().map(|&id| NodeId(id)).collect()
}

fn recorder() -> (ChangeOpenCallback, Arc<Mutex<Vec<OpenIds>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: ChangeOpenCallback = Arc::new(move |open: &OpenIds| {
        sink.lock().unwrap().push(open.clone());
    });
    (callback, seen)
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn test_toggle_twice_restores() {
    let start = set(&[1]);
    let once = start.toggled(NodeId(3));
    assert_eq!(once, set(&[1, 3]));
    assert_eq!(once.toggled(NodeId(3)), start);
}

#[test]
fn test_open_is_idempotent() {
    let start = OpenIds::new();
    let once = start.opened(&[NodeId(3)]);
    let twice = once.opened(&[NodeId(3)]);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);
}

#[test]
fn test_close_removes_only_given() {
    let start = set(&[1, 3, 5]);
    assert_eq!(start.closed(&[NodeId(3), NodeId(42)]), set(&[1, 5]));
}

#[test]
fn test_snapshots_are_not_mutated() {
    let before = set(&[1]);
    let _after = before.opened(&[NodeId(3)]).closed(&[NodeId(1)]);
    assert_eq!(before, set(&[1]));
}

#[test]
fn test_iter_is_sorted() {
    let open = set(&[5, 1, 3]);
    assert_eq!(open.to_vec(), vec![NodeId(1), NodeId(3), NodeId(5)]);
}

// ============================================================================
// Reducer
// ============================================================================

#[test]
fn test_reduce_open_all_uses_droppable() {
    let tree = mixed();
    let droppable = droppable_ids(&tree);
    let next = reduce(&set(&[2]), &OpenAction::OpenAll, &droppable);
    assert_eq!(next, set(&[1, 3, 5]));
}

#[test]
fn test_reduce_close_all() {
    let next = reduce(&set(&[1, 3]), &OpenAction::CloseAll, &[]);
    assert!(next.is_empty());
}

#[test]
fn test_reduce_matches_snapshot_methods() {
    let start = set(&[1]);
    assert_eq!(
        reduce(&start, &OpenAction::Toggle(NodeId(1)), &[]),
        start.toggled(NodeId(1))
    );
    assert_eq!(
        reduce(&start, &OpenAction::Open(vec![NodeId(3)]), &[]),
        start.opened(&[NodeId(3)])
    );
    assert_eq!(
        reduce(&start, &OpenAction::Close(vec![NodeId(1)]), &[]),
        start.closed(&[NodeId(1)])
    );
}

// ============================================================================
// Initial state
// ============================================================================

#[test]
fn test_initial_none() {
    assert!(OpenIds::initial(&mixed(), &InitialOpen::None).is_empty());
}

#[test]
fn test_initial_all() {
    assert_eq!(OpenIds::initial(&mixed(), &InitialOpen::All), set(&[1, 3, 5]));
}

#[test]
fn test_initial_ids() {
    let initial = InitialOpen::Ids(vec![NodeId(3)]);
    assert_eq!(OpenIds::initial(&mixed(), &initial), set(&[3]));
}

#[test]
fn test_initial_open_from_json() {
    let all: InitialOpen = serde_json::from_str("true").unwrap();
    let none: InitialOpen = serde_json::from_str("false").unwrap();
    let ids: InitialOpen = serde_json::from_str("[1, 5]").unwrap();
    assert_eq!(all, InitialOpen::All);
    assert_eq!(none, InitialOpen::None);
    assert_eq!(ids, InitialOpen::Ids(vec![NodeId(1), NodeId(5)]));
    assert_eq!(serde_json::to_string(&InitialOpen::All).unwrap(), "true");
}

// ============================================================================
// OpenState
// ============================================================================

#[test]
fn test_state_commits_and_notifies() {
    let state = OpenState::new(&mixed(), &InitialOpen::None);
    let (callback, seen) = recorder();

    state.open(&[NodeId(1)], Some(&callback));
    state.toggle(NodeId(3), Some(&callback));
    state.close(&[NodeId(1)], Some(&callback));

    assert_eq!(state.snapshot(), set(&[3]));
    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec![set(&[1]), set(&[1, 3]), set(&[3])]);
}

#[test]
fn test_state_open_all_follows_synced_tree() {
    let state = OpenState::new(&mixed(), &InitialOpen::None);
    state.sync_tree(&[Node::<()>::folder(9, 0, "nine")]);
    assert_eq!(state.open_all(None), set(&[9]));
    assert!(state.close_all(None).is_empty());
}

#[test]
fn test_state_clones_share() {
    let state = OpenState::new(&mixed(), &InitialOpen::All);
    let other = state.clone();
    other.close(&[NodeId(1)], None);
    assert!(!state.is_open(NodeId(1)));
    assert!(state.is_open(NodeId(3)));
}

#[test]
fn test_state_dirty_tracking() {
    let state = OpenState::new(&mixed(), &InitialOpen::None);
    assert!(!state.is_dirty());
    state.toggle(NodeId(1), None);
    assert!(state.is_dirty());
    state.clear_dirty();
    assert!(!state.is_dirty());
}

#[test]
fn test_state_callback_may_read_state() {
    let state = OpenState::new(&mixed(), &InitialOpen::None);
    let inner = state.clone();
    let observed = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&observed);
    let callback: ChangeOpenCallback = Arc::new(move |_open: &OpenIds| {
        *sink.lock().unwrap() = Some(inner.snapshot());
    });

    state.open(&[NodeId(5)], Some(&callback));
    assert_eq!(*observed.lock().unwrap(), Some(set(&[5])));
}
