//! Reorder Example
//!
//! A host that owns a small file tree and drives it through a provider:
//! - Reorders siblings in index mode
//! - Drops an external file into a folder
//! - Shows a vetoed drop and a rejected cycle
//! - Expands folders through the imperative handle

use std::fs::File;
use std::sync::{Arc, Mutex};

use log::LevelFilter;
use simplelog::{Config, WriteLogger};
use treedrop::prelude::*;

#[derive(Clone, Debug)]
struct FileMeta {
    size: u64,
}

type Store = Arc<Mutex<Vec<Node<FileMeta>>>>;

fn sample() -> Vec<Node<FileMeta>> {
    vec![
        Node::folder(1, 0, "src"),
        Node::leaf(2, 1, "main.rs").with_data(FileMeta { size: 1200 }),
        Node::leaf(3, 1, "lib.rs").with_data(FileMeta { size: 5400 }),
        Node::folder(4, 0, "docs"),
        Node::leaf(5, 4, "guide.md").with_data(FileMeta { size: 800 }),
        Node::leaf(6, 0, "Cargo.toml").with_data(FileMeta { size: 300 }),
    ]
}

// =============================================================================
// Presentation
// =============================================================================

fn print_level(tree: &[Node<FileMeta>], open: &OpenIds, parent: NodeId, depth: usize) {
    for node in children(tree, parent) {
        let icon = if node.droppable {
            if open.contains(node.id) { "▼ " } else { "▶ " }
        } else {
            "  "
        };
        let size = node
            .data
            .as_ref()
            .map(|meta| format!(" ({} B)", meta.size))
            .unwrap_or_default();
        println!("{}{}{}{}", "  ".repeat(depth), icon, node.text, size);
        if open.contains(node.id) {
            print_level(tree, open, node.id, depth + 1);
        }
    }
}

fn show(title: &str, store: &Store, provider: &TreeProvider<FileMeta>) {
    let tree = store.lock().map(|t| t.clone()).unwrap_or_default();
    let state = provider.render(&tree);
    println!("-- {} --", title);
    print_level(state.tree, &state.open_ids, NodeId::ROOT, 0);
    println!();
}

// =============================================================================
// Main
// =============================================================================

fn main() {
    // Initialize file logging
    if let Ok(log_file) = File::create("reorder.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let store: Store = Arc::new(Mutex::new(sample()));
    let commit = Arc::clone(&store);

    let props = TreeProps::new(move |tree, options: DropOptions<FileMeta>| {
        log::info!(
            "host commit: {} -> {} at {:?}",
            options.drag_source_id,
            options.drop_target_id,
            options.relative_index
        );
        if let Ok(mut guard) = commit.lock() {
            *guard = tree;
        }
    })
    .can_drop(|_, context| {
        // Keep the manifest at the top level
        Some(!(context.drag_source_id == NodeId(6) && !context.drop_target_id.is_root()))
    })
    .on_change_open(|open| log::info!("open set: {:?}", open.to_vec()))
    .overrides(TreeOverrides::new().sort(false).initial_open(InitialOpen::All));

    let monitor = Arc::new(ManualMonitor::<FileMeta>::new());
    let tree = sample();
    let provider = TreeProvider::new(props, monitor.clone(), &tree);
    let handle = provider.handle();

    show("initial", &store, &provider);

    // lib.rs before main.rs
    let tree = store.lock().map(|t| t.clone()).unwrap_or_default();
    let dragged = tree[2].clone();
    monitor.begin(dragged.clone());
    if let Err(e) = provider.render(&tree).on_drop(dragged, NodeId(1), 0) {
        eprintln!("drop failed: {}", e);
    }
    monitor.end();
    show("lib.rs moved first", &store, &provider);

    // A file from outside the tree
    let tree = store.lock().map(|t| t.clone()).unwrap_or_default();
    let external = Node::leaf(7, 0, "notes.txt").with_data(FileMeta { size: 42 });
    if let Err(e) = provider.render(&tree).on_drop(external, NodeId(4), 1) {
        eprintln!("drop failed: {}", e);
    }
    show("notes.txt dropped into docs", &store, &provider);

    // Vetoed by the host and rejected as a cycle
    let tree = store.lock().map(|t| t.clone()).unwrap_or_default();
    let state = provider.render(&tree);
    for (source, target) in [(NodeId(6), NodeId(1)), (NodeId(1), NodeId(1))] {
        if let Some(node) = get_tree_item(&tree, source) {
            match state.on_drop(node.clone(), target, 0) {
                Ok(_) => println!("{} -> {}: committed", source, target),
                Err(e) => println!("{} -> {}: {}", source, target, e),
            }
        }
    }
    println!();

    handle.close(&[NodeId(1)]);
    show("src collapsed", &store, &provider);

    handle.close_all();
    handle.open_all();
    show("everything open again", &store, &provider);
}
