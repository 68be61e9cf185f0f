//! Root-to-node paths and their highlighting.

use std::collections::HashSet;

use super::palette;
use super::store::GraphStore;
use super::types::{NodeId, PathEntry};

/// How strongly a path is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
	/// Click selection: filled background, thick edges.
	Persistent,
	/// Hover: border tint only, thinner edges.
	Transient,
}

/// Ancestors of `id` from the root down to its parent.
///
/// Reads the path stored on the node; falls back to walking incoming edges when the
/// node carries none.
pub fn ancestry_path(store: &GraphStore, id: NodeId) -> Vec<PathEntry> {
	match store.get_node(id) {
		Some(node) if !node.context_path.is_empty() || id.is_root() => node.context_path.clone(),
		_ => walk_ancestry(store, id),
	}
}

/// Ancestors of `id` found by following incoming edges.
///
/// Stops at the first node seen twice, so a broken tree cannot loop forever.
pub fn walk_ancestry(store: &GraphStore, id: NodeId) -> Vec<PathEntry> {
	let mut visited = HashSet::from([id]);
	let mut path = Vec::new();
	let mut current = id;
	while let Some(parent) = parent_of(store, current) {
		if !visited.insert(parent) {
			log::warn!("cycle through node {parent} while walking ancestry of {id}");
			break;
		}
		let Some(node) = store.get_node(parent) else {
			break;
		};
		path.push(node.as_path_entry());
		current = parent;
	}
	path.reverse();
	path
}

fn parent_of(store: &GraphStore, id: NodeId) -> Option<NodeId> {
	store
		.connected_edge_ids(id)
		.into_iter()
		.filter_map(|edge| store.get_edge(edge))
		.find(|edge| edge.to == id)
		.map(|edge| edge.from)
}

/// Restores every non-root node and every edge to its base style.
pub fn reset_styles(store: &mut GraphStore) {
	for id in store.node_ids() {
		if id.is_root() {
			continue;
		}
		store.update_node(id, |node| node.style = node.base.clone());
	}
	for id in store.edge_ids() {
		store.update_edge(id, |edge| edge.style = edge.base.clone());
	}
}

/// Styles the nodes and edges from the root down to `id` with `color`.
pub fn highlight_path(store: &mut GraphStore, id: NodeId, color: &str, highlight: Highlight) {
	let mut path: Vec<NodeId> = ancestry_path(store, id)
		.into_iter()
		.map(|entry| entry.id)
		.collect();
	path.push(id);

	for &node_id in &path {
		if node_id.is_root() {
			continue;
		}
		store.update_node(node_id, |node| {
			node.style.border = color.to_string();
			node.style.border_width = palette::PATH_BORDER_WIDTH;
			if highlight == Highlight::Persistent {
				node.style.background = palette::SELECTED_BACKGROUND.to_string();
				node.style.font = palette::NODE_FONT.to_string();
			}
		});
	}

	let width = match highlight {
		Highlight::Persistent => palette::SELECTED_EDGE_WIDTH,
		Highlight::Transient => palette::HOVER_EDGE_WIDTH,
	};
	for pair in path.windows(2) {
		let Some(edge) = store.edge_between(pair[0], pair[1]).map(|edge| edge.id) else {
			continue;
		};
		store.update_edge(edge, |edge| {
			edge.style.color = color.to_string();
			edge.style.width = width;
		});
	}
}
