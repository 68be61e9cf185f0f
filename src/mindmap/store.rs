use std::collections::BTreeMap;

use super::types::{Edge, EdgeId, EdgeStyle, Node, NodeId};

/// The mind-map tree. Single writer; callers are trusted.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	nodes: BTreeMap<NodeId, Node>,
	edges: BTreeMap<EdgeId, Edge>,
	next_edge: u32,
}

impl GraphStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts `node`, replacing any node with the same id.
	pub fn add_node(&mut self, node: Node) {
		self.nodes.insert(node.id, node);
	}

	/// Links `from` → `to`. Adding the same link again returns the existing edge.
	pub fn add_edge(&mut self, from: NodeId, to: NodeId, base: EdgeStyle) -> EdgeId {
		if let Some(edge) = self.edge_between(from, to) {
			return edge.id;
		}
		self.next_edge += 1;
		let id = EdgeId(self.next_edge);
		self.edges.insert(
			id,
			Edge {
				id,
				from,
				to,
				style: base.clone(),
				base,
			},
		);
		id
	}

	/// Applies `update` to the node; false if it does not exist.
	pub fn update_node(&mut self, id: NodeId, update: impl FnOnce(&mut Node)) -> bool {
		match self.nodes.get_mut(&id) {
			Some(node) => {
				update(node);
				true
			}
			None => false,
		}
	}

	/// Applies `update` to the edge; false if it does not exist.
	pub fn update_edge(&mut self, id: EdgeId, update: impl FnOnce(&mut Edge)) -> bool {
		match self.edges.get_mut(&id) {
			Some(edge) => {
				update(edge);
				true
			}
			None => false,
		}
	}

	pub fn get_node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(&id)
	}

	pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.get(&id)
	}

	pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.values()
	}

	pub fn all_edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.values()
	}

	pub fn node_ids(&self) -> Vec<NodeId> {
		self.nodes.keys().copied().collect()
	}

	pub fn edge_ids(&self) -> Vec<EdgeId> {
		self.edges.keys().copied().collect()
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Nodes one edge away from `id`, in either direction.
	pub fn connected_node_ids(&self, id: NodeId) -> Vec<NodeId> {
		self.edges
			.values()
			.filter_map(|edge| {
				if edge.from == id {
					Some(edge.to)
				} else if edge.to == id {
					Some(edge.from)
				} else {
					None
				}
			})
			.collect()
	}

	/// Edges touching `id`.
	pub fn connected_edge_ids(&self, id: NodeId) -> Vec<EdgeId> {
		self.edges
			.values()
			.filter(|edge| edge.from == id || edge.to == id)
			.map(|edge| edge.id)
			.collect()
	}

	/// Children of `id`, oldest first.
	pub fn children(&self, id: NodeId) -> Vec<NodeId> {
		self.edges
			.values()
			.filter(|edge| edge.from == id)
			.map(|edge| edge.to)
			.collect()
	}

	pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
		self.edges
			.values()
			.find(|edge| edge.from == from && edge.to == to)
	}

	/// Drops every node and edge.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
		self.next_edge = 0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mindmap::palette;

	fn store_with_chain() -> GraphStore {
		let mut store = GraphStore::new();
		store.add_node(Node::root("Coffee"));
		store.add_node(Node::child(NodeId(2), "Beans", Vec::new(), 0));
		store.add_node(Node::child(NodeId(3), "Roasting", Vec::new(), 0));
		store.add_edge(NodeId(1), NodeId(2), palette::edge_style(0));
		store.add_edge(NodeId(2), NodeId(3), palette::edge_style(0));
		store
	}

	#[test]
	fn nodes_upsert_by_id() {
		let mut store = store_with_chain();
		store.add_node(Node::child(NodeId(2), "Arabica Beans", Vec::new(), 0));
		assert_eq!(store.node_count(), 3);
		assert_eq!(store.get_node(NodeId(2)).unwrap().full_topic, "Arabica Beans");
	}

	#[test]
	fn edges_are_idempotent() {
		let mut store = store_with_chain();
		let first = store.edge_between(NodeId(1), NodeId(2)).unwrap().id;
		assert_eq!(store.add_edge(NodeId(1), NodeId(2), palette::edge_style(0)), first);
		assert_eq!(store.edge_count(), 2);
	}

	#[test]
	fn connections_go_both_ways() {
		let store = store_with_chain();
		assert_eq!(store.connected_node_ids(NodeId(2)), vec![NodeId(1), NodeId(3)]);
		assert_eq!(store.connected_edge_ids(NodeId(2)).len(), 2);
		assert_eq!(store.children(NodeId(1)), vec![NodeId(2)]);
		assert!(store.connected_node_ids(NodeId(9)).is_empty());
	}

	#[test]
	fn updates_report_missing_targets() {
		let mut store = store_with_chain();
		assert!(store.update_node(NodeId(3), |node| node.content = Some("Heat".into())));
		assert!(!store.update_node(NodeId(7), |node| node.content = None));
		assert_eq!(
			store.get_node(NodeId(3)).unwrap().content.as_deref(),
			Some("Heat")
		);
		let edge = store.edge_ids()[0];
		assert!(store.update_edge(edge, |edge| edge.style.width = 4));
		assert_eq!(store.get_edge(edge).unwrap().style.width, 4);
	}

	#[test]
	fn clear_empties_everything() {
		let mut store = store_with_chain();
		store.clear();
		assert_eq!(store.node_count(), 0);
		assert_eq!(store.all_edges().count(), 0);
		assert_eq!(store.add_edge(NodeId(1), NodeId(2), palette::edge_style(0)), EdgeId(1));
	}
}
