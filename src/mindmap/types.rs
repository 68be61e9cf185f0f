use std::fmt;

use serde::Deserialize;

use super::palette;
use super::topic;

/// Identifier of a node. Assigned from 1 upwards per session, never reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
	/// The root of every mind map.
	pub const ROOT: NodeId = NodeId(1);

	/// Whether this is the root node.
	pub fn is_root(self) -> bool {
		self == Self::ROOT
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Identifier of a parent → child edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

/// A position in graph (world) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	/// Creates a point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// The point `distance` away from `self` in direction `angle` (radians).
	pub fn offset(self, angle: f64, distance: f64) -> Point {
		Point::new(
			self.x + distance * angle.cos(),
			self.y + distance * angle.sin(),
		)
	}
}

/// One ancestor on the way from the root to a node's parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathEntry {
	pub id: NodeId,
	/// Display label (possibly truncated).
	pub label: String,
	/// Untruncated topic, the form sent to the content source.
	pub topic: String,
}

/// Expansion state of a node. Only ever moves forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Expansion {
	#[default]
	Unexpanded,
	Expanded {
		/// Number of expansion generations fetched so far (≥ 1).
		count: u32,
	},
}

/// Fill, border and text colours of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeStyle {
	pub background: String,
	pub border: String,
	pub font: String,
	pub border_width: u32,
}

/// Stroke of an edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeStyle {
	pub color: String,
	pub width: u32,
}

/// A mind-map node.
///
/// The domain fields (`id` through `additional_set`) are fixed at creation except for
/// `expansion` and `content`. `base`, `style`, `tooltip` and `position` are presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	/// Display label, at most four words.
	pub label: String,
	pub full_topic: String,
	pub expansion: Expansion,
	/// Cached explanation, set after the first successful fetch.
	pub content: Option<String>,
	/// Ancestors from the root to this node's parent. Empty for the root.
	pub context_path: Vec<PathEntry>,
	/// 0 for first-expansion children, else the generation that produced the node.
	pub additional_set: u32,
	pub base: NodeStyle,
	pub style: NodeStyle,
	pub tooltip: Option<String>,
	/// Placement hint given to the layout engine when the node was inserted.
	pub position: Option<Point>,
}

impl Node {
	/// A fresh root node for `topic`.
	pub fn root(topic: &str) -> Self {
		Self::new(NodeId::ROOT, topic, Vec::new(), 0, palette::root_style())
	}

	/// A child of some parent, reached through `context_path`.
	pub fn child(
		id: NodeId,
		topic: &str,
		context_path: Vec<PathEntry>,
		additional_set: u32,
	) -> Self {
		Self::new(
			id,
			topic,
			context_path,
			additional_set,
			palette::generation_style(additional_set),
		)
	}

	fn new(
		id: NodeId,
		topic: &str,
		context_path: Vec<PathEntry>,
		additional_set: u32,
		base: NodeStyle,
	) -> Self {
		let display = topic::truncate(topic);
		Self {
			id,
			label: display.label,
			full_topic: topic.to_string(),
			expansion: Expansion::Unexpanded,
			content: None,
			context_path,
			additional_set,
			style: base.clone(),
			base,
			tooltip: display.tooltip,
			position: None,
		}
	}

	/// True once the node has been expanded at least once.
	pub fn is_expanded(&self) -> bool {
		matches!(self.expansion, Expansion::Expanded { .. })
	}

	/// Generations fetched so far; reads 1 while unexpanded.
	pub fn expand_count(&self) -> u32 {
		match self.expansion {
			Expansion::Unexpanded => 1,
			Expansion::Expanded { count } => count,
		}
	}

	/// The entry this node contributes to its children's context path.
	pub fn as_path_entry(&self) -> PathEntry {
		PathEntry {
			id: self.id,
			label: self.label.clone(),
			topic: self.full_topic.clone(),
		}
	}
}

/// Directed parent → child edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: EdgeId,
	pub from: NodeId,
	pub to: NodeId,
	pub base: EdgeStyle,
	pub style: EdgeStyle,
}

/// What the content source returns for a topic.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TopicContent {
	pub content: String,
	pub subtopics: Vec<String>,
}
