use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{CameraTween, DragState, HoverState, PanState, Physics, ViewTransform};
use crate::mindmap::{FitOptions, LayoutEngine, NodeId, Point};

/// Extra world-space margin around a node box that still counts as a hit.
pub const HIT_PADDING: f64 = 4.0;
/// Screen pixels the pointer may travel before a press becomes a drag.
const DRAG_THRESHOLD: f64 = 4.0;
const NODE_MASS: f32 = 10.0;
/// Distance from the parent for nodes inserted without a hint.
const DROP_DISTANCE: f32 = 60.0;
const HOVER_FADE_SPEED: f64 = 6.0;

/// Steady-state forces.
fn gentle() -> SimulationParameters {
	SimulationParameters {
		force_charge: 3000.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

/// Forces used right after an expansion so new nodes push apart quickly.
fn settling() -> SimulationParameters {
	SimulationParameters {
		force_charge: 6000.0,
		force_spring: 0.08,
		force_max: 280.0,
		node_speed: 7000.0,
		damping_factor: 0.95,
	}
}

/// [`LayoutEngine`] backed by a `force_graph` simulation, plus the canvas camera.
pub struct ForceLayout {
	pub graph: ForceGraph<NodeId, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	camera: Option<CameraTween>,
	physics: Physics,
	indices: HashMap<NodeId, DefaultNodeIdx>,
	/// Inserted without a position; dropped next to their parent on connect.
	unplaced: HashSet<NodeId>,
}

impl ForceLayout {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: ForceGraph::new(gentle()),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			camera: None,
			physics: Physics::Gentle,
			indices: HashMap::new(),
			unplaced: HashSet::new(),
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose box, sized by `extent`, contains the screen point.
	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		extent: impl Fn(NodeId) -> (f64, f64),
	) -> Option<NodeId> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let id = node.data.user_data;
			let (w, h) = extent(id);
			let (dx, dy) = ((node.x() as f64 - gx).abs(), (node.y() as f64 - gy).abs());
			if dx <= w / 2.0 + HIT_PADDING && dy <= h / 2.0 + HIT_PADDING {
				found = Some(id);
			}
		});
		found
	}

	/// Positions of every laid-out node.
	pub fn positions(&self) -> HashMap<NodeId, (f64, f64)> {
		let mut positions = HashMap::with_capacity(self.indices.len());
		self.graph.visit_nodes(|node| {
			positions.insert(node.data.user_data, (node.x() as f64, node.y() as f64));
		});
		positions
	}

	fn move_node(&mut self, id: NodeId, x: f32, y: f32, anchor: bool) {
		let Some(&idx) = self.indices.get(&id) else {
			return;
		};
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = anchor;
			}
		});
	}

	/// Sets the hovered node; returns whether it changed.
	pub fn set_hover(&mut self, node: Option<NodeId>) -> bool {
		if self.hover.node == node {
			return false;
		}
		// Keep the old node for the fade-out
		if self.hover.node.is_some() && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
		} else {
			self.hover.prev_node = None;
			self.hover.highlight_t = 0.0;
		}
		self.hover.node = node;
		true
	}

	pub fn begin_drag(&mut self, id: NodeId, sx: f64, sy: f64) {
		let Some(position) = self.position(id) else {
			return;
		};
		self.camera = None;
		self.drag = DragState {
			active: true,
			node: Some(id),
			moved: false,
			start_x: sx,
			start_y: sy,
			node_start_x: position.x as f32,
			node_start_y: position.y as f32,
		};
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.camera = None;
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Follows the pointer while dragging a node or panning.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if !self.drag.moved && dx.hypot(dy) < DRAG_THRESHOLD {
				return;
			}
			self.drag.moved = true;
			let Some(id) = self.drag.node else {
				return;
			};
			let (nx, ny) = (
				self.drag.node_start_x + (dx / self.transform.k) as f32,
				self.drag.node_start_y + (dy / self.transform.k) as f32,
			);
			self.move_node(id, nx, ny, true);
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	/// Ends any drag or pan. Returns the node if the press was a click.
	pub fn end_drag(&mut self) -> Option<NodeId> {
		let clicked = if self.drag.active && !self.drag.moved {
			self.drag.node
		} else {
			None
		};
		self.drag = DragState::default();
		self.pan.active = false;
		clicked
	}

	/// Zooms by `factor` around the screen point.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.camera = None;
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f32) {
		if self.animation_running {
			self.graph.update(dt);
		}
		self.flow_time += dt as f64;

		if let Physics::Settling { remaining } = self.physics {
			let remaining = remaining - dt as f64;
			if remaining <= 0.0 {
				self.graph.parameters = gentle();
				self.physics = Physics::Gentle;
			} else {
				self.physics = Physics::Settling { remaining };
			}
		}

		if let Some(camera) = self.camera.as_mut() {
			let (transform, done) = camera.step(dt as f64);
			self.transform = transform;
			if done {
				self.camera = None;
			}
		}

		let target = if self.hover.node.is_some() { 1.0 } else { 0.0 };
		self.hover.highlight_t += (target - self.hover.highlight_t) * HOVER_FADE_SPEED * dt as f64;
		if self.hover.node.is_none() && self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
			self.hover.prev_node = None;
		}
	}

	/// Adopts a new canvas size, keeping the graph centre in view.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

impl LayoutEngine for ForceLayout {
	fn viewport_center(&self) -> Point {
		let (x, y) = self.screen_to_graph(self.width / 2.0, self.height / 2.0);
		Point::new(x, y)
	}

	fn insert(&mut self, id: NodeId, at: Option<Point>) {
		if self.indices.contains_key(&id) {
			return;
		}
		let position = at.unwrap_or_else(|| {
			self.unplaced.insert(id);
			self.viewport_center()
		});
		let idx = self.graph.add_node(NodeData {
			x: position.x as f32,
			y: position.y as f32,
			mass: NODE_MASS,
			is_anchor: false,
			user_data: id,
		});
		self.indices.insert(id, idx);
	}

	fn connect(&mut self, from: NodeId, to: NodeId) {
		let (Some(&src), Some(&tgt)) = (self.indices.get(&from), self.indices.get(&to)) else {
			return;
		};
		self.graph.add_edge(src, tgt, EdgeData::default());

		if self.unplaced.remove(&to) {
			if let Some(parent) = self.position(from) {
				// Spread siblings around the parent by id so they don't start stacked
				let angle = to.0 as f32 * 2.4;
				let (x, y) = (
					parent.x as f32 + DROP_DISTANCE * angle.cos(),
					parent.y as f32 + DROP_DISTANCE * angle.sin(),
				);
				self.move_node(to, x, y, false);
			}
		}
	}

	fn position(&self, id: NodeId) -> Option<Point> {
		let idx = *self.indices.get(&id)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(Point::new(node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	fn fit(&mut self, ids: &[NodeId], options: FitOptions) {
		let points: Vec<Point> = ids.iter().filter_map(|&id| self.position(id)).collect();
		if points.is_empty() {
			return;
		}
		let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
		let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
		for p in &points {
			min_x = min_x.min(p.x);
			min_y = min_y.min(p.y);
			max_x = max_x.max(p.x);
			max_y = max_y.max(p.y);
		}
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		let k = options.scale;
		self.camera = Some(CameraTween {
			from: self.transform,
			to: ViewTransform {
				x: self.width / 2.0 - cx * k,
				y: self.height / 2.0 - cy * k,
				k,
			},
			elapsed: 0.0,
			duration: options.duration,
			easing: options.easing,
		});
	}

	fn settle(&mut self, hold_secs: f64) {
		self.graph.parameters = settling();
		self.physics = Physics::Settling {
			remaining: hold_secs,
		};
	}

	fn clear(&mut self) {
		self.graph = ForceGraph::new(gentle());
		self.indices.clear();
		self.unplaced.clear();
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover = HoverState::default();
		self.physics = Physics::Gentle;
		self.camera = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mindmap::Easing;

	const FIT: FitOptions = FitOptions {
		scale: 0.8,
		duration: 1.0,
		easing: Easing::EaseOutQuint,
	};

	fn layout() -> ForceLayout {
		ForceLayout::new(800.0, 600.0)
	}

	#[test]
	fn inserted_nodes_report_positions() {
		let mut layout = layout();
		assert_eq!(layout.viewport_center(), Point::new(0.0, 0.0));
		layout.insert(NodeId(1), Some(Point::new(10.0, 20.0)));
		assert_eq!(layout.position(NodeId(1)), Some(Point::new(10.0, 20.0)));
		assert_eq!(layout.position(NodeId(2)), None);
		layout.insert(NodeId(1), Some(Point::new(99.0, 99.0)));
		assert_eq!(layout.positions().len(), 1);
	}

	#[test]
	fn unplaced_children_drop_next_to_parent() {
		let mut layout = layout();
		layout.insert(NodeId(1), Some(Point::new(300.0, 300.0)));
		layout.insert(NodeId(2), None);
		layout.connect(NodeId(1), NodeId(2));
		let child = layout.position(NodeId(2)).unwrap();
		let distance = child.distance(Point::new(300.0, 300.0));
		assert!((distance - DROP_DISTANCE as f64).abs() < 0.01);
	}

	#[test]
	fn fit_centres_the_nodes_at_constant_scale() {
		let mut layout = layout();
		layout.insert(NodeId(1), Some(Point::new(100.0, 0.0)));
		layout.insert(NodeId(2), Some(Point::new(300.0, 200.0)));
		layout.animation_running = false;
		layout.fit(&[NodeId(1), NodeId(2)], FIT);
		assert!(layout.camera.is_some());
		for _ in 0..80 {
			layout.tick(0.016);
		}
		assert!(layout.camera.is_none());
		assert_eq!(layout.transform.k, 0.8);
		assert!((layout.transform.x - (400.0 - 200.0 * 0.8)).abs() < 1e-9);
		assert!((layout.transform.y - (300.0 - 100.0 * 0.8)).abs() < 1e-9);
	}

	#[test]
	fn settling_relaxes_after_hold() {
		let mut layout = layout();
		layout.settle(0.1);
		assert!(matches!(layout.physics, Physics::Settling { .. }));
		layout.tick(0.05);
		assert!(matches!(layout.physics, Physics::Settling { .. }));
		layout.tick(0.06);
		assert_eq!(layout.physics, Physics::Gentle);
	}

	#[test]
	fn clicks_and_drags_are_told_apart() {
		let mut layout = layout();
		layout.animation_running = false;
		layout.insert(NodeId(1), Some(Point::new(0.0, 0.0)));
		let extent = |_| (100.0, 30.0);
		assert_eq!(layout.node_at_position(420.0, 305.0, extent), Some(NodeId(1)));
		assert_eq!(layout.node_at_position(600.0, 305.0, extent), None);

		layout.begin_drag(NodeId(1), 400.0, 300.0);
		layout.drag_to(401.0, 301.0);
		assert_eq!(layout.end_drag(), Some(NodeId(1)));

		layout.begin_drag(NodeId(1), 400.0, 300.0);
		layout.drag_to(450.0, 300.0);
		assert_eq!(layout.end_drag(), None);
		assert_eq!(layout.position(NodeId(1)), Some(Point::new(50.0, 0.0)));
	}

	#[test]
	fn hover_changes_are_reported_once() {
		let mut layout = layout();
		assert!(layout.set_hover(Some(NodeId(3))));
		assert!(!layout.set_hover(Some(NodeId(3))));
		assert!(layout.set_hover(None));
		assert_eq!(layout.hover.prev_node, Some(NodeId(3)));
	}

	#[test]
	fn clear_forgets_everything() {
		let mut layout = layout();
		layout.insert(NodeId(1), None);
		layout.settle(1.0);
		layout.clear();
		assert_eq!(layout.position(NodeId(1)), None);
		assert_eq!(layout.physics, Physics::Gentle);
	}
}
