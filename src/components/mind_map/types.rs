use crate::mindmap::{Easing, NodeId};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	fn lerp(self, to: ViewTransform, t: f64) -> ViewTransform {
		ViewTransform {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

/// An animated camera move.
#[derive(Clone, Debug)]
pub struct CameraTween {
	pub from: ViewTransform,
	pub to: ViewTransform,
	pub elapsed: f64,
	pub duration: f64,
	pub easing: Easing,
}

impl CameraTween {
	/// Advances by `dt` seconds; returns the transform to show and whether the move is done.
	pub fn step(&mut self, dt: f64) -> (ViewTransform, bool) {
		self.elapsed += dt;
		if self.duration <= 0.0 || self.elapsed >= self.duration {
			return (self.to, true);
		}
		let t = self.easing.apply(self.elapsed / self.duration);
		(self.from.lerp(self.to, t), false)
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<NodeId>,
	/// Set once the pointer moved far enough that releasing is not a click.
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Node under the cursor, with a fade used for its tooltip.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<NodeId>,
	pub highlight_t: f64,
	pub prev_node: Option<NodeId>,
}

/// Strength of the physics simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Physics {
	#[default]
	Gentle,
	/// Strong forces until `remaining` seconds have passed.
	Settling { remaining: f64 },
}
