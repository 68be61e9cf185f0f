use super::types::{NodeId, Point};

/// Camera easing curve for viewport fits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
	Linear,
	EaseOutCubic,
	EaseOutQuint,
}

impl Easing {
	/// Maps linear progress `t` in [0, 1] onto the curve.
	pub fn apply(self, t: f64) -> f64 {
		let t = t.clamp(0.0, 1.0);
		match self {
			Easing::Linear => t,
			Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
			Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
		}
	}
}

/// How a viewport fit is animated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitOptions {
	/// Zoom scale, constant across fits.
	pub scale: f64,
	/// Animation length in seconds.
	pub duration: f64,
	pub easing: Easing,
}

/// The positioning capability the controller drives.
///
/// Implementations own on-screen positions; the controller only inserts nodes, reads
/// positions back and asks for camera moves and physics changes.
pub trait LayoutEngine {
	/// Centre of the visible area in graph coordinates.
	fn viewport_center(&self) -> Point;

	/// Adds a node, optionally at a hinted position.
	fn insert(&mut self, id: NodeId, at: Option<Point>);

	/// Adds a parent → child link.
	fn connect(&mut self, from: NodeId, to: NodeId);

	/// Current position, if the node is laid out.
	fn position(&self, id: NodeId) -> Option<Point>;

	/// Animates the camera so `ids` are centred at `options.scale`.
	fn fit(&mut self, ids: &[NodeId], options: FitOptions);

	/// Strengthens the simulation so new nodes separate, then relaxes to a gentle
	/// steady state after `hold_secs`.
	fn settle(&mut self, hold_secs: f64);

	/// Forgets every node.
	fn clear(&mut self);
}
