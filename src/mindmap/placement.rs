//! Where new children go around their parent.
//!
//! Positions are only hints for the layout engine: a child is always created, even when no
//! spot satisfies the separation threshold.

use std::f64::consts::PI;

use super::config::PlacementConfig;
use super::types::Point;

/// Which kind of expansion produced a batch of children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Batch {
	/// First expansion: a half-turn fan.
	First,
	/// Additional expansion number `generation` (≥ 1): a full turn, rotated per generation.
	Additional { generation: u32 },
}

impl Batch {
	/// Angle of child `index` out of `count`.
	pub fn angle(self, index: usize, count: usize, config: &PlacementConfig) -> f64 {
		let step = (index + 1) as f64;
		match self {
			Batch::First => PI / (count + 1) as f64 * step,
			Batch::Additional { generation } => {
				let offset = config.generation_offset * generation.saturating_sub(1) as f64;
				(2.0 * PI / count as f64 * step + offset).rem_euclid(2.0 * PI)
			}
		}
	}
}

/// Positions for `count` children of a parent at `parent`.
///
/// `occupied` holds positions of nodes already connected to the parent; `connected` is how
/// many there are.
pub fn place_children(
	parent: Point,
	occupied: &[Point],
	connected: usize,
	count: usize,
	batch: Batch,
	config: &PlacementConfig,
) -> Vec<Point> {
	let mut taken = occupied.to_vec();
	let distance = config.base_distance + connected as f64 * config.distance_growth;
	let mut placed = Vec::with_capacity(count);

	for index in 0..count {
		let angle = batch.angle(index, count, config);
		let mut position = parent.offset(angle, distance);
		if !is_clear(position, &taken, config.min_separation) {
			for attempt in 1..=config.retry_attempts {
				position = parent.offset(angle, distance + config.retry_step * attempt as f64);
				if is_clear(position, &taken, config.min_separation) {
					break;
				}
			}
		}
		taken.push(position);
		placed.push(position);
	}
	placed
}

fn is_clear(candidate: Point, taken: &[Point], min_separation: f64) -> bool {
	taken
		.iter()
		.all(|&other| candidate.distance(other) >= min_separation)
}

/// Evenly spread positions on a ring around `center`, each radius varied a little.
///
/// The variation is derived from the index so the same map always lays out the same way.
pub fn ring(center: Point, count: usize, config: &PlacementConfig) -> Vec<Point> {
	if count == 0 {
		return Vec::new();
	}
	let step = 2.0 * PI / count as f64;
	(0..count)
		.map(|i| {
			let spread = 1.0 - config.ring_jitter + 2.0 * config.ring_jitter * rand_simple(i);
			center.offset(i as f64 * step, config.ring_radius * spread)
		})
		.collect()
}

/// Simple pseudo-random number generator in [0, 1) (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> PlacementConfig {
		PlacementConfig::default()
	}

	#[test]
	fn first_expansion_fans_over_half_turn() {
		let config = config();
		let angles: Vec<f64> = (0..4).map(|i| Batch::First.angle(i, 4, &config)).collect();
		assert!((angles[0] - PI / 5.0).abs() < 1e-9);
		assert!(angles.iter().all(|&a| a > 0.0 && a < PI));
	}

	#[test]
	fn later_generations_rotate() {
		let config = config();
		let second = Batch::Additional { generation: 1 }.angle(0, 4, &config);
		let third = Batch::Additional { generation: 2 }.angle(0, 4, &config);
		assert!((second - PI / 2.0).abs() < 1e-9);
		assert!((third - second - PI / 6.0).abs() < 1e-9);
		let far = Batch::Additional { generation: 40 }.angle(3, 4, &config);
		assert!((0.0..2.0 * PI).contains(&far));
	}

	#[test]
	fn children_start_at_base_distance() {
		let config = config();
		let parent = Point::new(10.0, -5.0);
		let placed = place_children(parent, &[], 0, 4, Batch::First, &config);
		assert_eq!(placed.len(), 4);
		assert!((placed[0].distance(parent) - 150.0).abs() < 1e-9);
		let furthest = 150.0 + config.retry_step * config.retry_attempts as f64;
		for position in &placed {
			let distance = position.distance(parent);
			assert!(distance >= 150.0 - 1e-9 && distance <= furthest + 1e-9);
		}
	}

	#[test]
	fn roomy_fans_keep_every_child_at_base_distance() {
		let config = PlacementConfig {
			min_separation: 50.0,
			..config()
		};
		let parent = Point::new(10.0, -5.0);
		for position in place_children(parent, &[], 0, 4, Batch::First, &config) {
			assert!((position.distance(parent) - 150.0).abs() < 1e-9);
		}
	}

	#[test]
	fn busy_parents_push_children_out() {
		let config = config();
		let placed = place_children(Point::default(), &[], 3, 1, Batch::First, &config);
		assert!((placed[0].distance(Point::default()) - 180.0).abs() < 1e-9);
	}

	#[test]
	fn overlaps_retry_further_out() {
		let config = config();
		let parent = Point::default();
		let blocked = parent.offset(Batch::First.angle(0, 1, &config), 150.0);
		let placed = place_children(parent, &[blocked], 1, 1, Batch::First, &config);
		let distance = placed[0].distance(parent);
		assert!(distance > 160.0);
		assert!(placed[0].distance(blocked) >= config.min_separation);
	}

	#[test]
	fn hopeless_spots_are_still_used() {
		let config = config();
		let parent = Point::default();
		let angle = Batch::First.angle(0, 1, &config);
		let wall: Vec<Point> = (0..12)
			.map(|step| parent.offset(angle, 100.0 + 40.0 * step as f64))
			.collect();
		let placed = place_children(parent, &wall, 0, 1, Batch::First, &config);
		let last = config.base_distance + config.retry_step * config.retry_attempts as f64;
		assert!((placed[0].distance(parent) - last).abs() < 1e-9);
	}

	#[test]
	fn ring_surrounds_center() {
		let config = config();
		let center = Point::new(400.0, 300.0);
		let points = ring(center, 4, &config);
		assert_eq!(points.len(), 4);
		for point in points {
			let distance = point.distance(center);
			assert!((180.0..=220.0).contains(&distance));
		}
		assert!(ring(center, 0, &config).is_empty());
	}
}
