use std::f64::consts::PI;

use super::layout::{Easing, FitOptions};

/// Where the content source lives, relative to the page origin.
pub const DEFAULT_ENDPOINT: &str = "index.php";

/// Knobs of the child placement algorithm, in graph units.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementConfig {
	pub base_distance: f64,
	/// Extra distance per node already connected to the parent.
	pub distance_growth: f64,
	pub min_separation: f64,
	pub retry_step: f64,
	pub retry_attempts: u32,
	/// Rotation applied per additional generation.
	pub generation_offset: f64,
	/// Radius of the ring the root's first children are placed on.
	pub ring_radius: f64,
	/// Relative radius variation on the ring (0.1 = ±10 %).
	pub ring_jitter: f64,
}

impl Default for PlacementConfig {
	fn default() -> Self {
		Self {
			base_distance: 150.0,
			distance_growth: 10.0,
			min_separation: 100.0,
			retry_step: 50.0,
			retry_attempts: 4,
			generation_offset: PI / 6.0,
			ring_radius: 200.0,
			ring_jitter: 0.1,
		}
	}
}

/// Client configuration. Nothing here is read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct MindMapConfig {
	pub endpoint: String,
	pub fit: FitOptions,
	pub placement: PlacementConfig,
	/// Seconds of strong physics after an expansion before relaxing.
	pub settle_secs: f64,
}

impl Default for MindMapConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.to_string(),
			fit: FitOptions {
				scale: 0.8,
				duration: 1.0,
				easing: Easing::EaseOutQuint,
			},
			placement: PlacementConfig::default(),
			settle_secs: 1.0,
		}
	}
}

impl MindMapConfig {
	/// Default configuration with the endpoint resolved against `origin`.
	pub fn for_origin(origin: &str) -> Self {
		Self {
			endpoint: format!("{}/{}", origin.trim_end_matches('/'), DEFAULT_ENDPOINT),
			..Self::default()
		}
	}
}
