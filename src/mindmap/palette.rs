//! Colours for nodes, edges and highlighted paths.

use super::types::{EdgeStyle, NodeStyle};

pub const ROOT_BACKGROUND: &str = "#3498db";
pub const ROOT_BORDER: &str = "#2980b9";

pub const NODE_BACKGROUND: &str = "white";
pub const NODE_BORDER: &str = "#2B7CE9";
pub const NODE_FONT: &str = "#343434";
pub const NODE_BORDER_WIDTH: u32 = 1;

pub const EDGE_COLOR: &str = "#2B7CE9";
pub const EDGE_WIDTH: u32 = 2;

/// Path to the clicked node.
pub const SELECTED_PATH: &str = "#9c27b0";
/// Path to the node under the cursor.
pub const HOVER_PATH: &str = "#ff9800";
pub const SELECTED_BACKGROUND: &str = "#f5f5f5";
pub const PATH_BORDER_WIDTH: u32 = 2;
pub const SELECTED_EDGE_WIDTH: u32 = 4;
pub const HOVER_EDGE_WIDTH: u32 = 3;

/// Accent colours for additional generations, in order.
pub struct Accent {
	pub background: &'static str,
	pub border: &'static str,
	pub font: &'static str,
}

pub const GENERATIONS: &[Accent] = &[
	Accent { background: "#FF9800", border: "#E65100", font: "white" },
	Accent { background: "#4CAF50", border: "#2E7D32", font: "white" },
	Accent { background: "#F44336", border: "#B71C1C", font: "white" },
	Accent { background: "#9C27B0", border: "#6A1B9A", font: "white" },
];

/// Accent for children tagged `additional_set` (≥ 1); clamps to the last entry.
pub fn accent(additional_set: u32) -> &'static Accent {
	let index = (additional_set.saturating_sub(1) as usize).min(GENERATIONS.len() - 1);
	&GENERATIONS[index]
}

pub fn root_style() -> NodeStyle {
	NodeStyle {
		background: ROOT_BACKGROUND.into(),
		border: ROOT_BORDER.into(),
		font: "white".into(),
		border_width: NODE_BORDER_WIDTH,
	}
}

pub fn default_style() -> NodeStyle {
	NodeStyle {
		background: NODE_BACKGROUND.into(),
		border: NODE_BORDER.into(),
		font: NODE_FONT.into(),
		border_width: NODE_BORDER_WIDTH,
	}
}

/// Base style of a child node; 0 is a first-expansion child.
pub fn generation_style(additional_set: u32) -> NodeStyle {
	if additional_set == 0 {
		return default_style();
	}
	let accent = accent(additional_set);
	NodeStyle {
		background: accent.background.into(),
		border: accent.border.into(),
		font: accent.font.into(),
		border_width: NODE_BORDER_WIDTH,
	}
}

/// Base style of the edge leading to a child tagged `additional_set`.
pub fn edge_style(additional_set: u32) -> EdgeStyle {
	let color = if additional_set == 0 {
		EDGE_COLOR
	} else {
		accent(additional_set).border
	};
	EdgeStyle {
		color: color.into(),
		width: EDGE_WIDTH,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generations_clamp_to_last_accent() {
		assert_eq!(accent(1).background, "#FF9800");
		assert_eq!(accent(4).background, "#9C27B0");
		assert_eq!(accent(9).background, "#9C27B0");
	}

	#[test]
	fn first_expansion_children_are_neutral() {
		assert_eq!(generation_style(0), default_style());
		assert_eq!(edge_style(0).color, EDGE_COLOR);
		assert_eq!(edge_style(2).color, "#2E7D32");
	}
}
