use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceLayout;
use crate::mindmap::{Easing, GraphStore, MindMapState, Node, NodeId};

const BACKGROUND: &str = "#fafafa";
const FONT_SIZE: f64 = 14.0;
const ROOT_FONT_SIZE: f64 = 16.0;
const CHAR_WIDTH: f64 = 0.55;
const TOOLTIP_FONT_SIZE: f64 = 12.0;

/// World-space width and height of a node's box.
pub fn node_size(node: &Node) -> (f64, f64) {
	let (font, height, max) = if node.id.is_root() {
		(ROOT_FONT_SIZE, 44.0, 220.0)
	} else {
		(FONT_SIZE, 34.0, 180.0)
	};
	let text = node.label.chars().count() as f64 * font * CHAR_WIDTH;
	((text + 30.0).clamp(60.0, max), height)
}

/// Box size for hit testing; unknown ids get the smallest box.
pub fn node_extent(store: &GraphStore, id: NodeId) -> (f64, f64) {
	store.get_node(id).map(node_size).unwrap_or((60.0, 34.0))
}

pub fn render(state: &MindMapState<ForceLayout>, ctx: &CanvasRenderingContext2d) {
	let layout = &state.layout;
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, layout.width, layout.height);
	ctx.save();
	let _ = ctx.translate(layout.transform.x, layout.transform.y);
	let _ = ctx.scale(layout.transform.k, layout.transform.k);
	let positions = layout.positions();
	draw_edges(state, &positions, ctx);
	draw_nodes(state, &positions, ctx);
	draw_tooltip(state, &positions, ctx);
	ctx.restore();
	if state.is_creating() {
		draw_creating(layout, ctx);
	}
}

/// Screen-space veil while the root topic is being fetched.
fn draw_creating(layout: &ForceLayout, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
	ctx.fill_rect(0.0, 0.0, layout.width, layout.height);

	let dots = ".".repeat(1 + (layout.flow_time * 2.0) as usize % 3);
	ctx.set_fill_style_str("#2980b9");
	ctx.set_font(&format!("{}px Arial, sans-serif", ROOT_FONT_SIZE + 4.0));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(
		&format!("Noodling{dots}"),
		layout.width / 2.0,
		layout.height / 2.0,
	);
}

fn draw_edges(
	state: &MindMapState<ForceLayout>,
	positions: &HashMap<NodeId, (f64, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	let (dash, gap) = (8.0, 4.0);
	let dash_offset = -(state.layout.flow_time * 30.0) % (dash + gap);

	for edge in state.store.all_edges() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&edge.from), positions.get(&edge.to))
		else {
			continue;
		};
		if (x2 - x1).hypot(y2 - y1) < 0.001 {
			continue;
		}

		ctx.set_stroke_style_str(&edge.style.color);
		ctx.set_line_width(edge.style.width as f64);
		// Highlighted paths flow from parent to child
		if edge.style != edge.base {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
}

fn draw_nodes(
	state: &MindMapState<ForceLayout>,
	positions: &HashMap<NodeId, (f64, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	let hover = &state.layout.hover;
	let glow_node = hover.node.or(hover.prev_node);
	let mut on_top = None;

	for node in state.store.all_nodes() {
		if Some(node.id) == glow_node {
			on_top = Some(node);
			continue;
		}
		if let Some(&(x, y)) = positions.get(&node.id) {
			draw_node(node, x, y, ctx);
		}
	}

	// Hovered node last so its glow sits above its neighbours
	let Some(node) = on_top else {
		return;
	};
	let Some(&(x, y)) = positions.get(&node.id) else {
		return;
	};
	let t = Easing::EaseOutCubic.apply(hover.highlight_t);
	if t > 0.01 {
		let (w, _) = node_size(node);
		let glow_radius = w * (0.6 + 0.2 * t);
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, w * 0.2, x, y, glow_radius) {
			let alpha = 0.35 * t;
			let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 152, 0, {})", alpha));
			let _ = gradient.add_color_stop(0.6, &format!("rgba(255, 200, 120, {})", alpha * 0.3));
			let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
			ctx.begin_path();
			let _ = ctx.arc(x, y, glow_radius, 0.0, std::f64::consts::TAU);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}
	draw_node(node, x, y, ctx);
}

fn draw_node(node: &Node, x: f64, y: f64, ctx: &CanvasRenderingContext2d) {
	let (w, h) = node_size(node);
	let (left, top) = (x - w / 2.0, y - h / 2.0);

	ctx.set_shadow_color("rgba(0, 0, 0, 0.2)");
	ctx.set_shadow_blur(5.0);
	ctx.set_shadow_offset_y(2.0);
	ctx.begin_path();
	ctx.rect(left, top, w, h);
	ctx.set_fill_style_str(&node.style.background);
	ctx.fill();
	ctx.set_shadow_color("transparent");

	ctx.set_stroke_style_str(&node.style.border);
	ctx.set_line_width(node.style.border_width as f64);
	ctx.stroke();

	let size = if node.id.is_root() { ROOT_FONT_SIZE } else { FONT_SIZE };
	ctx.set_fill_style_str(&node.style.font);
	ctx.set_font(&format!("{}px Arial, sans-serif", size));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text_with_max_width(&node.label, x, y, w - 12.0);
}

fn draw_tooltip(
	state: &MindMapState<ForceLayout>,
	positions: &HashMap<NodeId, (f64, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	let hover = &state.layout.hover;
	let t = Easing::EaseOutCubic.apply(hover.highlight_t);
	if t < 0.01 {
		return;
	}
	let Some(node) = hover
		.node
		.or(hover.prev_node)
		.and_then(|id| state.store.get_node(id))
	else {
		return;
	};
	let (Some(text), Some(&(x, y))) = (&node.tooltip, positions.get(&node.id)) else {
		return;
	};

	let (_, h) = node_size(node);
	let width = text.chars().count() as f64 * TOOLTIP_FONT_SIZE * CHAR_WIDTH + 16.0;
	let (left, top) = (x - width / 2.0, y - h / 2.0 - 34.0);

	ctx.set_global_alpha(t);
	ctx.set_fill_style_str("#333333");
	ctx.begin_path();
	ctx.rect(left, top, width, 26.0);
	ctx.fill();
	ctx.set_fill_style_str("#ffffff");
	ctx.set_font(&format!("{}px Arial, sans-serif", TOOLTIP_FONT_SIZE));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(text, x, top + 13.0);
	ctx.set_global_alpha(1.0);
}
