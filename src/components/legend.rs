use leptos::prelude::*;

use crate::mindmap::palette::{GENERATIONS, HOVER_PATH, SELECTED_PATH};

const ORDINALS: &[&str] = &["1st", "2nd", "3rd", "4th"];

fn legend_item(color: &'static str, label: String) -> impl IntoView {
	view! {
		<div class="legend-item">
			<span class="legend-color" style:background-color=color></span>
			<span class="legend-label">{label}</span>
		</div>
	}
}

/// Key for the path and generation colours, drawn over the canvas.
#[component]
pub fn Legend() -> impl IntoView {
	let generations = GENERATIONS
		.iter()
		.zip(ORDINALS)
		.map(|(accent, ordinal)| legend_item(accent.background, format!("{ordinal} Expansion")))
		.collect_view();

	view! {
		<div class="legend">
			{legend_item(SELECTED_PATH, "Current Path".to_string())}
			{legend_item(HOVER_PATH, "Hover Path".to_string())}
			{generations}
		</div>
	}
}
