//! The Neural Noodler 5000: an interactive mind map grown one topic at a time.
//!
//! [`mindmap`] holds the DOM-free core; the Leptos components draw it on a canvas.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
pub mod mindmap;
mod pages;

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// The mind map page plus a 404 fallback.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="The Neural Noodler 5000" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
