use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::legend::Legend;
use crate::components::mind_map::{ForceLayout, MindMapCanvas, MindMapController};
use crate::components::sidebar::SidebarLog;
use crate::mindmap::{HttpContentSource, MindMapConfig, Section, Sidebar};

fn page_origin() -> String {
	web_sys::window()
		.and_then(|w| w.location().origin().ok())
		.unwrap_or_default()
}

/// Mind map page: topic input, exploration log and the canvas.
#[component]
pub fn Home() -> impl IntoView {
	let sections = RwSignal::new(Vec::<Section>::new());
	let welcome = RwSignal::new(true);
	let topic = RwSignal::new(String::new());
	let prompt = RwSignal::new(None::<String>);

	let config = MindMapConfig::for_origin(&page_origin());
	let source = HttpContentSource::new(config.endpoint.clone());
	let controller: MindMapController =
		MindMapController::new(source, ForceLayout::new(800.0, 600.0), config).with_listener(
			move |sidebar: &Sidebar| {
				sections.set(sidebar.sections().to_vec());
				welcome.set(sidebar.welcome_visible());
			},
		);

	let submit = {
		let controller = controller.clone();
		Rc::new(move || match controller.submit(&topic.get_untracked()) {
			Ok(pending) => {
				prompt.set(None);
				spawn_local(pending);
			}
			Err(err) => prompt.set(Some(err.to_string())),
		})
	};
	let submit_key = submit.clone();

	view! {
		<div class="container">
			<div class="content-wrapper">
				<div id="mindmap-container">
					<MindMapCanvas controller=controller />
					<Legend />
				</div>

				<div id="content-panel" class="content-panel">
					<div class="sidebar-header">
						<h1>"The Neural Noodler 5000"</h1>
						<p>"Plot a course through your curiosity."</p>
					</div>

					<div class="input-container">
						<input
							type="text"
							class="topic-input"
							placeholder="e.g. Studio Ghibli"
							prop:value=move || topic.get()
							on:input=move |ev| topic.set(event_target_value(&ev))
							on:keydown=move |ev| {
								if ev.key() == "Enter" {
									submit_key();
								}
							}
						/>
						<button class="submit-btn" on:click=move |_| submit()>
							"Noodle It"
						</button>
					</div>
					{move || prompt.get().map(|message| view! { <p class="input-prompt">{message}</p> })}

					<SidebarLog sections=sections welcome=welcome />
				</div>
			</div>
		</div>
	}
}
