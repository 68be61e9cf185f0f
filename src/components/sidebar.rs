use leptos::prelude::*;

use crate::mindmap::{Section, SectionBody};

const WELCOME: &[&str] = &[
	"Initiate cognitive scan by entering a topic and hitting \u{201c}Noodle It.\u{201d}",
	"As the neural grid unfolds, engage any node to reveal deeper knowledge clusters.",
	"Each node expansion deploys 4 subtopics. Re-engaging an active node will retrieve 4 additional intel nodes from the mindstream.",
	"Your exploration log is displayed in this panel, tracking your most recent thought jumps at the top.",
];

fn section_view(section: Section) -> impl IntoView {
	let (class, body) = match section.body {
		SectionBody::Loading => (
			"content-section loading-section",
			view! { <div class="content-text loading-text"><p>"Loading..."</p></div> }.into_any(),
		),
		SectionBody::Paragraphs(paragraphs) => (
			"content-section",
			view! {
				<div class="content-text">
					{paragraphs.into_iter().map(|p| view! { <p>{p}</p> }).collect_view()}
				</div>
			}
			.into_any(),
		),
		SectionBody::Error(message) => (
			"content-section error-section",
			view! { <div class="content-text error-text"><p>{message}</p></div> }.into_any(),
		),
	};

	view! {
		<div class=class>
			<h3 class="content-title">{section.title}</h3>
			{body}
			<div class="content-separator"></div>
		</div>
	}
}

/// Exploration log, newest section first, with the welcome text until content arrives.
#[component]
pub fn SidebarLog(
	#[prop(into)] sections: Signal<Vec<Section>>,
	#[prop(into)] welcome: Signal<bool>,
) -> impl IntoView {
	view! {
		<div id="content-area">
			{move || sections.get().into_iter().map(section_view).collect_view()}
			{move || {
				welcome
					.get()
					.then(|| {
						view! {
							<div class="content-section initial-content">
								<h3 class="content-title">"Welcome"</h3>
								<div class="content-text">
									{WELCOME.iter().map(|line| view! { <p>{*line}</p> }).collect_view()}
								</div>
							</div>
						}
					})
			}}
		</div>
	}
}
