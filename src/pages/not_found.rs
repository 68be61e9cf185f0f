use leptos::prelude::*;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Lost in the noodles"</h1>
			<p>"There is nothing at this address. "<a href="/">"Back to the map"</a></p>
		</div>
	}
}
