use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::summit_graph::{DEFAULT_SCALE, DEFAULT_SOCKET_URL, SummitGraph};

/// Graph page. `?socket=` and `?scale=` override the endpoint and zoom.
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let (url, scale) = query.with_untracked(|q| {
		(
			q.get("socket").unwrap_or_else(|| DEFAULT_SOCKET_URL.to_string()),
			q.get("scale")
				.and_then(|s| s.parse::<f64>().ok())
				.filter(|s| s.is_finite() && *s > 0.0)
				.unwrap_or(DEFAULT_SCALE),
		)
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="fullscreen-graph">
				<SummitGraph url=url scale=scale />
			</div>
		</ErrorBoundary>
	}
}
