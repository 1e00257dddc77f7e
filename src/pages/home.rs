use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::force_graph::ForceGraphCanvas;
use crate::graph::sample::demo_network;
use crate::graph::summary::quick_summary;
use crate::graph::{GraphData, shell_org_candidates};
use crate::provider::{StaticProvider, fetch_or_empty};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = RwSignal::new(GraphData::default());

	spawn_local(async move {
		let provider = StaticProvider::new(demo_network());
		graph_data.set(fetch_or_empty(&provider).await);
	});

	let summary = move || graph_data.with(quick_summary);
	let shells = move || {
		graph_data.with(|graph| {
			shell_org_candidates(graph)
				.into_iter()
				.map(|node| node.name.clone())
				.collect::<Vec<_>>()
		})
	};

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
				<ForceGraphCanvas data=graph_data fullscreen=true />
				<div class="graph-overlay">
					<h1>"Money Trail"</h1>
					<p class="subtitle">{summary}</p>
					<p class="subtitle">
						"Drag nodes to pin them. Double-click to re-run the layout. Scroll to zoom."
					</p>
					<Show when=move || !shells().is_empty()>
						<h2>"Possible shell organizations"</h2>
						<ul class="shell-list">
							{move || {
								shells()
									.into_iter()
									.map(|name| view! { <li>{name}</li> })
									.collect_view()
							}}
						</ul>
					</Show>
				</div>
			</div>
		</ErrorBoundary>
	}
}
