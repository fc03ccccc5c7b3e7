//! coauthor-graph: Interactive co-authorship network for literature reviews.
//!
//! This crate provides a WASM-based component that renders a collaboration
//! network with a cooling force layout, node dragging, pan/zoom and hover
//! tooltips, plus a small host page that feeds it data embedded in the DOM.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::network_graph::{
	GraphData, GraphLink, GraphNode, NetworkGraph, NetworkPayload, Simulation, SimulationConfig,
	Theme,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("coauthor-graph: logging initialized");
}

/// Text content of `<script id="...">`, if present.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Parses network JSON, either bare `{ nodes, links }` or the API's
/// `{ success, network }` envelope.
pub fn parse_network(json_text: &str) -> Option<GraphData> {
	match serde_json::from_str::<NetworkPayload>(json_text) {
		Ok(payload) => {
			let data = payload.into_graph();
			match &data {
				Some(data) => info!(
					"coauthor-graph: loaded {} authors, {} collaborations",
					data.nodes.len(),
					data.links.len()
				),
				None => warn!("coauthor-graph: network payload reported failure"),
			}
			data
		}
		Err(e) => {
			warn!("coauthor-graph: failed to parse network data: {}", e);
			None
		}
	}
}

/// Parses a (possibly partial) physics override; unknown input keeps defaults
/// and cooling parameters that would never settle are reset.
pub fn parse_config(json_text: &str) -> SimulationConfig {
	serde_json::from_str::<SimulationConfig>(json_text)
		.map(SimulationConfig::validated)
		.unwrap_or_else(|e| {
			warn!("coauthor-graph: ignoring invalid graph config: {}", e);
			SimulationConfig::default()
		})
}

/// Load the network from a script element with id="graph-data".
fn load_graph_data() -> Option<GraphData> {
	parse_network(&script_text("graph-data")?)
}

/// Load layout overrides from a script element with id="graph-config".
fn load_config() -> SimulationConfig {
	script_text("graph-config")
		.map(|text| parse_config(&text))
		.unwrap_or_default()
}

/// Main application component.
/// Loads the network from the DOM and renders the summary, graph and details.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data();
	let config = load_config();
	let selected = RwSignal::new(None::<String>);

	let summary = graph_data.as_ref().map(|data| {
		let s = data.summary();
		let most_active = s
			.most_active_author
			.map(|n| format!("{} ({} papers)", n.name, n.papers_count))
			.unwrap_or_else(|| "-".into());
		view! {
			<div class="network-summary">
				<span>{format!("{} authors", s.total_authors)}</span>
				<span>{format!("{} collaborations", s.total_collaborations)}</span>
				<span>{format!("{} key people", s.key_people_count)}</span>
				<span>{format!("Most active: {most_active}")}</span>
			</div>
		}
	});

	let key_people = graph_data.as_ref().map(|data| {
		data.key_people()
			.into_iter()
			.map(|n| {
				let id = n.id.clone();
				view! {
					<li on:click=move |_| selected.set(Some(id.clone()))>
						{n.name.clone()}
						<span class="papers">{format!(" {} papers", n.papers_count)}</span>
						<span class="influence">{format!(" influence {}", n.influence_label())}</span>
					</li>
				}
			})
			.collect_view()
	});

	let lookup = graph_data.clone().unwrap_or_default();
	let details = move || {
		let id = selected.get()?;
		let node = lookup.node(&id)?.clone();
		Some(view! {
			<div class="author-details">
				<h2>{node.name.clone()}</h2>
				{node.institution.clone().map(|inst| view! { <p class="institution">{inst}</p> })}
				<p>{format!("Papers: {}", node.papers_count)}</p>
				<p>{format!("Citations: {}", node.citations)}</p>
				<p>{format!("First author: {}", node.first_author_count)}</p>
				<p>{format!("Influence score: {}", node.influence_label())}</p>
				<button on:click=move |_| selected.set(None)>"Close"</button>
			</div>
		})
	};

	let graph_signal = Signal::derive(move || graph_data.clone());
	let on_node_click = Callback::new(move |id: String| selected.set(Some(id)));

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Co-authorship Network" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="network-page">
			<h1>"Co-authorship Network"</h1>
			<p class="subtitle">"Click an author for details. Drag to reposition. Scroll to zoom. Drag background to pan."</p>
			{summary}
			<NetworkGraph data=graph_signal on_node_click=on_node_click config=config />
			{details}
			<section class="key-people">
				<h2>"Key people"</h2>
				<ul>{key_people}</ul>
			</section>
		</main>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_enveloped_and_bare_networks() {
		let bare = r#"{"nodes": [{"id": 1, "name": "Ada Lovelace"}], "links": []}"#;
		let env = r#"{"success": true, "network": {"nodes": [{"id": "a"}], "links": []}}"#;
		assert_eq!(parse_network(bare).map(|d| d.nodes.len()), Some(1));
		assert_eq!(parse_network(env).map(|d| d.nodes[0].id.clone()), Some("a".into()));
	}

	#[test]
	fn failed_or_malformed_network_is_no_data() {
		assert!(parse_network(r#"{"success": false, "network": {"nodes": []}}"#).is_none());
		assert!(parse_network("not json").is_none());
	}

	#[test]
	fn partial_config_keeps_defaults() {
		let cfg = parse_config(r#"{"link_distance": 60}"#);
		assert_eq!(cfg.link_distance, 60.0);
		assert_eq!(cfg.charge_strength, SimulationConfig::default().charge_strength);
		assert_eq!(parse_config("[]"), SimulationConfig::default());
	}

	#[test]
	fn never_settling_config_is_reset() {
		let cfg = parse_config(r#"{"alpha_decay": 0, "alpha_min": 0, "link_distance": 80}"#);
		let defaults = SimulationConfig::default();
		assert_eq!(cfg.alpha_decay, defaults.alpha_decay);
		assert_eq!(cfg.alpha_min, defaults.alpha_min);
		assert_eq!(cfg.link_distance, 80.0);
	}
}
