//! Browser tests for mounting and unmounting the network component.
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]
#![allow(unused_crate_dependencies)]

use coauthor_graph::components::network_graph::theme::{Color, NodeStyle};
use coauthor_graph::{GraphData, GraphLink, GraphNode, NetworkGraph, Theme};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement, MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn author(id: &str, name: &str, papers: u32) -> GraphNode {
	GraphNode {
		id: id.into(),
		name: name.into(),
		papers_count: papers,
		..Default::default()
	}
}

fn pair() -> GraphData {
	GraphData {
		nodes: vec![author("1", "Ada Lovelace", 4), author("2", "Alan Turing", 2)],
		links: vec![GraphLink {
			source: "1".into(),
			target: "2".into(),
			weight: 2.0,
		}],
	}
}

/// A lone author stays on the canvas center however many frames run.
fn loner() -> GraphData {
	GraphData {
		nodes: vec![author("1", "Ada Lovelace", 9)],
		links: vec![],
	}
}

fn document() -> Document {
	web_sys::window().and_then(|w| w.document()).expect("document")
}

fn container() -> HtmlElement {
	let document = document();
	let div = document.create_element("div").expect("div");
	document.body().expect("body").append_child(&div).expect("append");
	div.unchecked_into()
}

fn count(selector: &str) -> u32 {
	document()
		.query_selector_all(selector)
		.map_or(0, |list| list.length())
}

/// Lets effects and reactive view updates run.
async fn settle() {
	for _ in 0..4 {
		leptos::task::tick().await;
	}
}

/// Moves the mouse to canvas-local (x, y).
fn hover_canvas_at(x: f64, y: f64) {
	let canvas = document()
		.query_selector("canvas.network-graph-canvas")
		.ok()
		.flatten()
		.expect("canvas");
	let rect = canvas.get_bounding_client_rect();
	let init = MouseEventInit::new();
	init.set_bubbles(true);
	init.set_client_x((rect.left() + x).round() as i32);
	init.set_client_y((rect.top() + y).round() as i32);
	let event = MouseEvent::new_with_mouse_event_init_dict("mousemove", &init).expect("event");
	canvas.dispatch_event(&event).expect("dispatch");
}

#[wasm_bindgen_test]
async fn placeholder_without_data() {
	let parent = container();
	let handle = leptos::mount::mount_to(parent.clone(), || {
		view! { <NetworkGraph data=Signal::derive(|| None::<GraphData>) /> }
	});
	settle().await;
	assert!(parent.inner_html().contains("No network data"));
	assert_eq!(count(".network-legend"), 0);
	drop(handle);
	parent.remove();
}

#[wasm_bindgen_test]
async fn unmount_with_visible_tooltip_leaves_nothing_behind() {
	for _ in 0..10 {
		let parent = container();
		let handle = leptos::mount::mount_to(parent.clone(), || {
			let data = loner();
			view! {
				<NetworkGraph data=Signal::derive(move || Some(data.clone())) width=400.0 height=300.0 />
			}
		});
		settle().await;
		assert_eq!(count("canvas.network-graph-canvas"), 1);

		hover_canvas_at(200.0, 150.0);
		settle().await;
		assert_eq!(count(".network-tooltip"), 1);
		assert!(parent.inner_html().contains("Ada Lovelace"));

		drop(handle);
		assert_eq!(count("canvas.network-graph-canvas"), 0);
		assert_eq!(count(".network-tooltip"), 0);
		settle().await;
		assert_eq!(count(".network-tooltip"), 0);
		parent.remove();
	}
}

#[wasm_bindgen_test]
async fn data_change_hides_tooltip() {
	let parent = container();
	let data = RwSignal::new(Some(loner()));
	let handle = leptos::mount::mount_to(parent.clone(), move || {
		view! { <NetworkGraph data=data width=400.0 height=300.0 /> }
	});
	settle().await;
	hover_canvas_at(200.0, 150.0);
	settle().await;
	assert_eq!(count(".network-tooltip"), 1);

	data.set(Some(pair()));
	settle().await;
	assert_eq!(count(".network-tooltip"), 0);
	drop(handle);
	parent.remove();
}

#[wasm_bindgen_test]
async fn legend_uses_theme_colors() {
	let parent = container();
	let theme = Theme {
		node: NodeStyle {
			fill: Color::rgb(1, 2, 3),
			key_person_fill: Color::rgb(4, 5, 6),
			..Theme::default().node
		},
		..Theme::default()
	};
	let handle = leptos::mount::mount_to(parent.clone(), move || {
		let data = pair();
		view! {
			<NetworkGraph data=Signal::derive(move || Some(data.clone())) width=400.0 theme=theme.clone() />
		}
	});
	settle().await;
	let html = parent.inner_html();
	assert!(html.contains("#010203"));
	assert!(html.contains("#040506"));
	drop(handle);
	parent.remove();
}
