//! Leptos component wrapping the network graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, clicking, panning and zooming. An animation loop
//! runs via `requestAnimationFrame` while the layout is cooling or a hover is
//! easing, and sleeps otherwise; pointer events wake it.
//!
//! Every mount (and every new `data` value) owns exactly one [`Engine`].
//! Tearing it down cancels the pending frame, drops the loop closure and the
//! graph state, and hides the tooltip.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::error::GraphError;
use super::render;
use super::simulation::SimulationConfig;
use super::state::{HoverChange, NetworkGraphState, PointerOutcome};
use super::theme::{Color, Theme};
use super::tooltip::Tooltip;
use super::types::GraphData;

const DEFAULT_WIDTH: f64 = 800.0;
/// Upper bound on the frame delta fed to hover easing, in seconds.
const MAX_FRAME_DT: f64 = 0.1;

/// Graph state plus the frame loop driving it.
#[derive(Default)]
struct Engine {
	state: RefCell<Option<NetworkGraphState>>,
	animate: RefCell<Option<Closure<dyn FnMut()>>>,
	frame_id: Cell<Option<i32>>,
	last_frame: Cell<Option<f64>>,
}

impl Engine {
	fn teardown(&self) {
		if let Some(id) = self.frame_id.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		self.animate.borrow_mut().take();
		if let Some(mut state) = self.state.borrow_mut().take() {
			state.teardown();
		}
		self.last_frame.set(None);
	}

	/// Schedules the next frame unless one is already pending.
	fn request_frame(&self) -> Result<(), GraphError> {
		if self.frame_id.get().is_some() {
			return Ok(());
		}
		let animate = self.animate.borrow();
		let Some(cb) = animate.as_ref() else {
			return Ok(());
		};
		let window = web_sys::window().ok_or(GraphError::NoWindow)?;
		let id = window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.map_err(|e| GraphError::AnimationFrame(format!("{e:?}")))?;
		self.frame_id.set(Some(id));
		Ok(())
	}

	fn wake(&self) {
		if let Err(err) = self.request_frame() {
			warn!("coauthor-graph: {err}");
		}
	}

	/// Runs a pointer handler against the live state, if any.
	fn with_state<R>(&self, f: impl FnOnce(&mut NetworkGraphState) -> R) -> Option<R> {
		let result = self.state.borrow_mut().as_mut().map(f);
		self.wake();
		result
	}

	/// One animation frame: advance, render, and reschedule while busy.
	fn on_frame(&self, ctx: &CanvasRenderingContext2d) {
		self.frame_id.set(None);
		let now = js_sys::Date::now();
		let dt = self
			.last_frame
			.replace(Some(now))
			.map_or(0.016, |prev| ((now - prev) / 1000.0).clamp(0.0, MAX_FRAME_DT));

		let busy = match self.state.borrow_mut().as_mut() {
			Some(state) => {
				state.frame(dt);
				render::render(state, ctx);
				state.needs_frame()
			}
			None => false,
		};
		if busy {
			self.wake();
		} else {
			self.last_frame.set(None);
		}
	}
}

/// Sizes the canvas, builds the graph state and starts the frame loop.
fn mount(
	engine: &Rc<Engine>,
	canvas: HtmlCanvasElement,
	data: &GraphData,
	width: Option<f64>,
	height: f64,
	config: &SimulationConfig,
	theme: Theme,
) -> Result<(), GraphError> {
	web_sys::window().ok_or(GraphError::NoWindow)?;

	// Read once; the layout does not follow later container resizes.
	let w = width.unwrap_or_else(|| {
		canvas
			.parent_element()
			.map(|p| p.client_width() as f64)
			.filter(|w| *w > 0.0)
			.unwrap_or(DEFAULT_WIDTH)
	});
	if !(w > 0.0 && height > 0.0) {
		return Err(GraphError::EmptyCanvas { width: w, height });
	}
	canvas.set_width(w as u32);
	canvas.set_height(height as u32);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(|e| GraphError::Context(format!("{e:?}")))?
		.ok_or_else(|| GraphError::Context("no context returned".into()))?
		.dyn_into()
		.map_err(|_| GraphError::Context("not a 2d context".into()))?;

	*engine.state.borrow_mut() = Some(NetworkGraphState::new(data, w, height, config, theme));

	let weak: Weak<Engine> = Rc::downgrade(engine);
	*engine.animate.borrow_mut() = Some(Closure::new(move || {
		if let Some(engine) = weak.upgrade() {
			engine.on_frame(&ctx);
		}
	}));
	engine.request_frame()?;

	debug!(
		"coauthor-graph: mounted {} nodes, {} links at {}x{}",
		data.nodes.len(),
		data.links.len(),
		w,
		height
	);
	Ok(())
}

/// Canvas-relative coordinates of a mouse event.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders an interactive co-authorship network on a canvas element.
///
/// Pass graph data via the reactive `data` signal; `None` or a graph without
/// nodes shows a "No network data" placeholder and starts no simulation.
/// `on_node_click` receives the id of a clicked (not dragged) author. The
/// canvas width is taken from the parent container when the data arrives
/// unless `width` is given.
#[component]
pub fn NetworkGraph(
	#[prop(into)] data: Signal<Option<GraphData>>,
	#[prop(optional)] on_node_click: Option<Callback<String>>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = 600.0)] height: f64,
	#[prop(optional)] config: Option<SimulationConfig>,
	#[prop(optional)] theme: Option<Theme>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let tooltip = RwSignal::new(None::<Tooltip>);
	let failed = RwSignal::new(false);
	let engine: Rc<Engine> = Rc::new(Engine::default());

	let config = config.unwrap_or_default();
	let theme = theme.unwrap_or_default();
	let (author_fill, key_person_fill) = (theme.node.fill, theme.node.key_person_fill);

	let engine_init = engine.clone();
	Effect::new(move |_| {
		let data = data.get();
		let canvas = canvas_ref.get();

		engine_init.teardown();
		tooltip.set(None);
		failed.set(false);

		let Some(data) = data.filter(|d| !d.is_empty()) else {
			return;
		};
		let Some(canvas) = canvas else {
			return;
		};
		if let Err(err) = mount(
			&engine_init,
			canvas.into(),
			&data,
			width,
			height,
			&config,
			theme.clone(),
		) {
			error!("coauthor-graph: setup failed: {err}");
			engine_init.teardown();
			failed.set(true);
		}
	});

	let engine_cleanup = StoredValue::new_local(engine.clone());
	on_cleanup(move || {
		let _ = engine_cleanup.try_with_value(|engine| engine.teardown());
	});

	let engine_md = engine.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			engine_md.with_state(|s| s.pointer_down(x, y));
		}
	};

	let engine_mm = engine.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let (cx, cy) = (ev.client_x() as f64, ev.client_y() as f64);
		let change = engine_mm.with_state(|s| match s.pointer_move(x, y) {
			HoverChange::Unchanged => None,
			HoverChange::Entered(idx) => Some(s.node(idx).map(|n| Tooltip::for_node(n, cx, cy))),
			HoverChange::Left => Some(None),
		});
		if let Some(Some(next)) = change {
			tooltip.set(next);
		}
	};

	let engine_mu = engine.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		// Callback runs after the state borrow is released.
		let outcome = engine_mu.with_state(|s| s.pointer_up(x, y)).flatten();
		if let (Some(PointerOutcome::NodeClicked(id)), Some(cb)) = (outcome, on_node_click.as_ref()) {
			cb.run(id);
		}
	};

	let engine_ml = engine.clone();
	let on_mouseleave = move |_: MouseEvent| {
		engine_ml.with_state(|s| s.pointer_leave());
		tooltip.set(None);
	};

	let engine_wh = engine;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			engine_wh.with_state(|s| s.wheel(x, y, ev.delta_y()));
		}
	};

	let has_graph =
		move || !failed.get() && data.with(|d| d.as_ref().is_some_and(|g| !g.is_empty()));

	view! {
		<div class="network-graph" style="position: relative; width: 100%;">
			<canvas
				node_ref=canvas_ref
				class="network-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style=move || {
					format!(
						"display: {}; cursor: grab; border: 1px solid #e5e7eb; border-radius: 8px;",
						if has_graph() { "block" } else { "none" },
					)
				}
			/>
			{move || {
				if has_graph() {
					view! { <NetworkLegend author_fill=author_fill key_person_fill=key_person_fill /> }.into_any()
				} else {
					view! { <div class="network-graph-empty">"No network data"</div> }.into_any()
				}
			}}
			{move || tooltip.get().map(|tip| view! { <TooltipOverlay tip=tip /> })}
		</div>
	}
}

/// Floating author card, positioned in viewport coordinates.
#[component]
fn TooltipOverlay(tip: Tooltip) -> impl IntoView {
	let rows = tip
		.rows()
		.into_iter()
		.map(|(label, value)| view! { <div class="network-tooltip-row">{format!("{label}: {value}")}</div> })
		.collect_view();

	view! {
		<div
			class="network-tooltip"
			style=format!(
				"position: fixed; {} pointer-events: none; z-index: 1000; background: white; \
				 border: 1px solid #e5e7eb; border-radius: 6px; padding: 8px 12px; \
				 box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); font-size: 14px;",
				tip.style()
			)
		>
			<div class="network-tooltip-name">{tip.name.clone()}</div>
			{rows}
			{tip.is_key_person.then(|| view! { <div class="network-tooltip-key">"Key person"</div> })}
		</div>
	}
}

/// Explains the visual encoding under the canvas, in the active theme's colors.
#[component]
fn NetworkLegend(author_fill: Color, key_person_fill: Color) -> impl IntoView {
	let swatch = |color: Color| {
		format!(
			"display: inline-block; width: 12px; height: 12px; border-radius: 50%; background: {};",
			color.to_css()
		)
	};

	view! {
		<div class="network-legend">
			<span><span style=swatch(author_fill)></span>" Author"</span>
			<span><span style=swatch(key_person_fill)></span>" Key person"</span>
			<span>"Node size = papers"</span>
			<span>"Line width = collaborations"</span>
		</div>
	}
}
