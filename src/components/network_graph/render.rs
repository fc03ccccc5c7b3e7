//! Canvas rendering for the network graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Collaboration edges (world space)
//! 3. Resting nodes, then hovered/transitioning nodes on top
//! 4. Surname labels, which never intercept the pointer

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::edge_width;
use super::state::NetworkGraphState;

/// Renders the complete graph to the canvas.
pub fn render(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&state.theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_labels(state, ctx);

	ctx.restore();
}

fn draw_edges(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d) {
	let sim = state.simulation();
	let bodies = sim.bodies();
	ctx.set_stroke_style_str(&state.theme.edge.color.to_css());

	for link in sim.links() {
		let (Some(a), Some(b)) = (bodies.get(link.source), bodies.get(link.target)) else {
			continue;
		};
		ctx.set_line_width(edge_width(link.weight));
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d) {
	let bodies = state.simulation().bodies();
	let raised = |idx: usize| state.hover.intensity(idx) > 0.0 || state.hover.hovered == Some(idx);

	// Pass 1: resting nodes
	for (idx, body) in bodies.iter().enumerate() {
		if !raised(idx) {
			draw_node(state, ctx, idx, body.x, body.y);
		}
	}

	// Pass 2: hovered/transitioning nodes on top
	for (idx, body) in bodies.iter().enumerate() {
		if raised(idx) {
			draw_node(state, ctx, idx, body.x, body.y);
		}
	}
}

fn draw_node(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d, idx: usize, x: f64, y: f64) {
	let Some(info) = state.nodes().get(idx) else {
		return;
	};
	let radius = state.display_radius(idx);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&info.fill.to_css());
	ctx.fill();

	ctx.set_stroke_style_str(&state.theme.node.stroke.to_css());
	ctx.set_line_width(state.display_stroke_width(idx));
	ctx.stroke();
}

fn draw_labels(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d) {
	let style = &state.theme.label;
	let (dx, dy) = style.offset;
	ctx.set_fill_style_str(&style.color.to_css());
	ctx.set_font(&format!("{}px sans-serif", style.font_size));

	for (info, body) in state.nodes().iter().zip(state.simulation().bodies()) {
		if let Some(label) = &info.label {
			let _ = ctx.fill_text(label, body.x + dx, body.y + dy);
		}
	}
}
