//! Graph state and interaction tracking.
//!
//! Wraps the force [`Simulation`] with per-node display metadata, the zoom
//! transform, the drag gesture, and hover state with smooth intensity
//! transitions. Pointer handlers translate screen coordinates into simulation
//! perturbations and report what the component has to do next (show a
//! tooltip, invoke the click callback).

use std::collections::HashMap;

use super::interaction::{DragEvent, DragGesture, PanState, ZoomTransform};
use super::scale::{hovered_radius, node_label, node_radius};
use super::simulation::{Simulation, SimulationConfig};
use super::theme::{Color, Theme};
use super::types::{GraphData, GraphNode};

/// Extra hit-test reach around a node, in screen px.
pub const HIT_SLOP: f64 = 2.0;

/// Per-node display metadata, computed once per data set.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	/// The author as supplied by the host.
	pub node: GraphNode,
	/// Surname label, for prominent authors only.
	pub label: Option<String>,
	/// Circle fill.
	pub fill: Color,
	/// Resting radius in world units.
	pub radius: f64,
}

/// Smoothed hover highlight.
///
/// Each node has its own intensity (0.0 to 1.0) that eases toward 1 while it
/// is hovered and back to 0 afterwards, so the enlarge/shrink reads as a short
/// transition rather than a jump.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	/// Currently hovered node (if any)
	pub hovered: Option<usize>,
	/// Nodes not in this map have intensity 0.
	intensity: HashMap<usize, f64>,
}

impl HoverState {
	/// Exponential smoothing rate; reaches ~95% in 200ms.
	const SPEED: f64 = 15.0;

	/// Changes the hovered node. Returns whether it changed.
	pub fn set(&mut self, node: Option<usize>) -> bool {
		if self.hovered == node {
			return false;
		}
		self.hovered = node;
		true
	}

	/// value += (target - value) * (1 - e^(-speed * dt))
	pub fn tick(&mut self, dt: f64) {
		let factor = 1.0 - (-Self::SPEED * dt).exp();
		if let Some(idx) = self.hovered {
			let t = self.intensity.entry(idx).or_insert(0.0);
			*t += (1.0 - *t) * factor;
		}
		let hovered = self.hovered;
		self.intensity.retain(|idx, t| {
			if Some(*idx) == hovered {
				return true;
			}
			*t -= *t * factor;
			*t > 0.005
		});
	}

	/// Current highlight of node `idx` in [0, 1].
	pub fn intensity(&self, idx: usize) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Whether any intensity is still moving toward its target.
	pub fn is_animating(&self) -> bool {
		self.intensity
			.iter()
			.any(|(idx, t)| if Some(*idx) == self.hovered { *t < 0.995 } else { *t > 0.0 })
	}

	/// Drops the hover and all intensities at once.
	pub fn clear(&mut self) {
		self.hovered = None;
		self.intensity.clear();
	}
}

/// Hover transition reported by [`NetworkGraphState::pointer_move`].
#[derive(Clone, Debug, PartialEq)]
pub enum HoverChange {
	/// Still over the same node (or still over nothing).
	Unchanged,
	/// Pointer moved onto node `idx`.
	Entered(usize),
	/// Pointer left the hovered node.
	Left,
}

/// Something the host has to hear about after a pointer event.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
	/// A press and release without dragging, carrying the node id.
	NodeClicked(String),
}

/// Core graph state combining the simulation with interaction and hover
/// tracking.
///
/// Created when the component mounts (and again whenever the data changes),
/// then mutated each animation frame and by pointer handlers.
pub struct NetworkGraphState {
	simulation: Simulation,
	nodes: Vec<NodeInfo>,
	/// Viewport pan and zoom.
	pub transform: ZoomTransform,
	/// Node press/drag gesture.
	pub drag: DragGesture,
	/// Background pan gesture.
	pub pan: PanState,
	/// Hovered node and highlight easing.
	pub hover: HoverState,
	/// Colors and stroke widths.
	pub theme: Theme,
	/// Canvas size in CSS px.
	pub width: f64,
	/// See `width`.
	pub height: f64,
	/// Node center minus pointer at press time, in world units.
	grab_offset: (f64, f64),
}

impl NetworkGraphState {
	/// Builds the layout and display metadata for `data` on a canvas of the
	/// given size.
	pub fn new(
		data: &GraphData,
		width: f64,
		height: f64,
		config: &SimulationConfig,
		theme: Theme,
	) -> Self {
		let nodes = data
			.nodes
			.iter()
			.map(|node| NodeInfo {
				label: node_label(node),
				fill: theme.node_fill(node.is_key_person),
				radius: node_radius(node.papers_count),
				node: node.clone(),
			})
			.collect();

		Self {
			simulation: Simulation::new(data, width, height, config),
			nodes,
			transform: ZoomTransform::default(),
			drag: DragGesture::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			theme,
			width,
			height,
			grab_offset: (0.0, 0.0),
		}
	}

	/// The underlying force layout.
	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	/// Display metadata, indexed like the simulation's bodies.
	pub fn nodes(&self) -> &[NodeInfo] {
		&self.nodes
	}

	/// Author behind body `idx`.
	pub fn node(&self, idx: usize) -> Option<&GraphNode> {
		self.nodes.get(idx).map(|info| &info.node)
	}

	/// Radius of node `idx` including the hover enlargement.
	pub fn display_radius(&self, idx: usize) -> f64 {
		let base = self.nodes.get(idx).map_or(0.0, |n| n.radius);
		hovered_radius(base, self.theme.node.hover_scale, self.hover.intensity(idx))
	}

	/// Outline width of node `idx` including the hover emphasis.
	pub fn display_stroke_width(&self, idx: usize) -> f64 {
		let style = &self.theme.node;
		let t = self.hover.intensity(idx);
		style.stroke_width + (style.hover_stroke_width - style.stroke_width) * t
	}

	/// Node under the screen point (sx, sy), if any. Uses the drawn radius,
	/// so a hovered node keeps the pointer across its enlarged ring.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let slop = HIT_SLOP / self.transform.k;
		self.simulation
			.node_within(gx, gy, |idx, _| self.display_radius(idx) + slop)
	}

	/// Advances one animation frame: at most one simulation tick, plus hover
	/// easing. Returns whether the layout moved.
	pub fn frame(&mut self, dt: f64) -> bool {
		self.hover.tick(dt);
		self.simulation.advance()
	}

	/// Whether another frame would change anything on screen.
	pub fn needs_frame(&self) -> bool {
		self.simulation.is_running() || self.hover.is_animating()
	}

	/// Press at screen (sx, sy): arms a node gesture or starts a pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		match self.node_at_position(sx, sy) {
			Some(idx) => {
				let (gx, gy) = self.transform.screen_to_graph(sx, sy);
				if let Some(body) = self.simulation.body(idx) {
					self.grab_offset = (body.x - gx, body.y - gy);
				}
				self.drag.press(idx, sx, sy);
			}
			None => self.pan.begin(sx, sy, &self.transform),
		}
	}

	/// Pointer moved to screen (sx, sy): drags, pans and updates the hover.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> HoverChange {
		if let Some(event) = self.drag.moved(sx, sy) {
			self.apply_drag(event, sx, sy);
		} else if self.pan.active {
			self.pan.update(sx, sy, &mut self.transform);
		}

		// Hover stays on the dragged node.
		if self.drag.is_dragging() {
			return HoverChange::Unchanged;
		}
		let hovered = self.node_at_position(sx, sy);
		if !self.hover.set(hovered) {
			return HoverChange::Unchanged;
		}
		match hovered {
			Some(idx) => HoverChange::Entered(idx),
			None => HoverChange::Left,
		}
	}

	/// Release at screen (sx, sy). A release that never became a drag is a
	/// click.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<PointerOutcome> {
		self.pan.end();
		let event = self.drag.release()?;
		self.apply_drag(event, sx, sy)
	}

	/// Pointer left the canvas: end any drag or pan and drop the hover.
	pub fn pointer_leave(&mut self) {
		self.pan.end();
		if let Some(event) = self.drag.cancel() {
			self.apply_drag(event, 0.0, 0.0);
		}
		self.hover.set(None);
	}

	/// Wheel zoom about the pointer.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.transform.wheel(sx, sy, delta_y);
	}

	fn apply_drag(&mut self, event: DragEvent, sx: f64, sy: f64) -> Option<PointerOutcome> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let (px, py) = (gx + self.grab_offset.0, gy + self.grab_offset.1);
		match event {
			DragEvent::Started { node } => {
				let target = self.simulation.config().drag_alpha_target;
				self.simulation.set_alpha_target(target);
				self.simulation.restart();
				self.simulation.pin(node, px, py);
				self.hover.set(Some(node));
				None
			}
			DragEvent::Moved { node } => {
				self.simulation.pin(node, px, py);
				None
			}
			DragEvent::Ended { node } => {
				self.simulation.set_alpha_target(0.0);
				self.simulation.unpin(node);
				None
			}
			DragEvent::Clicked { node } => self
				.node(node)
				.map(|n| PointerOutcome::NodeClicked(n.id.clone())),
		}
	}

	/// Stops the simulation and drops transient interaction state.
	pub fn teardown(&mut self) {
		self.simulation.stop();
		if let Some(event) = self.drag.cancel() {
			self.apply_drag(event, 0.0, 0.0);
		}
		self.pan.end();
		self.hover.clear();
	}
}
