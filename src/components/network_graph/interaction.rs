//! Pointer gesture tracking: node drags and the zoom/pan viewport.
//!
//! The two are kept as independent state holders. [`DragGesture`] only knows
//! about node presses and never touches the viewport; [`ZoomTransform`] owns
//! the viewport and never touches the simulation.

/// Screen distance (px) a press must travel before it becomes a drag.
pub const CLICK_THRESHOLD: f64 = 3.0;

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 3.0;

/// Per-node drag gesture.
///
/// `Pressed` is the ambiguous state between pointer-down and either a click
/// (released in place) or a drag (moved past [`CLICK_THRESHOLD`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragGesture {
	/// No node is pressed.
	#[default]
	Idle,
	/// Pointer is down on `node` but has not moved far.
	Pressed {
		/// Body index under the press.
		node: usize,
		/// Screen position of the pointer-down.
		origin: (f64, f64),
	},
	/// `node` follows the pointer.
	Dragging {
		/// Body index being dragged.
		node: usize,
	},
}

/// What a drag-gesture transition asks the simulation to do.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum DragEvent {
	/// Press crossed the threshold: reheat and pin `node`.
	Started { node: usize },
	/// Pin `node` at the pointer.
	Moved { node: usize },
	/// Release the pin and let the layout cool.
	Ended { node: usize },
	/// Released without moving: a click on `node`.
	Clicked { node: usize },
}

impl DragGesture {
	/// Pointer went down on `node` at screen (sx, sy).
	pub fn press(&mut self, node: usize, sx: f64, sy: f64) {
		*self = DragGesture::Pressed {
			node,
			origin: (sx, sy),
		};
	}

	/// Pointer moved to screen (sx, sy).
	pub fn moved(&mut self, sx: f64, sy: f64) -> Option<DragEvent> {
		match *self {
			DragGesture::Idle => None,
			DragGesture::Pressed { node, origin } => {
				let (dx, dy) = (sx - origin.0, sy - origin.1);
				if dx * dx + dy * dy > CLICK_THRESHOLD * CLICK_THRESHOLD {
					*self = DragGesture::Dragging { node };
					Some(DragEvent::Started { node })
				} else {
					None
				}
			}
			DragGesture::Dragging { node } => Some(DragEvent::Moved { node }),
		}
	}

	/// Pointer released.
	pub fn release(&mut self) -> Option<DragEvent> {
		match std::mem::take(self) {
			DragGesture::Idle => None,
			DragGesture::Pressed { node, .. } => Some(DragEvent::Clicked { node }),
			DragGesture::Dragging { node } => Some(DragEvent::Ended { node }),
		}
	}

	/// Pointer left the canvas. A press is dropped silently; a drag ends.
	pub fn cancel(&mut self) -> Option<DragEvent> {
		match std::mem::take(self) {
			DragGesture::Dragging { node } => Some(DragEvent::Ended { node }),
			_ => None,
		}
	}

	/// Whether a node currently follows the pointer.
	pub fn is_dragging(&self) -> bool {
		matches!(self, DragGesture::Dragging { .. })
	}

	/// Whether a node is pressed or dragged.
	pub fn is_active(&self) -> bool {
		!matches!(self, DragGesture::Idle)
	}
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomTransform {
	/// Horizontal translation in screen px.
	pub x: f64,
	/// Vertical translation in screen px.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to [`MIN_ZOOM`]..[`MAX_ZOOM`]).
	pub k: f64,
}

impl Default for ZoomTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ZoomTransform {
	/// Screen px to world units.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// World units to screen px.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Zooms by `factor` keeping the screen point (sx, sy) fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Wheel step: scrolling down zooms out.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.zoom_at(sx, sy, factor);
	}
}

/// Tracks an in-progress background pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether a pan is in progress.
	pub active: bool,
	/// Pointer position at pan start.
	pub start_x: f64,
	/// See `start_x`.
	pub start_y: f64,
	/// Transform translation at pan start.
	pub transform_start_x: f64,
	/// See `transform_start_x`.
	pub transform_start_y: f64,
}

impl PanState {
	/// Starts panning from screen (sx, sy).
	pub fn begin(&mut self, sx: f64, sy: f64, transform: &ZoomTransform) {
		*self = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: transform.x,
			transform_start_y: transform.y,
		};
	}

	/// Moves the transform by the pointer's travel since `begin`.
	pub fn update(&self, sx: f64, sy: f64, transform: &mut ZoomTransform) {
		if self.active {
			transform.x = self.transform_start_x + (sx - self.start_x);
			transform.y = self.transform_start_y + (sy - self.start_y);
		}
	}

	/// Stops panning.
	pub fn end(&mut self) {
		self.active = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn release_in_place_is_a_click() {
		let mut gesture = DragGesture::default();
		gesture.press(4, 10.0, 10.0);
		assert_eq!(gesture.moved(11.0, 11.0), None);
		assert_eq!(gesture.release(), Some(DragEvent::Clicked { node: 4 }));
		assert_eq!(gesture, DragGesture::Idle);
	}

	#[test]
	fn movement_past_threshold_starts_drag() {
		let mut gesture = DragGesture::default();
		gesture.press(1, 0.0, 0.0);
		assert_eq!(gesture.moved(5.0, 0.0), Some(DragEvent::Started { node: 1 }));
		assert!(gesture.is_dragging());
		assert_eq!(gesture.moved(6.0, 0.0), Some(DragEvent::Moved { node: 1 }));
		assert_eq!(gesture.release(), Some(DragEvent::Ended { node: 1 }));
		assert!(!gesture.is_active());
	}

	#[test]
	fn cancel_ends_drags_but_drops_presses() {
		let mut gesture = DragGesture::default();
		gesture.press(2, 0.0, 0.0);
		assert_eq!(gesture.cancel(), None);

		gesture.press(2, 0.0, 0.0);
		gesture.moved(10.0, 10.0);
		assert_eq!(gesture.cancel(), Some(DragEvent::Ended { node: 2 }));
		assert_eq!(gesture.release(), None);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut t = ZoomTransform::default();
		for _ in 0..50 {
			t.wheel(0.0, 0.0, -1.0);
		}
		assert_eq!(t.k, MAX_ZOOM);
		for _ in 0..50 {
			t.wheel(0.0, 0.0, 1.0);
		}
		assert_eq!(t.k, MIN_ZOOM);
	}

	#[test]
	fn zoom_keeps_pointer_fixed() {
		let mut t = ZoomTransform {
			x: 20.0,
			y: -10.0,
			k: 1.0,
		};
		let before = t.screen_to_graph(200.0, 150.0);
		t.zoom_at(200.0, 150.0, 1.1);
		let after = t.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn screen_graph_round_trip() {
		let t = ZoomTransform {
			x: 30.0,
			y: 40.0,
			k: 2.0,
		};
		assert_eq!(t.screen_to_graph(50.0, 60.0), (10.0, 10.0));
		assert_eq!(t.graph_to_screen(10.0, 10.0), (50.0, 60.0));
	}

	#[test]
	fn pan_follows_pointer() {
		let mut t = ZoomTransform::default();
		let mut pan = PanState::default();
		pan.begin(100.0, 100.0, &t);
		pan.update(130.0, 90.0, &mut t);
		assert_eq!((t.x, t.y), (30.0, -10.0));
		pan.end();
		pan.update(500.0, 500.0, &mut t);
		assert_eq!((t.x, t.y), (30.0, -10.0));
	}
}
