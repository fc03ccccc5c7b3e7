//! Setup failures of the graph canvas.

use thiserror::Error;

/// Reasons the canvas could not be prepared. All of them fall back to the
/// "no data" placeholder instead of propagating to the host page.
#[derive(Debug, Error)]
pub enum GraphError {
	/// Not running in a browser page.
	#[error("no browser window available")]
	NoWindow,
	/// `getContext("2d")` failed or returned something else.
	#[error("2d rendering context unavailable: {0}")]
	Context(String),
	/// Resolved canvas size is zero or negative.
	#[error("canvas has no usable size ({width}x{height})")]
	EmptyCanvas {
		/// Resolved width in CSS px.
		width: f64,
		/// Requested height in CSS px.
		height: f64,
	},
	/// `requestAnimationFrame` threw.
	#[error("animation frame request failed: {0}")]
	AnimationFrame(String),
}
