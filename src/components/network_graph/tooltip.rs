//! Hover tooltip model.
//!
//! The component renders this as an overlay inside its own subtree, so it is
//! removed together with the component.

use super::types::GraphNode;

/// Offset of the tooltip's top-left corner from the pointer, in CSS px.
pub const TOOLTIP_OFFSET: (f64, f64) = (10.0, -10.0);

/// Snapshot of the hovered author, copied verbatim from the node.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	/// Full author name, unabridged.
	pub name: String,
	/// Paper count of the author.
	pub papers_count: u32,
	/// Citation count of the author.
	pub citations: u32,
	/// First-author paper count.
	pub first_author_count: u32,
	/// Adds the "Key person" marker.
	pub is_key_person: bool,
	/// Viewport position (CSS px) of the tooltip's top-left corner.
	pub left: f64,
	/// See `left`.
	pub top: f64,
}

impl Tooltip {
	/// Builds the tooltip for `node` with the pointer at viewport (client_x, client_y).
	pub fn for_node(node: &GraphNode, client_x: f64, client_y: f64) -> Self {
		Self {
			name: node.name.clone(),
			papers_count: node.papers_count,
			citations: node.citations,
			first_author_count: node.first_author_count,
			is_key_person: node.is_key_person,
			left: client_x + TOOLTIP_OFFSET.0,
			top: client_y + TOOLTIP_OFFSET.1,
		}
	}

	/// Metric rows shown under the name.
	pub fn rows(&self) -> [(&'static str, u32); 3] {
		[
			("Papers", self.papers_count),
			("Citations", self.citations),
			("First author", self.first_author_count),
		]
	}

	/// Inline CSS placing the overlay.
	pub fn style(&self) -> String {
		format!("left: {}px; top: {}px;", self.left, self.top)
	}
}
