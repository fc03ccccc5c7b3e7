//! Attribute-driven scaling for graph visuals.
//!
//! Node size follows the author's paper count, edge width follows the number of
//! shared papers, and labels are reserved for prominent authors. All values are
//! in world-space; the zoom transform is applied on top by the renderer.
//!
//! # Scaling rules
//!
//! - Node radius: `min(5 + sqrt(papers) * 2, 20)`, with a paper count of zero
//!   treated as one. Bounded to [`MIN_NODE_RADIUS`, `MAX_NODE_RADIUS`].
//! - Edge width: `sqrt(max(weight, 1))`. Sub-linear so heavy collaborations do
//!   not dominate the picture.
//! - Labels: key persons and authors with at least [`LABEL_MIN_PAPERS`] papers.

use super::types::GraphNode;

/// Radius of an author with a single paper.
pub const MIN_NODE_RADIUS: f64 = 5.0;
/// Largest radius any author is drawn with.
pub const MAX_NODE_RADIUS: f64 = 20.0;
/// Paper count at which an ordinary author gets a label.
pub const LABEL_MIN_PAPERS: u32 = 3;

/// Node radius in world units for an author with `papers_count` papers.
pub fn node_radius(papers_count: u32) -> f64 {
	let papers = papers_count.max(1) as f64;
	(MIN_NODE_RADIUS + papers.sqrt() * 2.0).min(MAX_NODE_RADIUS)
}

/// Stroke width for an edge. Missing, non-finite or sub-unit weights count as 1.
pub fn edge_width(weight: f64) -> f64 {
	let weight = if weight.is_finite() { weight.max(1.0) } else { 1.0 };
	weight.sqrt()
}

/// Whether `node` gets a surname label.
pub fn should_label(node: &GraphNode) -> bool {
	node.is_key_person || node.papers_count >= LABEL_MIN_PAPERS
}

/// Surname approximation: the last whitespace-delimited token of `name`.
///
/// Assumes Western "given family" order; names written family-first or with
/// particles ("van der Berg") come out wrong. Kept as-is until there is a
/// decision on expected name formats.
pub fn label_text(name: &str) -> &str {
	name.split_whitespace().next_back().unwrap_or("")
}

/// Label for `node`, if it should have one.
pub fn node_label(node: &GraphNode) -> Option<String> {
	if !should_label(node) {
		return None;
	}
	let text = label_text(&node.name);
	(!text.is_empty()).then(|| text.to_string())
}

/// Hovered radius: grows by up to `hover_scale` as `hover_t` goes 0 → 1.
pub fn hovered_radius(base: f64, hover_scale: f64, hover_t: f64) -> f64 {
	base * (1.0 + (hover_scale - 1.0) * hover_t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn author(name: &str, papers: u32, key: bool) -> GraphNode {
		GraphNode {
			id: "a1".into(),
			name: name.into(),
			papers_count: papers,
			is_key_person: key,
			..Default::default()
		}
	}

	#[test]
	fn radius_floor_and_cap() {
		assert_eq!(node_radius(0), node_radius(1));
		assert_eq!(node_radius(1), 7.0);
		assert_eq!(node_radius(4), 9.0);
		assert_eq!(node_radius(57), 20.0);
		assert_eq!(node_radius(10_000), MAX_NODE_RADIUS);
	}

	#[test]
	fn edge_width_defaults_and_scales() {
		assert_eq!(edge_width(1.0), 1.0);
		assert_eq!(edge_width(0.0), 1.0);
		assert_eq!(edge_width(-3.0), 1.0);
		assert_eq!(edge_width(f64::NAN), 1.0);
		assert_eq!(edge_width(9.0), 3.0);
	}

	#[test]
	fn labels_for_prominent_authors_only() {
		assert_eq!(node_label(&author("Jane Q Public", 2, false)), None);
		assert_eq!(node_label(&author("Jane Q Public", 3, false)).as_deref(), Some("Public"));
		assert_eq!(node_label(&author("Jane Q Public", 0, true)).as_deref(), Some("Public"));
	}

	#[test]
	fn surname_is_last_token() {
		assert_eq!(label_text("Grace  Hopper "), "Hopper");
		assert_eq!(label_text("Plato"), "Plato");
		assert_eq!(label_text("   "), "");
	}

	#[test]
	fn hover_grows_radius_by_thirty_percent() {
		assert_eq!(hovered_radius(10.0, 1.3, 0.0), 10.0);
		assert!((hovered_radius(10.0, 1.3, 1.0) - 13.0).abs() < 1e-9);
		assert!((hovered_radius(10.0, 1.3, 2.0) - 13.0).abs() < 1e-9);
	}
}
