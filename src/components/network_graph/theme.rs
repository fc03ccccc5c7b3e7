//! Visual theming for the network graph.
//!
//! Colors and stroke widths for nodes, edges and labels. The default theme is
//! a light canvas with blue authors and amber key persons.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in [0, 1].
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity `a`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// CSS string: `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node fill and outline.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Fill for regular authors
	pub fill: Color,
	/// Fill for key persons
	pub key_person_fill: Color,
	/// Outline color
	pub stroke: Color,
	/// Outline width at rest
	pub stroke_width: f64,
	/// Stroke width of a fully hovered node
	pub hover_stroke_width: f64,
	/// Radius multiplier of a fully hovered node
	pub hover_scale: f64,
}

/// Edge stroke. Width comes from the collaboration weight.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Line color, usually translucent.
	pub color: Color,
}

/// Author surname labels.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	/// Text color.
	pub color: Color,
	/// Font size in px.
	pub font_size: f64,
	/// Offset from the node center (dx, dy) in world units.
	pub offset: (f64, f64),
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill behind the graph.
	pub background: Color,
	/// Author circles.
	pub node: NodeStyle,
	/// Collaboration lines.
	pub edge: EdgeStyle,
	/// Surname labels.
	pub label: LabelStyle,
}

impl Theme {
	/// Light theme matching the project pages (default)
	pub fn light() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			node: NodeStyle {
				fill: Color::rgb(59, 130, 246),            // blue-500
				key_person_fill: Color::rgb(245, 158, 11), // amber-500
				stroke: Color::rgb(255, 255, 255),
				stroke_width: 2.0,
				hover_stroke_width: 3.0,
				hover_scale: 1.3,
			},
			edge: EdgeStyle {
				color: Color::rgba(153, 153, 153, 0.6),
			},
			label: LabelStyle {
				color: Color::rgb(55, 65, 81), // gray-700
				font_size: 10.0,
				offset: (12.0, 4.0),
			},
		}
	}

	/// Fill for a node depending on its key-person flag.
	pub fn node_fill(&self, is_key_person: bool) -> Color {
		if is_key_person {
			self.node.key_person_fill
		} else {
			self.node.fill
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
