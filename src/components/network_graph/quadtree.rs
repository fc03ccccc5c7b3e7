//! Barnes-Hut quadtree for approximating the many-body force.
//!
//! Built fresh every tick from body positions. Each cell aggregates the total
//! charge of the bodies under it and their charge-weighted centroid, so a far
//! cell can act on a body as a single point.

/// Deepest subdivision. Cells below this hold all remaining bodies in a leaf,
/// which also absorbs exactly coincident points.
const MAX_DEPTH: usize = 32;

#[derive(Clone, Debug)]
struct Cell {
	/// Side length of the square cell.
	size: f64,
	/// Summed charge of all bodies in the cell.
	charge: f64,
	/// Charge-weighted centroid.
	cx: f64,
	cy: f64,
	children: [Option<usize>; 4],
	/// Body indices, only populated for leaves.
	bodies: Vec<usize>,
}

impl Cell {
	fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}
}

/// Arena-allocated quadtree over a set of points with per-point charge.
#[derive(Clone, Debug, Default)]
pub struct QuadTree {
	cells: Vec<Cell>,
}

impl QuadTree {
	/// Builds a tree over `points` (x, y) with matching `charges`.
	pub fn build(points: &[(f64, f64)], charges: &[f64]) -> Self {
		let mut tree = Self {
			cells: Vec::with_capacity(points.len() * 2),
		};
		if points.is_empty() {
			return tree;
		}

		let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
		for &(x, y) in points {
			x0 = x0.min(x);
			y0 = y0.min(y);
			x1 = x1.max(x);
			y1 = y1.max(y);
		}
		let size = (x1 - x0).max(y1 - y0).max(1.0);
		let indices: Vec<usize> = (0..points.len()).collect();
		tree.insert(&indices, points, charges, x0, y0, size, 0);
		tree
	}

	#[allow(clippy::too_many_arguments)]
	fn insert(
		&mut self,
		indices: &[usize],
		points: &[(f64, f64)],
		charges: &[f64],
		x0: f64,
		y0: f64,
		size: f64,
		depth: usize,
	) -> usize {
		let id = self.cells.len();
		self.cells.push(Cell {
			size,
			charge: 0.0,
			cx: 0.0,
			cy: 0.0,
			children: [None; 4],
			bodies: Vec::new(),
		});

		if indices.len() <= 1 || depth >= MAX_DEPTH {
			self.cells[id].bodies = indices.to_vec();
		} else {
			let half = size / 2.0;
			let (mx, my) = (x0 + half, y0 + half);
			let mut quadrants: [Vec<usize>; 4] = Default::default();
			for &i in indices {
				let (x, y) = points[i];
				let q = usize::from(x >= mx) | (usize::from(y >= my) << 1);
				quadrants[q].push(i);
			}
			for (q, members) in quadrants.iter().enumerate() {
				if members.is_empty() {
					continue;
				}
				let qx = if q & 1 == 1 { mx } else { x0 };
				let qy = if q & 2 == 2 { my } else { y0 };
				let child = self.insert(members, points, charges, qx, qy, half, depth + 1);
				self.cells[id].children[q] = Some(child);
			}
		}

		// Aggregate charge and centroid; weights use |charge| so repulsive
		// (negative) charges still produce a sensible centroid.
		let (mut charge, mut weight, mut sx, mut sy) = (0.0, 0.0, 0.0, 0.0);
		for &i in indices {
			let w = charges[i].abs();
			charge += charges[i];
			weight += w;
			sx += points[i].0 * w;
			sy += points[i].1 * w;
		}
		let cell = &mut self.cells[id];
		cell.charge = charge;
		if weight > 0.0 {
			cell.cx = sx / weight;
			cell.cy = sy / weight;
		}
		id
	}

	/// Visits cells depth-first from the root. The visitor receives the cell's
	/// side length, aggregate charge, centroid, and for leaves the contained
	/// bodies; returning `true` skips the cell's children.
	pub fn visit<F>(&self, mut visitor: F)
	where
		F: FnMut(CellView<'_>) -> bool,
	{
		if self.cells.is_empty() {
			return;
		}
		let mut stack = vec![0usize];
		while let Some(id) = stack.pop() {
			let cell = &self.cells[id];
			let leaf = cell.is_leaf();
			let view = CellView {
				size: cell.size,
				charge: cell.charge,
				cx: cell.cx,
				cy: cell.cy,
				bodies: if leaf { &cell.bodies } else { &[] },
				is_leaf: leaf,
			};
			if visitor(view) || leaf {
				continue;
			}
			stack.extend(cell.children.iter().rev().flatten().copied());
		}
	}

}

/// Read-only view of one cell handed to [`QuadTree::visit`].
#[derive(Clone, Copy, Debug)]
pub struct CellView<'a> {
	/// Side length of the square cell.
	pub size: f64,
	/// Summed charge of the bodies under the cell.
	pub charge: f64,
	/// Charge-weighted centroid.
	pub cx: f64,
	/// See `cx`.
	pub cy: f64,
	/// Contained body indices; empty for internal cells.
	pub bodies: &'a [usize],
	/// Leaves have no children to descend into.
	pub is_leaf: bool,
}
