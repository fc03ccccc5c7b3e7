//! Cooling force simulation for the collaboration network.
//!
//! Positions live in [`Body`] records owned by the simulation and keyed by node
//! index (with an id lookup), never in the caller's [`GraphData`]. The renderer
//! reads them between ticks.
//!
//! Each tick lowers the temperature `alpha` geometrically toward
//! `alpha_target`, applies the link, charge, center and collision forces, then
//! integrates velocities. The timer stops once `alpha` drops below
//! `alpha_min`; dragging raises `alpha_target` to keep it warm.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::quadtree::QuadTree;
use super::scale::node_radius;
use super::types::GraphData;

/// Seed of the jiggle generator. Fixed so the same data always lays out the
/// same way.
const JIGGLE_SEED: u64 = 0x5eed;

/// Sub-pixel nudge separating coincident points.
fn jiggle(rng: &mut StdRng) -> f64 {
	rng.gen_range(-0.5e-6..0.5e-6)
}

/// Physics parameters. Every field can be overridden from JSON; missing
/// fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Rest length of a collaboration link.
	pub link_distance: f64,
	/// Spring stiffness in [0, 1]; 1 would be a rigid rod.
	pub link_strength: f64,
	/// Pairwise charge; negative repels.
	pub charge_strength: f64,
	/// Barnes-Hut accuracy. Cells with `size / distance < theta` are approximated.
	pub theta: f64,
	/// Distances below this are clamped when computing charge.
	pub charge_distance_min: f64,
	/// Overlap correction per tick in [0, 1].
	pub collision_strength: f64,
	/// The timer stops once alpha falls below this. Must be positive.
	pub alpha_min: f64,
	/// Fraction of the distance to `alpha_target` covered per tick, in (0, 1].
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 100.0,
			link_strength: 0.5,
			charge_strength: -300.0,
			theta: 0.9,
			charge_distance_min: 1.0,
			collision_strength: 1.0,
			alpha_min,
			// Cools from 1 to alpha_min in 300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}
}

impl SimulationConfig {
	/// Replaces cooling parameters that would keep the timer running forever
	/// (or make it diverge) with their defaults.
	pub fn validated(mut self) -> Self {
		let defaults = Self::default();
		if !(self.alpha_min > 0.0 && self.alpha_min < 1.0) {
			warn!("coauthor-graph: alpha_min {} out of range, using default", self.alpha_min);
			self.alpha_min = defaults.alpha_min;
		}
		if !(self.alpha_decay > 0.0 && self.alpha_decay <= 1.0) {
			warn!("coauthor-graph: alpha_decay {} out of range, using default", self.alpha_decay);
			self.alpha_decay = defaults.alpha_decay;
		}
		if !(0.0..=1.0).contains(&self.velocity_decay) {
			warn!("coauthor-graph: velocity_decay {} out of range, using default", self.velocity_decay);
			self.velocity_decay = defaults.velocity_decay;
		}
		if !(self.drag_alpha_target >= 0.0 && self.drag_alpha_target < 1.0) {
			self.drag_alpha_target = defaults.drag_alpha_target;
		}
		self
	}
}

/// Layout record for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
	/// Id of the node this body lays out.
	pub id: String,
	/// Position in world units.
	pub x: f64,
	/// See `x`.
	pub y: f64,
	/// Velocity, in world units per tick.
	pub vx: f64,
	/// See `vx`.
	pub vy: f64,
	/// Pinned coordinates; when set they override the physics.
	pub fx: Option<f64>,
	/// See `fx`.
	pub fy: Option<f64>,
	/// Collision radius, equal to the rendered radius.
	pub radius: f64,
}

impl Body {
	/// Whether either coordinate is held by a pin.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// A resolved link between two bodies.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkRef {
	/// Body index of the source author.
	pub source: usize,
	/// Body index of the target author.
	pub target: usize,
	/// Collaboration count, used for the drawn width only.
	pub weight: f64,
	/// Share of the correction applied to the target; favors moving the
	/// less-connected endpoint.
	bias: f64,
}

/// Force layout over a fixed set of bodies and links.
pub struct Simulation {
	bodies: Vec<Body>,
	links: Vec<LinkRef>,
	index: HashMap<String, usize>,
	config: SimulationConfig,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	running: bool,
	rng: StdRng,
}

impl Simulation {
	/// Lays the nodes out on a phyllotaxis spiral around the canvas center and
	/// resolves links. Links naming an unknown id are skipped. Out-of-range
	/// cooling parameters fall back to defaults, see [`SimulationConfig::validated`].
	pub fn new(data: &GraphData, width: f64, height: f64, config: &SimulationConfig) -> Self {
		let center = (width / 2.0, height / 2.0);
		let golden_angle = PI * (3.0 - 5f64.sqrt());

		let bodies: Vec<Body> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let r = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden_angle;
				Body {
					id: node.id.clone(),
					x: center.0 + r * angle.cos(),
					y: center.1 + r * angle.sin(),
					vx: 0.0,
					vy: 0.0,
					fx: None,
					fy: None,
					radius: node_radius(node.papers_count),
				}
			})
			.collect();
		let index: HashMap<String, usize> = bodies
			.iter()
			.enumerate()
			.map(|(i, b)| (b.id.clone(), i))
			.collect();

		let mut resolved = Vec::with_capacity(data.links.len());
		for link in &data.links {
			match (index.get(&link.source), index.get(&link.target)) {
				(Some(&source), Some(&target)) => resolved.push((source, target, link.weight)),
				_ => warn!(
					"coauthor-graph: skipping link {} -> {} with unknown endpoint",
					link.source, link.target
				),
			}
		}
		let mut degree = vec![0usize; bodies.len()];
		for &(s, t, _) in &resolved {
			degree[s] += 1;
			degree[t] += 1;
		}
		let links = resolved
			.into_iter()
			.map(|(source, target, weight)| LinkRef {
				source,
				target,
				weight,
				bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
			})
			.collect();

		Self {
			running: !bodies.is_empty(),
			bodies,
			links,
			index,
			config: config.clone().validated(),
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			rng: StdRng::seed_from_u64(JIGGLE_SEED),
		}
	}

	/// One timer step. Ticks once if running and stops after cooling below
	/// `alpha_min`. Returns whether positions changed.
	pub fn advance(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.config.alpha_min {
			self.running = false;
		}
		true
	}

	/// Applies one step regardless of the timer state.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_charge(alpha);
		self.apply_center();
		self.apply_collision();

		let keep = 1.0 - self.config.velocity_decay;
		for body in &mut self.bodies {
			match body.fx {
				Some(fx) => {
					body.x = fx;
					body.vx = 0.0;
				}
				None => {
					body.vx *= keep;
					body.x += body.vx;
				}
			}
			match body.fy {
				Some(fy) => {
					body.y = fy;
					body.vy = 0.0;
				}
				None => {
					body.vy *= keep;
					body.y += body.vy;
				}
			}
		}
	}

	fn apply_links(&mut self, alpha: f64) {
		let Self {
			bodies,
			links,
			config,
			rng,
			..
		} = self;
		for link in links.iter() {
			let (s, t) = (link.source, link.target);
			if s == t {
				continue;
			}
			let mut x = bodies[t].x + bodies[t].vx - bodies[s].x - bodies[s].vx;
			let mut y = bodies[t].y + bodies[t].vy - bodies[s].y - bodies[s].vy;
			if x == 0.0 {
				x = jiggle(rng);
			}
			if y == 0.0 {
				y = jiggle(rng);
			}
			let l = (x * x + y * y).sqrt();
			let k = (l - config.link_distance) / l * alpha * config.link_strength;
			let (x, y) = (x * k, y * k);
			bodies[t].vx -= x * link.bias;
			bodies[t].vy -= y * link.bias;
			bodies[s].vx += x * (1.0 - link.bias);
			bodies[s].vy += y * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self, alpha: f64) {
		let strength = self.config.charge_strength;
		if strength == 0.0 || self.bodies.len() < 2 {
			return;
		}
		let points: Vec<(f64, f64)> = self.bodies.iter().map(|b| (b.x, b.y)).collect();
		let charges = vec![strength; points.len()];
		let tree = QuadTree::build(&points, &charges);
		let theta2 = self.config.theta * self.config.theta;
		let dmin2 = self.config.charge_distance_min.powi(2);
		let rng = &mut self.rng;

		for (i, body) in self.bodies.iter_mut().enumerate() {
			let (bx, by) = points[i];
			let (mut dvx, mut dvy) = (0.0, 0.0);
			tree.visit(|cell| {
				if !cell.is_leaf {
					let (x, y) = (cell.cx - bx, cell.cy - by);
					let mut l = x * x + y * y;
					if cell.size * cell.size / theta2 >= l {
						return false;
					}
					if l < dmin2 {
						l = (dmin2 * l).sqrt();
					}
					dvx += x * cell.charge * alpha / l;
					dvy += y * cell.charge * alpha / l;
					return true;
				}
				for &j in cell.bodies {
					if j == i {
						continue;
					}
					let (mut x, mut y) = (points[j].0 - bx, points[j].1 - by);
					let mut l = x * x + y * y;
					if x == 0.0 {
						x = jiggle(rng);
						l += x * x;
					}
					if y == 0.0 {
						y = jiggle(rng);
						l += y * y;
					}
					if l < dmin2 {
						l = (dmin2 * l).sqrt();
					}
					let w = charges[j] * alpha / l;
					dvx += x * w;
					dvy += y * w;
				}
				true
			});
			body.vx += dvx;
			body.vy += dvy;
		}
	}

	fn apply_center(&mut self) {
		let n = self.bodies.len() as f64;
		if n == 0.0 {
			return;
		}
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let (dx, dy) = (sx / n - self.center.0, sy / n - self.center.1);
		for body in &mut self.bodies {
			body.x -= dx;
			body.y -= dy;
		}
	}

	/// Pairwise overlap resolution on predicted positions. Quadratic in node
	/// count, which is fine for per-project author networks.
	fn apply_collision(&mut self) {
		let strength = self.config.collision_strength;
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (&self.bodies[i], &self.bodies[j]);
				let r = a.radius + b.radius;
				let mut x = (a.x + a.vx) - (b.x + b.vx);
				let mut y = (a.y + a.vy) - (b.y + b.vy);
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				let (ri2, rj2) = (a.radius * a.radius, b.radius * b.radius);
				if x == 0.0 {
					x = jiggle(&mut self.rng);
					l += x * x;
				}
				if y == 0.0 {
					y = jiggle(&mut self.rng);
					l += y * y;
				}
				let d = l.sqrt();
				let k = (r - d) / d * strength;
				let (x, y) = (x * k, y * k);
				let share = rj2 / (ri2 + rj2);
				self.bodies[i].vx += x * share;
				self.bodies[i].vy += y * share;
				self.bodies[j].vx -= x * (1.0 - share);
				self.bodies[j].vy -= y * (1.0 - share);
			}
		}
	}

	/// Resumes the timer. A graph without bodies never runs.
	pub fn restart(&mut self) {
		if !self.bodies.is_empty() {
			self.running = true;
		}
	}

	/// Halts the timer; positions stay where they are.
	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Whether [`Simulation::advance`] will tick.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Current temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Temperature alpha decays toward; 0 at rest, raised while dragging.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Sets the decay target. Negative values are treated as 0.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.max(0.0);
	}

	/// Parameters in effect, after validation.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Fixes body `index` at (x, y) until [`Simulation::unpin`].
	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(index) {
			body.fx = Some(x);
			body.fy = Some(y);
		}
	}

	/// Releases the pin on body `index`.
	pub fn unpin(&mut self, index: usize) {
		if let Some(body) = self.bodies.get_mut(index) {
			body.fx = None;
			body.fy = None;
		}
	}

	/// All bodies, in node order (later ones are drawn on top).
	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// Body at `index`, if any.
	pub fn body(&self, index: usize) -> Option<&Body> {
		self.bodies.get(index)
	}

	/// Links whose endpoints both resolved.
	pub fn links(&self) -> &[LinkRef] {
		&self.links
	}

	/// Body index of node `id`.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Current position of node `id`.
	pub fn position(&self, id: &str) -> Option<(f64, f64)> {
		self.index_of(id)
			.and_then(|i| self.bodies.get(i))
			.map(|b| (b.x, b.y))
	}

	/// Topmost body within its radius plus `slop` of the world point (x, y).
	/// Later bodies are drawn on top, so they win.
	pub fn node_at(&self, x: f64, y: f64, slop: f64) -> Option<usize> {
		self.node_within(x, y, |_, b| b.radius + slop)
	}

	/// Topmost body whose center lies within `reach(index, body)` of (x, y).
	pub fn node_within<F>(&self, x: f64, y: f64, reach: F) -> Option<usize>
	where
		F: Fn(usize, &Body) -> f64,
	{
		self.bodies.iter().enumerate().rev().find_map(|(i, b)| {
			let (dx, dy) = (b.x - x, b.y - y);
			let r = reach(i, b);
			(dx * dx + dy * dy <= r * r).then_some(i)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::types::{GraphLink, GraphNode};

	fn node(id: &str, papers: u32) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: id.into(),
			papers_count: papers,
			..Default::default()
		}
	}

	fn link(s: &str, t: &str) -> GraphLink {
		GraphLink {
			source: s.into(),
			target: t.into(),
			weight: 1.0,
		}
	}

	fn graph(nodes: &[&str], links: &[(&str, &str)]) -> GraphData {
		GraphData {
			nodes: nodes.iter().map(|id| node(id, 1)).collect(),
			links: links.iter().map(|(s, t)| link(s, t)).collect(),
		}
	}

	fn run_to_rest(sim: &mut Simulation) -> u64 {
		let mut ticks = 0;
		while sim.advance() {
			ticks += 1;
			assert!(ticks < 10_000, "simulation never cooled");
		}
		ticks
	}

	fn distance(sim: &Simulation, a: &str, b: &str) -> f64 {
		let (ax, ay) = sim.position(a).unwrap();
		let (bx, by) = sim.position(b).unwrap();
		((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
	}

	#[test]
	fn cools_to_rest_in_about_three_hundred_ticks() {
		let data = graph(&["a", "b", "c", "d"], &[("a", "b"), ("b", "c"), ("c", "d")]);
		let mut sim = Simulation::new(&data, 800.0, 600.0, &SimulationConfig::default());
		assert!(sim.is_running());
		let ticks = run_to_rest(&mut sim);
		assert!((295..=305).contains(&ticks), "ticks = {ticks}");
		assert!(!sim.is_running());
		assert!(sim.alpha() < sim.config().alpha_min);
		assert!(!sim.advance());
	}

	#[test]
	fn linked_authors_settle_closer_than_strangers() {
		let data = graph(&["a", "b", "loner"], &[("a", "b")]);
		let mut sim = Simulation::new(&data, 800.0, 600.0, &SimulationConfig::default());
		run_to_rest(&mut sim);
		let linked = distance(&sim, "a", "b");
		assert!(linked > 50.0 && linked < 300.0, "linked = {linked}");
		assert!(distance(&sim, "a", "loner") > linked);
	}

	#[test]
	fn layout_is_centered() {
		let data = graph(&["a", "b", "c", "d", "e"], &[("a", "b"), ("a", "c"), ("d", "e")]);
		let mut sim = Simulation::new(&data, 800.0, 600.0, &SimulationConfig::default());
		run_to_rest(&mut sim);
		let n = sim.bodies().len() as f64;
		let mx = sim.bodies().iter().map(|b| b.x).sum::<f64>() / n;
		let my = sim.bodies().iter().map(|b| b.y).sum::<f64>() / n;
		assert!((mx - 400.0).abs() < 5.0, "mx = {mx}");
		assert!((my - 300.0).abs() < 5.0, "my = {my}");
	}

	#[test]
	fn pinned_body_holds_its_pin() {
		let data = graph(&["a", "b"], &[("a", "b")]);
		let mut sim = Simulation::new(&data, 800.0, 600.0, &SimulationConfig::default());
		sim.pin(0, 50.0, 60.0);
		for _ in 0..20 {
			sim.tick();
		}
		let body = sim.body(0).unwrap();
		assert_eq!((body.x, body.y), (50.0, 60.0));
		assert_eq!((body.vx, body.vy), (0.0, 0.0));

		sim.unpin(0);
		assert!(!sim.body(0).unwrap().is_pinned());
	}

	#[test]
	fn alpha_target_keeps_simulation_warm() {
		let data = graph(&["a", "b"], &[("a", "b")]);
		let mut sim = Simulation::new(&data, 800.0, 600.0, &SimulationConfig::default());
		run_to_rest(&mut sim);

		sim.set_alpha_target(0.3);
		sim.restart();
		for _ in 0..1_000 {
			assert!(sim.advance());
		}
		assert!((sim.alpha() - 0.3).abs() < 0.01);

		sim.set_alpha_target(0.0);
		run_to_rest(&mut sim);
		assert!(!sim.is_running());
	}

	#[test]
	fn collision_separates_overlapping_nodes() {
		let data = graph(&["a", "b"], &[]);
		let config = SimulationConfig {
			charge_strength: 0.0,
			..Default::default()
		};
		let mut sim = Simulation::new(&data, 800.0, 600.0, &config);
		let center = (400.0, 300.0);
		sim.bodies[0].x = center.0;
		sim.bodies[0].y = center.1;
		sim.bodies[1].x = center.0;
		sim.bodies[1].y = center.1;
		run_to_rest(&mut sim);
		let min_gap = sim.bodies()[0].radius + sim.bodies()[1].radius;
		assert!(distance(&sim, "a", "b") > 0.9 * min_gap);
	}

	#[test]
	fn collision_radius_follows_rendered_radius() {
		let data = GraphData {
			nodes: vec![node("small", 1), node("big", 100)],
			links: vec![],
		};
		let sim = Simulation::new(&data, 800.0, 600.0, &SimulationConfig::default());
		assert_eq!(sim.bodies()[0].radius, node_radius(1));
		assert_eq!(sim.bodies()[1].radius, 20.0);
	}

	#[test]
	fn unknown_link_endpoints_are_skipped() {
		let data = graph(&["a", "b"], &[("a", "b"), ("a", "ghost")]);
		let sim = Simulation::new(&data, 800.0, 600.0, &SimulationConfig::default());
		assert_eq!(sim.links().len(), 1);
		assert_eq!((sim.links()[0].source, sim.links()[0].target), (0, 1));
	}

	#[test]
	fn empty_graph_never_runs() {
		let mut sim = Simulation::new(&GraphData::default(), 800.0, 600.0, &SimulationConfig::default());
		assert!(!sim.is_running());
		assert!(!sim.advance());
		sim.restart();
		assert!(!sim.is_running());
	}

	#[test]
	fn node_at_prefers_topmost() {
		let data = graph(&["under", "over"], &[]);
		let mut sim = Simulation::new(&data, 800.0, 600.0, &SimulationConfig::default());
		for body in &mut sim.bodies {
			body.x = 100.0;
			body.y = 100.0;
		}
		assert_eq!(sim.node_at(102.0, 100.0, 0.0), Some(1));
		assert_eq!(sim.node_at(300.0, 300.0, 0.0), None);
	}

	#[test]
	fn coincident_layout_is_reproducible() {
		let data = graph(&["a", "b", "c"], &[("a", "b")]);
		let stacked = || {
			let mut sim = Simulation::new(&data, 800.0, 600.0, &SimulationConfig::default());
			for body in &mut sim.bodies {
				body.x = 400.0;
				body.y = 300.0;
			}
			run_to_rest(&mut sim);
			sim.bodies().iter().map(|b| (b.x, b.y)).collect::<Vec<_>>()
		};
		let first = stacked();
		assert_eq!(first, stacked());
		assert!(first.iter().all(|&(x, y)| x.is_finite() && y.is_finite()));
		assert_ne!(first[0], first[1]);
	}

	#[test]
	fn non_cooling_config_falls_back_to_defaults() {
		let config: SimulationConfig =
			serde_json::from_str(r#"{"alpha_decay": 0, "alpha_min": -1, "velocity_decay": 3}"#).unwrap();
		let mut sim = Simulation::new(&graph(&["a", "b"], &[("a", "b")]), 800.0, 600.0, &config);
		let defaults = SimulationConfig::default();
		assert_eq!(sim.config().alpha_decay, defaults.alpha_decay);
		assert_eq!(sim.config().alpha_min, defaults.alpha_min);
		assert_eq!(sim.config().velocity_decay, defaults.velocity_decay);
		assert!(run_to_rest(&mut sim) <= 305);
	}

	#[test]
	fn node_within_uses_custom_reach() {
		let data = graph(&["a"], &[]);
		let mut sim = Simulation::new(&data, 800.0, 600.0, &SimulationConfig::default());
		sim.bodies[0].x = 100.0;
		sim.bodies[0].y = 100.0;
		let r = sim.bodies()[0].radius;
		assert_eq!(sim.node_at(100.0 + r + 1.0, 100.0, 0.0), None);
		assert_eq!(sim.node_within(100.0 + r + 1.0, 100.0, |_, b| b.radius * 1.3), Some(0));
	}

	#[test]
	fn partial_config_json_keeps_defaults() {
		let config: SimulationConfig = serde_json::from_str(r#"{"link_distance": 60}"#).unwrap();
		assert_eq!(config.link_distance, 60.0);
		assert_eq!(config.charge_strength, -300.0);
		assert_eq!(config.link_strength, 0.5);
	}
}
