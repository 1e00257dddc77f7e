//! Force-directed layout state and stepping.
//!
//! Nodes live in an owned arena; edges refer to them by arena index. The
//! simulation is driven externally, one [`Simulation::step`] per scheduled
//! callback, and can be stopped or restarted between any two steps.

use std::collections::HashMap;
use std::f64::consts::TAU;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::config::LayoutConfig;
use super::forces;
use crate::graph::{Edge, Node, NodeType, Relationship};

/// Donors are drawn, and collide, larger than other entities.
const DONOR_RADIUS_SCALE: f64 = 1.5;

/// A node with layout state attached.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationNode {
	/// Id of the graph node.
	pub id: String,
	/// Text drawn next to the node.
	pub label: String,
	/// Drives colour and radius.
	pub node_type: NodeType,
	/// Collision radius.
	pub radius: f64,
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Fixed x while pinned.
	pub fx: Option<f64>,
	/// Fixed y while pinned.
	pub fy: Option<f64>,
}

impl SimulationNode {
	/// Whether the node is held in place.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// An edge between two arena slots.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationEdge {
	/// Arena index of the source node.
	pub source: usize,
	/// Arena index of the target node.
	pub target: usize,
	/// Relationship of the underlying edge.
	pub relationship: Relationship,
	/// Amount of the underlying edge.
	pub amount: Option<f64>,
}

/// Lifecycle of a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPhase {
	/// Forces are being applied each step.
	Running,
	/// Alpha dropped below the threshold; steps are no-ops until restarted.
	Settled,
	/// Halted by the caller; steps are no-ops until restarted.
	Stopped,
}

/// Force-directed layout over an owned node arena.
pub struct Simulation {
	config: LayoutConfig,
	nodes: Vec<SimulationNode>,
	edges: Vec<SimulationEdge>,
	index: HashMap<String, usize>,
	alpha: f64,
	alpha_decay: f64,
	phase: LayoutPhase,
	steps: u64,
	rng: SmallRng,
}

impl Simulation {
	/// Lay out `nodes` and `edges`, skipping duplicate ids and dangling edges.
	pub fn new(nodes: &[Node], edges: &[Edge], config: LayoutConfig) -> Self {
		let config = config.sanitized();
		let mut simulation = Self {
			alpha_decay: config.effective_alpha_decay(),
			rng: SmallRng::seed_from_u64(config.seed),
			config,
			nodes: Vec::new(),
			edges: Vec::new(),
			index: HashMap::new(),
			alpha: 0.0,
			phase: LayoutPhase::Settled,
			steps: 0,
		};
		simulation.set_graph(nodes, edges);
		simulation
	}

	/// Replace the graph and start over from fresh random positions.
	pub fn set_graph(&mut self, nodes: &[Node], edges: &[Edge]) {
		let (cx, cy) = self.config.center();
		self.nodes.clear();
		self.edges.clear();
		self.index.clear();

		for node in nodes {
			if self.index.contains_key(&node.id) {
				continue;
			}
			let angle = self.rng.gen_range(0.0..TAU);
			let distance = self.config.jitter_radius * self.rng.gen_range(0.0f64..1.0).sqrt();
			let radius = match node.node_type() {
				NodeType::Donor => self.config.collision_radius * DONOR_RADIUS_SCALE,
				_ => self.config.collision_radius,
			};
			self.index.insert(node.id.clone(), self.nodes.len());
			self.nodes.push(SimulationNode {
				id: node.id.clone(),
				label: node.name.clone(),
				node_type: node.node_type(),
				radius,
				x: cx + distance * angle.cos(),
				y: cy + distance * angle.sin(),
				vx: 0.0,
				vy: 0.0,
				fx: None,
				fy: None,
			});
		}

		let mut dangling = 0usize;
		for edge in edges {
			match (self.index.get(&edge.source), self.index.get(&edge.target)) {
				(Some(&source), Some(&target)) => self.edges.push(SimulationEdge {
					source,
					target,
					relationship: edge.relationship.clone(),
					amount: edge.amount,
				}),
				_ => dangling += 1,
			}
		}
		if dangling > 0 {
			debug!("layout skipped {dangling} edges with unknown endpoints");
		}

		self.steps = 0;
		if self.nodes.is_empty() {
			self.alpha = 0.0;
			self.phase = LayoutPhase::Settled;
		} else {
			self.alpha = 1.0;
			self.phase = LayoutPhase::Running;
		}
	}

	/// Advance one step. Returns whether any state changed.
	pub fn step(&mut self) -> bool {
		if self.phase != LayoutPhase::Running {
			return false;
		}
		self.alpha += (0.0 - self.alpha) * self.alpha_decay;
		let alpha = self.alpha;

		forces::apply_charge(&mut self.nodes, self.config.charge_strength, alpha);
		forces::apply_links(&mut self.nodes, &self.edges, self.config.link_distance, alpha);
		forces::apply_centering(
			&mut self.nodes,
			self.config.center(),
			self.config.center_strength,
			alpha,
		);
		forces::apply_collision(&mut self.nodes);
		self.integrate();

		self.steps += 1;
		if self.alpha < self.config.alpha_min {
			self.phase = LayoutPhase::Settled;
			info!("layout settled after {} steps", self.steps);
		}
		true
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}

	/// Step until settled or `max_steps` have run. Returns the steps taken.
	pub fn run_until_settled(&mut self, max_steps: usize) -> usize {
		let mut taken = 0;
		while taken < max_steps && self.step() {
			taken += 1;
		}
		taken
	}

	/// Re-energise without moving anything.
	pub fn restart(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		self.alpha = 1.0;
		self.phase = LayoutPhase::Running;
		debug!("layout restarted");
	}

	/// Freeze the layout. Steps do nothing until [`Simulation::restart`].
	pub fn stop(&mut self) {
		if self.phase == LayoutPhase::Running {
			self.phase = LayoutPhase::Stopped;
		}
	}

	/// Fix a node at `(x, y)` and wake the simulation so neighbours react.
	/// Returns `false` for unknown ids.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) -> bool {
		let Some(&slot) = self.index.get(id) else {
			return false;
		};
		let node = &mut self.nodes[slot];
		node.fx = Some(x);
		node.fy = Some(y);
		node.x = x;
		node.y = y;
		node.vx = 0.0;
		node.vy = 0.0;

		if self.phase != LayoutPhase::Stopped {
			self.alpha = self.alpha.max(self.config.drag_alpha);
			if self.alpha >= self.config.alpha_min {
				self.phase = LayoutPhase::Running;
			}
		}
		true
	}

	/// Let a pinned node move freely again. Returns `false` for unknown ids.
	pub fn release(&mut self, id: &str) -> bool {
		let Some(&slot) = self.index.get(id) else {
			return false;
		};
		self.nodes[slot].fx = None;
		self.nodes[slot].fy = None;
		true
	}

	/// Move the centre of attraction, e.g. after the canvas is resized.
	pub fn resize(&mut self, width: f64, height: f64) {
		if width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0 {
			self.config.width = width;
			self.config.height = height;
		}
	}

	/// Current alpha.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Current phase.
	pub fn phase(&self) -> LayoutPhase {
		self.phase
	}

	/// Whether alpha has dropped below the threshold.
	pub fn is_settled(&self) -> bool {
		self.phase == LayoutPhase::Settled
	}

	/// Steps taken since the graph was set.
	pub fn steps(&self) -> u64 {
		self.steps
	}

	/// Effective, sanitised configuration.
	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	/// Nodes in arena order.
	pub fn nodes(&self) -> &[SimulationNode] {
		&self.nodes
	}

	/// Edges by arena index.
	pub fn edges(&self) -> &[SimulationEdge] {
		&self.edges
	}

	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&SimulationNode> {
		self.index.get(id).map(|&slot| &self.nodes[slot])
	}

	/// Position of a node by id.
	pub fn position(&self, id: &str) -> Option<(f64, f64)> {
		self.node(id).map(|n| (n.x, n.y))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::sample::demo_network;

	fn demo() -> Simulation {
		let graph = demo_network();
		Simulation::new(&graph.nodes, &graph.links, LayoutConfig::default())
	}

	#[test]
	fn test_initial_positions_near_center() {
		let sim = demo();
		let (cx, cy) = sim.config().center();
		for node in sim.nodes() {
			let d = ((node.x - cx).powi(2) + (node.y - cy).powi(2)).sqrt();
			assert!(d <= sim.config().jitter_radius + 1e-9);
		}
		assert_eq!(sim.alpha(), 1.0);
		assert_eq!(sim.phase(), LayoutPhase::Running);
	}

	#[test]
	fn test_donor_radius_scaled() {
		let sim = demo();
		let base = sim.config().collision_radius;
		assert_eq!(sim.node("d-hale").unwrap().radius, base * 1.5);
		assert_eq!(sim.node("m-wire").unwrap().radius, base);
	}

	#[test]
	fn test_settles_and_then_freezes() {
		let mut sim = demo();
		let taken = sim.run_until_settled(10_000);
		assert!(sim.is_settled());
		assert!(taken < 1_000, "took {taken} steps");

		let before: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		for _ in 0..10 {
			assert!(!sim.step());
		}
		let after: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn test_layout_spreads_nodes_apart() {
		let mut sim = demo();
		sim.run_until_settled(10_000);
		let nodes = sim.nodes();
		for (i, a) in nodes.iter().enumerate() {
			for b in &nodes[i + 1..] {
				let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
				assert!(d > 1.0, "{} and {} overlap", a.id, b.id);
			}
		}
	}

	#[test]
	fn test_restart_keeps_positions() {
		let mut sim = demo();
		sim.run_until_settled(10_000);
		let before = sim.position("f-civic");
		sim.restart();
		assert_eq!(sim.alpha(), 1.0);
		assert_eq!(sim.phase(), LayoutPhase::Running);
		assert_eq!(sim.position("f-civic"), before);
	}

	#[test]
	fn test_pin_holds_position() {
		let mut sim = demo();
		assert!(sim.pin("f-civic", 10.0, 20.0));
		for _ in 0..50 {
			sim.step();
		}
		assert_eq!(sim.position("f-civic"), Some((10.0, 20.0)));
		assert!(sim.node("f-civic").unwrap().is_pinned());

		assert!(sim.release("f-civic"));
		sim.restart();
		for _ in 0..5 {
			sim.step();
		}
		assert_ne!(sim.position("f-civic"), Some((10.0, 20.0)));
	}

	#[test]
	fn test_pin_wakes_settled_simulation() {
		let mut sim = demo();
		sim.run_until_settled(10_000);
		sim.pin("m-ledger", 0.0, 0.0);
		assert_eq!(sim.phase(), LayoutPhase::Running);
		assert!(sim.alpha() >= sim.config().drag_alpha);
	}

	#[test]
	fn test_pin_unknown_id() {
		let mut sim = demo();
		assert!(!sim.pin("nobody", 0.0, 0.0));
		assert!(!sim.release("nobody"));
	}

	#[test]
	fn test_stop_and_restart() {
		let mut sim = demo();
		sim.step();
		sim.stop();
		assert_eq!(sim.phase(), LayoutPhase::Stopped);
		let before = sim.position("d-hale");
		assert!(!sim.step());
		assert_eq!(sim.position("d-hale"), before);
		sim.restart();
		assert!(sim.step());
	}

	#[test]
	fn test_empty_graph_is_settled() {
		let mut sim = Simulation::new(&[], &[], LayoutConfig::default());
		assert!(sim.is_settled());
		assert!(!sim.step());
		sim.restart();
		assert!(sim.is_settled());
		assert!(sim.nodes().is_empty());
	}

	#[test]
	fn test_dangling_edges_and_duplicates_dropped() {
		let nodes = vec![
			Node::new("a", "A", NodeType::Donor),
			Node::new("a", "A again", NodeType::Media),
			Node::new("b", "B", NodeType::Media),
		];
		let edges = vec![Edge::new("a", "b", "grant"), Edge::new("a", "zzz", "grant")];
		let sim = Simulation::new(&nodes, &edges, LayoutConfig::default());
		assert_eq!(sim.nodes().len(), 2);
		assert_eq!(sim.edges().len(), 1);
		assert_eq!(sim.node("a").unwrap().label, "A");
	}

	#[test]
	fn test_set_graph_reinitializes() {
		let mut sim = demo();
		sim.run_until_settled(10_000);
		let graph = demo_network();
		sim.set_graph(&graph.nodes[..3], &graph.links);
		assert_eq!(sim.nodes().len(), 3);
		assert_eq!(sim.alpha(), 1.0);
		assert_eq!(sim.steps(), 0);
	}

	#[test]
	fn test_same_seed_same_layout() {
		let mut a = demo();
		let mut b = demo();
		a.run_until_settled(10_000);
		b.run_until_settled(10_000);
		assert_eq!(a.nodes(), b.nodes());
	}
}
