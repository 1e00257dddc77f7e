//! Throttled snapshot delivery on top of [`Simulation`].

use serde::Serialize;

use super::config::LayoutConfig;
use super::simulation::{LayoutPhase, Simulation, SimulationEdge, SimulationNode};
use crate::graph::{Edge, Node};

/// An owned copy of the layout at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot {
	/// Node positions at capture time.
	pub nodes: Vec<SimulationNode>,
	/// Edges by index into `nodes`.
	pub edges: Vec<SimulationEdge>,
	/// Simulation alpha at capture time.
	pub alpha: f64,
	/// Whether the layout had settled.
	pub settled: bool,
}

impl Snapshot {
	fn capture(simulation: &Simulation) -> Self {
		Self {
			nodes: simulation.nodes().to_vec(),
			edges: simulation.edges().to_vec(),
			alpha: simulation.alpha(),
			settled: simulation.is_settled(),
		}
	}
}

/// Handle returned by [`Layout::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Subscriber = Box<dyn FnMut(&Snapshot)>;

/// A simulation plus the render sinks watching it.
///
/// Subscribers see a snapshot every `emit_interval` steps and always on the
/// step that settles the layout.
pub struct Layout {
	simulation: Simulation,
	subscribers: Vec<(SubscriptionId, Subscriber)>,
	next_subscription: usize,
	emit_interval: usize,
	steps_since_emit: usize,
}

impl Layout {
	/// Build a layout with no subscribers.
	pub fn new(nodes: &[Node], edges: &[Edge], config: LayoutConfig) -> Self {
		let simulation = Simulation::new(nodes, edges, config);
		Self {
			emit_interval: simulation.config().emit_interval,
			simulation,
			subscribers: Vec::new(),
			next_subscription: 0,
			steps_since_emit: 0,
		}
	}

	/// Register a render sink. It immediately receives the current snapshot.
	pub fn subscribe(&mut self, mut on_snapshot: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.next_subscription);
		self.next_subscription += 1;
		on_snapshot(&self.snapshot());
		self.subscribers.push((id, Box::new(on_snapshot)));
		id
	}

	/// Remove a subscriber. Returns whether it was registered.
	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let before = self.subscribers.len();
		self.subscribers.retain(|(sub, _)| *sub != id);
		self.subscribers.len() != before
	}

	/// Run one scheduled step, notifying subscribers when due. Returns whether
	/// the layout changed.
	pub fn tick(&mut self) -> bool {
		if !self.simulation.step() {
			return false;
		}
		self.steps_since_emit += 1;
		if self.simulation.is_settled() || self.steps_since_emit >= self.emit_interval {
			self.emit();
		}
		true
	}

	fn emit(&mut self) {
		self.steps_since_emit = 0;
		if self.subscribers.is_empty() {
			return;
		}
		let snapshot = Snapshot::capture(&self.simulation);
		for (_, subscriber) in &mut self.subscribers {
			subscriber(&snapshot);
		}
	}

	/// Capture the current state.
	pub fn snapshot(&self) -> Snapshot {
		Snapshot::capture(&self.simulation)
	}

	/// Swap in a new graph, discarding all positions.
	pub fn set_graph(&mut self, nodes: &[Node], edges: &[Edge]) {
		self.simulation.set_graph(nodes, edges);
		self.emit();
	}

	/// See [`Simulation::restart`].
	pub fn restart(&mut self) {
		self.simulation.restart();
	}

	/// See [`Simulation::stop`].
	pub fn stop(&mut self) {
		self.simulation.stop();
	}

	/// Pin a node, e.g. while it is dragged. Subscribers see the new position
	/// right away.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) -> bool {
		let pinned = self.simulation.pin(id, x, y);
		if pinned {
			self.emit();
		}
		pinned
	}

	/// Unpin a node.
	pub fn release(&mut self, id: &str) -> bool {
		self.simulation.release(id)
	}

	/// See [`Simulation::resize`].
	pub fn resize(&mut self, width: f64, height: f64) {
		self.simulation.resize(width, height);
	}

	/// Current phase.
	pub fn phase(&self) -> LayoutPhase {
		self.simulation.phase()
	}

	/// Whether the layout has settled.
	pub fn is_settled(&self) -> bool {
		self.simulation.is_settled()
	}

	/// The underlying simulation.
	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}
}

/// Build a layout for `nodes` and `edges`.
pub fn create_layout(nodes: &[Node], edges: &[Edge], config: LayoutConfig) -> Layout {
	Layout::new(nodes, edges, config)
}
