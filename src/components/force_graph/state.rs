use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::graph::GraphData;
use crate::layout::{Layout, LayoutConfig, Snapshot};

/// Extra world-space slack around a node when hit-testing.
pub const HIT_SLOP: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub node_id: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// Canvas-side state: the layout, the latest snapshot it emitted, and the
/// view/interaction state layered on top.
pub struct ForceGraphState {
	pub layout: Layout,
	/// Most recent snapshot delivered by the layout.
	pub frame: Rc<RefCell<Snapshot>>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	neighbors: Vec<Vec<usize>>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, config: LayoutConfig) -> Self {
		let (width, height) = (config.width, config.height);
		let mut layout = Layout::new(&data.nodes, &data.links, config);

		let frame = Rc::new(RefCell::new(Snapshot::default()));
		let sink = frame.clone();
		layout.subscribe(move |snapshot| *sink.borrow_mut() = snapshot.clone());

		let simulation = layout.simulation();
		let mut neighbors = vec![Vec::new(); simulation.nodes().len()];
		for edge in simulation.edges() {
			neighbors[edge.source].push(edge.target);
			neighbors[edge.target].push(edge.source);
		}

		Self {
			layout,
			frame,
			neighbors,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// Last drawn wins, matching what is on top.
		self.frame.borrow().nodes.iter().rposition(|node| {
			let (dx, dy) = (node.x - gx, node.y - gy);
			(dx * dx + dy * dy).sqrt() < node.radius + HIT_SLOP
		})
	}

	pub fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64) {
		let Some((id, x, y)) = self
			.frame
			.borrow()
			.nodes
			.get(idx)
			.map(|n| (n.id.clone(), n.x, n.y))
		else {
			return;
		};
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			node_id: Some(id.clone()),
			start_x: sx,
			start_y: sy,
			node_start_x: x,
			node_start_y: y,
		};
		self.layout.pin(&id, x, y);
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(id) = self.drag.node_id.clone() else {
			return;
		};
		let (dx, dy) = (
			(sx - self.drag.start_x) / self.transform.k,
			(sy - self.drag.start_y) / self.transform.k,
		);
		self.layout
			.pin(&id, self.drag.node_start_x + dx, self.drag.node_start_y + dy);
	}

	pub fn end_drag(&mut self) {
		if let Some(id) = self.drag.node_id.take() {
			self.layout.release(&id);
		}
		self.drag = DragState::default();
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			if let Some(adjacent) = self.neighbors.get(idx) {
				self.hover.neighbors.extend(adjacent.iter().copied());
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// One animation frame: a layout step plus highlight easing.
	pub fn tick(&mut self, dt: f64) {
		self.layout.tick();
		self.flow_time += dt;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.layout.resize(width, height);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::sample::demo_network;

	fn state() -> ForceGraphState {
		ForceGraphState::new(&demo_network(), LayoutConfig::default())
	}

	#[test]
	fn test_frame_tracks_layout() {
		let mut s = state();
		assert_eq!(s.frame.borrow().nodes.len(), demo_network().nodes.len());
		for _ in 0..400 {
			s.tick(0.016);
		}
		assert!(s.frame.borrow().settled);
	}

	#[test]
	fn test_drag_pins_then_releases() {
		let mut s = state();
		let (x, y) = {
			let frame = s.frame.borrow();
			(frame.nodes[0].x, frame.nodes[0].y)
		};
		assert!(s.node_at_position(x, y).is_some());
		s.begin_drag(0, x, y);
		s.drag_to(x + 30.0, y - 10.0);
		let id = s.drag.node_id.clone().unwrap();
		s.tick(0.016);
		assert_eq!(s.layout.simulation().position(&id), Some((x + 30.0, y - 10.0)));

		s.end_drag();
		assert!(!s.drag.active);
		assert!(!s.layout.simulation().node(&id).unwrap().is_pinned());
	}

	#[test]
	fn test_hover_collects_neighbors() {
		let mut s = state();
		let hub = s
			.frame
			.borrow()
			.nodes
			.iter()
			.position(|n| n.id == "f-civic")
			.unwrap();
		s.set_hover(Some(hub));
		assert_eq!(s.hover.neighbors.len(), 3);
		assert!(s.is_hovered(hub));
		s.set_hover(None);
		assert_eq!(s.hover.prev_node, Some(hub));
		assert!(s.has_active_highlight());
	}

	#[test]
	fn test_resize_moves_layout_centre() {
		let mut s = state();
		s.resize(1200.0, 900.0);
		assert_eq!((s.width, s.height), (1200.0, 900.0));
		assert_eq!(s.layout.simulation().config().center(), (600.0, 450.0));
		s.resize(0.0, -5.0);
		assert_eq!(s.layout.simulation().config().center(), (600.0, 450.0));
	}
}
