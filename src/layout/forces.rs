//! Force terms applied once per simulation step.
//!
//! Every force accumulates into node velocities; positions only move during
//! integration. Pinned nodes receive velocity like any other node and have it
//! discarded when integrated, so they still push and pull their neighbours.

use super::simulation::{SimulationEdge, SimulationNode};

/// Squared distances below this are clamped to avoid exploding repulsion.
const MIN_DISTANCE_SQ: f64 = 1.0;
/// Fraction of an overlap corrected per step.
const COLLISION_STRENGTH: f64 = 0.7;

/// Deterministic tiny offset for coincident nodes.
fn jiggle(i: usize, j: usize) -> (f64, f64) {
	let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214) * std::f64::consts::TAU;
	(angle.cos() * 1e-6, angle.sin() * 1e-6)
}

/// Pairwise charge between all nodes. Negative `strength` repels.
pub(crate) fn apply_charge(nodes: &mut [SimulationNode], strength: f64, alpha: f64) {
	let count = nodes.len();
	for i in 0..count {
		for j in (i + 1)..count {
			let (mut dx, mut dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
			let mut dist_sq = dx * dx + dy * dy;
			if dist_sq == 0.0 {
				(dx, dy) = jiggle(i, j);
				dist_sq = dx * dx + dy * dy;
			}
			if dist_sq < MIN_DISTANCE_SQ {
				dist_sq = (MIN_DISTANCE_SQ * dist_sq).sqrt();
			}
			let scale = strength * alpha / dist_sq;
			nodes[i].vx += dx * scale;
			nodes[i].vy += dy * scale;
			nodes[j].vx -= dx * scale;
			nodes[j].vy -= dy * scale;
		}
	}
}

/// Springs along every edge toward `distance`.
///
/// Each spring is weakened for well-connected endpoints and the correction is
/// split so that the endpoint with fewer links moves more.
pub(crate) fn apply_links(
	nodes: &mut [SimulationNode],
	edges: &[SimulationEdge],
	distance: f64,
	alpha: f64,
) {
	let mut degree = vec![0usize; nodes.len()];
	for edge in edges {
		degree[edge.source] += 1;
		degree[edge.target] += 1;
	}

	for edge in edges {
		let (s, t) = (edge.source, edge.target);
		if s == t {
			continue;
		}
		let mut dx = nodes[t].x + nodes[t].vx - nodes[s].x - nodes[s].vx;
		let mut dy = nodes[t].y + nodes[t].vy - nodes[s].y - nodes[s].vy;
		if dx == 0.0 && dy == 0.0 {
			(dx, dy) = jiggle(s, t);
		}
		let length = (dx * dx + dy * dy).sqrt();
		let strength = 1.0 / degree[s].min(degree[t]) as f64;
		let factor = (length - distance) / length * alpha * strength;
		dx *= factor;
		dy *= factor;

		let bias = degree[s] as f64 / (degree[s] + degree[t]) as f64;
		nodes[t].vx -= dx * bias;
		nodes[t].vy -= dy * bias;
		nodes[s].vx += dx * (1.0 - bias);
		nodes[s].vy += dy * (1.0 - bias);
	}
}

/// Weak pull of every node toward `(cx, cy)`.
pub(crate) fn apply_centering(
	nodes: &mut [SimulationNode],
	(cx, cy): (f64, f64),
	strength: f64,
	alpha: f64,
) {
	for node in nodes {
		node.vx += (cx - node.x) * strength * alpha;
		node.vy += (cy - node.y) * strength * alpha;
	}
}

/// Push apart nodes whose radii overlap, weighted so smaller nodes yield.
pub(crate) fn apply_collision(nodes: &mut [SimulationNode]) {
	let count = nodes.len();
	for i in 0..count {
		for j in (i + 1)..count {
			let (ri, rj) = (nodes[i].radius, nodes[j].radius);
			let reach = ri + rj;
			if reach <= 0.0 {
				continue;
			}
			let mut dx = nodes[i].x + nodes[i].vx - nodes[j].x - nodes[j].vx;
			let mut dy = nodes[i].y + nodes[i].vy - nodes[j].y - nodes[j].vy;
			let mut dist_sq = dx * dx + dy * dy;
			if dist_sq >= reach * reach {
				continue;
			}
			if dist_sq == 0.0 {
				(dx, dy) = jiggle(i, j);
				dist_sq = dx * dx + dy * dy;
			}
			let dist = dist_sq.sqrt();
			let push = (reach - dist) / dist * COLLISION_STRENGTH;
			dx *= push;
			dy *= push;

			let (ri2, rj2) = (ri * ri, rj * rj);
			let share = rj2 / (ri2 + rj2);
			nodes[i].vx += dx * share;
			nodes[i].vy += dy * share;
			nodes[j].vx -= dx * (1.0 - share);
			nodes[j].vy -= dy * (1.0 - share);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{NodeType, Relationship};

	fn node(x: f64, y: f64, radius: f64) -> SimulationNode {
		SimulationNode {
			id: format!("{x},{y}"),
			label: String::new(),
			node_type: NodeType::Media,
			radius,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	fn edge(source: usize, target: usize) -> SimulationEdge {
		SimulationEdge {
			source,
			target,
			relationship: Relationship::new("grant"),
			amount: None,
		}
	}

	#[test]
	fn test_charge_repels_symmetrically() {
		let mut nodes = vec![node(0.0, 0.0, 1.0), node(10.0, 0.0, 1.0)];
		apply_charge(&mut nodes, -300.0, 1.0);
		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
		assert_eq!(nodes[0].vx, -nodes[1].vx);
		assert_eq!(nodes[0].vy, 0.0);
	}

	#[test]
	fn test_charge_separates_coincident_nodes() {
		let mut nodes = vec![node(5.0, 5.0, 1.0), node(5.0, 5.0, 1.0)];
		apply_charge(&mut nodes, -300.0, 1.0);
		assert!(nodes[0].vx != 0.0 || nodes[0].vy != 0.0);
		assert!(nodes.iter().all(|n| n.vx.is_finite() && n.vy.is_finite()));
	}

	#[test]
	fn test_link_pulls_distant_nodes_together() {
		let mut nodes = vec![node(0.0, 0.0, 1.0), node(200.0, 0.0, 1.0)];
		apply_links(&mut nodes, &[edge(0, 1)], 50.0, 1.0);
		assert!(nodes[0].vx > 0.0);
		assert!(nodes[1].vx < 0.0);
	}

	#[test]
	fn test_link_pushes_close_nodes_apart() {
		let mut nodes = vec![node(0.0, 0.0, 1.0), node(10.0, 0.0, 1.0)];
		apply_links(&mut nodes, &[edge(0, 1)], 50.0, 1.0);
		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
	}

	#[test]
	fn test_self_loop_ignored() {
		let mut nodes = vec![node(0.0, 0.0, 1.0)];
		apply_links(&mut nodes, &[edge(0, 0)], 50.0, 1.0);
		assert_eq!((nodes[0].vx, nodes[0].vy), (0.0, 0.0));
	}

	#[test]
	fn test_centering_pulls_inward() {
		let mut nodes = vec![node(0.0, 100.0, 1.0)];
		apply_centering(&mut nodes, (50.0, 50.0), 0.1, 1.0);
		assert_eq!((nodes[0].vx, nodes[0].vy), (5.0, -5.0));
	}

	#[test]
	fn test_collision_only_when_overlapping() {
		let mut apart = vec![node(0.0, 0.0, 5.0), node(20.0, 0.0, 5.0)];
		apply_collision(&mut apart);
		assert_eq!(apart[0].vx, 0.0);

		let mut overlapping = vec![node(0.0, 0.0, 5.0), node(6.0, 0.0, 5.0)];
		apply_collision(&mut overlapping);
		assert!(overlapping[0].vx < 0.0);
		assert!(overlapping[1].vx > 0.0);
	}

	#[test]
	fn test_collision_moves_smaller_node_more() {
		let mut nodes = vec![node(0.0, 0.0, 2.0), node(4.0, 0.0, 6.0)];
		apply_collision(&mut nodes);
		assert!(nodes[0].vx.abs() > nodes[1].vx.abs());
	}
}
