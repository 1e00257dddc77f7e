//! Multi-hop money-trail discovery.

use std::collections::{HashSet, VecDeque};

use log::debug;

use super::adjacency::AdjacencyIndex;
use super::types::{Edge, GraphData, NodeType, Relationship};

/// Options for [`find_paths`].
#[derive(Clone, Debug)]
pub struct PathOptions {
	/// Maximum number of edges in a returned path. Zero yields no paths.
	pub max_hops: usize,
	/// Only traverse edges with one of these relationships.
	pub relationship_filter: Option<HashSet<Relationship>>,
	/// Only step onto nodes of these types. The start node is exempt.
	pub node_type_filter: Option<HashSet<NodeType>>,
	/// Keep at most this many paths after ranking.
	pub limit: Option<usize>,
}

impl PathOptions {
	/// Default filters with the given hop limit.
	pub fn new(max_hops: usize) -> Self {
		Self {
			max_hops,
			relationship_filter: None,
			node_type_filter: None,
			limit: None,
		}
	}

	/// Only follow edges with one of these relationships.
	pub fn relationships<I, R>(mut self, relationships: I) -> Self
	where
		I: IntoIterator<Item = R>,
		R: Into<Relationship>,
	{
		self.relationship_filter = Some(relationships.into_iter().map(Into::into).collect());
		self
	}

	/// Only step onto nodes of these types.
	pub fn node_types(mut self, types: impl IntoIterator<Item = NodeType>) -> Self {
		self.node_type_filter = Some(types.into_iter().collect());
		self
	}

	/// Keep at most `limit` paths after ranking.
	pub fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}
}

impl Default for PathOptions {
	fn default() -> Self {
		Self::new(3)
	}
}

/// A simple path through the graph, borrowed from the [`GraphData`] it was
/// found in.
#[derive(Clone, Debug, PartialEq)]
pub struct Path<'g> {
	/// Node ids from start to end.
	pub nodes: Vec<&'g str>,
	/// `edges[i]` joins `nodes[i]` and `nodes[i + 1]`.
	pub edges: Vec<&'g Edge>,
	/// Sum of the stored amounts of every edge on the path.
	pub amount: f64,
}

impl<'g> Path<'g> {
	/// First node id. `None` only for a hand-built empty path.
	pub fn start(&self) -> Option<&'g str> {
		self.nodes.first().copied()
	}

	/// Last node id. `None` only for a hand-built empty path.
	pub fn end(&self) -> Option<&'g str> {
		self.nodes.last().copied()
	}

	/// Number of edges.
	pub fn hops(&self) -> usize {
		self.edges.len()
	}
}

struct Frontier<'g> {
	current: &'g str,
	nodes: Vec<&'g str>,
	edges: Vec<&'g Edge>,
	amount: f64,
}

/// Find simple paths from `start`, ranked by cumulative amount (highest
/// first).
///
/// With `end` set, only paths that finish at `end` are returned. Without it,
/// every simple path of one to `max_hops` edges leaving `start` is returned,
/// prefixes included. Edges are followed in either direction and their
/// amount is counted as stored. An unknown `start` or `max_hops == 0` gives an
/// empty result.
pub fn find_paths<'g>(
	graph: &'g GraphData,
	start: &str,
	end: Option<&str>,
	options: &PathOptions,
) -> Vec<Path<'g>> {
	let nodes = graph.node_index();
	let Some(&start_node) = nodes.get(start) else {
		return Vec::new();
	};
	if options.max_hops == 0 {
		return Vec::new();
	}

	let adjacency = AdjacencyIndex::build(graph, options.relationship_filter.as_ref());
	let max_len = options.max_hops + 1;
	let mut results = Vec::new();
	let mut queue = VecDeque::new();
	queue.push_back(Frontier {
		current: start_node.id.as_str(),
		nodes: vec![start_node.id.as_str()],
		edges: Vec::new(),
		amount: 0.0,
	});

	while let Some(state) = queue.pop_front() {
		if state.nodes.len() > 1 {
			let reached_end = end.is_some_and(|e| e == state.current);
			if end.is_none() || reached_end {
				results.push(Path {
					nodes: state.nodes.clone(),
					edges: state.edges.clone(),
					amount: state.amount,
				});
			}
			if reached_end {
				continue;
			}
		}
		if state.nodes.len() >= max_len {
			continue;
		}

		for neighbor in adjacency.neighbors(state.current) {
			if state.nodes.contains(&neighbor.id) {
				continue;
			}
			let Some(&next) = nodes.get(neighbor.id) else {
				continue;
			};
			if let Some(types) = &options.node_type_filter {
				if !types.contains(&next.node_type()) {
					continue;
				}
			}

			let mut path_nodes = state.nodes.clone();
			path_nodes.push(next.id.as_str());
			let mut path_edges = state.edges.clone();
			path_edges.push(neighbor.edge);
			queue.push_back(Frontier {
				current: next.id.as_str(),
				nodes: path_nodes,
				edges: path_edges,
				amount: state.amount + neighbor.edge.amount_or_zero(),
			});
		}
	}

	results.sort_by(|a, b| b.amount.total_cmp(&a.amount));
	if let Some(limit) = options.limit {
		results.truncate(limit);
	}
	debug!(
		"find_paths from {start} to {end:?} within {} hops: {} paths",
		options.max_hops,
		results.len()
	);
	results
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::Node;

	fn chain() -> GraphData {
		GraphData::new(
			vec![
				Node::new("A", "Donor A", NodeType::Donor),
				Node::new("B", "Fund B", NodeType::Foundation),
				Node::new("C", "Outlet C", NodeType::Media),
			],
			vec![
				Edge::new("A", "B", "grant").with_amount(1_000_000.0),
				Edge::new("B", "C", "funder").with_amount(900_000.0),
			],
		)
	}

	#[test]
	fn test_all_paths_ranked_by_amount() {
		let g = chain();
		let paths = find_paths(&g, "A", None, &PathOptions::new(2));
		assert_eq!(paths.len(), 2);
		assert_eq!(paths[0].nodes, ["A", "B", "C"]);
		assert_eq!(paths[0].amount, 1_900_000.0);
		assert_eq!(paths[1].nodes, ["A", "B"]);
		assert_eq!(paths[1].amount, 1_000_000.0);
	}

	#[test]
	fn test_hop_budget() {
		let g = chain();
		let paths = find_paths(&g, "A", None, &PathOptions::new(1));
		assert_eq!(paths.len(), 1);
		assert_eq!(paths[0].hops(), 1);
	}

	#[test]
	fn test_targeted_search_traverses_backwards() {
		let g = chain();
		let paths = find_paths(&g, "C", Some("A"), &PathOptions::new(3));
		assert_eq!(paths.len(), 1);
		assert_eq!(paths[0].nodes, ["C", "B", "A"]);
		assert_eq!(paths[0].start(), Some("C"));
		assert_eq!(paths[0].end(), Some("A"));
		assert_eq!(paths[0].amount, 1_900_000.0);
	}

	#[test]
	fn test_targeted_search_out_of_reach() {
		let g = chain();
		assert!(find_paths(&g, "A", Some("C"), &PathOptions::new(1)).is_empty());
	}

	#[test]
	fn test_start_equals_end_is_empty() {
		let g = chain();
		assert!(find_paths(&g, "A", Some("A"), &PathOptions::new(3)).is_empty());
	}

	#[test]
	fn test_unknown_start_or_zero_hops() {
		let g = chain();
		assert!(find_paths(&g, "Z", None, &PathOptions::new(3)).is_empty());
		assert!(find_paths(&g, "A", None, &PathOptions::new(0)).is_empty());
	}

	#[test]
	fn test_cycles_produce_simple_paths() {
		let mut g = chain();
		g.links.push(Edge::new("C", "A", "owner").with_amount(5.0));
		let paths = find_paths(&g, "A", None, &PathOptions::new(5));
		for path in &paths {
			let unique: HashSet<_> = path.nodes.iter().collect();
			assert_eq!(unique.len(), path.nodes.len());
		}
		// A-B, A-B-C, A-C, A-C-B
		assert_eq!(paths.len(), 4);
	}

	#[test]
	fn test_node_type_filter_exempts_start() {
		let g = chain();
		let options = PathOptions::new(3).node_types([NodeType::Foundation]);
		let paths = find_paths(&g, "A", None, &options);
		assert_eq!(paths.len(), 1);
		assert_eq!(paths[0].nodes, ["A", "B"]);
	}

	#[test]
	fn test_relationship_filter() {
		let g = chain();
		let options = PathOptions::new(3).relationships(["funder"]);
		assert!(find_paths(&g, "A", None, &options).is_empty());
		let from_b = find_paths(&g, "B", None, &options);
		assert_eq!(from_b.len(), 1);
		assert_eq!(from_b[0].nodes, ["B", "C"]);
	}

	#[test]
	fn test_dangling_edges_are_skipped() {
		let mut g = chain();
		g.links.push(Edge::new("A", "ghost", "grant").with_amount(1e9));
		let paths = find_paths(&g, "A", None, &PathOptions::new(2));
		assert!(paths.iter().all(|p| !p.nodes.contains(&"ghost")));
	}

	#[test]
	fn test_parallel_edges_are_distinct_paths() {
		let mut g = chain();
		g.links.push(Edge::new("B", "A", "board"));
		let paths = find_paths(&g, "A", Some("B"), &PathOptions::new(1));
		assert_eq!(paths.len(), 2);
	}

	#[test]
	fn test_limit_truncates_after_ranking() {
		let g = chain();
		let paths = find_paths(&g, "A", None, &PathOptions::new(2).limit(1));
		assert_eq!(paths.len(), 1);
		assert_eq!(paths[0].nodes, ["A", "B", "C"]);
	}

	#[test]
	fn test_empty_path_has_no_endpoints() {
		let path = Path {
			nodes: Vec::new(),
			edges: Vec::new(),
			amount: 0.0,
		};
		assert_eq!(path.start(), None);
		assert_eq!(path.end(), None);
		assert_eq!(path.hops(), 0);
	}
}
