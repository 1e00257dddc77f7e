//! Symmetric neighbour index derived from the directed edge list.
//!
//! Traversal treats every edge as undirected: each edge is inserted under
//! both of its endpoints. Direction-aware questions (who funded whom) are
//! answered from the edges themselves, see [`crate::graph::analytics`].

use std::collections::{HashMap, HashSet};

use super::types::{Edge, GraphData, Relationship};

/// One entry in a node's neighbour list.
#[derive(Clone, Copy, Debug)]
pub struct Neighbor<'g> {
	/// The node at the other end.
	pub id: &'g str,
	/// The connecting edge.
	pub edge: &'g Edge,
}

/// Undirected neighbour lists borrowed from a [`GraphData`].
#[derive(Debug, Default)]
pub struct AdjacencyIndex<'g> {
	neighbors: HashMap<&'g str, Vec<Neighbor<'g>>>,
}

impl<'g> AdjacencyIndex<'g> {
	/// Build the index in one pass over the edges.
	///
	/// When `relationships` is given, edges whose tag is not in the set are
	/// left out under both endpoints. Endpoints are not checked against the
	/// node set.
	pub fn build(graph: &'g GraphData, relationships: Option<&HashSet<Relationship>>) -> Self {
		let mut neighbors: HashMap<&'g str, Vec<Neighbor<'g>>> = HashMap::new();
		for edge in &graph.links {
			if relationships.is_some_and(|allowed| !allowed.contains(&edge.relationship)) {
				continue;
			}
			neighbors.entry(edge.source.as_str()).or_default().push(Neighbor {
				id: edge.target.as_str(),
				edge,
			});
			neighbors.entry(edge.target.as_str()).or_default().push(Neighbor {
				id: edge.source.as_str(),
				edge,
			});
		}
		Self { neighbors }
	}

	/// Neighbours of `id`; empty for ids with no edges.
	pub fn neighbors(&self, id: &str) -> &[Neighbor<'g>] {
		self.neighbors.get(id).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Number of neighbour entries of `id`.
	pub fn degree(&self, id: &str) -> usize {
		self.neighbors(id).len()
	}

	/// Number of ids with at least one entry.
	pub fn len(&self) -> usize {
		self.neighbors.len()
	}

	/// Whether no node has a neighbour.
	pub fn is_empty(&self) -> bool {
		self.neighbors.is_empty()
	}
}
