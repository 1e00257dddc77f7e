//! Whole-network composition figures for the dashboard header.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::types::{GraphData, NodeType};

/// Composition of a [`GraphData`] snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NetworkSummary {
	/// Distinct node ids.
	pub node_count: usize,
	/// All edges, dangling ones included.
	pub edge_count: usize,
	/// Edges with an endpoint missing from the node set.
	pub dangling_edge_count: usize,
	/// Nodes with no usable edge.
	pub isolated_count: usize,
	/// Node count per type.
	pub type_distribution: BTreeMap<NodeType, usize>,
	/// Usable edge count per normalised relationship tag.
	pub relationship_distribution: BTreeMap<String, usize>,
	/// Sum of recorded amounts over usable edges.
	pub total_amount: f64,
	/// Largest single recorded amount, with its edge endpoints.
	pub largest_flow: Option<(String, String, f64)>,
}

/// Count the nodes, edges and flows in `graph`.
pub fn summarize(graph: &GraphData) -> NetworkSummary {
	let nodes = graph.node_index();
	let mut summary = NetworkSummary {
		node_count: nodes.len(),
		edge_count: graph.links.len(),
		..Default::default()
	};

	for node in nodes.values() {
		*summary.type_distribution.entry(node.node_type()).or_insert(0) += 1;
	}

	let mut connected: HashSet<&str> = HashSet::new();
	for edge in &graph.links {
		if !nodes.contains_key(edge.source.as_str()) || !nodes.contains_key(edge.target.as_str()) {
			summary.dangling_edge_count += 1;
			continue;
		}
		connected.insert(edge.source.as_str());
		connected.insert(edge.target.as_str());
		*summary
			.relationship_distribution
			.entry(edge.relationship.to_string())
			.or_insert(0) += 1;

		let amount = edge.amount_or_zero();
		summary.total_amount += amount;
		if amount > 0.0 && summary.largest_flow.as_ref().is_none_or(|(_, _, max)| amount > *max) {
			summary.largest_flow = Some((edge.source.clone(), edge.target.clone(), amount));
		}
	}
	summary.isolated_count = nodes.keys().filter(|id| !connected.contains(*id)).count();
	summary
}

/// One-line size description.
pub fn quick_summary(graph: &GraphData) -> String {
	format!("{} entities, {} relationships", graph.nodes.len(), graph.links.len())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::{Edge, Node};

	fn create_test_graph() -> GraphData {
		GraphData::new(
			vec![
				Node::new("a", "A", NodeType::Donor),
				Node::new("b", "B", NodeType::Foundation),
				Node::new("c", "C", NodeType::Media),
				Node::new("orphan", "Orphan", NodeType::Media),
			],
			vec![
				Edge::new("a", "b", "grant").with_amount(10.0),
				Edge::new("b", "c", "grant").with_amount(25.0),
				Edge::new("a", "c", "owner"),
				Edge::new("c", "ghost", "board").with_amount(1e6),
			],
		)
	}

	#[test]
	fn test_summarize_counts() {
		let summary = summarize(&create_test_graph());
		assert_eq!(summary.node_count, 4);
		assert_eq!(summary.edge_count, 4);
		assert_eq!(summary.dangling_edge_count, 1);
		assert_eq!(summary.isolated_count, 1);
		assert_eq!(summary.type_distribution[&NodeType::Media], 2);
		assert_eq!(summary.relationship_distribution["grant"], 2);
		assert!(!summary.relationship_distribution.contains_key("board"));
	}

	#[test]
	fn test_summarize_amounts_ignore_dangling() {
		let summary = summarize(&create_test_graph());
		assert_eq!(summary.total_amount, 35.0);
		assert_eq!(
			summary.largest_flow,
			Some(("b".to_string(), "c".to_string(), 25.0))
		);
	}

	#[test]
	fn test_summarize_empty() {
		assert_eq!(summarize(&GraphData::default()), NetworkSummary::default());
		assert_eq!(quick_summary(&GraphData::default()), "0 entities, 0 relationships");
	}
}
