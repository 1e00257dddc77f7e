//! Read-only analyses over a funding network.
//!
//! Unlike path finding, connection and statistics queries here respect the
//! stored direction of each edge: `source` gave to `target`.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::paths::{PathOptions, find_paths};
use super::types::{Edge, GraphData, Node, NodeType};

/// Minimum incoming edges for the pass-through heuristic.
const SHELL_MIN_INCOMING: usize = 1;
/// Minimum outgoing edges for the pass-through heuristic.
const SHELL_MIN_OUTGOING: usize = 2;
/// Inflow/outflow imbalance must stay under this fraction of inflow.
const SHELL_BALANCE_RATIO: f64 = 0.2;

/// Edges touching a node, split by stored direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectConnections<'g> {
	/// Edges whose target is the node.
	pub incoming: Vec<&'g Edge>,
	/// Edges whose source is the node.
	pub outgoing: Vec<&'g Edge>,
}

/// Edges touching `id`, split by direction. A self-loop appears in both lists.
pub fn direct_connections<'g>(graph: &'g GraphData, id: &str) -> DirectConnections<'g> {
	let mut connections = DirectConnections::default();
	for edge in &graph.links {
		if edge.target == id {
			connections.incoming.push(edge);
		}
		if edge.source == id {
			connections.outgoing.push(edge);
		}
	}
	connections
}

/// Flow statistics for one node.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NodeStats {
	/// Edges into the node.
	pub incoming_count: usize,
	/// Edges out of the node.
	pub outgoing_count: usize,
	/// Sum of recorded amounts flowing in.
	pub incoming_amount: f64,
	/// Sum of recorded amounts flowing out.
	pub outgoing_amount: f64,
	/// Connected neighbours by type, one count per connecting edge.
	pub neighbor_types: BTreeMap<NodeType, usize>,
}

impl NodeStats {
	/// Incoming plus outgoing edge count.
	pub fn degree(&self) -> usize {
		self.incoming_count + self.outgoing_count
	}

	/// Outgoing minus incoming amount.
	pub fn net_flow(&self) -> f64 {
		self.outgoing_amount - self.incoming_amount
	}
}

/// Flow statistics for `id`. Unknown ids give all zeros.
pub fn node_stats(graph: &GraphData, id: &str) -> NodeStats {
	let nodes = graph.node_index();
	let connections = direct_connections(graph, id);
	let mut stats = NodeStats {
		incoming_count: connections.incoming.len(),
		outgoing_count: connections.outgoing.len(),
		incoming_amount: connections.incoming.iter().map(|e| e.amount_or_zero()).sum(),
		outgoing_amount: connections.outgoing.iter().map(|e| e.amount_or_zero()).sum(),
		neighbor_types: BTreeMap::new(),
	};

	let neighbors = connections
		.incoming
		.iter()
		.map(|e| e.source.as_str())
		.chain(connections.outgoing.iter().map(|e| e.target.as_str()));
	for neighbor in neighbors {
		if let Some(node) = nodes.get(neighbor) {
			*stats.neighbor_types.entry(node.node_type()).or_insert(0) += 1;
		}
	}
	stats
}

/// Board members the two nodes have in common, in `a`'s order, without
/// duplicates.
pub fn shared_board_members<'a>(a: &'a Node, b: &Node) -> Vec<&'a str> {
	let theirs: HashSet<&str> = b.board_members().iter().map(String::as_str).collect();
	let mut seen = HashSet::new();
	a.board_members()
		.iter()
		.map(String::as_str)
		.filter(|member| theirs.contains(member) && seen.insert(*member))
		.collect()
}

/// [`shared_board_members`] by id. Unknown ids share nobody.
pub fn shared_board_members_by_id<'g>(graph: &'g GraphData, a: &str, b: &str) -> Vec<&'g str> {
	let nodes = graph.node_index();
	match (nodes.get(a).copied(), nodes.get(b).copied()) {
		(Some(a), Some(b)) => shared_board_members(a, b),
		_ => Vec::new(),
	}
}

/// A node reached from a source, with money attributed along every path.
#[derive(Clone, Debug, PartialEq)]
pub struct Recipient<'g> {
	/// The receiving node.
	pub node: &'g Node,
	/// Sum of the amounts of every path ending at this node.
	pub total_amount: f64,
	/// Number of distinct paths ending here.
	pub path_count: usize,
}

/// Everyone reachable from `source` within `max_hops`, ranked by the money
/// flowing along paths that end at them.
pub fn downstream_recipients<'g>(
	graph: &'g GraphData,
	source: &str,
	max_hops: usize,
) -> Vec<Recipient<'g>> {
	let nodes = graph.node_index();
	let paths = find_paths(graph, source, None, &PathOptions::new(max_hops));

	let mut slots: HashMap<&str, usize> = HashMap::new();
	let mut recipients: Vec<Recipient<'g>> = Vec::new();
	for path in &paths {
		let Some(terminal) = path.end() else {
			continue;
		};
		if terminal == source {
			continue;
		}
		let Some(&node) = nodes.get(terminal) else {
			continue;
		};
		let slot = *slots.entry(terminal).or_insert_with(|| {
			recipients.push(Recipient {
				node,
				total_amount: 0.0,
				path_count: 0,
			});
			recipients.len() - 1
		});
		recipients[slot].total_amount += path.amount;
		recipients[slot].path_count += 1;
	}

	recipients.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
	recipients
}

/// Whether the flow statistics look like money passing straight through:
/// at least one inflow, at least two outflows, and totals within 20% of the
/// inflow.
pub fn is_pass_through(stats: &NodeStats) -> bool {
	stats.incoming_count >= SHELL_MIN_INCOMING
		&& stats.outgoing_count >= SHELL_MIN_OUTGOING
		&& (stats.incoming_amount - stats.outgoing_amount).abs()
			< stats.incoming_amount * SHELL_BALANCE_RATIO
}

/// Heuristic flag for foundations and shell orgs that appear to forward the
/// money they receive. Expect false positives.
pub fn is_likely_shell_org(graph: &GraphData, id: &str) -> bool {
	let Some(node) = graph.node(id) else {
		return false;
	};
	matches!(node.node_type(), NodeType::Foundation | NodeType::ShellOrg)
		&& is_pass_through(&node_stats(graph, id))
}

/// Every node flagged by [`is_likely_shell_org`], in graph order.
pub fn shell_org_candidates(graph: &GraphData) -> Vec<&Node> {
	let mut seen = HashSet::new();
	graph
		.nodes
		.iter()
		.filter(|n| matches!(n.node_type(), NodeType::Foundation | NodeType::ShellOrg))
		.filter(|n| seen.insert(n.id.as_str()))
		.filter(|n| is_likely_shell_org(graph, &n.id))
		.collect()
}
