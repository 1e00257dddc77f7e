use std::collections::HashSet;

use money_trail::graph::types::OrganizationDetails;
use money_trail::graph::{
	Edge, GraphData, Node, NodeKind, NodeType, PathOptions, downstream_recipients, find_paths,
	is_likely_shell_org, node_stats, shared_board_members,
};
use money_trail::layout::{LayoutConfig, LayoutPhase, Simulation};
use proptest::prelude::*;

const RELATIONSHIPS: [&str; 3] = ["donation", "grant", "board_member"];

fn node_type() -> impl Strategy<Value = NodeType> {
	(0..NodeType::ALL.len()).prop_map(|i| NodeType::ALL[i])
}

/// Up to eight nodes `n0..` with edges between them, self-loops and parallel
/// edges included.
fn graph() -> impl Strategy<Value = GraphData> {
	(1usize..8)
		.prop_flat_map(|n| {
			(
				prop::collection::vec(node_type(), n),
				prop::collection::vec((0..n, 0..n, 0..RELATIONSHIPS.len(), 0u32..1_000_000), 0..16),
			)
		})
		.prop_map(|(types, raw_edges)| {
			let nodes = types
				.into_iter()
				.enumerate()
				.map(|(i, t)| Node::new(format!("n{i}"), format!("Node {i}"), t))
				.collect();
			let links = raw_edges
				.into_iter()
				.map(|(s, t, r, amount)| {
					Edge::new(format!("n{s}"), format!("n{t}"), RELATIONSHIPS[r])
						.with_amount(f64::from(amount))
				})
				.collect();
			GraphData::new(nodes, links)
		})
}

fn org(id: &str, board: Vec<String>) -> Node {
	Node::new(id, id, NodeType::Foundation).with_kind(NodeKind::Foundation(OrganizationDetails {
		board_members: board,
		..Default::default()
	}))
}

proptest! {
	#[test]
	fn test_paths_are_simple_and_bounded(graph in graph(), max_hops in 0usize..4) {
		let paths = find_paths(&graph, "n0", None, &PathOptions::new(max_hops));
		for path in &paths {
			prop_assert_eq!(path.start(), Some("n0"));
			prop_assert_eq!(path.edges.len() + 1, path.nodes.len());
			prop_assert!(path.hops() >= 1 && path.hops() <= max_hops);
			let distinct: HashSet<&str> = path.nodes.iter().copied().collect();
			prop_assert_eq!(distinct.len(), path.nodes.len());
			let total: f64 = path.edges.iter().map(|e| e.amount_or_zero()).sum();
			prop_assert!((total - path.amount).abs() < 1e-6);
		}
		prop_assert!(paths.windows(2).all(|w| w[0].amount >= w[1].amount));
	}

	#[test]
	fn test_targeted_paths_end_at_target(graph in graph(), max_hops in 1usize..4) {
		let target = format!("n{}", graph.nodes.len() - 1);
		let paths = find_paths(&graph, "n0", Some(&target), &PathOptions::new(max_hops));
		for path in &paths {
			prop_assert_eq!(path.start(), Some("n0"));
			prop_assert_eq!(path.end(), Some(target.as_str()));
			prop_assert!(!path.nodes[..path.nodes.len() - 1].contains(&target.as_str()));
		}
	}

	#[test]
	fn test_relationship_filter_is_respected(graph in graph()) {
		let options = PathOptions::new(3).relationships(["grant"]);
		for path in find_paths(&graph, "n0", None, &options) {
			prop_assert!(path.edges.iter().all(|e| e.relationship.as_str() == "grant"));
		}
	}

	#[test]
	fn test_single_edge_recipient(amount in 1u32..10_000_000, hops in 1usize..5) {
		let graph = GraphData::new(
			vec![Node::new("s", "S", NodeType::Donor), Node::new("r", "R", NodeType::SuperPac)],
			vec![Edge::new("s", "r", "donation").with_amount(f64::from(amount))],
		);
		let recipients = downstream_recipients(&graph, "s", hops);
		prop_assert_eq!(recipients.len(), 1);
		prop_assert_eq!(recipients[0].node.id.as_str(), "r");
		prop_assert_eq!(recipients[0].total_amount, f64::from(amount));
		prop_assert_eq!(recipients[0].path_count, 1);
	}

	#[test]
	fn test_shared_board_members_symmetric(
		a in prop::collection::vec("[a-d]", 0..6),
		b in prop::collection::vec("[a-d]", 0..6),
	) {
		let (x, y) = (org("x", a), org("y", b));
		let xy: HashSet<&str> = shared_board_members(&x, &y).into_iter().collect();
		let yx: HashSet<&str> = shared_board_members(&y, &x).into_iter().collect();
		prop_assert_eq!(xy, yx);
		let listed = shared_board_members(&x, &y);
		let unique: HashSet<&str> = listed.iter().copied().collect();
		prop_assert_eq!(unique.len(), listed.len());
	}

	#[test]
	fn test_shell_threshold(incoming in 1_000u32..1_000_000, out_a in 0u32..1_000_000, out_b in 0u32..1_000_000) {
		let graph = GraphData::new(
			vec![
				Node::new("d", "D", NodeType::Donor),
				org("f", Vec::new()),
				Node::new("p", "P", NodeType::Pac),
				Node::new("q", "Q", NodeType::Pac),
			],
			vec![
				Edge::new("d", "f", "grant").with_amount(f64::from(incoming)),
				Edge::new("f", "p", "grant").with_amount(f64::from(out_a)),
				Edge::new("f", "q", "grant").with_amount(f64::from(out_b)),
			],
		);
		let (inc, out) = (f64::from(incoming), f64::from(out_a) + f64::from(out_b));
		prop_assert_eq!(is_likely_shell_org(&graph, "f"), (inc - out).abs() < inc * 0.2);
	}

	#[test]
	fn test_layout_settles_and_freezes(graph in graph(), seed in any::<u64>()) {
		let config = LayoutConfig { seed, ..LayoutConfig::default() };
		let mut sim = Simulation::new(&graph.nodes, &graph.links, config);
		sim.run_until_settled(1_000);
		prop_assert_eq!(sim.phase(), LayoutPhase::Settled);
		for node in sim.nodes() {
			prop_assert!(node.x.is_finite() && node.y.is_finite());
		}
		let frozen = sim.nodes().to_vec();
		prop_assert!(!sim.step());
		prop_assert_eq!(sim.nodes(), &frozen[..]);
	}

	#[test]
	fn test_pinned_node_holds(graph in graph(), x in -500.0f64..500.0, y in -500.0f64..500.0) {
		let mut sim = Simulation::new(&graph.nodes, &graph.links, LayoutConfig::default());
		prop_assert!(sim.pin("n0", x, y));
		for _ in 0..50 {
			sim.step();
		}
		prop_assert_eq!(sim.position("n0"), Some((x, y)));
	}
}

#[test]
fn test_money_trail_ranking() {
	let graph = GraphData::new(
		vec![
			Node::new("A", "A", NodeType::Donor),
			Node::new("B", "B", NodeType::Foundation),
			Node::new("C", "C", NodeType::Media),
		],
		vec![
			Edge::new("A", "B", "donation").with_amount(1_000_000.0),
			Edge::new("B", "C", "grant").with_amount(900_000.0),
		],
	);
	let paths = find_paths(&graph, "A", None, &PathOptions::new(2));
	assert_eq!(paths.len(), 2);
	assert_eq!(paths[0].nodes, vec!["A", "B", "C"]);
	assert_eq!(paths[0].amount, 1_900_000.0);
	assert_eq!(paths[1].nodes, vec!["A", "B"]);
}

#[test]
fn test_isolated_node_has_nothing() {
	let graph = GraphData::new(vec![Node::new("solo", "Solo", NodeType::Donor)], Vec::new());
	let stats = node_stats(&graph, "solo");
	assert_eq!((stats.incoming_count, stats.outgoing_count), (0, 0));
	assert_eq!((stats.incoming_amount, stats.outgoing_amount), (0.0, 0.0));
	assert!(stats.neighbor_types.is_empty());
	assert!(find_paths(&graph, "solo", None, &PathOptions::default()).is_empty());
	assert!(downstream_recipients(&graph, "solo", 3).is_empty());
	assert!(!is_likely_shell_org(&graph, "solo"));

	let mut sim = Simulation::new(&graph.nodes, &graph.links, LayoutConfig::default());
	sim.run_until_settled(1_000);
	let (cx, cy) = LayoutConfig::default().center();
	let (x, y) = sim.position("solo").unwrap();
	assert!((x - cx).abs() < 60.0 && (y - cy).abs() < 60.0);
}
