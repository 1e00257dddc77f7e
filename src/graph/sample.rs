//! Built-in demo network, used when no provider is configured.

use super::types::{
	CommitteeDetails, Confidence, DonorDetails, Edge, GraphData, MediaDetails, Node, NodeKind,
	NodeType, OrganizationDetails, PoliticalLean, PoliticianDetails,
};

fn org(members: &[&str]) -> OrganizationDetails {
	OrganizationDetails {
		board_members: members.iter().map(|m| m.to_string()).collect(),
		..Default::default()
	}
}

fn flow(source: &str, target: &str, relationship: &str, amount: f64) -> Edge {
	Edge::new(source, target, relationship).with_amount(amount)
}

/// A small fictional network with a pass-through foundation, shared board
/// members and a cycle.
pub fn demo_network() -> GraphData {
	let nodes = vec![
		Node::new("d-hale", "Margaret Hale", NodeType::Donor).with_kind(NodeKind::Donor(
			DonorDetails {
				net_worth: Some(4.2e9),
				total_contributions: Some(3.1e7),
				donor_type: Some("individual".into()),
				state: Some("TX".into()),
			},
		)),
		Node::new("d-orbis", "Orbis Capital", NodeType::Donor).with_kind(NodeKind::Donor(
			DonorDetails {
				donor_type: Some("corporate".into()),
				..Default::default()
			},
		)),
		Node::new("f-civic", "Civic Renewal Foundation", NodeType::Foundation)
			.with_kind(NodeKind::Foundation(org(&["R. Castillo", "J. Park", "L. Moss"]))),
		Node::new("s-northgate", "Northgate Holdings LLC", NodeType::ShellOrg)
			.with_kind(NodeKind::ShellOrg(org(&[]))),
		Node::new("t-meridian", "Meridian Policy Institute", NodeType::ThinkTank)
			.with_kind(NodeKind::ThinkTank(org(&["J. Park", "T. Ng"]))),
		Node::new("m-ledger", "The Daily Ledger", NodeType::Media).with_kind(NodeKind::Media(
			MediaDetails {
				outlet_type: Some("digital".into()),
				domain: Some("dailyledger.example".into()),
				board_members: vec!["L. Moss".into()],
			},
		)),
		Node::new("m-wire", "Heartland Wire", NodeType::Media),
		Node::new("p-forward", "Forward Together PAC", NodeType::Pac)
			.with_kind(NodeKind::Pac(CommitteeDetails {
				fec_id: Some("C00000001".into()),
				..Default::default()
			})),
		Node::new("sp-liberty", "Liberty Action Fund", NodeType::SuperPac),
		Node::new("pol-reyes", "Sen. Ana Reyes", NodeType::Politician).with_kind(
			NodeKind::Politician(PoliticianDetails {
				party: Some("I".into()),
				chamber: Some("senate".into()),
				state: Some("NM".into()),
				..Default::default()
			}),
		),
		Node::new("l-cardinal", "Cardinal Strategies", NodeType::LobbyingFirm),
	];

	let mut links = vec![
		flow("d-hale", "f-civic", "grant", 5_000_000.0),
		flow("f-civic", "t-meridian", "grant", 2_400_000.0),
		flow("f-civic", "m-ledger", "grant", 2_100_000.0),
		flow("d-orbis", "s-northgate", "investor", 1_200_000.0),
		flow("s-northgate", "sp-liberty", "pass_through", 700_000.0),
		flow("s-northgate", "m-wire", "owner", 450_000.0),
		flow("sp-liberty", "pol-reyes", "donation", 250_000.0),
		flow("p-forward", "pol-reyes", "donation", 5_000.0),
		flow("d-hale", "p-forward", "donation", 5_000.0),
		flow("l-cardinal", "pol-reyes", "lobbying", 80_000.0),
		flow("t-meridian", "l-cardinal", "contract", 60_000.0),
		Edge::new("m-ledger", "t-meridian", "board"),
	];
	links[3].confidence = Some(Confidence::Low);
	links[3].is_disclosed = Some(false);
	links[4].intermediaries = vec!["s-northgate".into()];

	let mut graph = GraphData::new(nodes, links);
	graph.nodes[0].political_lean = Some(PoliticalLean::Right);
	graph.nodes[3].risk_indicators = vec!["no-employees".into(), "registered-agent-address".into()];
	graph
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::analytics::{shared_board_members_by_id, shell_org_candidates};

	#[test]
	fn test_demo_network_is_consistent() {
		let graph = demo_network();
		let index = graph.node_index();
		assert_eq!(index.len(), graph.nodes.len());
		for edge in &graph.links {
			assert!(index.contains_key(edge.source.as_str()), "{}", edge.source);
			assert!(index.contains_key(edge.target.as_str()), "{}", edge.target);
		}
	}

	#[test]
	fn test_demo_network_flags_pass_throughs() {
		let graph = demo_network();
		let flagged: Vec<&str> = shell_org_candidates(&graph).iter().map(|n| n.id.as_str()).collect();
		// civic: 5.0M in, 4.5M out; northgate: 1.2M in, 1.15M out
		assert_eq!(flagged, ["f-civic", "s-northgate"]);
		assert_eq!(shared_board_members_by_id(&graph, "f-civic", "t-meridian"), ["J. Park"]);
	}
}
