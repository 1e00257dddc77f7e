//! The money-trail graph: records, traversal and analytics.

pub mod adjacency;
pub mod analytics;
pub mod paths;
pub mod sample;
pub mod summary;
pub mod types;

pub use adjacency::{AdjacencyIndex, Neighbor};
pub use analytics::{
	DirectConnections, NodeStats, Recipient, direct_connections, downstream_recipients,
	is_likely_shell_org, node_stats, shared_board_members, shared_board_members_by_id,
	shell_org_candidates,
};
pub use paths::{Path, PathOptions, find_paths};
pub use summary::{NetworkSummary, summarize};
pub use types::{Confidence, Edge, GraphData, Node, NodeKind, NodeType, PoliticalLean, Relationship};
