//! Sources of funding-network snapshots.
//!
//! The graph engine only needs something that can hand back a
//! [`GraphData`]. HTTP-backed providers live with the dashboard; the ones here
//! serve fixtures and pre-fetched JSON.

use async_trait::async_trait;
use log::{info, warn};

use crate::error::{Error, Result};
use crate::graph::GraphData;

/// Supplies the current node and edge lists.
///
/// Implementations may return an empty graph at any time; callers treat that
/// as "nothing to show yet".
#[async_trait(?Send)]
pub trait NetworkDataProvider {
	/// Short name for log lines.
	fn name(&self) -> &str;

	/// Fetch the current graph.
	async fn fetch(&self) -> Result<GraphData>;
}

/// Serves a fixed graph.
#[derive(Clone, Debug, Default)]
pub struct StaticProvider {
	graph: GraphData,
}

impl StaticProvider {
	/// Serve `graph` on every fetch.
	pub fn new(graph: GraphData) -> Self {
		Self { graph }
	}
}

#[async_trait(?Send)]
impl NetworkDataProvider for StaticProvider {
	fn name(&self) -> &str {
		"static"
	}

	async fn fetch(&self) -> Result<GraphData> {
		Ok(self.graph.clone())
	}
}

/// Parses a `{ "nodes": [...], "links": [...] }` document.
#[derive(Clone, Debug)]
pub struct JsonProvider {
	document: String,
}

impl JsonProvider {
	/// Parse `document` on every fetch.
	pub fn new(document: impl Into<String>) -> Self {
		Self {
			document: document.into(),
		}
	}
}

#[async_trait(?Send)]
impl NetworkDataProvider for JsonProvider {
	fn name(&self) -> &str {
		"json"
	}

	async fn fetch(&self) -> Result<GraphData> {
		if self.document.trim().is_empty() {
			return Err(Error::provider("empty document"));
		}
		Ok(serde_json::from_str(&self.document)?)
	}
}

/// Fetch from `provider`, falling back to an empty graph on failure.
pub async fn fetch_or_empty(provider: &dyn NetworkDataProvider) -> GraphData {
	match provider.fetch().await {
		Ok(graph) => {
			info!(
				"{} provider returned {} nodes, {} links",
				provider.name(),
				graph.nodes.len(),
				graph.links.len()
			);
			graph
		}
		Err(e) => {
			warn!("{} provider failed: {e}", provider.name());
			GraphData::default()
		}
	}
}
