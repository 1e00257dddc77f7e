//! Funding-network records as they arrive from a data provider.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Payload-free discriminant of [`NodeKind`], used by filters and breakdowns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
	/// Individual or corporate donor.
	Donor,
	/// Media outlet.
	Media,
	/// Charitable or private foundation.
	Foundation,
	/// Political action committee.
	Pac,
	/// Organisation suspected of existing only to move money.
	ShellOrg,
	/// Elected official or candidate.
	Politician,
	/// Foreign government.
	ForeignNation,
	/// Registered lobbying firm.
	LobbyingFirm,
	/// Policy think tank.
	ThinkTank,
	/// Independent-expenditure-only committee.
	SuperPac,
}

impl NodeType {
	/// Every node type, in display order.
	pub const ALL: [NodeType; 10] = [
		NodeType::Donor,
		NodeType::Media,
		NodeType::Foundation,
		NodeType::Pac,
		NodeType::ShellOrg,
		NodeType::Politician,
		NodeType::ForeignNation,
		NodeType::LobbyingFirm,
		NodeType::ThinkTank,
		NodeType::SuperPac,
	];

	/// The snake_case tag used in the dataset.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeType::Donor => "donor",
			NodeType::Media => "media",
			NodeType::Foundation => "foundation",
			NodeType::Pac => "pac",
			NodeType::ShellOrg => "shell_org",
			NodeType::Politician => "politician",
			NodeType::ForeignNation => "foreign_nation",
			NodeType::LobbyingFirm => "lobbying_firm",
			NodeType::ThinkTank => "think_tank",
			NodeType::SuperPac => "super_pac",
		}
	}

	/// Fill colour used by the canvas.
	pub fn color(self) -> &'static str {
		match self {
			NodeType::Donor => "#2ca02c",
			NodeType::Media => "#1f77b4",
			NodeType::Foundation => "#9467bd",
			NodeType::Pac => "#ff7f0e",
			NodeType::ShellOrg => "#7f7f7f",
			NodeType::Politician => "#d62728",
			NodeType::ForeignNation => "#8c564b",
			NodeType::LobbyingFirm => "#e377c2",
			NodeType::ThinkTank => "#17becf",
			NodeType::SuperPac => "#bcbd22",
		}
	}
}

impl fmt::Display for NodeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NodeType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		NodeType::ALL
			.into_iter()
			.find(|t| t.as_str() == s.trim())
			.ok_or_else(|| format!("unknown node type: {s}"))
	}
}

/// Political orientation attributed to an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoliticalLean {
	/// Left of centre.
	Left,
	/// Right of centre.
	Right,
	/// No stated lean.
	Neutral,
	/// Funds both sides.
	Bipartisan,
	/// Not assessed.
	#[default]
	#[serde(other)]
	Unknown,
}

/// Confidence in a recorded relationship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
	/// Backed by filings.
	High,
	/// Reported but not filed.
	Medium,
	/// Inferred.
	Low,
}

/// Attributes of an individual or family donor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonorDetails {
	/// Estimated net worth in dollars.
	pub net_worth: Option<f64>,
	/// Reported lifetime political giving.
	pub total_contributions: Option<f64>,
	/// Free-form category, e.g. `individual` or `family`.
	pub donor_type: Option<String>,
	/// Two-letter state code.
	pub state: Option<String>,
}

/// Attributes of a media outlet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaDetails {
	/// e.g. `newspaper`, `podcast`, `network`.
	pub outlet_type: Option<String>,
	/// Primary web domain.
	pub domain: Option<String>,
	/// Board or ownership-group members.
	pub board_members: Vec<String>,
}

/// Payload shared by foundations, shell orgs, lobbying firms and think tanks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationDetails {
	/// IRS employer identification number.
	pub ein: Option<String>,
	/// Country of registration.
	pub country: Option<String>,
	/// State of registration.
	pub state: Option<String>,
	/// Reported total grants or contributions.
	pub total_contributions: Option<f64>,
	/// Directors and trustees.
	pub board_members: Vec<String>,
}

/// Payload shared by PACs and super PACs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommitteeDetails {
	/// FEC committee id.
	pub fec_id: Option<String>,
	/// State of registration.
	pub state: Option<String>,
	/// Reported total receipts.
	pub total_contributions: Option<f64>,
	/// Officers and treasurer.
	pub board_members: Vec<String>,
}

/// Attributes of an elected official or candidate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoliticianDetails {
	/// Party affiliation.
	pub party: Option<String>,
	/// `house`, `senate`, or an office name.
	pub chamber: Option<String>,
	/// Represented state.
	pub state: Option<String>,
	/// FEC candidate id.
	pub fec_id: Option<String>,
	/// Reported total receipts.
	pub total_contributions: Option<f64>,
}

/// Attributes of a foreign government.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForeignNationDetails {
	/// Country name.
	pub country: Option<String>,
}

/// Type-specific attributes of a node, tagged by the dataset's `type` field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
	/// See [`NodeType::Donor`].
	Donor(DonorDetails),
	/// See [`NodeType::Media`].
	Media(MediaDetails),
	/// See [`NodeType::Foundation`].
	Foundation(OrganizationDetails),
	/// See [`NodeType::Pac`].
	Pac(CommitteeDetails),
	/// See [`NodeType::ShellOrg`].
	ShellOrg(OrganizationDetails),
	/// See [`NodeType::Politician`].
	Politician(PoliticianDetails),
	/// See [`NodeType::ForeignNation`].
	ForeignNation(ForeignNationDetails),
	/// See [`NodeType::LobbyingFirm`].
	LobbyingFirm(OrganizationDetails),
	/// See [`NodeType::ThinkTank`].
	ThinkTank(OrganizationDetails),
	/// See [`NodeType::SuperPac`].
	SuperPac(CommitteeDetails),
}

impl NodeKind {
	/// A kind of the given type with no attributes set.
	pub fn bare(node_type: NodeType) -> Self {
		match node_type {
			NodeType::Donor => NodeKind::Donor(DonorDetails::default()),
			NodeType::Media => NodeKind::Media(MediaDetails::default()),
			NodeType::Foundation => NodeKind::Foundation(OrganizationDetails::default()),
			NodeType::Pac => NodeKind::Pac(CommitteeDetails::default()),
			NodeType::ShellOrg => NodeKind::ShellOrg(OrganizationDetails::default()),
			NodeType::Politician => NodeKind::Politician(PoliticianDetails::default()),
			NodeType::ForeignNation => NodeKind::ForeignNation(ForeignNationDetails::default()),
			NodeType::LobbyingFirm => NodeKind::LobbyingFirm(OrganizationDetails::default()),
			NodeType::ThinkTank => NodeKind::ThinkTank(OrganizationDetails::default()),
			NodeType::SuperPac => NodeKind::SuperPac(CommitteeDetails::default()),
		}
	}

	/// The payload-free discriminant.
	pub fn node_type(&self) -> NodeType {
		match self {
			NodeKind::Donor(_) => NodeType::Donor,
			NodeKind::Media(_) => NodeType::Media,
			NodeKind::Foundation(_) => NodeType::Foundation,
			NodeKind::Pac(_) => NodeType::Pac,
			NodeKind::ShellOrg(_) => NodeType::ShellOrg,
			NodeKind::Politician(_) => NodeType::Politician,
			NodeKind::ForeignNation(_) => NodeType::ForeignNation,
			NodeKind::LobbyingFirm(_) => NodeType::LobbyingFirm,
			NodeKind::ThinkTank(_) => NodeType::ThinkTank,
			NodeKind::SuperPac(_) => NodeType::SuperPac,
		}
	}

	/// Board members, for kinds that have a board. Empty otherwise.
	pub fn board_members(&self) -> &[String] {
		match self {
			NodeKind::Media(d) => &d.board_members,
			NodeKind::Foundation(d)
			| NodeKind::ShellOrg(d)
			| NodeKind::LobbyingFirm(d)
			| NodeKind::ThinkTank(d) => &d.board_members,
			NodeKind::Pac(d) | NodeKind::SuperPac(d) => &d.board_members,
			NodeKind::Donor(_) | NodeKind::Politician(_) | NodeKind::ForeignNation(_) => &[],
		}
	}

	/// Reported total contributions, where the kind carries one.
	pub fn total_contributions(&self) -> Option<f64> {
		match self {
			NodeKind::Donor(d) => d.total_contributions,
			NodeKind::Foundation(d)
			| NodeKind::ShellOrg(d)
			| NodeKind::LobbyingFirm(d)
			| NodeKind::ThinkTank(d) => d.total_contributions,
			NodeKind::Pac(d) | NodeKind::SuperPac(d) => d.total_contributions,
			NodeKind::Politician(d) => d.total_contributions,
			NodeKind::Media(_) | NodeKind::ForeignNation(_) => None,
		}
	}
}

/// An entity in the funding network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
	/// Unique id. Edges refer to nodes by it.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Type tag plus the type-specific attributes.
	#[serde(flatten)]
	pub kind: NodeKind,
	/// Homepage URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub website: Option<String>,
	/// Reported political lean.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub political_lean: Option<PoliticalLean>,
	/// Free-form flags such as `undisclosed donors`.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub risk_indicators: Vec<String>,
}

impl Node {
	/// A node with no optional attributes.
	pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			kind: NodeKind::bare(node_type),
			website: None,
			political_lean: None,
			risk_indicators: Vec::new(),
		}
	}

	/// Replace the type-specific payload.
	pub fn with_kind(mut self, kind: NodeKind) -> Self {
		self.kind = kind;
		self
	}

	/// See [`NodeKind::node_type`].
	pub fn node_type(&self) -> NodeType {
		self.kind.node_type()
	}

	/// See [`NodeKind::board_members`].
	pub fn board_members(&self) -> &[String] {
		self.kind.board_members()
	}
}

/// Display metadata for a known relationship tag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelationshipInfo {
	/// Human-readable name.
	pub label: &'static str,
	/// CSS colour for the edge stroke.
	pub color: &'static str,
	/// Whether the edge is drawn dashed.
	pub dashed: bool,
}

const RELATIONSHIP_TABLE: &[(&str, RelationshipInfo)] = &[
	("owner", RelationshipInfo { label: "Owner", color: "#e6550d", dashed: false }),
	("founder", RelationshipInfo { label: "Founder", color: "#fd8d3c", dashed: false }),
	("investor", RelationshipInfo { label: "Investor", color: "#31a354", dashed: false }),
	("board", RelationshipInfo { label: "Board member", color: "#756bb1", dashed: true }),
	("grant", RelationshipInfo { label: "Grant", color: "#3182bd", dashed: false }),
	("funder", RelationshipInfo { label: "Funder", color: "#6baed6", dashed: false }),
	("pass_through", RelationshipInfo { label: "Pass-through", color: "#969696", dashed: true }),
	("donation", RelationshipInfo { label: "Donation", color: "#74c476", dashed: false }),
	("lobbying", RelationshipInfo { label: "Lobbying", color: "#de2d26", dashed: true }),
	("employee", RelationshipInfo { label: "Employee", color: "#9e9ac8", dashed: true }),
	("advertiser", RelationshipInfo { label: "Advertiser", color: "#fdae6b", dashed: false }),
	("subsidiary", RelationshipInfo { label: "Subsidiary", color: "#e6550d", dashed: true }),
	("contract", RelationshipInfo { label: "Contract", color: "#636363", dashed: false }),
	("affiliate", RelationshipInfo { label: "Affiliate", color: "#bdbdbd", dashed: true }),
];

const UNKNOWN_RELATIONSHIP: RelationshipInfo = RelationshipInfo {
	label: "Related",
	color: "#64b4ff",
	dashed: false,
};

/// Relationship tag on an edge.
///
/// The vocabulary is open: any tag is accepted. Construction normalises the
/// text (trimmed, lowercased, whitespace and hyphens folded to `_`) so that
/// `"Pass-Through"` and `"pass_through"` compare equal. An empty tag becomes
/// `related`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Relationship(String);

impl Relationship {
	/// Normalise `tag` into a relationship.
	pub fn new(tag: impl AsRef<str>) -> Self {
		let mut normalized = String::new();
		for word in tag
			.as_ref()
			.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
			.filter(|w| !w.is_empty())
		{
			if !normalized.is_empty() {
				normalized.push('_');
			}
			normalized.push_str(&word.to_lowercase());
		}
		if normalized.is_empty() {
			normalized.push_str("related");
		}
		Self(normalized)
	}

	/// The normalised tag.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Whether the tag is in the display table.
	pub fn is_known(&self) -> bool {
		RELATIONSHIP_TABLE.iter().any(|(tag, _)| *tag == self.0)
	}

	/// Display metadata, falling back to a neutral style for unknown tags.
	pub fn info(&self) -> RelationshipInfo {
		RELATIONSHIP_TABLE
			.iter()
			.find(|(tag, _)| *tag == self.0)
			.map(|(_, info)| *info)
			.unwrap_or(UNKNOWN_RELATIONSHIP)
	}
}

impl Default for Relationship {
	fn default() -> Self {
		Self::new("")
	}
}

impl From<String> for Relationship {
	fn from(tag: String) -> Self {
		Self::new(tag)
	}
}

impl From<&str> for Relationship {
	fn from(tag: &str) -> Self {
		Self::new(tag)
	}
}

impl From<Relationship> for String {
	fn from(rel: Relationship) -> Self {
		rel.0
	}
}

impl Borrow<str> for Relationship {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Relationship {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A directed funding or influence relationship.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
	/// Id of the node the money or tie starts from.
	pub source: String,
	/// Id of the receiving node.
	pub target: String,
	/// Kind of tie. Missing tags read as `related`.
	#[serde(default)]
	pub relationship: Relationship,
	/// Dollar amount, when recorded.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub amount: Option<f64>,
	/// First year the relationship was active.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub start_year: Option<i32>,
	/// Last year the relationship was active.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end_year: Option<i32>,
	/// Whether the relationship is ongoing.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
	/// How well the record is sourced.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub confidence: Option<Confidence>,
	/// Whether the flow appears in public filings.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_disclosed: Option<bool>,
	/// Ids of entities the money passed through.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub intermediaries: Vec<String>,
	/// Filing or article URLs backing the record.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub source_documents: Vec<String>,
	/// Stated purpose of a grant.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub grant_purpose: Option<String>,
}

impl Edge {
	/// An edge with no optional attributes.
	pub fn new(
		source: impl Into<String>,
		target: impl Into<String>,
		relationship: impl Into<Relationship>,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relationship: relationship.into(),
			amount: None,
			start_year: None,
			end_year: None,
			is_active: None,
			confidence: None,
			is_disclosed: None,
			intermediaries: Vec::new(),
			source_documents: Vec::new(),
			grant_purpose: None,
		}
	}

	/// Set the recorded amount.
	pub fn with_amount(mut self, amount: f64) -> Self {
		self.amount = Some(amount);
		self
	}

	/// Recorded amount, zero when absent.
	pub fn amount_or_zero(&self) -> f64 {
		self.amount.unwrap_or(0.0)
	}

	/// The endpoint opposite `id`, if `id` is one of this edge's endpoints.
	pub fn other_end(&self, id: &str) -> Option<&str> {
		if self.source == id {
			Some(&self.target)
		} else if self.target == id {
			Some(&self.source)
		} else {
			None
		}
	}
}

/// A snapshot of the funding network as returned by a provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Entities. Records that fail to parse are skipped.
	#[serde(default, deserialize_with = "skip_malformed")]
	pub nodes: Vec<Node>,
	/// Relationships. Records that fail to parse are skipped.
	#[serde(default, deserialize_with = "skip_malformed")]
	pub links: Vec<Edge>,
}

/// Decode a record list one entry at a time, dropping entries that do not
/// parse. A missing or `null` list is empty.
fn skip_malformed<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned,
{
	let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
	let total = raw.len();
	let records: Vec<T> = raw
		.into_iter()
		.filter_map(|value| serde_json::from_value(value).ok())
		.collect();
	if records.len() < total {
		warn!(
			"skipped {} malformed {} records",
			total - records.len(),
			std::any::type_name::<T>().rsplit("::").next().unwrap_or("graph")
		);
	}
	Ok(records)
}

impl GraphData {
	/// Wrap already-built records.
	pub fn new(nodes: Vec<Node>, links: Vec<Edge>) -> Self {
		Self { nodes, links }
	}

	/// Whether there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Id → node lookup. The first node with a given id wins.
	pub fn node_index(&self) -> HashMap<&str, &Node> {
		let mut index = HashMap::with_capacity(self.nodes.len());
		for node in &self.nodes {
			index.entry(node.id.as_str()).or_insert(node);
		}
		index
	}

	/// Linear lookup of a single node.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}
}
