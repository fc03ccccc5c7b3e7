//! Graph data structures for input to the network graph component.
//!
//! Shapes follow the backend's network export: authors as nodes, weighted
//! co-authorship edges as links.

use serde::{Deserialize, Deserializer};

/// An author in the collaboration network.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique identifier. The backend sends integer author ids; both numbers
	/// and strings are accepted and normalized to a string.
	#[serde(deserialize_with = "id_from_string_or_number")]
	pub id: String,
	/// Full display name.
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	/// Papers in the project; drives the node radius.
	#[serde(default, deserialize_with = "null_as_default")]
	pub papers_count: u32,
	/// Total citations across the author's papers.
	#[serde(default, deserialize_with = "null_as_default")]
	pub citations: u32,
	/// Papers with this author listed first.
	#[serde(default, deserialize_with = "null_as_default")]
	pub first_author_count: u32,
	/// Flagged by upstream network analysis. Rendering input only.
	#[serde(default, deserialize_with = "null_as_default")]
	pub is_key_person: bool,
	/// Affiliation, when the backend knows it.
	#[serde(default)]
	pub institution: Option<String>,
	/// Centrality-based influence computed by the backend.
	#[serde(default)]
	pub influence_score: Option<f64>,
	/// Number of distinct co-authors.
	#[serde(default)]
	pub degree: Option<u32>,
}

/// A weighted, undirected collaboration between two authors.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	#[serde(deserialize_with = "id_from_string_or_number")]
	pub source: String,
	/// Target node ID.
	#[serde(deserialize_with = "id_from_string_or_number")]
	pub target: String,
	/// Number of co-authored papers. Missing or null means 1.
	#[serde(default = "default_weight", deserialize_with = "weight_or_default")]
	pub weight: f64,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	/// Authors, in drawing order.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Collaborations between authors in `nodes`.
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

/// Either a bare [`GraphData`] or the backend's `{ success, network }` envelope.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum NetworkPayload {
	/// `{ "success": ..., "network": { ... } }` as returned by the API.
	Envelope {
		/// False when the backend could not build the network.
		#[serde(default)]
		success: bool,
		/// The wrapped graph.
		network: GraphData,
	},
	/// Plain `{ nodes, links }`.
	Bare(GraphData),
}

impl NetworkPayload {
	/// Unwraps the graph, treating an unsuccessful envelope as no data.
	pub fn into_graph(self) -> Option<GraphData> {
		match self {
			NetworkPayload::Envelope { success, network } => success.then_some(network),
			NetworkPayload::Bare(data) => Some(data),
		}
	}
}

/// Headline numbers shown above the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkSummary<'a> {
	/// Node count.
	pub total_authors: usize,
	/// Link count.
	pub total_collaborations: usize,
	/// Nodes flagged as key persons.
	pub key_people_count: usize,
	/// Author with the most papers; ties go to the earlier node.
	pub most_active_author: Option<&'a GraphNode>,
}

impl GraphNode {
	/// Influence score with one decimal, or "N/A" when the backend sent none.
	pub fn influence_label(&self) -> String {
		self.influence_score
			.filter(|s| s.is_finite())
			.map_or_else(|| "N/A".to_owned(), |s| format!("{s:.1}"))
	}
}

impl GraphData {
	/// True when there are no authors to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// First node with the given id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Headline counts for the page header.
	pub fn summary(&self) -> NetworkSummary<'_> {
		let most_active_author = self.nodes.iter().fold(None, |best: Option<&GraphNode>, n| {
			match best {
				Some(b) if b.papers_count >= n.papers_count => Some(b),
				_ => Some(n),
			}
		});
		NetworkSummary {
			total_authors: self.nodes.len(),
			total_collaborations: self.links.len(),
			key_people_count: self.nodes.iter().filter(|n| n.is_key_person).count(),
			most_active_author,
		}
	}

	/// Key persons ordered by influence score, then paper count (both descending).
	pub fn key_people(&self) -> Vec<&GraphNode> {
		let mut people: Vec<&GraphNode> = self.nodes.iter().filter(|n| n.is_key_person).collect();
		people.sort_by(|a, b| {
			let (sa, sb) = (a.influence_score.unwrap_or(0.0), b.influence_score.unwrap_or(0.0));
			sb.total_cmp(&sa).then(b.papers_count.cmp(&a.papers_count))
		});
		people
	}
}

fn default_weight() -> f64 {
	1.0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Int(i64),
	Float(f64),
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match RawId::deserialize(deserializer)? {
		RawId::Text(s) => s,
		RawId::Int(i) => i.to_string(),
		RawId::Float(f) => f.to_string(),
	})
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn weight_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(default_weight))
}
