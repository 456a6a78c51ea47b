//! Shared models for garden notes, link indexes, and graph projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Growth-maturity classification of a note.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeStage {
    /// Fresh, barely formed idea.
    #[default]
    Seed,
    /// Growing idea with some structure.
    Sapling,
    /// Mature, well-connected note.
    Tree,
    /// Hub note spanning many trees.
    Forest,
}

impl NodeStage {
    /// All stages in growth order.
    pub const ALL: [Self; 4] = [Self::Seed, Self::Sapling, Self::Tree, Self::Forest];

    /// Parse a stage name; unknown names yield `None`.
    #[must_use]
    pub fn from_alias(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "seed" => Some(Self::Seed),
            "sapling" => Some(Self::Sapling),
            "tree" => Some(Self::Tree),
            "forest" => Some(Self::Forest),
            _ => None,
        }
    }

    /// Lowercase name used in front matter and search text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Sapling => "sapling",
            Self::Tree => "tree",
            Self::Forest => "forest",
        }
    }
}

/// Who may see a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeVisibility {
    /// Never listed, searched, or projected.
    Private,
    /// Searchable and projected, but not listed.
    Unlisted,
    /// Visible everywhere.
    #[default]
    Public,
}

impl NodeVisibility {
    /// Parse a visibility name; unknown names yield `None`.
    #[must_use]
    pub fn from_alias(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "private" => Some(Self::Private),
            "unlisted" => Some(Self::Unlisted),
            "public" => Some(Self::Public),
            _ => None,
        }
    }

    /// Whether the note is public.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }

    /// Whether the note is private.
    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

/// Fully populated note metadata. Missing or malformed front matter fields
/// are replaced by defaults during parsing, never left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Display title.
    pub title: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last-modified timestamp.
    pub modified: DateTime<Utc>,
    /// Growth stage.
    pub stage: NodeStage,
    /// Author confidence in `[0, 1]`.
    pub certainty: f64,
    /// Importance in `1..=5`.
    pub importance: u8,
    /// Visibility level.
    pub visibility: NodeVisibility,
    /// Sorted, deduplicated tags.
    pub tags: Vec<String>,
    /// Optional short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One knowledge-base entry loaded from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenNode {
    /// Path-derived identifier, `/`-separated, extension stripped.
    pub slug: String,
    /// Parsed metadata.
    pub metadata: NodeMetadata,
    /// Raw body after front matter.
    pub body: String,
    /// First paragraph (or first 160 chars) with links reduced to anchor text.
    pub excerpt: String,
    /// Whitespace-delimited word count of the body.
    pub word_count: usize,
    /// Estimated reading time in minutes (at least 1).
    pub reading_minutes: usize,
}

/// Target slug → sorted, deduplicated source slugs.
///
/// Contains an entry for every enumerated slug and for every dangling target.
pub type BacklinkMap = BTreeMap<String, Vec<String>>;

/// Inbound, outbound, and mutual links of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConnections {
    /// Nodes linking to this node.
    pub backlinks: Vec<String>,
    /// Nodes this node links to.
    pub forward_links: Vec<String>,
    /// Nodes linking both ways.
    pub bidirectional: Vec<String>,
}

/// Per-stage node counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDistribution {
    /// Seed count.
    pub seed: usize,
    /// Sapling count.
    pub sapling: usize,
    /// Tree count.
    pub tree: usize,
    /// Forest count.
    pub forest: usize,
}

impl StageDistribution {
    /// Count one node at `stage`.
    pub fn record(&mut self, stage: NodeStage) {
        match stage {
            NodeStage::Seed => self.seed += 1,
            NodeStage::Sapling => self.sapling += 1,
            NodeStage::Tree => self.tree += 1,
            NodeStage::Forest => self.forest += 1,
        }
    }
}

/// Aggregate statistics over public nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    /// Public node count.
    pub total: usize,
    /// Public nodes per stage.
    pub by_stage: StageDistribution,
    /// Mean certainty, `0.0` when empty.
    pub avg_certainty: f64,
    /// Mean importance, `0.0` when empty.
    pub avg_importance: f64,
}

/// Node row of the graph projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node slug.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Growth stage.
    pub stage: NodeStage,
    /// Importance in `1..=5`.
    pub importance: u8,
    /// Certainty in `[0, 1]`.
    pub certainty: f64,
    /// Visibility (never private).
    pub visibility: NodeVisibility,
}

/// Undirected, deduplicated edge of the graph projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    /// Linking node.
    pub source: String,
    /// Linked node.
    pub target: String,
    /// Whether the reverse edge also exists.
    pub bidirectional: bool,
}

/// Summary numbers for the graph projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Projected nodes.
    pub total_nodes: usize,
    /// Projected links.
    pub total_links: usize,
    /// Links flagged bidirectional.
    pub bidirectional_links: usize,
    /// Nodes with no projected link.
    pub orphan_nodes: usize,
    /// `2 * links / nodes`, `0.0` when there are no links.
    pub average_connections: f64,
    /// Nodes per stage.
    pub stage_distribution: StageDistribution,
}

/// A node with its projected link count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedNode {
    /// Node slug.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Number of projected links touching the node.
    pub connection_count: usize,
}

/// Visualization-ready node/edge lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphProjection {
    /// Non-private nodes in slug order.
    pub nodes: Vec<GraphNode>,
    /// Links between projected nodes.
    pub links: Vec<GraphLink>,
    /// Summary statistics.
    pub stats: GraphStats,
}
