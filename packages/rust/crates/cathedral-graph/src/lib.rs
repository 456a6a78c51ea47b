//! cathedral-graph - link-graph engine for a markdown digital garden.
//!
//! Module layout (by domain):
//! - `link_graph::parser`: front matter, excerpts, and link extraction per note
//! - `link_graph::store`: content root enumeration and note reads
//! - `link_graph::index`: backlinks, connections, related ranking, listings
//! - `link_graph::search` / `link_graph::projection`: search and graph views
//! - `garden`: [`KnowledgeGarden`] facade used by the `cathedral` CLI
//!
//! # Examples
//!
//! ```rust
//! use cathedral_graph::extract_links;
//!
//! let links = extract_links("See [[My Page]] and [about](/meta/about.md#top).", "home");
//! let links: Vec<&str> = links.iter().map(String::as_str).collect();
//! assert_eq!(links, vec!["meta/about", "my-page"]);
//! ```

pub mod error;
pub mod garden;
pub mod link_graph;

pub use error::GardenError;
pub use garden::KnowledgeGarden;
pub use link_graph::{
    BacklinkMap, ConnectedNode, ContentStore, CorpusFingerprint, CorpusIndex, GardenNode,
    GardenRuntimeConfig, GraphLink, GraphNode, GraphProjection, GraphStats, NodeConnections,
    NodeMetadata, NodeStage, NodeStats, NodeVisibility, ParsedQuery, StageDistribution,
    extract_links, highlight_query, normalize_page_name, project_graph,
};
