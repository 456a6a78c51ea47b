//! Markdown garden link graph: parsing, indexing, ranking, and projection.

pub mod cache;
mod index;
mod models;
mod parser;
mod projection;
mod runtime_config;
mod search;
mod store;

pub use index::CorpusIndex;
pub use models::{
    BacklinkMap, ConnectedNode, GardenNode, GraphLink, GraphNode, GraphProjection, GraphStats,
    NodeConnections, NodeMetadata, NodeStage, NodeStats, NodeVisibility, StageDistribution,
};
pub use parser::{
    NoteTimestamps, extract_links, is_supported_note, normalize_page_name, parse_note,
    slug_from_path,
};
pub use projection::{DEFAULT_MOST_CONNECTED_LIMIT, project_graph};
pub use runtime_config::{
    GARDEN_CACHE_ENV, GARDEN_CONTENT_ROOT_ENV, GardenRuntimeConfig, load_settings_file,
    resolve_garden_runtime, set_garden_config_override,
};
pub use search::{ParsedQuery, highlight_query};
pub use store::{ContentStore, CorpusFingerprint, DEFAULT_EXCLUDED_DIR_NAMES, NoteStamp, RawNote};
