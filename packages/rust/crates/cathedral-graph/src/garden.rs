//! Outward API over one content root.

use crate::error::GardenError;
use crate::link_graph::{
    BacklinkMap, ContentStore, CorpusIndex, GardenNode, GardenRuntimeConfig, GraphProjection,
    NodeConnections, NodeStage, NodeStats, cache, project_graph,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Query facade for a garden.
///
/// Every query rebuilds the corpus index from disk unless the snapshot cache
/// is enabled, in which case a fingerprint-validated snapshot is reused.
/// Queries never fail; unreadable notes are skipped and logged.
#[derive(Debug, Clone)]
pub struct KnowledgeGarden {
    store: ContentStore,
    cache_enabled: bool,
    recent_limit: usize,
    related_limit: usize,
}

impl KnowledgeGarden {
    /// Garden over `root` with default settings and no cache.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(&GardenRuntimeConfig {
            content_root: root.into(),
            ..GardenRuntimeConfig::default()
        })
    }

    /// Garden over `root` that fails fast when the root is not a directory.
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::ContentRoot`] for a missing or non-directory root.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, GardenError> {
        let garden = Self::new(root);
        garden.store.ensure_root()?;
        Ok(garden)
    }

    /// Garden configured from resolved runtime settings.
    #[must_use]
    pub fn from_config(config: &GardenRuntimeConfig) -> Self {
        Self {
            store: ContentStore::with_excluded_dirs(&config.content_root, &config.exclude_dirs),
            cache_enabled: config.cache_enabled,
            recent_limit: config.recent_limit,
            related_limit: config.related_limit,
        }
    }

    /// Enable or disable the snapshot cache.
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.store.root()
    }

    /// Configured default for [`Self::recent_nodes`].
    #[must_use]
    pub const fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Configured default for [`Self::related_nodes`].
    #[must_use]
    pub const fn related_limit(&self) -> usize {
        self.related_limit
    }

    /// Corpus index for the current state of the content root.
    #[must_use]
    pub fn index(&self) -> Arc<CorpusIndex> {
        if self.cache_enabled {
            cache::load_index_cached(&self.store)
        } else {
            Arc::new(CorpusIndex::build(&self.store))
        }
    }

    /// Every note slug, sorted.
    #[must_use]
    pub fn all_node_slugs(&self) -> Vec<String> {
        self.store.all_slugs()
    }

    /// One fully parsed node, regardless of visibility.
    #[must_use]
    pub fn node_content(&self, slug: &str) -> Option<GardenNode> {
        self.store.load_node(slug)
    }

    /// Most recently modified public nodes.
    #[must_use]
    pub fn recent_nodes(&self, limit: usize) -> Vec<GardenNode> {
        self.index().recent_nodes(limit)
    }

    /// Public nodes carrying `tag`, newest first.
    #[must_use]
    pub fn nodes_by_tag(&self, tag: &str) -> Vec<GardenNode> {
        self.index().nodes_by_tag(tag)
    }

    /// Public nodes at `stage`, newest first.
    #[must_use]
    pub fn nodes_by_stage(&self, stage: NodeStage) -> Vec<GardenNode> {
        self.index().nodes_by_stage(stage)
    }

    /// Structured or free-text search.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<GardenNode> {
        self.index().search(query)
    }

    /// Complete target → sources map.
    #[must_use]
    pub fn backlink_map(&self) -> BacklinkMap {
        self.index().backlink_map().clone()
    }

    /// Backlinks, forward links, and mutual links of `slug`.
    #[must_use]
    pub fn node_connections(&self, slug: &str) -> NodeConnections {
        self.index().connections(slug)
    }

    /// Neighbours of `slug` ranked by shared connections.
    #[must_use]
    pub fn related_nodes(&self, slug: &str, limit: usize) -> Vec<String> {
        self.index().related_nodes(slug, limit)
    }

    /// Counts and averages over public nodes.
    #[must_use]
    pub fn node_stats(&self) -> NodeStats {
        self.index().node_stats()
    }

    /// Visualization-ready node/edge projection.
    #[must_use]
    pub fn graph(&self) -> GraphProjection {
        project_graph(&self.index())
    }
}
