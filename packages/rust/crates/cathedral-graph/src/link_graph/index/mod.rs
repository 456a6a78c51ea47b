//! Corpus-wide link index: forward links, backlinks, and node lookups.

use super::models::{BacklinkMap, GardenNode};
use super::parser::extract_links;
use super::store::ContentStore;
use log::debug;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

mod backlinks;
mod connections;
mod listing;
mod related;

/// Immutable snapshot of one corpus: loaded nodes plus both link directions.
///
/// Built transiently per query (or served from the snapshot cache); never
/// mutated after assembly.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    slugs: Vec<String>,
    nodes: BTreeMap<String, GardenNode>,
    forward: BTreeMap<String, BTreeSet<String>>,
    backlinks: BacklinkMap,
}

impl CorpusIndex {
    /// Enumerate, load, and link every note in `store`.
    #[must_use]
    pub fn build(store: &ContentStore) -> Self {
        let slugs = store.all_slugs();
        let nodes = store.load_nodes(&slugs);
        let index = Self::assemble(slugs, nodes);
        debug!(
            "corpus index built for {}: {} slugs, {} nodes, {} link targets",
            store.root().display(),
            index.slugs.len(),
            index.nodes.len(),
            index.backlinks.len()
        );
        index
    }

    /// Assemble an index from enumerated slugs and the nodes that loaded.
    ///
    /// Slugs without a node (unreadable files) still get an empty backlink
    /// entry but contribute no links.
    #[must_use]
    pub fn assemble(slugs: Vec<String>, nodes: Vec<GardenNode>) -> Self {
        let forward: BTreeMap<String, BTreeSet<String>> = nodes
            .par_iter()
            .map(|node| (node.slug.clone(), extract_links(&node.body, &node.slug)))
            .collect();

        let mut all_slugs: BTreeSet<String> = slugs.into_iter().collect();
        all_slugs.extend(nodes.iter().map(|node| node.slug.clone()));
        let slugs: Vec<String> = all_slugs.into_iter().collect();

        let backlinks = backlinks::build_backlink_map(&slugs, &forward);
        let nodes = nodes
            .into_iter()
            .map(|node| (node.slug.clone(), node))
            .collect();
        Self {
            slugs,
            nodes,
            forward,
            backlinks,
        }
    }

    /// Enumerated slugs, sorted.
    #[must_use]
    pub fn slugs(&self) -> &[String] {
        &self.slugs
    }

    /// Loaded node for `slug`, if any.
    #[must_use]
    pub fn node(&self, slug: &str) -> Option<&GardenNode> {
        self.nodes.get(slug)
    }

    /// Loaded nodes in slug order.
    pub fn nodes(&self) -> impl Iterator<Item = &GardenNode> {
        self.nodes.values()
    }

    /// Number of loaded nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Full target → sources map, dangling targets included.
    #[must_use]
    pub fn backlink_map(&self) -> &BacklinkMap {
        &self.backlinks
    }

    pub(crate) fn is_private(&self, slug: &str) -> bool {
        self.nodes
            .get(slug)
            .is_some_and(|node| node.metadata.visibility.is_private())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::link_graph::models::GardenNode;
    use crate::link_graph::parser::{NoteTimestamps, parse_note};
    use chrono::{DateTime, Utc};

    pub(crate) fn node(slug: &str, content: &str) -> GardenNode {
        let fallback = NoteTimestamps::fixed(DateTime::<Utc>::UNIX_EPOCH);
        match parse_note(slug, content, fallback) {
            Some(node) => node,
            None => panic!("test node must parse: {slug}"),
        }
    }
}
