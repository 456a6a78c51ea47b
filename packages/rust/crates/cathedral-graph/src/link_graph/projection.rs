//! Visualization-ready projection of the corpus link graph.

use super::index::CorpusIndex;
use super::models::{
    ConnectedNode, GraphLink, GraphNode, GraphProjection, GraphStats, StageDistribution,
};
use std::collections::{BTreeMap, HashSet};

/// Default number of entries in a most-connected ranking.
pub const DEFAULT_MOST_CONNECTED_LIMIT: usize = 6;

fn pair_key<'a>(left: &'a str, right: &'a str) -> (&'a str, &'a str) {
    if left <= right {
        (left, right)
    } else {
        (right, left)
    }
}

/// Project loaded, non-private nodes and the links between them.
///
/// Links are walked in backlink-map order (target, then sorted sources); the
/// first direction seen for an unordered pair wins and is flagged
/// bidirectional when the reverse edge also exists.
#[must_use]
pub fn project_graph(index: &CorpusIndex) -> GraphProjection {
    let nodes: Vec<GraphNode> = index
        .nodes()
        .filter(|node| !node.metadata.visibility.is_private())
        .map(|node| GraphNode {
            id: node.slug.clone(),
            title: node.metadata.title.clone(),
            stage: node.metadata.stage,
            importance: node.metadata.importance,
            certainty: node.metadata.certainty,
            visibility: node.metadata.visibility,
        })
        .collect();
    let projected: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();

    let backlinks = index.backlink_map();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut links: Vec<GraphLink> = Vec::new();
    for (target, sources) in backlinks {
        if !projected.contains(target.as_str()) {
            continue;
        }
        for source in sources {
            if !projected.contains(source.as_str())
                || !seen.insert(pair_key(source.as_str(), target.as_str()))
            {
                continue;
            }
            let bidirectional = backlinks
                .get(source)
                .is_some_and(|reverse| reverse.binary_search(target).is_ok());
            links.push(GraphLink {
                source: source.clone(),
                target: target.clone(),
                bidirectional,
            });
        }
    }

    let stats = graph_stats(&nodes, &links);
    GraphProjection {
        nodes,
        links,
        stats,
    }
}

fn connection_counts(links: &[GraphLink]) -> BTreeMap<&str, usize> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for link in links {
        *counts.entry(link.source.as_str()).or_default() += 1;
        *counts.entry(link.target.as_str()).or_default() += 1;
    }
    counts
}

#[allow(clippy::cast_precision_loss)]
fn graph_stats(nodes: &[GraphNode], links: &[GraphLink]) -> GraphStats {
    let counts = connection_counts(links);
    let mut stage_distribution = StageDistribution::default();
    for node in nodes {
        stage_distribution.record(node.stage);
    }
    let orphan_nodes = nodes
        .iter()
        .filter(|node| !counts.contains_key(node.id.as_str()))
        .count();
    let average_connections = if links.is_empty() || nodes.is_empty() {
        0.0
    } else {
        (links.len() * 2) as f64 / nodes.len() as f64
    };
    GraphStats {
        total_nodes: nodes.len(),
        total_links: links.len(),
        bidirectional_links: links.iter().filter(|link| link.bidirectional).count(),
        orphan_nodes,
        average_connections,
        stage_distribution,
    }
}

impl GraphProjection {
    /// Projected nodes ranked by link count (desc, then slug).
    ///
    /// Unlinked nodes rank with a count of zero, so short lists are filled out.
    #[must_use]
    pub fn most_connected(&self, limit: usize) -> Vec<ConnectedNode> {
        let counts = connection_counts(&self.links);
        let mut ranked: Vec<ConnectedNode> = self
            .nodes
            .iter()
            .map(|node| ConnectedNode {
                id: node.id.clone(),
                title: node.title.clone(),
                connection_count: counts.get(node.id.as_str()).copied().unwrap_or(0),
            })
            .collect();
        ranked.sort_by(|left, right| {
            right
                .connection_count
                .cmp(&left.connection_count)
                .then_with(|| left.id.cmp(&right.id))
        });
        ranked.truncate(limit);
        ranked
    }
}
