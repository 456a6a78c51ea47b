use super::CorpusIndex;
use crate::link_graph::models::{GardenNode, NodeStage, NodeStats, StageDistribution};

fn sort_by_modified_desc(nodes: &mut [GardenNode]) {
    nodes.sort_by(|left, right| {
        right
            .metadata
            .modified
            .cmp(&left.metadata.modified)
            .then_with(|| left.slug.cmp(&right.slug))
    });
}

impl CorpusIndex {
    fn public_nodes(&self) -> impl Iterator<Item = &GardenNode> {
        self.nodes()
            .filter(|node| node.metadata.visibility.is_public())
    }

    fn public_nodes_where(&self, predicate: impl Fn(&GardenNode) -> bool) -> Vec<GardenNode> {
        let mut out: Vec<GardenNode> = self
            .public_nodes()
            .filter(|node| predicate(node))
            .cloned()
            .collect();
        sort_by_modified_desc(&mut out);
        out
    }

    /// Most recently modified public nodes.
    #[must_use]
    pub fn recent_nodes(&self, limit: usize) -> Vec<GardenNode> {
        let mut out = self.public_nodes_where(|_| true);
        out.truncate(limit);
        out
    }

    /// Public nodes carrying exactly `tag`, newest first.
    #[must_use]
    pub fn nodes_by_tag(&self, tag: &str) -> Vec<GardenNode> {
        self.public_nodes_where(|node| node.metadata.tags.iter().any(|t| t == tag))
    }

    /// Public nodes at `stage`, newest first.
    #[must_use]
    pub fn nodes_by_stage(&self, stage: NodeStage) -> Vec<GardenNode> {
        self.public_nodes_where(|node| node.metadata.stage == stage)
    }

    /// Counts and averages over public nodes; averages are `0.0` when empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn node_stats(&self) -> NodeStats {
        let mut by_stage = StageDistribution::default();
        let mut total = 0_usize;
        let mut certainty_sum = 0.0_f64;
        let mut importance_sum = 0.0_f64;
        for node in self.public_nodes() {
            total += 1;
            by_stage.record(node.metadata.stage);
            certainty_sum += node.metadata.certainty;
            importance_sum += f64::from(node.metadata.importance);
        }
        let mean = |sum: f64| if total == 0 { 0.0 } else { sum / total as f64 };
        NodeStats {
            total,
            by_stage,
            avg_certainty: mean(certainty_sum),
            avg_importance: mean(importance_sum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::node;
    use super::*;

    fn corpus() -> CorpusIndex {
        CorpusIndex::assemble(
            Vec::new(),
            vec![
                node(
                    "old",
                    "---\nmodified: 2023-01-01\nstage: tree\ntags: [rust]\nimportance: 5\ncertainty: 1\n---\n",
                ),
                node(
                    "new",
                    "---\nmodified: 2024-06-01\nstage: seed\ntags: [rust, graph]\nimportance: 1\ncertainty: 0\n---\n",
                ),
                node(
                    "draft",
                    "---\nmodified: 2025-01-01\nvisibility: unlisted\ntags: [rust]\n---\n",
                ),
                node("secret", "---\nmodified: 2025-02-01\nvisibility: private\n---\n"),
            ],
        )
    }

    fn slugs(nodes: &[GardenNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.slug.as_str()).collect()
    }

    #[test]
    fn test_listings_are_public_and_newest_first() {
        let index = corpus();
        assert_eq!(slugs(&index.recent_nodes(10)), vec!["new", "old"]);
        assert_eq!(slugs(&index.recent_nodes(1)), vec!["new"]);
        assert_eq!(slugs(&index.nodes_by_tag("rust")), vec!["new", "old"]);
        assert_eq!(slugs(&index.nodes_by_tag("Rust")), Vec::<&str>::new());
        assert_eq!(slugs(&index.nodes_by_stage(NodeStage::Tree)), vec!["old"]);
    }

    #[test]
    fn test_node_stats_over_public_nodes() {
        let stats = corpus().node_stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_stage.tree, 1);
        assert_eq!(stats.by_stage.seed, 1);
        assert!((stats.avg_certainty - 0.5).abs() < f64::EPSILON);
        assert!((stats.avg_importance - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_corpus_stats_are_zero() {
        let stats = CorpusIndex::default().node_stats();
        assert_eq!(stats.total, 0);
        assert!(stats.avg_certainty.abs() < f64::EPSILON);
        assert!(stats.avg_importance.abs() < f64::EPSILON);
    }
}
