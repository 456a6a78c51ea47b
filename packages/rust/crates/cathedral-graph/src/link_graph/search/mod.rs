//! Metadata search over a corpus index.

mod highlight;
mod query;

pub use highlight::highlight_query;
pub use query::ParsedQuery;

use super::index::CorpusIndex;
use super::models::{GardenNode, NodeStage};

fn searchable_text(node: &GardenNode) -> String {
    let meta = &node.metadata;
    format!(
        "{} {} {} {} {}",
        meta.title,
        meta.description.as_deref().unwrap_or_default(),
        meta.tags.join(" "),
        node.excerpt,
        meta.stage.as_str()
    )
    .to_lowercase()
}

fn title_hits(node: &GardenNode, terms: &[String]) -> usize {
    let title = node.metadata.title.to_lowercase();
    terms
        .iter()
        .filter(|term| title.contains(term.as_str()))
        .count()
}

impl CorpusIndex {
    /// Run a raw search query.
    ///
    /// `stage:`/`tag:` queries delegate to the structured listings. Free text
    /// requires every term to appear in a node's title, description, tags,
    /// excerpt, or stage; private nodes never match.
    #[must_use]
    pub fn search(&self, raw_query: &str) -> Vec<GardenNode> {
        match ParsedQuery::parse(raw_query) {
            ParsedQuery::StageFilter(stage) => NodeStage::from_alias(&stage)
                .map(|stage| self.nodes_by_stage(stage))
                .unwrap_or_default(),
            ParsedQuery::TagFilter(tag) => self.nodes_by_tag(&tag),
            ParsedQuery::FreeText(terms) => self.search_free_text(&terms),
        }
    }

    fn search_free_text(&self, terms: &[String]) -> Vec<GardenNode> {
        let mut hits: Vec<(usize, &GardenNode)> = self
            .nodes()
            .filter(|node| !node.metadata.visibility.is_private())
            .filter(|node| {
                let text = searchable_text(node);
                terms.iter().all(|term| text.contains(term.as_str()))
            })
            .map(|node| (title_hits(node, terms), node))
            .collect();
        hits.sort_by(|(left_hits, left), (right_hits, right)| {
            right_hits
                .cmp(left_hits)
                .then_with(|| right.metadata.importance.cmp(&left.metadata.importance))
                .then_with(|| left.slug.cmp(&right.slug))
        });
        hits.into_iter().map(|(_, node)| node.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_graph::index::test_support::node;

    fn corpus() -> CorpusIndex {
        CorpusIndex::assemble(
            Vec::new(),
            vec![
                node(
                    "graph-theory",
                    "---\ntitle: Graph Theory\nimportance: 2\ntags: [math]\n---\nNodes and edges.",
                ),
                node(
                    "gardening",
                    "---\ntitle: Gardening\nimportance: 5\ndescription: A graph of plants\nstage: tree\n---\nSoil.",
                ),
                node(
                    "hidden-graph",
                    "---\ntitle: Hidden Graph\nvisibility: private\n---\nSecret graph.",
                ),
                node(
                    "draft-graph",
                    "---\ntitle: Draft Graph\nvisibility: unlisted\nstage: tree\n---\nWIP.",
                ),
            ],
        )
    }

    fn slugs(nodes: &[GardenNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.slug.as_str()).collect()
    }

    #[test]
    fn test_free_text_ranking_and_visibility() {
        let results = corpus().search("graph");
        // Title hits first (importance 3 beats 2), then description-only match.
        assert_eq!(
            slugs(&results),
            vec!["draft-graph", "graph-theory", "gardening"]
        );
    }

    #[test]
    fn test_free_text_requires_all_terms() {
        let index = corpus();
        assert_eq!(slugs(&index.search("graph math")), vec!["graph-theory"]);
        assert!(index.search("graph cooking").is_empty());
    }

    #[test]
    fn test_structured_filters_short_circuit() {
        let index = corpus();
        assert_eq!(slugs(&index.search("stage:tree")), vec!["gardening"]);
        assert_eq!(slugs(&index.search("tag: math")), vec!["graph-theory"]);
        assert!(index.search("stage:shrub").is_empty());
    }
}
