use super::CorpusIndex;
use crate::link_graph::models::NodeConnections;
use std::collections::BTreeSet;

impl CorpusIndex {
    /// Sources linking to `slug` (empty for unknown slugs).
    #[must_use]
    pub fn backlinks(&self, slug: &str) -> &[String] {
        self.backlinks.get(slug).map_or(&[], Vec::as_slice)
    }

    /// Targets `slug` links to, sorted (empty when the note did not load).
    #[must_use]
    pub fn forward_links(&self, slug: &str) -> Vec<String> {
        self.forward
            .get(slug)
            .map(|targets| targets.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Backlinks, forward links, and their intersection for one node.
    #[must_use]
    pub fn connections(&self, slug: &str) -> NodeConnections {
        let backlinks = self.backlinks(slug).to_vec();
        let forward_links = self.forward_links(slug);
        let bidirectional = match self.forward.get(slug) {
            Some(targets) => backlinks
                .iter()
                .filter(|source| targets.contains(*source))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        NodeConnections {
            backlinks,
            forward_links,
            bidirectional,
        }
    }

    /// Union of a node's backlinks and forward links.
    pub(super) fn neighbourhood(&self, slug: &str) -> BTreeSet<&str> {
        let mut out: BTreeSet<&str> = self.backlinks(slug).iter().map(String::as_str).collect();
        if let Some(targets) = self.forward.get(slug) {
            out.extend(targets.iter().map(String::as_str));
        }
        out
    }

    /// Total directed links across the corpus.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.forward.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::node;
    use super::*;

    #[test]
    fn test_bidirectional_is_intersection() {
        let index = CorpusIndex::assemble(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                node("a", "[[b]] [[c]]"),
                node("b", "[[a]]"),
                node("c", "nothing"),
            ],
        );
        let conn = index.connections("a");
        assert_eq!(conn.backlinks, vec!["b"]);
        assert_eq!(conn.forward_links, vec!["b", "c"]);
        assert_eq!(conn.bidirectional, vec!["b"]);

        let conn = index.connections("c");
        assert_eq!(conn.backlinks, vec!["a"]);
        assert!(conn.forward_links.is_empty());
        assert!(conn.bidirectional.is_empty());
        assert_eq!(index.link_count(), 3);
    }

    #[test]
    fn test_unknown_slug_has_empty_connections() {
        let index = CorpusIndex::assemble(vec!["a".into()], vec![node("a", "[[ghost]]")]);
        assert_eq!(index.connections("missing"), NodeConnections::default());
        assert_eq!(index.connections("ghost").backlinks, vec!["a"]);
    }
}
