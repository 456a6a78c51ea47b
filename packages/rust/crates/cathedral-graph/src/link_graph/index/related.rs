use super::CorpusIndex;

impl CorpusIndex {
    /// Neighbours of `slug` ranked by how many of its neighbours they share.
    ///
    /// Candidates are the union of backlinks and forward links. A candidate
    /// scores the size of the overlap between its own neighbourhood and the
    /// query node's; zero-overlap candidates are dropped. Ties break by slug.
    /// Private notes count as shared neighbours but are never returned.
    #[must_use]
    pub fn related_nodes(&self, slug: &str, limit: usize) -> Vec<String> {
        if limit == 0 {
            return Vec::new();
        }
        let all_connected = self.neighbourhood(slug);
        // `all_connected` is a set, so each neighbourhood is computed once per query.
        let mut scored: Vec<(&str, usize)> = all_connected
            .iter()
            .filter(|candidate| !self.is_private(candidate))
            .filter_map(|candidate| {
                let theirs = self.neighbourhood(candidate);
                let shared = all_connected.intersection(&theirs).count();
                (shared > 0).then_some((*candidate, shared))
            })
            .collect();
        scored.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(right.0)));
        scored
            .into_iter()
            .take(limit)
            .map(|(candidate, _)| candidate.to_string())
            .collect()
    }
}
