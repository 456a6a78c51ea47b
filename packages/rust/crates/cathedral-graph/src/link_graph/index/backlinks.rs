use crate::link_graph::models::BacklinkMap;
use std::collections::{BTreeMap, BTreeSet};

/// Invert forward links into a target → sources map.
///
/// Every enumerated slug gets an entry; targets that match no file are kept
/// as dangling entries. Source lists come out sorted and deduplicated
/// regardless of the order notes were processed in.
pub(super) fn build_backlink_map(
    slugs: &[String],
    forward: &BTreeMap<String, BTreeSet<String>>,
) -> BacklinkMap {
    let mut inverted: BTreeMap<String, BTreeSet<String>> = slugs
        .iter()
        .map(|slug| (slug.clone(), BTreeSet::new()))
        .collect();
    for (source, targets) in forward {
        for target in targets {
            inverted
                .entry(target.clone())
                .or_default()
                .insert(source.clone());
        }
    }
    inverted
        .into_iter()
        .map(|(target, sources)| (target, sources.into_iter().collect()))
        .collect()
}
