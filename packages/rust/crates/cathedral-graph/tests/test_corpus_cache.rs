use cathedral_graph::link_graph::{ContentStore, cache};
use cathedral_graph::{KnowledgeGarden, NodeStage};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[test]
fn test_cache_reuses_snapshot_until_corpus_changes() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_file(&tmp.path().join("a.md"), "[[b]]")?;
    write_file(&tmp.path().join("b.md"), "plain")?;
    let store = ContentStore::new(tmp.path());

    let first = cache::load_index_cached(&store);
    let second = cache::load_index_cached(&store);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(cache::cache_len() >= 1);

    write_file(&tmp.path().join("b.md"), "now links back to [[a]]")?;
    let third = cache::load_index_cached(&store);
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.backlinks("a"), ["b".to_string()]);

    cache::invalidate(&store);
    let fourth = cache::load_index_cached(&store);
    assert!(!Arc::ptr_eq(&third, &fourth));
    Ok(())
}

#[test]
fn test_cached_and_uncached_results_match() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_file(&tmp.path().join("hub.md"), "[[x]] [[y]]")?;
    write_file(&tmp.path().join("x.md"), "[[y]] [[hub]]")?;
    write_file(&tmp.path().join("y.md"), "---\nstage: tree\n---\n[[hub]]")?;

    let cached = KnowledgeGarden::new(tmp.path()).with_cache(true);
    let uncached = KnowledgeGarden::new(tmp.path());
    assert_eq!(cached.backlink_map(), uncached.backlink_map());
    assert_eq!(cached.related_nodes("hub", 5), uncached.related_nodes("hub", 5));
    assert_eq!(cached.graph(), uncached.graph());

    write_file(&tmp.path().join("z.md"), "[[hub]]")?;
    assert_eq!(cached.backlink_map(), uncached.backlink_map());
    assert_eq!(cached.node_stats(), uncached.node_stats());
    Ok(())
}

#[test]
fn test_cache_rebuilds_after_rename() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_file(&tmp.path().join("a.md"), "[[x]]")?;
    write_file(&tmp.path().join("x.md"), "plain")?;
    let store = ContentStore::new(tmp.path());
    let before = store.fingerprint();

    let cached = KnowledgeGarden::new(tmp.path()).with_cache(true);
    assert_eq!(
        cached.backlink_map().get("x").cloned(),
        Some(vec!["a".to_string()])
    );

    fs::rename(tmp.path().join("a.md"), tmp.path().join("renamed.md"))?;
    let after = store.fingerprint();
    assert_eq!(before.note_count, after.note_count);
    assert_eq!(before.total_size_bytes, after.total_size_bytes);
    assert_ne!(before, after);

    let uncached = KnowledgeGarden::new(tmp.path());
    assert_eq!(cached.backlink_map(), uncached.backlink_map());
    assert_eq!(
        cached.backlink_map().get("x").cloned(),
        Some(vec!["renamed".to_string()])
    );
    assert!(!cached.backlink_map().contains_key("a"));
    Ok(())
}

#[test]
fn test_cache_rebuilds_after_same_size_edit() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("note.md");
    write_file(&path, "---\nstage: tree\n---\nbody")?;
    let original_mtime = fs::metadata(&path)?.modified()?;

    let cached = KnowledgeGarden::new(tmp.path()).with_cache(true);
    assert_eq!(cached.nodes_by_stage(NodeStage::Tree).len(), 1);

    write_file(&path, "---\nstage: seed\n---\nbody")?;
    // Same size, mtime a millisecond later: only the per-file stamp moves.
    fs::File::options()
        .write(true)
        .open(&path)?
        .set_modified(original_mtime + Duration::from_millis(1))?;

    let uncached = KnowledgeGarden::new(tmp.path());
    assert!(cached.nodes_by_stage(NodeStage::Tree).is_empty());
    assert_eq!(
        cached.nodes_by_stage(NodeStage::Seed),
        uncached.nodes_by_stage(NodeStage::Seed)
    );
    Ok(())
}
