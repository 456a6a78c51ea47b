//! Content root access: note enumeration, reads, and corpus fingerprints.

use super::models::GardenNode;
use super::parser::{
    NoteTimestamps, is_supported_note, note_paths_for_slug, parse_note, slug_from_path,
};
use crate::error::GardenError;
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

/// Directory names never descended into.
pub const DEFAULT_EXCLUDED_DIR_NAMES: &[&str] = &[".git", ".cache", "node_modules", "target"];

/// Per-file stamp recorded in a [`CorpusFingerprint`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteStamp {
    /// Note slug.
    pub slug: String,
    /// Modification time as unix seconds plus sub-second nanoseconds.
    pub modified: Option<(i64, u32)>,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Content watermark used to detect corpus changes.
///
/// Renames, additions, removals, and any edit that moves a file's mtime or
/// size change the fingerprint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusFingerprint {
    /// Number of note files.
    pub note_count: usize,
    /// Latest modification time across notes, unix seconds.
    pub latest_modified_ts: Option<i64>,
    /// Sum of note file sizes.
    pub total_size_bytes: u64,
    /// Stamps of every note file, in path order.
    pub notes: Vec<NoteStamp>,
}

/// A raw note read from disk.
#[derive(Debug, Clone)]
pub struct RawNote {
    /// Note slug.
    pub slug: String,
    /// File the note was read from.
    pub path: PathBuf,
    /// Full file content, front matter included.
    pub content: String,
}

fn normalize_excluded_dir(name: &str) -> Option<String> {
    let trimmed = name.trim().trim_matches('/').to_lowercase();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed)
}

fn merge_excluded_dirs(excluded_dirs: &[String]) -> Vec<String> {
    let mut out: Vec<String> = DEFAULT_EXCLUDED_DIR_NAMES
        .iter()
        .map(|name| (*name).to_string())
        .chain(excluded_dirs.iter().cloned())
        .filter_map(|name| normalize_excluded_dir(&name))
        .collect();
    out.sort();
    out.dedup();
    out
}

fn system_time_to_unix(ts: SystemTime) -> Option<(i64, u32)> {
    let elapsed = ts.duration_since(UNIX_EPOCH).ok()?;
    let seconds = i64::try_from(elapsed.as_secs()).ok()?;
    Some((seconds, elapsed.subsec_nanos()))
}

/// Sibling of the first candidate whose stem matches exactly and whose
/// extension is a note extension in any letter case (`Note.MD`, `a.Mdx`).
fn find_note_ignoring_extension_case(candidates: &[PathBuf]) -> Option<PathBuf> {
    let first = candidates.first()?;
    let dir = first.parent()?;
    let stem = first.file_stem()?;
    let mut matches: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_stem() == Some(stem) && is_supported_note(path) && path.is_file()
        })
        .collect();
    // `.md` before `.mdx`, then a stable path order.
    matches.sort_by_key(|path| {
        let is_mdx = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mdx"));
        (is_mdx, path.clone())
    });
    matches.into_iter().next()
}

/// Read-only view over a directory of markdown notes.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    excluded_dirs: Vec<String>,
}

impl ContentStore {
    /// Store rooted at `root` with the default excluded directories.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_excluded_dirs(root, &[])
    }

    /// Store rooted at `root`, additionally skipping directories named in `excluded_dirs`.
    #[must_use]
    pub fn with_excluded_dirs(root: impl Into<PathBuf>, excluded_dirs: &[String]) -> Self {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);
        Self {
            root,
            excluded_dirs: merge_excluded_dirs(excluded_dirs),
        }
    }

    /// Content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalized excluded directory names.
    #[must_use]
    pub fn excluded_dirs(&self) -> &[String] {
        &self.excluded_dirs
    }

    /// Fail unless the content root is an accessible directory.
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::ContentRoot`] when the root is missing or not a directory.
    pub fn ensure_root(&self) -> Result<(), GardenError> {
        let meta = std::fs::metadata(&self.root).map_err(|e| GardenError::ContentRoot {
            path: self.root.clone(),
            reason: e.to_string(),
        })?;
        if meta.is_dir() {
            Ok(())
        } else {
            Err(GardenError::ContentRoot {
                path: self.root.clone(),
                reason: "not a directory".to_string(),
            })
        }
    }

    fn should_skip_entry(&self, path: &Path, is_dir: bool, excluded: &HashSet<&str>) -> bool {
        if path == self.root {
            return false;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
            return false;
        };
        if name.starts_with('.') {
            return true;
        }
        is_dir && excluded.contains(name.as_str())
    }

    fn note_files(&self) -> Vec<PathBuf> {
        let excluded: HashSet<&str> = self.excluded_dirs.iter().map(String::as_str).collect();
        let mut out: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                !self.should_skip_entry(entry.path(), entry.file_type().is_dir(), &excluded)
            })
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable entry under {}: {err}", self.root.display());
                    continue;
                }
            };
            if entry.file_type().is_file() && is_supported_note(entry.path()) {
                out.push(entry.into_path());
            }
        }
        out
    }

    /// Every note slug under the root, sorted.
    ///
    /// An inaccessible root logs a warning and yields an empty list.
    #[must_use]
    pub fn all_slugs(&self) -> Vec<String> {
        if let Err(err) = self.ensure_root() {
            warn!("{err}");
            return Vec::new();
        }
        let mut slugs: Vec<String> = self
            .note_files()
            .iter()
            .filter_map(|path| slug_from_path(path, &self.root))
            .collect();
        slugs.sort();
        slugs.dedup();
        slugs
    }

    /// Resolve the file backing `slug` (`.md` preferred over `.mdx`, extension case ignored).
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::InvalidSlug`] for slugs escaping the root and
    /// [`GardenError::NotFound`] when no note file exists.
    pub fn note_path(&self, slug: &str) -> Result<PathBuf, GardenError> {
        let candidates = note_paths_for_slug(&self.root, slug)
            .ok_or_else(|| GardenError::InvalidSlug(slug.to_string()))?;
        if let Some(path) = candidates.iter().find(|path| path.is_file()) {
            return Ok(path.clone());
        }
        find_note_ignoring_extension_case(&candidates)
            .ok_or_else(|| GardenError::NotFound(slug.to_string()))
    }

    /// Read the raw content of one note.
    ///
    /// # Errors
    ///
    /// Propagates slug resolution failures and read errors as [`GardenError`].
    pub fn read_note(&self, slug: &str) -> Result<RawNote, GardenError> {
        let path = self.note_path(slug)?;
        let content = std::fs::read_to_string(&path).map_err(|source| GardenError::Io {
            slug: slug.to_string(),
            source,
        })?;
        Ok(RawNote {
            slug: slug.to_string(),
            path,
            content,
        })
    }

    /// Load and parse one note; failures are logged and yield `None`.
    #[must_use]
    pub fn load_node(&self, slug: &str) -> Option<GardenNode> {
        match self.read_note(slug) {
            Ok(raw) => parse_note(
                &raw.slug,
                &raw.content,
                NoteTimestamps::from_filesystem(&raw.path),
            ),
            Err(err) => {
                warn!("error loading node {slug}: {err}");
                None
            }
        }
    }

    /// Load many notes in parallel; unreadable notes are dropped.
    ///
    /// Output order follows `slugs`.
    #[must_use]
    pub fn load_nodes(&self, slugs: &[String]) -> Vec<GardenNode> {
        let nodes: Vec<GardenNode> = slugs
            .par_iter()
            .filter_map(|slug| self.load_node(slug))
            .collect();
        debug!(
            "loaded {} of {} notes from {}",
            nodes.len(),
            slugs.len(),
            self.root.display()
        );
        nodes
    }

    /// Current corpus watermark: aggregate counters plus one stamp per note file.
    #[must_use]
    pub fn fingerprint(&self) -> CorpusFingerprint {
        let mut fingerprint = CorpusFingerprint::default();
        if self.ensure_root().is_err() {
            return fingerprint;
        }
        let mut paths = self.note_files();
        paths.sort();
        for path in paths {
            let Ok(meta) = std::fs::metadata(&path) else {
                continue;
            };
            let Some(slug) = slug_from_path(&path, &self.root) else {
                continue;
            };
            let modified = meta.modified().ok().and_then(system_time_to_unix);
            fingerprint.note_count = fingerprint.note_count.saturating_add(1);
            fingerprint.total_size_bytes = fingerprint.total_size_bytes.saturating_add(meta.len());
            if let Some((seconds, _)) = modified {
                fingerprint.latest_modified_ts = Some(
                    fingerprint
                        .latest_modified_ts
                        .map_or(seconds, |v| v.max(seconds)),
                );
            }
            fingerprint.notes.push(NoteStamp {
                slug,
                modified,
                size_bytes: meta.len(),
            });
        }
        fingerprint
    }
}
