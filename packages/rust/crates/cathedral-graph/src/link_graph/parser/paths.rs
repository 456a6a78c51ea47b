use std::path::{Component, Path, PathBuf};

/// Extensions recognized as garden notes, in lookup order.
pub(crate) const NOTE_EXTENSIONS: [&str; 2] = ["md", "mdx"];

pub(super) fn normalize_slashes(raw: &str) -> String {
    raw.replace('\\', "/")
}

pub(super) fn trim_md_extension(raw: &str) -> &str {
    for ext in [".mdx", ".md"] {
        if raw.len() < ext.len() {
            continue;
        }
        let split = raw.len() - ext.len();
        if let (Some(stem), Some(tail)) = (raw.get(..split), raw.get(split..))
            && tail.eq_ignore_ascii_case(ext)
        {
            return stem;
        }
    }
    raw
}

/// Whether file extension is a markdown variant indexed by the garden.
#[must_use]
pub fn is_supported_note(path: &Path) -> bool {
    path.extension()
        .and_then(|v| v.to_str())
        .is_some_and(|ext| {
            let lower = ext.to_lowercase();
            NOTE_EXTENSIONS.contains(&lower.as_str())
        })
}

/// Slug for a note file: path relative to `root`, extension stripped, `/`-separated.
#[must_use]
pub fn slug_from_path(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let rel_str = normalize_slashes(&rel.to_string_lossy());
    let out = trim_md_extension(&rel_str).trim_matches('/').to_string();
    if out.is_empty() { None } else { Some(out) }
}

/// Candidate file paths for `slug` under `root`, one per note extension.
///
/// Returns `None` when the slug is empty or would escape the root.
#[must_use]
pub fn note_paths_for_slug(root: &Path, slug: &str) -> Option<Vec<PathBuf>> {
    let cleaned = normalize_slashes(slug.trim()).trim_matches('/').to_string();
    if cleaned.is_empty() {
        return None;
    }
    let relative = Path::new(&cleaned);
    let escapes = relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_)));
    if escapes {
        return None;
    }
    Some(
        NOTE_EXTENSIONS
            .iter()
            .map(|ext| root.join(format!("{cleaned}.{ext}")))
            .collect(),
    )
}

/// Fallback title derived from the last slug segment.
pub(super) fn title_from_slug(slug: &str) -> String {
    let last = slug.rsplit('/').next().unwrap_or_default().replace('-', " ");
    let trimmed = last.trim();
    if trimmed.is_empty() {
        "Untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
