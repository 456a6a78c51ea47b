use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::compile_regex;
use super::paths::trim_md_extension;

static WIKI_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"\[\[([^\]]+)\]\]"));
static MARKDOWN_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"\[([^\]]+)\]\(/([^)]+)\)"));
static URL_SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"^[A-Za-z][A-Za-z0-9+.\-]*:"));

/// Normalize a human-readable page name into a slug.
///
/// Lowercases and collapses whitespace runs into single hyphens, so
/// `"My  Page"` and `"my-page"` resolve to the same node.
#[must_use]
pub fn normalize_page_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn normalize_markdown_target(raw: &str) -> Option<String> {
    let mut candidate = raw.trim();
    if let Some((left, _fragment)) = candidate.split_once('#') {
        candidate = left;
    }
    if let Some((left, _query)) = candidate.split_once('?') {
        candidate = left;
    }
    // `[x](//host/path)` arrives here as `/host/path`.
    if candidate.starts_with('/')
        || candidate.contains("://")
        || URL_SCHEME_REGEX.is_match(candidate)
    {
        return None;
    }
    let normalized = trim_md_extension(candidate).trim_end_matches('/');
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

/// Extract outbound link targets from a note body.
///
/// Recognizes `[[Page Name]]` wiki links and `[text](/path)` root-relative
/// markdown links. External URLs and references to `self_slug` are dropped;
/// text that does not match either grammar is ignored.
#[must_use]
pub fn extract_links(text: &str, self_slug: &str) -> BTreeSet<String> {
    let mut links: BTreeSet<String> = BTreeSet::new();

    for caps in WIKI_LINK_REGEX.captures_iter(text) {
        let Some(name) = caps.get(1) else {
            continue;
        };
        let slug = normalize_page_name(name.as_str());
        if !slug.is_empty() {
            links.insert(slug);
        }
    }

    for caps in MARKDOWN_LINK_REGEX.captures_iter(text) {
        let Some(path) = caps.get(2) else {
            continue;
        };
        if let Some(slug) = normalize_markdown_target(path.as_str()) {
            links.insert(slug);
        }
    }

    links.remove(self_slug);
    links
}
