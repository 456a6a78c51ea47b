//! Markdown note parsing for garden indexing.

mod content;
mod links;
mod paths;
mod time;

use super::models::{GardenNode, NodeMetadata};
use regex::Regex;

use self::content::{
    count_words, extract_certainty, extract_description, extract_excerpt, extract_importance,
    extract_stage, extract_tags, extract_title, extract_visibility, parse_frontmatter,
    reading_minutes,
};
use self::paths::title_from_slug;
use self::time::resolve_note_timestamps;

pub use self::links::{extract_links, normalize_page_name};
pub use self::paths::{is_supported_note, note_paths_for_slug, slug_from_path};
pub use self::time::NoteTimestamps;

pub(crate) fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(_compile_err) => match Regex::new(r"$^") {
            Ok(fallback) => fallback,
            Err(fallback_err) => panic!("hardcoded fallback regex must compile: {fallback_err}"),
        },
    }
}

/// Parse one note's raw file content into a fully populated node.
///
/// Never fails: malformed front matter yields default metadata. Returns
/// `None` only for an empty slug.
#[must_use]
pub fn parse_note(slug: &str, content: &str, fallback: NoteTimestamps) -> Option<GardenNode> {
    if slug.trim().is_empty() {
        return None;
    }
    let (frontmatter, body) = parse_frontmatter(content);
    let frontmatter = frontmatter.as_ref();
    let (created, modified) = resolve_note_timestamps(frontmatter, fallback);
    let word_count = count_words(body);
    Some(GardenNode {
        slug: slug.to_string(),
        metadata: NodeMetadata {
            title: extract_title(frontmatter, title_from_slug(slug)),
            created,
            modified,
            stage: extract_stage(frontmatter),
            certainty: extract_certainty(frontmatter),
            importance: extract_importance(frontmatter),
            visibility: extract_visibility(frontmatter),
            tags: extract_tags(frontmatter),
            description: extract_description(frontmatter),
        },
        body: body.to_string(),
        excerpt: extract_excerpt(body),
        word_count,
        reading_minutes: reading_minutes(word_count),
    })
}
