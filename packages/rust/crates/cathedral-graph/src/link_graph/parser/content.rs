use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;

use super::compile_regex;
use crate::link_graph::models::{NodeStage, NodeVisibility};

pub(super) const DEFAULT_CERTAINTY: f64 = 0.5;
pub(super) const DEFAULT_IMPORTANCE: u8 = 3;
const EXCERPT_MAX_CHARS: usize = 160;
const WORDS_PER_MINUTE: usize = 200;

static FRONTMATTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n(?:---|\.\.\.)[ \t]*(?:\r?\n|\z)")
});
static EMPTY_FRONTMATTER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"\A---[ \t]*\r?\n(?:---|\.\.\.)[ \t]*(?:\r?\n|\z)"));
static HEADING_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"^#+\s+"));
static MARKDOWN_LINK_TEXT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"\[([^\]]+)\]\([^)]+\)"));
static WIKI_LINK_TEXT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"\[\[([^\]]+)\]\]"));
static PARAGRAPH_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"\r?\n[ \t]*\r?\n"));

fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn value_to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn value_to_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Split a note into parsed front matter and body.
///
/// Unparsable YAML yields `None` front matter; the body still starts after
/// the closing fence.
pub(super) fn parse_frontmatter(content: &str) -> (Option<Value>, &str) {
    if let Some(m) = EMPTY_FRONTMATTER_REGEX.find(content) {
        return (None, &content[m.end()..]);
    }
    let Some(caps) = FRONTMATTER_REGEX.captures(content) else {
        return (None, content);
    };
    let body = caps.get(0).map_or(content, |m| &content[m.end()..]);
    let parsed = caps
        .get(1)
        .and_then(|m| serde_yaml::from_str::<Value>(m.as_str()).ok())
        .filter(Value::is_mapping);
    (parsed, body)
}

pub(super) fn extract_title(frontmatter: Option<&Value>, fallback: String) -> String {
    frontmatter
        .and_then(|value| value.get("title"))
        .and_then(value_to_str)
        .map_or(fallback, str::to_string)
}

pub(super) fn extract_description(frontmatter: Option<&Value>) -> Option<String> {
    frontmatter
        .and_then(|value| value.get("description"))
        .and_then(value_to_str)
        .map(str::to_string)
}

pub(super) fn extract_stage(frontmatter: Option<&Value>) -> NodeStage {
    frontmatter
        .and_then(|value| value.get("stage"))
        .and_then(Value::as_str)
        .and_then(NodeStage::from_alias)
        .unwrap_or_default()
}

pub(super) fn extract_visibility(frontmatter: Option<&Value>) -> NodeVisibility {
    frontmatter
        .and_then(|value| value.get("visibility"))
        .and_then(Value::as_str)
        .and_then(NodeVisibility::from_alias)
        .unwrap_or_default()
}

pub(super) fn extract_certainty(frontmatter: Option<&Value>) -> f64 {
    frontmatter
        .and_then(|value| value.get("certainty"))
        .and_then(value_to_f64)
        .filter(|v| (0.0..=1.0).contains(v))
        .unwrap_or(DEFAULT_CERTAINTY)
}

pub(super) fn extract_importance(frontmatter: Option<&Value>) -> u8 {
    frontmatter
        .and_then(|value| value.get("importance"))
        .and_then(value_to_f64)
        .and_then(|v| (1u8..=5).find(|level| (f64::from(*level) - v).abs() < f64::EPSILON))
        .unwrap_or(DEFAULT_IMPORTANCE)
}

pub(super) fn extract_tags(frontmatter: Option<&Value>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let Some(tags_val) = frontmatter.and_then(|value| value.get("tags")) else {
        return out;
    };
    match tags_val {
        Value::String(s) => {
            let tag = s.trim();
            if !tag.is_empty() {
                out.push(tag.to_string());
            }
        }
        Value::Sequence(seq) => {
            for item in seq {
                if let Some(tag) = value_to_str(item) {
                    out.push(tag.to_string());
                }
            }
        }
        _ => {}
    }
    out.sort();
    out.dedup();
    out
}

/// First paragraph (or first 160 chars) with links reduced to anchor text.
pub(super) fn extract_excerpt(body: &str) -> String {
    let trimmed = body.trim_start();
    let paragraph = PARAGRAPH_BREAK_REGEX
        .split(trimmed)
        .next()
        .unwrap_or_default();
    let without_heading = HEADING_MARKER_REGEX.replace(paragraph, "");
    let truncated: String = normalize_whitespace(&without_heading)
        .chars()
        .take(EXCERPT_MAX_CHARS)
        .collect();
    let unwikied = WIKI_LINK_TEXT_REGEX.replace_all(&truncated, "$1");
    MARKDOWN_LINK_TEXT_REGEX
        .replace_all(&unwikied, "$1")
        .into_owned()
}

pub(super) fn count_words(body: &str) -> usize {
    body.split_whitespace().count()
}

pub(super) fn reading_minutes(word_count: usize) -> usize {
    word_count.div_ceil(WORDS_PER_MINUTE).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontmatter_split() {
        let (fm, body) = parse_frontmatter("---\ntitle: Alpha\nstage: tree\n---\nbody text\n");
        let fm = fm.unwrap_or(Value::Null);
        assert_eq!(fm.get("title").and_then(Value::as_str), Some("Alpha"));
        assert_eq!(body, "body text\n");
    }

    #[test]
    fn test_malformed_frontmatter_falls_back() {
        let (fm, body) = parse_frontmatter("---\ntitle: [unclosed\n---\nbody\n");
        assert!(fm.is_none());
        assert_eq!(body, "body\n");
        assert_eq!(extract_stage(fm.as_ref()), NodeStage::Seed);
        assert!((extract_certainty(fm.as_ref()) - DEFAULT_CERTAINTY).abs() < f64::EPSILON);
        assert_eq!(extract_importance(fm.as_ref()), DEFAULT_IMPORTANCE);
        assert_eq!(extract_visibility(fm.as_ref()), NodeVisibility::Public);
        assert!(extract_tags(fm.as_ref()).is_empty());
    }

    #[test]
    fn test_no_frontmatter_keeps_body() {
        let (fm, body) = parse_frontmatter("# Heading\n\ntext");
        assert!(fm.is_none());
        assert_eq!(body, "# Heading\n\ntext");
    }

    #[test]
    fn test_out_of_range_values_use_defaults() {
        let (fm, _) = parse_frontmatter(
            "---\nstage: shrub\ncertainty: 1.7\nimportance: 9\nvisibility: secret\n---\n",
        );
        assert_eq!(extract_stage(fm.as_ref()), NodeStage::Seed);
        assert!((extract_certainty(fm.as_ref()) - DEFAULT_CERTAINTY).abs() < f64::EPSILON);
        assert_eq!(extract_importance(fm.as_ref()), DEFAULT_IMPORTANCE);
        assert_eq!(extract_visibility(fm.as_ref()), NodeVisibility::Public);
    }

    #[test]
    fn test_numeric_strings_and_tags() {
        let (fm, _) = parse_frontmatter(
            "---\ncertainty: \"0.8\"\nimportance: 5\ntags: [rust, graph, rust, 3]\n---\n",
        );
        assert!((extract_certainty(fm.as_ref()) - 0.8).abs() < f64::EPSILON);
        assert_eq!(extract_importance(fm.as_ref()), 5);
        assert_eq!(extract_tags(fm.as_ref()), vec!["graph", "rust"]);
    }

    #[test]
    fn test_excerpt_first_paragraph_with_links_stripped() {
        let body = "\n# Intro to [gardens](/meta/gardens)\n\nSecond paragraph.";
        assert_eq!(extract_excerpt(body), "Intro to gardens");
        assert_eq!(extract_excerpt("see [[beta]]"), "see beta");
    }

    #[test]
    fn test_excerpt_truncates_to_160_chars() {
        let body = "word ".repeat(100);
        assert_eq!(extract_excerpt(&body).chars().count(), 160);
    }

    #[test]
    fn test_reading_minutes() {
        assert_eq!(reading_minutes(0), 1);
        assert_eq!(reading_minutes(200), 1);
        assert_eq!(reading_minutes(201), 2);
    }
}
