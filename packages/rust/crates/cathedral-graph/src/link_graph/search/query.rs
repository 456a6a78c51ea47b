const STAGE_PREFIX: &str = "stage:";
const TAG_PREFIX: &str = "tag:";

/// Parsed search query: a structured filter or free-text terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedQuery {
    /// `stage:<value>`; the value is matched against stage names.
    StageFilter(String),
    /// `tag:<value>`; the value is matched exactly against tags.
    TagFilter(String),
    /// Lowercased, whitespace-split terms, all of which must match.
    FreeText(Vec<String>),
}

fn strip_prefix_ignore_case<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    let head = raw.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        raw.get(prefix.len()..)
    } else {
        None
    }
}

impl ParsedQuery {
    /// Classify a raw query string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(value) = strip_prefix_ignore_case(trimmed, STAGE_PREFIX) {
            return Self::StageFilter(value.trim().to_string());
        }
        if let Some(value) = strip_prefix_ignore_case(trimmed, TAG_PREFIX) {
            return Self::TagFilter(value.trim().to_string());
        }
        Self::FreeText(
            trimmed
                .split_whitespace()
                .map(str::to_lowercase)
                .collect(),
        )
    }
}
