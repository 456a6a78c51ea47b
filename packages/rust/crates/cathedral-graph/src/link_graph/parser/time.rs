use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_yaml::Value;
use std::path::Path;

/// Timestamps used when front matter does not carry `created`/`modified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteTimestamps {
    /// Fallback creation time.
    pub created: DateTime<Utc>,
    /// Fallback modification time.
    pub modified: DateTime<Utc>,
}

impl NoteTimestamps {
    /// Both timestamps set to `at`.
    #[must_use]
    pub const fn fixed(at: DateTime<Utc>) -> Self {
        Self {
            created: at,
            modified: at,
        }
    }

    /// Filesystem timestamps of `path`, falling back to the current time.
    #[must_use]
    pub fn from_filesystem(path: &Path) -> Self {
        let now = Utc::now();
        let Ok(meta) = std::fs::metadata(path) else {
            return Self::fixed(now);
        };
        let modified = meta.modified().ok().map_or(now, DateTime::<Utc>::from);
        let created = meta.created().ok().map_or(modified, DateTime::<Utc>::from);
        Self { created, modified }
    }
}

fn date_to_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(num) => num
            .as_i64()
            .and_then(|epoch| DateTime::<Utc>::from_timestamp(epoch, 0)),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(epoch) = trimmed.parse::<i64>() {
                return DateTime::<Utc>::from_timestamp(epoch, 0);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
                return Some(dt.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%d", "%Y/%m/%d"] {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                    return date_to_utc(date);
                }
            }
            None
        }
        _ => None,
    }
}

fn extract_frontmatter_timestamp(
    frontmatter: Option<&Value>,
    keys: &[&str],
) -> Option<DateTime<Utc>> {
    let value = frontmatter?;
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(parse_timestamp_value)
}

pub(super) fn resolve_note_timestamps(
    frontmatter: Option<&Value>,
    fallback: NoteTimestamps,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let created = extract_frontmatter_timestamp(frontmatter, &["created", "created_at", "date"]);
    let modified = extract_frontmatter_timestamp(
        frontmatter,
        &["modified", "modified_at", "updated", "updated_at"],
    );
    (
        created.unwrap_or(fallback.created),
        modified.unwrap_or(fallback.modified),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(raw: &str) -> Option<Value> {
        serde_yaml::from_str::<Value>(raw).ok()
    }

    #[test]
    fn test_accepted_timestamp_forms() {
        let fallback = NoteTimestamps::fixed(DateTime::<Utc>::UNIX_EPOCH);
        let fm = yaml("created: 2024-03-01\nmodified: \"2024-03-02T10:00:00Z\"");
        let (created, modified) = resolve_note_timestamps(fm.as_ref(), fallback);
        assert_eq!(created.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(modified.to_rfc3339(), "2024-03-02T10:00:00+00:00");

        let fm = yaml("date: 2024/01/05\nupdated: 1700000000");
        let (created, modified) = resolve_note_timestamps(fm.as_ref(), fallback);
        assert_eq!(created.to_rfc3339(), "2024-01-05T00:00:00+00:00");
        assert_eq!(modified.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_unparsable_timestamps_fall_back() {
        let fallback = NoteTimestamps::fixed(DateTime::<Utc>::UNIX_EPOCH);
        let fm = yaml("created: yesterday\nmodified: [1, 2]");
        let (created, modified) = resolve_note_timestamps(fm.as_ref(), fallback);
        assert_eq!(created, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(modified, DateTime::<Utc>::UNIX_EPOCH);
    }
}
