use regex::RegexBuilder;

/// Wrap every case-insensitive occurrence of `query` in `<mark>` tags.
///
/// The query is matched literally; an empty query returns `text` unchanged.
#[must_use]
pub fn highlight_query(text: &str, query: &str) -> String {
    if query.is_empty() {
        return text.to_string();
    }
    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(regex) => regex.replace_all(text, "<mark>$0</mark>").into_owned(),
        Err(_) => text.to_string(),
    }
}
