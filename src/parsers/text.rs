//! Text shaping helpers shared by the section and meta extractors.

/// Marker appended to truncated markup
pub const ELLIPSIS: &str = "...";

/// Joins text fragments with single spaces, dropping empty fragments and
/// collapsing all internal whitespace
pub fn join_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for word in fragments.into_iter().flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Keeps at most `max` characters, never splitting a character
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Truncates markup to `max` characters, appending [`ELLIPSIS`] when cut
pub fn truncate_markup(html: &str, max: usize) -> String {
    match html.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}{}", &html[..byte_idx], ELLIPSIS),
        None => html.to_string(),
    }
}

/// `nav` -> `Nav`, `ASIDE` -> `Aside`
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
