//! HTML escaping for fragments handed to the browser for direct insertion.
//!
//! Untrusted remote content and untrusted user text both pass through here
//! before being embedded into markup.

/// Replace the five HTML-reserved characters with their character references.
///
/// The replacement is a single character-wise pass, so an ampersand that is
/// part of an already-inserted entity is never re-examined: a literal `&`
/// becomes `&amp;` exactly once.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Absent input yields empty text; never fails.
pub fn escape_opt(input: Option<&str>) -> String {
    input.map(escape).unwrap_or_default()
}

/// Inverse of [`escape`]. `&amp;` is resolved last so the pass cannot
/// fabricate entities that were not in the escaped text.
pub fn unescape(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}
