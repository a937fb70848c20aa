//! Field normalization shared by catalog backends.

use once_cell::sync::Lazy;
use regex_lite::Regex;

pub const UNKNOWN_TITLE: &str = "Unknown title";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const UNKNOWN_YEAR: &str = "Unknown";
pub const UNKNOWN_LANGUAGE: &str = "unknown";
pub const UNKNOWN_PUBLISHER: &str = "Unknown publisher";
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Placeholder for ISBN, page count and cover.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum characters kept in a summary description.
pub const SHORT_DESCRIPTION_CHARS: usize = 200;
pub const ELLIPSIS: &str = "...";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</p>").expect("valid break regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid space regex"));

/// Use `value` when it has visible content, `placeholder` otherwise.
pub fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}

/// Remove markup from a provider description and collapse whitespace.
pub fn strip_html(text: &str) -> String {
    let text = BREAK_RE.replace_all(text, " ");
    let text = TAG_RE.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    SPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Cut a description to [`SHORT_DESCRIPTION_CHARS`] characters plus an ellipsis.
///
/// Counts Unicode scalar values, so multi-byte text is never split mid-char.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(SHORT_DESCRIPTION_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Leading four-digit year of a provider date ("2004", "2004-05", "2004-05-01").
pub fn published_year(date: Option<&str>) -> String {
    date.map(str::trim)
        .and_then(|d| d.get(..4))
        .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}

/// Decimal page count, or the placeholder for missing/zero counts.
pub fn page_count(count: Option<u32>) -> String {
    match count {
        Some(n) if n > 0 => n.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Cover URL forced to https, or the placeholder.
pub fn cover_url(url: Option<String>) -> String {
    match url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        Some(u) => match u.strip_prefix("http://") {
            Some(rest) => format!("https://{}", rest),
            None => u,
        },
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Join author names for display.
pub fn author_line(authors: &[String]) -> String {
    let names: Vec<&str> = authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if names.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        names.join(", ")
    }
}

/// Lowercased language code, or the placeholder.
pub fn language(code: Option<String>) -> String {
    or_placeholder(code, UNKNOWN_LANGUAGE).to_lowercase()
}
