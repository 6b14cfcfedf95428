//! Codec for the per-document keyword field.
//!
//! The field holds a JSON array of strings. Reading is lenient: anything that
//! is not a JSON array yields no keywords, so a broken field can never break
//! rendering. Writing sanitises each keyword the way the editor surface does.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("invalid tag regex"));

static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// Parse a raw keyword field.
///
/// Returns the string elements of a JSON array, verbatim (not trimmed).
/// Malformed JSON, an empty string, or a JSON value that is not an array yields
/// an empty list. Non-string array elements are skipped.
///
/// # Examples
///
/// ```
/// use kwlink_store::parse_keywords;
///
/// assert_eq!(parse_keywords(r#"["shop", " sale "]"#), vec!["shop", " sale "]);
/// assert!(parse_keywords("not json").is_empty());
/// assert!(parse_keywords(r#"{"a": "shop"}"#).is_empty());
/// ```
pub fn parse_keywords(raw: &str) -> Vec<String> {
    let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(raw) else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Encode a keyword list as a JSON array.
pub fn encode_keywords(keywords: &[String]) -> String {
    // Serialising a slice of strings cannot fail.
    serde_json::to_string(keywords).unwrap_or_else(|_| "[]".to_owned())
}

/// Sanitise a single keyword as entered by an author.
///
/// Strips markup tags, collapses whitespace runs to a single space, and trims.
///
/// ```
/// use kwlink_store::sanitize_keyword;
///
/// assert_eq!(sanitize_keyword("  online <b>shop</b>\n"), "online shop");
/// ```
pub fn sanitize_keyword(keyword: &str) -> String {
    let stripped = TAG_PATTERN.replace_all(keyword, "");
    WHITESPACE_PATTERN
        .replace_all(&stripped, " ")
        .trim()
        .to_owned()
}

/// Sanitise a keyword list, dropping empty entries and exact duplicates.
///
/// Order of first appearance is preserved.
pub fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| sanitize_keyword(k.as_ref()))
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect()
}
