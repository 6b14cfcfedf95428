//! Attribute escaping for inserted anchors.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters that may not appear raw inside a quoted `href` attribute.
const HREF_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^');

/// URL schemes allowed in generated links.
const ALLOWED_SCHEMES: [&str; 22] = [
    "http", "https", "ftp", "ftps", "mailto", "news", "irc", "irc6", "ircs", "gopher", "nntp",
    "feed", "telnet", "mms", "rtsp", "sms", "svn", "tel", "fax", "xmpp", "webcal", "urn",
];

/// Escape HTML special characters for use in text or a quoted attribute.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#039;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a URL for use as an `href` attribute value.
///
/// Unsafe characters are percent-encoded and `&` becomes `&#038;`. URLs with a
/// scheme outside the usual web, mail, messaging and feed protocols (`http`,
/// `https`, `ftp`, `mailto`, `tel`, `sms`, `irc`, `news`, `feed`, ...) escape
/// to the empty string, which rules out `javascript:` and `data:`. Relative
/// URLs are kept.
///
/// # Examples
///
/// ```
/// use kwlink_engine::escape_url;
///
/// assert_eq!(escape_url("/shop?a=1&b=2"), "/shop?a=1&#038;b=2");
/// assert_eq!(escape_url("https://example.com/a b"), "https://example.com/a%20b");
/// assert_eq!(escape_url("javascript:alert(1)"), "");
/// ```
#[must_use]
pub fn escape_url(url: &str) -> String {
    let url = url.trim();
    if let Some(scheme) = scheme(url)
        && !ALLOWED_SCHEMES
            .iter()
            .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
    {
        return String::new();
    }
    utf8_percent_encode(url, HREF_ENCODE_SET)
        .to_string()
        .replace('&', "&#038;")
}

/// Scheme of an absolute URL (`RFC 3986` syntax), or `None` for relative URLs.
fn scheme(url: &str) -> Option<&str> {
    let end = url.find([':', '/', '?', '#'])?;
    if url.as_bytes()[end] != b':' {
        return None;
    }
    let candidate = &url[..end];
    let mut chars = candidate.chars();
    let first = chars.next()?;
    (first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')))
    .then_some(candidate)
}
