//! Placeholder vault: reversible protection of spans the linker must not touch.
//!
//! [`protect`] replaces every non-overlapping match of a category's pattern
//! with an opaque marker:
//!
//! ```text
//! <!--shortcode-->{sha256 hex}<!--/shortcode-->
//! <!--link-->{sha256 hex}<!--/link-->
//! ```
//!
//! and records `hash -> original`. [`Vault::restore`] swaps each marker back.
//! The hash is a content address of the exact substring, so identical
//! substrings share one record and still restore correctly.
//!
//! Restoration is permissive: a marker whose hash is not recorded, or whose
//! category differs from the one being restored, is left as literal text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

/// Bracketed shortcode-like directives such as `[gallery ids="1,2"]`.
/// Non-greedy and single-line.
static SHORTCODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("invalid shortcode regex"));

/// Complete anchor elements, case-insensitive, spanning lines.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>.*?</a>").expect("invalid link regex"));

static SHORTCODE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--shortcode-->([0-9a-f]{64})<!--/shortcode-->")
        .expect("invalid shortcode marker regex")
});

static LINK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--link-->([0-9a-f]{64})<!--/link-->").expect("invalid link marker regex")
});

/// Protection category. Each category has its own marker syntax.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    /// Bracketed shortcode-like directives.
    #[default]
    Shortcode,
    /// Existing anchor elements.
    Link,
}

impl Category {
    /// Marker name used inside the comment delimiters.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Shortcode => "shortcode",
            Self::Link => "link",
        }
    }

    /// Pattern of the spans this category protects.
    #[must_use]
    pub fn pattern(self) -> &'static Regex {
        match self {
            Self::Shortcode => &SHORTCODE_PATTERN,
            Self::Link => &LINK_PATTERN,
        }
    }

    fn marker_pattern(self) -> &'static Regex {
        match self {
            Self::Shortcode => &SHORTCODE_MARKER,
            Self::Link => &LINK_MARKER,
        }
    }

    /// Marker text for a content hash.
    #[must_use]
    pub fn marker(self, hash: &str) -> String {
        let name = self.name();
        format!("<!--{name}-->{hash}<!--/{name}-->")
    }
}

/// Compute the content address of a protected span (hex-encoded SHA-256).
#[must_use]
pub fn content_hash(span: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(span.as_bytes());
    hex::encode(hasher.finalize())
}

/// Records of the spans protected during one pass, for one category.
#[derive(Debug, Default)]
pub struct Vault {
    category: Category,
    records: HashMap<String, String>,
}

impl Vault {
    /// Category this vault was filled for.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Number of distinct protected spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was protected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Original text recorded for `hash`.
    #[must_use]
    pub fn original(&self, hash: &str) -> Option<&str> {
        self.records.get(hash).map(String::as_str)
    }

    /// Replace `category` markers in `content` with their recorded originals.
    ///
    /// Markers of another category, and markers whose hash is not recorded,
    /// pass through unchanged. If `category` is not the vault's own category,
    /// `content` is returned as is.
    #[must_use]
    pub fn restore(&self, content: &str, category: Category) -> String {
        if category != self.category || self.records.is_empty() {
            return content.to_owned();
        }
        category
            .marker_pattern()
            .replace_all(content, |caps: &Captures<'_>| match self.records.get(&caps[1]) {
                Some(original) => original.clone(),
                None => caps[0].to_owned(),
            })
            .into_owned()
    }
}

/// Protect every span of `content` matching the category's own pattern.
///
/// Returns the content with markers in place of the spans, and the vault
/// needed to restore them.
#[must_use]
pub fn protect(content: &str, category: Category) -> (String, Vault) {
    protect_with(content, category.pattern(), category)
}

/// Protect every non-overlapping match of `pattern`, using `category` markers.
#[must_use]
pub fn protect_with(content: &str, pattern: &Regex, category: Category) -> (String, Vault) {
    let mut vault = Vault {
        category,
        records: HashMap::new(),
    };
    let protected = pattern
        .replace_all(content, |caps: &Captures<'_>| {
            let span = &caps[0];
            let hash = content_hash(span);
            let marker = category.marker(&hash);
            vault.records.entry(hash).or_insert_with(|| span.to_owned());
            marker
        })
        .into_owned();
    (protected, vault)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Content built from the fragments that interact with protection:
    /// brackets, anchor tags in both cases, line breaks, blocks, and bare
    /// marker delimiters.
    fn arb_content() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop::sample::select(vec![
                "[",
                "]",
                "[gallery]",
                "<a>",
                "<a href=\"/x\">",
                "<A HREF='/y'>",
                "</a>",
                "</A>",
                "\n",
                "shop",
                " ",
                "<p>",
                "</p>",
                "<!--link-->",
                "<!--/link-->",
                "<!--shortcode-->",
                "<!--/shortcode-->",
                "caf\u{e9}",
            ]),
            0..40,
        )
        .prop_map(|parts| parts.concat())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn test_round_trip_generated_content(content in arb_content()) {
            let (step1, shortcodes) = protect(&content, Category::Shortcode);
            let (step2, links) = protect(&step1, Category::Link);
            let restored =
                shortcodes.restore(&links.restore(&step2, Category::Link), Category::Shortcode);
            prop_assert_eq!(restored, content);
        }

        #[test]
        fn test_protected_content_has_no_spans(content in arb_content()) {
            let (step1, _) = protect(&content, Category::Shortcode);
            let (step2, _) = protect(&step1, Category::Link);
            prop_assert!(Category::Shortcode.pattern().find(&step1).is_none());
            prop_assert!(Category::Link.pattern().find(&step2).is_none());
        }
    }

    #[test]
    fn test_protect_shortcodes() {
        let content = r#"<p>[gallery ids="1,2"] and [caption]</p>"#;
        let (protected, vault) = protect(content, Category::Shortcode);

        assert_eq!(vault.len(), 2);
        assert!(!protected.contains('['));
        let hash = content_hash(r#"[gallery ids="1,2"]"#);
        assert!(protected.contains(&format!("<!--shortcode-->{hash}<!--/shortcode-->")));
        assert_eq!(vault.original(&hash), Some(r#"[gallery ids="1,2"]"#));
    }

    #[test]
    fn test_shortcode_pattern_is_single_line_and_non_greedy() {
        let content = "[a] text [b\nc] [d]";
        let (protected, vault) = protect(content, Category::Shortcode);

        // "[b\nc]" spans a line break and stays as is
        assert_eq!(vault.len(), 2);
        assert!(protected.contains("[b\nc]"));
    }

    #[test]
    fn test_protect_links_case_insensitive_multiline() {
        let content = "<p><A HREF=\"/x\">shop\nnow</A> and <a>bare</a> <abbr>x</abbr></p>";
        let (protected, vault) = protect(content, Category::Link);

        assert_eq!(vault.len(), 2);
        assert!(protected.contains("<abbr>x</abbr>"));
        assert!(!protected.contains("shop"));
    }

    #[test]
    fn test_round_trip_restores_verbatim() {
        let content = "<p>[x] <a href=\"/a\">a</a> [x] <a href=\"/a\">a</a> tail</p>";
        let (step1, shortcodes) = protect(content, Category::Shortcode);
        let (step2, links) = protect(&step1, Category::Link);

        // Identical spans collapse to one record
        assert_eq!(shortcodes.len(), 1);
        assert_eq!(links.len(), 1);

        let restored = shortcodes.restore(&links.restore(&step2, Category::Link), Category::Shortcode);
        assert_eq!(restored, content);
    }

    #[test]
    fn test_round_trip_link_containing_shortcode() {
        let content = r#"<a href="/x">[icon] shop</a>"#;
        let (step1, shortcodes) = protect(content, Category::Shortcode);
        let (step2, links) = protect(&step1, Category::Link);
        assert_eq!(links.len(), 1);

        let restored = shortcodes.restore(&links.restore(&step2, Category::Link), Category::Shortcode);
        assert_eq!(restored, content);
    }

    #[test]
    fn test_round_trip_without_matches() {
        let content = "plain text with no spans";
        let (protected, vault) = protect(content, Category::Link);
        assert!(vault.is_empty());
        assert_eq!(protected, content);
        assert_eq!(vault.restore(&protected, Category::Link), content);
    }

    #[test]
    fn test_restore_unknown_hash_passes_through() {
        let (_, vault) = protect("<a>x</a>", Category::Link);
        let stray = Category::Link.marker(&content_hash("never protected"));
        assert_eq!(vault.restore(&stray, Category::Link), stray);
    }

    #[test]
    fn test_restore_category_mismatch_passes_through() {
        let (protected, vault) = protect("[x]", Category::Shortcode);
        assert_eq!(vault.category(), Category::Shortcode);
        assert_eq!(vault.restore(&protected, Category::Link), protected);
    }

    #[test]
    fn test_protect_with_custom_pattern() {
        let pattern = Regex::new(r"\{\{.*?\}\}").unwrap();
        let content = "a {{b}} c";
        let (protected, vault) = protect_with(content, &pattern, Category::Shortcode);
        assert_eq!(vault.len(), 1);
        assert_eq!(vault.restore(&protected, Category::Shortcode), content);
    }

    #[test]
    fn test_content_hash_format() {
        let hash = content_hash("[gallery]");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, content_hash("[gallery]"));
        assert_ne!(hash, content_hash("[Gallery]"));
    }
}
