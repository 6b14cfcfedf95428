//! The content filter: one rewrite pass over one document body.
//!
//! # Pipeline
//!
//! 1. Skip documents that are not posts or pages.
//! 2. Drop dictionary entries targeting the current permalink; stop if none
//!    remain.
//! 3. Vault shortcodes, then existing anchors.
//! 4. Rewrite the inner text of every block.
//! 5. Restore anchors, then shortcodes.

use std::collections::BTreeMap;

use kwlink_store::{Document, DocumentId, DocumentKind};

use crate::dictionary::Dictionary;
use crate::matcher::{LinkSettings, RewriteContext};
use crate::scanner::rewrite_blocks;
use crate::title::TitleSource;
use crate::vault::{Category, protect};

/// The document whose content is being rewritten.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentDocument {
    pub id: DocumentId,
    pub permalink: String,
    pub kind: DocumentKind,
}

impl From<&Document> for CurrentDocument {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            permalink: doc.permalink.clone(),
            kind: doc.kind,
        }
    }
}

/// Result of [`Linker::link_with_report`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Rewritten content.
    pub content: String,
    /// Anchors inserted per target document.
    pub links: BTreeMap<DocumentId, usize>,
}

impl LinkReport {
    /// Total anchors inserted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.links.values().sum()
    }
}

/// Inserts keyword links into document content.
///
/// A `Linker` holds no per-pass state and can be reused across documents.
///
/// # Example
///
/// ```
/// use kwlink_engine::{CurrentDocument, Dictionary, KeywordEntry, LinkSettings, Linker};
/// use kwlink_store::{DocumentId, DocumentKind};
///
/// let dictionary = Dictionary::from_entries([KeywordEntry {
///     keyword: "shop".to_owned(),
///     target_id: 5,
///     target_url: "/shop".to_owned(),
/// }]);
/// let titles = |_: DocumentId| "Our Shop".to_owned();
/// let linker = Linker::new(LinkSettings::default(), &titles);
/// let current = CurrentDocument { id: 1, permalink: "/hello".to_owned(), kind: DocumentKind::Post };
///
/// assert_eq!(
///     linker.link("<p>Visit our shop today.</p>", &dictionary, &current),
///     r#"<p>Visit our <a class="s-link" href="/shop" title="Our Shop">shop</a> today.</p>"#,
/// );
/// ```
pub struct Linker<'a> {
    settings: LinkSettings,
    titles: &'a dyn TitleSource,
}

impl<'a> Linker<'a> {
    #[must_use]
    pub fn new(settings: LinkSettings, titles: &'a dyn TitleSource) -> Self {
        Self { settings, titles }
    }

    #[must_use]
    pub fn settings(&self) -> LinkSettings {
        self.settings
    }

    /// Rewrite `content` of `current` using `dictionary`.
    ///
    /// Never fails: anything that cannot be linked is left as it was.
    #[must_use]
    pub fn link(&self, content: &str, dictionary: &Dictionary, current: &CurrentDocument) -> String {
        self.link_with_report(content, dictionary, current).content
    }

    /// Like [`link`](Self::link), also reporting how many anchors were
    /// inserted per target.
    #[must_use]
    pub fn link_with_report(
        &self,
        content: &str,
        dictionary: &Dictionary,
        current: &CurrentDocument,
    ) -> LinkReport {
        let unchanged = || LinkReport {
            content: content.to_owned(),
            links: BTreeMap::new(),
        };

        if !current.kind.is_linkable() {
            tracing::debug!(document = current.id, "document kind is not linkable");
            return unchanged();
        }
        let working = dictionary.without_target_url(&current.permalink);
        if working.is_empty() {
            return unchanged();
        }
        let folded = working.case_folded();

        let (protected, shortcodes) = protect(content, Category::Shortcode);
        let (protected, links) = protect(&protected, Category::Link);

        let mut ctx = RewriteContext::new(&folded, current.id, self.settings, self.titles);
        let rewritten = rewrite_blocks(&protected, |block| ctx.rewrite(block.inner));

        let restored = links.restore(&rewritten, Category::Link);
        let restored = shortcodes.restore(&restored, Category::Shortcode);

        let counters = ctx.into_counters();
        let report = LinkReport {
            content: restored,
            links: counters.to_map(),
        };
        tracing::debug!(
            document = current.id,
            links = report.total(),
            shortcodes = shortcodes.len(),
            anchors = links.len(),
            "linked document"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::KeywordEntry;
    use crate::title::StoreTitles;
    use kwlink_store::{DocumentStore, MemoryStore};
    use pretty_assertions::assert_eq;

    fn shop_dictionary(target_id: DocumentId) -> Dictionary {
        Dictionary::from_entries([KeywordEntry {
            keyword: "shop".to_owned(),
            target_id,
            target_url: "/shop".to_owned(),
        }])
    }

    fn post(id: DocumentId, permalink: &str) -> CurrentDocument {
        CurrentDocument {
            id,
            permalink: permalink.to_owned(),
            kind: DocumentKind::Post,
        }
    }

    fn shop_title(_: DocumentId) -> String {
        "Shop".to_owned()
    }

    fn settings(first_occurrence_only: bool, max_links_per_target: usize) -> LinkSettings {
        LinkSettings {
            first_occurrence_only,
            max_links_per_target,
        }
    }

    #[test]
    fn test_links_keyword_in_paragraph() {
        let linker = Linker::new(LinkSettings::default(), &shop_title);
        let out = linker.link("<p>Visit our shop today.</p>", &shop_dictionary(5), &post(1, "/hello"));
        assert_eq!(
            out,
            r#"<p>Visit our <a class="s-link" href="/shop" title="Shop">shop</a> today.</p>"#
        );
    }

    #[test]
    fn test_no_self_link_by_id() {
        let linker = Linker::new(LinkSettings::default(), &shop_title);
        let content = "<p>Visit our shop today.</p>";
        assert_eq!(linker.link(content, &shop_dictionary(1), &post(1, "/hello")), content);
    }

    #[test]
    fn test_no_self_link_by_permalink() {
        let linker = Linker::new(LinkSettings::default(), &shop_title);
        let content = "<p>Visit our shop today.</p>";
        assert_eq!(linker.link(content, &shop_dictionary(5), &post(9, "/shop")), content);
    }

    #[test]
    fn test_cap_per_target() {
        let linker = Linker::new(settings(false, 2), &shop_title);
        let report =
            linker.link_with_report("<p>shop shop shop</p>", &shop_dictionary(5), &post(1, "/hello"));
        let anchor = r#"<a class="s-link" href="/shop" title="Shop">shop</a>"#;
        assert_eq!(report.content, format!("<p>{anchor} {anchor} shop</p>"));
        assert_eq!(report.links, BTreeMap::from([(5, 2)]));
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn test_existing_anchor_untouched() {
        let linker = Linker::new(settings(false, 5), &shop_title);
        let out = linker.link(
            r#"<p><a href="/x">shop</a> and shop</p>"#,
            &shop_dictionary(5),
            &post(1, "/hello"),
        );
        assert_eq!(
            out,
            r#"<p><a href="/x">shop</a> and <a class="s-link" href="/shop" title="Shop">shop</a></p>"#
        );
    }

    #[test]
    fn test_shortcode_untouched() {
        let linker = Linker::new(settings(false, 5), &shop_title);
        let content = "<p>[gallery shop]</p>";
        assert_eq!(linker.link(content, &shop_dictionary(5), &post(1, "/hello")), content);
    }

    #[test]
    fn test_first_occurrence_only_across_blocks() {
        let linker = Linker::new(settings(true, 5), &shop_title);
        let out = linker.link(
            "<p>Our shop.</p>\n<li>Another shop</li>",
            &shop_dictionary(5),
            &post(1, "/hello"),
        );
        assert_eq!(
            out,
            "<p>Our <a class=\"s-link\" href=\"/shop\" title=\"Shop\">shop</a>.</p>\n<li>Another shop</li>"
        );
    }

    #[test]
    fn test_text_outside_blocks_untouched() {
        let linker = Linker::new(LinkSettings::default(), &shop_title);
        let content = "<h2>shop</h2>\n<div>shop</div>\n<p class=\"lead\">shop</p>";
        assert_eq!(linker.link(content, &shop_dictionary(5), &post(1, "/hello")), content);
    }

    #[test]
    fn test_non_linkable_kind_unchanged() {
        let linker = Linker::new(LinkSettings::default(), &shop_title);
        let current = CurrentDocument {
            kind: DocumentKind::Other,
            ..post(1, "/hello")
        };
        let content = "<p>shop</p>";
        assert_eq!(linker.link(content, &shop_dictionary(5), &current), content);
    }

    #[test]
    fn test_empty_dictionary_unchanged() {
        let linker = Linker::new(LinkSettings::default(), &shop_title);
        let report = linker.link_with_report("<p>shop</p>", &Dictionary::default(), &post(1, "/a"));
        assert_eq!(report.content, "<p>shop</p>");
        assert!(report.links.is_empty());
    }

    #[test]
    fn test_block_tags_preserved_verbatim() {
        let linker = Linker::new(LinkSettings::default(), &shop_title);
        let out = linker.link("<EM>shop</em>", &shop_dictionary(5), &post(1, "/hello"));
        assert_eq!(
            out,
            r#"<EM><a class="s-link" href="/shop" title="Shop">shop</a></em>"#
        );
    }

    #[test]
    fn test_case_folded_collision_keeps_first() {
        let dictionary = Dictionary::from_entries([
            KeywordEntry {
                keyword: "Shop".to_owned(),
                target_id: 5,
                target_url: "/shop".to_owned(),
            },
            KeywordEntry {
                keyword: "shop".to_owned(),
                target_id: 6,
                target_url: "/store".to_owned(),
            },
        ]);
        let linker = Linker::new(LinkSettings::default(), &shop_title);
        let report = linker.link_with_report("<p>shop</p>", &dictionary, &post(1, "/hello"));
        assert_eq!(report.links, BTreeMap::from([(5, 1)]));
    }

    #[test]
    fn test_titles_from_store() {
        let store = MemoryStore::new()
            .with_page(5, "/shop", "The Shop", &["shop"])
            .with_post(1, "/hello", "Hello", &["hello"]);
        let dictionary = Dictionary::build(&store.documents().unwrap());
        let titles = StoreTitles::new(&store);
        let linker = Linker::new(LinkSettings::default(), &titles);

        let out = linker.link("<p>hello from the shop</p>", &dictionary, &post(1, "/hello"));
        assert_eq!(
            out,
            r#"<p>hello from the <a class="s-link" href="/shop" title="The Shop">shop</a></p>"#
        );
    }

    #[test]
    fn test_shortcode_containing_anchor_restored() {
        let linker = Linker::new(settings(false, 5), &shop_title);
        let content = r#"<p>[note]<a href="/y">shop</a>[/note] shop</p>"#;
        let out = linker.link(content, &shop_dictionary(5), &post(1, "/hello"));
        assert_eq!(
            out,
            r#"<p>[note]<a href="/y">shop</a>[/note] <a class="s-link" href="/shop" title="Shop">shop</a></p>"#
        );
    }

    #[test]
    fn test_markup_safety_property() {
        let linker = Linker::new(settings(false, 100), &shop_title);
        let content = concat!(
            "<p>shop [shop] <a href=\"/z\">shop</a></p>",
            "<li>\"shop\" <span title=\"shop\">x</span> shopping</li>",
        );
        let report = linker.link_with_report(content, &shop_dictionary(5), &post(1, "/hello"));
        assert_eq!(report.total(), 1);
        assert_eq!(
            report.content,
            content.replacen(
                "<p>shop",
                r#"<p><a class="s-link" href="/shop" title="Shop">shop</a>"#,
                1
            )
        );
    }
}
