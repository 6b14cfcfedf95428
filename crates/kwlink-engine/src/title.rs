//! Title resolution for the `title` attribute of inserted anchors.

use std::collections::HashMap;

use kwlink_store::{DocumentId, DocumentStore};

/// Template tokens an SEO title may carry that make no sense in an attribute.
const SEO_TITLE_TOKENS: [&str; 3] = ["%%sep%%", "%%sitename%%", "%%page%%"];

/// Source of display titles for link targets.
///
/// Implementations never fail: when nothing better is known they return a
/// default display title (possibly empty).
pub trait TitleSource {
    /// Display title of document `id`.
    fn resolve_title(&self, id: DocumentId) -> String;
}

impl<F> TitleSource for F
where
    F: Fn(DocumentId) -> String,
{
    fn resolve_title(&self, id: DocumentId) -> String {
        self(id)
    }
}

/// Strip SEO template tokens and surrounding whitespace from a title.
///
/// ```
/// use kwlink_engine::clean_seo_title;
///
/// assert_eq!(clean_seo_title("Shop %%sep%% %%sitename%%"), "Shop");
/// ```
#[must_use]
pub fn clean_seo_title(raw: &str) -> String {
    SEO_TITLE_TOKENS
        .iter()
        .fold(raw.to_owned(), |title, token| title.replace(token, ""))
        .trim()
        .to_owned()
}

/// [`TitleSource`] backed by a [`DocumentStore`].
///
/// Prefers the document's SEO title (after [`clean_seo_title`]) when enabled
/// and non-empty, and falls back to the native title. Unknown documents and
/// store errors resolve to an empty title.
pub struct StoreTitles<'a> {
    store: &'a dyn DocumentStore,
    prefer_seo: bool,
}

impl<'a> StoreTitles<'a> {
    /// Resolve titles from `store`, preferring SEO titles.
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            prefer_seo: true,
        }
    }

    /// Set whether SEO titles are preferred over native titles.
    #[must_use]
    pub fn prefer_seo(mut self, prefer_seo: bool) -> Self {
        self.prefer_seo = prefer_seo;
        self
    }
}

impl TitleSource for StoreTitles<'_> {
    fn resolve_title(&self, id: DocumentId) -> String {
        let doc = match self.store.document(id) {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                tracing::debug!(document = id, "title lookup for unknown document");
                return String::new();
            }
            Err(e) => {
                tracing::warn!(document = id, "title lookup failed: {e}");
                return String::new();
            }
        };

        if self.prefer_seo
            && let Some(seo) = doc.seo_title.as_deref()
        {
            let cleaned = clean_seo_title(seo);
            if !cleaned.is_empty() {
                return cleaned;
            }
        }
        doc.title
    }
}

/// Per-pass memo of resolved titles.
pub(crate) struct TitleCache<'a> {
    source: &'a dyn TitleSource,
    titles: HashMap<DocumentId, String>,
}

impl<'a> TitleCache<'a> {
    pub(crate) fn new(source: &'a dyn TitleSource) -> Self {
        Self {
            source,
            titles: HashMap::new(),
        }
    }

    pub(crate) fn get(&mut self, id: DocumentId) -> &str {
        let source = self.source;
        self.titles
            .entry(id)
            .or_insert_with(|| source.resolve_title(id))
    }
}
