//! Mock store implementation for testing.
//!
//! Provides [`MemoryStore`] for unit testing without filesystem access.

use std::sync::RwLock;

use crate::document::{Document, DocumentId, DocumentKind, PublishStatus};
use crate::keywords::encode_keywords;
use crate::store::{DocumentStore, StoreError};

/// In-memory store for testing.
///
/// Use the builder methods to configure the store with test data. Documents
/// keep insertion order.
///
/// # Example
///
/// ```ignore
/// use kwlink_store::{DocumentStore, MemoryStore};
///
/// let store = MemoryStore::new()
///     .with_page(5, "/shop", "Shop", &["shop"])
///     .with_post(1, "/hello", "Hello", &[]);
///
/// assert_eq!(store.documents().unwrap().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
    fail_reads: bool,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully specified document.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_document(self, document: Document) -> Self {
        self.documents.write().unwrap().push(document);
        self
    }

    /// Add a published post carrying `keywords`.
    #[must_use]
    pub fn with_post(self, id: DocumentId, permalink: &str, title: &str, keywords: &[&str]) -> Self {
        self.with_document(published(id, DocumentKind::Post, permalink, title, keywords))
    }

    /// Add a published page carrying `keywords`.
    #[must_use]
    pub fn with_page(self, id: DocumentId, permalink: &str, title: &str, keywords: &[&str]) -> Self {
        self.with_document(published(id, DocumentKind::Page, permalink, title, keywords))
    }

    /// Make every read fail with [`StoreError::Unavailable`].
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("mock failure".to_owned()));
        }
        Ok(())
    }
}

fn published(
    id: DocumentId,
    kind: DocumentKind,
    permalink: &str,
    title: &str,
    keywords: &[&str],
) -> Document {
    let keywords: Vec<String> = keywords.iter().map(|k| (*k).to_owned()).collect();
    Document {
        id,
        kind,
        status: PublishStatus::Publish,
        permalink: permalink.to_owned(),
        title: title.to_owned(),
        seo_title: None,
        keywords: (!keywords.is_empty()).then(|| encode_keywords(&keywords)),
        content: String::new(),
    }
}

impl DocumentStore for MemoryStore {
    fn documents(&self) -> Result<Vec<Document>, StoreError> {
        self.check_available()?;
        Ok(self.documents.read().unwrap().clone())
    }

    fn document(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        self.check_available()?;
        Ok(self
            .documents
            .read()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    fn set_keywords(&self, id: DocumentId, raw: &str) -> Result<(), StoreError> {
        let mut documents = self.documents.write().unwrap();
        let doc = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::DocumentNotFound(id))?;
        doc.keywords = Some(raw.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::parse_keywords;

    #[test]
    fn test_builders_preserve_order() {
        let store = MemoryStore::new()
            .with_page(5, "/shop", "Shop", &["shop"])
            .with_post(1, "/hello", "Hello", &[]);

        let docs = store.documents().unwrap();
        assert_eq!(docs.iter().map(|d| d.id).collect::<Vec<_>>(), vec![5, 1]);
        assert_eq!(
            parse_keywords(docs[0].keywords.as_deref().unwrap()),
            vec!["shop".to_owned()]
        );
        assert!(docs[1].keywords.is_none());
    }

    #[test]
    fn test_set_keywords() {
        let store = MemoryStore::new().with_post(1, "/hello", "Hello", &[]);
        store.set_keywords(1, r#"["hi"]"#).unwrap();
        assert_eq!(
            store.document(1).unwrap().unwrap().keywords.as_deref(),
            Some(r#"["hi"]"#)
        );
        assert!(matches!(
            store.set_keywords(2, "[]"),
            Err(StoreError::DocumentNotFound(2))
        ));
    }

    #[test]
    fn test_failing_store() {
        let store = MemoryStore::new().with_post(1, "/hello", "Hello", &[]).failing();
        assert!(store.documents().is_err());
        assert!(store.document(1).is_err());
    }
}
