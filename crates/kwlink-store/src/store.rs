//! Store trait and error types.

use std::path::PathBuf;

use crate::document::{Document, DocumentId};

/// Store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error while reading or writing the backing file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The backing data is not valid JSON for a document list.
    #[error("invalid document data in {}: {source}", path.display())]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// No document with the given id.
    #[error("document {0} not found")]
    DocumentNotFound(DocumentId),
    /// Backend unavailable (e.g., poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for documents and their keyword lists.
///
/// Provides a unified interface for the keyword storage collaborator
/// regardless of backend. The linking engine only reads; the CLI's
/// `keywords set` command writes.
pub trait DocumentStore: Send + Sync {
    /// Return all documents, in store order.
    ///
    /// Store order is significant: the first document to claim a keyword
    /// owns it in the dictionary.
    fn documents(&self) -> Result<Vec<Document>, StoreError>;

    /// Return a single document, or `None` if the id is unknown.
    fn document(&self, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// Replace the raw keyword field of a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for unknown ids.
    fn set_keywords(&self, id: DocumentId, raw: &str) -> Result<(), StoreError>;
}
