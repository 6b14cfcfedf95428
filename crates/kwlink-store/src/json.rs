//! JSON file storage implementation.
//!
//! Provides [`JsonStore`], which keeps the whole document list of a site in a
//! single JSON array on disk:
//!
//! ```json
//! [
//!   {"id": 5, "kind": "page", "status": "publish", "permalink": "/shop",
//!    "title": "Shop", "keywords": "[\"shop\"]", "content": "<p>...</p>"}
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::document::{Document, DocumentId};
use crate::store::{DocumentStore, StoreError};

/// File-backed [`DocumentStore`].
///
/// The file is read once on [`open`](Self::open). Writes update the in-memory
/// copy and rewrite the whole file.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use kwlink_store::{DocumentStore, JsonStore};
///
/// let store = JsonStore::open(PathBuf::from("documents.json"))?;
/// store.set_keywords(5, r#"["shop"]"#)?;
/// ```
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    documents: RwLock<Vec<Document>>,
}

impl JsonStore {
    /// Open a store backed by `path`.
    ///
    /// A missing file is treated as an empty store; it is created on the first
    /// write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but can't be read, or
    /// [`StoreError::Json`] if it is not a JSON array of documents.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let documents = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&data).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?
        } else {
            tracing::info!("document store {} not found, starting empty", path.display());
            Vec::new()
        };

        Ok(Self {
            path,
            documents: RwLock::new(documents),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, documents: &[Document]) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(documents).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, data).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("document lock poisoned".to_owned())
}

impl DocumentStore for JsonStore {
    fn documents(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.documents.read().map_err(|_| poisoned())?.clone())
    }

    fn document(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    fn set_keywords(&self, id: DocumentId, raw: &str) -> Result<(), StoreError> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        let mut updated = documents.clone();
        let doc = updated
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::DocumentNotFound(id))?;
        doc.keywords = Some(raw.to_owned());

        // Memory only follows a successful write.
        self.persist(&updated)?;
        *documents = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentKind, PublishStatus};
    use tempfile::TempDir;

    const SAMPLE: &str = r#"[
        {"id": 1, "kind": "post", "status": "publish", "permalink": "/hello",
         "title": "Hello", "content": "<p>Visit our shop.</p>"},
        {"id": 5, "kind": "page", "status": "publish", "permalink": "/shop",
         "title": "Shop", "seo_title": "Shop %%sep%% %%sitename%%",
         "keywords": "[\"shop\"]"}
    ]"#;

    fn write_sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("documents.json");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_open_and_read() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(write_sample(&tmp)).unwrap();

        let docs = store.documents().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, 1);
        assert_eq!(docs[1].kind, DocumentKind::Page);
        assert_eq!(docs[1].status, PublishStatus::Publish);
        assert_eq!(docs[1].keywords.as_deref(), Some(r#"["shop"]"#));

        let shop = store.document(5).unwrap().unwrap();
        assert_eq!(shop.seo_title.as_deref(), Some("Shop %%sep%% %%sitename%%"));
        assert!(store.document(99).unwrap().is_none());
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path().join("absent.json")).unwrap();
        assert!(store.documents().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_file_is_json_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("documents.json");
        fs::write(&path, "{ not a list").unwrap();

        let err = JsonStore::open(path).unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }), "got {err:?}");
    }

    #[test]
    fn test_set_keywords_persists() {
        let tmp = TempDir::new().unwrap();
        let path = write_sample(&tmp);
        let store = JsonStore::open(path.clone()).unwrap();

        store.set_keywords(1, r#"["hello"]"#).unwrap();

        let reopened = JsonStore::open(path).unwrap();
        assert_eq!(
            reopened.document(1).unwrap().unwrap().keywords.as_deref(),
            Some(r#"["hello"]"#)
        );
    }

    #[test]
    fn test_set_keywords_failed_write_keeps_memory() {
        let tmp = TempDir::new().unwrap();
        let path = write_sample(&tmp);
        let store = JsonStore::open(path.clone()).unwrap();

        // A directory in place of the file makes the write fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = store.set_keywords(5, r#"["store"]"#).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "got {err:?}");
        assert_eq!(
            store.document(5).unwrap().unwrap().keywords.as_deref(),
            Some(r#"["shop"]"#)
        );
    }

    #[test]
    fn test_set_keywords_unknown_document() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(write_sample(&tmp)).unwrap();

        let err = store.set_keywords(404, "[]").unwrap_err();
        assert!(matches!(err, StoreError::DocumentNotFound(404)));
    }
}
