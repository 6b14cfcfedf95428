//! Document model shared by stores and the linking engine.

use serde::{Deserialize, Serialize};

/// Opaque document identifier.
pub type DocumentId = u64;

/// Kind of document. Only posts and pages take part in keyword linking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Blog post.
    #[default]
    Post,
    /// Static page.
    Page,
    /// Any other content type (attachments, custom types, ...).
    #[serde(other)]
    Other,
}

impl DocumentKind {
    /// Whether documents of this kind are linkable (post or page).
    #[must_use]
    pub fn is_linkable(self) -> bool {
        matches!(self, Self::Post | Self::Page)
    }
}

/// Publication status of a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    /// Publicly visible.
    #[default]
    Publish,
    /// Work in progress.
    Draft,
    /// Visible to authorised users only.
    Private,
    /// Any other status (pending, trash, ...).
    #[serde(other)]
    Other,
}

/// A document as held by a [`DocumentStore`](crate::DocumentStore).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier.
    pub id: DocumentId,
    /// Post, page, or other.
    #[serde(default)]
    pub kind: DocumentKind,
    /// Publication status.
    #[serde(default)]
    pub status: PublishStatus,
    /// Canonical URL of the document.
    pub permalink: String,
    /// Native document title.
    #[serde(default)]
    pub title: String,
    /// SEO title, possibly containing template tokens such as `%%sep%%`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    /// Raw keyword field: a JSON-encoded array of strings.
    ///
    /// Kept verbatim; use [`parse_keywords`](crate::parse_keywords) to read it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Document body.
    #[serde(default)]
    pub content: String,
}

impl Document {
    /// Whether this document contributes keywords to the dictionary
    /// (published post or page).
    #[must_use]
    pub fn is_keyword_source(&self) -> bool {
        self.status == PublishStatus::Publish && self.kind.is_linkable()
    }
}
