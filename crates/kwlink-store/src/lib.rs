//! Document and keyword storage abstraction for kwlink.
//!
//! This crate provides a [`DocumentStore`] trait that decouples the linking
//! engine from wherever documents and their keyword lists live. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (JSON file, database, CMS export)
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Document`]: a publishable document with its raw keyword field
//! - [`DocumentStore`] trait with `documents()`, `document()` and `set_keywords()`
//! - [`JsonStore`] backed by a single JSON file
//! - [`MemoryStore`] for testing (behind `mock` feature flag)
//! - Keyword field codec: [`parse_keywords`], [`encode_keywords`],
//!   [`sanitize_keyword`], [`normalize_keywords`]
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use kwlink_store::{DocumentStore, JsonStore, parse_keywords};
//!
//! let store = JsonStore::open(PathBuf::from("documents.json"))?;
//! for doc in store.documents()? {
//!     let keywords = parse_keywords(doc.keywords.as_deref().unwrap_or_default());
//!     println!("{}: {keywords:?}", doc.id);
//! }
//! ```

mod document;
mod json;
mod keywords;
#[cfg(feature = "mock")]
mod mock;
mod store;

pub use document::{Document, DocumentId, DocumentKind, PublishStatus};
pub use json::JsonStore;
pub use keywords::{encode_keywords, normalize_keywords, parse_keywords, sanitize_keyword};
#[cfg(feature = "mock")]
pub use mock::MemoryStore;
pub use store::{DocumentStore, StoreError};
