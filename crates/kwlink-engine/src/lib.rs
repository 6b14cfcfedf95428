//! Keyword auto-linking engine.
//!
//! Authors attach keyword lists to documents. At render time every occurrence
//! of a keyword inside simple text blocks (`p`, `li`, `b`, `em`, `i`) of some
//! other document's content becomes an anchor to the document that owns the
//! keyword, subject to per-target caps and an optional first-occurrence-only
//! mode. Existing anchors and bracketed shortcodes are never touched.
//!
//! # Architecture
//!
//! - [`Dictionary`]: keyword to target aggregation over a document store
//! - [`DictionaryProvider`]: the dictionary behind a TTL cache bucket
//! - [`protect`] / [`Vault`]: hide shortcodes and anchors behind hash markers
//! - [`scan`] / [`rewrite_blocks`]: find the blocks that are rewritten
//! - [`Linker`]: the full pass over one document
//! - [`TitleSource`] / [`StoreTitles`]: `title` attributes of inserted anchors
//!
//! # Example
//!
//! ```
//! use kwlink_cache::{Cache, MemoryCache};
//! use kwlink_engine::{CurrentDocument, DictionaryProvider, LinkSettings, Linker, StoreTitles};
//! use kwlink_store::{DocumentKind, JsonStore};
//!
//! # let dir = std::env::temp_dir().join("kwlink-engine-doc");
//! # let store = JsonStore::open(dir.join("missing.json")).unwrap();
//! let cache = MemoryCache::new();
//! let provider = DictionaryProvider::new(&store, cache.bucket("dictionary"));
//! let titles = StoreTitles::new(&store);
//! let linker = Linker::new(LinkSettings::default(), &titles);
//!
//! let current = CurrentDocument { id: 1, permalink: "/hello".to_owned(), kind: DocumentKind::Post };
//! let html = linker.link("<p>Nothing to link.</p>", &provider.dictionary(), &current);
//! assert_eq!(html, "<p>Nothing to link.</p>");
//! ```

mod dictionary;
mod html;
mod linker;
mod matcher;
mod provider;
mod scanner;
mod title;
mod vault;

pub use dictionary::{Dictionary, FoldedDictionary, KeywordEntry};
pub use html::{escape_html, escape_url};
pub use linker::{CurrentDocument, LinkReport, Linker};
pub use matcher::{LINK_CLASS, LinkCounters, LinkSettings};
pub use provider::{DEFAULT_DICTIONARY_TTL, DICTIONARY_CACHE_KEY, DictionaryProvider};
pub use scanner::{BLOCK_TAGS, Block, rewrite_blocks, scan};
pub use title::{StoreTitles, TitleSource, clean_seo_title};
pub use vault::{Category, Vault, content_hash, protect, protect_with};
