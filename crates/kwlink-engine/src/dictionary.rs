//! Keyword dictionary: aggregation of per-document keyword lists.
//!
//! [`Dictionary::build`] walks documents in store order and records, for each
//! trimmed keyword, the first document that claims it. Keys are kept exactly
//! as written (case-sensitive). Case folding happens later, in
//! [`Dictionary::case_folded`], which produces the working copy a rewrite pass
//! mutates.

use std::collections::HashSet;

use kwlink_store::{Document, DocumentId, parse_keywords};
use serde::{Deserialize, Serialize};

/// A keyword and the document it links to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Keyword as stored (trimmed, case preserved).
    pub keyword: String,
    /// Document the keyword links to.
    pub target_id: DocumentId,
    /// Permalink of the target document.
    pub target_url: String,
}

/// Aggregated keyword dictionary in insertion order.
///
/// Insertion order is significant: when several keywords could match in the
/// same block, the earlier one is tried first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: Vec<KeywordEntry>,
}

impl Dictionary {
    /// Build the dictionary from documents, in the order given.
    ///
    /// Only published posts and pages contribute. A document whose keyword
    /// field is absent, empty, or malformed contributes nothing. The first
    /// document to use a keyword (exact string after trimming) owns it; later
    /// claims are ignored.
    pub fn build<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries = Vec::new();

        for doc in documents {
            if !doc.is_keyword_source() {
                continue;
            }
            let Some(raw) = doc.keywords.as_deref() else {
                continue;
            };
            let keywords = parse_keywords(raw);
            if keywords.is_empty() {
                tracing::debug!(document = doc.id, "no usable keywords in field");
                continue;
            }

            for keyword in keywords {
                let word = keyword.trim();
                if word.is_empty() || seen.contains(word) {
                    continue;
                }
                seen.insert(word.to_owned());
                entries.push(KeywordEntry {
                    keyword: word.to_owned(),
                    target_id: doc.id,
                    target_url: doc.permalink.clone(),
                });
            }
        }

        Self { entries }
    }

    /// Create a dictionary from entries already in the desired order.
    ///
    /// Later entries with a keyword equal to an earlier one are dropped.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = KeywordEntry>) -> Self {
        let mut seen = HashSet::new();
        Self {
            entries: entries
                .into_iter()
                .filter(|e| seen.insert(e.keyword.clone()))
                .collect(),
        }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    /// Look up an entry by its exact keyword.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&KeywordEntry> {
        self.entries.iter().find(|e| e.keyword == keyword)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of this dictionary without entries pointing at `url`.
    ///
    /// Used to drop self-links before a pass; the shared dictionary itself is
    /// never mutated.
    #[must_use]
    pub fn without_target_url(&self, url: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| e.target_url != url)
                .cloned()
                .collect(),
        }
    }

    /// Working copy keyed by lower-cased keyword.
    ///
    /// When two keywords fold to the same key, the earlier entry keeps both
    /// its position and its target; the later one is dropped.
    #[must_use]
    pub fn case_folded(&self) -> FoldedDictionary {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let key = entry.keyword.to_lowercase();
            if seen.insert(key.clone()) {
                entries.push((key, entry.clone()));
            } else {
                tracing::debug!(
                    keyword = %entry.keyword,
                    target = entry.target_id,
                    "keyword collides with an earlier entry after case folding, dropped"
                );
            }
        }
        FoldedDictionary { entries }
    }
}

/// Case-folded dictionary used during one rewrite pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FoldedDictionary {
    entries: Vec<(String, KeywordEntry)>,
}

impl FoldedDictionary {
    /// `(folded keyword, entry)` pairs in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, KeywordEntry)] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
