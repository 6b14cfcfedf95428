//! Keyword matcher and rewriter.
//!
//! A [`RewriteContext`] carries the per-pass mutable state (the working
//! dictionary, link counters, title memo) through every block of one
//! document. A keyword occurrence is linkable when it:
//!
//! - is not preceded by a quote, `>`, or a word character,
//! - is not followed by a word character,
//! - is not followed by a run of non-`<` characters ending in `>` (i.e., it
//!   is not inside a tag), and
//! - does not lie inside an anchor already present in the block.
//!
//! Word characters are Unicode alphanumerics and `_`.

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use kwlink_store::DocumentId;
use regex::{Regex, RegexBuilder};

use crate::dictionary::{FoldedDictionary, KeywordEntry};
use crate::html::{escape_html, escape_url};
use crate::title::{TitleCache, TitleSource};
use crate::vault::Category;

/// Class attribute of every inserted anchor.
pub const LINK_CLASS: &str = "s-link";

/// Linking behaviour, fixed for the duration of a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkSettings {
    /// Link only the first occurrence of each keyword in the whole document.
    pub first_occurrence_only: bool,
    /// Maximum anchors pointing at any single target per document (≥ 1).
    pub max_links_per_target: usize,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            first_occurrence_only: false,
            max_links_per_target: 1,
        }
    }
}

/// Anchors inserted per target during one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkCounters(HashMap<DocumentId, usize>);

impl LinkCounters {
    /// Anchors inserted so far for `target`.
    #[must_use]
    pub fn get(&self, target: DocumentId) -> usize {
        self.0.get(&target).copied().unwrap_or(0)
    }

    fn increment(&mut self, target: DocumentId) {
        *self.0.entry(target).or_insert(0) += 1;
    }

    /// Counts for every target that received at least one anchor.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<DocumentId, usize> {
        self.0.iter().map(|(id, count)| (*id, *count)).collect()
    }
}

/// Mutable state of one rewrite pass over one document.
pub(crate) struct RewriteContext<'a> {
    dictionary: &'a FoldedDictionary,
    retired: Vec<bool>,
    live: usize,
    patterns: Vec<OnceCell<Option<Regex>>>,
    counters: LinkCounters,
    current_id: DocumentId,
    settings: LinkSettings,
    titles: TitleCache<'a>,
}

impl<'a> RewriteContext<'a> {
    pub(crate) fn new(
        dictionary: &'a FoldedDictionary,
        current_id: DocumentId,
        settings: LinkSettings,
        titles: &'a dyn TitleSource,
    ) -> Self {
        let len = dictionary.len();
        Self {
            dictionary,
            retired: vec![false; len],
            live: len,
            patterns: (0..len).map(|_| OnceCell::new()).collect(),
            counters: LinkCounters::default(),
            current_id,
            settings,
            titles: TitleCache::new(titles),
        }
    }

    pub(crate) fn into_counters(self) -> LinkCounters {
        self.counters
    }

    /// Link keyword occurrences in one block's inner text.
    pub(crate) fn rewrite(&mut self, block: &str) -> String {
        let folded = block.to_lowercase();
        let mut text = block.to_owned();
        let dictionary = self.dictionary;
        let entries = dictionary.entries();

        for (index, (key, entry)) in entries.iter().enumerate() {
            if self.live == 0 {
                break;
            }
            if self.retired[index] || entry.target_id == self.current_id {
                continue;
            }
            if self.counters.get(entry.target_id) >= self.settings.max_links_per_target {
                // Counters never go down within a pass.
                self.retire(index);
                continue;
            }
            if !folded.contains(key.as_str()) {
                continue;
            }

            let limit = self.settings.first_occurrence_only.then_some(1);
            if let Some(updated) = self.replace_occurrences(index, entry, &text, limit) {
                text = updated;
                if self.settings.first_occurrence_only {
                    self.retire(index);
                }
            }
        }

        text
    }

    fn retire(&mut self, index: usize) {
        if !self.retired[index] {
            self.retired[index] = true;
            self.live -= 1;
        }
    }

    /// Replace linkable occurrences of entry `index` in `text`.
    ///
    /// Returns `None` when nothing was linked.
    fn replace_occurrences(
        &mut self,
        index: usize,
        entry: &KeywordEntry,
        text: &str,
        limit: Option<usize>,
    ) -> Option<String> {
        let pattern = self.patterns[index]
            .get_or_init(|| keyword_pattern(&entry.keyword))
            .as_ref()?;

        let anchors = anchor_spans(text);
        let mut angles = AngleCursor::new(text);
        let mut output = String::with_capacity(text.len() + 64);
        let mut copied = 0;
        let mut pos = 0;
        let mut replaced = 0;

        while let Some(m) = pattern.find_at(text, pos) {
            if !is_linkable(text, m.range(), &anchors, &mut angles) {
                pos = next_char_boundary(text, m.start());
                continue;
            }
            if limit.is_some_and(|limit| replaced >= limit)
                || self.counters.get(entry.target_id) >= self.settings.max_links_per_target
            {
                break;
            }

            self.counters.increment(entry.target_id);
            let title = self.titles.get(entry.target_id);
            output.push_str(&text[copied..m.start()]);
            output.push_str(&anchor(&entry.target_url, title, m.as_str()));
            copied = m.end();
            pos = m.end();
            replaced += 1;
        }

        if replaced == 0 {
            return None;
        }
        output.push_str(&text[copied..]);
        Some(output)
    }
}

fn keyword_pattern(keyword: &str) -> Option<Regex> {
    match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            tracing::warn!(keyword, "keyword cannot be matched: {e}");
            None
        }
    }
}

fn anchor(url: &str, title: &str, text: &str) -> String {
    format!(
        r#"<a class="{LINK_CLASS}" href="{}" title="{}">{text}</a>"#,
        escape_url(url),
        escape_html(title),
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_linkable(
    text: &str,
    span: Range<usize>,
    anchors: &[Range<usize>],
    angles: &mut AngleCursor<'_>,
) -> bool {
    if let Some(before) = text[..span.start].chars().next_back()
        && (matches!(before, '"' | '\'' | '>') || is_word_char(before))
    {
        return false;
    }
    if text[span.end..].chars().next().is_some_and(is_word_char) {
        return false;
    }
    if angles.inside_tag(span.end) {
        return false;
    }
    let i = anchors.partition_point(|a| a.end <= span.start);
    !anchors.get(i).is_some_and(|a| a.start < span.end)
}

fn anchor_spans(text: &str) -> Vec<Range<usize>> {
    Category::Link
        .pattern()
        .find_iter(text)
        .map(|m| m.range())
        .collect()
}

fn next_char_boundary(text: &str, at: usize) -> usize {
    at + text[at..].chars().next().map_or(1, char::len_utf8)
}

/// Finds the next `<` or `>` at or after a position.
///
/// Queries arrive in increasing order, so the last answer is reused while it
/// still lies ahead of the query. This keeps a block with many rejected
/// candidates linear.
struct AngleCursor<'t> {
    text: &'t str,
    last: Option<(usize, Option<usize>)>,
}

impl<'t> AngleCursor<'t> {
    fn new(text: &'t str) -> Self {
        Self { text, last: None }
    }

    /// Whether the first angle bracket at or after `from` is `>`.
    fn inside_tag(&mut self, from: usize) -> bool {
        let found = match self.last {
            Some((start, found)) if start <= from && found.is_none_or(|at| at >= from) => found,
            _ => {
                let found = self.text[from..].find(['<', '>']).map(|i| from + i);
                self.last = Some((from, found));
                found
            }
        };
        found.is_some_and(|at| self.text.as_bytes()[at] == b'>')
    }
}
