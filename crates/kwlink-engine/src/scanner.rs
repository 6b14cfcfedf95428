//! Block scanner: the bounded text segments keyword matching runs in.
//!
//! A block is `<tag>...</tag>` for one of [`BLOCK_TAGS`], matched
//! case-insensitively, across lines, non-greedily, and without overlap, in
//! document order. The opening tag must carry no attributes. Nesting is not
//! tracked: a block closes at the first matching closing tag, and a block
//! nested inside another block is scanned only as part of the outer one.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Tags whose inner text is scanned for keywords.
pub const BLOCK_TAGS: [&str; 5] = ["p", "li", "b", "em", "i"];

/// One alternative per tag: `(tag)>(inner)</tag>`. The regex crate has no
/// backreferences, so each closing tag is spelled out.
static BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = BLOCK_TAGS
        .iter()
        .map(|tag| format!("({tag})>(.*?)</{tag}>"))
        .collect();
    Regex::new(&format!("(?is)<(?:{})", alternatives.join("|"))).expect("invalid block regex")
});

/// A matched block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block<'a> {
    /// Tag name as written in the opening tag (e.g., `"p"` or `"LI"`).
    pub tag: &'a str,
    /// Text between the opening and closing tags.
    pub inner: &'a str,
    /// Byte range of the whole element.
    pub range: Range<usize>,
    /// Byte range of `inner`.
    pub inner_range: Range<usize>,
}

/// Find all blocks in `content`, in document order.
///
/// ```
/// use kwlink_engine::scan;
///
/// let blocks = scan("<h1>Title</h1><p>One</p><li>Two</li>");
/// let inner: Vec<&str> = blocks.iter().map(|b| b.inner).collect();
/// assert_eq!(inner, vec!["One", "Two"]);
/// ```
pub fn scan(content: &str) -> Vec<Block<'_>> {
    BLOCK_PATTERN
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            (0..BLOCK_TAGS.len()).find_map(|i| {
                let tag = caps.get(1 + 2 * i)?;
                let inner = caps.get(2 + 2 * i)?;
                Some(Block {
                    tag: tag.as_str(),
                    inner: inner.as_str(),
                    range: whole.range(),
                    inner_range: inner.range(),
                })
            })
        })
        .collect()
}

/// Rewrite the inner text of every block with `rewrite`.
///
/// Everything outside block inner text, including the tags themselves, is
/// copied byte for byte.
pub fn rewrite_blocks<F>(content: &str, mut rewrite: F) -> String
where
    F: FnMut(&Block<'_>) -> String,
{
    let mut output = String::with_capacity(content.len());
    let mut last = 0;
    for block in scan(content) {
        output.push_str(&content[last..block.inner_range.start]);
        output.push_str(&rewrite(&block));
        last = block.inner_range.end;
    }
    output.push_str(&content[last..]);
    output
}
