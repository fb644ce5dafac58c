//! Line classifier — decides what a single physical comment line contributes.

use crate::section::{Section, TAG_KEYWORDS};
use regex::Regex;
use std::sync::LazyLock;

/// Opens an xqDoc comment block.
pub const BEGIN_COMMENT: &str = "(:~";

/// Closes an xqDoc comment block.
pub const END_COMMENT: &str = ":)";

// Optional whitespace, then the `:` continuation marker
static RE_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*:").unwrap());

/// What a line contributes once the end marker (if any) has been cut off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A tag keyword was found. `text` is everything after the keyword (and
    /// after `:name` for `@custom`).
    Tag {
        section: Section,
        name: Option<&'a str>,
        text: &'a str,
    },
    /// Line carrying the begin marker; text after the marker.
    Begin(&'a str),
    /// ` : text` continuation line; text after the colon.
    Continuation(&'a str),
    /// Anything else; the whole line.
    Plain(&'a str),
    /// The only colon on the line belongs to the end marker.
    Blank,
}

/// A classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub kind: LineKind<'a>,
    /// The end marker occurs somewhere on this line.
    pub ends_block: bool,
}

/// Classify one line of a comment block.
///
/// Tag keywords are matched as plain substrings, in [`TAG_KEYWORDS`] order,
/// so `foo@seebar` still starts a `see` section.
pub fn classify(line: &str) -> Line<'_> {
    let end_marker = line.find(END_COMMENT);
    let last = end_marker.unwrap_or(line.len());

    let kind = if let Some((keyword, section, index)) = find_tag(line) {
        let mut offset = index + keyword.len();
        let mut name = None;
        if section == Section::Custom {
            let after = &line[offset..];
            // `@custom:)` is the end marker, not a name separator
            let named = !after.starts_with(END_COMMENT);
            if let Some(rest) = after.strip_prefix(':').filter(|_| named) {
                let tag = custom_name(rest);
                offset += 1 + tag.len();
                name = (!tag.is_empty()).then_some(tag);
            }
        }
        LineKind::Tag {
            section,
            name,
            text: slice(line, offset, last),
        }
    } else if let Some(index) = line.find(BEGIN_COMMENT) {
        LineKind::Begin(slice(line, index + BEGIN_COMMENT.len(), last))
    } else if RE_CONTINUATION.is_match(line) {
        match line.find(':') {
            Some(colon) if colon < last => LineKind::Continuation(&line[colon + 1..last]),
            _ => LineKind::Blank,
        }
    } else {
        LineKind::Plain(&line[..last])
    };

    Line {
        kind,
        ends_block: end_marker.is_some(),
    }
}

/// Number of leading whitespace characters.
pub fn leading_whitespace(text: &str) -> usize {
    text.chars().take_while(|c| c.is_whitespace()).count()
}

/// Remove at most `count` leading whitespace characters.
pub fn strip_indent(text: &str, count: usize) -> &str {
    let skip: usize = text
        .chars()
        .take(count)
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    &text[skip..]
}

/// First keyword by priority that occurs anywhere in `line`.
fn find_tag(line: &str) -> Option<(&'static str, Section, usize)> {
    TAG_KEYWORDS.iter().find_map(|&(keyword, section)| {
        line.find(keyword).map(|index| (keyword, section, index))
    })
}

/// Name following `@custom:`, up to whitespace or the end marker.
fn custom_name(rest: &str) -> &str {
    let end = rest
        .find(char::is_whitespace)
        .into_iter()
        .chain(rest.find(END_COMMENT))
        .min()
        .unwrap_or(rest.len());
    &rest[..end]
}

/// `line[start..end]`, or empty when the end marker sits before `start`.
fn slice(line: &str, start: usize, end: usize) -> &str {
    if start < end {
        &line[start..end]
    } else {
        ""
    }
}
