//! xqDoc comment block parser — line-by-line state machine.
//!
//! Each line is classified (see [`super::line`]) and its text appended to the
//! buffer of the section currently open. Buffers hold finished XML markup and
//! are concatenated in [`Section::ALL`] order when the block is rendered.

use crate::error::{CommentError, Result};
use crate::markup::{cdata_safe, TagBuilder, XmlTags, CDATA_CLOSE, CDATA_OPEN};
use crate::parser::line::{self, LineKind};
use crate::section::Section;
use std::io::{BufRead, Cursor};
use tracing::{debug, trace, warn};

/// Outer element wrapping all sections.
pub const COMMENT_TAG: &str = "comment";

// -- Section buffers ----------------------------------------------------------

/// One markup buffer per section, indexed by [`Section`].
#[derive(Debug, Default)]
struct SectionBuffers {
    buffers: [String; Section::COUNT],
}

impl SectionBuffers {
    fn get(&self, section: Section) -> &String {
        &self.buffers[section.index()]
    }

    fn get_mut(&mut self, section: Section) -> &mut String {
        &mut self.buffers[section.index()]
    }

    fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }

    /// Buffers in output order.
    fn iter(&self) -> impl Iterator<Item = &str> {
        Section::ALL.iter().map(|s| self.get(*s).as_str())
    }
}

// -- Parser state -------------------------------------------------------------

/// Converts one xqDoc comment block into a `comment` XML element.
///
/// A parser instance handles one block at a time:
///
/// ```
/// use xqdoc::CommentParser;
///
/// let mut parser = CommentParser::new();
/// parser.set_comment("(:~ Adds two numbers. :)");
/// assert_eq!(
///     parser.xml().unwrap(),
///     "<comment><description><![CDATA[Adds two numbers.]]></description></comment>"
/// );
///
/// parser.clear();
/// parser.set_comment("(:~ @author Jane :)");
/// assert!(parser.xml().unwrap().contains("<author><![CDATA[Jane]]></author>"));
/// ```
#[derive(Debug)]
pub struct CommentParser<T = XmlTags> {
    tags: T,
    buffers: SectionBuffers,
    comment: Option<String>,

    // Section that receives untagged lines
    current: Option<Section>,
    // An element of `current` is open (CDATA started, not yet closed)
    open: bool,
    // Buffer length right after the open element's CDATA start
    content_start: usize,
    // Indentation baseline of the current section
    leading_spaces: usize,
    // The end marker has been seen
    ended: bool,
    parsed: bool,
}

impl Default for CommentParser<XmlTags> {
    fn default() -> Self {
        Self::with_tags(XmlTags::new())
    }
}

impl CommentParser<XmlTags> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: TagBuilder> CommentParser<T> {
    /// Parser rendering its elements through `tags`.
    pub fn with_tags(tags: T) -> Self {
        Self {
            tags,
            buffers: SectionBuffers::default(),
            comment: None,
            current: None,
            open: false,
            content_start: 0,
            leading_spaces: 0,
            ended: false,
            parsed: false,
        }
    }

    /// Reset to the empty state, ready for a new comment block.
    pub fn clear(&mut self) {
        self.buffers.clear();
        self.comment = None;
        self.current = None;
        self.open = false;
        self.content_start = 0;
        self.leading_spaces = 0;
        self.ended = false;
        self.parsed = false;
    }

    /// Store the raw comment block. Parsing happens in [`xml`](Self::xml).
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
        self.leading_spaces = 0;
    }

    /// Parse the comment block and render it.
    ///
    /// Returns an empty string when no comment is set. A block can be
    /// rendered once; call [`clear`](Self::clear) before rendering again,
    /// otherwise [`CommentError::AlreadyParsed`] is returned.
    pub fn xml(&mut self) -> Result<String> {
        let Some(comment) = self.comment.take() else {
            return Ok(String::new());
        };
        if self.parsed {
            self.comment = Some(comment);
            return Err(CommentError::AlreadyParsed);
        }
        self.parsed = true;

        let result = self.parse(&comment);
        self.comment = Some(comment);
        result?;

        let mut out = self.tags.begin_tag(COMMENT_TAG, None);
        for buffer in self.buffers.iter() {
            out.push_str(buffer);
        }
        out.push_str(&self.tags.end_tag(COMMENT_TAG));
        Ok(out)
    }

    fn parse(&mut self, comment: &str) -> Result<()> {
        // Lone `\r` terminates a line as well as `\n` and `\r\n`
        let normalized = comment.replace("\r\n", "\n").replace('\r', "\n");
        let lines = Cursor::new(normalized)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|source| CommentError::Read { source })?;

        for line in &lines {
            if self.ended {
                trace!(line = %line, "ignoring text after end of comment");
                continue;
            }
            self.process_line(line);
        }

        if self.open {
            warn!(
                section = %self.current.unwrap_or(Section::Description),
                "comment block has no end marker; closing open section"
            );
            self.close_section();
        }
        Ok(())
    }

    // -- Line processing ------------------------------------------------------

    fn process_line(&mut self, raw: &str) {
        let classified = line::classify(raw);
        trace!(?classified, "classified");

        match classified.kind {
            LineKind::Tag {
                section,
                name,
                text,
            } => {
                self.close_section();
                self.begin_section(section, name);
                self.leading_spaces = line::leading_whitespace(text);
                self.append(text.trim());
            }
            kind => {
                if !self.open {
                    let section = self.current.unwrap_or(Section::Description);
                    self.begin_section(section, None);
                }
                self.append_untagged(kind);
            }
        }

        if classified.ends_block {
            self.close_section();
            self.ended = true;
        }
    }

    /// Append text of a line that carries no tag keyword.
    fn append_untagged(&mut self, kind: LineKind<'_>) {
        match kind {
            LineKind::Begin(text) => {
                if self.has_content() {
                    self.append("\n");
                }
                self.leading_spaces = line::leading_whitespace(text);
                self.append(line::strip_indent(text, self.leading_spaces));
            }
            LineKind::Continuation(text) => {
                if self.has_content() {
                    self.append("\n");
                } else {
                    self.leading_spaces = line::leading_whitespace(text);
                }
                self.append(line::strip_indent(text, self.leading_spaces));
            }
            LineKind::Plain(text) => {
                if self.has_content() {
                    self.append("\n");
                }
                self.append(line::strip_indent(text, self.leading_spaces));
            }
            LineKind::Blank | LineKind::Tag { .. } => {}
        }
    }

    // -- Buffer operations ----------------------------------------------------

    fn begin_section(&mut self, section: Section, name: Option<&str>) {
        debug!(section = %section, tag = ?name, "begin section");
        let open_tag = self.tags.begin_tag(section.tag_name(), name);
        let buffer = self.buffers.get_mut(section);
        buffer.push_str(&open_tag);
        buffer.push_str(CDATA_OPEN);
        self.content_start = buffer.len();
        self.current = Some(section);
        self.open = true;
    }

    fn close_section(&mut self) {
        let Some(section) = self.current.filter(|_| self.open) else {
            return;
        };
        let close_tag = self.tags.end_tag(section.tag_name());
        let buffer = self.buffers.get_mut(section);
        let trimmed = buffer.trim_end().len();
        buffer.truncate(trimmed);
        buffer.push_str(CDATA_CLOSE);
        buffer.push_str(&close_tag);
        self.open = false;
    }

    fn has_content(&self) -> bool {
        self.current
            .is_some_and(|section| self.buffers.get(section).len() > self.content_start)
    }

    fn append(&mut self, text: &str) {
        if let Some(section) = self.current {
            self.buffers.get_mut(section).push_str(&cdata_safe(text));
        }
    }
}

/// Render a single comment block with a fresh parser and plain tags.
pub fn comment_to_xml(comment: &str) -> Result<String> {
    let mut parser = CommentParser::new();
    parser.set_comment(comment);
    parser.xml()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(comment: &str) -> String {
        comment_to_xml(comment).unwrap()
    }

    fn wrap(inner: &str) -> String {
        format!("<comment>{}</comment>", inner)
    }

    #[test]
    fn single_line_description() {
        assert_eq!(
            render("(:~ A simple description. :)"),
            wrap("<description><![CDATA[A simple description.]]></description>")
        );
    }

    #[test]
    fn tagged_block() {
        let input = "(:~ Does X.\n : @param $a the input\n : @return the result\n:)";
        assert_eq!(
            render(input),
            wrap(concat!(
                "<description><![CDATA[Does X.]]></description>",
                "<param><![CDATA[$a the input]]></param>",
                "<return><![CDATA[the result]]></return>",
            ))
        );
    }

    #[test]
    fn sections_render_in_fixed_order() {
        let input = concat!(
            "(:~\n",
            " : @custom:x custom\n",
            " : @since 1.0\n",
            " : @see other\n",
            " : @deprecated use y\n",
            " : @error err:E1\n",
            " : @return r\n",
            " : @param $p p\n",
            " : @version 2\n",
            " : @author Jane\n",
            ":)"
        );
        let xml = render(input);
        let positions: Vec<usize> = Section::ALL
            .iter()
            .map(|s| xml.find(&format!("<{}", s.tag_name())).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "{xml}");
    }

    #[test]
    fn repeated_tags_share_a_buffer() {
        let input = "(:~\n : @param $a first\n : @return r\n : @param $b second\n:)";
        let xml = render(input);
        assert!(xml.contains(concat!(
            "<param><![CDATA[$a first]]></param>",
            "<param><![CDATA[$b second]]></param>",
            "<return>"
        )));
    }

    #[test]
    fn custom_tag_attribute() {
        assert_eq!(
            render("(:~ @custom:since-2.0 note text :)"),
            wrap("<custom tag=\"since-2.0\"><![CDATA[note text]]></custom>")
        );
    }

    #[test]
    fn indentation_is_relative_to_first_line() {
        let input = "(:~\n :    First line\n :      second\n:)";
        assert_eq!(
            render(input),
            wrap("<description><![CDATA[First line\n  second]]></description>")
        );
    }

    #[test]
    fn description_continuation_lines() {
        let input = "(:~ Line one.\n : Line two.\n :\n : Line four.\n:)";
        assert_eq!(
            render(input),
            wrap("<description><![CDATA[Line one.\nLine two.\n\nLine four.]]></description>")
        );
    }

    #[test]
    fn tag_continuation_keeps_relative_indent() {
        let input = "(:~\n : @param $a first\n :   more\n:)";
        // baseline is the single space after @param
        assert_eq!(
            render(input),
            wrap(concat!(
                "<description><![CDATA[]]></description>",
                "<param><![CDATA[$a first\n  more]]></param>",
            ))
        );
    }

    #[test]
    fn plain_lines_join_current_section() {
        let input = "(:~ Intro\nno marker here\n:)";
        assert_eq!(
            render(input),
            wrap("<description><![CDATA[Intro\nno marker here]]></description>")
        );
    }

    #[test]
    fn plain_lines_strip_to_baseline() {
        let input = "(:~\n :    First line\n      plain six\n:)";
        assert_eq!(
            render(input),
            wrap("<description><![CDATA[First line\n  plain six]]></description>")
        );
    }

    #[test]
    fn plain_line_shallower_than_baseline_keeps_text() {
        let input = "(:~\n :    First line\n  two\n:)";
        assert_eq!(
            render(input),
            wrap("<description><![CDATA[First line\ntwo]]></description>")
        );
    }

    #[test]
    fn end_marker_on_content_line() {
        let input = "(:~ Text\n : @return value :)";
        assert_eq!(
            render(input),
            wrap(concat!(
                "<description><![CDATA[Text]]></description>",
                "<return><![CDATA[value]]></return>",
            ))
        );
    }

    #[test]
    fn missing_end_marker_still_closes() {
        let input = "(:~ Unterminated\n : @author Jane";
        assert_eq!(
            render(input),
            wrap(concat!(
                "<description><![CDATA[Unterminated]]></description>",
                "<author><![CDATA[Jane]]></author>",
            ))
        );
    }

    #[test]
    fn text_after_end_marker_is_ignored() {
        let input = "(:~ Doc :)\ndeclare function f() { () };";
        assert_eq!(
            render(input),
            wrap("<description><![CDATA[Doc]]></description>")
        );
    }

    #[test]
    fn empty_block() {
        assert_eq!(
            render("(:~\n:)"),
            wrap("<description><![CDATA[]]></description>")
        );
    }

    #[test]
    fn cdata_terminator_in_text() {
        assert_eq!(
            render("(:~ a]]>b :)"),
            wrap("<description><![CDATA[a]]]]><![CDATA[>b]]></description>")
        );
    }

    #[test]
    fn crlf_line_endings() {
        let input = "(:~ One\r\n : Two\r\n:)";
        assert_eq!(
            render(input),
            wrap("<description><![CDATA[One\nTwo]]></description>")
        );
    }

    #[test]
    fn lone_cr_line_endings() {
        assert_eq!(
            render("(:~ one\r : two\r:)"),
            wrap("<description><![CDATA[one\ntwo]]></description>")
        );
    }

    #[test]
    fn no_comment_is_empty() {
        let mut parser = CommentParser::new();
        assert_eq!(parser.xml().unwrap(), "");
        parser.clear();
        assert_eq!(parser.xml().unwrap(), "");
    }

    #[test]
    fn second_render_requires_clear() {
        let mut parser = CommentParser::new();
        parser.set_comment("(:~ Once :)");
        parser.xml().unwrap();
        assert!(matches!(parser.xml(), Err(CommentError::AlreadyParsed)));
    }

    #[test]
    fn idempotent_after_clear() {
        let input = "(:~ Does X.\n : @param $a the input\n : @custom:k v\n:)";
        let mut parser = CommentParser::new();
        parser.set_comment(input);
        let first = parser.xml().unwrap();
        parser.clear();
        parser.set_comment(input);
        let second = parser.xml().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn prefixed_tags() {
        let mut parser = CommentParser::with_tags(XmlTags::with_prefix("xqdoc"));
        parser.set_comment("(:~ @since 3.1 :)");
        assert_eq!(
            parser.xml().unwrap(),
            "<xqdoc:comment><xqdoc:since><![CDATA[3.1]]></xqdoc:since></xqdoc:comment>"
        );
    }
}
