//! XML tag builder — trait-based so callers can plug in their own markup.

/// Opens a CDATA section.
pub const CDATA_OPEN: &str = "<![CDATA[";

/// Closes a CDATA section.
pub const CDATA_CLOSE: &str = "]]>";

/// Builds opening and closing tag strings for comment elements.
pub trait TagBuilder {
    /// Opening tag for `name`. `tag` is the optional value of the `tag`
    /// attribute (only `@custom:name` sections carry one).
    fn begin_tag(&self, name: &str, tag: Option<&str>) -> String;

    /// Closing tag for `name`.
    fn end_tag(&self, name: &str) -> String;
}

/// Plain XML tags, optionally qualified with a namespace prefix.
///
/// With `prefix = Some("xqdoc")` the element `param` renders as
/// `<xqdoc:param>`.
#[derive(Debug, Clone, Default)]
pub struct XmlTags {
    prefix: Option<String>,
}

impl XmlTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
        }
    }

    fn qualified(&self, name: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}:{}", prefix, name),
            None => name.to_string(),
        }
    }
}

impl TagBuilder for XmlTags {
    fn begin_tag(&self, name: &str, tag: Option<&str>) -> String {
        match tag {
            Some(tag) => format!("<{} tag=\"{}\">", self.qualified(name), xml_escape(tag)),
            None => format!("<{}>", self.qualified(name)),
        }
    }

    fn end_tag(&self, name: &str) -> String {
        format!("</{}>", self.qualified(name))
    }
}

/// Escape text for use inside an attribute value.
pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Make text safe to place inside a CDATA section.
///
/// A literal `]]>` would end the section early, so it is split across two
/// sections.
pub fn cdata_safe(s: &str) -> String {
    s.replace(CDATA_CLOSE, "]]]]><![CDATA[>")
}
