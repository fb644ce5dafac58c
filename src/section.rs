//! Comment sections and the tag keywords that select them.

use std::fmt;

/// One kind of child element inside an xqDoc `comment` element.
///
/// The declaration order is the output order: whatever order the tags appear
/// in the source comment, the rendered elements follow [`Section::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Description,
    Author,
    Version,
    Param,
    Return,
    Error,
    Deprecated,
    See,
    Since,
    Custom,
}

impl Section {
    /// Number of sections.
    pub const COUNT: usize = 10;

    /// Every section, in output order.
    pub const ALL: [Section; Section::COUNT] = [
        Section::Description,
        Section::Author,
        Section::Version,
        Section::Param,
        Section::Return,
        Section::Error,
        Section::Deprecated,
        Section::See,
        Section::Since,
        Section::Custom,
    ];

    /// XML element name used for this section.
    pub fn tag_name(self) -> &'static str {
        match self {
            Section::Description => "description",
            Section::Author => "author",
            Section::Version => "version",
            Section::Param => "param",
            Section::Return => "return",
            Section::Error => "error",
            Section::Deprecated => "deprecated",
            Section::See => "see",
            Section::Since => "since",
            Section::Custom => "custom",
        }
    }

    /// Position of this section in the output.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// Tag keywords in detection priority order.
///
/// Each keyword is searched for as a plain substring of the line and the
/// first entry that matches wins, even if a lower-priority keyword sits
/// further left. `@description` has no keyword: description text is whatever
/// precedes the first tag.
pub const TAG_KEYWORDS: &[(&str, Section)] = &[
    ("@param", Section::Param),
    ("@return", Section::Return),
    ("@error", Section::Error),
    ("@deprecated", Section::Deprecated),
    ("@see", Section::See),
    ("@since", Section::Since),
    ("@custom", Section::Custom),
    ("@author", Section::Author),
    ("@version", Section::Version),
];
