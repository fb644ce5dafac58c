//! xqdoc — parse xqDoc comment blocks (`(:~ ... :)`) into xqDoc XML.
//!
//! A comment block is split into lines and each line is routed to one of ten
//! sections (description, `@author`, `@version`, `@param`, `@return`,
//! `@error`, `@deprecated`, `@see`, `@since`, `@custom`). The result is a
//! `comment` element whose children always appear in that order.
//!
//! Tag keywords are recognised anywhere on a line, not only at its start:
//! `foo@seebar` opens a `see` section. Existing comment corpora rely on this,
//! so it is kept.

pub mod error;
pub mod markup;
pub mod parser;
pub mod section;

pub use error::{CommentError, Result};
pub use markup::{TagBuilder, XmlTags};
pub use parser::{comment_to_xml, CommentParser};
pub use section::Section;
