//! Parser module — line classifier and the comment block state machine.

pub mod comment;
pub mod line;

pub use comment::{comment_to_xml, CommentParser, COMMENT_TAG};
pub use line::{BEGIN_COMMENT, END_COMMENT};
