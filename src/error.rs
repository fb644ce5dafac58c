use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommentError {
    /// The comment text could not be split into lines.
    #[error("problems processing the comment block: {source}")]
    Read { source: std::io::Error },

    /// `xml()` was called again without an intervening `clear()`.
    #[error("comment block already parsed; call clear() before parsing again")]
    AlreadyParsed,
}

pub type Result<T> = std::result::Result<T, CommentError>;
