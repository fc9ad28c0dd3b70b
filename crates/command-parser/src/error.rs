use thiserror::Error;

pub type Result<T, E = ParserError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("lexicon rejected: {0}")]
    Lexicon(#[from] LexiconError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexiconError {
    #[error("entry has an empty source pattern or canonical token")]
    Empty,
    #[error("duplicate source pattern: {0}")]
    Duplicate(String),
    #[error("canonical token '{canonical}' contains source pattern '{pattern}'")]
    Overlap { canonical: String, pattern: String },
}
