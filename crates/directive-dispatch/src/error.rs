use command_parser::TokenParseError;
use thiserror::Error;

pub type Result<T, E = DispatchError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("sink rejected token {token}: {reason}")]
    Rejected { token: String, reason: String },
    #[error(transparent)]
    InvalidToken(#[from] TokenParseError),
}
