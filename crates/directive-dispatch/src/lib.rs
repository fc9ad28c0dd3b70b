//! directive-dispatch: delivery boundary for instruction-token streams
//!
//! The command parser only produces tokens. This crate defines where they go
//! (`TokenSink`) and how a stream is paced (`dispatch`, which turns
//! `wait:<ms>` tokens into real delays). The default build enables a `mock`
//! sink so binaries and tests work without a machine attached.

mod error;
pub use error::{DispatchError, Result};

mod traits;
pub use traits::TokenSink;

mod runner;
pub use runner::{dispatch, parse_tokens, DispatchReport};

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::{RecordingSink, SentToken};
