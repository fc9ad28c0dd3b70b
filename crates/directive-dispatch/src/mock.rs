use crate::{DispatchError, Result, TokenSink};
use command_parser::InstructionToken;
use time::OffsetDateTime;

/// A token delivered to a [`RecordingSink`]
#[derive(Clone, Debug, PartialEq)]
pub struct SentToken {
    pub token: InstructionToken,
    pub at: OffsetDateTime,
}

/// In-process sink that records every token it receives. Each instance is independent.
pub struct RecordingSink {
    name: String,
    sent: Vec<SentToken>,
    reject: Option<InstructionToken>,
}

impl RecordingSink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sent: Vec::new(),
            reject: None,
        }
    }

    /// Refuse a specific token so failure paths are testable
    pub fn rejecting(mut self, token: InstructionToken) -> Self {
        self.reject = Some(token);
        self
    }

    pub fn sent(&self) -> &[SentToken] {
        &self.sent
    }

    pub fn wire(&self) -> Vec<String> {
        self.sent.iter().map(|s| s.token.to_string()).collect()
    }
}

impl TokenSink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&mut self, token: &InstructionToken) -> Result<()> {
        if self.reject.as_ref() == Some(token) {
            return Err(DispatchError::Rejected {
                token: token.to_string(),
                reason: format!("{} refuses this token", self.name),
            });
        }
        self.sent.push(SentToken {
            token: *token,
            at: OffsetDateTime::now_utc(),
        });
        Ok(())
    }
}
