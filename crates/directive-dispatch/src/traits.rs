use crate::Result;
use command_parser::InstructionToken;

/// Destination for instruction tokens (a transport, a log, a test double).
pub trait TokenSink {
    /// Human-readable sink name for logs.
    fn name(&self) -> &str;

    /// Deliver one token. `wait:<ms>` tokens are never passed here; the
    /// runner turns them into delays.
    fn send(&mut self, token: &InstructionToken) -> Result<()>;
}
