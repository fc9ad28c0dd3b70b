use crate::{Result, TokenSink};
use command_parser::{InstructionToken, MoveDirection};
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of dispatching one token stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Tokens delivered to the sink
    pub sent: usize,
    /// `unknown` tokens that were not forwarded
    pub skipped: usize,
    /// Total delay honoured for `wait:<ms>` tokens
    pub waited: Duration,
    /// True when an emergency stop cut the stream short
    pub halted: bool,
}

/// Deliver tokens one at a time. `wait:<ms>` becomes a real delay before the
/// next token; `safety.estop` is delivered and ends the stream.
///
/// If the sink fails mid-stream a best-effort `move.stop` is sent before the
/// error is returned.
pub async fn dispatch<S>(tokens: &[InstructionToken], sink: &mut S) -> Result<DispatchReport>
where
    S: TokenSink + ?Sized,
{
    let mut report = DispatchReport::default();
    for (i, token) in tokens.iter().enumerate() {
        match token {
            InstructionToken::Wait(ms) => {
                let delay = Duration::from_millis(*ms);
                debug!(sink = sink.name(), ms, "waiting");
                tokio::time::sleep(delay).await;
                report.waited += delay;
            }
            InstructionToken::Unknown => {
                warn!(sink = sink.name(), "skipping unknown token");
                report.skipped += 1;
            }
            _ => {
                if let Err(e) = sink.send(token) {
                    warn!(sink = sink.name(), token = %token, error = %e, "send failed");
                    let stop = InstructionToken::Move(MoveDirection::Stop);
                    if *token != stop {
                        let _ = sink.send(&stop);
                    }
                    return Err(e);
                }
                debug!(sink = sink.name(), token = %token, "sent");
                report.sent += 1;
                if *token == InstructionToken::EmergencyStop {
                    if i + 1 < tokens.len() {
                        warn!(
                            sink = sink.name(),
                            dropped = tokens.len() - i - 1,
                            "emergency stop ends the stream"
                        );
                        report.halted = true;
                    }
                    break;
                }
            }
        }
    }
    Ok(report)
}

/// Parse a newline-separated token listing; blank lines and `#` comments are ignored.
pub fn parse_tokens(text: &str) -> Result<Vec<InstructionToken>> {
    let mut tokens = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        tokens.push(line.parse()?);
    }
    Ok(tokens)
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::{DispatchError, RecordingSink};
    use std::time::Instant;

    fn tokens(lines: &[&str]) -> Vec<InstructionToken> {
        parse_tokens(&lines.join("\n")).unwrap()
    }

    #[tokio::test]
    async fn test_waits_are_honoured_not_sent() {
        let stream = tokens(&["move.forward", "move.duration:30", "wait:30", "move.stop"]);
        let mut sink = RecordingSink::new("mock0");
        let start = Instant::now();
        let report = dispatch(&stream, &mut sink).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(report.waited, Duration::from_millis(30));
        assert_eq!(report.sent, 3);
        assert_eq!(
            sink.wire(),
            vec!["move.forward", "move.duration:30", "move.stop"]
        );
        let sent = sink.sent();
        assert!(sent[2].at - sent[1].at >= time::Duration::milliseconds(30));
    }

    #[tokio::test]
    async fn test_estop_halts_stream() {
        let stream = tokens(&["safety.estop", "move.forward", "siren"]);
        let mut sink = RecordingSink::new("mock0");
        let report = dispatch(&stream, &mut sink).await.unwrap();
        assert!(report.halted);
        assert_eq!(sink.wire(), vec!["safety.estop"]);
    }

    #[tokio::test]
    async fn test_unknown_is_skipped() {
        let stream = tokens(&["unknown"]);
        let mut sink = RecordingSink::new("mock0");
        let report = dispatch(&stream, &mut sink).await.unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.sent, 0);
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_failure_sends_stop() {
        let stream = tokens(&["move.forward", "flash", "turn.left"]);
        let mut sink = RecordingSink::new("mock0").rejecting(InstructionToken::Flash);
        let err = dispatch(&stream, &mut sink).await.unwrap_err();
        assert!(matches!(err, DispatchError::Rejected { .. }));
        assert_eq!(sink.wire(), vec!["move.forward", "move.stop"]);
    }

    #[tokio::test]
    async fn test_compiled_utterance_dispatch() {
        let compiled = command_parser::compile("go left for 0.02 seconds then siren").unwrap();
        let stream = tokens(&compiled.iter().map(String::as_str).collect::<Vec<_>>());
        let mut sink = RecordingSink::new("mock0");
        let report = dispatch(&stream, &mut sink).await.unwrap();
        assert_eq!(report.waited, Duration::from_millis(20));
        assert_eq!(
            sink.wire(),
            vec!["move.left", "move.duration:20", "move.stop", "siren"]
        );
    }

    #[test]
    fn test_parse_tokens_rejects_garbage() {
        assert!(parse_tokens("move.forward\n# comment\n\nwait:10").is_ok());
        assert!(matches!(
            parse_tokens("move.sideways"),
            Err(DispatchError::InvalidToken(_))
        ));
    }
}
