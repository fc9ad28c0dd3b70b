//! Command Parser for Operator Utterances
//!
//! This crate compiles freeform English or Urdu instructions for a
//! remote-controlled machine into structured command descriptors, and lowers
//! those into the flat instruction-token stream a dispatcher executes.
//!
//! Pipeline: normalize → segment → classify (per clause, with context
//! memory) → ellipsis fallback → lower.

mod classify;
mod config;
mod context;
mod descriptor;
mod error;
mod lexicon;
mod lower;
mod metrics;
mod normalize;
mod parser;
mod quantity;
mod segment;
mod session;

pub use classify::{Classifier, Rule};
pub use config::{load_config_file, ParserConfig};
pub use context::{ContextMemory, DEFAULT_SPEED_PERCENT};
pub use descriptor::{
    confidence, CameraAction, Command, CommandDescriptor, MoveCommand, MoveDirection, MoveStyle,
    RotateCommand, RotateDirection, SafetyAction, TurnCommand, TurnDirection, TurnStyle,
};
pub use error::{LexiconError, ParserError, Result};
pub use lexicon::{Lexicon, LexiconEntry};
pub use lower::{lower, lower_to_strings, InstructionToken, TokenParseError};
pub use metrics::{MetricsHub, ParserMetrics};
pub use normalize::Normalizer;
pub use parser::{CommandParser, ParseResult};
pub use quantity::{number_word, Quantity, QuantityExtractor, Unit};
pub use segment::{Segmenter, ACTION_VERBS};
pub use session::{Session, SessionRegistry};

/// Initialize the command parser system
pub fn init() -> Result<()> {
    tracing::info!(
        lexicon_entries = Lexicon::builtin().len(),
        "Initializing Command Parser system"
    );
    Ok(())
}

/// Create a new parser with default configuration
pub fn create_parser() -> Result<CommandParser> {
    CommandParser::new(ParserConfig::default())
}

/// Parse one utterance against a fresh context and lower it to wire tokens
pub fn compile(utterance: &str) -> Result<Vec<String>> {
    let parser = create_parser()?;
    let mut context = ContextMemory::default();
    let descriptors = parser.parse(utterance, &mut context);
    Ok(lower_to_strings(&descriptors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_commands() {
        let test_cases = vec![
            ("move forward 2 meters", vec!["move.forward", "move.distance:2m"]),
            ("set speed 45%", vec!["move.speed:45"]),
            ("move left 150 cm", vec!["move.left", "move.distance:1.5m"]),
            ("rotate left 45 degrees", vec!["rotate.ccw.deg:45"]),
            ("turn right", vec!["turn.right"]),
            ("stop", vec!["move.stop"]),
            ("emergency stop", vec!["safety.estop"]),
            ("take a photo", vec!["camera.photo"]),
            ("sound the siren", vec!["siren"]),
            ("hello robot", vec!["unknown"]),
        ];

        for (command, expected) in test_cases {
            assert_eq!(compile(command).unwrap(), expected, "{command}");
        }
    }

    #[test]
    fn test_init() {
        assert!(init().is_ok());
    }
}
