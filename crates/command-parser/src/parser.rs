//! Utterance-level pipeline: normalize, segment, classify, resolve ellipsis

use crate::classify::Classifier;
use crate::context::ContextMemory;
use crate::descriptor::{confidence, Command, CommandDescriptor, MoveCommand, MoveStyle};
use crate::error::Result;
use crate::lexicon::{contains_phrase, Lexicon};
use crate::lower::{lower, InstructionToken};
use crate::normalize::Normalizer;
use crate::segment::Segmenter;
use crate::ParserConfig;
use serde::Serialize;

const REPEAT_WORDS: &[&str] = &["again", "repeat"];
const REPEAT_PHRASES: &[&str] = &["once more", "one more time"];

/// Result of parsing one utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    /// Original text
    pub utterance: String,
    /// Canonical single-language form
    pub normalized: String,
    /// Clauses in utterance order
    pub clauses: Vec<String>,
    /// Classified commands; never empty
    pub descriptors: Vec<CommandDescriptor>,
}

impl ParseResult {
    /// True when nothing actionable was recognized
    pub fn is_unknown(&self) -> bool {
        self.descriptors.iter().all(CommandDescriptor::is_unknown)
    }

    pub fn tokens(&self) -> Vec<InstructionToken> {
        lower(&self.descriptors)
    }
}

/// Bilingual utterance-to-directive compiler
#[derive(Debug, Clone)]
pub struct CommandParser {
    config: ParserConfig,
    normalizer: Normalizer,
    segmenter: Segmenter,
    classifier: Classifier,
}

impl CommandParser {
    pub fn new(config: ParserConfig) -> Result<Self> {
        let lexicon = Lexicon::with_extra(config.lexicon.clone())?;
        Ok(Self {
            normalizer: Normalizer::new(lexicon)?,
            segmenter: Segmenter::new()?,
            classifier: Classifier::new(config.zoom_step)?,
            config,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Parse an utterance into descriptors, updating `context`
    pub fn parse(&self, utterance: &str, context: &mut ContextMemory) -> Vec<CommandDescriptor> {
        self.analyze(utterance, context).descriptors
    }

    /// Parse and keep the intermediate stages
    pub fn analyze(&self, utterance: &str, context: &mut ContextMemory) -> ParseResult {
        let normalized = self.normalizer.normalize(utterance);
        let clauses = self.segmenter.segment(&normalized);

        let mut descriptors: Vec<CommandDescriptor> = clauses
            .iter()
            .flat_map(|clause| self.classifier.classify(clause, context))
            .collect();

        if descriptors.iter().all(CommandDescriptor::is_unknown) {
            descriptors = match self.ellipsis(&normalized, context) {
                Some(repeat) => vec![repeat],
                None => vec![CommandDescriptor::unknown(utterance.trim())],
            };
        }

        tracing::debug!(
            utterance,
            normalized = %normalized,
            clauses = clauses.len(),
            descriptors = descriptors.len(),
            "utterance parsed"
        );

        ParseResult {
            utterance: utterance.to_string(),
            normalized,
            clauses,
            descriptors,
        }
    }

    /// Repeat the last remembered direction when the utterance only asks for
    /// a repetition.
    fn ellipsis(&self, normalized: &str, context: &ContextMemory) -> Option<CommandDescriptor> {
        let words: Vec<&str> = normalized
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .collect();
        let repeated = words.iter().any(|w| REPEAT_WORDS.contains(w))
            || REPEAT_PHRASES
                .iter()
                .any(|p| contains_phrase(&words.join(" "), p));
        if !repeated {
            return None;
        }
        let direction = context.last_direction?;
        let style = if direction.is_lateral() {
            MoveStyle::from(context.last_turn_style)
        } else {
            MoveStyle::Normal
        };
        tracing::debug!(direction = direction.as_str(), "ellipsis resolved from context");
        Some(CommandDescriptor::new(
            Command::Move(MoveCommand::toward(direction, style)),
            confidence::ELLIPSIS,
            normalized,
        ))
    }
}
