//! Clause segmentation of normalized utterances

use crate::error::Result;
use regex::Regex;

/// Verbs that open a new instruction even without a connector
pub const ACTION_VERBS: &[&str] = &[
    "move", "go", "turn", "rotate", "stop", "speed", "camera", "zoom", "lights", "siren",
    "spray", "taser",
];

/// `camera zoom` names one action
const CAMERA_QUALIFIED: (&str, &str) = ("camera", "zoom");

/// Splits a normalized utterance into independently classifiable clauses
#[derive(Debug, Clone)]
pub struct Segmenter {
    connectors: Regex,
    verbs: Regex,
}

impl Segmenter {
    pub fn new() -> Result<Self> {
        let connectors =
            Regex::new(r"(?i)\s*(?:,|;|\.\s+|\.$|\bafter that\b|\bthen\b|\band\b)\s*")?;
        let verbs = Regex::new(&format!(r"(?i)\b(?:{})\b", ACTION_VERBS.join("|")))?;
        Ok(Self { connectors, verbs })
    }

    /// Connector pass followed by the embedded-verb pass. Order is preserved
    /// and empty segments are dropped.
    pub fn segment(&self, normalized: &str) -> Vec<String> {
        self.connectors
            .split(normalized)
            .flat_map(|segment| self.split_on_verbs(segment))
            .collect()
    }

    /// Split before every action verb that follows an earlier action verb in
    /// the same segment; the verb starts the new clause.
    fn split_on_verbs(&self, segment: &str) -> Vec<String> {
        let mut clauses = Vec::new();
        let mut start = 0;
        let mut prev: Option<regex::Match<'_>> = None;
        for m in self.verbs.find_iter(segment) {
            if let Some(p) = prev {
                let qualified = p.as_str().eq_ignore_ascii_case(CAMERA_QUALIFIED.0)
                    && m.as_str().eq_ignore_ascii_case(CAMERA_QUALIFIED.1)
                    && segment[p.end()..m.start()].trim().is_empty();
                if !qualified && m.start() > start {
                    push_trimmed(&mut clauses, &segment[start..m.start()]);
                    start = m.start();
                }
            }
            prev = Some(m);
        }
        push_trimmed(&mut clauses, &segment[start..]);
        clauses
    }
}

fn push_trimmed(out: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}
