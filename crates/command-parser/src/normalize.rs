//! Cross-language normalization of raw utterances

use crate::error::Result;
use crate::lexicon::{collapse, Lexicon};
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Rewrites an utterance into a single-language canonical string
#[derive(Debug, Clone)]
pub struct Normalizer {
    lexicon: Lexicon,
    pattern: Option<Regex>,
    table: HashMap<String, String>,
}

impl Normalizer {
    pub fn new(lexicon: Lexicon) -> Result<Self> {
        // Alternation is leftmost-first, so listing longer sources first makes
        // "phir se" win over "phir" at the same position.
        let alternatives: Vec<String> = lexicon
            .by_length()
            .iter()
            .map(|e| regex::escape(&e.source))
            .collect();
        let pattern = if alternatives.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r"(?i)\b(?:{})\b",
                alternatives.join("|")
            ))?)
        };
        let table = lexicon
            .entries()
            .iter()
            .map(|e| (e.source.clone(), e.canonical.clone()))
            .collect();
        Ok(Self {
            lexicon,
            pattern,
            table,
        })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Lower-case, fold Urdu digits and punctuation, collapse whitespace and
    /// substitute every lexicon match.
    pub fn normalize(&self, utterance: &str) -> String {
        let folded: String = utterance.chars().map(fold_char).collect();
        let text = collapse(&folded);
        let Some(pattern) = &self.pattern else {
            return text;
        };
        let replaced = pattern.replace_all(&text, |caps: &Captures| {
            let matched = collapse(&caps[0]);
            self.table.get(&matched).cloned().unwrap_or(matched)
        });
        collapse(&replaced)
    }
}

fn fold_char(c: char) -> char {
    match c {
        '\u{06F0}'..='\u{06F9}' => digit(c as u32 - 0x06F0),
        '\u{0660}'..='\u{0669}' => digit(c as u32 - 0x0660),
        '،' => ',',
        '؛' => ';',
        '۔' => '.',
        '؟' => '?',
        _ => c,
    }
}

fn digit(offset: u32) -> char {
    char::from_digit(offset, 10).unwrap_or('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(Lexicon::builtin()).unwrap()
    }

    #[test]
    fn test_substitutes_romanized_urdu() {
        let n = normalizer();
        assert_eq!(
            n.normalize("Aage chalo 2 meter phir daen muro"),
            "forward move 2 meter then right turn"
        );
    }

    #[test]
    fn test_substitutes_urdu_script() {
        let n = normalizer();
        assert_eq!(n.normalize("آگے چلو"), "forward move");
        assert_eq!(n.normalize("۳ سیکنڈ کے لیے"), "3 سیکنڈ for");
    }

    #[test]
    fn test_longest_pattern_wins() {
        let n = normalizer();
        assert_eq!(n.normalize("phir se"), "again");
        assert_eq!(n.normalize("ruk jao"), "stop");
        assert_eq!(n.normalize("hangami rukawat"), "emergency stop");
    }

    #[test]
    fn test_word_boundaries_respected() {
        let n = normalizer();
        // "tez" must not fire inside "tezpur", "aur" not inside "aura"
        assert_eq!(n.normalize("tezpur aura"), "tezpur aura");
    }

    #[test]
    fn test_english_passes_through() {
        let n = normalizer();
        assert_eq!(
            n.normalize("  Move  FORWARD 2 meters, then stop "),
            "move forward 2 meters, then stop"
        );
    }

    #[test]
    fn test_idempotent() {
        let n = normalizer();
        let samples = [
            "aage chalo 5 second ke liye aur phir ruk jao",
            "dobara",
            "hangami rukawat!",
            "raftaar 40 fisad",
            "تھوڑا بائیں مڑو، پھر سے",
            "move forward 2 meters then turn right a little",
            "us ke baad tasveer lo",
        ];
        for sample in samples {
            let once = n.normalize(sample);
            assert_eq!(n.normalize(&once), once, "sample: {sample}");
        }
    }

    #[test]
    fn test_folds_urdu_punctuation() {
        let n = normalizer();
        assert_eq!(n.normalize("رکو۔"), "stop.");
        assert_eq!(n.normalize("aage، peeche"), "forward, backward");
    }
}
