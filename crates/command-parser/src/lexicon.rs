//! Urdu → canonical English lexicon

use crate::error::LexiconError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One source pattern and the canonical token it is rewritten to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Source-language pattern (romanized or Urdu script, may be multi-word)
    pub source: String,
    /// Canonical English token(s)
    pub canonical: String,
}

impl LexiconEntry {
    pub fn new(source: &str, canonical: &str) -> Self {
        Self {
            source: collapse(source),
            canonical: collapse(canonical),
        }
    }
}

/// Built-in entries. Canonical tokens never contain a source pattern, which
/// keeps normalization idempotent.
const BUILTIN: &[(&str, &str)] = &[
    // directions
    ("aage", "forward"),
    ("aagay", "forward"),
    ("agay", "forward"),
    ("seedha", "forward"),
    ("sidha", "forward"),
    ("آگے", "forward"),
    ("سیدھا", "forward"),
    ("peeche", "backward"),
    ("peechay", "backward"),
    ("pichay", "backward"),
    ("پیچھے", "backward"),
    ("baen", "left"),
    ("bayen", "left"),
    ("baayen", "left"),
    ("بائیں", "left"),
    ("daen", "right"),
    ("dayen", "right"),
    ("daayen", "right"),
    ("دائیں", "right"),
    // verbs
    ("chalo", "move"),
    ("chalen", "move"),
    ("chalein", "move"),
    ("چلو", "move"),
    ("jao", "go"),
    ("جاؤ", "go"),
    ("muro", "turn"),
    ("mudo", "turn"),
    ("mur jao", "turn"),
    ("مڑو", "turn"),
    ("ghumao", "rotate"),
    ("ghoomo", "rotate"),
    ("ghumo", "rotate"),
    ("ghoom jao", "rotate"),
    ("گھماؤ", "rotate"),
    ("گھومو", "rotate"),
    ("ruko", "stop"),
    ("roko", "stop"),
    ("ruk jao", "stop"),
    ("band karo", "stop"),
    ("thehro", "stop"),
    ("رکو", "stop"),
    ("روکو", "stop"),
    ("ٹھہرو", "stop"),
    ("hangami rukawat", "emergency stop"),
    ("hangami", "emergency"),
    ("ہنگامی", "emergency"),
    // cues
    ("raftaar", "speed"),
    ("raftar", "speed"),
    ("رفتار", "speed"),
    ("tasveer", "photo"),
    ("tasweer", "photo"),
    ("تصویر", "photo"),
    ("qareeb karo", "zoom"),
    ("roshni", "lights"),
    ("batti", "lights"),
    ("battiyan", "lights"),
    ("روشنی", "lights"),
    ("بتی", "lights"),
    ("chirkao", "spray"),
    ("چھڑکاؤ", "spray"),
    ("jhatka", "taser"),
    ("intezar", "wait"),
    ("intezaar", "wait"),
    ("انتظار", "wait"),
    ("thoda", "little"),
    ("thora", "little"),
    ("تھوڑا", "little"),
    ("tez", "sharp"),
    ("تیز", "sharp"),
    ("ke liye", "for"),
    ("کے لیے", "for"),
    // connectors
    ("phir", "then"),
    ("پھر", "then"),
    ("aur", "and"),
    ("اور", "and"),
    ("uske baad", "then"),
    ("us ke baad", "then"),
    ("اس کے بعد", "then"),
    // repeat
    ("dobara", "again"),
    ("phir se", "again"),
    ("دوبارہ", "again"),
    ("پھر سے", "again"),
];

/// Immutable, validated set of lexicon entries
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    /// The built-in English/Urdu lexicon
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(source, canonical)| LexiconEntry::new(source, canonical))
                .collect(),
        }
    }

    /// Build a lexicon from arbitrary entries, rejecting sets that would make
    /// normalization non-idempotent.
    pub fn from_entries(entries: Vec<LexiconEntry>) -> Result<Self, LexiconError> {
        let entries: Vec<LexiconEntry> = entries
            .into_iter()
            .map(|e| LexiconEntry::new(&e.source, &e.canonical))
            .collect();
        validate(&entries)?;
        Ok(Self { entries })
    }

    /// Built-in lexicon extended with operator-supplied entries
    pub fn with_extra(extra: Vec<LexiconEntry>) -> Result<Self, LexiconError> {
        let mut entries = Self::builtin().entries;
        for entry in extra {
            let entry = LexiconEntry::new(&entry.source, &entry.canonical);
            match entries.iter().find(|e| e.source == entry.source) {
                Some(existing) if existing.canonical == entry.canonical => continue,
                Some(_) => return Err(LexiconError::Duplicate(entry.source)),
                None => entries.push(entry),
            }
        }
        Self::from_entries(entries)
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical token for an exact (lower-cased, whitespace-collapsed) source
    pub fn lookup(&self, source: &str) -> Option<&str> {
        let key = collapse(source);
        self.entries
            .iter()
            .find(|e| e.source == key)
            .map(|e| e.canonical.as_str())
    }

    /// Entries ordered longest source first; ties keep table order
    pub(crate) fn by_length(&self) -> Vec<&LexiconEntry> {
        let mut sorted: Vec<&LexiconEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.source.chars().count().cmp(&a.source.chars().count()));
        sorted
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate(entries: &[LexiconEntry]) -> Result<(), LexiconError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for entry in entries {
        if entry.source.is_empty() || entry.canonical.is_empty() {
            return Err(LexiconError::Empty);
        }
        if let Some(prev) = seen.insert(entry.source.as_str(), entry.canonical.as_str()) {
            if prev != entry.canonical {
                return Err(LexiconError::Duplicate(entry.source.clone()));
            }
        }
    }
    for entry in entries {
        for other in entries {
            if contains_phrase(&entry.canonical, &other.source) {
                return Err(LexiconError::Overlap {
                    canonical: entry.canonical.clone(),
                    pattern: other.source.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Whole-word containment over whitespace-separated text
pub(crate) fn contains_phrase(haystack: &str, needle: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {needle} "))
}

pub(crate) fn collapse(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_disjoint() {
        let lexicon = Lexicon::builtin();
        assert!(Lexicon::from_entries(lexicon.entries().to_vec()).is_ok());
        assert!(lexicon.len() > 50);
    }

    #[test]
    fn test_lookup_is_case_and_space_insensitive() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.lookup("AAGE"), Some("forward"));
        assert_eq!(lexicon.lookup("ruk   jao"), Some("stop"));
        assert_eq!(lexicon.lookup("دائیں"), Some("right"));
        assert_eq!(lexicon.lookup("forward"), None);
    }

    #[test]
    fn test_longest_first_ordering() {
        let lexicon = Lexicon::builtin();
        let sorted = lexicon.by_length();
        let phir_se = sorted.iter().position(|e| e.source == "phir se");
        let phir = sorted.iter().position(|e| e.source == "phir");
        assert!(phir_se < phir);
    }

    #[test]
    fn test_rejects_overlapping_entry() {
        let err = Lexicon::with_extra(vec![LexiconEntry::new("chal", "move aage")]).unwrap_err();
        assert_eq!(
            err,
            LexiconError::Overlap {
                canonical: "move aage".to_string(),
                pattern: "aage".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_conflicting_duplicate() {
        let err = Lexicon::with_extra(vec![LexiconEntry::new("aage", "backward")]).unwrap_err();
        assert_eq!(err, LexiconError::Duplicate("aage".to_string()));
    }

    #[test]
    fn test_extra_entries_merge() {
        let lexicon = Lexicon::with_extra(vec![
            LexiconEntry::new("Gaari", "robot"),
            LexiconEntry::new("aage", "forward"),
        ])
        .unwrap();
        assert_eq!(lexicon.len(), Lexicon::builtin().len() + 1);
        assert_eq!(lexicon.lookup("gaari"), Some("robot"));
    }

    #[test]
    fn test_rejects_empty() {
        let err = Lexicon::from_entries(vec![LexiconEntry::new("  ", "x")]).unwrap_err();
        assert_eq!(err, LexiconError::Empty);
    }
}
