//! Numeral + unit extraction

use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical units a quantity may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Percent,
    #[serde(rename = "s")]
    Seconds,
    #[serde(rename = "min")]
    Minutes,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "deg")]
    Degrees,
}

impl Unit {
    /// Canonicalize free unit text (English or Urdu). Unrecognized text is `None`.
    pub fn from_text(text: &str) -> Option<Unit> {
        let t = text
            .trim()
            .trim_end_matches(['.', '!', '?', ')'])
            .to_lowercase();
        if t.is_empty() {
            return None;
        }
        if t == "%" || t.starts_with("percent") || t == "pct" || t.starts_with("fisad") || t == "فیصد" {
            Some(Unit::Percent)
        } else if t.starts_with("min") || t == "منٹ" {
            Some(Unit::Minutes)
        } else if t.starts_with("sec") || t == "s" || t.starts_with("sakand") || t == "سیکنڈ" {
            Some(Unit::Seconds)
        } else if t.starts_with("deg") || t == "°" || t.starts_with("darj") || t == "ڈگری" {
            Some(Unit::Degrees)
        } else if t == "cm" || t.starts_with("centi") || t.starts_with("سینٹی") {
            Some(Unit::Centimeters)
        } else if t == "m" || t.starts_with("met") || t == "میٹر" {
            Some(Unit::Meters)
        } else {
            None
        }
    }

    pub fn is_duration(self) -> bool {
        matches!(self, Unit::Seconds | Unit::Minutes)
    }

    pub fn is_distance(self) -> bool {
        matches!(self, Unit::Meters | Unit::Centimeters)
    }
}

/// A numeral bound in a clause plus its (optional) canonical unit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quantity {
    pub value: Option<f64>,
    pub unit: Option<Unit>,
}

impl Quantity {
    pub const NONE: Quantity = Quantity {
        value: None,
        unit: None,
    };

    /// Duration in milliseconds when the unit is seconds or minutes
    pub fn as_millis(&self) -> Option<u64> {
        let value = self.value?;
        let secs = match self.unit? {
            Unit::Seconds => value,
            Unit::Minutes => value * 60.0,
            _ => return None,
        };
        Some((secs * 1000.0).round().max(0.0) as u64)
    }

    /// Distance in meters when the unit is meters or centimeters
    pub fn as_meters(&self) -> Option<f64> {
        let value = self.value?;
        match self.unit? {
            Unit::Meters => Some(value),
            Unit::Centimeters => Some(value / 100.0),
            _ => None,
        }
    }

    pub fn as_degrees(&self) -> Option<f64> {
        match self.unit? {
            Unit::Degrees => self.value,
            _ => None,
        }
    }
}

const ENGLISH_ONES: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

const ENGLISH_TENS: &[(&str, u32)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
    ("hundred", 100),
];

const URDU_NUMBERS: &[(&str, u32)] = &[
    ("ek", 1),
    ("ایک", 1),
    ("do", 2),
    ("دو", 2),
    ("teen", 3),
    ("تین", 3),
    ("char", 4),
    ("chaar", 4),
    ("چار", 4),
    ("paanch", 5),
    ("panch", 5),
    ("پانچ", 5),
    ("chhe", 6),
    ("chay", 6),
    ("چھ", 6),
    ("saat", 7),
    ("سات", 7),
    ("aath", 8),
    ("آٹھ", 8),
    ("nau", 9),
    ("نو", 9),
    ("das", 10),
    ("دس", 10),
    ("gyarah", 11),
    ("barah", 12),
    ("pandrah", 15),
    ("bees", 20),
    ("بیس", 20),
    ("pachees", 25),
    ("tees", 30),
    ("تیس", 30),
    ("chalees", 40),
    ("چالیس", 40),
    ("pachas", 50),
    ("پچاس", 50),
    ("saath", 60),
    ("ساٹھ", 60),
    ("nawway", 90),
    ("نوے", 90),
    ("sau", 100),
    ("سو", 100),
];

/// Romanized number words that are also everyday English words; they only
/// count as numerals when a unit follows.
const UNIT_BOUND_WORDS: &[&str] = &["do"];

/// Value of a number word; the two language tables are disjoint and only
/// merged here.
pub fn number_word(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    ENGLISH_ONES
        .iter()
        .chain(ENGLISH_TENS)
        .chain(URDU_NUMBERS)
        .find(|(w, _)| *w == word)
        .map(|(_, n)| *n)
}

/// Two-stage quantity extractor: percent first, then generic numeral + unit
#[derive(Debug, Clone)]
pub struct QuantityExtractor {
    percent: Regex,
    generic: Regex,
}

impl QuantityExtractor {
    pub fn new() -> Result<Self> {
        let numeral = numeral_pattern();
        let percent = Regex::new(&format!(
            r"(?i)(?:(\d+(?:\.\d+)?)|\b({numeral})\b)\s*(?:%|\bpercent\b|\bper cent\b|\bfisad\b|فیصد)"
        ))?;
        let generic = Regex::new(&format!(
            r"(?i)(?:(\d+(?:\.\d+)?)|\b({numeral})\b)(?:\s*([^\s\d,;]+))?"
        ))?;
        Ok(Self { percent, generic })
    }

    pub fn extract(&self, clause: &str) -> Quantity {
        if let Some(caps) = self.percent.captures(clause) {
            if let Some(value) = numeral_value(caps.get(1), caps.get(2)) {
                return Quantity {
                    value: Some(value.clamp(0.0, 100.0)),
                    unit: Some(Unit::Percent),
                };
            }
        }

        // a numeral carrying a unit beats an earlier bare one
        let mut bare = None;
        for caps in self.generic.captures_iter(clause) {
            let Some(value) = numeral_value(caps.get(1), caps.get(2)) else {
                continue;
            };
            let unit = caps.get(3).and_then(|m| Unit::from_text(m.as_str()));
            if unit.is_some() {
                return Quantity {
                    value: Some(value),
                    unit,
                };
            }
            let unit_bound = caps
                .get(2)
                .map(|m| UNIT_BOUND_WORDS.contains(&m.as_str().to_lowercase().as_str()))
                .unwrap_or(false);
            if bare.is_none() && !unit_bound {
                bare = Some(value);
            }
        }

        Quantity {
            value: bare,
            unit: None,
        }
    }
}

fn numeral_pattern() -> String {
    let ones: Vec<&str> = ENGLISH_ONES.iter().map(|(w, _)| *w).collect();
    let tens: Vec<&str> = ENGLISH_TENS.iter().map(|(w, _)| *w).collect();
    let mut urdu: Vec<&str> = URDU_NUMBERS.iter().map(|(w, _)| *w).collect();
    // longer words first so "saath" is not read as "saat"
    urdu.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    format!(
        r"(?:{tens})(?:[\s-]+(?:{ones}))?|{ones}|{urdu}",
        tens = tens.join("|"),
        ones = ones.join("|"),
        urdu = urdu.join("|"),
    )
}

fn numeral_value(digits: Option<regex::Match>, words: Option<regex::Match>) -> Option<f64> {
    if let Some(m) = digits {
        return m.as_str().parse::<f64>().ok();
    }
    let words = words?.as_str();
    let mut total = 0u32;
    for word in words.split(|c: char| c.is_whitespace() || c == '-') {
        if word.is_empty() {
            continue;
        }
        total += number_word(word)?;
    }
    Some(f64::from(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Quantity {
        QuantityExtractor::new().unwrap().extract(text)
    }

    #[test]
    fn test_unit_bearing_numeral_preferred() {
        let q = extract("do a spin left for 3 seconds");
        assert_eq!(q.value, Some(3.0));
        assert_eq!(q.unit, Some(Unit::Seconds));
        assert_eq!(extract("one more go forward 2 m").as_meters(), Some(2.0));
        assert_eq!(extract("zoom 3 then 4").value, Some(3.0));
    }

    #[test]
    fn test_bare_do_is_not_a_numeral() {
        assert_eq!(extract("do a u-turn"), Quantity::NONE);
        assert_eq!(extract("do it").value, None);
        assert_eq!(extract("do meter").as_meters(), Some(2.0));
        assert_eq!(extract("دو").value, Some(2.0));
    }

    #[test]
    fn test_percent_short_circuit() {
        let q = extract("set speed 45%");
        assert_eq!(q.value, Some(45.0));
        assert_eq!(q.unit, Some(Unit::Percent));

        let q = extract("speed 30 percent for 2 meters");
        assert_eq!(q.unit, Some(Unit::Percent));
        assert_eq!(q.value, Some(30.0));
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(extract("speed 250%").value, Some(100.0));
        assert_eq!(extract("raftaar pachas fisad").value, Some(50.0));
    }

    #[test]
    fn test_distance_units() {
        let q = extract("move left 150 cm");
        assert_eq!(q.as_meters(), Some(1.5));
        let q = extract("forward 2 meters");
        assert_eq!(q.unit, Some(Unit::Meters));
        assert_eq!(q.as_meters(), Some(2.0));
        let q = extract("forward 1.5m");
        assert_eq!(q.as_meters(), Some(1.5));
        let q = extract("forward 2 میٹر");
        assert_eq!(q.unit, Some(Unit::Meters));
    }

    #[test]
    fn test_duration_units() {
        assert_eq!(extract("for 2 minutes").as_millis(), Some(120_000));
        assert_eq!(extract("for 3 sec").as_millis(), Some(3_000));
        assert_eq!(extract("for 5s").as_millis(), Some(5_000));
        assert_eq!(extract("teen سیکنڈ for").as_millis(), Some(3_000));
        assert_eq!(extract("do minat").unit, Some(Unit::Minutes));
    }

    #[test]
    fn test_degrees() {
        assert_eq!(extract("rotate 90 degrees").as_degrees(), Some(90.0));
        assert_eq!(extract("rotate 45°").as_degrees(), Some(45.0));
        assert_eq!(extract("rotate ninety deg").as_degrees(), Some(90.0));
    }

    #[test]
    fn test_number_words() {
        assert_eq!(extract("forward two meters").as_meters(), Some(2.0));
        assert_eq!(extract("rotate forty-five degrees").as_degrees(), Some(45.0));
        assert_eq!(extract("rotate twenty five degrees").as_degrees(), Some(25.0));
        assert_eq!(extract("saath second").as_millis(), Some(60_000));
        assert_eq!(extract("saat second").as_millis(), Some(7_000));
    }

    #[test]
    fn test_unknown_unit_keeps_value() {
        let q = extract("zoom 3 times");
        assert_eq!(q.value, Some(3.0));
        assert_eq!(q.unit, None);
        let q = extract("speed 40");
        assert_eq!(q.value, Some(40.0));
        assert_eq!(q.unit, None);
    }

    #[test]
    fn test_no_numeral() {
        assert_eq!(extract("hello robot"), Quantity::NONE);
        // "someone" must not bind "one"
        assert_eq!(extract("someone"), Quantity::NONE);
    }

    #[test]
    fn test_unit_from_text() {
        assert_eq!(Unit::from_text("Seconds"), Some(Unit::Seconds));
        assert_eq!(Unit::from_text("mins"), Some(Unit::Minutes));
        assert_eq!(Unit::from_text("metres"), Some(Unit::Meters));
        assert_eq!(Unit::from_text("centimeters"), Some(Unit::Centimeters));
        assert_eq!(Unit::from_text("mm"), None);
        assert_eq!(Unit::from_text("ms"), None);
    }

    #[test]
    fn test_number_tables_disjoint() {
        for (word, _) in URDU_NUMBERS {
            assert!(ENGLISH_ONES.iter().chain(ENGLISH_TENS).all(|(w, _)| w != word));
        }
    }
}
