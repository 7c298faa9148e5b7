//! Parsing of the text read from one house.
//!
//! A house usually holds a sign number and zero or more planet abbreviations,
//! written in Devanagari, in transliterated Latin, or in English. The parser
//! normalises Devanagari digits, picks the first standalone number in 1..=12
//! as the sign, and matches planet keys by substring.
//!
//! The two-letter keys (`sa`, `ra`, `ma`, ...) and the single-glyph `स`/`श`
//! keys match inside longer words too, so stray OCR noise can produce false
//! planet hits. The key set is kept as is because charts in the wild use all of
//! these spellings.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{Planet, Sign};

// Only letters, numbers and `_` join a number to its neighbours. Vowel signs
// and nasal marks do not, so `रा12` still yields 12.
static SIGN_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\p{L}\p{N}_])(1[0-2]|[1-9])(?:$|[^\p{L}\p{N}_])")
        .expect("sign token regex")
});

/// Planet keys, matched against the lowercased text.
pub const PLANET_KEYS: &[(&str, Planet)] = &[
    // English
    ("su", Planet::Sun),
    ("mo", Planet::Moon),
    ("ma", Planet::Mars),
    ("me", Planet::Mercury),
    ("ju", Planet::Jupiter),
    ("ve", Planet::Venus),
    ("sa", Planet::Saturn),
    ("ra", Planet::Rahu),
    ("ke", Planet::Ketu),
    // Devanagari and transliterated
    ("सू", Planet::Sun),
    ("sur", Planet::Sun),
    ("चं", Planet::Moon),
    ("cha", Planet::Moon),
    ("मं", Planet::Mars),
    ("mam", Planet::Mars),
    ("बु", Planet::Mercury),
    ("bu", Planet::Mercury),
    ("बृ", Planet::Jupiter),
    ("गु", Planet::Jupiter),
    ("gu", Planet::Jupiter),
    ("शु", Planet::Venus),
    ("shu", Planet::Venus),
    ("श", Planet::Saturn),
    ("स", Planet::Saturn),
    ("sha", Planet::Saturn),
    ("रा", Planet::Rahu),
    ("के", Planet::Ketu),
];

/// What one OCR pass yielded for one house.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellReading {
    pub sign: Option<Sign>,
    pub planets: BTreeSet<Planet>,
}

/// Trims OCR output. Nothing else is stripped, since Devanagari must survive.
pub fn clean_ocr(text: &str) -> &str {
    text.trim()
}

/// Replaces Devanagari digits (०-९) with ASCII digits.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0966}'..='\u{096F}' => {
                char::from(b'0' + (u32::from(c) - 0x0966) as u8)
            }
            _ => c,
        })
        .collect()
}

/// First standalone number in 1..=12.
pub fn parse_sign(text: &str) -> Option<Sign> {
    let normalized = normalize_digits(text);
    SIGN_TOKEN
        .captures(&normalized)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .and_then(Sign::new)
}

/// Every planet whose key occurs anywhere in the text.
pub fn parse_planets(text: &str) -> BTreeSet<Planet> {
    let lowered = text.to_lowercase();
    PLANET_KEYS
        .iter()
        .filter(|(key, _)| lowered.contains(key))
        .map(|&(_, planet)| planet)
        .collect()
}

/// Parses the cleaned text of one OCR pass.
pub fn parse_cell_text(text: &str) -> CellReading {
    CellReading {
        sign: parse_sign(text),
        planets: parse_planets(text),
    }
}
