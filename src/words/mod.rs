//! Word supply
//!
//! The engine draws words from a [`WordPool`] built for the active
//! [`WordRequest`]. Pools are filled by a [`WordSupply`] (a local list, or the
//! Datamuse API on the web) and backed by built-in fallback lists so a game can
//! always spawn something.

pub mod datamuse;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_WORD_LENGTH;

/// Where words come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordMode {
    /// Any word of the right length
    Free,
    /// Every word must contain this letter
    Letter(char),
}

impl WordMode {
    /// Letter mode for an ASCII letter (case-insensitive)
    pub fn letter(c: char) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| WordMode::Letter(c.to_ascii_lowercase()))
    }

    pub fn required_letter(&self) -> Option<char> {
        match self {
            WordMode::Free => None,
            WordMode::Letter(c) => Some(*c),
        }
    }
}

/// A pool constraint: mode plus exact word length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRequest {
    pub mode: WordMode,
    pub length: usize,
}

impl WordRequest {
    pub fn new(mode: WordMode, length: usize) -> Self {
        Self { mode, length }
    }

    /// Whether `word` can live in a pool built for this request
    pub fn accepts(&self, word: &str) -> bool {
        word.len() == self.length
            && word.chars().all(|c| c.is_ascii_lowercase())
            && self.mode.required_letter().is_none_or(|l| word.contains(l))
    }
}

/// Failures while fetching words. Never fatal to a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSupplyError {
    /// Request could not be sent or completed
    Network(String),
    /// Server answered with a non-success status
    Status(u16),
    /// Response body was not the expected JSON
    Malformed(String),
    /// The request itself is unusable (e.g. a non-letter constraint)
    InvalidRequest(String),
}

impl fmt::Display for WordSupplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "word request failed: {msg}"),
            Self::Status(code) => write!(f, "word service returned status {code}"),
            Self::Malformed(msg) => write!(f, "malformed word list: {msg}"),
            Self::InvalidRequest(msg) => write!(f, "invalid word request: {msg}"),
        }
    }
}

impl std::error::Error for WordSupplyError {}

/// A synchronous source of candidate words
pub trait WordSupply {
    /// Words matching `request`. An empty list is a valid answer.
    fn fetch(&mut self, request: &WordRequest) -> Result<Vec<String>, WordSupplyError>;
}

/// In-memory word list, filtered per request
#[derive(Debug, Clone, Default)]
pub struct StaticWordSupply {
    words: Vec<String>,
}

impl StaticWordSupply {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Supply backed by the built-in fallback lists
    pub fn builtin() -> Self {
        Self::new(FALLBACK_WORDS.iter().flat_map(|list| list.iter().copied()))
    }
}

impl WordSupply for StaticWordSupply {
    fn fetch(&mut self, request: &WordRequest) -> Result<Vec<String>, WordSupplyError> {
        Ok(self
            .words
            .iter()
            .map(|w| w.to_ascii_lowercase())
            .filter(|w| request.accepts(w))
            .collect())
    }
}

/// Deduplicated candidate words for one request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Add words that satisfy `request` and are not already present.
    /// Returns how many were added.
    pub fn merge<I, S>(&mut self, words: I, request: &WordRequest) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.words.len();
        for word in words {
            let word = word.as_ref().trim().to_ascii_lowercase();
            if request.accepts(&word) && !self.words.contains(&word) {
                self.words.push(word);
            }
        }
        self.words.len() - before
    }

    /// Drop words that no longer fit `request`
    pub fn retain_matching(&mut self, request: &WordRequest) {
        self.words.retain(|w| request.accepts(w));
    }
}

/// Built-in words by length (index 0 holds length 1)
pub const FALLBACK_WORDS: [&[&str]; MAX_WORD_LENGTH] = [
    &["a", "i", "o"],
    &["go", "up", "at", "on", "in", "it", "we", "be", "ox", "my", "no", "so"],
    &["sun", "ray", "sky", "fly", "zap", "ion", "jet", "map", "fog", "box", "orb", "hex"],
    &["star", "moon", "nova", "dust", "mars", "rock", "beam", "void", "zoom", "glow", "warp", "hull"],
    &["comet", "orbit", "laser", "probe", "solar", "earth", "venus", "pluto", "space", "quark", "alien", "flare"],
    &["meteor", "planet", "galaxy", "rocket", "saturn", "cosmos", "photon", "plasma", "launch", "pulsar", "shield", "vector"],
    &["jupiter", "mercury", "gravity", "eclipse", "stellar", "voyager", "capsule", "missile", "neutron", "horizon", "quantum"],
    &["asteroid", "universe", "starship", "magnetic", "spectrum", "twilight", "darkness", "infinity", "explorer"],
    &["satellite", "telescope", "astronaut", "celestial", "supernova", "starlight", "spaceship", "andromeda", "moonlight", "cosmonaut"],
    &["atmosphere", "spacecraft", "stargazing", "trajectory", "hyperspace", "wavelength", "propulsion"],
];

/// Fallback words for a request. Never empty.
///
/// Lengths outside 1..=10 are clamped. In letter mode the list is narrowed to
/// words containing the letter when any exist.
pub fn fallback_words(request: &WordRequest) -> Vec<&'static str> {
    let length = request.length.clamp(1, MAX_WORD_LENGTH);
    let list = FALLBACK_WORDS[length - 1];
    if let Some(letter) = request.mode.required_letter() {
        let with_letter: Vec<&'static str> =
            list.iter().copied().filter(|w| w.contains(letter)).collect();
        if !with_letter.is_empty() {
            return with_letter;
        }
    }
    list.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_lists_match_their_length() {
        for (i, list) in FALLBACK_WORDS.iter().enumerate() {
            assert!(!list.is_empty());
            for word in *list {
                assert_eq!(word.len(), i + 1, "{word} filed under length {}", i + 1);
                assert!(word.chars().all(|c| c.is_ascii_lowercase()));
            }
        }
    }

    #[test]
    fn test_fallback_prefers_letter() {
        let request = WordRequest::new(WordMode::Letter('q'), 5);
        assert_eq!(fallback_words(&request), vec!["quark"]);

        // No 3-letter fallback contains 'q'; relax to length only
        let request = WordRequest::new(WordMode::Letter('q'), 3);
        assert_eq!(fallback_words(&request).len(), FALLBACK_WORDS[2].len());
    }

    #[test]
    fn test_fallback_clamps_length() {
        assert!(!fallback_words(&WordRequest::new(WordMode::Free, 0)).is_empty());
        assert!(fallback_words(&WordRequest::new(WordMode::Free, 42))
            .iter()
            .all(|w| w.len() == 10));
    }

    #[test]
    fn test_request_accepts() {
        let request = WordRequest::new(WordMode::Letter('e'), 5);
        assert!(request.accepts("comet"));
        assert!(!request.accepts("orbit"));
        assert!(!request.accepts("meteor"));
        assert!(!request.accepts("Comet"));
        assert!(!request.accepts("-ette"));
    }

    #[test]
    fn test_pool_merge_dedupes_and_filters() {
        let request = WordRequest::new(WordMode::Free, 4);
        let mut pool = WordPool::new();
        assert_eq!(pool.merge(["star", "STAR", "moon", "comet", "x-ry"], &request), 2);
        assert_eq!(pool.merge(["moon", "nova"], &request), 1);
        assert_eq!(pool.words(), ["star", "moon", "nova"]);

        pool.retain_matching(&WordRequest::new(WordMode::Letter('o'), 4));
        assert_eq!(pool.words(), ["moon", "nova"]);
    }

    #[test]
    fn test_static_supply_filters_request() {
        let mut supply = StaticWordSupply::new(["comet", "Orbit", "meteor"]);
        let words = supply
            .fetch(&WordRequest::new(WordMode::Free, 5))
            .unwrap();
        assert_eq!(words, vec!["comet", "orbit"]);
    }

    #[test]
    fn test_letter_mode_normalises() {
        assert_eq!(WordMode::letter('E'), Some(WordMode::Letter('e')));
        assert_eq!(WordMode::letter('3'), None);
    }
}
