//! Typing statistics
//!
//! Counters only; derived figures are computed on demand by `snapshot`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Entries reported in the "most problematic" lists
const TOP_ENTRIES: usize = 3;

/// Attempt/error tally for a single word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordAttempts {
    pub total: u32,
    pub errors: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypingStats {
    total_keys: u32,
    correct_keys: u32,
    words_completed: u32,
    start_ms: f64,
    /// Keyed by the key as pressed (usually a single character)
    character_errors: BTreeMap<String, u32>,
    /// Completions that had at least one error
    word_errors: BTreeMap<String, u32>,
    word_attempts: BTreeMap<String, WordAttempts>,
}

/// Summary shown between levels and on game over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub wpm: u32,
    /// Percentage with one decimal, e.g. "97.5%"
    pub accuracy: String,
    pub words_completed: u32,
    pub total_keys_pressed: u32,
    pub most_problematic_chars: Vec<(String, u32)>,
    pub difficult_words: Vec<(String, u32)>,
}

impl TypingStats {
    pub fn new(start_ms: f64) -> Self {
        Self {
            start_ms,
            ..Self::default()
        }
    }

    pub fn record_keystroke(&mut self, correct: bool) {
        self.total_keys += 1;
        if correct {
            self.correct_keys += 1;
        }
    }

    pub fn record_character_error(&mut self, key: &str) {
        *self.character_errors.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn record_word_completion(&mut self, word: &str, errors: u32) {
        self.words_completed += 1;
        let attempts = self.word_attempts.entry(word.to_string()).or_default();
        attempts.total += 1;
        attempts.errors += errors;
        if errors > 0 {
            *self.word_errors.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    pub fn character_errors(&self, key: &str) -> u32 {
        self.character_errors.get(key).copied().unwrap_or(0)
    }

    pub fn word_attempts(&self, word: &str) -> Option<WordAttempts> {
        self.word_attempts.get(word).copied()
    }

    pub fn total_keys(&self) -> u32 {
        self.total_keys
    }

    pub fn correct_keys(&self) -> u32 {
        self.correct_keys
    }

    pub fn snapshot(&self, now_ms: f64) -> StatsSnapshot {
        let minutes = (now_ms - self.start_ms) / 60_000.0;
        let wpm = if minutes > 0.0 {
            (self.correct_keys as f64 / 5.0 / minutes).round() as u32
        } else {
            0
        };

        let accuracy = if self.total_keys > 0 {
            format!(
                "{:.1}%",
                self.correct_keys as f64 / self.total_keys as f64 * 100.0
            )
        } else {
            "100%".to_string()
        };

        StatsSnapshot {
            wpm,
            accuracy,
            words_completed: self.words_completed,
            total_keys_pressed: self.total_keys,
            most_problematic_chars: top_entries(&self.character_errors),
            difficult_words: top_entries(&self.word_errors),
        }
    }
}

impl StatsSnapshot {
    /// "b (4), d (3)" style listing for the stats overlay
    pub fn problem_chars_text(&self) -> String {
        entries_text(&self.most_problematic_chars)
    }

    pub fn difficult_words_text(&self) -> String {
        entries_text(&self.difficult_words)
    }
}

fn entries_text(entries: &[(String, u32)]) -> String {
    if entries.is_empty() {
        return "none".to_string();
    }
    entries
        .iter()
        .map(|(key, count)| format!("{key} ({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Highest counts first; map order breaks ties
fn top_entries<K: Clone + Ord>(map: &BTreeMap<K, u32>) -> Vec<(K, u32)> {
    let mut entries: Vec<(K, u32)> = map.iter().map(|(k, &v)| (k.clone(), v)).collect();
    // Stable sort keeps the key order for equal counts
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(TOP_ENTRIES);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let stats = TypingStats::new(1000.0);
        let snap = stats.snapshot(1000.0);
        assert_eq!(snap.accuracy, "100%");
        assert_eq!(snap.wpm, 0);
        assert_eq!(snap.words_completed, 0);
        assert!(snap.most_problematic_chars.is_empty());
    }

    #[test]
    fn test_wpm_and_accuracy() {
        let mut stats = TypingStats::new(0.0);
        for _ in 0..50 {
            stats.record_keystroke(true);
        }
        for _ in 0..10 {
            stats.record_keystroke(false);
        }
        // 50 correct chars in one minute = 10 words per minute
        let snap = stats.snapshot(60_000.0);
        assert_eq!(snap.wpm, 10);
        assert_eq!(snap.accuracy, "83.3%");
        assert_eq!(snap.total_keys_pressed, 60);
    }

    #[test]
    fn test_top_three_characters() {
        let mut stats = TypingStats::new(0.0);
        for (key, n) in [("a", 1), ("b", 4), ("c", 2), ("d", 3)] {
            for _ in 0..n {
                stats.record_character_error(key);
            }
        }
        let snap = stats.snapshot(0.0);
        let top: Vec<(&str, u32)> = snap
            .most_problematic_chars
            .iter()
            .map(|(k, n)| (k.as_str(), *n))
            .collect();
        assert_eq!(top, vec![("b", 4), ("d", 3), ("c", 2)]);
        assert_eq!(stats.character_errors("a"), 1);
        assert_eq!(snap.problem_chars_text(), "b (4), d (3), c (2)");
        assert_eq!(snap.difficult_words_text(), "none");
    }

    #[test]
    fn test_word_completion_tally() {
        let mut stats = TypingStats::new(0.0);
        stats.record_word_completion("comet", 0);
        stats.record_word_completion("comet", 2);
        stats.record_word_completion("orbit", 0);

        assert_eq!(
            stats.word_attempts("comet"),
            Some(WordAttempts { total: 2, errors: 2 })
        );
        let snap = stats.snapshot(0.0);
        assert_eq!(snap.words_completed, 3);
        assert_eq!(snap.difficult_words, vec![("comet".to_string(), 1)]);
        assert_eq!(snap.difficult_words_text(), "comet (1)");
    }
}
