//! Game state and core mechanics types
//!
//! Plain data owned by the engine. Nothing here knows about rendering.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboMultiplier;
use super::stats::StatsSnapshot;
use crate::consts::*;
use crate::words::WordRequest;

/// Current phase of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, no game started
    Idle,
    /// Waiting for the initial word pool
    Initializing,
    /// Active gameplay
    Playing,
    /// Host paused the game
    Paused,
    /// Level timer ran out, stats on screen
    LevelTransition,
    /// An asteroid reached the bottom
    GameOver,
}

/// A falling word target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    /// Full word assigned at spawn
    pub original_word: String,
    /// Suffix of `original_word` still to be typed
    pub remaining: String,
    pub pos: Vec2,
    /// Wrong keys pressed while this asteroid was the locked target
    #[serde(default)]
    pub mistakes: u32,
}

impl Asteroid {
    pub fn new(id: u32, word: &str, pos: Vec2) -> Self {
        Self {
            id,
            original_word: word.to_string(),
            remaining: word.to_string(),
            pos,
            mistakes: 0,
        }
    }

    /// True once at least one character has been typed
    pub fn is_partially_typed(&self) -> bool {
        self.remaining.len() < self.original_word.len()
    }

    /// Next character the player has to type
    pub fn next_char(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Whether `key` is the next character to type
    pub fn accepts(&self, key: char) -> bool {
        self.next_char() == Some(key)
    }

    /// Strip the leading character. Returns true when the word is finished.
    pub fn strip_first(&mut self) -> bool {
        if let Some(c) = self.next_char() {
            self.remaining.drain(..c.len_utf8());
        }
        debug_assert!(self.original_word.ends_with(&self.remaining));
        self.remaining.is_empty()
    }
}

/// Difficulty for the current level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    pub level: u32,
    /// Pixels per frame
    pub fall_speed: f32,
    pub word_length: usize,
    pub spawn_interval_ms: u32,
}

impl LevelState {
    pub fn new(word_length: usize) -> Self {
        Self {
            level: 1,
            fall_speed: fall_speed_for_level(1),
            word_length,
            spawn_interval_ms: spawn_interval_for_level(1),
        }
    }

    /// Move to the next level and recompute derived values
    pub fn advance(&mut self, max_word_length: usize) -> u32 {
        self.level += 1;
        self.fall_speed = fall_speed_for_level(self.level);
        self.spawn_interval_ms = spawn_interval_for_level(self.level);
        // Longer words every third level
        if self.level % 3 == 0 && self.word_length < max_word_length {
            self.word_length += 1;
        }
        self.level
    }
}

/// Fall speed grows 20% of the base per level
pub fn fall_speed_for_level(level: u32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * 0.2
}

/// Spawn cadence tightens by 100ms per level down to 800ms
pub fn spawn_interval_for_level(level: u32) -> u32 {
    BASE_SPAWN_INTERVAL_MS
        .saturating_sub(level.saturating_mul(SPAWN_INTERVAL_STEP_MS))
        .max(MIN_SPAWN_INTERVAL_MS)
}

/// Score ledger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    pub combo: ComboMultiplier,
}

impl ScoreState {
    /// Credit a finished word at the current multiplier. Returns the delta.
    pub fn award(&mut self, word_len: usize) -> u64 {
        let delta = word_len as u64 * self.combo.multiplier() as u64;
        self.score += delta;
        delta
    }
}

/// Discrete outputs for the render/audio adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AsteroidSpawned { id: u32, word: String, x: f32 },
    AsteroidAdvanced { id: u32, y: f32 },
    ShotFired { from: Vec2, to: Vec2 },
    AsteroidDestroyed { id: u32, score_delta: u64, multiplier: u32, pos: Vec2 },
    MultiplierChanged { multiplier: u32, progress: f32 },
    LevelAdvanced { level: u32 },
    /// The pool ran dry; the host should fetch and call `receive_words`
    WordsRequested(WordRequest),
    GameOver { score: u64, stats: StatsSnapshot },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_keeps_suffix() {
        let mut asteroid = Asteroid::new(1, "type", Vec2::ZERO);
        assert!(!asteroid.is_partially_typed());
        assert!(!asteroid.strip_first());
        assert_eq!(asteroid.remaining, "ype");
        assert!(asteroid.is_partially_typed());
        assert!(asteroid.original_word.ends_with(&asteroid.remaining));
    }

    #[test]
    fn test_strip_last_char_finishes() {
        let mut asteroid = Asteroid::new(1, "a", Vec2::ZERO);
        assert!(asteroid.accepts('a'));
        assert!(asteroid.strip_first());
        assert_eq!(asteroid.next_char(), None);
    }

    #[test]
    fn test_level_derivations() {
        let mut level = LevelState::new(5);
        assert_eq!(level.fall_speed, 1.0);
        assert_eq!(level.spawn_interval_ms, 1900);

        assert_eq!(level.advance(10), 2);
        assert!((level.fall_speed - 1.2).abs() < 1e-6);
        assert_eq!(level.word_length, 5);
        assert_eq!(level.spawn_interval_ms, 1800);

        level.advance(10);
        assert_eq!(level.level, 3);
        assert_eq!(level.word_length, 6);
    }

    #[test]
    fn test_word_length_caps() {
        let mut level = LevelState::new(10);
        for _ in 0..9 {
            level.advance(10);
        }
        assert_eq!(level.word_length, 10);
    }

    #[test]
    fn test_spawn_interval_floor() {
        assert_eq!(spawn_interval_for_level(12), 800);
        assert_eq!(spawn_interval_for_level(50), 800);
        assert_eq!(spawn_interval_for_level(u32::MAX), 800);
    }

    #[test]
    fn test_award_uses_multiplier() {
        let mut score = ScoreState::default();
        for _ in 0..30 {
            score.combo.record_correct();
        }
        assert_eq!(score.award(4), 8);
        assert_eq!(score.score, 8);
    }
}
