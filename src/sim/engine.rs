//! Mechanics engine
//!
//! Orchestrates the word pool, asteroid field, combo multiplier, score ledger
//! and typing stats. The engine never reads a clock or starts a timer: the host
//! drives it with `tick`, `spawn_tick` and `advance_level`, feeds it keys, and
//! reads back results and [`GameEvent`]s.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::combo::MultiplierInfo;
use super::config::EngineConfig;
use super::field::{AsteroidField, choose_word_for_spawn};
use super::state::{Asteroid, GameEvent, GamePhase, LevelState, RngState, ScoreState};
use super::stats::{StatsSnapshot, TypingStats};
use crate::words::{
    WordMode, WordPool, WordRequest, WordSupply, WordSupplyError, fallback_words,
};

/// Keys that pause instead of typing
pub const CANCEL_KEYS: [&str; 2] = ["escape", "esc"];

/// What a single key press did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeystrokeResult {
    pub is_correct: bool,
    pub destroyed_asteroid: bool,
    /// Where the shot went (last position when destroyed)
    pub target: Option<Vec2>,
    pub score_delta: u64,
    /// Combo update, `None` when the key was ignored
    pub combo: Option<MultiplierInfo>,
}

impl KeystrokeResult {
    fn ignored() -> Self {
        Self {
            is_correct: false,
            destroyed_asteroid: false,
            target: None,
            score_delta: 0,
            combo: None,
        }
    }

    fn miss(combo: MultiplierInfo) -> Self {
        Self {
            combo: Some(combo),
            ..Self::ignored()
        }
    }

    pub fn was_ignored(&self) -> bool {
        self.combo.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub alive: bool,
}

pub struct MechanicsEngine {
    config: EngineConfig,
    rng_state: RngState,
    rng: Pcg32,
    phase: GamePhase,
    request: WordRequest,
    pool: WordPool,
    refill_pending: bool,
    field: AsteroidField,
    score: ScoreState,
    level: LevelState,
    stats: TypingStats,
    events: Vec<GameEvent>,
}

impl MechanicsEngine {
    /// Create an idle engine. `config` is copied and never modified.
    pub fn new(config: &EngineConfig, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        let length = crate::consts::DEFAULT_WORD_LENGTH.min(config.max_word_length);
        Self {
            config: config.clone(),
            rng: rng_state.to_rng(),
            rng_state,
            phase: GamePhase::Idle,
            request: WordRequest::new(WordMode::Free, length),
            pool: WordPool::new(),
            refill_pending: false,
            field: AsteroidField::new(config.max_asteroids),
            score: ScoreState::default(),
            level: LevelState::new(length),
            stats: TypingStats::new(0.0),
            events: Vec::new(),
        }
    }

    // === Lifecycle ===

    /// Reset everything for a new game and return the word request the host
    /// must fulfil with [`finish_init`](Self::finish_init).
    pub fn begin_init(&mut self, mode: WordMode, initial_length: usize, now_ms: f64) -> WordRequest {
        let length = initial_length.clamp(1, self.config.max_word_length.max(1));
        self.request = WordRequest::new(mode, length);
        self.pool.clear();
        self.refill_pending = false;
        self.field = AsteroidField::new(self.config.max_asteroids);
        self.score = ScoreState::default();
        self.level = LevelState::new(length);
        self.stats = TypingStats::new(now_ms);
        self.events.clear();
        self.phase = GamePhase::Initializing;

        log::info!("Starting game: {:?}, word length {}", mode, length);
        self.request
    }

    /// Accept the initial word pool. Failures leave the pool empty and the
    /// game runs on fallback words.
    pub fn finish_init(&mut self, result: Result<Vec<String>, WordSupplyError>) {
        match result {
            Ok(words) => {
                let added = self.pool.merge(words, &self.request);
                if added == 0 {
                    log::warn!("No words for {:?}, using fallback words", self.request);
                } else {
                    log::info!("Word pool ready: {} words", added);
                }
            }
            Err(e) => log::warn!("Error initializing word pool: {}; using fallback words", e),
        }
        self.phase = GamePhase::Playing;
    }

    /// Start a game with a synchronous word source
    pub fn init_with<S: WordSupply + ?Sized>(
        &mut self,
        supply: &mut S,
        mode: WordMode,
        initial_length: usize,
        now_ms: f64,
    ) {
        let request = self.begin_init(mode, initial_length, now_ms);
        let result = supply.fetch(&request);
        self.finish_init(result);
    }

    /// Merge a refill answering an earlier [`GameEvent::WordsRequested`].
    ///
    /// Answers to a request that is no longer current (the word length moved
    /// on while it was in flight) are dropped and the pending refill stays
    /// outstanding.
    pub fn receive_words(
        &mut self,
        request: WordRequest,
        result: Result<Vec<String>, WordSupplyError>,
    ) {
        if request != self.request {
            log::debug!("Dropping stale words for {:?}", request);
            return;
        }
        self.refill_pending = false;
        match result {
            Ok(words) => {
                let added = self.pool.merge(words, &self.request);
                log::info!("Refilled word pool: +{} (size {})", added, self.pool.len());
            }
            Err(e) => log::warn!("Failed to refill word pool: {}", e),
        }
    }

    /// Answer a pending refill from a synchronous source
    pub fn refill_with<S: WordSupply + ?Sized>(&mut self, supply: &mut S) {
        if self.refill_pending {
            let request = self.request;
            let result = supply.fetch(&request);
            self.receive_words(request, result);
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            true
        } else {
            false
        }
    }

    pub fn resume(&mut self) -> bool {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            true
        } else {
            false
        }
    }

    /// Level timer ran out: freeze play and report the stats so far
    pub fn end_level(&mut self, now_ms: f64) -> StatsSnapshot {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::LevelTransition;
        }
        self.stats.snapshot(now_ms)
    }

    /// Move to the next level: faster asteroids, tighter spawns, and every
    /// third level longer words. Clears the field.
    pub fn advance_level(&mut self) -> u32 {
        match self.phase {
            GamePhase::Playing | GamePhase::LevelTransition => {}
            phase => {
                log::warn!("Cannot advance level while {:?}", phase);
                return self.level.level;
            }
        }

        self.field.clear();
        let old_length = self.level.word_length;
        let level = self.level.advance(self.config.max_word_length);

        if self.level.word_length != old_length {
            self.request.length = self.level.word_length;
            self.pool.retain_matching(&self.request);
            if self.pool.is_empty() {
                // Any outstanding refill was for the old length
                self.refill_pending = false;
                self.request_refill();
            }
        }

        log::info!(
            "Level {}: speed {:.1}, word length {}, spawn every {}ms",
            level,
            self.level.fall_speed,
            self.level.word_length,
            self.level.spawn_interval_ms
        );
        self.events.push(GameEvent::LevelAdvanced { level });
        self.phase = GamePhase::Playing;
        level
    }

    // === Per-frame ===

    /// Move all asteroids down by `delta_fall_speed`. `alive` turns false once
    /// an asteroid passes the bottom edge.
    pub fn tick(&mut self, delta_fall_speed: f32, now_ms: f64) -> TickResult {
        match self.phase {
            GamePhase::Playing => {}
            GamePhase::GameOver => return TickResult { alive: false },
            _ => return TickResult { alive: true },
        }

        let result = self
            .field
            .advance(delta_fall_speed, self.config.playfield_height);
        if delta_fall_speed != 0.0 {
            self.events.extend(
                self.field
                    .asteroids()
                    .iter()
                    .map(|a| GameEvent::AsteroidAdvanced { id: a.id, y: a.pos.y }),
            );
        }

        if result.fell_off_screen {
            self.phase = GamePhase::GameOver;
            let stats = self.stats.snapshot(now_ms);
            log::info!(
                "Game over at level {}: score {}, {} wpm",
                self.level.level,
                self.score.score,
                stats.wpm
            );
            self.events.push(GameEvent::GameOver {
                score: self.score.score,
                stats,
            });
            return TickResult { alive: false };
        }
        TickResult { alive: true }
    }

    /// Spawn-timer callback: add one asteroid if there is room
    pub fn spawn_tick(&mut self) -> Option<u32> {
        if self.phase != GamePhase::Playing || self.field.is_full() {
            return None;
        }

        let word = if self.pool.is_empty() {
            self.request_refill();
            let fallback = fallback_words(&self.request);
            choose_word_for_spawn(&fallback, self.field.asteroids(), &mut self.rng)?.to_string()
        } else {
            choose_word_for_spawn(self.pool.words(), self.field.asteroids(), &mut self.rng)?
                .to_string()
        };
        self.spawn_asteroid(&word)
    }

    /// Place an asteroid carrying `word`. Returns its id, or `None` when the
    /// field is full or too crowded right now.
    pub fn spawn_asteroid(&mut self, word: &str) -> Option<u32> {
        if !matches!(self.phase, GamePhase::Playing) {
            return None;
        }
        let word = word.trim().to_lowercase();
        let (id, x) = self
            .field
            .spawn(&word, &self.config, &mut self.rng)
            .map(|a| (a.id, a.pos.x))?;
        self.events.push(GameEvent::AsteroidSpawned { id, word, x });
        Some(id)
    }

    // === Input ===

    /// Route one key press.
    ///
    /// A partially typed asteroid keeps the lock until it is finished, so a
    /// new asteroid sharing the next letter never steals the input.
    pub fn handle_keystroke(&mut self, key: &str) -> KeystrokeResult {
        if self.phase != GamePhase::Playing {
            return KeystrokeResult::ignored();
        }
        let key = key.to_lowercase();
        if key.is_empty() || CANCEL_KEYS.contains(&key.as_str()) {
            return KeystrokeResult::ignored();
        }

        // Named keys ("shift", "enter") never match a word
        let mut chars = key.chars();
        let ch = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };

        let asteroids = self.field.asteroids();
        let target = asteroids
            .iter()
            .position(Asteroid::is_partially_typed)
            .or_else(|| ch.and_then(|c| asteroids.iter().position(|a| a.accepts(c))));

        match target {
            Some(index) if ch.is_some_and(|c| asteroids[index].accepts(c)) => self.hit(index),
            locked => self.miss(&key, locked),
        }
    }

    fn hit(&mut self, index: usize) -> KeystrokeResult {
        self.stats.record_keystroke(true);
        let combo = self.score.combo.record_correct();
        if combo.multiplier_changed {
            self.events.push(GameEvent::MultiplierChanged {
                multiplier: combo.multiplier,
                progress: combo.progress,
            });
        }

        let Some(asteroid) = self.field.get_mut(index) else {
            return KeystrokeResult::miss(combo);
        };
        let finished = asteroid.strip_first();
        let pos = asteroid.pos;
        self.events.push(GameEvent::ShotFired {
            from: self.config.ship_pos,
            to: pos,
        });

        let mut result = KeystrokeResult {
            is_correct: true,
            destroyed_asteroid: false,
            target: Some(pos),
            score_delta: 0,
            combo: Some(combo),
        };

        if finished {
            let retired = self.field.remove(index);
            let delta = self.score.award(retired.original_word.len());
            self.stats
                .record_word_completion(&retired.original_word, retired.mistakes);
            log::debug!(
                "Destroyed {:?} for {} points (x{})",
                retired.original_word,
                delta,
                combo.multiplier
            );
            self.events.push(GameEvent::AsteroidDestroyed {
                id: retired.id,
                score_delta: delta,
                multiplier: combo.multiplier,
                pos,
            });
            result.destroyed_asteroid = true;
            result.score_delta = delta;
        }
        result
    }

    fn miss(&mut self, key: &str, locked: Option<usize>) -> KeystrokeResult {
        self.stats.record_keystroke(false);
        self.stats.record_character_error(key);
        if let Some(asteroid) = locked.and_then(|i| self.field.get_mut(i)) {
            asteroid.mistakes += 1;
        }
        let combo = self.score.combo.record_incorrect_or_miss();
        if combo.multiplier_changed {
            self.events.push(GameEvent::MultiplierChanged {
                multiplier: combo.multiplier,
                progress: combo.progress,
            });
        }
        KeystrokeResult::miss(combo)
    }

    fn request_refill(&mut self) {
        if !self.refill_pending {
            self.refill_pending = true;
            log::warn!("Word pool is empty, requesting refill for {:?}", self.request);
            self.events.push(GameEvent::WordsRequested(self.request));
        }
    }

    // === Accessors ===

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score.score
    }

    pub fn multiplier(&self) -> u32 {
        self.score.combo.multiplier()
    }

    pub fn combo_streak(&self) -> u32 {
        self.score.combo.streak()
    }

    pub fn combo_progress(&self) -> f32 {
        self.score.combo.progress()
    }

    pub fn level(&self) -> &LevelState {
        &self.level
    }

    pub fn word_request(&self) -> &WordRequest {
        &self.request
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn refill_pending(&self) -> bool {
        self.refill_pending
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        self.field.asteroids()
    }

    pub fn stats(&self) -> &TypingStats {
        &self.stats
    }

    pub fn stats_snapshot(&self, now_ms: f64) -> StatsSnapshot {
        self.stats.snapshot(now_ms)
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
