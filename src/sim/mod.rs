//! Deterministic mechanics module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - No clocks or timers (the host passes time in)
//! - Stable iteration order (field order = spawn order)
//! - No rendering or platform dependencies

pub mod combo;
pub mod config;
pub mod engine;
pub mod field;
pub mod schedule;
pub mod state;
pub mod stats;

pub use combo::{ComboMultiplier, MultiplierInfo};
pub use config::EngineConfig;
pub use engine::{KeystrokeResult, MechanicsEngine, TickResult};
pub use field::{AdvanceResult, AsteroidField, choose_word_for_spawn, find_spawn_x};
pub use schedule::{FrameReport, Scheduler};
pub use state::{Asteroid, GameEvent, GamePhase, LevelState, RngState, ScoreState};
pub use stats::{StatsSnapshot, TypingStats};
