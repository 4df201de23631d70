//! Typing Asteroids - a falling-word arcade typing game
//!
//! Core modules:
//! - `sim`: Deterministic mechanics (keystroke matching, combo, spawning, levels)
//! - `words`: Word supply (pool, fallback lists, Datamuse client)
//! - `settings`: Player preferences persisted in LocalStorage
//! - `audio`: Theme sound cues for gameplay events

pub mod audio;
pub mod settings;
pub mod sim;
pub mod words;

pub use settings::{Settings, Theme};
pub use sim::{EngineConfig, GameEvent, GamePhase, MechanicsEngine, Scheduler};
pub use words::{WordMode, WordRequest, WordSupply, WordSupplyError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (asteroid speeds are expressed per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the scheduler (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Ship sits centered, 50px above the bottom edge
    pub const SHIP_OFFSET_Y: f32 = 50.0;

    /// Asteroid limits
    pub const MAX_ASTEROIDS: usize = 5;
    /// Asteroids spawn just above the visible area
    pub const SPAWN_Y: f32 = -50.0;
    /// Width of one horizontal spawn slot
    pub const SPAWN_SLOT_WIDTH: f32 = 100.0;
    /// Minimum horizontal gap between a new slot and a live asteroid
    pub const MIN_SLOT_GAP: f32 = 100.0;
    /// Minimum straight-line distance from live asteroids at the spawn point
    pub const MIN_SPAWN_DISTANCE: f32 = 80.0;
    /// Margin used for the random fallback X position
    pub const SPAWN_EDGE_MARGIN: f32 = 50.0;
    /// Placement attempts before a spawn is skipped
    pub const SPAWN_ATTEMPTS: u32 = 10;

    /// Word length bounds
    pub const DEFAULT_WORD_LENGTH: usize = 5;
    pub const MAX_WORD_LENGTH: usize = 10;

    /// Level timing
    pub const LEVEL_DURATION_SECS: u32 = 30;
    /// Pause between the end of a level and the next one
    pub const LEVEL_TRANSITION_SECS: f32 = 2.0;
    /// Spawn interval bounds (ms)
    pub const BASE_SPAWN_INTERVAL_MS: u32 = 2000;
    pub const MIN_SPAWN_INTERVAL_MS: u32 = 800;
    pub const SPAWN_INTERVAL_STEP_MS: u32 = 100;
}
