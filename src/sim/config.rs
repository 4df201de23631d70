//! Engine configuration
//!
//! Read-only tuning handed to the engine at construction time. The engine keeps
//! its own copy and never writes to it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Playfield geometry and spawn tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Where shots originate from
    pub ship_pos: Vec2,
    pub max_asteroids: usize,
    pub spawn_y: f32,
    pub slot_width: f32,
    pub min_slot_gap: f32,
    pub min_spawn_distance: f32,
    pub edge_margin: f32,
    pub spawn_attempts: u32,
    pub max_word_length: usize,
    pub level_duration_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::with_playfield(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT)
    }
}

impl EngineConfig {
    /// Default tuning for a playfield of the given size
    pub fn with_playfield(width: f32, height: f32) -> Self {
        Self {
            playfield_width: width,
            playfield_height: height,
            ship_pos: Vec2::new(width / 2.0, height - SHIP_OFFSET_Y),
            max_asteroids: MAX_ASTEROIDS,
            spawn_y: SPAWN_Y,
            slot_width: SPAWN_SLOT_WIDTH,
            min_slot_gap: MIN_SLOT_GAP,
            min_spawn_distance: MIN_SPAWN_DISTANCE,
            edge_margin: SPAWN_EDGE_MARGIN,
            spawn_attempts: SPAWN_ATTEMPTS,
            max_word_length: MAX_WORD_LENGTH,
            level_duration_secs: LEVEL_DURATION_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_tracks_playfield() {
        let config = EngineConfig::with_playfield(1024.0, 768.0);
        assert_eq!(config.ship_pos, Vec2::new(512.0, 718.0));
        assert_eq!(config.max_asteroids, 5);
    }

    #[test]
    fn test_config_json_roundtrip_keeps_tuning() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
