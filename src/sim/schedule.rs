//! Host-side cadence
//!
//! The engine has no timers of its own. `Scheduler` turns variable frame
//! deltas into fixed movement steps, fires the spawn timer at the current
//! level's interval, and runs the 30 second level countdown. Pausing is the
//! engine's `Paused` phase, which stops all three.

use super::config::EngineConfig;
use super::engine::MechanicsEngine;
use super::state::GamePhase;
use super::stats::StatsSnapshot;
use crate::consts::*;

/// What happened during one `update`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed movement steps run this frame
    pub steps: u32,
    /// Asteroids spawned this frame
    pub spawned: u32,
    /// Whole seconds left on the level clock (for the HUD)
    pub seconds_left: u32,
    /// Set on the frame the level clock ran out
    pub level_ended: Option<StatsSnapshot>,
    /// Set on the frame the next level started
    pub level_started: Option<u32>,
    pub game_over: bool,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    accumulator: f32,
    spawn_elapsed_ms: f64,
    level_elapsed: f32,
    level_duration: f32,
    transition_left: f32,
}

impl Scheduler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            accumulator: 0.0,
            spawn_elapsed_ms: 0.0,
            level_elapsed: 0.0,
            level_duration: config.level_duration_secs as f32,
            transition_left: 0.0,
        }
    }

    /// Restart all clocks (new game)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.spawn_elapsed_ms = 0.0;
        self.level_elapsed = 0.0;
        self.transition_left = 0.0;
    }

    pub fn is_paused(&self, engine: &MechanicsEngine) -> bool {
        engine.phase() == GamePhase::Paused
    }

    /// Toggle pause while playing. Returns the new paused state, or `None`
    /// when the current phase cannot be paused.
    pub fn toggle_pause(&mut self, engine: &mut MechanicsEngine) -> Option<bool> {
        let paused = match engine.phase() {
            GamePhase::Playing => engine.pause(),
            GamePhase::Paused => !engine.resume(),
            phase => {
                log::debug!("Ignoring pause toggle while {:?}", phase);
                return None;
            }
        };
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
        Some(paused)
    }

    pub fn seconds_left(&self) -> u32 {
        (self.level_duration - self.level_elapsed).max(0.0).ceil() as u32
    }

    /// Advance the clocks by one frame of `dt` seconds
    pub fn update(&mut self, engine: &mut MechanicsEngine, dt: f32, now_ms: f64) -> FrameReport {
        let mut report = FrameReport {
            seconds_left: self.seconds_left(),
            game_over: engine.phase() == GamePhase::GameOver,
            ..Default::default()
        };
        if report.game_over {
            return report;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        match engine.phase() {
            GamePhase::Playing => {}
            GamePhase::LevelTransition => {
                self.transition_left -= dt;
                if self.transition_left <= 0.0 {
                    report.level_started = Some(engine.advance_level());
                    self.accumulator = 0.0;
                    self.spawn_elapsed_ms = 0.0;
                    self.level_elapsed = 0.0;
                    report.seconds_left = self.seconds_left();
                }
                return report;
            }
            _ => return report,
        }

        // Movement at a fixed rate
        self.accumulator += dt;
        while self.accumulator >= SIM_DT && report.steps < MAX_SUBSTEPS {
            let fall_speed = engine.level().fall_speed;
            self.accumulator -= SIM_DT;
            report.steps += 1;
            if !engine.tick(fall_speed, now_ms).alive {
                report.game_over = true;
                return report;
            }
        }

        // Spawn timer
        self.spawn_elapsed_ms += dt as f64 * 1000.0;
        let interval = engine.level().spawn_interval_ms.max(1) as f64;
        while self.spawn_elapsed_ms >= interval {
            self.spawn_elapsed_ms -= interval;
            if engine.spawn_tick().is_some() {
                report.spawned += 1;
            }
        }

        // Level countdown
        self.level_elapsed += dt;
        report.seconds_left = self.seconds_left();
        if self.level_elapsed >= self.level_duration {
            log::info!("Level {} complete", engine.level().level);
            report.level_ended = Some(engine.end_level(now_ms));
            self.transition_left = LEVEL_TRANSITION_SECS;
        }
        report
    }
}
