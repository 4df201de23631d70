//! Theme sound cues
//!
//! Maps engine events to sound keys for the active theme. Playback itself is
//! browser-only: `AudioManager` streams `sounds/{key}.mp3` through
//! `HtmlAudioElement`s.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Missile shots play quieter than other effects
pub const MISSILE_VOLUME_SCALE: f32 = 0.5;

/// One sound to play
#[derive(Debug, Clone, PartialEq)]
pub struct SoundCue {
    pub key: String,
    pub volume: f32,
    pub looping: bool,
}

impl SoundCue {
    fn effect(key: String, volume: f32) -> Option<Self> {
        (volume > 0.0).then_some(Self {
            key,
            volume: volume.min(1.0),
            looping: false,
        })
    }
}

/// Sound effect for an engine event, if it has one
pub fn cue_for_event(event: &GameEvent, settings: &Settings) -> Option<SoundCue> {
    if !settings.sound_enabled {
        return None;
    }
    let sounds = settings.theme.sounds();
    let sfx = settings.sfx_volume;
    match event {
        GameEvent::ShotFired { .. } => {
            SoundCue::effect(sounds.missile_fire, sfx * MISSILE_VOLUME_SCALE)
        }
        GameEvent::AsteroidDestroyed { .. } => SoundCue::effect(sounds.explosion, sfx),
        GameEvent::LevelAdvanced { .. } => SoundCue::effect(sounds.level_up, sfx),
        GameEvent::GameOver { .. } => SoundCue::effect(sounds.game_over, sfx),
        _ => None,
    }
}

/// Jingle played when a game starts
pub fn start_cue(settings: &Settings) -> Option<SoundCue> {
    if !settings.sound_enabled {
        return None;
    }
    SoundCue::effect(settings.theme.sounds().game_start, settings.sfx_volume)
}

fn looping(key: String, settings: &Settings) -> Option<SoundCue> {
    if !settings.sound_enabled || settings.music_volume <= 0.0 {
        return None;
    }
    Some(SoundCue {
        key,
        volume: settings.music_volume.min(1.0),
        looping: true,
    })
}

/// Looping in-game music
pub fn music_cue(settings: &Settings) -> Option<SoundCue> {
    looping(settings.theme.sounds().game_music, settings)
}

/// Looping music for the screens between games
pub fn menu_music_cue(settings: &Settings) -> Option<SoundCue> {
    looping(settings.theme.sounds().menu_music, settings)
}

/// Browser playback (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    music: Option<web_sys::HtmlAudioElement>,
}

#[cfg(target_arch = "wasm32")]
impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new() -> Self {
        Self { music: None }
    }

    fn element(cue: &SoundCue) -> Option<web_sys::HtmlAudioElement> {
        let el = web_sys::HtmlAudioElement::new_with_src(&format!("sounds/{}.mp3", cue.key))
            .map_err(|e| log::warn!("Failed to create audio for {}: {:?}", cue.key, e))
            .ok()?;
        el.set_volume(cue.volume as f64);
        el.set_loop(cue.looping);
        Some(el)
    }

    /// Fire-and-forget playback of an effect
    pub fn play(&self, cue: &SoundCue) {
        if let Some(el) = Self::element(cue) {
            // Browsers reject playback before the first user gesture
            if el.play().is_err() {
                log::debug!("Playback of {} was blocked", cue.key);
            }
        }
    }

    /// Play the sound for an engine event, if any
    pub fn play_event(&self, event: &GameEvent, settings: &Settings) {
        if let Some(cue) = cue_for_event(event, settings) {
            self.play(&cue);
        }
    }

    /// Replace the current music track
    pub fn start_music(&mut self, cue: Option<SoundCue>) {
        self.stop_music();
        if let Some(cue) = cue {
            self.music = Self::element(&cue);
            if let Some(el) = &self.music {
                let _ = el.play();
            }
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(el) = self.music.take() {
            let _ = el.pause();
        }
    }

    pub fn pause_music(&self) {
        if let Some(el) = &self.music {
            let _ = el.pause();
        }
    }

    pub fn resume_music(&self) {
        if let Some(el) = &self.music {
            let _ = el.play();
        }
    }
}
