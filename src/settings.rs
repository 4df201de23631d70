//! Player settings and preferences
//!
//! Persisted as JSON in LocalStorage, separately from anything else.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_WORD_LENGTH, MAX_WORD_LENGTH};
use crate::words::WordMode;

/// Sound themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Space,
    Birthday,
    Soccer,
    Beach,
}

/// Sound keys for one theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSounds {
    pub explosion: String,
    pub missile_fire: String,
    pub level_up: String,
    pub game_over: String,
    pub game_start: String,
    pub game_music: String,
    pub menu_music: String,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Space, Theme::Birthday, Theme::Soccer, Theme::Beach];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Space => "space",
            Theme::Birthday => "birthday",
            Theme::Soccer => "soccer",
            Theme::Beach => "beach",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "space" => Some(Theme::Space),
            "birthday" => Some(Theme::Birthday),
            "soccer" => Some(Theme::Soccer),
            "beach" => Some(Theme::Beach),
            _ => None,
        }
    }

    /// Asset keys, all prefixed with the theme name
    pub fn sounds(&self) -> ThemeSounds {
        let key = |name: &str| format!("{}-{}", self.as_str(), name);
        ThemeSounds {
            explosion: key("explosion"),
            missile_fire: key("missile-fire"),
            level_up: key("level-up"),
            game_over: key("game-over"),
            game_start: key("game-start"),
            game_music: key("game-music"),
            menu_music: key("menu-music"),
        }
    }
}

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub sound_enabled: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Word length for level 1
    pub initial_word_length: usize,
    /// Letter every word must contain; free play when unset
    pub letter: Option<char>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Space,
            sound_enabled: true,
            music_volume: 0.5,
            sfx_volume: 0.7,
            initial_word_length: DEFAULT_WORD_LENGTH,
            letter: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "typing_asteroids_settings";

    /// Parse stored JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str::<Self>(json).ok().map(Self::sanitized)
    }

    /// Clamp volumes and word length into range, drop a non-letter
    pub fn sanitized(mut self) -> Self {
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.initial_word_length = self.initial_word_length.clamp(1, MAX_WORD_LENGTH);
        self.letter = self
            .letter
            .and_then(WordMode::letter)
            .and_then(|mode| mode.required_letter());
        self
    }

    /// Word mode for a new game
    pub fn word_mode(&self) -> WordMode {
        self.letter.and_then(WordMode::letter).unwrap_or(WordMode::Free)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(settings) = storage
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|json| Self::from_json(&json))
        {
            log::info!("Loaded settings from LocalStorage");
            return settings;
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_ok() {
                        log::info!("Settings saved");
                    } else {
                        log::warn!("Could not write settings to LocalStorage");
                    }
                }
                Err(e) => log::warn!("Could not serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings not persisted on native ({})", Self::STORAGE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_names() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_str(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::from_str(" Beach "), Some(Theme::Beach));
        assert_eq!(Theme::from_str("jungle"), None);
    }

    #[test]
    fn test_theme_sound_keys() {
        let sounds = Theme::Soccer.sounds();
        assert_eq!(sounds.explosion, "soccer-explosion");
        assert_eq!(sounds.missile_fire, "soccer-missile-fire");
        assert_eq!(sounds.menu_music, "soccer-menu-music");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"theme":"birthday","sfx_volume":3.0}"#).unwrap();
        assert_eq!(settings.theme, Theme::Birthday);
        assert_eq!(settings.sfx_volume, 1.0);
        assert!(settings.sound_enabled);
        assert_eq!(settings.initial_word_length, DEFAULT_WORD_LENGTH);
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(Settings::from_json("not json").is_none());
        assert!(Settings::from_json(r#"{"theme":"jungle"}"#).is_none());
    }

    #[test]
    fn test_letter_selects_word_mode() {
        assert_eq!(Settings::default().word_mode(), WordMode::Free);

        let settings = Settings::from_json(r#"{"letter":"K"}"#).unwrap();
        assert_eq!(settings.letter, Some('k'));
        assert_eq!(settings.word_mode(), WordMode::Letter('k'));

        let settings = Settings::from_json(r#"{"letter":"7"}"#).unwrap();
        assert_eq!(settings.letter, None);
        assert_eq!(settings.word_mode(), WordMode::Free);
    }

    #[test]
    fn test_word_length_clamped() {
        let settings = Settings::from_json(r#"{"initial_word_length":0}"#).unwrap();
        assert_eq!(settings.initial_word_length, 1);
        let settings = Settings::from_json(r#"{"initial_word_length":40}"#).unwrap();
        assert_eq!(settings.initial_word_length, MAX_WORD_LENGTH);
    }
}
