//! Game settings and preferences
//!
//! Persisted by the host through a [`SettingsStore`]; the core only reads them
//! when a session or audio router is built.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::portal::Orientation;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" | "normal" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Obstacles alive at the start of a run
    pub fn base_obstacles(&self) -> usize {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 15,
        }
    }

    /// Initial fall speed (units per frame at the target rate)
    pub fn start_fall_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 3.0,
            Difficulty::Medium => 5.0,
            Difficulty::Hard => 7.0,
        }
    }
}

/// Level presets from the level select menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Level {
    /// Plain dodging, obstacles always fall down
    Classic,
    /// Score thresholds open portals that flip the field
    #[default]
    Portal,
    /// Sideways from the start, obstacles come from both side edges
    Crossfire,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Classic, Level::Portal, Level::Crossfire];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Classic => "Classic",
            Level::Portal => "Portal",
            Level::Crossfire => "Crossfire",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "1" => Some(Level::Classic),
            "portal" | "2" => Some(Level::Portal),
            "crossfire" | "3" => Some(Level::Crossfire),
            _ => None,
        }
    }

    pub fn start_orientation(&self) -> Orientation {
        match self {
            Level::Classic | Level::Portal => Orientation::Down,
            Level::Crossfire => Orientation::Side,
        }
    }

    pub fn portals_enabled(&self) -> bool {
        *self == Level::Portal
    }

    pub fn crossfire(&self) -> bool {
        *self == Level::Crossfire
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preset used for new sessions
    pub difficulty: Difficulty,
    pub level: Level,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects toggle from the sound menu
    pub sfx_enabled: bool,

    // === Accessibility ===
    /// Reduced motion (no screen shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            level: Level::Portal,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.4,
            sfx_enabled: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        !self.reduced_motion
    }

    /// Gain applied on top of each effect's base gain
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx_enabled {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Background music gain (not affected by the sfx toggle)
    pub fn effective_music_volume(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        for (field, v) in [
            ("master_volume", settings.master_volume),
            ("sfx_volume", settings.sfx_volume),
            ("music_volume", settings.music_volume),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::invalid(field, "volume must be in [0, 1]"));
            }
        }
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Host-side storage for [`Settings`]
///
/// Constructed once per application run and handed to whoever needs
/// preferences; the simulation never touches storage itself.
pub trait SettingsStore {
    /// Load stored settings, falling back to defaults when absent or unreadable
    fn load(&self) -> Settings;

    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError>;
}

/// Keeps the serialized settings in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    json: Option<String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing serialized document
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Settings {
        let Some(json) = &self.json else {
            log::info!("Using default settings");
            return Settings::default();
        };
        match Settings::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Stored settings rejected ({e}), using defaults");
                Settings::default()
            }
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        self.json = Some(settings.to_json()?);
        log::info!("Settings saved");
        Ok(())
    }
}
