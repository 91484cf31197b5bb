//! Player preferences
//!
//! Persisted in LocalStorage on the web; native builds always start from
//! defaults.

use serde::{Deserialize, Serialize};

use crate::sim::InputMode;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Next preset for the menu's quality toggle (wraps around)
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Background stars drawn per frame
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium | QualityPreset::High => 100,
        }
    }
}

/// Which control scheme to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputModePreference {
    /// Follow the host's touch capability
    #[default]
    Auto,
    Keyboard,
    Touch,
}

impl InputModePreference {
    pub fn resolve(self, touch_capable: bool) -> InputMode {
        match self {
            InputModePreference::Auto if touch_capable => InputMode::Touch,
            InputModePreference::Auto => InputMode::Keyboard,
            InputModePreference::Keyboard => InputMode::Keyboard,
            InputModePreference::Touch => InputMode::Touch,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (shots, explosions, pickups)
    pub particles: bool,
    pub input_mode: InputModePreference,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            input_mode: InputModePreference::Auto,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn star_count(&self) -> usize {
        self.quality.star_count()
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "star_shooter_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
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
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
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
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_cap_follows_quality_and_toggle() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 100);
        assert_eq!(Settings::default().max_particles(), 500);
        assert_eq!(Settings::from_preset(QualityPreset::High).max_particles(), 2000);

        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(off.max_particles(), 0);
    }

    #[test]
    fn test_star_count() {
        assert_eq!(QualityPreset::Low.star_count(), 40);
        assert_eq!(QualityPreset::Medium.star_count(), 100);
        assert_eq!(QualityPreset::High.star_count(), 100);
    }

    #[test]
    fn test_preset_cycle() {
        let mut preset = QualityPreset::Low;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(preset.as_str());
            preset = preset.next();
        }
        assert_eq!(seen, ["Low", "Medium", "High"]);
        assert_eq!(preset, QualityPreset::Low);
    }

    #[test]
    fn test_input_mode_resolution() {
        assert_eq!(InputModePreference::Auto.resolve(true), InputMode::Touch);
        assert_eq!(InputModePreference::Auto.resolve(false), InputMode::Keyboard);
        assert_eq!(InputModePreference::Keyboard.resolve(true), InputMode::Keyboard);
        assert_eq!(InputModePreference::Touch.resolve(false), InputMode::Touch);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"quality":"High"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.particles);
        assert_eq!(settings.input_mode, InputModePreference::Auto);

        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
