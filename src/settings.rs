//! Player settings and preferences
//!
//! Persisted separately from roll history in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_DICE, MIN_DICE};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dice on the table when the tray opens
    pub dice_count: usize,

    // === Audio ===
    /// Rattle clicks while dice tumble
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Flavor text ===
    /// Ask the interpreter for a one-line reading after each roll
    pub interpretations: bool,

    // === Accessibility ===
    /// Reduced motion (shorter tumble, no bounce)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dice_count: 1,
            sound_enabled: true,
            master_volume: 0.8,
            interpretations: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Die count clamped to what the table supports
    pub fn effective_dice_count(&self) -> usize {
        self.dice_count.clamp(MIN_DICE, MAX_DICE)
    }

    /// Effective volume (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Toggle sound, returning the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Scale a settle/tumble duration for reduced motion
    pub fn settle_secs(&self, base: f32) -> f32 {
        if self.reduced_motion { base * 0.5 } else { base }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "zar_settings";

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
                    Err(e) => log::warn!("Discarding stored settings: {e}"),
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
