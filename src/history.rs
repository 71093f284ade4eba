//! Roll history
//!
//! Persisted to LocalStorage, keeps the most recent rolls (newest first).

use serde::{Deserialize, Serialize};

use crate::sim::RollOutcome;

/// Maximum number of rolls to keep
pub const MAX_HISTORY: usize = 20;

/// A single settled roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Face values in die order
    pub values: Vec<u8>,
    pub total: u32,
    /// Unix timestamp (ms) when the roll settled
    pub timestamp: f64,
    /// Flavor text, filled in once the interpreter answers
    #[serde(default)]
    pub interpretation: Option<String>,
}

/// Recent rolls, newest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RollHistory {
    pub entries: Vec<HistoryEntry>,
}

impl RollHistory {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "zar_history";

    /// Create empty history
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a settled roll
    pub fn record(&mut self, outcome: &RollOutcome, timestamp: f64) {
        self.entries.insert(
            0,
            HistoryEntry {
                values: outcome.values.clone(),
                total: outcome.total,
                timestamp,
                interpretation: None,
            },
        );
        self.entries.truncate(MAX_HISTORY);
    }

    /// Attach flavor text to the roll recorded at `timestamp`.
    ///
    /// Interpretations arrive late; if the roll has aged out, the text is dropped.
    pub fn annotate(&mut self, timestamp: f64, text: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|e| e.timestamp == timestamp) {
            Some(entry) => {
                entry.interpretation = Some(text.into());
                true
            }
            None => false,
        }
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Best total seen so far (if any)
    pub fn best_total(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.total).max()
    }

    /// Load history from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(history) = serde_json::from_str::<RollHistory>(&json) {
                    log::info!("Loaded {} past rolls", history.entries.len());
                    return history;
                }
            }
        }

        log::info!("No roll history found, starting fresh");
        Self::new()
    }

    /// Save history to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Roll history saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
