//! Data-driven roll tuning
//!
//! Every constant the roll engine depends on lives here so hosts and tests
//! can vary them (e.g. shrinking the table to force the grid fallback).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive range of extra whole turns added on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRange {
    pub min: u32,
    pub max: u32,
}

impl SpinRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, turns: u32) -> bool {
        turns >= self.min && turns <= self.max
    }
}

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("minimum separation must be positive, got {0}")]
    Separation(f32),

    #[error("table half-extents must be non-negative, got ({0}, {1})")]
    Bounds(f32, f32),

    #[error("placement needs at least one attempt per die")]
    NoAttempts,

    #[error("spin range on the {axis} axis is inverted ({min} > {max})")]
    SpinRange { axis: &'static str, min: u32, max: u32 },

    #[error("settle duration must be non-negative, got {0}")]
    SettleDuration(f32),
}

/// Roll engine constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollTuning {
    /// Minimum distance between two die centers (a die is ~128px wide)
    pub min_separation: f32,
    /// Half-width of the placement rectangle
    pub bounds_x: f32,
    /// Half-height of the placement rectangle
    pub bounds_y: f32,
    /// Random samples tried per die before falling back to the grid
    pub max_attempts: u32,
    /// Grid spacing used for freshly added dice before their first roll
    pub initial_spacing: f32,
    /// Extra whole turns on the pitch axis
    pub spin_x: SpinRange,
    /// Extra whole turns on the yaw axis
    pub spin_y: SpinRange,
    /// Extra whole turns on the roll axis
    pub spin_z: SpinRange,
    /// Seconds the dice tumble before the outcome is reported
    pub settle_secs: f32,
}

impl Default for RollTuning {
    fn default() -> Self {
        Self {
            min_separation: 140.0,
            bounds_x: 180.0,
            bounds_y: 100.0,
            max_attempts: 50,
            initial_spacing: 120.0,
            spin_x: SpinRange::new(3, 5),
            spin_y: SpinRange::new(3, 5),
            spin_z: SpinRange::new(1, 2),
            // Matches the 1.5s tumble animation plus a short beat
            settle_secs: 1.6,
        }
    }
}

impl RollTuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse tuning from JSON, falling back to defaults on any problem
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring roll tuning: {e}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.min_separation > 0.0) {
            return Err(TuningError::Separation(self.min_separation));
        }
        if !(self.bounds_x >= 0.0 && self.bounds_y >= 0.0) {
            return Err(TuningError::Bounds(self.bounds_x, self.bounds_y));
        }
        if self.max_attempts == 0 {
            return Err(TuningError::NoAttempts);
        }
        for (axis, range) in [("x", self.spin_x), ("y", self.spin_y), ("z", self.spin_z)] {
            if range.min > range.max {
                return Err(TuningError::SpinRange {
                    axis,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        if !(self.settle_secs >= 0.0) {
            return Err(TuningError::SettleDuration(self.settle_secs));
        }
        Ok(())
    }
}
