//! Zar - An animated dice tray
//!
//! Core modules:
//! - `sim`: Roll resolution (faces, spin, layout) and the table state machine
//! - `tuning`: Data-driven roll constants (separation, bounds, spins, settle time)
//! - `settings`: Player preferences
//! - `history`: Recent rolls with their interpretations
//! - `interpret`: Flavor-text capability for a finished roll

pub mod history;
pub mod interpret;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use history::RollHistory;
pub use settings::Settings;
pub use tuning::RollTuning;

/// Table configuration constants
pub mod consts {
    /// Fixed step the host advances the settle timer with (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Die count limits
    pub const MIN_DICE: usize = 1;
    pub const MAX_DICE: usize = 4;

    /// One full turn in degrees
    pub const FULL_TURN: f64 = 360.0;
}

/// Round a cumulative angle to the nearest whole turn.
///
/// Ties go toward +∞ regardless of sign, so 180° → 360° and -180° → 0°.
#[inline]
pub fn round_to_turn(degrees: f64) -> f64 {
    (degrees / consts::FULL_TURN + 0.5).floor() * consts::FULL_TURN
}

/// Angle wrapped to [0, 360)
#[inline]
pub fn wrap_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(consts::FULL_TURN)
}
