//! Face resolution: which face came up and how the cube spins to show it
//!
//! Rotations are cumulative Euler angles in degrees, applied x then y then z.
//! They are never normalized: each roll spins further from where the last
//! one stopped, and only the value modulo 360 decides what the viewer sees.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::source::DiceSource;
use crate::consts::FULL_TURN;
use crate::round_to_turn;
use crate::tuning::RollTuning;

/// A six-sided die face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Face {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::One,
        Face::Two,
        Face::Three,
        Face::Four,
        Face::Five,
        Face::Six,
    ];

    /// Pip count (1-6)
    pub fn value(self) -> u8 {
        match self {
            Face::One => 1,
            Face::Two => 2,
            Face::Three => 3,
            Face::Four => 4,
            Face::Five => 5,
            Face::Six => 6,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Face::One),
            2 => Some(Face::Two),
            3 => Some(Face::Three),
            4 => Some(Face::Four),
            5 => Some(Face::Five),
            6 => Some(Face::Six),
            _ => None,
        }
    }

    /// Orientation that turns this face toward the viewer.
    ///
    /// The cube is built with 1 in front, 6 behind, 2 left, 5 right,
    /// 3 on top and 4 underneath. The roll axis (z) never discriminates.
    pub fn target_rotation(self) -> DVec3 {
        match self {
            Face::One => DVec3::new(0.0, 0.0, 0.0),
            Face::Two => DVec3::new(0.0, 90.0, 0.0),
            Face::Three => DVec3::new(-90.0, 0.0, 0.0),
            Face::Four => DVec3::new(90.0, 0.0, 0.0),
            Face::Five => DVec3::new(0.0, -90.0, 0.0),
            Face::Six => DVec3::new(180.0, 0.0, 0.0),
        }
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> u8 {
        face.value()
    }
}

impl TryFrom<u8> for Face {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Face::from_value(value).ok_or_else(|| format!("die face out of range: {value}"))
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Spin one face-discriminating axis from `current` onto `target`.
///
/// Drops the current partial turn, adds `turns` full turns and lands on
/// `target`. `current - current % 360` is an exact multiple of 360, so the
/// result modulo 360 equals `target` modulo 360 bit-for-bit.
#[inline]
fn spin_axis(current: f64, turns: u32, target: f64) -> f64 {
    let whole = current - current % FULL_TURN;
    whole + f64::from(turns) * FULL_TURN + target
}

/// Spin the roll axis a whole number of turns and snap it back to a neutral
/// multiple of 360.
#[inline]
fn spin_roll_axis(current: f64, turns: u32) -> f64 {
    round_to_turn(current + f64::from(turns) * FULL_TURN)
}

/// Rotation that spins a die from `current` to show `face`, with extra
/// whole turns from `tuning` on each axis for the tumble.
pub fn resolve_toward<S: DiceSource + ?Sized>(
    current: DVec3,
    face: Face,
    tuning: &RollTuning,
    source: &mut S,
) -> DVec3 {
    let target = face.target_rotation();
    let turns_x = source.turns(tuning.spin_x);
    let turns_y = source.turns(tuning.spin_y);
    let turns_z = source.turns(tuning.spin_z);

    DVec3::new(
        spin_axis(current.x, turns_x, target.x),
        spin_axis(current.y, turns_y, target.y),
        spin_roll_axis(current.z, turns_z),
    )
}

/// Roll one die: draw a fair face and the rotation that presents it
pub fn resolve_roll<S: DiceSource + ?Sized>(
    current: DVec3,
    tuning: &RollTuning,
    source: &mut S,
) -> (Face, DVec3) {
    let face = source.face();
    (face, resolve_toward(current, face, tuning, source))
}
