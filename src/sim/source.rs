//! Random source consumed by the roll engine
//!
//! Any `rand::Rng` is a dice source. Hosts that need to load the dice
//! (replays, demos, tests) implement the trait themselves.

use rand::Rng;

use super::face::Face;
use crate::tuning::SpinRange;

/// Fair, infinite source of dice randomness
pub trait DiceSource {
    /// A face drawn uniformly from 1..=6
    fn face(&mut self) -> Face;

    /// A whole number of turns drawn uniformly from `range`
    fn turns(&mut self, range: SpinRange) -> u32;

    /// A float drawn uniformly from [0, 1)
    fn unit(&mut self) -> f32;
}

impl<R: Rng> DiceSource for R {
    fn face(&mut self) -> Face {
        Face::ALL[self.random_range(0..Face::ALL.len())]
    }

    fn turns(&mut self, range: SpinRange) -> u32 {
        self.random_range(range.min..=range.max)
    }

    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}
