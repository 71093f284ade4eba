//! Fixed timestep table tick
//!
//! Hosts collect control input during a frame and feed it here once per
//! fixed step. One-shot inputs are applied before the settle timer advances.

use super::source::DiceSource;
use super::state::DiceTable;

/// Control input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Roll button pressed
    pub roll: bool,
    /// +/- die count buttons (net presses this tick)
    pub count_delta: i32,
    /// Absolute die count request (restored from settings, URL, ...)
    pub set_count: Option<usize>,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        !self.roll && self.count_delta == 0 && self.set_count.is_none()
    }
}

/// Apply `input` and advance the table by one fixed step
pub fn tick<S: DiceSource>(table: &mut DiceTable<S>, input: &TickInput, dt: f32) {
    // Count changes land before the roll so the roll sees the new table
    if let Some(count) = input.set_count {
        table.set_die_count(count);
    }
    if input.count_delta != 0 {
        table.adjust_die_count(input.count_delta);
    }
    if input.roll {
        table.roll();
    }

    table.advance(dt);
}
