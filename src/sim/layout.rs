//! Table layout: where each die comes to rest
//!
//! Positions are table-space points centered on the table origin. Every roll
//! lays out all active dice from scratch; nothing carries over between rolls.

use glam::Vec2;

use super::source::DiceSource;
use crate::tuning::RollTuning;

/// Result of laying out one roll
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// One position per die, in die order
    pub positions: Vec<Vec2>,
    /// How many dice ran out of attempts and took their grid slot
    pub fallbacks: usize,
}

/// Slot `index` of the two-column fallback grid, centered on the origin.
///
/// Column is `index % 2`, row is `index / 2`; neighbors sit `spacing` apart.
pub fn grid_slot(index: usize, spacing: f32) -> Vec2 {
    let col = (index % 2) as f32;
    let row = (index / 2) as f32;
    Vec2::new((col - 0.5) * spacing, (row - 0.5) * spacing)
}

/// Uniform point in the centered placement rectangle
fn sample_point<S: DiceSource + ?Sized>(tuning: &RollTuning, source: &mut S) -> Vec2 {
    let x = (source.unit() - 0.5) * 2.0 * tuning.bounds_x;
    let y = (source.unit() - 0.5) * 2.0 * tuning.bounds_y;
    Vec2::new(x, y)
}

fn is_clear(candidate: Vec2, placed: &[Vec2], min_separation: f32) -> bool {
    placed
        .iter()
        .all(|p| p.distance(candidate) >= min_separation)
}

/// Lay out `count` dice so that no two are closer than the minimum separation.
///
/// Each die gets up to `max_attempts` random samples; the first one clear of
/// every die already placed wins. A die that exhausts its attempts takes its
/// grid slot instead.
pub fn layout_dice<S: DiceSource + ?Sized>(
    count: usize,
    tuning: &RollTuning,
    source: &mut S,
) -> Layout {
    let mut positions = Vec::with_capacity(count);
    let mut fallbacks = 0;

    for index in 0..count {
        let accepted = (0..tuning.max_attempts)
            .map(|_| sample_point(tuning, source))
            .find(|&candidate| is_clear(candidate, &positions, tuning.min_separation));

        let position = match accepted {
            Some(position) => position,
            None => {
                fallbacks += 1;
                grid_slot(index, tuning.min_separation)
            }
        };
        positions.push(position);
    }

    if fallbacks > 0 {
        log::warn!("Layout fell back to the grid for {fallbacks} of {count} dice");
    }

    Layout {
        positions,
        fallbacks,
    }
}

/// Positions for `count` dice (see [`layout_dice`])
pub fn place_dice<S: DiceSource + ?Sized>(
    count: usize,
    tuning: &RollTuning,
    source: &mut S,
) -> Vec<Vec2> {
    layout_dice(count, tuning, source).positions
}
