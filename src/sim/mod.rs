//! Roll simulation module
//!
//! All roll logic lives here. It is pure and analytic:
//! - No physics: rotations and positions are computed, not simulated
//! - Randomness only through a `DiceSource` (seeded `Pcg32` by default)
//! - Stable die order (by die id)
//! - No rendering or platform dependencies

pub mod face;
pub mod layout;
pub mod source;
pub mod state;
pub mod tick;

pub use face::{Face, resolve_roll, resolve_toward};
pub use layout::{Layout, grid_slot, layout_dice, place_dice};
pub use source::DiceSource;
pub use state::{DiceTable, Die, RollEvent, RollOutcome, RollPhase, TableSnapshot};
pub use tick::{TickInput, tick};
