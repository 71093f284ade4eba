//! Table state and the roll state machine
//!
//! The table owns every die. A roll computes a complete new snapshot (layout
//! first, then one face and rotation per die), swaps it in at once, and holds
//! it for the settle period before the outcome is published.

use glam::{DVec3, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::face::{Face, resolve_roll};
use super::layout::{grid_slot, layout_dice};
use super::source::DiceSource;
use crate::consts::{FULL_TURN, MAX_DICE, MIN_DICE};
use crate::tuning::RollTuning;

/// Where the table is in its roll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollPhase {
    /// Waiting for a roll; the last outcome (if any) is on display
    Idle,
    /// Dice are tumbling toward the committed snapshot
    Rolling,
}

/// One die on the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Die {
    /// Stable index on the table
    pub id: usize,
    /// Face showing, `None` until the die has been rolled
    pub value: Option<Face>,
    /// Cumulative rotation in degrees (x, y, z)
    pub rotation: DVec3,
    /// Resting point in table space
    pub position: Vec2,
}

impl Die {
    /// The die every table starts with: at rest, facing front, centered
    pub fn at_rest(id: usize) -> Self {
        Self {
            id,
            value: None,
            rotation: DVec3::ZERO,
            position: Vec2::ZERO,
        }
    }

    /// Draw order for the renderer (dice further down the table draw on top)
    pub fn depth_order(&self) -> i32 {
        self.position.y.floor() as i32
    }
}

/// Summary of a settled roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Face values in die order
    pub values: Vec<u8>,
    pub total: u32,
}

impl RollOutcome {
    pub fn from_faces(faces: impl IntoIterator<Item = Face>) -> Self {
        let values: Vec<u8> = faces.into_iter().map(Face::value).collect();
        let total = values.iter().map(|&v| u32::from(v)).sum();
        Self { values, total }
    }
}

/// Notable things that happened on the table, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RollEvent {
    /// A roll committed its snapshot and started tumbling
    Started { dice: usize },
    /// The tumble finished and the outcome is ready
    Settled(RollOutcome),
    /// The number of dice on the table changed
    CountChanged { dice: usize },
}

/// Read-only view of the table for renderers and web hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub dice: Vec<Die>,
    pub rolling: bool,
    pub outcome: Option<RollOutcome>,
}

/// The dice tray: owns the dice and sequences rolls
#[derive(Debug, Clone)]
pub struct DiceTable<S = Pcg32> {
    tuning: RollTuning,
    source: S,
    dice: Vec<Die>,
    phase: RollPhase,
    /// Seconds left before the current roll settles
    settle_remaining: f32,
    /// Outcome of the roll in flight, revealed when it settles
    pending: Option<RollOutcome>,
    last_outcome: Option<RollOutcome>,
    events: Vec<RollEvent>,
}

impl DiceTable<Pcg32> {
    /// A single-die table with a seeded generator (reproducible rolls)
    pub fn new(tuning: RollTuning, seed: u64) -> Self {
        Self::with_source(tuning, Pcg32::seed_from_u64(seed))
    }

    /// A single-die table seeded from the operating system
    pub fn from_entropy(tuning: RollTuning) -> Self {
        Self::with_source(tuning, Pcg32::from_os_rng())
    }
}

impl<S: DiceSource> DiceTable<S> {
    /// A single-die table drawing from `source`
    pub fn with_source(tuning: RollTuning, source: S) -> Self {
        Self {
            tuning,
            source,
            dice: vec![Die::at_rest(0)],
            phase: RollPhase::Idle,
            settle_remaining: 0.0,
            pending: None,
            last_outcome: None,
            events: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &RollTuning {
        &self.tuning
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn die_count(&self) -> usize {
        self.dice.len()
    }

    pub fn phase(&self) -> RollPhase {
        self.phase
    }

    pub fn is_rolling(&self) -> bool {
        self.phase == RollPhase::Rolling
    }

    /// Outcome of the most recent settled roll (cleared by rolls and count changes)
    pub fn last_outcome(&self) -> Option<&RollOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            dice: self.dice.clone(),
            rolling: self.is_rolling(),
            outcome: self.last_outcome.clone(),
        }
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<RollEvent> {
        std::mem::take(&mut self.events)
    }

    /// Set the number of dice, clamped to 1..=4.
    ///
    /// New dice get a random starting spin and a grid slot; removed dice come
    /// off the end. Ignored while a roll is settling. Returns whether the
    /// request was applied.
    pub fn set_die_count(&mut self, count: usize) -> bool {
        if self.is_rolling() {
            log::debug!("Ignoring die count change while rolling");
            return false;
        }

        let count = count.clamp(MIN_DICE, MAX_DICE);
        let current = self.dice.len();
        if count > current {
            for id in current..count {
                let rotation = DVec3::new(
                    f64::from(self.source.unit()) * FULL_TURN,
                    f64::from(self.source.unit()) * FULL_TURN,
                    0.0,
                );
                self.dice.push(Die {
                    id,
                    value: None,
                    rotation,
                    position: grid_slot(id, self.tuning.initial_spacing),
                });
            }
        } else {
            self.dice.truncate(count);
        }

        self.last_outcome = None;
        if count != current {
            log::debug!("Die count {current} -> {count}");
            self.events.push(RollEvent::CountChanged { dice: count });
        }
        true
    }

    /// Step the die count by `delta` (the +/- controls)
    pub fn adjust_die_count(&mut self, delta: i32) -> bool {
        let target = (self.dice.len() as i64 + i64::from(delta)).max(0) as usize;
        self.set_die_count(target)
    }

    /// Roll every die on the table.
    ///
    /// Returns `false` without touching anything if a roll is still settling.
    pub fn roll(&mut self) -> bool {
        if self.is_rolling() {
            log::debug!("Roll ignored: dice still settling");
            return false;
        }

        let count = self.dice.len();
        let layout = layout_dice(count, &self.tuning, &mut self.source);

        let mut next = Vec::with_capacity(count);
        for (die, position) in self.dice.iter().zip(layout.positions) {
            let (face, rotation) = resolve_roll(die.rotation, &self.tuning, &mut self.source);
            next.push(Die {
                id: die.id,
                value: Some(face),
                rotation,
                position,
            });
        }

        let outcome = RollOutcome::from_faces(next.iter().filter_map(|d| d.value));
        self.dice = next;
        self.phase = RollPhase::Rolling;
        self.settle_remaining = self.tuning.settle_secs;
        self.pending = Some(outcome);
        self.last_outcome = None;
        self.events.push(RollEvent::Started { dice: count });
        log::info!("Rolling {count} dice");

        // A zero settle time has nothing to wait for
        if self.settle_remaining <= 0.0 {
            self.settle();
        }
        true
    }

    /// Advance the settle timer by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if !self.is_rolling() {
            return;
        }
        self.settle_remaining -= dt;
        if self.settle_remaining <= 0.0 {
            self.settle();
        }
    }

    fn settle(&mut self) {
        self.phase = RollPhase::Idle;
        self.settle_remaining = 0.0;
        if let Some(outcome) = self.pending.take() {
            log::info!("Rolled {:?} = {}", outcome.values, outcome.total);
            self.events.push(RollEvent::Settled(outcome.clone()));
            self.last_outcome = Some(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::SpinRange;
    use crate::wrap_degrees;

    /// Loaded dice: always the same face, everything else from a real rng
    struct Loaded {
        face: Face,
        rng: Pcg32,
    }

    impl DiceSource for Loaded {
        fn face(&mut self) -> Face {
            self.face
        }

        fn turns(&mut self, range: SpinRange) -> u32 {
            self.rng.turns(range)
        }

        fn unit(&mut self) -> f32 {
            self.rng.unit()
        }
    }

    fn settle(table: &mut DiceTable<impl DiceSource>) {
        let secs = table.tuning().settle_secs;
        table.advance(secs + 0.01);
    }

    #[test]
    fn test_new_table_has_one_die_at_rest() {
        let table = DiceTable::new(RollTuning::default(), 1);
        assert_eq!(table.dice(), &[Die::at_rest(0)]);
        assert_eq!(table.phase(), RollPhase::Idle);
        assert!(table.last_outcome().is_none());
    }

    #[test]
    fn test_count_is_clamped() {
        let mut table = DiceTable::new(RollTuning::default(), 1);
        table.set_die_count(0);
        assert_eq!(table.die_count(), 1);
        table.set_die_count(99);
        assert_eq!(table.die_count(), 4);
        table.adjust_die_count(1);
        assert_eq!(table.die_count(), 4);
        table.adjust_die_count(-10);
        assert_eq!(table.die_count(), 1);
    }

    #[test]
    fn test_added_dice_start_on_grid_with_random_spin() {
        let mut table = DiceTable::new(RollTuning::default(), 3);
        table.set_die_count(3);
        let spacing = table.tuning().initial_spacing;
        for die in &table.dice()[1..] {
            assert_eq!(die.value, None);
            assert_eq!(die.position, grid_slot(die.id, spacing));
            assert!((0.0..FULL_TURN).contains(&die.rotation.x));
            assert!((0.0..FULL_TURN).contains(&die.rotation.y));
            assert_eq!(die.rotation.z, 0.0);
        }
    }

    #[test]
    fn test_set_count_is_idempotent() {
        let mut table = DiceTable::new(RollTuning::default(), 4);
        table.set_die_count(3);
        let before = table.dice().to_vec();
        table.set_die_count(3);
        assert_eq!(table.dice(), before.as_slice());
    }

    #[test]
    fn test_growing_keeps_existing_dice() {
        let mut table = DiceTable::new(RollTuning::default(), 5);
        table.set_die_count(2);
        table.roll();
        settle(&mut table);
        let before = table.dice().to_vec();
        table.set_die_count(4);
        assert_eq!(&table.dice()[..2], before.as_slice());
    }

    #[test]
    fn test_count_sequence_keeps_identity() {
        let mut table = DiceTable::new(RollTuning::default(), 6);
        let original = table.dice()[0].clone();
        table.set_die_count(1);
        table.set_die_count(4);
        let added = table.dice()[1].clone();
        table.set_die_count(2);

        assert_eq!(table.die_count(), 2);
        assert_eq!(table.dice()[0], original);
        assert_eq!(table.dice()[1], added);
        let ids: Vec<usize> = table.dice().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_count_change_clears_outcome() {
        let mut table = DiceTable::new(RollTuning::default(), 7);
        table.roll();
        settle(&mut table);
        assert!(table.last_outcome().is_some());
        table.set_die_count(2);
        assert!(table.last_outcome().is_none());
    }

    #[test]
    fn test_roll_state_machine() {
        let mut table = DiceTable::new(RollTuning::default(), 8);
        table.set_die_count(2);
        table.drain_events();

        assert!(table.roll());
        assert!(table.is_rolling());
        let committed = table.dice().to_vec();

        // Second roll before settling is a no-op
        assert!(!table.roll());
        assert_eq!(table.dice(), committed.as_slice());
        assert_eq!(table.drain_events(), vec![RollEvent::Started { dice: 2 }]);

        // Not settled halfway through
        table.advance(table.tuning().settle_secs / 2.0);
        assert!(table.is_rolling());
        assert!(table.last_outcome().is_none());

        settle(&mut table);
        assert_eq!(table.phase(), RollPhase::Idle);
        let outcome = table.last_outcome().cloned().unwrap();
        assert_eq!(outcome.values.len(), 2);
        assert_eq!(table.drain_events(), vec![RollEvent::Settled(outcome)]);
    }

    #[test]
    fn test_count_change_ignored_while_rolling() {
        let mut table = DiceTable::new(RollTuning::default(), 9);
        table.roll();
        assert!(!table.set_die_count(3));
        assert_eq!(table.die_count(), 1);
        settle(&mut table);
        assert!(table.set_die_count(3));
        assert_eq!(table.die_count(), 3);
    }

    #[test]
    fn test_every_die_shows_its_value() {
        let mut table = DiceTable::new(RollTuning::default(), 10);
        table.set_die_count(4);
        for _ in 0..25 {
            table.roll();
            settle(&mut table);
            for die in table.dice() {
                let face = die.value.unwrap();
                let target = face.target_rotation();
                assert_eq!(wrap_degrees(die.rotation.x), wrap_degrees(target.x));
                assert_eq!(wrap_degrees(die.rotation.y), wrap_degrees(target.y));
                assert_eq!(wrap_degrees(die.rotation.z), 0.0);
            }
            let outcome = table.last_outcome().unwrap();
            let values: Vec<u8> = table.dice().iter().map(|d| d.value.unwrap().value()).collect();
            assert_eq!(outcome.values, values);
            assert_eq!(outcome.total, values.iter().map(|&v| u32::from(v)).sum::<u32>());
        }
    }

    #[test]
    fn test_loaded_six_from_rest() {
        let source = Loaded {
            face: Face::Six,
            rng: Pcg32::seed_from_u64(11),
        };
        let mut table = DiceTable::with_source(RollTuning::default(), source);
        assert_eq!(table.dice()[0].rotation, DVec3::ZERO);

        table.roll();
        settle(&mut table);

        let die = &table.dice()[0];
        let target = Face::Six.target_rotation();
        assert_eq!(die.value, Some(Face::Six));
        assert_eq!(wrap_degrees(die.rotation.x), wrap_degrees(target.x));
        assert_eq!(wrap_degrees(die.rotation.y), wrap_degrees(target.y));
        assert_eq!(wrap_degrees(die.rotation.z), wrap_degrees(target.z));
        assert_eq!(
            table.last_outcome(),
            Some(&RollOutcome {
                values: vec![6],
                total: 6
            })
        );
    }

    #[test]
    fn test_zero_settle_time_settles_immediately() {
        let tuning = RollTuning {
            settle_secs: 0.0,
            ..RollTuning::default()
        };
        let mut table = DiceTable::new(tuning, 12);
        assert!(table.roll());
        assert!(!table.is_rolling());
        assert!(table.last_outcome().is_some());
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = DiceTable::new(RollTuning::default(), 99);
        let mut b = DiceTable::new(RollTuning::default(), 99);
        for table in [&mut a, &mut b] {
            table.set_die_count(4);
            table.roll();
            settle(table);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_depth_order_follows_table_y() {
        let mut near = Die::at_rest(0);
        near.position = Vec2::new(0.0, 80.7);
        let mut far = Die::at_rest(1);
        far.position = Vec2::new(0.0, -20.2);
        assert_eq!(near.depth_order(), 80);
        assert_eq!(far.depth_order(), -21);
        assert!(near.depth_order() > far.depth_order());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut table = DiceTable::new(RollTuning::default(), 13);
        table.roll();
        settle(&mut table);
        let json = serde_json::to_string(&table.snapshot()).unwrap();
        let back: TableSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table.snapshot());
    }
}
