//! Time-gated obstacle spawning
//!
//! Every `spawn_delay_ms` the spawner rolls once: a tree, a gate, or nothing.
//! The timer restarts on every roll, whatever the outcome.

use rand::Rng;

use super::state::TreeKind;
use crate::tuning::Tuning;

/// Outcome of the weighted spawn roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRoll {
    Tree,
    Gate,
    Nothing,
}

/// A spawn decision (geometry only, entities are built by `GameState`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spawn {
    Tree { x: f32, kind: TreeKind },
    /// Inner pole edges of the two flags
    Gate { left_inner: f32, right_inner: f32 },
}

/// Map a uniform sample in `[0, 1)` to a spawn outcome
pub fn roll(sample: f32, tuning: &Tuning) -> SpawnRoll {
    if sample < tuning.tree_chance {
        SpawnRoll::Tree
    } else if sample < tuning.tree_chance + tuning.gate_chance {
        SpawnRoll::Gate
    } else {
        SpawnRoll::Nothing
    }
}

/// Inclusive range of gate centres that keep both flags on screen.
///
/// `None` when the gap is too wide for the playfield.
pub fn gate_center_range(gap: i32, tuning: &Tuning) -> Option<(i32, i32)> {
    let flag_width = tuning.flag_width as i32;
    let min_center = flag_width + gap / 2;
    let max_center = tuning.screen_width as i32 - flag_width - gap / 2;
    (min_center < max_center).then_some((min_center, max_center))
}

/// Spawn timer
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    /// Clock reading of the last roll
    pub last_attempt_ms: f64,
}

impl Spawner {
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_attempt_ms: now_ms,
        }
    }

    pub fn reset(&mut self, now_ms: f64) {
        self.last_attempt_ms = now_ms;
    }

    pub fn is_due(&self, now_ms: f64, tuning: &Tuning) -> bool {
        now_ms - self.last_attempt_ms > tuning.spawn_delay_ms
    }

    /// Roll for a spawn if the delay has elapsed
    pub fn update<R: Rng>(&mut self, now_ms: f64, rng: &mut R, tuning: &Tuning) -> Option<Spawn> {
        if !self.is_due(now_ms, tuning) {
            return None;
        }
        self.last_attempt_ms = now_ms;

        match roll(rng.random::<f32>(), tuning) {
            SpawnRoll::Tree => Some(pick_tree(rng, tuning)),
            SpawnRoll::Gate => pick_gate(rng, tuning),
            SpawnRoll::Nothing => None,
        }
    }
}

fn pick_tree<R: Rng>(rng: &mut R, tuning: &Tuning) -> Spawn {
    let max_x = (tuning.screen_width - tuning.tree_width).max(0.0) as i32;
    let x = rng.random_range(0..=max_x) as f32;
    let kind = if rng.random_bool(0.5) {
        TreeKind::Pine
    } else {
        TreeKind::LayeredPine
    };
    Spawn::Tree { x, kind }
}

fn pick_gate<R: Rng>(rng: &mut R, tuning: &Tuning) -> Option<Spawn> {
    let min_gap = tuning.min_gate_gap() as i32;
    let max_gap = tuning.max_gate_gap as i32;
    if min_gap > max_gap {
        return None;
    }
    let gap = rng.random_range(min_gap..=max_gap);

    let Some((min_center, max_center)) = gate_center_range(gap, tuning) else {
        log::debug!("Skipping gate: gap {} does not fit", gap);
        return None;
    };
    let center = rng.random_range(min_center..=max_center);

    Some(Spawn::Gate {
        left_inner: (center - gap / 2) as f32,
        right_inner: (center + gap / 2) as f32,
    })
}
