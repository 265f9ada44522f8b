//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here so a run can be
//! re-tuned from a JSON file without a rebuild. Defaults match `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_bottom_margin: f32,
    /// Pixels per frame while a steer key is held
    pub player_speed: f32,

    // === Obstacles ===
    pub tree_width: f32,
    pub tree_height: f32,
    pub flag_width: f32,
    pub flag_pennant_width: f32,
    pub flag_height: f32,

    // === Speed progression ===
    /// Pixels per frame at the start of a run
    pub initial_scroll_speed: f32,
    pub speed_increase_factor: f32,
    pub speed_threshold_step: u32,

    // === Gates ===
    pub gate_padding: f32,
    pub max_gate_gap: f32,
    pub gate_score: u32,
    pub gate_pair_epsilon: f32,

    // === Spawning ===
    pub spawn_delay_ms: f64,
    pub tree_chance: f32,
    pub gate_chance: f32,

    // === Collision ===
    pub tree_hitbox_ratio: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_bottom_margin: PLAYER_BOTTOM_MARGIN,
            player_speed: PLAYER_SPEED,

            tree_width: TREE_WIDTH,
            tree_height: TREE_HEIGHT,
            flag_width: FLAG_WIDTH,
            flag_pennant_width: FLAG_PENNANT_WIDTH,
            flag_height: FLAG_HEIGHT,

            initial_scroll_speed: INITIAL_SCROLL_SPEED,
            speed_increase_factor: SPEED_INCREASE_FACTOR,
            speed_threshold_step: SPEED_THRESHOLD_STEP,

            gate_padding: GATE_PADDING,
            max_gate_gap: MAX_GATE_GAP,
            gate_score: GATE_SCORE,
            gate_pair_epsilon: GATE_PAIR_EPSILON,

            spawn_delay_ms: SPAWN_DELAY_MS,
            tree_chance: TREE_CHANCE,
            gate_chance: GATE_CHANCE,

            tree_hitbox_ratio: TREE_HITBOX_RATIO,
        }
    }
}

impl Tuning {
    /// Narrowest legal gate: the player plus padding on both sides
    pub fn min_gate_gap(&self) -> f32 {
        self.player_width + 2.0 * self.gate_padding
    }

    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No tuning file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_gate_gap() {
        let tuning = Tuning::default();
        assert_eq!(tuning.min_gate_gap(), 80.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "initial_scroll_speed": 6.0 }"#).unwrap();
        assert_eq!(tuning.initial_scroll_speed, 6.0);
        assert_eq!(tuning.screen_width, SCREEN_WIDTH);
        assert_eq!(tuning.gate_score, GATE_SCORE);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let tuning = Tuning::load(dir.path().join("nope.json"));
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_load_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Tuning::load(&path), Tuning::default());
    }
}
