//! Horace Skis - An endless downhill slalom arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, scrolling, gates, game state)
//! - `game`: Frame-stepping shell that owns the session and the score store
//! - `renderer`: Scene snapshots, parallax backdrop and the WebGPU pipeline
//! - `platform`: Browser/native platform abstraction (clocks)
//! - `highscores`: Persisted top-10 score list
//! - `tuning`: Data-driven game balance
//! - `ui`: Screen text layout

pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use highscores::{FileScoreStore, HighScores, MemoryScoreStore, ScoreStore};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frames per second the per-frame speeds are expressed against
    pub const FRAME_RATE: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player collision box
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    /// Gap between the player's feet and the bottom of the screen
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;
    /// Horizontal steering speed (pixels per frame)
    pub const PLAYER_SPEED: f32 = 7.0;

    /// Tree dimensions
    pub const TREE_WIDTH: f32 = 30.0;
    pub const TREE_HEIGHT: f32 = 40.0;

    /// Flag geometry: a pole plus a pennant pointing away from the gate
    pub const FLAG_POLE_WIDTH: f32 = 5.0;
    pub const FLAG_PENNANT_WIDTH: f32 = 25.0;
    pub const FLAG_WIDTH: f32 = FLAG_POLE_WIDTH + FLAG_PENNANT_WIDTH;
    pub const FLAG_HEIGHT: f32 = 30.0;

    /// Scroll speed at the start of a run (pixels per frame)
    pub const INITIAL_SCROLL_SPEED: f32 = 4.0;
    /// Multiplier applied each time a speed threshold is reached
    pub const SPEED_INCREASE_FACTOR: f32 = 1.10;
    /// Score distance between speed increases (also the first threshold)
    pub const SPEED_THRESHOLD_STEP: u32 = 100;

    /// Minimum slack on each side of the player inside a gate
    pub const GATE_PADDING: f32 = 25.0;
    /// Widest gap between the inner poles of a gate
    pub const MAX_GATE_GAP: f32 = 350.0;
    /// Points for threading a gate
    pub const GATE_SCORE: u32 = 10;
    /// Flags closer than this vertically belong to the same gate
    pub const GATE_PAIR_EPSILON: f32 = 5.0;

    /// Minimum time between spawn attempts
    pub const SPAWN_DELAY_MS: f64 = 800.0;
    /// Probability a spawn attempt yields a tree
    pub const TREE_CHANCE: f32 = 0.45;
    /// Probability a spawn attempt yields a gate
    pub const GATE_CHANCE: f32 = 0.45;

    /// Hitbox scale used for tree collisions (both boxes, centred)
    pub const TREE_HITBOX_RATIO: f32 = 0.8;
}
