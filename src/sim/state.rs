//! Game state and core simulation types
//!
//! Everything a session needs lives in one owned `GameState` that each
//! subsystem receives explicitly.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::rect::Rect;
use super::spawn::{Spawn, Spawner};
use super::speed::SpeedController;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title, instructions and high scores; waiting for start
    StartScreen,
    /// Active run
    Playing,
    /// Run ended; waiting for restart
    GameOver,
}

/// Which way the skier is leaning (sprite variant)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lean {
    Left,
    Straight,
    Right,
}

/// The skier
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal velocity in pixels per frame, derived from input every tick
    pub vel_x: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let mut player = Self {
            rect: Rect::new(0.0, 0.0, tuning.player_width, tuning.player_height),
            vel_x: 0.0,
        };
        player.reset(tuning);
        player
    }

    /// Centre horizontally, feet just above the bottom of the screen
    pub fn reset(&mut self, tuning: &Tuning) {
        self.rect.size.x = tuning.player_width;
        self.rect.size.y = tuning.player_height;
        self.rect.pos.x = ((tuning.screen_width - tuning.player_width) / 2.0).floor();
        self.rect.pos.y = tuning.screen_height - tuning.player_bottom_margin - tuning.player_height;
        self.vel_x = 0.0;
    }

    /// Set velocity from held steer keys (right wins if both are held)
    pub fn steer(&mut self, left: bool, right: bool, speed: f32) {
        self.vel_x = 0.0;
        if left {
            self.vel_x = -speed;
        }
        if right {
            self.vel_x = speed;
        }
    }

    /// Move by the current velocity and clamp to the playfield
    pub fn advance(&mut self, frames: f32, screen_width: f32) {
        let max_x = (screen_width - self.rect.size.x).max(0.0);
        self.rect.pos.x = (self.rect.pos.x + self.vel_x * frames).clamp(0.0, max_x);
    }

    pub fn lean(&self) -> Lean {
        if self.vel_x < 0.0 {
            Lean::Left
        } else if self.vel_x > 0.0 {
            Lean::Right
        } else {
            Lean::Straight
        }
    }
}

/// Cosmetic tree variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    Pine,
    LayeredPine,
}

/// A tree obstacle
#[derive(Debug, Clone)]
pub struct Tree {
    pub id: u32,
    pub kind: TreeKind,
    pub rect: Rect,
    pub vel_y: f32,
}

impl Tree {
    /// New tree just above the visible screen
    pub fn new(id: u32, x: f32, kind: TreeKind, speed: f32, tuning: &Tuning) -> Self {
        Self {
            id,
            kind,
            rect: Rect::new(x, -tuning.tree_height, tuning.tree_width, tuning.tree_height),
            vel_y: speed,
        }
    }

    /// Scroll down at the current speed
    pub fn advance(&mut self, speed: f32, frames: f32) {
        self.vel_y = speed;
        self.rect.pos.y += self.vel_y * frames;
    }
}

/// Which side of a gate a flag marks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagColor {
    Green,
    Red,
}

/// One half of a gate
#[derive(Debug, Clone)]
pub struct Flag {
    pub id: u32,
    pub side: FlagSide,
    pub color: FlagColor,
    pub rect: Rect,
    pub vel_y: f32,
    /// Set once the skier has threaded this gate
    pub passed: bool,
}

impl Flag {
    /// New flag whose pole's inner edge sits at `inner_x`.
    ///
    /// The pennant points away from the gate, so a left flag extends to the
    /// left of its pole and a right flag to the right.
    pub fn new(id: u32, side: FlagSide, inner_x: f32, speed: f32, tuning: &Tuning) -> Self {
        let x = match side {
            FlagSide::Left => inner_x - tuning.flag_pennant_width,
            FlagSide::Right => inner_x + tuning.flag_pennant_width - tuning.flag_width,
        };
        let color = match side {
            FlagSide::Left => FlagColor::Green,
            FlagSide::Right => FlagColor::Red,
        };
        Self {
            id,
            side,
            color,
            rect: Rect::new(x, -tuning.flag_height, tuning.flag_width, tuning.flag_height),
            vel_y: speed,
            passed: false,
        }
    }

    pub fn is_left(&self) -> bool {
        self.side == FlagSide::Left
    }

    /// Scroll down at the current speed
    pub fn advance(&mut self, speed: f32, frames: f32) {
        self.vel_y = speed;
        self.rect.pos.y += self.vel_y * frames;
    }
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    Tree,
    MissedGate,
}

/// Things that happened during a tick, for shells to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    SessionStarted,
    GatePassed { score: u32 },
    SpeedIncreased { score: u32, speed: f32 },
    GameOver { score: u32, cause: CrashCause },
    ReturnedToStart,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for reproducibility
    pub seed: u64,
    /// Gameplay numbers for this state
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Score of the current (or just finished) run
    pub score: u32,
    /// Score of the last completed run, shown on the start screen
    pub last_score: Option<u32>,
    /// Scroll speed and next speed threshold
    pub speed: SpeedController,
    /// Spawn timer
    pub spawner: Spawner,
    /// Monotonic simulation clock (milliseconds)
    pub clock_ms: f64,
    /// Playing ticks in the current run
    pub time_ticks: u64,
    pub player: Player,
    /// Live trees (spawn order)
    pub trees: Vec<Tree>,
    /// Live flags (spawn order, pairs adjacent)
    pub flags: Vec<Flag>,
    /// Events emitted since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state on the start screen
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::StartScreen,
            score: 0,
            last_score: None,
            speed: SpeedController::new(&tuning),
            spawner: Spawner::new(0.0),
            clock_ms: 0.0,
            time_ticks: 0,
            player: Player::new(&tuning),
            trees: Vec::new(),
            flags: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current scroll speed in pixels per frame
    pub fn scroll_speed(&self) -> f32 {
        self.speed.current
    }

    /// Reset everything a run owns and enter `Playing`
    pub fn start_session(&mut self) {
        self.score = 0;
        self.speed.reset(&self.tuning);
        self.spawner.reset(self.clock_ms);
        self.trees.clear();
        self.flags.clear();
        self.player.reset(&self.tuning);
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::SessionStarted);
        log::info!("Run started (seed {})", self.seed);
    }

    /// Terminal transition of a run
    pub fn end_session(&mut self, cause: CrashCause) {
        match cause {
            CrashCause::Tree => log::info!("Hit a tree! Game over with {} points", self.score),
            CrashCause::MissedGate => {
                log::info!("Missed the gate! Game over with {} points", self.score)
            }
        }
        self.last_score = Some(self.score);
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            cause,
        });
    }

    /// Leave the game-over screen; `last_score` stays visible
    pub fn return_to_start(&mut self) {
        self.phase = GamePhase::StartScreen;
        self.events.push(GameEvent::ReturnedToStart);
    }

    /// Materialise a spawner decision as entities at the current speed
    pub fn apply_spawn(&mut self, spawn: Spawn) {
        let speed = self.speed.current;
        match spawn {
            Spawn::Tree { x, kind } => {
                let id = self.next_entity_id();
                let tree = Tree::new(id, x, kind, speed, &self.tuning);
                self.trees.push(tree);
            }
            Spawn::Gate {
                left_inner,
                right_inner,
            } => {
                let left_id = self.next_entity_id();
                let right_id = self.next_entity_id();
                let left = Flag::new(left_id, FlagSide::Left, left_inner, speed, &self.tuning);
                let right = Flag::new(right_id, FlagSide::Right, right_inner, speed, &self.tuning);
                self.flags.push(left);
                self.flags.push(right);
            }
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_on_start_screen() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::StartScreen);
        assert_eq!(state.score, 0);
        assert_eq!(state.last_score, None);
        assert!(state.trees.is_empty());
        assert!(state.flags.is_empty());
    }

    #[test]
    fn test_player_starting_position() {
        let player = Player::new(&Tuning::default());
        assert_eq!(player.rect.left(), 385.0);
        assert_eq!(player.rect.bottom(), 580.0);
        assert_eq!(player.rect.center().x, 400.0);
    }

    #[test]
    fn test_player_clamped_to_screen() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.steer(true, false, 7.0);
        for _ in 0..200 {
            player.advance(1.0, tuning.screen_width);
        }
        assert_eq!(player.rect.left(), 0.0);
        assert_eq!(player.lean(), Lean::Left);

        player.steer(false, true, 7.0);
        for _ in 0..200 {
            player.advance(1.0, tuning.screen_width);
        }
        assert_eq!(player.rect.right(), tuning.screen_width);
        assert_eq!(player.lean(), Lean::Right);
    }

    #[test]
    fn test_both_steer_keys_go_right() {
        let mut player = Player::new(&Tuning::default());
        player.steer(true, true, 7.0);
        assert_eq!(player.vel_x, 7.0);
        player.steer(false, false, 7.0);
        assert_eq!(player.lean(), Lean::Straight);
    }

    #[test]
    fn test_flag_geometry() {
        let tuning = Tuning::default();
        let left = Flag::new(1, FlagSide::Left, 300.0, 4.0, &tuning);
        let right = Flag::new(2, FlagSide::Right, 500.0, 4.0, &tuning);
        // Poles sit on the inner side of each gate edge
        assert_eq!(left.rect.left(), 275.0);
        assert_eq!(left.rect.right(), 305.0);
        assert_eq!(right.rect.left(), 495.0);
        assert_eq!(right.rect.right(), 525.0);
        assert_eq!(left.rect.top(), -tuning.flag_height);
        assert_eq!(left.color, FlagColor::Green);
        assert_eq!(right.color, FlagColor::Red);
        assert!(!left.passed && !right.passed);
    }

    #[test]
    fn test_entities_refresh_speed() {
        let tuning = Tuning::default();
        let mut tree = Tree::new(1, 100.0, TreeKind::Pine, 4.0, &tuning);
        tree.advance(5.0, 1.0);
        assert_eq!(tree.vel_y, 5.0);
        assert_eq!(tree.rect.top(), -tuning.tree_height + 5.0);
    }

    #[test]
    fn test_start_and_end_session() {
        let mut state = GameState::new(7);
        state.score = 40;
        state.start_session();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);

        state.score = 30;
        state.end_session(CrashCause::Tree);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.last_score, Some(30));
        let events = state.drain_events();
        assert_eq!(events.first(), Some(&GameEvent::SessionStarted));
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                score: 30,
                cause: CrashCause::Tree
            })
        );
        assert!(state.events.is_empty());
    }
}
