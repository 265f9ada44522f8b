//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`'s `dt`
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod rect;
pub mod spawn;
pub mod speed;
pub mod state;
pub mod tick;

pub use collision::{GateReport, adjudicate_gates, hits_tree, threads_gate};
pub use rect::Rect;
pub use spawn::{Spawn, SpawnRoll, Spawner};
pub use speed::SpeedController;
pub use state::{
    CrashCause, Flag, FlagColor, FlagSide, GameEvent, GamePhase, GameState, Lean, Player, Tree,
    TreeKind,
};
pub use tick::{TickInput, tick};
