//! Per-frame simulation tick
//!
//! One tick per rendered frame. While playing, the order is fixed:
//! input → spawn → move → collide/score → speed check.

use super::autopilot;
use super::collision::{adjudicate_gates, hits_tree};
use super::state::{CrashCause, GameEvent, GamePhase, GameState};
use crate::consts::FRAME_RATE;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steer left (held)
    pub steer_left: bool,
    /// Steer right (held)
    pub steer_right: bool,
    /// Start a run from the start screen (one-shot)
    pub start: bool,
    /// Leave the game-over screen (one-shot)
    pub restart: bool,
    /// Demo mode - the autopilot steers
    pub autopilot: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.clock_ms += dt as f64 * 1000.0;

    match state.phase {
        GamePhase::StartScreen => {
            if input.start {
                state.start_session();
            }
        }
        GamePhase::GameOver => {
            if input.restart {
                state.return_to_start();
            }
        }
        GamePhase::Playing => play_frame(state, input, dt),
    }
}

fn play_frame(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    // Speeds are tuned in pixels per 60 Hz frame
    let frames = dt * FRAME_RATE;

    let (left, right) = if input.autopilot {
        autopilot::steer(state)
    } else {
        (input.steer_left, input.steer_right)
    };

    // Spawn
    if let Some(spawn) = state
        .spawner
        .update(state.clock_ms, &mut state.rng, &state.tuning)
    {
        state.apply_spawn(spawn);
    }

    // Move
    state.player.steer(left, right, state.tuning.player_speed);
    state.player.advance(frames, state.tuning.screen_width);

    let speed = state.speed.current;
    let bottom = state.tuning.screen_height;
    for tree in &mut state.trees {
        tree.advance(speed, frames);
    }
    for flag in &mut state.flags {
        flag.advance(speed, frames);
    }
    state.trees.retain(|t| t.rect.top() <= bottom);
    state.flags.retain(|f| f.rect.top() <= bottom);

    // Collide
    let player = state.player.rect;
    if hits_tree(&player, &state.trees, state.tuning.tree_hitbox_ratio) {
        state.end_session(CrashCause::Tree);
        return;
    }

    let report = adjudicate_gates(&player, &mut state.flags, state.tuning.gate_pair_epsilon);
    for _ in 0..report.passed {
        state.score += state.tuning.gate_score;
        log::debug!("Gate passed, score {}", state.score);
        state.events.push(GameEvent::GatePassed { score: state.score });
    }
    if report.missed {
        state.end_session(CrashCause::MissedGate);
        return;
    }

    // Speed check
    if state.speed.update(state.score, &state.tuning) {
        log::info!(
            "Score {}: speed increased to {:.2}",
            state.score,
            state.speed.current
        );
        state.events.push(GameEvent::SpeedIncreased {
            score: state.score,
            speed: state.speed.current,
        });
    }
}
