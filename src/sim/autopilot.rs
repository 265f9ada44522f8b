//! Demo-mode driver
//!
//! Produces steer commands from the current state: dodge a tree that is about
//! to reach the skier, otherwise line up with the nearest gate ahead.

use super::collision::find_pair;
use super::state::GameState;

/// How far above the skier a tree counts as a threat (pixels)
const TREE_LOOKAHEAD: f32 = 160.0;
/// Extra horizontal clearance kept around trees
const TREE_MARGIN: f32 = 6.0;

/// Steer keys to hold this tick: `(left, right)`
pub fn steer(state: &GameState) -> (bool, bool) {
    let player = &state.player.rect;
    let center_x = player.center().x;
    let deadzone = state.tuning.player_speed;

    if let Some(target) = dodge_target(state) {
        return toward(center_x, target, deadzone);
    }
    if let Some(target) = next_gate_center(state) {
        return toward(center_x, target, deadzone);
    }
    toward(center_x, state.tuning.screen_width / 2.0, deadzone * 4.0)
}

fn toward(from: f32, to: f32, deadzone: f32) -> (bool, bool) {
    if to < from - deadzone {
        (true, false)
    } else if to > from + deadzone {
        (false, true)
    } else {
        (false, false)
    }
}

/// Horizontal position to escape to if a tree is about to land on the skier
fn dodge_target(state: &GameState) -> Option<f32> {
    let player = &state.player.rect;
    let threat = state
        .trees
        .iter()
        .filter(|t| t.rect.bottom() <= player.bottom())
        .filter(|t| player.top() - t.rect.bottom() < TREE_LOOKAHEAD)
        .filter(|t| {
            t.rect.left() - TREE_MARGIN < player.right()
                && player.left() < t.rect.right() + TREE_MARGIN
        })
        .max_by(|a, b| a.rect.top().total_cmp(&b.rect.top()))?;

    let half = player.size.x / 2.0;
    let go_left = threat.rect.left() - TREE_MARGIN - half;
    let go_right = threat.rect.right() + TREE_MARGIN + half;
    let max_center = state.tuning.screen_width - half;

    let center_x = player.center().x;
    let prefer_left = center_x < threat.rect.center().x;
    match (prefer_left, go_left >= half, go_right <= max_center) {
        (true, true, _) | (false, true, false) => Some(go_left),
        _ => Some(go_right),
    }
}

/// Midpoint between the inner edges of the closest unpassed gate ahead
fn next_gate_center(state: &GameState) -> Option<f32> {
    let player = &state.player.rect;
    let processed = vec![false; state.flags.len()];
    let epsilon = state.tuning.gate_pair_epsilon;

    state
        .flags
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.passed && f.rect.top() <= player.center().y)
        .filter_map(|(i, f)| {
            let j = find_pair(&state.flags, i, &processed, epsilon)?;
            let other = &state.flags[j];
            let (left, right) = if f.is_left() { (f, other) } else { (other, f) };
            Some((f.rect.top(), (left.rect.right() + right.rect.left()) / 2.0))
        })
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, center)| center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::Spawn;
    use crate::sim::state::TreeKind;

    fn playing_state() -> GameState {
        let mut state = GameState::new(1);
        state.start_session();
        state
    }

    #[test]
    fn test_idles_toward_center() {
        let state = playing_state();
        assert_eq!(steer(&state), (false, false));
    }

    #[test]
    fn test_heads_for_gate() {
        let mut state = playing_state();
        state.apply_spawn(Spawn::Gate {
            left_inner: 100.0,
            right_inner: 200.0,
        });
        for flag in &mut state.flags {
            flag.rect.pos.y = 300.0;
        }
        assert_eq!(steer(&state), (true, false));
    }

    #[test]
    fn test_dodges_tree_above() {
        let mut state = playing_state();
        state.apply_spawn(Spawn::Tree {
            x: 390.0,
            kind: TreeKind::Pine,
        });
        state.trees[0].rect.pos.y = 450.0;
        // Tree centre is right of the skier centre: escape left
        assert_eq!(steer(&state), (true, false));
    }

    #[test]
    fn test_dodge_away_from_wall() {
        let mut state = playing_state();
        state.player.rect.pos.x = 0.0;
        state.apply_spawn(Spawn::Tree {
            x: 10.0,
            kind: TreeKind::Pine,
        });
        state.trees[0].rect.pos.y = 450.0;
        assert_eq!(steer(&state), (false, true));
    }
}
