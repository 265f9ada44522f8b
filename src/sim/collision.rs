//! Collision detection and gate adjudication
//!
//! Trees are checked first with shrunken hitboxes. Gates are judged once, at
//! the moment the skier's centre row reaches the flags: threading the gap
//! scores, anything else ends the run.

use super::rect::Rect;
use super::state::{Flag, Tree};

/// Whether the player hits any tree.
///
/// Both boxes are scaled by `ratio` around their centres first, which
/// forgives grazing the edge of a sprite.
pub fn hits_tree(player: &Rect, trees: &[Tree], ratio: f32) -> bool {
    let hitbox = player.scaled(ratio);
    trees
        .iter()
        .any(|tree| hitbox.overlaps(&tree.rect.scaled(ratio)))
}

/// Strictly between the inner edges of the two flags
pub fn threads_gate(player: &Rect, left: &Rect, right: &Rect) -> bool {
    left.right() < player.left() && player.right() < right.left()
}

/// Find the partner of `flags[index]`: the first unprocessed flag on
/// (almost) the same row.
pub fn find_pair(flags: &[Flag], index: usize, processed: &[bool], epsilon: f32) -> Option<usize> {
    let row = flags[index].rect.top();
    (0..flags.len()).find(|&i| {
        i != index && !processed[i] && (flags[i].rect.top() - row).abs() < epsilon
    })
}

/// Result of judging every gate at the player's row this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateReport {
    /// Gates threaded this frame
    pub passed: u32,
    /// A gate was missed; the run is over
    pub missed: bool,
}

/// Judge every gate whose row the player's centre has reached.
///
/// Passed gates have both flags marked. Judging stops at the first miss so
/// at most one terminal outcome is reported per frame. A flag with no
/// partner yet is left for a later frame.
pub fn adjudicate_gates(player: &Rect, flags: &mut [Flag], epsilon: f32) -> GateReport {
    let mut report = GateReport::default();
    let mut processed = vec![false; flags.len()];
    let center_y = player.center().y;

    for i in 0..flags.len() {
        if processed[i] || report.missed {
            continue;
        }
        if flags[i].passed || !flags[i].rect.spans_row(center_y) {
            continue;
        }
        let Some(j) = find_pair(flags, i, &processed, epsilon) else {
            continue;
        };
        processed[i] = true;
        processed[j] = true;

        let (left, right) = if flags[i].is_left() { (i, j) } else { (j, i) };
        if threads_gate(player, &flags[left].rect, &flags[right].rect) {
            flags[i].passed = true;
            flags[j].passed = true;
            report.passed += 1;
        } else {
            report.missed = true;
        }
    }

    report
}
