//! Ball-in-hole detection
//!
//! A hole fires when the ball's center enters it and re-arms once the ball
//! has left, so each approach produces one fall-in.

use glam::Vec2;

use super::state::{DeferredAction, GameState, Hole};

/// A hole the ball has just entered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleEntry {
    pub index: usize,
    pub label: u32,
    pub winning: bool,
}

/// Indices of every hole containing `point`
pub fn overlapping_holes(point: Vec2, holes: &[Hole]) -> Vec<usize> {
    holes
        .iter()
        .enumerate()
        .filter(|(_, hole)| hole.contains(point))
        .map(|(i, _)| i)
        .collect()
}

/// Start the shrink/fade and schedule the reset
pub fn fall_in(state: &mut GameState) {
    state.ball.visual.fall_in(state.physics.fall_in_duration);
    state.schedule(DeferredAction::Reset, state.physics.reset_delay);
}

/// Test the ball against every hole, triggering a fall-in for each hole
/// entered this step. Winning holes take the same path as ordinary ones.
pub fn detect_collisions(state: &mut GameState) -> Vec<HoleEntry> {
    let inside = overlapping_holes(state.ball.center(), &state.holes);

    let entries: Vec<HoleEntry> = inside
        .iter()
        .filter(|&&i| !state.inside_holes.contains(&i))
        .map(|&index| {
            let hole = &state.holes[index];
            HoleEntry {
                index,
                label: hole.label,
                winning: hole.winning,
            }
        })
        .collect();

    for _ in &entries {
        fall_in(state);
    }
    state.inside_holes = inside;
    entries
}
