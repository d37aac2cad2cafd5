//! Fixed timestep simulation tick
//!
//! One call advances every clock by `dt` (actuation interval, transitions,
//! deferred callbacks) and then runs the frame pipeline:
//! tilt solver -> ball update -> hole detection.

use super::collision::{HoleEntry, detect_collisions};
use super::geometry::solve_line;
use super::input::ControlKey;
use super::physics::step_ball;
use super::state::{DeferredAction, GameState};

/// Deferred callbacks fire once their remaining time is within this of zero
const DEFERRED_EPSILON: f32 = 1e-4;

/// Things that happened during a tick, for logging and presentation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// The ball dropped into a hole; a reset is scheduled
    FellIn(HoleEntry),
    /// Posts sent back to the baseline, ball restored
    Reset,
    /// Post slides are over; movement is instantaneous again
    TransitionEnded,
}

/// Move each post for every held control, clamped to the container
pub fn actuate_posts(state: &mut GameState) {
    let max = state.max_post_offset();
    let step = state.physics.post_move_speed;
    let transition = state
        .post_transition_enabled
        .then_some(state.physics.post_transition);

    for key in ControlKey::ALL {
        if !state.input.is_held(key) {
            continue;
        }
        let post = state.post_mut(key.side());
        let next = (post.offset + key.direction() * step).clamp(0.0, max);
        post.set_offset(next, transition);
    }
}

/// Send both posts back to the baseline (animated) and restore the ball
/// sprite. Ball position and velocity carry over into the next attempt.
pub fn reset(state: &mut GameState) {
    let baseline = state.max_post_offset();
    let duration = state.physics.post_transition;

    state.post_transition_enabled = true;
    for post in &mut state.posts {
        post.set_offset(baseline, Some(duration));
    }
    state.ball.visual.restore();
    state.schedule(DeferredAction::EndPostTransition, duration);
}

fn end_post_transition(state: &mut GameState) {
    state.post_transition_enabled = false;
    for post in &mut state.posts {
        post.settle();
    }
}

/// Count down deferred callbacks and run the ones that fell due, in order
fn run_deferred(state: &mut GameState, dt: f32, events: &mut Vec<SimEvent>) {
    let mut due = Vec::new();
    state.deferred.retain_mut(|d| {
        d.remaining -= dt;
        if d.remaining <= DEFERRED_EPSILON {
            due.push(d.action);
            false
        } else {
            true
        }
    });

    for action in due {
        match action {
            DeferredAction::Reset => {
                reset(state);
                events.push(SimEvent::Reset);
            }
            DeferredAction::EndPostTransition => {
                end_post_transition(state);
                events.push(SimEvent::TransitionEnded);
            }
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();
    state.frame += 1;

    let ticks = state.input.advance(dt, state.physics.actuation_interval);
    for _ in 0..ticks {
        actuate_posts(state);
    }

    for post in &mut state.posts {
        post.advance(dt);
    }
    state.ball.visual.advance(dt);

    run_deferred(state, dt, &mut events);

    let line = solve_line(&state.posts, &state.geometry, state.last_slope);
    state.last_slope = line.slope;
    step_ball(&mut state.ball, &line, &state.physics, &state.geometry);

    events.extend(detect_collisions(state).into_iter().map(SimEvent::FellIn));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::physics::upper_bound;
    use crate::sim::state::{PostSide, Viewport};
    use crate::sim::{ClockChange, Hole};
    use glam::Vec2;
    use proptest::prelude::*;

    fn new_state() -> GameState {
        GameState::new(&Settings::default(), Viewport::new(1000.0, 800.0))
    }

    /// Table with no holes, so the ball can roll freely
    fn open_table() -> GameState {
        let mut state = new_state();
        state.holes.clear();
        state
    }

    fn run(state: &mut GameState, steps: usize) -> Vec<SimEvent> {
        (0..steps).flat_map(|_| tick(state, SIM_DT)).collect()
    }

    #[test]
    fn test_level_table_stays_still() {
        let mut state = open_table();
        let start = state.ball.position;
        run(&mut state, 600);
        assert_eq!(state.ball.velocity, 0.0);
        assert_eq!(state.ball.position, start);
        assert_eq!(state.last_slope, 0.0);
    }

    #[test]
    fn test_held_key_moves_post() {
        let mut state = open_table();
        let baseline = state.max_post_offset();
        assert_eq!(state.input.on_key_down(ControlKey::LeftUp), ClockChange::Started);

        // 1 second of holding is ~62 actuation ticks of 5 px
        run(&mut state, 60);
        let moved = baseline - state.post(PostSide::Left).offset;
        assert!(moved >= 300.0 && moved <= 315.0, "moved {moved}");
        assert_eq!(state.post(PostSide::Right).offset, baseline);

        state.input.on_key_up(ControlKey::LeftUp);
        let offset = state.post(PostSide::Left).offset;
        run(&mut state, 30);
        assert_eq!(state.post(PostSide::Left).offset, offset);
    }

    #[test]
    fn test_raised_left_post_rolls_ball_right() {
        let mut state = open_table();
        state.input.on_key_down(ControlKey::LeftUp);
        run(&mut state, 30);
        state.input.on_key_up(ControlKey::LeftUp);

        let start = state.ball.position;
        run(&mut state, 30);
        assert!(state.last_slope > 0.0);
        assert!(state.ball.velocity > 0.0);
        assert!(state.ball.position > start);
    }

    #[test]
    fn test_ball_settles_against_low_post() {
        let mut state = open_table();
        state.input.on_key_down(ControlKey::RightUp);
        run(&mut state, 20);
        state.input.on_key_up(ControlKey::RightUp);
        run(&mut state, 1200);
        assert!(state.ball.position < 1.0, "position {}", state.ball.position);
    }

    #[test]
    fn test_fall_in_then_reset() {
        let mut state = open_table();
        let baseline = state.max_post_offset();
        state.input.on_key_down(ControlKey::LeftUp);
        state.input.on_key_down(ControlKey::RightUp);
        run(&mut state, 20);
        state.input.release_all();
        let raised = state.post(PostSide::Left).offset;
        assert!(raised < baseline);

        // Drop a hole right under the ball
        state.holes.push(Hole {
            center: state.ball.center(),
            radius: 35.0,
            winning: false,
            label: 0,
        });

        let events = tick(&mut state, SIM_DT);
        assert!(matches!(events.as_slice(), [SimEvent::FellIn(_)]));
        assert_eq!(state.ball.visual.scale, 0.0);

        // Reset lands after RESET_DELAY (~30 steps)
        let events = run(&mut state, 29);
        assert!(!events.contains(&SimEvent::Reset));
        let events = run(&mut state, 2);
        assert_eq!(events.iter().filter(|e| **e == SimEvent::Reset).count(), 1);
        assert!(state.post_transition_enabled);
        assert_eq!(state.post(PostSide::Left).offset, baseline);
        assert_eq!(state.ball.visual.scale, 1.0);
        assert_eq!(state.ball.visual.opacity, 1.0);

        // Posts slide rather than jump
        let shown = state.post(PostSide::Left).displayed_offset();
        assert!(shown < baseline);

        // Transition window closes and movement is instant again
        let events = run(&mut state, 40);
        assert!(events.contains(&SimEvent::TransitionEnded));
        assert!(!state.post_transition_enabled);
        assert_eq!(state.post(PostSide::Left).displayed_offset(), baseline);
        assert_eq!(state.ball.visual.displayed_scale(), 1.0);

        state.input.on_key_down(ControlKey::LeftUp);
        run(&mut state, 1);
        state.input.on_key_up(ControlKey::LeftUp);
        let post = state.post(PostSide::Left);
        assert!(post.slide.is_none());
        assert_eq!(post.displayed_offset(), post.offset);
    }

    #[test]
    fn test_reset_keeps_ball_momentum() {
        let mut state = open_table();
        state.ball.velocity = 3.0;
        state.ball.position = 300.0;
        reset(&mut state);
        assert_eq!(state.ball.velocity, 3.0);
        assert_eq!(state.ball.position, 300.0);
    }

    #[test]
    fn test_repeated_resets_are_idempotent() {
        let mut state = open_table();
        let baseline = state.max_post_offset();
        state.schedule(DeferredAction::Reset, 0.5);
        state.schedule(DeferredAction::Reset, 0.55);
        let events = run(&mut state, 90);
        assert_eq!(events.iter().filter(|e| **e == SimEvent::Reset).count(), 2);
        assert!(!state.post_transition_enabled);
        assert_eq!(state.post(PostSide::Left).offset, baseline);
        assert_eq!(state.post(PostSide::Right).offset, baseline);
        assert!(state.deferred.is_empty());
    }

    #[test]
    fn test_degenerate_posts_stay_finite() {
        let mut state = open_table();
        let x = state.post(PostSide::Left).anchor_x;
        state.post_mut(PostSide::Right).anchor_x = x;
        state.post_mut(PostSide::Right).set_offset(100.0, None);
        run(&mut state, 120);
        assert!(state.ball.velocity.is_finite());
        assert!(state.ball.position.is_finite());
        assert!(state.ball.screen.is_finite());
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state();
        let mut b = new_state();
        let script = [
            (0, Some(ControlKey::LeftUp), true),
            (25, Some(ControlKey::LeftUp), false),
            (40, Some(ControlKey::RightUp), true),
            (70, Some(ControlKey::RightUp), false),
            (200, None, false),
        ];

        let mut step = 0;
        for (at, key, down) in script {
            while step < at {
                assert_eq!(tick(&mut a, SIM_DT), tick(&mut b, SIM_DT));
                step += 1;
            }
            if let Some(key) = key {
                for state in [&mut a, &mut b] {
                    if down {
                        state.input.on_key_down(key);
                    } else {
                        state.input.on_key_up(key);
                    }
                }
            }
        }

        assert_eq!(a.ball.position, b.ball.position);
        assert_eq!(a.ball.velocity, b.ball.velocity);
        assert_eq!(a.posts[0].offset, b.posts[0].offset);
        assert_eq!(a.posts[1].offset, b.posts[1].offset);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = new_state();
        run(&mut state, 10);
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.frame, state.frame);
        assert_eq!(restored.holes, state.holes);
        assert_eq!(restored.ball.center(), state.ball.center());
    }

    fn control(index: u8) -> ControlKey {
        ControlKey::ALL[index as usize % 4]
    }

    proptest! {
        #[test]
        fn posts_stay_in_bounds(
            presses in prop::collection::vec((0u8..4, any::<bool>(), 1usize..200), 1..20),
            height in 80.0f32..1200.0,
        ) {
            let mut state = GameState::new(&Settings::default(), Viewport::new(900.0, height));
            state.holes.clear();
            let max = state.max_post_offset();
            for (key, down, steps) in presses {
                if down {
                    state.input.on_key_down(control(key));
                } else {
                    state.input.on_key_up(control(key));
                }
                for _ in 0..steps {
                    tick(&mut state, SIM_DT);
                    for post in &state.posts {
                        prop_assert!(post.offset >= 0.0 && post.offset <= max);
                    }
                }
            }
        }

        #[test]
        fn ball_stays_on_line(
            presses in prop::collection::vec((0u8..4, 1usize..120), 1..12),
        ) {
            let mut state = open_table();
            for (key, steps) in presses {
                state.input.release_all();
                state.input.on_key_down(control(key));
                for _ in 0..steps {
                    tick(&mut state, SIM_DT);
                    let line = solve_line(&state.posts, &state.geometry, state.last_slope);
                    let upper = upper_bound(&line, &state.geometry, state.ball.radius);
                    prop_assert!(state.ball.position >= 0.0);
                    prop_assert!(state.ball.position <= upper + 1e-3);
                    prop_assert!(state.ball.center().is_finite());
                }
            }
        }
    }

    #[test]
    fn test_hole_center_is_fixed() {
        let mut state = new_state();
        let before: Vec<Vec2> = state.holes.iter().map(|h| h.center).collect();
        state.input.on_key_down(ControlKey::LeftDown);
        run(&mut state, 100);
        let after: Vec<Vec2> = state.holes.iter().map(|h| h.center).collect();
        assert_eq!(before, after);
    }
}
