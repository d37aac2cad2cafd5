//! Ball integration along the tilted line
//!
//! The ball lives on a 1-D axis measured from the left post's inner edge.
//! Slope acts as gravity, friction bleeds speed every step, and the posts
//! bounce it back with some speed lost.

use glam::Vec2;

use super::geometry::Line;
use super::state::Ball;
use crate::settings::{Geometry, Physics};

/// Apply tilt acceleration and friction, then move
pub fn integrate(ball: &mut Ball, slope: f32, physics: &Physics) {
    ball.velocity += slope * physics.gravity;
    ball.velocity *= physics.friction;
    ball.position += ball.velocity;
}

/// Highest position the ball may reach on this line
pub fn upper_bound(line: &Line, geometry: &Geometry, ball_radius: f32) -> f32 {
    (line.inner_length(geometry.post_width) - ball_radius).max(0.0)
}

/// Clamp to [0, upper] and reflect the velocity, scaled by `dampening`
pub fn bounce(ball: &mut Ball, upper: f32, dampening: f32) {
    if ball.position <= 0.0 {
        ball.position = 0.0;
        ball.velocity = -ball.velocity * dampening;
    } else if ball.position >= upper {
        ball.position = upper;
        ball.velocity = -ball.velocity * dampening;
    }
}

/// Top-left corner of the ball sprite for the ball's current position
pub fn project(ball: &Ball, line: &Line, geometry: &Geometry) -> Vec2 {
    let left = line.left_inner_x(geometry.post_width) + ball.position - ball.radius;
    let top = line.start.y + line.slope * ball.position - ball.radius - geometry.ball_visual_offset;
    Vec2::new(left, top)
}

/// One full ball update against this step's line
pub fn step_ball(ball: &mut Ball, line: &Line, physics: &Physics, geometry: &Geometry) {
    integrate(ball, line.slope, physics);
    let upper = upper_bound(line, geometry, ball.radius);
    bounce(ball, upper, physics.dampening);
    ball.screen = project(ball, line, geometry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn level_line() -> Line {
        Line {
            start: Vec2::new(60.0, 650.0),
            end: Vec2::new(940.0, 650.0),
            slope: 0.0,
        }
    }

    fn ball_at(position: f32, velocity: f32) -> Ball {
        let mut ball = Ball::new(position, 15.0);
        ball.velocity = velocity;
        ball
    }

    #[test]
    fn test_first_step_from_rest() {
        let physics = Physics {
            gravity: 0.5,
            friction: 0.99,
            ..Default::default()
        };
        let mut ball = ball_at(0.0, 0.0);
        integrate(&mut ball, 0.1, &physics);
        assert!((ball.velocity - 0.0495).abs() < 1e-6);
        assert!((ball.position - 0.0495).abs() < 1e-6);
    }

    #[test]
    fn test_level_line_no_drift() {
        let physics = Physics::default();
        let geometry = Geometry::default();
        let line = level_line();
        let mut ball = ball_at(200.0, 0.0);
        for _ in 0..1000 {
            step_ball(&mut ball, &line, &physics, &geometry);
        }
        assert_eq!(ball.velocity, 0.0);
        assert_eq!(ball.position, 200.0);
    }

    #[test]
    fn test_bounce_at_upper_bound() {
        let physics = Physics::default();
        let geometry = Geometry::default();
        let line = level_line();
        let upper = upper_bound(&line, &geometry, 15.0);

        let mut ball = ball_at(upper + 12.0, 8.0);
        bounce(&mut ball, upper, physics.dampening);
        assert_eq!(ball.position, upper);
        assert!((ball.velocity - (-8.0 * physics.dampening)).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_at_left_post() {
        let mut ball = ball_at(-3.0, -10.0);
        bounce(&mut ball, 500.0, 0.4);
        assert_eq!(ball.position, 0.0);
        assert!((ball.velocity - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_overshoot_through_step() {
        let physics = Physics::default();
        let geometry = Geometry::default();
        let line = level_line();
        let upper = upper_bound(&line, &geometry, 15.0);

        let mut ball = ball_at(upper - 1.0, 10.0);
        step_ball(&mut ball, &line, &physics, &geometry);
        let v = 10.0 * physics.friction;
        assert_eq!(ball.position, upper);
        assert!((ball.velocity - (-v * physics.dampening)).abs() < 1e-5);
    }

    #[test]
    fn test_negative_bound_collapses_to_zero() {
        let line = Line {
            start: Vec2::new(100.0, 300.0),
            end: Vec2::new(110.0, 300.0),
            slope: 0.0,
        };
        assert_eq!(upper_bound(&line, &Geometry::default(), 15.0), 0.0);
    }

    #[test]
    fn test_projection() {
        let geometry = Geometry::default();
        let line = Line {
            start: Vec2::new(60.0, 650.0),
            end: Vec2::new(940.0, 562.0),
            slope: -0.1,
        };
        let ball = ball_at(100.0, 0.0);
        let screen = project(&ball, &line, &geometry);
        assert!((screen.x - (70.0 + 100.0 - 15.0)).abs() < 1e-4);
        assert!((screen.y - (650.0 - 10.0 - 15.0 - 20.0)).abs() < 1e-4);
        assert!((ball.center().x - ball.screen.x - 15.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn position_stays_on_line(
            slopes in prop::collection::vec(-2.0f32..2.0, 1..400),
            start in 0.0f32..800.0,
            velocity in -50.0f32..50.0,
        ) {
            let physics = Physics::default();
            let geometry = Geometry::default();
            let mut ball = ball_at(start, velocity);
            for slope in slopes {
                let line = Line {
                    start: Vec2::new(60.0, 400.0),
                    end: Vec2::new(940.0, 400.0 + slope * 880.0),
                    slope,
                };
                step_ball(&mut ball, &line, &physics, &geometry);
                let upper = upper_bound(&line, &geometry, ball.radius);
                prop_assert!(ball.position >= 0.0);
                prop_assert!(ball.position <= upper);
            }
        }

        #[test]
        fn friction_never_speeds_up(velocity in -100.0f32..100.0, friction in 0.01f32..0.999) {
            let physics = Physics { friction, ..Default::default() };
            let mut ball = ball_at(0.0, velocity);
            integrate(&mut ball, 0.0, &physics);
            prop_assert!(ball.velocity.abs() <= velocity.abs());
        }
    }
}
