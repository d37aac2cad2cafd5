//! Scene projection
//!
//! Flattens the simulation state into what gets drawn this frame. Pure, so
//! the presentation can be checked without a GPU.

use glam::Vec2;

use crate::sim::geometry::solve_line;
use crate::sim::{GameState, PostSide};

/// Axis-aligned box in container pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn center(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHole {
    pub center: Vec2,
    pub radius: f32,
    pub winning: bool,
    pub label: u32,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub posts: [Rect; 2],
    pub line_start: Vec2,
    pub line_end: Vec2,
    pub line_width: f32,
    pub ball_center: Vec2,
    pub ball_radius: f32,
    pub ball_scale: f32,
    pub ball_opacity: f32,
    pub holes: Vec<SceneHole>,
}

impl Scene {
    pub fn from_state(state: &GameState) -> Self {
        let geometry = &state.geometry;
        let size = Vec2::new(geometry.post_width, geometry.post_height);
        let post_rect = |side: PostSide| {
            let post = state.post(side);
            Rect {
                origin: Vec2::new(post.anchor_x, post.displayed_offset()),
                size,
            }
        };

        // Same inputs as this step's solve, so the same line
        let line = solve_line(&state.posts, geometry, state.last_slope);

        Self {
            posts: [post_rect(PostSide::Left), post_rect(PostSide::Right)],
            line_start: line.start,
            line_end: line.end,
            line_width: geometry.line_width,
            ball_center: state.ball.center(),
            ball_radius: state.ball.radius,
            ball_scale: state.ball.visual.displayed_scale(),
            ball_opacity: state.ball.visual.displayed_opacity(),
            holes: state
                .holes
                .iter()
                .map(|h| SceneHole {
                    center: h.center,
                    radius: h.radius,
                    winning: h.winning,
                    label: h.label,
                })
                .collect(),
        }
    }
}
