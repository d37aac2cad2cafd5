//! Tilt solver: the line between the two post centers
//!
//! The line is derived from the posts every step and never stored.

use glam::Vec2;

use super::state::{Post, PostSide};
use crate::settings::Geometry;

/// The line resting on the two posts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Left post center
    pub start: Vec2,
    /// Right post center
    pub end: Vec2,
    /// dy/dx, always finite
    pub slope: f32,
}

impl Line {
    /// X of the left post's inner (right-hand) edge
    pub fn left_inner_x(&self, post_width: f32) -> f32 {
        self.start.x + post_width / 2.0
    }

    /// X of the right post's inner (left-hand) edge
    pub fn right_inner_x(&self, post_width: f32) -> f32 {
        self.end.x - post_width / 2.0
    }

    /// Length of the line between the posts' inner edges
    pub fn inner_length(&self, post_width: f32) -> f32 {
        let dx = self.right_inner_x(post_width) - self.left_inner_x(post_width);
        dx.hypot(self.end.y - self.start.y)
    }
}

/// Visual midpoint of a post, as displayed
pub fn post_center(post: &Post, geometry: &Geometry) -> Vec2 {
    Vec2::new(
        post.anchor_x + geometry.post_width / 2.0,
        post.displayed_offset() + geometry.post_height / 2.0,
    )
}

/// Compute this step's line. When the posts share an X coordinate the slope
/// is undefined and `previous_slope` is used instead.
pub fn solve_line(posts: &[Post; 2], geometry: &Geometry, previous_slope: f32) -> Line {
    let start = post_center(&posts[PostSide::Left.index()], geometry);
    let end = post_center(&posts[PostSide::Right.index()], geometry);

    let slope = (end.y - start.y) / (end.x - start.x);
    let slope = if slope.is_finite() {
        slope
    } else {
        log::debug!("Degenerate line at x = {}, keeping slope {previous_slope}", start.x);
        previous_slope
    };

    Line { start, end, slope }
}
