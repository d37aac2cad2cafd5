//! Game state and core simulation types
//!
//! Everything the frame step reads or writes lives in [`GameState`]. The
//! simulation owns post offsets and anchors; the renderer only projects them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::holes::generate_holes;
use super::input::InputTracker;
use super::tween::{Easing, Tween};
use crate::settings::{Geometry, Physics, Settings};

/// Size of the play container (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Which end of the line a post holds up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostSide {
    Left,
    Right,
}

impl PostSide {
    pub fn index(self) -> usize {
        match self {
            PostSide::Left => 0,
            PostSide::Right => 1,
        }
    }
}

/// A vertically movable post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub side: PostSide,
    /// Left edge of the post box (fixed)
    pub anchor_x: f32,
    /// Target offset from the top of the container
    pub offset: f32,
    /// Running slide from the previous offset, when transitions are enabled
    pub slide: Option<Tween>,
}

impl Post {
    pub fn new(side: PostSide, anchor_x: f32, offset: f32) -> Self {
        Self {
            side,
            anchor_x,
            offset,
            slide: None,
        }
    }

    /// Offset currently on screen (mid-slide while a transition runs)
    pub fn displayed_offset(&self) -> f32 {
        self.slide.map_or(self.offset, |slide| slide.value())
    }

    /// Move the post. With a transition duration the move animates from the
    /// displayed position, otherwise it is instantaneous.
    pub fn set_offset(&mut self, offset: f32, transition: Option<f32>) {
        self.slide = transition.map(|duration| {
            Tween::new(self.displayed_offset(), offset, duration, Easing::Ease)
        });
        self.offset = offset;
    }

    /// Drop any running slide and snap to the target
    pub fn settle(&mut self) {
        self.slide = None;
    }

    pub fn advance(&mut self, dt: f32) {
        if let Some(slide) = self.slide.as_mut() {
            slide.advance(dt);
        }
        if self.slide.is_some_and(|slide| slide.finished()) {
            self.slide = None;
        }
    }
}

/// Scale and opacity of the ball sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallVisual {
    pub scale: f32,
    pub opacity: f32,
    /// Once set, every visual change animates over this many seconds
    pub transition: Option<f32>,
    pub scale_tween: Option<Tween>,
    pub opacity_tween: Option<Tween>,
}

impl Default for BallVisual {
    fn default() -> Self {
        Self {
            scale: 1.0,
            opacity: 1.0,
            transition: None,
            scale_tween: None,
            opacity_tween: None,
        }
    }
}

impl BallVisual {
    pub fn displayed_scale(&self) -> f32 {
        self.scale_tween.map_or(self.scale, |t| t.value())
    }

    pub fn displayed_opacity(&self) -> f32 {
        self.opacity_tween.map_or(self.opacity, |t| t.value())
    }

    fn set(&mut self, scale: f32, opacity: f32) {
        if let Some(duration) = self.transition {
            self.scale_tween = Some(Tween::new(
                self.displayed_scale(),
                scale,
                duration,
                Easing::EaseOut,
            ));
            self.opacity_tween = Some(Tween::new(
                self.displayed_opacity(),
                opacity,
                duration,
                Easing::EaseOut,
            ));
        }
        self.scale = scale;
        self.opacity = opacity;
    }

    /// Start the shrink/fade. Enables the ball's transition for good.
    pub fn fall_in(&mut self, duration: f32) {
        self.transition = Some(duration);
        self.set(0.0, 0.0);
    }

    /// Back to full size and opacity (animated if a transition is set)
    pub fn restore(&mut self) {
        self.set(1.0, 1.0);
    }

    pub fn advance(&mut self, dt: f32) {
        for tween in [&mut self.scale_tween, &mut self.opacity_tween] {
            if let Some(t) = tween.as_mut() {
                t.advance(dt);
            }
            if matches!(tween, Some(t) if t.finished()) {
                *tween = None;
            }
        }
    }
}

/// The rolling ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Distance along the line from the left post's inner edge
    pub position: f32,
    /// Velocity along the line (pixels per step)
    pub velocity: f32,
    pub radius: f32,
    /// Top-left corner of the ball sprite, derived every step
    pub screen: Vec2,
    pub visual: BallVisual,
}

impl Ball {
    pub fn new(position: f32, radius: f32) -> Self {
        Self {
            position,
            velocity: 0.0,
            radius,
            screen: Vec2::ZERO,
            visual: BallVisual::default(),
        }
    }

    /// Visual center (scaling is about the center, so it does not move)
    pub fn center(&self) -> Vec2 {
        self.screen + Vec2::splat(self.radius)
    }
}

/// A hole in the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub center: Vec2,
    pub radius: f32,
    pub winning: bool,
    /// Position within its list (cosmetic)
    pub label: u32,
}

impl Hole {
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) < self.radius
    }
}

/// Callbacks scheduled for later in the simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Table reset after a fall-in
    Reset,
    /// Post slides end; movement becomes instantaneous again
    EndPostTransition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deferred {
    pub action: DeferredAction,
    /// Seconds until the action runs
    pub remaining: f32,
}

impl Deferred {
    pub fn new(action: DeferredAction, delay: f32) -> Self {
        Self {
            action,
            remaining: delay,
        }
    }
}

/// Complete simulation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub viewport: Viewport,
    pub physics: Physics,
    pub geometry: Geometry,
    /// Left and right posts, indexed by [`PostSide::index`]
    pub posts: [Post; 2],
    pub ball: Ball,
    pub holes: Vec<Hole>,
    pub input: InputTracker,
    /// Pending one-shot callbacks, in scheduling order
    pub deferred: Vec<Deferred>,
    /// Post moves animate while set (between a reset and its transition end)
    pub post_transition_enabled: bool,
    /// Holes the ball overlapped on the previous step
    pub inside_holes: Vec<usize>,
    /// Slope used on the previous step (fallback for degenerate geometry)
    pub last_slope: f32,
    /// Simulation step counter
    pub frame: u64,
}

impl GameState {
    /// Lay out a fresh table for the given container size
    pub fn new(settings: &Settings, viewport: Viewport) -> Self {
        let geometry = settings.geometry;
        let baseline = baseline_offset(viewport, &geometry);
        let left_x = geometry.post_inset;
        let right_x = viewport.width - geometry.post_inset - geometry.post_width;

        let mut state = Self {
            viewport,
            physics: settings.physics,
            geometry,
            posts: [
                Post::new(PostSide::Left, left_x, baseline),
                Post::new(PostSide::Right, right_x, baseline),
            ],
            ball: Ball::new(geometry.ball_start, geometry.ball_radius),
            holes: generate_holes(&settings.layout, viewport, geometry.hole_radius),
            input: InputTracker::default(),
            deferred: Vec::new(),
            post_transition_enabled: false,
            inside_holes: Vec::new(),
            last_slope: 0.0,
            frame: 0,
        };

        // Place the sprite before the first step
        let line = super::geometry::solve_line(&state.posts, &geometry, 0.0);
        state.ball.screen = super::physics::project(&state.ball, &line, &geometry);
        state
    }

    pub fn post(&self, side: PostSide) -> &Post {
        &self.posts[side.index()]
    }

    pub fn post_mut(&mut self, side: PostSide) -> &mut Post {
        &mut self.posts[side.index()]
    }

    /// Largest allowed post offset (post resting on the container bottom)
    pub fn max_post_offset(&self) -> f32 {
        baseline_offset(self.viewport, &self.geometry)
    }

    pub fn schedule(&mut self, action: DeferredAction, delay: f32) {
        self.deferred.push(Deferred::new(action, delay));
    }
}

/// Resting offset for both posts: flush with the bottom of the container
pub fn baseline_offset(viewport: Viewport, geometry: &Geometry) -> f32 {
    (viewport.height - geometry.post_height).max(0.0)
}
