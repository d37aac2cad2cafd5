//! Tilt Bar - steer a rolling ball past the holes by raising and lowering two posts
//!
//! Core modules:
//! - `sim`: Deterministic simulation (posts, tilt, ball physics, holes, resets)
//! - `renderer`: WebGPU SDF rendering of a scene projected from the simulation
//! - `settings`: Tunable physics/geometry constants, key bindings, hole layout

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Geometry, KeyBindings, Physics, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Tilt-driven acceleration per step, multiplied by the line slope
    pub const GRAVITY: f32 = 0.5;
    /// Velocity multiplier applied every step
    pub const FRICTION: f32 = 0.99;
    /// Fraction of speed kept when bouncing off a post
    pub const DAMPENING: f32 = 0.4;

    /// Post travel per actuation tick (pixels)
    pub const POST_MOVE_SPEED: f32 = 5.0;
    /// Actuation interval while a control key is held (16 ms, ~60 Hz)
    pub const ACTUATION_INTERVAL: f32 = 0.016;

    /// Post box size and distance from the container edge
    pub const POST_WIDTH: f32 = 20.0;
    pub const POST_HEIGHT: f32 = 100.0;
    pub const POST_INSET: f32 = 50.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    /// Start position along the line, measured from the left post's inner edge
    pub const BALL_START_POSITION: f32 = 50.0;
    /// Lifts the rendered ball so it sits on top of the line
    pub const BALL_VISUAL_OFFSET: f32 = 20.0;

    pub const HOLE_RADIUS: f32 = 35.0;
    pub const LINE_WIDTH: f32 = 4.0;

    /// Delay between falling into a hole and the table reset (seconds)
    pub const RESET_DELAY: f32 = 0.5;
    /// Duration of the animated post slide back to the baseline
    pub const POST_TRANSITION: f32 = 0.5;
    /// Duration of the ball shrink/fade
    pub const FALL_IN_DURATION: f32 = 0.3;
}
