//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - All timers advance with the simulation clock
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod holes;
pub mod input;
pub mod physics;
pub mod state;
pub mod tick;
pub mod tween;

pub use collision::{HoleEntry, detect_collisions};
pub use geometry::{Line, solve_line};
pub use holes::{CLASSIC_HOLES, CLASSIC_WINNING, HoleLayout, generate_holes};
pub use input::{ClockChange, ControlKey, InputTracker};
pub use state::{Ball, GameState, Hole, Post, PostSide, Viewport};
pub use tick::{SimEvent, reset, tick};
pub use tween::{Easing, Tween};
