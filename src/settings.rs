//! Game settings and tuning
//!
//! Defaults are the stock tuning. A JSON document may override any
//! subset of fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{ControlKey, HoleLayout};

/// Errors produced while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Physics and timing constants. Physics values are per simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub gravity: f32,
    pub friction: f32,
    pub dampening: f32,
    /// Pixels per actuation tick
    pub post_move_speed: f32,
    /// Seconds between actuation ticks
    pub actuation_interval: f32,
    /// Seconds from fall-in to reset
    pub reset_delay: f32,
    /// Seconds the posts take to slide back on reset
    pub post_transition: f32,
    /// Seconds for the ball shrink/fade
    pub fall_in_duration: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            dampening: DAMPENING,
            post_move_speed: POST_MOVE_SPEED,
            actuation_interval: ACTUATION_INTERVAL,
            reset_delay: RESET_DELAY,
            post_transition: POST_TRANSITION,
            fall_in_duration: FALL_IN_DURATION,
        }
    }
}

/// Sizes of the on-screen pieces (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub post_width: f32,
    pub post_height: f32,
    /// Gap between a post and its side of the container
    pub post_inset: f32,
    pub ball_radius: f32,
    pub ball_start: f32,
    pub ball_visual_offset: f32,
    pub hole_radius: f32,
    pub line_width: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            post_width: POST_WIDTH,
            post_height: POST_HEIGHT,
            post_inset: POST_INSET,
            ball_radius: BALL_RADIUS,
            ball_start: BALL_START_POSITION,
            ball_visual_offset: BALL_VISUAL_OFFSET,
            hole_radius: HOLE_RADIUS,
            line_width: LINE_WIDTH,
        }
    }
}

/// Keyboard labels (as reported by `KeyboardEvent.key`) for the four controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left_up: String,
    pub left_down: String,
    pub right_up: String,
    pub right_down: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left_up: "w".into(),
            left_down: "s".into(),
            right_up: "o".into(),
            right_down: "l".into(),
        }
    }
}

impl KeyBindings {
    fn label(&self, key: ControlKey) -> &str {
        match key {
            ControlKey::LeftUp => &self.left_up,
            ControlKey::LeftDown => &self.left_down,
            ControlKey::RightUp => &self.right_up,
            ControlKey::RightDown => &self.right_down,
        }
    }

    /// Map a key label to a control (case-insensitive). Unbound labels map to `None`.
    pub fn resolve(&self, label: &str) -> Option<ControlKey> {
        ControlKey::ALL
            .into_iter()
            .find(|&key| self.label(key).eq_ignore_ascii_case(label))
    }
}

/// Complete game settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: Physics,
    pub geometry: Geometry,
    pub bindings: KeyBindings,
    pub layout: HoleLayout,
}

fn require(ok: bool, field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
    if ok {
        Ok(())
    } else {
        Err(SettingsError::Invalid { field, reason })
    }
}

impl Settings {
    /// Id of the optional `<script type="application/json">` block holding overrides
    pub const ELEMENT_ID: &'static str = "tilt-bar-settings";

    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a JSON settings file
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values that break the simulation's invariants
    pub fn validate(&self) -> Result<(), SettingsError> {
        let p = &self.physics;
        require(p.gravity.is_finite(), "physics.gravity", "must be finite")?;
        require(
            p.friction > 0.0 && p.friction <= 1.0,
            "physics.friction",
            "must be in (0, 1]",
        )?;
        require(
            (0.0..=1.0).contains(&p.dampening),
            "physics.dampening",
            "must be in [0, 1]",
        )?;
        require(
            p.post_move_speed.is_finite() && p.post_move_speed >= 0.0,
            "physics.post_move_speed",
            "must be a non-negative number",
        )?;
        require(
            p.actuation_interval > 0.0,
            "physics.actuation_interval",
            "must be positive",
        )?;
        require(p.reset_delay >= 0.0, "physics.reset_delay", "must not be negative")?;
        require(
            p.post_transition >= 0.0,
            "physics.post_transition",
            "must not be negative",
        )?;
        require(
            p.fall_in_duration >= 0.0,
            "physics.fall_in_duration",
            "must not be negative",
        )?;

        let g = &self.geometry;
        require(g.post_width > 0.0, "geometry.post_width", "must be positive")?;
        require(g.post_height > 0.0, "geometry.post_height", "must be positive")?;
        require(g.post_inset >= 0.0, "geometry.post_inset", "must not be negative")?;
        require(g.ball_radius > 0.0, "geometry.ball_radius", "must be positive")?;
        require(g.ball_start >= 0.0, "geometry.ball_start", "must not be negative")?;
        require(g.hole_radius > 0.0, "geometry.hole_radius", "must be positive")?;
        require(g.line_width > 0.0, "geometry.line_width", "must be positive")?;

        let labels = ControlKey::ALL.map(|key| self.bindings.label(key).to_lowercase());
        require(
            labels.iter().all(|label| !label.is_empty()),
            "bindings",
            "labels must not be empty",
        )?;
        for (i, label) in labels.iter().enumerate() {
            require(
                !labels[i + 1..].contains(label),
                "bindings",
                "each control needs its own key",
            )?;
        }

        if let HoleLayout::Seeded { holes, winning, .. } = self.layout {
            require(
                holes
                    .checked_add(winning)
                    .is_some_and(|total| total <= crate::renderer::MAX_HOLES),
                "layout",
                "too many holes to render",
            )?;
        }
        Ok(())
    }

    /// Parse overrides, falling back to defaults (with a warning) on any error
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings overrides");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring settings: {e}");
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load overrides from the page's settings block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());
        Self::from_json_or_default(json.as_deref())
    }

    /// Native: optional settings file path
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&str>) -> Self {
        match path.map(|p| Self::from_path(p)) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from file");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring settings file: {e}");
                Self::default()
            }
            None => Self::default(),
        }
    }
}
