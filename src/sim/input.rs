//! Held-key tracking and the post actuation clock
//!
//! Posts move on a steady interval while any control key is held, so their
//! speed does not depend on how often the platform repeats key events.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::state::PostSide;

/// The four post controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlKey {
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
}

impl ControlKey {
    /// Actuation order within a tick
    pub const ALL: [ControlKey; 4] = [
        ControlKey::LeftUp,
        ControlKey::LeftDown,
        ControlKey::RightUp,
        ControlKey::RightDown,
    ];

    pub fn side(self) -> PostSide {
        match self {
            ControlKey::LeftUp | ControlKey::LeftDown => PostSide::Left,
            ControlKey::RightUp | ControlKey::RightDown => PostSide::Right,
        }
    }

    /// Sign of the offset change (screen Y grows downward)
    pub fn direction(self) -> f32 {
        match self {
            ControlKey::LeftUp | ControlKey::RightUp => -1.0,
            ControlKey::LeftDown | ControlKey::RightDown => 1.0,
        }
    }
}

/// What a key event did to the actuation clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockChange {
    Started,
    Stopped,
    Unchanged,
}

/// Set of held controls plus the interval timer they drive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputTracker {
    held: BTreeSet<ControlKey>,
    running: bool,
    /// Time since the last actuation tick
    elapsed: f32,
}

impl InputTracker {
    /// Mark `key` held, starting the clock if it is idle
    pub fn on_key_down(&mut self, key: ControlKey) -> ClockChange {
        self.held.insert(key);
        if self.running {
            return ClockChange::Unchanged;
        }
        self.running = true;
        self.elapsed = 0.0;
        ClockChange::Started
    }

    /// Release `key`, stopping the clock once nothing is held
    pub fn on_key_up(&mut self, key: ControlKey) -> ClockChange {
        self.held.remove(&key);
        self.stop_if_idle()
    }

    /// Release everything (focus lost)
    pub fn release_all(&mut self) -> ClockChange {
        self.held.clear();
        self.stop_if_idle()
    }

    fn stop_if_idle(&mut self) -> ClockChange {
        if self.running && self.held.is_empty() {
            self.running = false;
            self.elapsed = 0.0;
            ClockChange::Stopped
        } else {
            ClockChange::Unchanged
        }
    }

    pub fn is_held(&self, key: ControlKey) -> bool {
        self.held.contains(&key)
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Advance the clock, returning how many actuation ticks fell due
    pub fn advance(&mut self, dt: f32, interval: f32) -> u32 {
        if !self.running || interval <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let mut ticks = 0;
        while self.elapsed >= interval {
            self.elapsed -= interval;
            ticks += 1;
        }
        ticks
    }
}
