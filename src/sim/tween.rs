//! Eased interpolation over a fixed duration
//!
//! Stands in for the CSS transitions the table relies on: the posts slide
//! back to the baseline on reset and the ball shrinks/fades when it falls in.

use serde::{Deserialize, Serialize};

/// Timing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    /// CSS `ease`: cubic-bezier(0.25, 0.1, 0.25, 1.0)
    Ease,
    /// CSS `ease-out`: cubic-bezier(0.0, 0.0, 0.58, 1.0)
    EaseOut,
}

impl Easing {
    /// Map progress in [0, 1] to eased progress in [0, 1]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
        }
    }
}

/// Evaluate a CSS-style cubic bezier (endpoints fixed at 0 and 1) at x = `t`
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    let curve = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };

    // x(s) is monotonic for these control points; bisect for the parameter
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    let mut s = t;
    for _ in 0..32 {
        let x = curve(x1, x2, s);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    curve(y1, y2, s)
}

/// A running interpolation from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub elapsed: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration,
            easing,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = self.easing.apply(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Ease, Easing::EaseOut] {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_ease_out_leads_linear() {
        // Ease-out covers more ground early on
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn test_tween_progress() {
        let mut tween = Tween::new(100.0, 0.0, 0.5, Easing::Ease);
        assert_eq!(tween.value(), 100.0);
        tween.advance(0.25);
        // `ease` is past halfway at the midpoint
        assert!(tween.value() > 0.0 && tween.value() < 50.0);
        assert!(!tween.finished());
        tween.advance(1.0);
        assert!(tween.finished());
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let tween = Tween::new(3.0, 7.0, 0.0, Easing::Ease);
        assert!(tween.finished());
        assert_eq!(tween.value(), 7.0);
    }
}
