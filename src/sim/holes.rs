//! Hole field layout
//!
//! Holes are placed once at startup from proportional positions scaled to
//! the container, and never move afterward.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Hole, Viewport};

/// Proportional positions of the ordinary holes on the classic table
pub const CLASSIC_HOLES: [(f32, f32); 31] = [
    (0.5, 0.05),
    (0.4, 0.07),
    (0.2, 0.1),
    (0.3, 0.12),
    (0.7, 0.15),
    (0.5, 0.17),
    (0.4, 0.2),
    (0.8, 0.2),
    (0.45, 0.25),
    (0.1, 0.25),
    (0.58, 0.2),
    (0.35, 0.27),
    (0.6, 0.3),
    (0.25, 0.3),
    (0.05, 0.32),
    (0.85, 0.32),
    (0.75, 0.35),
    (0.5, 0.35),
    (0.3, 0.4),
    (0.68, 0.4),
    (0.4, 0.45),
    (0.1, 0.45),
    (0.2, 0.47),
    (0.6, 0.5),
    (0.15, 0.55),
    (0.3, 0.55),
    (0.25, 0.6),
    (0.5, 0.52),
    (0.7, 0.52),
    (0.9, 0.55),
    (0.8, 0.6),
];

/// Proportional positions of the winning holes on the classic table
pub const CLASSIC_WINNING: [(f32, f32); 6] = [
    (0.45, 0.6),
    (0.8, 0.45),
    (0.17, 0.35),
    (0.4, 0.35),
    (0.7, 0.25),
    (0.45, 0.13),
];

/// Where seeded layouts may place holes (keeps the bottom clear for the posts)
const SEEDED_X: std::ops::Range<f32> = 0.05..0.95;
const SEEDED_Y: std::ops::Range<f32> = 0.05..0.65;

/// Which hole field to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HoleLayout {
    #[default]
    Classic,
    /// Random proportional positions from a seeded PCG32 stream
    Seeded {
        seed: u64,
        holes: usize,
        winning: usize,
    },
}

/// Turn proportional positions into holes, labelled by their list index
pub fn place_holes(
    positions: &[(f32, f32)],
    winning: bool,
    viewport: Viewport,
    radius: f32,
    out: &mut Vec<Hole>,
) {
    let span = Vec2::new(
        (viewport.width - radius * 2.0).max(0.0),
        (viewport.height - radius * 2.0).max(0.0),
    );
    for (label, &(fx, fy)) in positions.iter().enumerate() {
        let top_left = Vec2::new(fx, fy) * span;
        out.push(Hole {
            center: top_left + Vec2::splat(radius),
            radius,
            winning,
            label: label as u32,
        });
    }
}

fn seeded_positions(rng: &mut Pcg32, count: usize) -> Vec<(f32, f32)> {
    (0..count)
        .map(|_| (rng.random_range(SEEDED_X), rng.random_range(SEEDED_Y)))
        .collect()
}

/// Build the hole field: ordinary holes first, then winning holes
pub fn generate_holes(layout: &HoleLayout, viewport: Viewport, radius: f32) -> Vec<Hole> {
    let mut holes = Vec::new();
    match *layout {
        HoleLayout::Classic => {
            place_holes(&CLASSIC_HOLES, false, viewport, radius, &mut holes);
            place_holes(&CLASSIC_WINNING, true, viewport, radius, &mut holes);
        }
        HoleLayout::Seeded {
            seed,
            holes: count,
            winning,
        } => {
            let mut rng = Pcg32::seed_from_u64(seed);
            let plain = seeded_positions(&mut rng, count);
            let winners = seeded_positions(&mut rng, winning);
            place_holes(&plain, false, viewport, radius, &mut holes);
            place_holes(&winners, true, viewport, radius, &mut holes);
        }
    }
    log::debug!(
        "Placed {} holes ({} winning)",
        holes.len(),
        holes.iter().filter(|h| h.winning).count()
    );
    holes
}
