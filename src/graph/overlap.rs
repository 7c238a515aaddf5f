//! Discrete overlap relaxation
//!
//! Runs after the force simulation. Any pair whose padded boxes overlap on
//! both axes is pushed apart by a fixed step along the line between them.
//! Stops after a pass with no overlap or after `MAX_RELAX_PASSES`.

use super::force_sim::EPSILON;
use super::types::{Point, NODE_HEIGHT, NODE_WIDTH};

/// Upper bound on relaxation passes
pub const MAX_RELAX_PASSES: usize = 24;

/// Horizontal clearance added to the node width
pub const OVERLAP_BUFFER_X: f64 = 28.0;

/// Vertical clearance added to the node height
pub const OVERLAP_BUFFER_Y: f64 = 20.0;

/// Distance each node of an overlapping pair moves per pass
pub const RELAX_STEP: f64 = 8.0;

/// True when two boxes anchored at `a` and `b` are closer than the padded
/// node size on both axes
#[inline]
pub fn boxes_overlap(a: Point, b: Point) -> bool {
    (b.x - a.x).abs() < NODE_WIDTH + OVERLAP_BUFFER_X
        && (b.y - a.y).abs() < NODE_HEIGHT + OVERLAP_BUFFER_Y
}

/// Push overlapping pairs apart in place. Returns the number of passes run.
pub fn relax_overlaps(positions: &mut [Point]) -> usize {
    let n = positions.len();
    let mut passes = 0;

    while passes < MAX_RELAX_PASSES {
        passes += 1;
        let mut moved = false;

        for i in 0..n {
            for j in (i + 1)..n {
                let a = positions[i];
                let b = positions[j];
                if !boxes_overlap(a, b) {
                    continue;
                }

                let dx = b.x - a.x;
                let dy = b.y - a.y;
                let d = (dx * dx + dy * dy).sqrt();
                // Coincident boxes separate horizontally
                let (ux, uy) = if d < EPSILON { (1.0, 0.0) } else { (dx / d, dy / d) };

                positions[i].x -= ux * RELAX_STEP;
                positions[i].y -= uy * RELAX_STEP;
                positions[j].x += ux * RELAX_STEP;
                positions[j].y += uy * RELAX_STEP;
                moved = true;
            }
        }

        if !moved {
            break;
        }
    }

    passes
}
