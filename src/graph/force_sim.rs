//! Force simulation for ERD layout
//!
//! Spring-electrical model run for a fixed number of steps:
//! - Inverse-square repulsion between every pair, plus a linear collision
//!   push for pairs closer than the density's minimum distance
//! - Linear springs along edges with natural length `link_length`
//! - Gravity toward the canvas centre
//! - Damped integration with a hard clamp into the canvas margin
//!
//! The integrator is `v = (v + F) * damping; p += v`. It is a layout
//! heuristic, not a physics model, and the visual result depends on this
//! exact order.

use std::f64::consts::PI;

use super::density::{LayoutParams, COLLISION_STRENGTH};
use super::types::Point;

/// Floor for squared distance in the repulsion term
const MIN_DISTANCE_SQ: f64 = 1.0;

/// Floor for distance when normalising a direction
pub(crate) const EPSILON: f64 = 0.001;

/// Fraction of the short canvas side used as the initial circle radius
const INITIAL_RADIUS_RATIO: f64 = 0.35;

// =============================================================================
// VECTOR HELPERS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Vec2 {
    x: f64,
    y: f64,
}

impl Vec2 {
    fn scaled(self, k: f64) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// Unit vector from `a` to `b` and the floored distance between them
#[inline]
fn direction(a: Point, b: Point) -> (Vec2, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d = (dx * dx + dy * dy).sqrt().max(EPSILON);
    (Vec2 { x: dx / d, y: dy / d }, d)
}

// =============================================================================
// INITIALISATION
// =============================================================================

/// Nodes on a circle of radius `0.35 * min(width, height)` around the canvas
/// centre, node `i` at angle `2πi/n`. A single node sits on the centre.
pub fn initial_positions(n: usize, width: f64, height: f64) -> Vec<Point> {
    let center = Point::new(width / 2.0, height / 2.0);
    if n <= 1 {
        return vec![center; n];
    }

    let radius = width.min(height) * INITIAL_RADIUS_RATIO;
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            Point::new(
                center.x + angle.cos() * radius,
                center.y + angle.sin() * radius,
            )
        })
        .collect()
}

// =============================================================================
// SIMULATION
// =============================================================================

/// Fixed-step force simulation over positions indexed like the node list
#[derive(Debug)]
pub struct ForceSimulation<'a> {
    params: &'a LayoutParams,
    width: f64,
    height: f64,
    center: Point,
    positions: Vec<Point>,
    velocities: Vec<Vec2>,
    forces: Vec<Vec2>,
}

impl<'a> ForceSimulation<'a> {
    pub fn new(params: &'a LayoutParams, width: f64, height: f64, positions: Vec<Point>) -> Self {
        let n = positions.len();
        Self {
            params,
            width,
            height,
            center: Point::new(width / 2.0, height / 2.0),
            positions,
            velocities: vec![Vec2::default(); n],
            forces: vec![Vec2::default(); n],
        }
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<Point> {
        self.positions
    }

    /// Run the configured number of steps. `edges` holds index pairs into
    /// the position list; out-of-range pairs are ignored.
    pub fn run(&mut self, edges: &[(usize, usize)]) {
        for _ in 0..self.params.steps {
            self.step(edges);
        }
    }

    /// One step: accumulate all forces from the current positions, then
    /// integrate every node.
    pub fn step(&mut self, edges: &[(usize, usize)]) {
        self.forces.iter_mut().for_each(|f| *f = Vec2::default());
        self.apply_repulsion();
        self.apply_springs(edges);
        self.apply_gravity();
        self.integrate();
    }

    fn apply_repulsion(&mut self) {
        let n = self.positions.len();
        let k_repel = self.params.repulsion;
        let min_dist = self.params.min_distance;

        for i in 0..n {
            for j in (i + 1)..n {
                let a = self.positions[i];
                let b = self.positions[j];
                let dx = b.x - a.x;
                let dy = b.y - a.y;
                let d2 = (dx * dx + dy * dy).max(MIN_DISTANCE_SQ);
                let d = d2.sqrt().max(EPSILON);
                let unit = Vec2 { x: dx / d, y: dy / d };

                let mut push = unit.scaled(k_repel / d2);
                if d < min_dist {
                    push += unit.scaled((min_dist - d) * COLLISION_STRENGTH);
                }

                self.forces[i] -= push;
                self.forces[j] += push;
            }
        }
    }

    fn apply_springs(&mut self, edges: &[(usize, usize)]) {
        let n = self.positions.len();
        for &(a, b) in edges {
            if a >= n || b >= n {
                continue;
            }
            let (unit, d) = direction(self.positions[a], self.positions[b]);
            let pull = unit.scaled(self.params.spring * (d - self.params.link_length));

            self.forces[a] += pull;
            self.forces[b] -= pull;
        }
    }

    fn apply_gravity(&mut self) {
        let g = self.params.gravity;
        for (force, pos) in self.forces.iter_mut().zip(&self.positions) {
            force.x += (self.center.x - pos.x) * g;
            force.y += (self.center.y - pos.y) * g;
        }
    }

    fn integrate(&mut self) {
        let damping = self.params.damping;
        let margin = self.params.margin;

        for ((pos, vel), force) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(&self.forces)
        {
            vel.x = (vel.x + force.x) * damping;
            vel.y = (vel.y + force.y) * damping;
            pos.x += vel.x;
            pos.y += vel.y;

            // max-then-min so an undersized canvas never panics like clamp would
            pos.x = pos.x.max(margin).min(self.width - margin);
            pos.y = pos.y.max(margin).min(self.height - margin);
        }
    }
}
