//! Layout density profiles
//!
//! Each density maps to one complete set of force coefficients. The table is
//! looked up once per layout call so the simulation loop stays branch-free.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ErdError, Result};

/// Default canvas width used by the explorer
pub const CANVAS_WIDTH: f64 = 2200.0;

/// Named packing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Compact,
    #[default]
    Normal,
    Sparse,
}

impl Density {
    pub const ALL: [Density; 3] = [Density::Compact, Density::Normal, Density::Sparse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Density::Compact => "compact",
            Density::Normal => "normal",
            Density::Sparse => "sparse",
        }
    }

    /// Coefficient tuple for this density
    pub fn params(&self) -> &'static LayoutParams {
        match self {
            Density::Compact => &COMPACT,
            Density::Normal => &NORMAL,
            Density::Sparse => &SPARSE,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Density {
    type Err = ErdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Density::Compact),
            "normal" => Ok(Density::Normal),
            "sparse" => Ok(Density::Sparse),
            other => Err(ErdError::config(format!(
                "density must be compact, normal or sparse, got '{other}'"
            ))),
        }
    }
}

// =============================================================================
// PARAMETER TABLE
// =============================================================================

/// Force coefficients for one density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Inverse-square repulsion numerator
    pub repulsion: f64,

    /// Linear spring stiffness along edges
    pub spring: f64,

    /// Spring natural length
    pub link_length: f64,

    /// Centre distance below which the collision push kicks in
    pub min_distance: f64,

    /// Pull toward the canvas centre, per unit of offset
    pub gravity: f64,

    /// Velocity multiplier applied after forces are added
    pub damping: f64,

    /// Simulation steps
    pub steps: usize,

    /// Hard clamp margin during simulation
    pub margin: f64,

    /// Padding used by the final viewport fit
    pub padding: f64,
}

/// Multiplier on the distance deficit for pairs closer than `min_distance`
pub const COLLISION_STRENGTH: f64 = 1.3;

const COMPACT: LayoutParams = LayoutParams {
    repulsion: 22_000.0,
    spring: 0.036,
    link_length: 180.0,
    min_distance: 110.0,
    gravity: 0.006,
    damping: 0.84,
    steps: 220,
    margin: 80.0,
    padding: 80.0,
};

const NORMAL: LayoutParams = LayoutParams {
    repulsion: 30_000.0,
    spring: 0.03,
    link_length: 230.0,
    min_distance: 140.0,
    gravity: 0.006,
    damping: 0.84,
    steps: 300,
    margin: 80.0,
    padding: 120.0,
};

const SPARSE: LayoutParams = LayoutParams {
    repulsion: 42_000.0,
    spring: 0.024,
    link_length: 280.0,
    min_distance: 170.0,
    gravity: 0.006,
    damping: 0.84,
    steps: 360,
    margin: 120.0,
    padding: 170.0,
};

// =============================================================================
// CANVAS POLICY
// =============================================================================

/// Canvas height for a node count: more nodes and sparser packing get a
/// taller canvas.
pub fn canvas_height(node_count: usize, density: Density) -> f64 {
    let sparse = density == Density::Sparse;
    match node_count {
        0..=24 if sparse => 1120.0,
        0..=24 => 980.0,
        25..=50 if sparse => 1420.0,
        25..=50 => 1220.0,
        _ if sparse => 1760.0,
        _ => 1480.0,
    }
}
