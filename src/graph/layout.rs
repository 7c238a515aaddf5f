//! ERD layout engine
//!
//! Composes the three stages into one pure call:
//!
//! ```text
//! nodes + edges ──► LayoutIndex (id → slot)
//!                        │
//!                        ▼
//!             circle init ──► ForceSimulation (fixed steps)
//!                                   │
//!                                   ▼
//!                         relax_overlaps (early exit)
//!                                   │
//!                                   ▼
//!                          fit_to_viewport ──► PositionMap
//! ```
//!
//! Every call starts from the same circular initialisation, so identical
//! inputs always give identical positions.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::density::Density;
use super::force_sim::{initial_positions, ForceSimulation};
use super::overlap::relax_overlaps;
use super::types::{ErdEdge, ErdNode, Point, PositionMap};
use super::viewport_fit::fit_to_viewport;

/// Canonical ordering of node ids for the hot loops
#[derive(Debug, Clone, Default)]
pub struct LayoutIndex<'a> {
    ids: Vec<&'a str>,
    slots: HashMap<&'a str, usize>,
}

impl<'a> LayoutIndex<'a> {
    /// Index nodes in list order. A repeated id keeps its first slot.
    pub fn new(nodes: &'a [ErdNode]) -> Self {
        let mut index = Self::default();
        for node in nodes {
            let id = node.id.as_str();
            if !index.slots.contains_key(id) {
                index.slots.insert(id, index.ids.len());
                index.ids.push(id);
            }
        }
        index
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn slot(&self, id: &str) -> Option<usize> {
        self.slots.get(id).copied()
    }

    pub fn ids(&self) -> &[&'a str] {
        &self.ids
    }

    /// Edges as slot pairs. Edges with an unknown endpoint are skipped.
    pub fn edge_pairs(&self, edges: &[ErdEdge]) -> Vec<(usize, usize)> {
        let pairs: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|e| Some((self.slot(&e.source)?, self.slot(&e.target)?)))
            .collect();
        if pairs.len() < edges.len() {
            warn!(
                skipped = edges.len() - pairs.len(),
                "layout skipped edges referencing unknown nodes"
            );
        }
        pairs
    }
}

/// Stateless layout entry point
pub struct LayoutEngine;

impl LayoutEngine {
    /// Compute top-left positions for every node
    ///
    /// The returned map has exactly one entry per distinct node id. Width and
    /// height are expected to be positive; anything else is floored to 1.
    pub fn compute(
        nodes: &[ErdNode],
        edges: &[ErdEdge],
        width: f64,
        height: f64,
        density: Density,
    ) -> PositionMap {
        let index = LayoutIndex::new(nodes);
        if index.is_empty() {
            return PositionMap::new();
        }

        let width = sanitize_dimension(width);
        let height = sanitize_dimension(height);
        let params = density.params();
        let n = index.len();

        let mut positions = initial_positions(n, width, height);

        // A lone node has nothing to push against
        let mut passes = 0;
        if n > 1 {
            let pairs = index.edge_pairs(edges);
            let mut sim = ForceSimulation::new(params, width, height, positions);
            sim.run(&pairs);
            positions = sim.into_positions();
            passes = relax_overlaps(&mut positions);
        }

        let Some((fitted, fit)) = fit_to_viewport(&positions, width, height, params.padding)
        else {
            return PositionMap::new();
        };

        debug!(
            nodes = n,
            edges = edges.len(),
            steps = params.steps,
            relax_passes = passes,
            scale = fit.scale,
            density = %density,
            "ERD layout computed"
        );

        index
            .ids()
            .iter()
            .zip(fitted)
            .map(|(id, p)| (id.to_string(), p))
            .collect()
    }

    /// Position for one node, if laid out
    pub fn position_of(positions: &PositionMap, id: &str) -> Option<Point> {
        positions.get(id).copied()
    }
}

fn sanitize_dimension(value: f64) -> f64 {
    if value.is_finite() && value >= 1.0 {
        value
    } else {
        warn!(value, "non-positive canvas dimension floored to 1");
        1.0
    }
}
