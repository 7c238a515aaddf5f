//! ERD explorer
//!
//! Page-level state for browsing a schema graph: the loaded graph plus the
//! current filter text, density and limits. Every `view()` recomputes
//! selection, canvas size and layout from scratch, so changing any input
//! and calling `view()` again is all a UI needs to do.

use serde::Serialize;
use tracing::info;

use crate::config::ErdConfig;
use crate::error::Result;
use crate::graph::{
    canvas_height, parse_filter_tokens, select, Density, ErdEdge, ErdGraph, ErdNode,
    LayoutEngine, PositionMap, SvgRenderer,
};

#[derive(Debug, Clone)]
pub struct ErdExplorer {
    graph: ErdGraph,
    filter: String,
    density: Density,
    max_nodes: usize,
    max_edges: usize,
    canvas_width: f64,
}

impl Default for ErdExplorer {
    fn default() -> Self {
        Self::from_config(ErdGraph::default(), &ErdConfig::default())
    }
}

impl ErdExplorer {
    pub fn new(graph: ErdGraph) -> Self {
        Self::from_config(graph, &ErdConfig::default())
    }

    pub fn from_config(graph: ErdGraph, config: &ErdConfig) -> Self {
        Self {
            graph,
            filter: String::new(),
            density: config.density,
            max_nodes: config.max_nodes,
            max_edges: config.max_edges,
            canvas_width: config.canvas_width,
        }
    }

    /// Replace the loaded graph (refresh or domain switch). Filter and
    /// density are kept.
    pub fn set_graph(&mut self, graph: ErdGraph) {
        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "ERD graph loaded"
        );
        self.graph = graph;
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn set_density(&mut self, density: Density) {
        self.density = density;
    }

    pub fn set_max_nodes(&mut self, max_nodes: usize) {
        self.max_nodes = max_nodes;
    }

    pub fn graph(&self) -> &ErdGraph {
        &self.graph
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn density(&self) -> Density {
        self.density
    }

    /// Every table id, sorted, for a filter picker
    pub fn table_options(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.graph.nodes.iter().map(|n| n.id.clone()).collect();
        ids.sort();
        ids
    }

    /// Select, size and lay out the current graph
    pub fn view(&self) -> ErdView {
        let tokens = parse_filter_tokens(&self.filter);
        let selection = select(
            &self.graph.nodes,
            &self.graph.edges,
            self.max_nodes,
            &tokens,
            self.max_edges,
        );
        let height = canvas_height(selection.nodes.len(), self.density);
        let positions = LayoutEngine::compute(
            &selection.nodes,
            &selection.edges,
            self.canvas_width,
            height,
            self.density,
        );

        ErdView {
            nodes: selection.nodes,
            edges: selection.edges,
            positions,
            width: self.canvas_width,
            height,
            density: self.density,
            total_nodes: self.graph.nodes.len(),
            total_edges: self.graph.edges.len(),
        }
    }
}

/// One row of the relationship list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipRow {
    /// 1-based
    pub index: usize,
    pub source: String,
    pub target: String,
    pub field: String,
    pub cardinality: String,
    pub confidence: String,
    pub reason: String,
}

/// Laid-out subgraph plus the counts shown above the canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErdView {
    pub nodes: Vec<ErdNode>,
    pub edges: Vec<ErdEdge>,
    pub positions: PositionMap,
    pub width: f64,
    pub height: f64,
    pub density: Density,
    pub total_nodes: usize,
    pub total_edges: usize,
}

impl ErdView {
    /// "Nodes: shown / total | Edges: shown / total"
    pub fn summary(&self) -> String {
        format!(
            "Nodes: {} / {} | Edges: {} / {}",
            self.nodes.len(),
            self.total_nodes,
            self.edges.len(),
            self.total_edges
        )
    }

    pub fn relationship_rows(&self, limit: usize) -> Vec<RelationshipRow> {
        self.edges
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, e)| RelationshipRow {
                index: i + 1,
                source: e.source.clone(),
                target: e.target.clone(),
                field: e.field.clone(),
                cardinality: e.cardinality_label().to_string(),
                confidence: e.confidence.clone(),
                reason: e.reason.clone(),
            })
            .collect()
    }

    pub fn to_svg(&self) -> Result<String> {
        self.render_with(&SvgRenderer::new())
    }

    pub fn render_with(&self, renderer: &SvgRenderer) -> Result<String> {
        renderer.render(&self.nodes, &self.edges, &self.positions, self.width, self.height)
    }
}
