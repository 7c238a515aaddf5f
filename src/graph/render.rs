//! SVG rendering for laid-out ERDs
//!
//! Purely presentational: consumes the node list, edge list and position map
//! and never runs the simulation itself.
//!
//! Edges are cubic beziers between box centres, bowed sideways by a fixed
//! curvature, with an arrow marker at the target and the cardinality label at
//! the midpoint. Nodes are rounded rectangles labelled with id and column
//! count.

use std::fmt::Write;

use super::types::{ErdEdge, ErdNode, Point, PositionMap, NODE_HEIGHT, NODE_WIDTH};
use crate::error::Result;

/// Perpendicular bow applied to control points, relative to edge length
pub const EDGE_CURVATURE: f64 = 0.12;

/// Cardinality label lift above the edge midpoint
const LABEL_LIFT: f64 = 8.0;

const ARROW_MARKER_ID: &str = "erdArrow";

// =============================================================================
// STYLE
// =============================================================================

/// Colours and strokes for the ERD canvas
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub node_fill: &'static str,
    pub node_stroke: &'static str,
    pub node_radius: f64,
    pub title_color: &'static str,
    pub subtitle_color: &'static str,
    pub edge_stroke: &'static str,
    pub edge_width: f64,
    pub arrow_fill: &'static str,
    pub label_color: &'static str,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            node_fill: "#233851",
            node_stroke: "#6c8db3",
            node_radius: 10.0,
            title_color: "#e8f1fa",
            subtitle_color: "#b9cde5",
            edge_stroke: "#7e9abf",
            edge_width: 1.3,
            arrow_fill: "#6f90b8",
            label_color: "#9eb7d6",
        }
    }
}

// =============================================================================
// EDGE GEOMETRY
// =============================================================================

/// Control points for one edge curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCurve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
    pub label: Point,
}

impl EdgeCurve {
    /// Curve between two node boxes given their top-left corners
    pub fn between(source: Point, target: Point) -> Self {
        let start = source.box_center();
        let end = target.box_center();
        let dx = end.x - start.x;
        let dy = end.y - start.y;

        Self {
            start,
            control1: Point::new(
                start.x + dx * 0.33 - dy * EDGE_CURVATURE,
                start.y + dy * 0.33 + dx * EDGE_CURVATURE,
            ),
            control2: Point::new(
                start.x + dx * 0.66 - dy * EDGE_CURVATURE,
                start.y + dy * 0.66 + dx * EDGE_CURVATURE,
            ),
            end,
            label: Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0 - LABEL_LIFT),
        }
    }

    /// SVG path data (`M .. C ..`)
    pub fn path_data(&self) -> String {
        format!(
            "M {:.1} {:.1} C {:.1} {:.1}, {:.1} {:.1}, {:.1} {:.1}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

// =============================================================================
// RENDERER
// =============================================================================

/// Writes an ERD as a standalone SVG document
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    pub style: RenderStyle,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Render nodes and edges at the given positions on a `width × height`
    /// canvas. Edges or nodes without a position are skipped.
    pub fn render(
        &self,
        nodes: &[ErdNode],
        edges: &[ErdEdge],
        positions: &PositionMap,
        width: f64,
        height: f64,
    ) -> Result<String> {
        let s = &self.style;
        let mut svg = String::new();

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" font-family="Inter, system-ui, sans-serif">"#
        )?;
        writeln!(svg, "  <defs>")?;
        writeln!(
            svg,
            r#"    <marker id="{ARROW_MARKER_ID}" markerWidth="9" markerHeight="6" refX="8" refY="3" orient="auto">"#
        )?;
        writeln!(svg, r#"      <path d="M0,0 L9,3 L0,6 Z" fill="{}" />"#, s.arrow_fill)?;
        writeln!(svg, "    </marker>")?;
        writeln!(svg, "  </defs>")?;

        // Edges first so boxes draw over them
        for edge in edges {
            let (Some(&from), Some(&to)) = (positions.get(&edge.source), positions.get(&edge.target))
            else {
                continue;
            };
            self.write_edge(&mut svg, edge, EdgeCurve::between(from, to))?;
        }

        for node in nodes {
            let Some(&pos) = positions.get(&node.id) else {
                continue;
            };
            self.write_node(&mut svg, node, pos)?;
        }

        writeln!(svg, "</svg>")?;
        Ok(svg)
    }

    fn write_edge(&self, svg: &mut String, edge: &ErdEdge, curve: EdgeCurve) -> Result<()> {
        let s = &self.style;
        writeln!(svg, "  <g class=\"erd-edge\">")?;
        writeln!(
            svg,
            r#"    <path d="{}" fill="none" stroke="{}" stroke-width="{}" marker-end="url(#{ARROW_MARKER_ID})" />"#,
            curve.path_data(),
            s.edge_stroke,
            s.edge_width
        )?;
        writeln!(
            svg,
            r#"    <text x="{:.1}" y="{:.1}" font-size="9" fill="{}" text-anchor="middle">{}</text>"#,
            curve.label.x,
            curve.label.y,
            s.label_color,
            escape_xml(edge.cardinality_label())
        )?;
        writeln!(svg, "  </g>")?;
        Ok(())
    }

    fn write_node(&self, svg: &mut String, node: &ErdNode, pos: Point) -> Result<()> {
        let s = &self.style;
        writeln!(svg, "  <g class=\"erd-node\">")?;
        writeln!(
            svg,
            r#"    <rect x="{:.1}" y="{:.1}" width="{NODE_WIDTH}" height="{NODE_HEIGHT}" rx="{}" fill="{}" stroke="{}" />"#,
            pos.x, pos.y, s.node_radius, s.node_fill, s.node_stroke
        )?;
        writeln!(
            svg,
            r#"    <text x="{:.1}" y="{:.1}" font-size="11" fill="{}">{}</text>"#,
            pos.x + 10.0,
            pos.y + 24.0,
            s.title_color,
            escape_xml(&node.id)
        )?;
        writeln!(
            svg,
            r#"    <text x="{:.1}" y="{:.1}" font-size="10" fill="{}">cols: {}</text>"#,
            pos.x + 10.0,
            pos.y + 45.0,
            s.subtitle_color,
            node.column_count
        )?;
        writeln!(svg, "  </g>")?;
        Ok(())
    }
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
