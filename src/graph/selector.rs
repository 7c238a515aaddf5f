//! Node/edge selection
//!
//! Reduces a full schema graph to a bounded subgraph worth drawing. Without
//! a filter the best-connected tables win; with a filter the matching tables
//! and their direct neighbours are kept in payload order.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::types::{ErdEdge, ErdNode};

/// Default node cap for the explorer
pub const MAX_VISIBLE_NODES: usize = 90;

/// Hard cap on rendered edges
pub const MAX_VISIBLE_EDGES: usize = 300;

/// Bounded subgraph ready for layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub nodes: Vec<ErdNode>,
    pub edges: Vec<ErdEdge>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }
}

/// Split filter text into lowercase tokens on commas, whitespace, `/` and `|`
pub fn parse_filter_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c == ',' || c == '/' || c == '|' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Edge count per node id, counting both endpoints. Isolated nodes get 0.
pub fn node_degrees<'a>(nodes: &'a [ErdNode], edges: &'a [ErdEdge]) -> HashMap<&'a str, usize> {
    let mut degree: HashMap<&str, usize> = nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
    for edge in edges {
        *degree.entry(edge.source.as_str()).or_insert(0) += 1;
        *degree.entry(edge.target.as_str()).or_insert(0) += 1;
    }
    degree
}

/// Nodes ranked by descending degree, ties by ascending id, truncated
pub fn rank_by_degree(nodes: &[ErdNode], edges: &[ErdEdge], max_nodes: usize) -> Vec<ErdNode> {
    let degree = node_degrees(nodes, edges);
    let mut ranked: Vec<&ErdNode> = nodes.iter().collect();
    ranked.sort_by(|a, b| {
        let da = degree.get(a.id.as_str()).copied().unwrap_or(0);
        let db = degree.get(b.id.as_str()).copied().unwrap_or(0);
        db.cmp(&da).then_with(|| a.id.cmp(&b.id))
    });
    ranked.into_iter().take(max_nodes).cloned().collect()
}

/// Ids containing any token, plus every id one edge away from a match.
/// Returns an empty set when nothing matches.
fn matched_with_neighbours<'a>(
    nodes: &'a [ErdNode],
    edges: &'a [ErdEdge],
    tokens: &[String],
) -> HashSet<&'a str> {
    let matched: HashSet<&str> = nodes
        .iter()
        .filter(|n| {
            let id = n.id.to_lowercase();
            tokens.iter().any(|t| id.contains(t.as_str()))
        })
        .map(|n| n.id.as_str())
        .collect();

    if matched.is_empty() {
        return matched;
    }

    // One hop only: neighbours are taken from the original match set
    let mut expanded = matched.clone();
    for edge in edges {
        if matched.contains(edge.source.as_str()) {
            expanded.insert(edge.target.as_str());
        }
        if matched.contains(edge.target.as_str()) {
            expanded.insert(edge.source.as_str());
        }
    }
    expanded
}

/// Edges whose endpoints are both selected, in payload order, capped
pub fn induced_edges(nodes: &[ErdNode], edges: &[ErdEdge], max_edges: usize) -> Vec<ErdEdge> {
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut dropped = 0usize;
    let kept: Vec<ErdEdge> = edges
        .iter()
        .filter(|e| {
            let keep = ids.contains(e.source.as_str()) && ids.contains(e.target.as_str());
            if !keep {
                dropped += 1;
            }
            keep
        })
        .take(max_edges)
        .cloned()
        .collect();
    if dropped > 0 {
        debug!(dropped, "edges outside the selected node set dropped");
    }
    kept
}

/// Select a bounded subgraph
///
/// - no tokens, or no node matching any token: top `max_nodes` by degree
/// - otherwise: matches plus one-hop neighbours, payload order, truncated
pub fn select(
    nodes: &[ErdNode],
    edges: &[ErdEdge],
    max_nodes: usize,
    tokens: &[String],
    max_edges: usize,
) -> Selection {
    let expanded = if tokens.is_empty() {
        HashSet::new()
    } else {
        matched_with_neighbours(nodes, edges, tokens)
    };

    let selected: Vec<ErdNode> = if expanded.is_empty() {
        rank_by_degree(nodes, edges, max_nodes)
    } else {
        nodes
            .iter()
            .filter(|n| expanded.contains(n.id.as_str()))
            .take(max_nodes)
            .cloned()
            .collect()
    };

    let selected_edges = induced_edges(&selected, edges, max_edges);

    debug!(
        total_nodes = nodes.len(),
        total_edges = edges.len(),
        nodes = selected.len(),
        edges = selected_edges.len(),
        filtered = !expanded.is_empty(),
        "ERD selection"
    );

    Selection {
        nodes: selected,
        edges: selected_edges,
    }
}
