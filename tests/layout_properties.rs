//! Property tests for selection and layout
//!
//! Random graphs of up to 24 tables, checked for determinism, completeness,
//! containment and bounded selection.

use std::collections::{BTreeSet, HashMap};

use erd_layout::graph::selector::{node_degrees, MAX_VISIBLE_EDGES};
use erd_layout::{canvas_height, select, Density, ErdEdge, ErdNode, LayoutEngine};
use proptest::prelude::*;

const TOL: f64 = 1e-6;

// -- Strategy helpers --

fn arb_density() -> impl Strategy<Value = Density> {
    prop_oneof![
        Just(Density::Compact),
        Just(Density::Normal),
        Just(Density::Sparse),
    ]
}

/// Distinct node ids T00..Tnn plus edges between random indices. Some edges
/// point at ids outside the node list.
fn arb_graph(max_nodes: usize) -> impl Strategy<Value = (Vec<ErdNode>, Vec<ErdEdge>)> {
    (0..=max_nodes).prop_flat_map(|n| {
        let edge = (0..n + 2, 0..n + 2);
        (Just(n), prop::collection::vec(edge, 0..(n * 2 + 1)))
    })
    .prop_map(|(n, pairs)| {
        let nodes = (0..n).map(|i| ErdNode::new(format!("T{i:02}"), i as u32)).collect();
        let edges = pairs
            .into_iter()
            .enumerate()
            .map(|(k, (a, b))| ErdEdge::new(format!("T{a:02}"), format!("T{b:02}"), format!("fk{k}")))
            .collect();
        (nodes, edges)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn layout_is_deterministic(
        (nodes, edges) in arb_graph(12),
        density in arb_density(),
    ) {
        let height = canvas_height(nodes.len(), density);
        let first = LayoutEngine::compute(&nodes, &edges, 2200.0, height, density);
        let second = LayoutEngine::compute(&nodes, &edges, 2200.0, height, density);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn layout_covers_exactly_the_selected_nodes(
        (nodes, edges) in arb_graph(16),
        density in arb_density(),
        max in 0usize..20,
    ) {
        let sel = select(&nodes, &edges, max, &[], MAX_VISIBLE_EDGES);
        let height = canvas_height(sel.nodes.len(), density);
        let positions = LayoutEngine::compute(&sel.nodes, &sel.edges, 2200.0, height, density);

        let selected: BTreeSet<&str> = sel.node_ids().collect();
        let laid_out: BTreeSet<&str> = positions.keys().map(String::as_str).collect();
        prop_assert_eq!(selected, laid_out);
    }

    #[test]
    fn layout_stays_inside_padding(
        (nodes, edges) in arb_graph(16),
        density in arb_density(),
        width in 600.0f64..3000.0,
        height in 500.0f64..2000.0,
    ) {
        let pad = density.params().padding;
        let positions = LayoutEngine::compute(&nodes, &edges, width, height, density);

        for p in positions.values() {
            prop_assert!(p.x.is_finite() && p.y.is_finite());
            prop_assert!(p.x >= pad - TOL && p.x <= width - pad + TOL, "x={} width={}", p.x, width);
            prop_assert!(p.y >= pad - TOL && p.y <= height - pad + TOL, "y={} height={}", p.y, height);
        }
    }

    #[test]
    fn selection_is_bounded_and_closed(
        (nodes, edges) in arb_graph(24),
        max in 0usize..30,
        filter in prop_oneof![Just(String::new()), "[0-9]{1,2}", Just("t0, t1".to_string())],
    ) {
        let tokens = erd_layout::parse_filter_tokens(&filter);
        let sel = select(&nodes, &edges, max, &tokens, MAX_VISIBLE_EDGES);

        prop_assert!(sel.nodes.len() <= max);
        let ids: BTreeSet<&str> = sel.node_ids().collect();
        for e in &sel.edges {
            prop_assert!(ids.contains(e.source.as_str()));
            prop_assert!(ids.contains(e.target.as_str()));
        }
    }

    #[test]
    fn unfiltered_selection_is_degree_ranked(
        (nodes, edges) in arb_graph(24),
    ) {
        let sel = select(&nodes, &edges, usize::MAX, &[], MAX_VISIBLE_EDGES);
        let degree: HashMap<&str, usize> = node_degrees(&nodes, &edges);

        for pair in sel.nodes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (da, db) = (degree[a.id.as_str()], degree[b.id.as_str()]);
            prop_assert!(da > db || (da == db && a.id < b.id));
        }
    }
}
