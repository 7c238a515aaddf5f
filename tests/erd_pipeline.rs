//! End-to-end: payload JSON → selection → layout → SVG

use erd_layout::graph::types::{NODE_HEIGHT, NODE_WIDTH};
use erd_layout::{
    parse_filter_tokens, select, Density, ErdExplorer, ErdGraph, LayoutEngine, Point,
};

const TARGET_PAYLOAD: &str = r#"{
    "domain": "target",
    "nodes": [
        {"id": "LOAD_PMI", "label": "LOAD_PMI", "column_count": 48},
        {"id": "LOAD_REFERRALS", "label": "LOAD_REFERRALS", "column_count": 31},
        {"id": "LOAD_RTT_PATHWAYS", "label": "LOAD_RTT_PATHWAYS", "column_count": 19},
        {"id": "LOAD_RTT_PERIODS", "label": "LOAD_RTT_PERIODS", "column_count": 14},
        {"id": "LOAD_ADT_ADMISSIONS", "label": "LOAD_ADT_ADMISSIONS", "column_count": 52},
        {"id": "LOAD_ADT_EPISODES", "label": "LOAD_ADT_EPISODES", "column_count": 44},
        {"id": "LOAD_IWL", "label": "LOAD_IWL", "column_count": 27},
        {"id": "REF_CODES", "label": "REF_CODES", "column_count": 3}
    ],
    "edges": [
        {"source": "LOAD_PMI", "target": "LOAD_REFERRALS", "field": "record_number",
         "confidence": "inferred", "reason": "shared record_number", "cardinality": "1:N"},
        {"source": "LOAD_PMI", "target": "LOAD_ADT_ADMISSIONS", "field": "record_number",
         "confidence": "inferred", "reason": "shared record_number", "cardinality": "1:N"},
        {"source": "LOAD_PMI", "target": "LOAD_IWL", "field": "record_number",
         "confidence": "inferred", "reason": "shared record_number"},
        {"source": "LOAD_REFERRALS", "target": "LOAD_RTT_PATHWAYS", "field": "loadref_record_number",
         "confidence": "inferred", "reason": "record-number reference naming", "cardinality": "1:N"},
        {"source": "LOAD_RTT_PATHWAYS", "target": "LOAD_RTT_PERIODS", "field": "loadrttpwy_record_number",
         "confidence": "inferred", "reason": "record-number reference naming", "cardinality": "1:N"},
        {"source": "LOAD_ADT_ADMISSIONS", "target": "LOAD_ADT_EPISODES", "field": "loadadt_adm_record_number",
         "confidence": "inferred", "reason": "record-number reference naming", "cardinality": "1:N"},
        {"source": "LOAD_PMI", "target": "STAGING_ONLY", "field": "record_number",
         "confidence": "low", "reason": "table not in snapshot"}
    ]
}"#;

fn no_box_overlap(points: &[Point]) -> bool {
    points.iter().enumerate().all(|(i, a)| {
        points[i + 1..]
            .iter()
            .all(|b| (a.x - b.x).abs() >= NODE_WIDTH || (a.y - b.y).abs() >= NODE_HEIGHT)
    })
}

#[test]
fn three_table_scenario() {
    let graph = ErdGraph::from_json(
        r#"{"nodes": [{"id": "T1"}, {"id": "T2"}, {"id": "T3"}],
            "edges": [{"source": "T1", "target": "T2", "field": "fk1"},
                      {"source": "T2", "target": "T3", "field": "fk2"}]}"#,
    )
    .unwrap();

    let sel = select(&graph.nodes, &graph.edges, 10, &[], 300);
    let order: Vec<&str> = sel.node_ids().collect();
    assert_eq!(order, vec!["T2", "T1", "T3"]);
    assert_eq!(sel.edges.len(), 2);

    let positions = LayoutEngine::compute(&sel.nodes, &sel.edges, 2200.0, 1200.0, Density::Normal);
    assert_eq!(positions.len(), 3);

    let pad = Density::Normal.params().padding;
    for p in positions.values() {
        assert!(p.x >= pad - 1e-6 && p.x <= 2200.0 - pad + 1e-6);
        assert!(p.y >= pad - 1e-6 && p.y <= 1200.0 - pad + 1e-6);
    }
    let pts: Vec<Point> = positions.values().copied().collect();
    assert!(no_box_overlap(&pts));
}

#[test]
fn full_target_graph_view() {
    let graph = ErdGraph::from_json(TARGET_PAYLOAD).unwrap();
    let explorer = ErdExplorer::new(graph);

    let view = explorer.view();

    assert_eq!(view.nodes.len(), 8);
    assert_eq!(view.nodes[0].id, "LOAD_PMI");
    // Edge to a table outside the snapshot is dropped
    assert_eq!(view.edges.len(), 6);
    assert_eq!(view.summary(), "Nodes: 8 / 8 | Edges: 6 / 7");
    assert_eq!(view.positions.len(), 8);
    assert_eq!(view.height, 1120.0);

    let svg = view.to_svg().unwrap();
    assert_eq!(svg.matches("<rect ").count(), 8);
    assert_eq!(svg.matches("class=\"erd-edge\"").count(), 6);
    assert!(svg.contains("cols: 52"));
}

#[test]
fn filter_selects_matches_and_neighbours() {
    let graph = ErdGraph::from_json(TARGET_PAYLOAD).unwrap();
    let mut explorer = ErdExplorer::new(graph);
    explorer.set_filter("rtt_pathways");

    let view = explorer.view();

    let ids: Vec<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["LOAD_REFERRALS", "LOAD_RTT_PATHWAYS", "LOAD_RTT_PERIODS"]);
    assert_eq!(view.edges.len(), 2);
}

#[test]
fn density_change_recomputes_layout() {
    let graph = ErdGraph::from_json(TARGET_PAYLOAD).unwrap();
    let mut explorer = ErdExplorer::new(graph);

    explorer.set_density(Density::Compact);
    let compact = explorer.view();
    explorer.set_density(Density::Sparse);
    let sparse = explorer.view();

    assert_ne!(compact.positions, sparse.positions);
    assert!(compact.height < sparse.height);
    assert_eq!(
        compact.positions.keys().collect::<Vec<_>>(),
        sparse.positions.keys().collect::<Vec<_>>()
    );
}

#[test]
fn multi_token_filter() {
    let graph = ErdGraph::from_json(TARGET_PAYLOAD).unwrap();
    let tokens = parse_filter_tokens("iwl | codes");

    let sel = select(&graph.nodes, &graph.edges, 90, &tokens, 300);

    let ids: Vec<&str> = sel.node_ids().collect();
    assert_eq!(ids, vec!["LOAD_PMI", "LOAD_IWL", "REF_CODES"]);
    assert_eq!(sel.edges.len(), 1);
    assert_eq!(sel.edges[0].cardinality_label(), "1:N");
}

#[test]
fn empty_payload_is_not_an_error() {
    let graph = ErdGraph::from_json(r#"{"nodes": [], "edges": []}"#).unwrap();
    let view = ErdExplorer::new(graph).view();

    assert!(view.nodes.is_empty());
    assert!(view.positions.is_empty());
    assert!(view.relationship_rows(450).is_empty());
}

#[test]
fn concurrent_layouts_match_sequential() {
    let graph = ErdGraph::from_json(TARGET_PAYLOAD).unwrap();
    let expected = LayoutEngine::compute(&graph.nodes, &graph.edges, 2200.0, 1120.0, Density::Sparse);

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    LayoutEngine::compute(&graph.nodes, &graph.edges, 2200.0, 1120.0, Density::Sparse)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for positions in results {
        assert_eq!(positions, expected);
    }
}
