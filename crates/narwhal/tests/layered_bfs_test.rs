use narwhal::algo::layered_bfs::{self, DepthIndex, assign_depths};
use narwhal::{
    EdgeLabel, FixedSizeHints, LayoutOptions, MeshGraph, NodeLabel, NodeLabels, Point,
    PositionTransform, Size, StyleSizeHints,
};
use std::collections::BTreeSet;

const TEN: FixedSizeHints = FixedSizeHints(Size {
    width: 10.0,
    height: 10.0,
});

fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> MeshGraph {
    let mut g = MeshGraph::new();
    for n in nodes {
        g.set_node(*n, NodeLabel::default());
    }
    for (i, (s, t)) in edges.iter().enumerate() {
        g.set_edge(format!("e{i}"), *s, *t, EdgeLabel::default());
    }
    g
}

fn depth(g: &MeshGraph, id: &str) -> DepthIndex {
    assign_depths(g).get(id).unwrap()
}

#[test]
fn layered_bfs_simple_chain() {
    let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
    let depths = assign_depths(&g);
    assert!(depths.orphans().is_empty());
    assert_eq!(depth(&g, "A"), DepthIndex { depth: 1, index: 0 });
    assert_eq!(depth(&g, "B"), DepthIndex { depth: 2, index: 0 });
    assert_eq!(depth(&g, "C"), DepthIndex { depth: 3, index: 0 });

    let r = layered_bfs::layout(&g, &TEN, &LayoutOptions::default());
    let (a, b, c) = (r.get("A").unwrap(), r.get("B").unwrap(), r.get("C").unwrap());
    assert!(a.x < b.x && b.x < c.x);
    assert_eq!((a.y, b.y, c.y), (0.0, 0.0, 0.0));
}

#[test]
fn layered_bfs_fan_out_orders_by_name() {
    let g = graph(
        &["A", "reviews", "productpage", "details"],
        &[("A", "reviews"), ("A", "productpage"), ("A", "details")],
    );
    assert_eq!(depth(&g, "details").index, 0);
    assert_eq!(depth(&g, "productpage").index, 1);
    assert_eq!(depth(&g, "reviews").index, 2);

    let r = layered_bfs::layout(&g, &TEN, &LayoutOptions::default());
    let ys: Vec<f64> = ["details", "productpage", "reviews"]
        .iter()
        .map(|id| r.get(id).unwrap().y)
        .collect();
    assert!(ys[0] < ys[1] && ys[1] < ys[2]);
}

#[test]
fn layered_bfs_orders_by_mesh_labels_before_ids() {
    let mut g = graph(&["root"], &[]);
    for (id, workload) in [("n1", "zeta"), ("n2", "alpha"), ("n3", "Beta")] {
        g.set_node(
            id,
            NodeLabel::default().with_labels(NodeLabels {
                workload: Some(workload.into()),
                ..Default::default()
            }),
        );
        g.set_edge(format!("root-{id}"), "root", id, EdgeLabel::default());
    }
    assert_eq!(
        assign_depths(&g).layers[2],
        vec!["n2".to_string(), "n3".to_string(), "n1".to_string()]
    );
}

#[test]
fn layered_bfs_disconnected_pair_is_all_orphans() {
    let g = graph(&["X", "Y"], &[]);
    let depths = assign_depths(&g);
    assert_eq!(depths.orphans(), ["X".to_string(), "Y".to_string()]);
    assert_eq!(depths.layers.len(), 1);

    let r = layered_bfs::layout(&g, &TEN, &LayoutOptions::default());
    assert_eq!(r.len(), 2);
    assert_ne!(r.get("X"), r.get("Y"));
}

#[test]
fn layered_bfs_places_every_node_exactly_once() {
    // Two components, a rootless cycle and an isolated node.
    let g = graph(
        &["lonely"],
        &[
            ("a", "b"),
            ("a", "c"),
            ("c", "d"),
            ("b", "d"),
            ("x", "y"),
            ("p", "q"),
            ("q", "r"),
            ("r", "p"),
        ],
    );
    let depths = assign_depths(&g);
    assert_eq!(depths.node_count(), g.node_count());
    let mut seen = BTreeSet::new();
    for layer in &depths.layers {
        for id in layer {
            assert!(seen.insert(id.clone()), "{id} assigned twice");
        }
    }
    for id in ["lonely", "p", "q", "r"] {
        assert_eq!(depth(&g, id).depth, 0, "{id} should be an orphan");
    }
    assert_eq!(depth(&g, "d").depth, 3);

    let r = layered_bfs::layout(&g, &TEN, &LayoutOptions::default());
    assert_eq!(r.len(), g.node_count());
}

#[test]
fn layered_bfs_edgeless_graph_has_no_coincident_nodes() {
    let ids: Vec<String> = (0..23).map(|i| format!("n{i:02}")).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let g = graph(&refs, &[]);

    let r = layered_bfs::layout(&g, &TEN, &LayoutOptions::default());
    assert_eq!(r.len(), ids.len());
    let distinct: BTreeSet<(i64, i64)> = r
        .positions
        .values()
        .map(|p| (p.x.round() as i64, p.y.round() as i64))
        .collect();
    assert_eq!(distinct.len(), ids.len());
}

#[test]
fn layered_bfs_is_deterministic() {
    let edges: Vec<(String, String)> = (0..40)
        .map(|i| (format!("s{}", i % 7), format!("t{}", (i * 13) % 17)))
        .collect();
    let refs: Vec<(&str, &str)> = edges
        .iter()
        .map(|(s, t)| (s.as_str(), t.as_str()))
        .collect();
    let g = graph(&[], &refs);
    let opts = LayoutOptions::default().with_labels(true);

    let first = layered_bfs::layout(&g, &StyleSizeHints::default(), &opts);
    for _ in 0..5 {
        assert_eq!(layered_bfs::layout(&g.clone(), &StyleSizeHints::default(), &opts), first);
    }
}

#[test]
fn layered_bfs_swap_axes_turns_columns_into_rows() {
    let g = graph(&[], &[("A", "B")]);
    let opts = LayoutOptions::default().with_transform(PositionTransform::swap_axes());
    let r = layered_bfs::layout(&g, &TEN, &opts);
    let (a, b) = (r.get("A").unwrap(), r.get("B").unwrap());
    assert_eq!(a.x, b.x);
    assert!(a.y < b.y);
}

#[test]
fn layered_bfs_fit_starts_at_padding() {
    let g = graph(&[], &[("A", "B"), ("A", "C")]);
    let opts = LayoutOptions {
        fit: true,
        padding: 5.0,
        ..Default::default()
    };
    let r = layered_bfs::layout(&g, &TEN, &opts);
    let min_x = r.positions.values().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = r.positions.values().map(|p| p.y).fold(f64::INFINITY, f64::min);
    assert_eq!(Point::new(min_x, min_y), Point::new(10.0, 10.0));
}
