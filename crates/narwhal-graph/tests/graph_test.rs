use narwhal_graph::{Graph, GraphError};

#[test]
fn set_edge_creates_missing_endpoints_in_order() {
    let mut g: Graph<(), i32> = Graph::new();
    g.set_edge("e1", "a", "b", 7);

    assert_eq!(g.node_ids(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(g.edge("e1"), Some(&7));
    let ends = g.edge_endpoints("e1").expect("edge");
    assert_eq!((ends.source, ends.target), ("a", "b"));
}

#[test]
fn parallel_edges_are_kept_apart_by_id() {
    let mut g: Graph<(), ()> = Graph::new();
    g.set_edge("http", "a", "b", ());
    g.set_edge("grpc", "a", "b", ());

    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.successors("a"), vec!["b", "b"]);
    assert_eq!(g.in_degree("b"), 2);
    assert!(g.has_edge_between("a", "b"));
    assert!(!g.has_edge_between("b", "a"));
}

#[test]
fn insert_edge_rejects_duplicate_ids() {
    let mut g: Graph<(), ()> = Graph::new();
    g.insert_edge("e", "a", "b", ()).expect("first insert");
    assert_eq!(
        g.insert_edge("e", "b", "c", ()),
        Err(GraphError::DuplicateEdge {
            edge_id: "e".to_string()
        })
    );
}

#[test]
fn adjacency_follows_mutations() {
    let mut g: Graph<(), ()> = Graph::new();
    g.set_edge("ab", "a", "b", ());
    g.set_edge("bc", "b", "c", ());
    assert_eq!(g.successors("b"), vec!["c"]);
    assert_eq!(g.sources(), vec!["a"]);

    assert!(g.remove_edge("ab"));
    assert_eq!(g.predecessors("b"), Vec::<&str>::new());
    let mut sources = g.sources();
    sources.sort();
    assert_eq!(sources, vec!["a", "b"]);

    g.set_edge("ca", "c", "a", ());
    assert_eq!(g.out_edges("c"), vec!["ca"]);
    assert_eq!(g.in_edges("a"), vec!["ca"]);
}

#[test]
fn remove_node_drops_incident_edges_and_links() {
    let mut g: Graph<(), ()> = Graph::new();
    g.set_parent("c1", "p");
    g.set_parent("c2", "p");
    g.set_edge("e1", "c1", "x", ());
    g.set_edge("e2", "x", "c2", ());
    g.set_edge("e3", "x", "y", ());

    assert!(g.remove_node("c1"));
    assert_eq!(g.children("p"), vec!["c2"]);
    assert!(!g.has_edge("e1"));
    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.successors("x"), vec!["c2", "y"]);

    assert!(g.remove_node("p"));
    assert_eq!(g.parent("c2"), None);
    assert!(!g.remove_node("p"));
}

#[test]
fn compound_queries() {
    let mut g: Graph<(), ()> = Graph::new();
    g.set_parent("r", "q");
    g.set_parent("q", "p");
    g.set_node("e", ());

    assert!(g.has_children("p"));
    assert!(!g.has_children("r"));
    assert_eq!(g.ancestors("r"), vec!["q", "p"]);
    assert_eq!(g.top_level_ancestor("r"), "p");
    assert_eq!(g.top_level_ancestor("e"), "e");
    assert_eq!(g.children_root(), vec!["p", "e"]);

    g.clear_parent("q");
    assert_eq!(g.top_level_ancestor("r"), "q");
}

#[test]
fn validate_reports_parent_cycles() {
    let mut g: Graph<(), ()> = Graph::new();
    g.set_parent("a", "b");
    g.set_parent("b", "a");
    assert!(matches!(g.validate(), Err(GraphError::ParentCycle { .. })));
}

#[test]
fn clone_keeps_structure() {
    let mut g: Graph<u8, ()> = Graph::new();
    g.set_node("a", 1);
    g.set_edge("ab", "a", "b", ());
    let h = g.clone();
    assert_eq!(h.node("a"), Some(&1));
    assert_eq!(h.successors("a"), vec!["b"]);
}
