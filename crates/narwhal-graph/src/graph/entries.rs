//! Internal storage entries for [`Graph`](super::Graph).

#[derive(Debug, Clone)]
pub(in crate::graph) struct NodeEntry<N> {
    pub(in crate::graph) id: String,
    pub(in crate::graph) label: N,
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct EdgeEntry<E> {
    pub(in crate::graph) id: String,
    pub(in crate::graph) source: String,
    pub(in crate::graph) target: String,
    pub(in crate::graph) label: E,
}

/// Borrowed view of an edge's endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoints<'a> {
    pub id: &'a str,
    pub source: &'a str,
    pub target: &'a str,
}
