//! Adjacency cache used by [`Graph`](super::Graph).
//!
//! Breadth-first traversals query successors of every node once per layout run; scanning the
//! edge table each time would be O(E) per query. The cache is a compressed row layout rebuilt
//! lazily when the graph's generation changes.

#[derive(Debug, Clone)]
pub(in crate::graph) struct DirectedAdjCache {
    pub(in crate::graph) generation: u64,
    pub(in crate::graph) out_offsets: Vec<usize>,
    pub(in crate::graph) out_edges: Vec<usize>,
    pub(in crate::graph) in_offsets: Vec<usize>,
    pub(in crate::graph) in_edges: Vec<usize>,
}

impl DirectedAdjCache {
    /// Builds the cache from `(source_ix, target_ix)` pairs listed in edge-table order.
    /// Entries that could not be resolved (`None`) keep their slot in the numbering but are
    /// not indexed.
    pub(in crate::graph) fn build(
        generation: u64,
        node_count: usize,
        endpoints: impl Iterator<Item = Option<(usize, usize)>> + Clone,
    ) -> Self {
        let mut out_deg = vec![0usize; node_count];
        let mut in_deg = vec![0usize; node_count];
        for (v, w) in endpoints.clone().flatten() {
            out_deg[v] += 1;
            in_deg[w] += 1;
        }

        let out_offsets = prefix_offsets(&out_deg);
        let in_offsets = prefix_offsets(&in_deg);

        let mut out_edges = vec![0usize; out_offsets[node_count]];
        let mut in_edges = vec![0usize; in_offsets[node_count]];
        let mut out_fill = out_offsets.clone();
        let mut in_fill = in_offsets.clone();
        for (edge_ix, pair) in endpoints.enumerate() {
            let Some((v, w)) = pair else {
                continue;
            };
            out_edges[out_fill[v]] = edge_ix;
            out_fill[v] += 1;
            in_edges[in_fill[w]] = edge_ix;
            in_fill[w] += 1;
        }

        Self {
            generation,
            out_offsets,
            out_edges,
            in_offsets,
            in_edges,
        }
    }

    pub(in crate::graph) fn out_edges(&self, v_ix: usize) -> &[usize] {
        let start = self.out_offsets[v_ix];
        let end = self.out_offsets[v_ix + 1];
        &self.out_edges[start..end]
    }

    pub(in crate::graph) fn in_edges(&self, v_ix: usize) -> &[usize] {
        let start = self.in_offsets[v_ix];
        let end = self.in_offsets[v_ix + 1];
        &self.in_edges[start..end]
    }
}

fn prefix_offsets(degrees: &[usize]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(degrees.len() + 1);
    let mut acc = 0usize;
    offsets.push(0);
    for d in degrees {
        acc += d;
        offsets.push(acc);
    }
    offsets
}
