//! The core [`Graph`] container plus a small set of helper algorithms (`alg`).

use crate::error::{GraphError, Result};
use rustc_hash::FxBuildHasher;
use std::cell::RefCell;

mod adj_cache;
pub mod alg;
mod entries;

use adj_cache::DirectedAdjCache;
pub use entries::Endpoints;
use entries::{EdgeEntry, NodeEntry};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

pub struct Graph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<String, usize>,

    parent: HashMap<String, String>,
    children: HashMap<String, Vec<String>>,

    // Layouts walk successors of every node; the cache keeps those queries O(degree). It is
    // rebuilt lazily whenever the generation moves, and lives behind a `RefCell` so that
    // query APIs stay on `&self`.
    adj_gen: u64,
    adj_cache: RefCell<Option<DirectedAdjCache>>,
}

impl<N, E> Default for Graph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Clone for Graph<N, E>
where
    N: Default + Clone + 'static,
    E: Default + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            node_index: self.node_index.clone(),
            edges: self.edges.clone(),
            edge_index: self.edge_index.clone(),
            parent: self.parent.clone(),
            children: self.children.clone(),
            adj_gen: self.adj_gen,
            adj_cache: RefCell::new(None),
        }
    }
}

impl<N, E> std::fmt::Debug for Graph<N, E>
where
    N: Default + std::fmt::Debug + 'static,
    E: Default + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .field("parent", &self.parent)
            .finish()
    }
}

impl<N, E> Graph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            parent: HashMap::default(),
            children: HashMap::default(),
            adj_gen: 0,
            adj_cache: RefCell::new(None),
        }
    }

    fn invalidate_adj(&mut self) {
        self.adj_gen = self.adj_gen.wrapping_add(1);
        *self.adj_cache.get_mut() = None;
    }

    fn ensure_adj(&self) -> std::cell::RefMut<'_, DirectedAdjCache> {
        let generation = self.adj_gen;
        let mut cache = self.adj_cache.borrow_mut();
        let stale = cache.as_ref().is_none_or(|c| c.generation != generation);
        if stale {
            let endpoints = self.edges.iter().map(|e| {
                let v = *self.node_index.get(e.source.as_str())?;
                let w = *self.node_index.get(e.target.as_str())?;
                Some((v, w))
            });
            *cache = Some(DirectedAdjCache::build(
                generation,
                self.nodes.len(),
                endpoints,
            ));
        }
        std::cell::RefMut::map(cache, |c| {
            c.get_or_insert_with(|| DirectedAdjCache::build(generation, 0, std::iter::empty()))
        })
    }

    // ---- nodes -------------------------------------------------------------------------------

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        self.invalidate_adj();
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if self.node_index.contains_key(&id) {
            return self;
        }
        self.set_node(id, N::default())
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Removes a node, every edge touching it, and its parent/child links. Children of the
    /// removed node become top-level nodes.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_index.remove(id) else {
            return false;
        };

        self.invalidate_adj();
        self.nodes.remove(idx);
        for i in idx..self.nodes.len() {
            let node_id = self.nodes[i].id.as_str();
            if let Some(v) = self.node_index.get_mut(node_id) {
                *v = i;
            }
        }

        let before = self.edges.len();
        self.edges.retain(|e| e.source != id && e.target != id);
        if self.edges.len() != before {
            self.reindex_edges();
        }

        if let Some(parent) = self.parent.remove(id) {
            if let Some(ch) = self.children.get_mut(&parent) {
                ch.retain(|c| c != id);
            }
        }
        if let Some(ch) = self.children.remove(id) {
            for child in ch {
                self.parent.remove(&child);
            }
        }

        true
    }

    // ---- edges -------------------------------------------------------------------------------

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Endpoints<'_>> {
        self.edges.iter().map(|e| Endpoints {
            id: e.id.as_str(),
            source: e.source.as_str(),
            target: e.target.as_str(),
        })
    }

    pub fn edge(&self, id: &str) -> Option<&E> {
        self.edge_index.get(id).map(|&idx| &self.edges[idx].label)
    }

    pub fn edge_endpoints(&self, id: &str) -> Option<Endpoints<'_>> {
        self.edge_index.get(id).map(|&idx| {
            let e = &self.edges[idx];
            Endpoints {
                id: e.id.as_str(),
                source: e.source.as_str(),
                target: e.target.as_str(),
            }
        })
    }

    /// Inserts or replaces the edge `id`. Missing endpoints are created with a default label.
    pub fn set_edge(
        &mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: E,
    ) -> &mut Self {
        let id = id.into();
        let source = source.into();
        let target = target.into();
        self.ensure_node(source.clone());
        self.ensure_node(target.clone());
        self.invalidate_adj();

        if let Some(&idx) = self.edge_index.get(&id) {
            let e = &mut self.edges[idx];
            e.source = source;
            e.target = target;
            e.label = label;
            return self;
        }

        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            id: id.clone(),
            source,
            target,
            label,
        });
        self.edge_index.insert(id, idx);
        self
    }

    /// Like [`Graph::set_edge`], but refuses to overwrite an existing edge id.
    pub fn insert_edge(
        &mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: E,
    ) -> Result<()> {
        let id = id.into();
        if self.edge_index.contains_key(&id) {
            return Err(GraphError::DuplicateEdge { edge_id: id });
        }
        self.set_edge(id, source, target, label);
        Ok(())
    }

    fn reindex_edges(&mut self) {
        self.edge_index.clear();
        for (i, e) in self.edges.iter().enumerate() {
            self.edge_index.insert(e.id.clone(), i);
        }
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        let Some(idx) = self.edge_index.remove(id) else {
            return false;
        };
        self.invalidate_adj();
        self.edges.remove(idx);
        for i in idx..self.edges.len() {
            let edge_id = self.edges[i].id.as_str();
            if let Some(v) = self.edge_index.get_mut(edge_id) {
                *v = i;
            }
        }
        true
    }

    // ---- adjacency ---------------------------------------------------------------------------

    /// Targets of `v`'s outgoing edges, in edge insertion order (duplicates kept).
    pub fn successors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        self.for_each_successor(v, |w| out.push(w));
        out
    }

    /// Sources of `v`'s incoming edges, in edge insertion order (duplicates kept).
    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_adj();
        cache
            .in_edges(v_idx)
            .iter()
            .map(|&edge_idx| self.edges[edge_idx].source.as_str())
            .collect()
    }

    pub fn for_each_successor<'a, F>(&'a self, v: &str, mut f: F)
    where
        F: FnMut(&'a str),
    {
        let Some(&v_idx) = self.node_index.get(v) else {
            return;
        };
        let cache = self.ensure_adj();
        for &edge_idx in cache.out_edges(v_idx) {
            f(self.edges[edge_idx].target.as_str());
        }
    }

    pub fn in_degree(&self, v: &str) -> usize {
        let Some(&v_idx) = self.node_index.get(v) else {
            return 0;
        };
        self.ensure_adj().in_edges(v_idx).len()
    }

    pub fn out_degree(&self, v: &str) -> usize {
        let Some(&v_idx) = self.node_index.get(v) else {
            return 0;
        };
        self.ensure_adj().out_edges(v_idx).len()
    }

    /// Ids of `v`'s outgoing edges.
    pub fn out_edges(&self, v: &str) -> Vec<&str> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_adj();
        cache
            .out_edges(v_idx)
            .iter()
            .map(|&edge_idx| self.edges[edge_idx].id.as_str())
            .collect()
    }

    /// Ids of `v`'s incoming edges.
    pub fn in_edges(&self, v: &str) -> Vec<&str> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_adj();
        cache
            .in_edges(v_idx)
            .iter()
            .map(|&edge_idx| self.edges[edge_idx].id.as_str())
            .collect()
    }

    pub fn has_edge_between(&self, source: &str, target: &str) -> bool {
        let Some(&v_idx) = self.node_index.get(source) else {
            return false;
        };
        let cache = self.ensure_adj();
        cache
            .out_edges(v_idx)
            .iter()
            .any(|&edge_idx| self.edges[edge_idx].target == target)
    }

    /// Nodes without incoming edges, in insertion order.
    pub fn sources(&self) -> Vec<&str> {
        let cache = self.ensure_adj();
        self.nodes
            .iter()
            .enumerate()
            .filter(|(ix, _)| cache.in_edges(*ix).is_empty())
            .map(|(_, n)| n.id.as_str())
            .collect()
    }

    // ---- compound forest ---------------------------------------------------------------------

    pub fn set_parent(&mut self, child: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        let child = child.into();
        let parent = parent.into();
        self.ensure_node(child.clone());
        self.ensure_node(parent.clone());
        if let Some(prev) = self.parent.insert(child.clone(), parent.clone()) {
            if let Some(ch) = self.children.get_mut(&prev) {
                ch.retain(|c| c != &child);
            }
        }
        let entry = self.children.entry(parent).or_default();
        if !entry.iter().any(|c| c == &child) {
            entry.push(child);
        }
        self
    }

    pub fn clear_parent(&mut self, child: &str) -> &mut Self {
        if let Some(prev) = self.parent.remove(child) {
            if let Some(ch) = self.children.get_mut(&prev) {
                ch.retain(|c| c != child);
            }
        }
        self
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        self.parent.get(child).map(|s| s.as_str())
    }

    /// Children of `parent`, in the order they were attached.
    pub fn children(&self, parent: &str) -> Vec<&str> {
        self.children
            .get(parent)
            .map(|v| v.iter().map(|s| s.as_str()).collect::<Vec<_>>())
            .unwrap_or_default()
    }

    pub fn has_children(&self, v: &str) -> bool {
        self.children.get(v).is_some_and(|c| !c.is_empty())
    }

    /// Nodes without a parent, in insertion order.
    pub fn children_root(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| !self.parent.contains_key(&n.id))
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Ancestors of `v`, nearest first. Stops early if the parent relation loops back.
    pub fn ancestors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let mut cur = v;
        while let Some(p) = self.parent(cur) {
            if p == v || out.contains(&p) {
                break;
            }
            out.push(p);
            cur = p;
        }
        out
    }

    /// The outermost ancestor of `v`, or `v` itself when it has no parent.
    pub fn top_level_ancestor<'a>(&'a self, v: &'a str) -> &'a str {
        self.ancestors(v).last().copied().unwrap_or(v)
    }

    /// Checks edge endpoints and the parent forest.
    pub fn validate(&self) -> Result<()> {
        for e in &self.edges {
            for end in [&e.source, &e.target] {
                if !self.has_node(end) {
                    return Err(GraphError::MissingEndpoint {
                        edge_id: e.id.clone(),
                        node_id: end.clone(),
                    });
                }
            }
        }
        for n in &self.nodes {
            if let Some(p) = self.parent(&n.id) {
                if !self.has_node(p) {
                    return Err(GraphError::MissingParent {
                        node_id: n.id.clone(),
                        parent_id: p.to_string(),
                    });
                }
            }
        }
        if let Some(node_id) = alg::find_parent_cycle(self) {
            return Err(GraphError::ParentCycle { node_id });
        }
        Ok(())
    }
}
