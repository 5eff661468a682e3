//! Helper algorithms over [`Graph`].

use super::Graph;
use std::collections::{BTreeSet, VecDeque};

/// Weakly connected components, each listed in BFS order from its first node (by insertion
/// order). Components are returned in the insertion order of their first node.
pub fn components<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
{
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.nodes() {
        if !seen.insert(start) {
            continue;
        }
        let mut comp: Vec<String> = Vec::new();
        let mut q: VecDeque<&str> = VecDeque::new();
        q.push_back(start);
        while let Some(v) = q.pop_front() {
            comp.push(v.to_string());
            for n in g.successors(v) {
                if seen.insert(n) {
                    q.push_back(n);
                }
            }
            for n in g.predecessors(v) {
                if seen.insert(n) {
                    q.push_back(n);
                }
            }
        }
        out.push(comp);
    }

    out
}

/// Returns the first node (by insertion order) that is its own ancestor, if any.
pub fn find_parent_cycle<N, E>(g: &Graph<N, E>) -> Option<String>
where
    N: Default + 'static,
    E: Default + 'static,
{
    // Nodes already proven to reach a root without looping.
    let mut acyclic: BTreeSet<&str> = BTreeSet::new();

    for start in g.nodes() {
        let mut path: Vec<&str> = Vec::new();
        let mut cur = Some(start);
        while let Some(v) = cur {
            if acyclic.contains(v) {
                break;
            }
            if path.contains(&v) {
                return Some(v.to_string());
            }
            path.push(v);
            cur = g.parent(v);
        }
        acyclic.extend(path);
    }

    None
}
