//! Layered breadth-first layout.
//!
//! Nodes are bucketed by their BFS distance from the graph's roots, each bucket is ordered by
//! display name, and buckets become columns laid out left to right. Nodes that no root reaches
//! (isolated nodes, rootless cycles) are collected into a leading column so nothing is dropped.
//! Columns that are much taller than the graph is wide are wrapped into several sub-columns.

use crate::algo::LayoutAlgorithm;
use crate::error::Result;
use crate::model::{LayoutResult, MeshGraph, Point, Size, display_name};
use crate::options::LayoutOptions;
use crate::size::SizeHints;
use futures::future::{FutureExt, LocalBoxFuture};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::VecDeque;

/// The layered breadth-first layout as an injectable algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredBfs;

impl LayoutAlgorithm for LayeredBfs {
    fn name(&self) -> &'static str {
        "layered-bfs"
    }

    fn run<'a>(
        &'a self,
        graph: &'a MeshGraph,
        sizes: &'a dyn SizeHints,
        opts: &'a LayoutOptions,
    ) -> LocalBoxFuture<'a, Result<LayoutResult>> {
        futures::future::ready(Ok(layout(graph, sizes, opts))).boxed_local()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthIndex {
    pub depth: usize,
    pub index: usize,
}

/// Node ids bucketed by depth. Depth 0 always exists and holds the orphans (possibly none);
/// depth `d > 0` holds nodes at BFS distance `d - 1` from the nearest root, sorted by display
/// name. Indices within a depth are the positions in its bucket, so they are always dense.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthAssignment {
    pub layers: Vec<Vec<String>>,
}

impl DepthAssignment {
    pub fn get(&self, id: &str) -> Option<DepthIndex> {
        self.layers.iter().enumerate().find_map(|(depth, layer)| {
            layer
                .iter()
                .position(|v| v == id)
                .map(|index| DepthIndex { depth, index })
        })
    }

    pub fn orphans(&self) -> &[String] {
        self.layers.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }
}

/// Roots are nodes that take part in at least one edge but are not the target of any.
fn roots(graph: &MeshGraph) -> Vec<&str> {
    graph
        .nodes()
        .filter(|v| graph.in_degree(v) == 0 && graph.out_degree(v) > 0)
        .collect()
}

/// Runs the multi-source BFS and orders every depth. Pure function of the graph's structure
/// and node labels.
pub fn assign_depths(graph: &MeshGraph) -> DepthAssignment {
    let roots = roots(graph);

    // Scratch side table: BFS depth per visited node.
    let mut depth_of: FxHashMap<&str, usize> = FxHashMap::default();
    let mut bfs_layers: Vec<Vec<&str>> = Vec::new();
    let mut queue: VecDeque<&str> = VecDeque::new();

    for &r in &roots {
        if depth_of.insert(r, 0).is_none() {
            queue.push_back(r);
            push_at(&mut bfs_layers, 0, r);
        }
    }

    while let Some(v) = queue.pop_front() {
        let next = depth_of[v] + 1;
        graph.for_each_successor(v, |w| {
            if depth_of.contains_key(w) {
                return;
            }
            depth_of.insert(w, next);
            push_at(&mut bfs_layers, next, w);
            queue.push_back(w);
        });
    }

    let orphans: Vec<String> = graph
        .nodes()
        .filter(|v| !depth_of.contains_key(v))
        .map(str::to_string)
        .collect();

    let mut layers: Vec<Vec<String>> = Vec::with_capacity(bfs_layers.len() + 1);
    layers.push(orphans);
    for layer in bfs_layers {
        let mut keyed: Vec<(&str, &str)> = layer
            .into_iter()
            .map(|v| {
                let name = graph.node(v).map(|n| display_name(v, n)).unwrap_or(v);
                (name, v)
            })
            .collect();
        keyed.sort_by(|a, b| locale_cmp(a.0, b.0).then_with(|| a.1.cmp(b.1)));
        layers.push(keyed.into_iter().map(|(_, v)| v.to_string()).collect());
    }

    tracing::debug!(
        roots = roots.len(),
        orphans = layers[0].len(),
        depths = layers.len(),
        "layered-bfs: depths assigned"
    );

    DepthAssignment { layers }
}

fn push_at<'a>(layers: &mut Vec<Vec<&'a str>>, depth: usize, v: &'a str) {
    if layers.len() <= depth {
        layers.resize_with(depth + 1, Vec::new);
    }
    layers[depth].push(v);
}

/// Case-insensitive ordering in the spirit of a root-locale collator: letters compare by their
/// lowercase form first, then lowercase sorts before uppercase, then raw code points break the
/// remaining ties.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let fold = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    fold(a)
        .cmp(&fold(b))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Lays out `graph` and returns node centers.
///
/// Depths become columns from left to right; inside a column nodes are stacked top to bottom
/// on slots as tall as the column's tallest node, centered on `y = 0`. Adjacent columns (and
/// the sub-columns of a wrapped depth) are spaced by half of each one's widest node. When
/// `opts.fit` is set the drawing is translated so its box starts at `(padding, padding)`.
/// `opts.transform` is applied last.
pub fn layout(graph: &MeshGraph, sizes: &dyn SizeHints, opts: &LayoutOptions) -> LayoutResult {
    let depths = assign_depths(graph);
    // The orphan depth counts even when empty.
    let layer_count = depths.layers.len();

    let mut centers: Vec<(&str, Point, Size)> = Vec::with_capacity(graph.node_count());
    let mut x = 0.0_f64;
    let mut prev_half_width: Option<f64> = None;

    for layer in depths.layers.iter().filter(|l| !l.is_empty()) {
        let layer_sizes: Vec<Size> = layer
            .iter()
            .map(|id| match graph.node(id) {
                Some(node) => sizes.size(id, node, opts),
                None => Size::default(),
            })
            .collect();
        let max_height = layer_sizes.iter().map(|s| s.height).fold(0.0, f64::max);

        let per_line = match opts.overflow.split(layer.len(), layer_count) {
            Some(n) => {
                tracing::debug!(
                    nodes = layer.len(),
                    per_line = n,
                    "layered-bfs: wrapping overflowing depth"
                );
                n
            }
            None => layer.len(),
        };

        for (line_ix, (ids, line_sizes)) in layer
            .chunks(per_line)
            .zip(layer_sizes.chunks(per_line))
            .enumerate()
        {
            let line_width = line_sizes.iter().map(|s| s.width).fold(0.0, f64::max);
            if line_ix > 0 || prev_half_width.is_some() {
                x += prev_half_width.unwrap_or(0.0) + line_width / 2.0;
            }
            let mid = (ids.len() as f64 - 1.0) / 2.0;
            for (i, (id, size)) in ids.iter().zip(line_sizes).enumerate() {
                let y = (i as f64 - mid) * max_height;
                centers.push((id.as_str(), Point { x, y }, *size));
            }
            prev_half_width = Some(line_width / 2.0);
        }
    }

    if opts.fit && !centers.is_empty() {
        let min_x = centers
            .iter()
            .map(|(_, p, s)| p.x - s.width / 2.0)
            .fold(f64::INFINITY, f64::min);
        let min_y = centers
            .iter()
            .map(|(_, p, s)| p.y - s.height / 2.0)
            .fold(f64::INFINITY, f64::min);
        let (dx, dy) = (opts.padding - min_x, opts.padding - min_y);
        for (_, p, _) in &mut centers {
            p.x += dx;
            p.y += dy;
        }
    }

    let mut result = LayoutResult::default();
    for (id, p, _) in centers {
        result
            .positions
            .insert(id.to_string(), opts.transform.apply(id, p));
    }
    result
}
