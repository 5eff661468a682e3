//! Builds the flattened view a grouped layout hands to its underlying algorithm.
//!
//! Top-level compound nodes become plain rectangles sized by the vertical stack of their
//! children, every descendant is hidden, and edges touching hidden nodes are redirected to the
//! top-level compounds that contain them. The host graph is only read.

use crate::error::Result;
use crate::model::{
    EdgeLabel, LayoutPosition, MeshGraph, NodeLabel, NodeStyle, Point, Size, SyntheticEdge,
};
use crate::options::{CompoundOptions, LayoutOptions};
use crate::size::SizeHints;
use indexmap::IndexMap;
use std::collections::BTreeMap;

const PLACEHOLDER_SHAPE: &str = "rectangle";

/// A flattened copy of a compound graph plus everything needed to put it back together.
#[derive(Debug, Clone)]
pub struct FlattenedView {
    /// Top-level nodes, surviving original edges and synthetic edges.
    pub graph: MeshGraph,
    /// Placeholder box of every compound node, nested ones included.
    pub boxes: BTreeMap<String, Size>,
    /// Parent-relative position of every node that has a parent.
    pub interiors: BTreeMap<String, LayoutPosition>,
    pub synthetic_edges: Vec<SyntheticEdge>,
}

impl FlattenedView {
    pub fn is_hidden(&self, id: &str) -> bool {
        self.interiors.contains_key(id)
    }
}

/// Size hints for the flattened view: compounds report their placeholder box, everything else
/// is delegated to the host's hints.
pub(super) struct PlaceholderSizes<'a> {
    pub(super) boxes: &'a BTreeMap<String, Size>,
    pub(super) inner: &'a dyn SizeHints,
}

impl SizeHints for PlaceholderSizes<'_> {
    fn size(&self, id: &str, node: &NodeLabel, opts: &LayoutOptions) -> Size {
        match self.boxes.get(id) {
            Some(b) => *b,
            None => self.inner.size(id, node, opts),
        }
    }
}

/// Hands out synthetic edge ids for one flattening pass, skipping ids the host already uses.
struct SyntheticIds<'a> {
    graph: &'a MeshGraph,
    next: usize,
}

impl SyntheticIds<'_> {
    fn next_id(&mut self) -> String {
        loop {
            let id = format!("synthetic-edge-{}", self.next);
            self.next += 1;
            if !self.graph.has_edge(&id) {
                return id;
            }
        }
    }
}

/// Flattens `graph`. Fails only when the graph itself is malformed (dangling edge endpoints,
/// dangling parents, or a parent cycle).
pub fn flatten(
    graph: &MeshGraph,
    sizes: &dyn SizeHints,
    opts: &LayoutOptions,
) -> Result<FlattenedView> {
    graph.validate()?;

    let mut boxes: BTreeMap<String, Size> = BTreeMap::new();
    let mut interiors: BTreeMap<String, LayoutPosition> = BTreeMap::new();
    for top in graph.children_root() {
        if graph.has_children(top) {
            stack(graph, top, sizes, opts, &mut boxes, &mut interiors);
        }
    }

    let mut view = MeshGraph::new();
    for top in graph.children_root() {
        let Some(node) = graph.node(top) else {
            continue;
        };
        let style = match boxes.get(top) {
            Some(b) => NodeStyle {
                shape: PLACEHOLDER_SHAPE.to_string(),
                width: b.width,
                height: b.height,
            },
            None => node.style.clone(),
        };
        view.set_node(
            top,
            NodeLabel {
                labels: node.labels.clone(),
                style,
                position: None,
                data: serde_json::Value::Null,
            },
        );
    }

    let mut ids = SyntheticIds { graph, next: 0 };
    let mut synthetic: IndexMap<(String, String), SyntheticEdge> = IndexMap::new();
    for e in graph.edges() {
        let hidden_end = interiors.contains_key(e.source) || interiors.contains_key(e.target);
        if !hidden_end {
            view.set_edge(e.id, e.source, e.target, EdgeLabel::default());
            continue;
        }

        let source = graph.top_level_ancestor(e.source);
        let target = graph.top_level_ancestor(e.target);
        if source == target {
            continue;
        }
        let key = (source.to_string(), target.to_string());
        if let Some(existing) = synthetic.get_mut(&key) {
            existing.replaces.push(e.id.to_string());
            continue;
        }
        let id = ids.next_id();
        view.set_edge(id.clone(), source, target, EdgeLabel::default());
        synthetic.insert(
            key,
            SyntheticEdge {
                id,
                source: source.to_string(),
                target: target.to_string(),
                replaces: vec![e.id.to_string()],
            },
        );
    }

    tracing::debug!(
        compounds = boxes.len(),
        hidden = interiors.len(),
        synthetic_edges = synthetic.len(),
        "compound-group: flattened"
    );

    Ok(FlattenedView {
        graph: view,
        boxes,
        interiors,
        synthetic_edges: synthetic.into_values().collect(),
    })
}

/// Stacks the children of `parent` top to bottom on `x = 0` and returns the parent's box.
/// Nested compounds are stacked first and contribute their own box.
fn stack(
    graph: &MeshGraph,
    parent: &str,
    sizes: &dyn SizeHints,
    opts: &LayoutOptions,
    boxes: &mut BTreeMap<String, Size>,
    interiors: &mut BTreeMap<String, LayoutPosition>,
) -> Size {
    let children = graph.children(parent);
    let child_sizes: Vec<Size> = children
        .iter()
        .map(|&c| {
            if graph.has_children(c) {
                stack(graph, c, sizes, opts, boxes, interiors)
            } else {
                match graph.node(c) {
                    Some(node) => sizes.size(c, node, opts),
                    None => Size::default(),
                }
            }
        })
        .collect();

    let (bounds, offsets) = stack_offsets(&child_sizes, &opts.compound);
    for (child, offset) in children.iter().zip(offsets) {
        interiors.insert(
            child.to_string(),
            LayoutPosition::Relative {
                parent: parent.to_string(),
                offset,
            },
        );
    }
    boxes.insert(parent.to_string(), bounds);
    bounds
}

/// Box of a vertical stack and each item's center relative to the box center.
///
/// Width is the widest item plus `side_padding` on both sides; height is the sum of item
/// heights plus `child_spacing` above, between, and below the items. Every item sits at `x = 0`.
pub fn stack_offsets(items: &[Size], spacing: &CompoundOptions) -> (Size, Vec<Point>) {
    let widest = items.iter().map(|s| s.width).fold(0.0, f64::max);
    let total_height: f64 = items.iter().map(|s| s.height).sum();
    let bounds = Size {
        width: widest + 2.0 * spacing.side_padding,
        height: total_height + spacing.child_spacing * (items.len() as f64 + 1.0),
    };

    let mut top = -bounds.height / 2.0 + spacing.child_spacing;
    let mut offsets = Vec::with_capacity(items.len());
    for s in items {
        offsets.push(Point {
            x: 0.0,
            y: top + s.height / 2.0,
        });
        top += s.height + spacing.child_spacing;
    }
    (bounds, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::FixedSizeHints;

    #[test]
    fn stack_offsets_keep_fixed_gaps() {
        let spacing = CompoundOptions {
            child_spacing: 10.0,
            side_padding: 5.0,
        };
        let (bounds, offsets) =
            stack_offsets(&[Size::new(20.0, 10.0), Size::new(40.0, 30.0)], &spacing);
        assert_eq!(bounds, Size::new(50.0, 70.0));
        assert_eq!(offsets[0], Point::new(0.0, -20.0));
        assert_eq!(offsets[1], Point::new(0.0, 10.0));

        // Gap between the boxes is exactly `child_spacing`.
        let first_bottom = offsets[0].y + 5.0;
        let second_top = offsets[1].y - 15.0;
        assert_eq!(second_top - first_bottom, 10.0);
    }

    #[test]
    fn narrow_items_stay_on_the_stack_axis() {
        let spacing = CompoundOptions {
            child_spacing: 10.0,
            side_padding: 5.0,
        };
        let (bounds, offsets) =
            stack_offsets(&[Size::new(40.0, 10.0), Size::new(10.0, 10.0)], &spacing);
        assert_eq!(bounds, Size::new(50.0, 40.0));
        assert_eq!(offsets, vec![Point::new(0.0, -10.0), Point::new(0.0, 10.0)]);
    }

    #[test]
    fn stack_of_nothing_is_just_padding() {
        let (bounds, offsets) = stack_offsets(&[], &CompoundOptions::default());
        assert_eq!(bounds, Size::new(20.0, 10.0));
        assert!(offsets.is_empty());
    }

    #[test]
    fn synthetic_ids_avoid_host_ids() {
        let mut g = MeshGraph::new();
        g.set_edge("synthetic-edge-0", "a", "b", EdgeLabel::default());
        let mut ids = SyntheticIds { graph: &g, next: 0 };
        assert_eq!(ids.next_id(), "synthetic-edge-1");
        assert_eq!(ids.next_id(), "synthetic-edge-2");
    }

    #[test]
    fn placeholder_style_is_a_rectangle_in_the_view_only() {
        let mut g = MeshGraph::new();
        g.set_node("p", NodeLabel::with_size(1.0, 1.0));
        g.set_node("c", NodeLabel::default());
        g.set_parent("c", "p");

        let opts = LayoutOptions::default();
        let view = flatten(&g, &FixedSizeHints(Size::new(10.0, 10.0)), &opts).expect("flatten");
        let placeholder = view.graph.node("p").expect("placeholder");
        assert_eq!(placeholder.style.shape, "rectangle");
        assert_eq!(placeholder.style.width, 30.0);
        assert_eq!(placeholder.style.height, 30.0);
        assert_eq!(g.node("p").map(|n| n.style.shape.as_str()), Some("ellipse"));
        assert!(!view.graph.has_node("c"));
        assert!(view.is_hidden("c"));
    }
}
