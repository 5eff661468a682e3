use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The graph type every narwhal layout consumes.
pub type MeshGraph = narwhal_graph::Graph<NodeLabel, EdgeLabel>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Mesh metadata used to derive a node's display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLabels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Host-side style of a node. Compound nodes are sized from their children during grouped
/// layouts, but their style is never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub shape: String,
    pub width: f64,
    pub height: f64,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            shape: "ellipse".to_string(),
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Where a node ended up. Children of a compound node are placed relative to their parent's
/// center; everything else is absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutPosition {
    Relative {
        parent: String,
        #[serde(flatten)]
        offset: Point,
    },
    Absolute(Point),
}

impl LayoutPosition {
    pub fn point(&self) -> Point {
        match self {
            LayoutPosition::Absolute(p) => *p,
            LayoutPosition::Relative { offset, .. } => *offset,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub labels: NodeLabels,
    pub style: NodeStyle,
    pub position: Option<LayoutPosition>,
    /// Opaque host payload. Layouts never read it.
    pub data: serde_json::Value,
}

impl NodeLabel {
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            style: NodeStyle {
                width,
                height,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_labels(mut self, labels: NodeLabels) -> Self {
        self.labels = labels;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeLabel {
    pub data: serde_json::Value,
}

/// Name used to order nodes within a layer: workload, then service, app, namespace, and
/// finally the node id.
pub fn display_name<'a>(id: &'a str, node: &'a NodeLabel) -> &'a str {
    let l = &node.labels;
    [&l.workload, &l.service, &l.app, &l.namespace]
        .into_iter()
        .find_map(|v| v.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or(id)
}

/// Positions produced by a flat layout, keyed by node id. Every point is the node's center.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub positions: BTreeMap<String, Point>,
}

impl LayoutResult {
    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A synthetic edge that stood in for one or more real edges while a grouped layout ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Ids of the real edges this one replaced.
    pub replaces: Vec<String>,
}

/// Result of a compound-aware layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupLayoutResult {
    pub positions: BTreeMap<String, LayoutPosition>,
    /// Synthetic edges the underlying layout saw. They never exist on the host graph.
    pub synthetic_edges: Vec<SyntheticEdge>,
}

impl GroupLayoutResult {
    /// Flattens parent-relative positions into absolute centers by walking up to the nearest
    /// absolutely positioned ancestor. Chains that never reach one (a missing or cyclic parent)
    /// are anchored at the origin.
    pub fn resolve_absolute(&self) -> LayoutResult {
        let mut out = LayoutResult::default();
        for id in self.positions.keys() {
            let mut acc = Point::ORIGIN;
            let mut cur = id.as_str();
            for _ in 0..=self.positions.len() {
                match self.positions.get(cur) {
                    Some(LayoutPosition::Absolute(p)) => {
                        acc.x += p.x;
                        acc.y += p.y;
                        break;
                    }
                    Some(LayoutPosition::Relative { parent, offset }) => {
                        acc.x += offset.x;
                        acc.y += offset.y;
                        cur = parent;
                    }
                    None => break,
                }
            }
            out.positions.insert(id.clone(), acc);
        }
        out
    }
}
