use crate::model::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Options shared by every narwhal layout.
///
/// All serialized fields have defaults, so a partial JSON document (for example a config file
/// that only sets `includeLabels`) deserializes cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Grow each node's box to cover its label before spacing layers.
    pub include_labels: bool,
    /// Translate the final drawing so its bounding box starts at `(padding, padding)`.
    pub fit: bool,
    pub padding: f64,
    pub overflow: OverflowPolicy,
    pub compound: CompoundOptions,
    /// Upper bound on how long a grouped layout waits for its underlying algorithm.
    pub timeout_ms: Option<u64>,
    /// Applied to every computed position before it is returned.
    #[serde(skip)]
    pub transform: PositionTransform,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            include_labels: false,
            fit: false,
            padding: 30.0,
            overflow: OverflowPolicy::default(),
            compound: CompoundOptions::default(),
            timeout_ms: None,
            transform: PositionTransform::identity(),
        }
    }
}

impl LayoutOptions {
    pub fn with_transform(mut self, transform: PositionTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_labels(mut self, include_labels: bool) -> Self {
        self.include_labels = include_labels;
        self
    }

    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_ms.map(std::time::Duration::from_millis)
    }
}

/// When a layer is wide enough to be wrapped onto several lines.
///
/// A layer overflows once it holds at least `row_factor × layer_count` nodes, where
/// `layer_count` includes the orphan layer whether or not it holds anything. A graph that has
/// a single layer wraps it into lines of `round(sqrt(len))` nodes; otherwise each line takes up
/// to `row_factor × layer_count` nodes. The factor is an empirical tuning knob.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverflowPolicy {
    pub row_factor: usize,
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        Self { row_factor: 2 }
    }
}

impl OverflowPolicy {
    /// Nodes per wrapped line for a layer of `len` nodes, or `None` when it fits on one line.
    pub fn split(&self, len: usize, layer_count: usize) -> Option<usize> {
        let threshold = self.row_factor.max(1) * layer_count.max(1);
        if len < threshold {
            return None;
        }
        let per_line = if layer_count <= 1 {
            (len as f64).sqrt().round() as usize
        } else {
            threshold
        };
        Some(per_line.max(1))
    }
}

/// Spacing of the vertical stack used inside compound nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompoundOptions {
    /// Gap between successive children, and between the first/last child and the border.
    pub child_spacing: f64,
    /// Gap between the widest child and the compound's left and right borders.
    pub side_padding: f64,
}

impl Default for CompoundOptions {
    fn default() -> Self {
        Self {
            child_spacing: 10.0,
            side_padding: 10.0,
        }
    }
}

/// Hook applied to every computed position, e.g. to flip axes.
#[derive(Clone)]
pub struct PositionTransform(Arc<dyn Fn(&str, Point) -> Point + Send + Sync>);

impl PositionTransform {
    pub fn identity() -> Self {
        Self(Arc::new(|_, p| p))
    }

    /// Exchanges x and y, turning left-to-right layers into top-to-bottom ones.
    pub fn swap_axes() -> Self {
        Self(Arc::new(|_, p| Point { x: p.y, y: p.x }))
    }

    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, Point) -> Point + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, id: &str, p: Point) -> Point {
        (self.0)(id, p)
    }
}

impl Default for PositionTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for PositionTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PositionTransform(..)")
    }
}
