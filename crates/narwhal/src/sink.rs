//! Where layout results are written.
//!
//! Layouts compute positions into plain maps; a [`PositionSink`] is how those positions reach
//! the host's node records, either by writing a field or by calling back into the host.

use crate::model::{GroupLayoutResult, LayoutPosition, LayoutResult, MeshGraph};

pub trait PositionSink {
    fn set_position(&mut self, id: &str, position: LayoutPosition);
}

impl PositionSink for MeshGraph {
    fn set_position(&mut self, id: &str, position: LayoutPosition) {
        if let Some(node) = self.node_mut(id) {
            node.position = Some(position);
        }
    }
}

impl<F> PositionSink for F
where
    F: FnMut(&str, LayoutPosition),
{
    fn set_position(&mut self, id: &str, position: LayoutPosition) {
        self(id, position)
    }
}

impl LayoutResult {
    /// Writes every position as an absolute position.
    pub fn apply_to(&self, sink: &mut impl PositionSink) {
        for (id, p) in &self.positions {
            sink.set_position(id, LayoutPosition::Absolute(*p));
        }
    }
}

impl GroupLayoutResult {
    /// Writes top-level nodes as absolute positions and descendants relative to their parent.
    pub fn apply_to(&self, sink: &mut impl PositionSink) {
        for (id, p) in &self.positions {
            sink.set_position(id, p.clone());
        }
    }
}
