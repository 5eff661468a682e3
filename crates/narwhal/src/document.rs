//! JSON topology documents.
//!
//! A document is the headless way to hand a topology to narwhal: a flat list of nodes (each
//! optionally naming its parent) and a list of directed edges.
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "ns", "namespace": "bookinfo" },
//!     { "id": "reviews-v1", "parent": "ns", "workload": "reviews-v1", "width": 30, "height": 30 }
//!   ],
//!   "edges": [{ "id": "e0", "source": "productpage", "target": "reviews-v1" }]
//! }
//! ```

use crate::error::{Error, Result};
use crate::model::{EdgeLabel, MeshGraph, NodeLabel, NodeLabels, NodeStyle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyDocument {
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(flatten)]
    pub labels: NodeLabels,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDocument {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl TopologyDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds a validated graph. Node and edge ids must be unique, and every edge endpoint and
    /// parent must name a declared node.
    pub fn into_graph(self) -> Result<MeshGraph> {
        let mut g = MeshGraph::new();
        for n in &self.nodes {
            if g.has_node(&n.id) {
                return Err(invalid(format!("duplicate node id `{}`", n.id)));
            }
            let mut style = NodeStyle {
                width: n.width,
                height: n.height,
                ..Default::default()
            };
            if let Some(shape) = &n.shape {
                style.shape = shape.clone();
            }
            g.set_node(
                n.id.clone(),
                NodeLabel {
                    labels: n.labels.clone(),
                    style,
                    position: None,
                    data: n.data.clone(),
                },
            );
        }

        for n in &self.nodes {
            let Some(parent) = &n.parent else {
                continue;
            };
            if !g.has_node(parent) {
                return Err(invalid(format!(
                    "node `{}` names unknown parent `{parent}`",
                    n.id
                )));
            }
            g.set_parent(n.id.clone(), parent.clone());
        }

        for e in self.edges {
            for end in [&e.source, &e.target] {
                if !g.has_node(end) {
                    return Err(invalid(format!(
                        "edge `{}` references unknown node `{end}`",
                        e.id
                    )));
                }
            }
            g.insert_edge(e.id, e.source, e.target, EdgeLabel { data: e.data })?;
        }

        g.validate()?;
        tracing::debug!(
            nodes = g.node_count(),
            edges = g.edge_count(),
            "topology document loaded"
        );
        Ok(g)
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidDocument { message }
}
