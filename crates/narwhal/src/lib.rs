#![forbid(unsafe_code)]

//! Headless layouts for service-mesh topology graphs.
//!
//! narwhal positions the nodes of a [`MeshGraph`]: a directed graph of workloads, services and
//! apps whose nodes may be grouped under compound parents (namespaces, app boxes). Two layouts
//! are provided:
//!
//! - [`algo::LayeredBfs`] buckets nodes by breadth-first distance from the graph's roots and lays
//!   the buckets out as columns, with deterministic ordering and wrapping of overly tall columns.
//! - [`algo::CompoundGroup`] collapses compound nodes into sized placeholders, lets any
//!   [`algo::LayoutAlgorithm`] lay out the flattened view, and stacks each compound's children
//!   inside it.
//!
//! Rendering and interaction stay with the host: layouts read node sizes through
//! [`size::SizeHints`] and write positions through [`sink::PositionSink`].

pub mod algo;
pub mod cancel;
pub mod document;
pub mod error;
pub mod model;
pub mod options;
pub mod sink;
pub mod size;

pub use narwhal_graph as graph;

pub use algo::{Algorithm, CompoundGroup, LayeredBfs, LayoutAlgorithm};
pub use cancel::CancelToken;
pub use document::TopologyDocument;
pub use error::{Error, Result};
pub use model::{
    EdgeLabel, GroupLayoutResult, LayoutPosition, LayoutResult, MeshGraph, NodeLabel, NodeLabels,
    NodeStyle, Point, Size,
};
pub use options::{LayoutOptions, PositionTransform};
pub use size::{FixedSizeHints, SizeHints, StyleSizeHints};

/// Runs one of the built-in layouts and writes the resulting positions onto `graph`.
///
/// [`Algorithm::LayeredBfs`] ignores parent links and places every node absolutely;
/// [`Algorithm::Grouped`] places top-level nodes absolutely and descendants relative to their
/// parent. Either way nothing is written if `cancel` has fired by the time positions are ready.
pub async fn layout(
    graph: &mut MeshGraph,
    algorithm: Algorithm,
    sizes: &dyn SizeHints,
    opts: &LayoutOptions,
    cancel: &CancelToken,
) -> Result<GroupLayoutResult> {
    match algorithm {
        Algorithm::LayeredBfs => {
            let flat = algo::layered_bfs::layout(graph, sizes, opts);
            if cancel.is_cancelled() {
                tracing::warn!("layered-bfs: pass cancelled, positions discarded");
                return Err(Error::Cancelled);
            }
            flat.apply_to(graph);
            Ok(GroupLayoutResult {
                positions: flat
                    .positions
                    .into_iter()
                    .map(|(id, p)| (id, LayoutPosition::Absolute(p)))
                    .collect(),
                synthetic_edges: Vec::new(),
            })
        }
        Algorithm::Grouped => {
            CompoundGroup::new(LayeredBfs)
                .layout(graph, sizes, opts, cancel)
                .await
        }
    }
}
