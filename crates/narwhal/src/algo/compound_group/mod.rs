//! Compound-aware layout that reuses any flat layout.
//!
//! Each top-level compound node is collapsed into a rectangle as large as the vertical stack of
//! its children, edges touching hidden descendants are redirected to their top-level compound
//! (one synthetic edge per distinct pair), and the flattened view is handed to the underlying
//! algorithm. Once it completes, top-level positions come from the underlying result and every
//! descendant gets a position relative to its parent from the stack.
//!
//! The host graph is never restructured. Only positions are written back, and only after the
//! underlying layout finished, did not time out, and the pass was not cancelled.

pub mod flatten;

pub use flatten::{FlattenedView, flatten, stack_offsets};

use crate::algo::LayoutAlgorithm;
use crate::cancel::{CancelToken, deadline};
use crate::error::{Error, Result};
use crate::model::{GroupLayoutResult, LayoutPosition, LayoutResult, MeshGraph, Point};
use crate::options::LayoutOptions;
use crate::size::SizeHints;
use flatten::PlaceholderSizes;
use futures::future::{Either, FutureExt, LocalBoxFuture, select};
use std::collections::BTreeMap;
use std::time::Duration;

/// Wraps an underlying algorithm `A` so that it can lay out graphs with compound nodes.
#[derive(Debug, Clone, Default)]
pub struct CompoundGroup<A> {
    inner: A,
}

impl<A: LayoutAlgorithm> CompoundGroup<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Computes positions without touching `graph`.
    pub async fn compute(
        &self,
        graph: &MeshGraph,
        sizes: &dyn SizeHints,
        opts: &LayoutOptions,
    ) -> Result<GroupLayoutResult> {
        if !graph.nodes().any(|v| graph.has_children(v)) {
            graph.validate()?;
            let flat = self.delegate(graph, sizes, opts).await?;
            let positions = flat
                .positions
                .into_iter()
                .map(|(id, p)| (id, LayoutPosition::Absolute(p)))
                .collect();
            return Ok(GroupLayoutResult {
                positions,
                synthetic_edges: Vec::new(),
            });
        }

        let FlattenedView {
            graph: view,
            boxes,
            interiors,
            synthetic_edges,
        } = flatten(graph, sizes, opts)?;

        let placeholder_sizes = PlaceholderSizes {
            boxes: &boxes,
            inner: sizes,
        };
        let flat = self.delegate(&view, &placeholder_sizes, opts).await?;

        let mut positions: BTreeMap<String, LayoutPosition> = BTreeMap::new();
        for top in view.nodes() {
            let p = match flat.get(top) {
                Some(p) => p,
                None => {
                    tracing::warn!(
                        node = top,
                        algorithm = self.inner.name(),
                        "compound-group: underlying layout left a node unplaced"
                    );
                    Point::ORIGIN
                }
            };
            positions.insert(top.to_string(), LayoutPosition::Absolute(p));
        }
        positions.extend(interiors);

        Ok(GroupLayoutResult {
            positions,
            synthetic_edges,
        })
    }

    /// Computes positions and writes them onto `graph`.
    ///
    /// If `cancel` fires while the underlying layout is running, nothing is written and
    /// [`Error::Cancelled`] is returned. Holding `&mut graph` for the whole pass keeps a second
    /// layout from starting on the same graph before this one is done.
    pub async fn layout(
        &self,
        graph: &mut MeshGraph,
        sizes: &dyn SizeHints,
        opts: &LayoutOptions,
        cancel: &CancelToken,
    ) -> Result<GroupLayoutResult> {
        let result = self.compute(&*graph, sizes, opts).await?;
        if cancel.is_cancelled() {
            tracing::warn!(
                algorithm = self.inner.name(),
                "compound-group: pass cancelled, positions discarded"
            );
            return Err(Error::Cancelled);
        }
        result.apply_to(graph);
        Ok(result)
    }

    /// Runs the underlying algorithm, bounded by `opts.timeout_ms` when set.
    async fn delegate(
        &self,
        graph: &MeshGraph,
        sizes: &dyn SizeHints,
        opts: &LayoutOptions,
    ) -> Result<LayoutResult> {
        let run = self.inner.run(graph, sizes, opts);
        let Some(after_ms) = opts.timeout_ms else {
            return run.await;
        };
        match select(run, deadline(Duration::from_millis(after_ms)).boxed()).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                tracing::warn!(
                    algorithm = self.inner.name(),
                    after_ms,
                    "compound-group: underlying layout timed out"
                );
                Err(Error::TimedOut {
                    algorithm: self.inner.name(),
                    after_ms,
                })
            }
        }
    }
}

impl<A: LayoutAlgorithm> LayoutAlgorithm for CompoundGroup<A> {
    fn name(&self) -> &'static str {
        "compound-group"
    }

    fn run<'a>(
        &'a self,
        graph: &'a MeshGraph,
        sizes: &'a dyn SizeHints,
        opts: &'a LayoutOptions,
    ) -> LocalBoxFuture<'a, Result<LayoutResult>> {
        async move {
            let grouped = self.compute(graph, sizes, opts).await?;
            Ok(grouped.resolve_absolute())
        }
        .boxed_local()
    }
}
