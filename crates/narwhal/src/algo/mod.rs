//! Layout algorithms.
//!
//! Every algorithm implements [`LayoutAlgorithm`], which is also the contract a compound layout
//! delegates through: completion is the resolution of the returned future, so an algorithm that
//! animates or computes off-thread simply resolves later.

pub mod compound_group;
pub mod layered_bfs;

use crate::error::Result;
use crate::model::{LayoutResult, MeshGraph};
use crate::options::LayoutOptions;
use crate::size::SizeHints;
use futures::future::LocalBoxFuture;

pub use compound_group::CompoundGroup;
pub use layered_bfs::LayeredBfs;

pub trait LayoutAlgorithm {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Lays out `graph` and resolves with the center of every node it placed.
    fn run<'a>(
        &'a self,
        graph: &'a MeshGraph,
        sizes: &'a dyn SizeHints,
        opts: &'a LayoutOptions,
    ) -> LocalBoxFuture<'a, Result<LayoutResult>>;
}

impl<T: LayoutAlgorithm + ?Sized> LayoutAlgorithm for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn run<'a>(
        &'a self,
        graph: &'a MeshGraph,
        sizes: &'a dyn SizeHints,
        opts: &'a LayoutOptions,
    ) -> LocalBoxFuture<'a, Result<LayoutResult>> {
        (**self).run(graph, sizes, opts)
    }
}

impl<T: LayoutAlgorithm + ?Sized> LayoutAlgorithm for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn run<'a>(
        &'a self,
        graph: &'a MeshGraph,
        sizes: &'a dyn SizeHints,
        opts: &'a LayoutOptions,
    ) -> LocalBoxFuture<'a, Result<LayoutResult>> {
        (**self).run(graph, sizes, opts)
    }
}

/// The built-in layouts, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Layered BFS on the graph as is. Parent links are ignored.
    #[default]
    LayeredBfs,
    /// Compound grouping around layered BFS.
    Grouped,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::LayeredBfs => "bfs",
            Algorithm::Grouped => "group",
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "bfs" | "layered-bfs" => Ok(Algorithm::LayeredBfs),
            "group" | "compound-group" => Ok(Algorithm::Grouped),
            other => Err(format!("unknown layout algorithm: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_round_trip() {
        for a in [Algorithm::LayeredBfs, Algorithm::Grouped] {
            assert_eq!(a.name().parse::<Algorithm>(), Ok(a));
        }
        assert!("force".parse::<Algorithm>().is_err());
    }

    #[test]
    fn boxed_algorithms_keep_their_name() {
        let boxed: Box<dyn LayoutAlgorithm> = Box::new(CompoundGroup::new(LayeredBfs));
        assert_eq!(boxed.name(), "compound-group");

        fn name_of(a: impl LayoutAlgorithm) -> &'static str {
            a.name()
        }
        assert_eq!(name_of(&LayeredBfs), "layered-bfs");
        assert_eq!(name_of(boxed), "compound-group");
    }
}
