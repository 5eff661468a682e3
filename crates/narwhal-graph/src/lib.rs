#![forbid(unsafe_code)]

//! Compound directed graph container used by `narwhal`.
//!
//! Nodes are keyed by string ids and kept in insertion order. Edges carry their own unique id
//! (a topology can hold several edges between the same pair of nodes, one per protocol). The
//! parent/child relation forms a forest and is stored next to the node table, so a node's
//! label never has to carry layout bookkeeping.

pub mod error;
mod graph;

pub use error::{GraphError, Result};
pub use graph::{Endpoints, Graph, alg};
