//! Immutable graph storage shared by every job of a run.
//!
//! A [`GraphPartition`] holds both adjacency directions of one edge set:
//! - outgoing runs (CSR, keyed by source) walked by push-mode traversal
//! - incoming runs (CSC, keyed by destination) walked by pull-mode traversal
//!
//! Edge weights are chosen per partition at runtime ([`WeightKind`]), so one
//! engine build serves weighted and unweighted inputs alike.

pub mod load;
pub mod partition;

pub use partition::{AdjIter, AdjList, AdjUnit, EdgeData, GraphPartition};

use serde::{Deserialize, Serialize};

/// Dense vertex identifier.
pub type VertexId = u32;

/// Numeric edge weight payload.
pub type Weight = f32;

/// Reserved id meaning "no vertex" (e.g. an unassigned BFS parent).
pub const NO_VERTEX: VertexId = VertexId::MAX;

/// Edge payload representation of a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightKind {
    /// Edges carry no payload; every edge costs `1.0`.
    #[default]
    Unit,
    /// Every edge carries a [`Weight`].
    Numeric,
}
