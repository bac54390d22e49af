//! # `fusegraph` - Fused Frontier Graph Analytics
//!
//! A shared-memory graph engine that runs several vertex-centric jobs
//! (BFS, SSSP, connected components, PageRank) over one immutable graph, and
//! can *fuse* frontier jobs so that one edge traversal per round serves all of
//! them.
//!
//! ## Architecture
//!
//! Leaves first:
//!
//! 1. **Graph partition** ([`GraphPartition`]):
//!    - CSR outgoing runs for push mode, CSC incoming runs for pull mode
//!    - Cached out-degrees for direction selection
//!    - Per-instance edge payload: unit or numeric weights
//!
//! 2. **Atomic update primitives** ([`concurrency::atomic`]):
//!    - `compare_and_swap` where any single winner is correct (BFS parents)
//!    - `atomic_min` where the result must not depend on write order (labels, distances)
//!    - `atomic_add` for accumulated contributions (PageRank)
//!
//! 3. **Engine** ([`Engine`]):
//!    - [`VertexSubset`] frontiers and [`VertexArray`] per-job state
//!    - `process_vertices`: parallel map-reduce over a subset
//!    - `process_edges`: direction-optimizing push/pull round, two-phase
//!      (all signals, then all slots), on an exclusively leased channel
//!
//! 4. **Jobs** ([`jobs`]): every frontier job is a [`FrontierJob`] record of
//!    callbacks over state it owns; PageRank iterates separately.
//!
//! 5. **Fusion** ([`FusedRun`]): up to [`MAX_FUSED_JOBS`] frontier jobs share
//!    each round through vector-valued messages with one slot per job.
//!
//! ### Sharing model
//!
//! The partition is shared read-only through an `Arc`. Every state array and
//! subset belongs to exactly one job; a fused run borrows its jobs mutably,
//! so disjointness of writable state is checked by the borrow checker. Jobs
//! running on separate threads against one engine each use their own channel.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fusegraph::jobs::{Bfs, ConnectedComponents};
//! use fusegraph::{EdgeOptions, Engine, EngineConfig, FusedRun, GraphPartition};
//!
//! let graph = GraphPartition::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)])?;
//! let engine = Engine::new(Arc::new(graph.symmetrized()), EngineConfig::default())?;
//!
//! let mut near = Bfs::new(&engine, 0)?;
//! let mut far = Bfs::new(&engine, 4)?;
//! let mut cc = ConnectedComponents::new(&engine);
//!
//! let mut run = FusedRun::new(&engine, EdgeOptions::default());
//! run.add(&mut near);
//! run.add(&mut far);
//! run.add(&mut cc);
//! let report = run.run();
//!
//! assert_eq!(report.jobs[0].rounds, 4);
//! assert_eq!(near.parents(), vec![0, 0, 1, 2, 3]);
//! assert_eq!(far.parents(), vec![1, 2, 3, 4, 4]);
//! assert_eq!(cc.labels(), vec![0; 5]);
//! # Ok::<(), fusegraph::Error>(())
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]

pub mod concurrency;
pub mod config;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod graph;
pub mod jobs;

pub use config::EngineConfig;
pub use engine::{Direction, EdgeOptions, Emitter, Engine, VertexArray, VertexSubset};
pub use error::{Error, Result};
pub use fusion::{FusedMessage, FusedRun, FusionReport, SlotVec, MAX_FUSED_JOBS};
pub use graph::{
    AdjList, AdjUnit, EdgeData, GraphPartition, VertexId, Weight, WeightKind, NO_VERTEX,
};
pub use jobs::{FrontierJob, JobKind, JobSpec, JobStats, JobSummary, Payload};

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // A slot is exactly its hardware atomic.
    assert!(mem::size_of::<concurrency::Atom<u32>>() == mem::size_of::<u32>());
    assert!(mem::size_of::<concurrency::Atom<f64>>() == mem::size_of::<u64>());

    // Job slots must be indexable by the `u8` length of a `SlotVec`.
    assert!(MAX_FUSED_JOBS <= u8::MAX as usize);

    // The sentinel is the one id a partition may never contain.
    assert!(NO_VERTEX == VertexId::MAX);
};
