//! Vertex-centric jobs built on the engine primitives.
//!
//! Frontier jobs (BFS, SSSP, CC) implement [`FrontierJob`], a record of
//! per-vertex and per-edge callbacks over state the job owns exclusively. The
//! same record drives an unfused run ([`run_frontier`]) and a fused one
//! ([`FusedRun`](crate::fusion::FusedRun)).
//!
//! PageRank updates are not monotone, so it has its own full-graph iteration
//! loop in [`PageRank`] and never joins a fused round.

mod bfs;
mod cc;
mod frontier;
mod pagerank;
mod spec;
mod sssp;

pub use bfs::{Bfs, NO_PARENT};
pub use cc::ConnectedComponents;
pub use pagerank::{PageRank, DEFAULT_DAMPING, DEFAULT_ITERATIONS};
pub use spec::{Job, JobSpec};
pub use sssp::{Sssp, UNREACHED};

pub(crate) use frontier::Frontier;

use core::fmt;
use core::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{EdgeOptions, Engine, VertexSubset};
use crate::graph::{AdjUnit, VertexId, Weight};

/// Algorithm of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Breadth-first search.
    Bfs,
    /// Single-source shortest paths.
    Sssp,
    /// Connected components by label propagation.
    Cc,
    /// PageRank.
    #[serde(rename = "pagerank")]
    PageRank,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobKind::Bfs => "bfs",
            JobKind::Sssp => "sssp",
            JobKind::Cc => "cc",
            JobKind::PageRank => "pagerank",
        })
    }
}

/// Per-vertex payload of a frontier job's message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    /// A vertex id (BFS parent candidate, CC label).
    Vertex(VertexId),
    /// A path length (SSSP).
    Distance(Weight),
}

impl Payload {
    /// The vertex id carried.
    ///
    /// # Panics
    /// Panics on a [`Payload::Distance`].
    #[inline(always)]
    pub fn vertex(self) -> VertexId {
        match self {
            Payload::Vertex(v) => v,
            Payload::Distance(_) => panic!("expected a vertex payload, got {self:?}"),
        }
    }

    /// The distance carried.
    ///
    /// # Panics
    /// Panics on a [`Payload::Vertex`].
    #[inline(always)]
    pub fn distance(self) -> Weight {
        match self {
            Payload::Distance(d) => d,
            Payload::Vertex(_) => panic!("expected a distance payload, got {self:?}"),
        }
    }
}

/// A monotone frontier algorithm.
///
/// The engine calls these from many workers at once; every method that runs
/// inside a round takes `&self` and writes only through atomics the job owns.
///
/// Pull mode is split into `dense_begin` / `dense_fold` / `dense_finish` so a
/// fused round can walk each incoming run once on behalf of every job.
pub trait FrontierJob: Send + Sync {
    /// Algorithm of the job.
    fn kind(&self) -> JobKind;

    /// Resets state and the frontier; returns the initial active count.
    fn seed(&mut self, engine: &Engine) -> usize;

    /// Current frontier.
    fn active_in(&self) -> &VertexSubset;

    /// Push mode: the message of `src`, or `None` if `src` is not active here.
    fn sparse_signal(&self, src: VertexId) -> Option<Payload>;

    /// Push mode: applies `payload` from `src` along `edge`; `true` iff the
    /// destination was newly activated.
    fn sparse_slot(&self, src: VertexId, payload: Payload, edge: AdjUnit) -> bool;

    /// Pull mode: initial accumulator for `dst`, or `None` to skip it.
    fn dense_begin(&self, dst: VertexId) -> Option<Payload>;

    /// Pull mode: folds the in-neighbour `edge` into `acc`. `Break` ends the scan.
    fn dense_fold(&self, acc: &mut Payload, edge: AdjUnit) -> ControlFlow<()>;

    /// Pull mode: the message for `dst`, if the scan found an update.
    fn dense_finish(&self, dst: VertexId, acc: Payload) -> Option<Payload>;

    /// Pull mode: applies the update for `dst`; `true` iff newly activated.
    fn dense_slot(&self, dst: VertexId, payload: Payload) -> bool;

    /// Promotes the vertices activated this round to the frontier and clears
    /// the output subset; returns the new frontier size.
    fn finish_round(&mut self, engine: &Engine) -> usize;

    /// Final result.
    fn summarize(&self, engine: &Engine) -> JobSummary;
}

/// Execution counters of one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    /// Algorithm of the job.
    pub kind: JobKind,
    /// Rounds in which the job activated at least one vertex (iterations for
    /// PageRank).
    pub rounds: usize,
    /// Total vertex activations over all rounds.
    pub activations: usize,
}

impl JobStats {
    /// Zeroed counters.
    pub fn new(kind: JobKind) -> Self {
        Self {
            kind,
            rounds: 0,
            activations: 0,
        }
    }

    pub(crate) fn record(&mut self, activated: usize) {
        if activated > 0 {
            self.rounds += 1;
            self.activations += activated;
        }
    }
}

/// Ranking of one PageRank instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankSummary {
    /// Damping factor of the instance.
    pub damping: f64,
    /// Sum of all ranks.
    pub rank_sum: f64,
    /// Highest-ranked vertex and its rank.
    pub top: Option<(VertexId, f64)>,
}

/// Final result of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobSummary {
    /// BFS result.
    Bfs {
        /// Root vertex.
        root: VertexId,
        /// Vertices with a parent, root included.
        discovered: usize,
    },
    /// SSSP result.
    Sssp {
        /// Root vertex.
        root: VertexId,
        /// Vertices at finite distance, root included.
        reached: usize,
        /// Reached vertex at maximum distance.
        farthest: Option<(VertexId, Weight)>,
    },
    /// CC result.
    Cc {
        /// Components, i.e. vertices labelled with their own id.
        components: usize,
    },
    /// PageRank result.
    #[serde(rename = "pagerank")]
    PageRank {
        /// Iterations run.
        iterations: usize,
        /// One entry per vectorised instance.
        instances: Vec<RankSummary>,
    },
}

/// Runs `job` alone until its frontier is exhausted.
pub fn run_frontier(engine: &Engine, job: &mut dyn FrontierJob, options: EdgeOptions) -> JobStats {
    let mut stats = JobStats::new(job.kind());
    let mut active = job.seed(engine);
    while active > 0 {
        step_frontier(engine, &*job, options);
        active = job.finish_round(engine);
        stats.record(active);
        debug!(job = %stats.kind, round = stats.rounds, active, "frontier round");
    }
    stats
}

/// Runs one unfused traversal round of `job`; returns the activation count.
///
/// The caller must follow with [`FrontierJob::finish_round`].
pub fn step_frontier(engine: &Engine, job: &dyn FrontierJob, options: EdgeOptions) -> usize {
    engine.process_edges::<Payload, _, _, _, _>(
        |src, out| {
            if let Some(payload) = job.sparse_signal(src) {
                out.emit(src, payload);
            }
        },
        |src, payload, outgoing| {
            outgoing
                .iter()
                .filter(|&edge| job.sparse_slot(src, payload, edge))
                .count()
        },
        |dst, incoming, out| {
            let Some(mut acc) = job.dense_begin(dst) else {
                return;
            };
            for edge in incoming {
                if job.dense_fold(&mut acc, edge).is_break() {
                    break;
                }
            }
            if let Some(payload) = job.dense_finish(dst, acc) {
                out.emit(dst, payload);
            }
        },
        |dst, payload| usize::from(job.dense_slot(dst, payload)),
        job.active_in(),
        options,
    )
}

/// Reduction step keeping the larger value; equal values keep the smaller id.
pub(crate) fn max_by_value<V: PartialOrd>(
    a: Option<(VertexId, V)>,
    b: Option<(VertexId, V)>,
) -> Option<(VertexId, V)> {
    match (a, b) {
        (Some(x), Some(y)) => {
            if y.1 > x.1 || (y.1 == x.1 && y.0 < x.0) {
                Some(y)
            } else {
                Some(x)
            }
        }
        (x, None) => x,
        (None, y) => y,
    }
}
