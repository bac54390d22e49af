//! Single-source shortest paths by frontier relaxation.

use core::ops::ControlFlow;

use rayon::prelude::*;

use super::bfs::check_root;
use super::{max_by_value, Frontier, FrontierJob, JobKind, JobSummary, Payload};
use crate::engine::{Engine, VertexArray, VertexSubset};
use crate::error::{Error, Result};
use crate::graph::{AdjUnit, VertexId, Weight};

/// Distance of a vertex the root cannot reach.
pub const UNREACHED: Weight = Weight::INFINITY;

/// Bellman-Ford style relaxation restricted to the vertices whose distance
/// dropped in the previous round. Unit partitions use cost `1.0` per edge.
pub struct Sssp {
    root: VertexId,
    dist: VertexArray<Weight>,
    frontier: Frontier,
}

impl Sssp {
    /// Allocates SSSP state on `engine`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidJob`] if `root` is not a vertex or an edge
    /// weight is negative or NaN.
    pub fn new(engine: &Engine, root: VertexId) -> Result<Self> {
        check_root(engine, root)?;
        let graph = engine.graph();
        let bad = engine.install(|| {
            (0..graph.vertices()).into_par_iter().find_any(|&v| {
                graph
                    .outgoing(v as VertexId)
                    .iter()
                    .any(|e| e.weight() < 0.0 || e.weight().is_nan())
            })
        });
        if let Some(v) = bad {
            return Err(Error::InvalidJob(format!(
                "vertex {v} has an edge with a negative or NaN weight"
            )));
        }
        Ok(Self {
            root,
            dist: engine.alloc_vertex_array_with(UNREACHED),
            frontier: Frontier::new(engine),
        })
    }

    /// Root vertex.
    pub fn root(&self) -> VertexId {
        self.root
    }

    /// Distance array.
    pub fn distance_array(&self) -> &VertexArray<Weight> {
        &self.dist
    }

    /// Copy of the distance array.
    pub fn distances(&self) -> Vec<Weight> {
        self.dist.snapshot()
    }
}

impl FrontierJob for Sssp {
    fn kind(&self) -> JobKind {
        JobKind::Sssp
    }

    fn seed(&mut self, engine: &Engine) -> usize {
        engine.fill_vertex_array(&self.dist, UNREACHED);
        self.dist.set(self.root, 0.0);
        self.frontier.seed_one(engine, self.root)
    }

    fn active_in(&self) -> &VertexSubset {
        self.frontier.active_in()
    }

    fn sparse_signal(&self, src: VertexId) -> Option<Payload> {
        self.frontier
            .is_active(src)
            .then(|| Payload::Distance(self.dist.get(src)))
    }

    fn sparse_slot(&self, _src: VertexId, payload: Payload, edge: AdjUnit) -> bool {
        let dst = edge.neighbour;
        self.dist.write_min(dst, payload.distance() + edge.weight()) && self.frontier.activate(dst)
    }

    fn dense_begin(&self, dst: VertexId) -> Option<Payload> {
        Some(Payload::Distance(self.dist.get(dst)))
    }

    fn dense_fold(&self, acc: &mut Payload, edge: AdjUnit) -> ControlFlow<()> {
        let src = edge.neighbour;
        if self.frontier.is_active(src) {
            let candidate = self.dist.get(src) + edge.weight();
            if candidate < acc.distance() {
                *acc = Payload::Distance(candidate);
            }
        }
        ControlFlow::Continue(())
    }

    fn dense_finish(&self, dst: VertexId, acc: Payload) -> Option<Payload> {
        (acc.distance() < self.dist.get(dst)).then_some(acc)
    }

    fn dense_slot(&self, dst: VertexId, payload: Payload) -> bool {
        self.dist.set(dst, payload.distance());
        self.frontier.activate(dst)
    }

    fn finish_round(&mut self, engine: &Engine) -> usize {
        self.frontier.advance(engine)
    }

    fn summarize(&self, engine: &Engine) -> JobSummary {
        let all = engine.all_vertices();
        let (reached, farthest) = engine.process_vertices_with(
            |v| {
                let d = self.dist.get(v);
                if d < UNREACHED {
                    (1, Some((v, d)))
                } else {
                    (0, None)
                }
            },
            &all,
            || (0usize, None),
            |(n1, f1), (n2, f2)| (n1 + n2, max_by_value(f1, f2)),
        );
        JobSummary::Sssp {
            root: self.root,
            reached,
            farthest,
        }
    }
}
