//! Connected components by minimum-label propagation.

use core::ops::ControlFlow;

use super::{Frontier, FrontierJob, JobKind, JobSummary, Payload};
use crate::engine::{Engine, VertexArray, VertexSubset};
use crate::graph::{AdjUnit, VertexId};

/// Label propagation: every vertex starts labelled with its own id and takes
/// the smallest label reaching it along an edge.
///
/// Labels follow edge direction. Run on a
/// [`symmetrized`](crate::graph::GraphPartition::symmetrized) partition for
/// weakly connected components.
pub struct ConnectedComponents {
    label: VertexArray<VertexId>,
    frontier: Frontier,
}

impl ConnectedComponents {
    /// Allocates CC state on `engine`.
    pub fn new(engine: &Engine) -> Self {
        Self {
            label: engine.alloc_vertex_array(),
            frontier: Frontier::new(engine),
        }
    }

    /// Label array.
    pub fn label_array(&self) -> &VertexArray<VertexId> {
        &self.label
    }

    /// Copy of the label array.
    pub fn labels(&self) -> Vec<VertexId> {
        self.label.snapshot()
    }
}

impl FrontierJob for ConnectedComponents {
    fn kind(&self) -> JobKind {
        JobKind::Cc
    }

    fn seed(&mut self, engine: &Engine) -> usize {
        let active = self.frontier.seed_all(engine);
        let all = self.frontier.active_in();
        engine.process_vertices(
            |v| {
                self.label.set(v, v);
                0usize
            },
            all,
        );
        active
    }

    fn active_in(&self) -> &VertexSubset {
        self.frontier.active_in()
    }

    fn sparse_signal(&self, src: VertexId) -> Option<Payload> {
        self.frontier
            .is_active(src)
            .then(|| Payload::Vertex(self.label.get(src)))
    }

    fn sparse_slot(&self, _src: VertexId, payload: Payload, edge: AdjUnit) -> bool {
        let dst = edge.neighbour;
        self.label.write_min(dst, payload.vertex()) && self.frontier.activate(dst)
    }

    fn dense_begin(&self, dst: VertexId) -> Option<Payload> {
        Some(Payload::Vertex(self.label.get(dst)))
    }

    fn dense_fold(&self, acc: &mut Payload, edge: AdjUnit) -> ControlFlow<()> {
        let src = edge.neighbour;
        if self.frontier.is_active(src) {
            let candidate = self.label.get(src);
            if candidate < acc.vertex() {
                *acc = Payload::Vertex(candidate);
            }
        }
        ControlFlow::Continue(())
    }

    fn dense_finish(&self, dst: VertexId, acc: Payload) -> Option<Payload> {
        (acc.vertex() < self.label.get(dst)).then_some(acc)
    }

    fn dense_slot(&self, dst: VertexId, payload: Payload) -> bool {
        self.label.set(dst, payload.vertex());
        self.frontier.activate(dst)
    }

    fn finish_round(&mut self, engine: &Engine) -> usize {
        self.frontier.advance(engine)
    }

    fn summarize(&self, engine: &Engine) -> JobSummary {
        let all = engine.all_vertices();
        let components = engine.process_vertices(|v| usize::from(self.label.get(v) == v), &all);
        JobSummary::Cc { components }
    }
}
