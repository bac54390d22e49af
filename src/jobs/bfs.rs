//! Breadth-first search by parent assignment.

use core::ops::ControlFlow;

use super::{Frontier, FrontierJob, JobKind, JobSummary, Payload};
use crate::engine::{Engine, VertexArray, VertexSubset};
use crate::error::{Error, Result};
use crate::graph::{AdjUnit, VertexId, NO_VERTEX};

/// Parent of a vertex BFS has not discovered.
pub const NO_PARENT: VertexId = NO_VERTEX;

/// BFS from one root. The root is its own parent.
///
/// In push mode several frontier vertices may race for one destination; the
/// compare-and-swap winner is unspecified. Any winner is a valid parent at the
/// correct depth, so the parent tree is not unique but the depths are.
pub struct Bfs {
    root: VertexId,
    parent: VertexArray<VertexId>,
    frontier: Frontier,
}

impl Bfs {
    /// Allocates BFS state on `engine`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidJob`] if `root` is not a vertex.
    pub fn new(engine: &Engine, root: VertexId) -> Result<Self> {
        check_root(engine, root)?;
        Ok(Self {
            root,
            parent: engine.alloc_vertex_array_with(NO_PARENT),
            frontier: Frontier::new(engine),
        })
    }

    /// Root vertex.
    pub fn root(&self) -> VertexId {
        self.root
    }

    /// Parent array.
    pub fn parent_array(&self) -> &VertexArray<VertexId> {
        &self.parent
    }

    /// Copy of the parent array.
    pub fn parents(&self) -> Vec<VertexId> {
        self.parent.snapshot()
    }
}

impl FrontierJob for Bfs {
    fn kind(&self) -> JobKind {
        JobKind::Bfs
    }

    fn seed(&mut self, engine: &Engine) -> usize {
        engine.fill_vertex_array(&self.parent, NO_PARENT);
        self.parent.set(self.root, self.root);
        self.frontier.seed_one(engine, self.root)
    }

    fn active_in(&self) -> &VertexSubset {
        self.frontier.active_in()
    }

    fn sparse_signal(&self, src: VertexId) -> Option<Payload> {
        self.frontier.is_active(src).then_some(Payload::Vertex(src))
    }

    fn sparse_slot(&self, _src: VertexId, payload: Payload, edge: AdjUnit) -> bool {
        let dst = edge.neighbour;
        self.parent.compare_and_swap(dst, NO_PARENT, payload.vertex()) && self.frontier.activate(dst)
    }

    fn dense_begin(&self, dst: VertexId) -> Option<Payload> {
        (self.parent.get(dst) == NO_PARENT).then_some(Payload::Vertex(NO_PARENT))
    }

    fn dense_fold(&self, acc: &mut Payload, edge: AdjUnit) -> ControlFlow<()> {
        if self.frontier.is_active(edge.neighbour) {
            *acc = Payload::Vertex(edge.neighbour);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn dense_finish(&self, _dst: VertexId, acc: Payload) -> Option<Payload> {
        (acc.vertex() != NO_PARENT).then_some(acc)
    }

    fn dense_slot(&self, dst: VertexId, payload: Payload) -> bool {
        self.parent.set(dst, payload.vertex());
        self.frontier.activate(dst)
    }

    fn finish_round(&mut self, engine: &Engine) -> usize {
        self.frontier.advance(engine)
    }

    fn summarize(&self, engine: &Engine) -> JobSummary {
        let all = engine.all_vertices();
        let discovered = engine.process_vertices(|v| usize::from(self.parent.get(v) != NO_PARENT), &all);
        JobSummary::Bfs {
            root: self.root,
            discovered,
        }
    }
}

pub(super) fn check_root(engine: &Engine, root: VertexId) -> Result<()> {
    if (root as usize) < engine.vertices() {
        Ok(())
    } else {
        Err(Error::InvalidJob(format!(
            "root {root} is not a vertex of a {}-vertex graph",
            engine.vertices()
        )))
    }
}
