use crate::engine::{Engine, VertexSubset};
use crate::graph::VertexId;

/// The active-in / active-out subset pair of one frontier job.
pub(crate) struct Frontier {
    active_in: VertexSubset,
    active_out: VertexSubset,
}

impl Frontier {
    pub(crate) fn new(engine: &Engine) -> Self {
        Self {
            active_in: engine.alloc_vertex_subset(),
            active_out: engine.alloc_vertex_subset(),
        }
    }

    /// Clears both subsets and activates only `root`.
    pub(crate) fn seed_one(&self, engine: &Engine, root: VertexId) -> usize {
        engine.install(|| {
            self.active_in.clear();
            self.active_out.clear();
        });
        self.active_in.set_bit(root);
        1
    }

    /// Clears the output subset and activates every vertex.
    pub(crate) fn seed_all(&self, engine: &Engine) -> usize {
        engine.install(|| {
            self.active_in.fill();
            self.active_out.clear();
        });
        engine.vertices()
    }

    #[inline(always)]
    pub(crate) fn active_in(&self) -> &VertexSubset {
        &self.active_in
    }

    #[inline(always)]
    pub(crate) fn is_active(&self, v: VertexId) -> bool {
        self.active_in.get_bit(v)
    }

    /// Marks `v` for the next round; `true` iff it was not yet marked.
    #[inline(always)]
    pub(crate) fn activate(&self, v: VertexId) -> bool {
        self.active_out.set_bit(v)
    }

    /// Swaps the subsets and clears the new output side.
    pub(crate) fn advance(&mut self, engine: &Engine) -> usize {
        core::mem::swap(&mut self.active_in, &mut self.active_out);
        engine.install(|| {
            self.active_out.clear();
            self.active_in.count()
        })
    }
}
