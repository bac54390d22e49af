//! Process-Vertices: parallel map-reduce over a subset.

use num_traits::Zero;
use rayon::prelude::*;

use super::{Engine, VertexSubset};
use crate::graph::VertexId;

impl Engine {
    /// Applies `f` to every active vertex and sums the results.
    ///
    /// # Panics
    /// Panics if `active` was sized for another graph.
    pub fn process_vertices<R, F>(&self, f: F, active: &VertexSubset) -> R
    where
        R: Zero + Send,
        F: Fn(VertexId) -> R + Sync,
    {
        self.process_vertices_with(f, active, R::zero, |a, b| a + b)
    }

    /// Applies `f` to every active vertex and reduces with `combine`.
    ///
    /// `combine` must be associative and commutative with `identity()` as its
    /// neutral element; vertices are visited in no particular order.
    ///
    /// # Panics
    /// Panics if `active` was sized for another graph.
    pub fn process_vertices_with<R, F, I, C>(
        &self,
        f: F,
        active: &VertexSubset,
        identity: I,
        combine: C,
    ) -> R
    where
        R: Send,
        F: Fn(VertexId) -> R + Sync,
        I: Fn() -> R + Sync + Send,
        C: Fn(R, R) -> R + Sync + Send,
    {
        assert_eq!(active.size(), self.vertices(), "subset size does not match the graph");
        self.install(|| {
            self.lanes
                .par_iter()
                .map(|lane| {
                    active
                        .iter_range(lane.clone())
                        .fold(identity(), |acc, v| combine(acc, f(v)))
                })
                .reduce(&identity, &combine)
        })
    }
}
