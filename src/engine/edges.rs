//! Process-Edges: the dual-mode traversal round.
//!
//! A round runs in two phases inside the worker pool:
//! 1. **signal**: every lane walks its vertices and emits messages into its
//!    own buffer of the leased channel. Push mode visits active sources only;
//!    pull mode visits every destination with its incoming run.
//! 2. **slot**: every buffered message is handed to the matching slot handler.
//!    Push-mode slots see the source's outgoing run and may race on shared
//!    destinations; pull-mode slots own their destination.
//!
//! No slot runs before every signal has finished, so signals always observe
//! round-start state regardless of direction.

use rayon::prelude::*;
use tracing::trace;

use super::{Direction, EdgeOptions, Engine, VertexSubset};
use crate::concurrency::channel::LaneBuffer;
use crate::graph::{AdjList, VertexId};

/// Sink for messages emitted by a signal handler.
///
/// Only signal handlers receive an `Emitter`, so emitting outside a signal is
/// unrepresentable.
pub struct Emitter<'a, M> {
    buffer: &'a mut LaneBuffer<M>,
}

impl<M> Emitter<'_, M> {
    /// Queues `payload` for delivery to `vertex`'s slot handler.
    #[inline(always)]
    pub fn emit(&mut self, vertex: VertexId, payload: M) {
        self.buffer.push((vertex, payload));
    }
}

impl Engine {
    /// Runs one traversal round over the frontier `active`.
    ///
    /// - `sparse_signal(src, out)`: push mode, once per active source
    /// - `sparse_slot(src, msg, outgoing)`: push mode, once per emitted message
    /// - `dense_signal(dst, incoming, out)`: pull mode, once per vertex
    /// - `dense_slot(dst, msg)`: pull mode, once per emitted message
    ///
    /// Push mode is chosen while the frontier's out-edges number fewer than
    /// the density threshold times all edges. Slots return how many vertices
    /// they activated; the sum is returned. An empty frontier returns `0`
    /// without touching the channel.
    ///
    /// # Panics
    /// Panics if the channel is out of range or already in flight, if
    /// `active` was sized for another graph, or if a handler panics.
    pub fn process_edges<M, SS, SL, DS, DL>(
        &self,
        sparse_signal: SS,
        sparse_slot: SL,
        dense_signal: DS,
        dense_slot: DL,
        active: &VertexSubset,
        options: EdgeOptions,
    ) -> usize
    where
        M: Send + 'static,
        SS: Fn(VertexId, &mut Emitter<'_, M>) + Sync,
        SL: Fn(VertexId, M, AdjList<'_>) -> usize + Sync,
        DS: Fn(VertexId, AdjList<'_>, &mut Emitter<'_, M>) + Sync,
        DL: Fn(VertexId, M) -> usize + Sync,
    {
        let Some((direction, active_vertices, active_edges)) = self.select_direction(active, &options)
        else {
            return 0;
        };

        let graph = self.graph();
        let mut lease = self.channels.lease::<M>(options.channel, self.lanes.len());
        let buffers: &mut [LaneBuffer<M>] = &mut lease;

        let activated = self.install(|| {
            buffers
                .par_iter_mut()
                .zip(self.lanes.par_iter())
                .for_each(|(buffer, lane)| {
                    let mut out = Emitter { buffer };
                    match direction {
                        Direction::Push => {
                            for src in active.iter_range(lane.clone()) {
                                sparse_signal(src, &mut out);
                            }
                        }
                        Direction::Pull => {
                            for dst in lane.clone() {
                                let dst = dst as VertexId;
                                dense_signal(dst, graph.incoming(dst), &mut out);
                            }
                        }
                    }
                });

            buffers
                .par_iter_mut()
                .map(|buffer| match direction {
                    Direction::Push => buffer
                        .drain(..)
                        .map(|(src, msg)| sparse_slot(src, msg, graph.outgoing(src)))
                        .sum::<usize>(),
                    Direction::Pull => buffer
                        .drain(..)
                        .map(|(dst, msg)| dense_slot(dst, msg))
                        .sum::<usize>(),
                })
                .sum::<usize>()
        });

        trace!(
            channel = options.channel,
            ?direction,
            active_vertices,
            active_edges,
            activated,
            "process_edges"
        );
        activated
    }

    /// Picks the direction for `active`, or `None` for an empty frontier.
    pub(super) fn select_direction(
        &self,
        active: &VertexSubset,
        options: &EdgeOptions,
    ) -> Option<(Direction, usize, usize)> {
        let degrees = self.graph().out_degrees();
        let (active_vertices, active_edges) = self.process_vertices_with(
            |v| (1usize, degrees[v as usize] as usize),
            active,
            || (0, 0),
            |a, b| (a.0 + b.0, a.1 + b.1),
        );
        if active_vertices == 0 {
            return None;
        }
        let direction = options.direction.unwrap_or_else(|| {
            let threshold = options
                .density_threshold
                .unwrap_or(self.config.dense_threshold);
            #[allow(clippy::cast_precision_loss)]
            let sparse = (active_edges as f64) < threshold * self.graph().edges() as f64;
            if sparse {
                Direction::Push
            } else {
                Direction::Pull
            }
        });
        Some((direction, active_vertices, active_edges))
    }
}
