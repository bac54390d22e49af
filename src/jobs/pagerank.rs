//! Vectorised PageRank.
//!
//! Up to [`MAX_FUSED_JOBS`] instances with individual damping factors share
//! every traversal: the message of a vertex carries one contribution per
//! instance. Between iterations the arrays hold `rank / out_degree` (the
//! contribution pushed along each out-edge); after the last iteration they
//! hold plain ranks.

use tracing::debug;

use super::{max_by_value, JobKind, JobStats, JobSummary, RankSummary};
use crate::engine::{EdgeOptions, Engine, VertexArray, VertexSubset};
use crate::error::{Error, Result};
use crate::fusion::{SlotVec, MAX_FUSED_JOBS};
use crate::graph::VertexId;

/// Iterations run when none are given.
pub const DEFAULT_ITERATIONS: usize = 10;

/// Damping factor used when none is given.
pub const DEFAULT_DAMPING: f64 = 0.85;

/// Fixed-iteration PageRank over all vertices.
pub struct PageRank {
    iterations: usize,
    damping: SlotVec<f64>,
    curr: Vec<VertexArray<f64>>,
    next: Vec<VertexArray<f64>>,
    all: VertexSubset,
    delta: SlotVec<f64>,
}

impl PageRank {
    /// One instance per entry of `dampings`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidJob`] for zero iterations, no instances, more than
    /// [`MAX_FUSED_JOBS`] instances, or a damping factor outside `[0, 1]`.
    pub fn new(engine: &Engine, iterations: usize, dampings: &[f64]) -> Result<Self> {
        if iterations == 0 {
            return Err(Error::InvalidJob("pagerank needs at least one iteration".into()));
        }
        if dampings.is_empty() || dampings.len() > MAX_FUSED_JOBS {
            return Err(Error::InvalidJob(format!(
                "pagerank takes 1 to {MAX_FUSED_JOBS} instances, got {}",
                dampings.len()
            )));
        }
        if let Some(d) = dampings.iter().find(|d| !(0.0..=1.0).contains(*d)) {
            return Err(Error::InvalidJob(format!("damping {d} is outside [0, 1]")));
        }
        let alloc = || dampings.iter().map(|_| engine.alloc_vertex_array()).collect();
        Ok(Self {
            iterations,
            damping: SlotVec::from_fn(dampings.len(), |i| dampings[i]),
            curr: alloc(),
            next: alloc(),
            all: engine.all_vertices(),
            delta: SlotVec::filled(dampings.len(), 0.0),
        })
    }

    /// A single instance.
    ///
    /// # Errors
    /// See [`PageRank::new`].
    pub fn single(engine: &Engine, iterations: usize, damping: f64) -> Result<Self> {
        Self::new(engine, iterations, &[damping])
    }

    /// Number of vectorised instances.
    pub fn instances(&self) -> usize {
        self.damping.len()
    }

    /// Iterations per run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Per-instance sum of `|rank - previous rank|` of the last iteration.
    pub fn last_delta(&self) -> &[f64] {
        &self.delta
    }

    /// Ranks of `instance`. Meaningful once [`run`](Self::run) has returned.
    ///
    /// # Panics
    /// Panics if `instance >= instances()`.
    pub fn ranks(&self, instance: usize) -> Vec<f64> {
        self.curr[instance].snapshot()
    }

    /// Runs every iteration.
    pub fn run(&mut self, engine: &Engine, options: EdgeOptions) -> JobStats {
        let graph = engine.graph();
        let instances = self.instances();

        self.curr.iter().for_each(|c| {
            engine.process_vertices(
                |v| {
                    let degree = graph.out_degree(v);
                    c.set(v, if degree > 0 { 1.0 / f64::from(degree) } else { 1.0 });
                    0usize
                },
                &self.all,
            );
        });

        for iteration in 0..self.iterations {
            let last = iteration + 1 == self.iterations;
            for next in &self.next {
                engine.fill_vertex_array(next, 0.0);
            }
            let (curr, next) = (&self.curr, &self.next);

            engine.process_edges::<SlotVec<f64>, _, _, _, _>(
                |src, out| out.emit(src, SlotVec::from_fn(instances, |i| curr[i].get(src))),
                |_, contribution, outgoing| {
                    for edge in outgoing {
                        for (i, &c) in contribution.iter().enumerate() {
                            next[i].write_add(edge.neighbour, c);
                        }
                    }
                    0
                },
                |dst, incoming, out| {
                    let mut sum = SlotVec::filled(instances, 0.0);
                    for edge in incoming {
                        for (i, s) in sum.iter_mut().enumerate() {
                            *s += curr[i].get(edge.neighbour);
                        }
                    }
                    out.emit(dst, sum);
                },
                |dst, sum| {
                    for (i, &s) in sum.iter().enumerate() {
                        next[i].set(dst, s);
                    }
                    0
                },
                &self.all,
                options,
            );

            let damping = self.damping;
            self.delta = engine.process_vertices_with(
                |v| {
                    let degree = graph.out_degree(v);
                    SlotVec::from_fn(instances, |i| {
                        let d = damping[i];
                        let rank = 1.0 - d + d * next[i].get(v);
                        let prev = if degree > 0 {
                            curr[i].get(v) * f64::from(degree)
                        } else {
                            curr[i].get(v)
                        };
                        let stored = if last || degree == 0 {
                            rank
                        } else {
                            rank / f64::from(degree)
                        };
                        next[i].set(v, stored);
                        (rank - prev).abs()
                    })
                },
                &self.all,
                || SlotVec::filled(instances, 0.0),
                |mut a, b| {
                    a.iter_mut().zip(b.iter()).for_each(|(x, y)| *x += y);
                    a
                },
            );
            core::mem::swap(&mut self.curr, &mut self.next);
            debug!(iteration = iteration + 1, delta = ?self.delta, "pagerank iteration");
        }

        JobStats {
            kind: JobKind::PageRank,
            rounds: self.iterations,
            activations: 0,
        }
    }

    /// Rank sum and top vertex per instance.
    pub fn summarize(&self, engine: &Engine) -> JobSummary {
        let instances = (0..self.instances())
            .map(|i| {
                let ranks = &self.curr[i];
                let rank_sum: f64 = engine.process_vertices(|v| ranks.get(v), &self.all);
                let top = engine.process_vertices_with(
                    |v| Some((v, ranks.get(v))),
                    &self.all,
                    || None,
                    max_by_value,
                );
                RankSummary {
                    damping: self.damping[i],
                    rank_sum,
                    top,
                }
            })
            .collect();
        JobSummary::PageRank {
            iterations: self.iterations,
            instances,
        }
    }
}

/// Reference sequential PageRank, used to check the parallel one.
#[cfg(test)]
pub(crate) fn sequential_ranks(
    graph: &crate::graph::GraphPartition,
    iterations: usize,
    damping: f64,
) -> Vec<f64> {
    let n = graph.vertices();
    let mut rank = vec![1.0; n];
    for _ in 0..iterations {
        let mut sum = vec![0.0; n];
        for u in 0..n {
            let degree = graph.out_degree(u as VertexId);
            if degree == 0 {
                continue;
            }
            let share = rank[u] / f64::from(degree);
            for e in graph.outgoing(u as VertexId) {
                sum[e.neighbour as usize] += share;
            }
        }
        rank = sum.iter().map(|s| 1.0 - damping + damping * s).collect();
    }
    rank
}
