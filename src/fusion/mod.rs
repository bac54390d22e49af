//! Job fusion: several frontier jobs sharing one traversal per round.
//!
//! A [`FusedRun`] drives `process_edges` over the union of its jobs'
//! frontiers. Each message is a [`FusedMessage`] with one slot per job, so a
//! single walk of an adjacency run serves every job; each job still applies
//! only its own update rule to its own state.
//!
//! Jobs are borrowed mutably for the lifetime of the run. Their state stays
//! owned by the caller and no two jobs can alias each other's arrays.

mod message;

pub use message::{FusedMessage, SlotVec, MAX_FUSED_JOBS};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{EdgeOptions, Engine, VertexSubset};
use crate::jobs::{FrontierJob, JobStats};

/// Outcome of a fused run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionReport {
    /// Shared traversal rounds that activated at least one vertex.
    pub rounds: usize,
    /// Per-job counters, in the order the jobs were added.
    pub jobs: Vec<JobStats>,
}

/// A group of frontier jobs traversed together.
pub struct FusedRun<'a> {
    engine: &'a Engine,
    options: EdgeOptions,
    jobs: Vec<&'a mut dyn FrontierJob>,
    active: Vec<usize>,
    stats: Vec<JobStats>,
    common_in: VertexSubset,
    common_out: VertexSubset,
    rounds: usize,
    seeded: bool,
}

impl<'a> FusedRun<'a> {
    /// An empty run on `engine`; every round uses `options`.
    pub fn new(engine: &'a Engine, options: EdgeOptions) -> Self {
        Self {
            engine,
            options,
            jobs: Vec::new(),
            active: Vec::new(),
            stats: Vec::new(),
            common_in: engine.alloc_vertex_subset(),
            common_out: engine.alloc_vertex_subset(),
            rounds: 0,
            seeded: false,
        }
    }

    /// Adds `job`; returns its slot index.
    ///
    /// # Panics
    /// Panics if the run already holds [`MAX_FUSED_JOBS`] jobs or has been seeded.
    pub fn add(&mut self, job: &'a mut dyn FrontierJob) -> usize {
        assert!(!self.seeded, "jobs must be added before the run is seeded");
        assert!(
            self.jobs.len() < MAX_FUSED_JOBS,
            "a fused run holds at most {MAX_FUSED_JOBS} jobs"
        );
        self.stats.push(JobStats::new(job.kind()));
        self.active.push(0);
        self.jobs.push(job);
        self.jobs.len() - 1
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no job was added.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Seeds every job and builds the common frontier; returns its size.
    pub fn seed(&mut self) -> usize {
        let engine = self.engine;
        engine.install(|| {
            self.common_in.clear();
            self.common_out.clear();
        });
        for (job, active) in self.jobs.iter_mut().zip(&mut self.active) {
            *active = job.seed(engine);
            engine.install(|| self.common_in.union_with(job.active_in()));
        }
        self.seeded = true;
        self.common_in.count()
    }

    /// Whether every job's frontier is exhausted.
    pub fn is_converged(&self) -> bool {
        self.active.iter().all(|&a| a == 0)
    }

    /// Runs one fused round; returns the number of distinct vertices any job
    /// activated.
    pub fn round(&mut self) -> usize {
        if !self.seeded {
            self.seed();
        }
        let count = self.jobs.len();
        let live = SlotVec::from_fn(count, |i| self.active[i] > 0);
        let jobs: Vec<&dyn FrontierJob> = self.jobs.iter().map(|job| &**job).collect();
        let common_out = &self.common_out;

        let activated = self.engine.process_edges::<FusedMessage, _, _, _, _>(
            |src, out| {
                let msg = FusedMessage::from_fn(count, |i| {
                    if live[i] {
                        jobs[i].sparse_signal(src)
                    } else {
                        None
                    }
                });
                if msg.iter().any(Option::is_some) {
                    out.emit(src, msg);
                }
            },
            |src, msg, outgoing| {
                let mut activated = 0;
                for edge in outgoing {
                    let mut hit = false;
                    for (job, payload) in jobs.iter().zip(msg.iter()) {
                        if let Some(payload) = payload {
                            hit |= job.sparse_slot(src, *payload, edge);
                        }
                    }
                    if hit && common_out.set_bit(edge.neighbour) {
                        activated += 1;
                    }
                }
                activated
            },
            |dst, incoming, out| {
                let mut acc = FusedMessage::from_fn(count, |i| {
                    if live[i] {
                        jobs[i].dense_begin(dst)
                    } else {
                        None
                    }
                });
                let mut scanning = SlotVec::from_fn(count, |i| acc[i].is_some());
                let mut remaining = scanning.iter().filter(|&&s| s).count();
                if remaining == 0 {
                    return;
                }
                for edge in incoming {
                    for (i, a) in acc.iter_mut().enumerate() {
                        if !scanning[i] {
                            continue;
                        }
                        if let Some(a) = a {
                            if jobs[i].dense_fold(a, edge).is_break() {
                                scanning[i] = false;
                                remaining -= 1;
                            }
                        }
                    }
                    if remaining == 0 {
                        break;
                    }
                }
                let msg = FusedMessage::from_fn(count, |i| {
                    acc[i].and_then(|a| jobs[i].dense_finish(dst, a))
                });
                if msg.iter().any(Option::is_some) {
                    out.emit(dst, msg);
                }
            },
            |dst, msg| {
                let mut hit = false;
                for (job, payload) in jobs.iter().zip(msg.iter()) {
                    if let Some(payload) = payload {
                        hit |= job.dense_slot(dst, *payload);
                    }
                }
                usize::from(hit && common_out.set_bit(dst))
            },
            &self.common_in,
            self.options,
        );

        let engine = self.engine;
        for (i, job) in self.jobs.iter_mut().enumerate() {
            if self.active[i] == 0 {
                continue;
            }
            let active = job.finish_round(engine);
            self.active[i] = active;
            self.stats[i].record(active);
        }
        core::mem::swap(&mut self.common_in, &mut self.common_out);
        engine.install(|| self.common_out.clear());
        if activated > 0 {
            self.rounds += 1;
        }
        debug!(
            round = self.rounds,
            activated,
            live = self.active.iter().filter(|&&a| a > 0).count(),
            "fused round"
        );
        activated
    }

    /// Runs rounds until every job has converged.
    pub fn run(mut self) -> FusionReport {
        if !self.seeded {
            self.seed();
        }
        while !self.is_converged() {
            self.round();
        }
        FusionReport {
            rounds: self.rounds,
            jobs: self.stats,
        }
    }
}

#[cfg(test)]
mod tests;
