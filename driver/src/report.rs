use std::time::Duration;

use fusegraph::{GraphPartition, JobStats, JobSummary};
use serde::Serialize;

use crate::strategy::{Outcome, Strategy};

/// Result of one job, in command-line order.
#[derive(Debug, Serialize)]
pub struct JobReport {
    pub job: String,
    pub stats: JobStats,
    pub summary: JobSummary,
    pub millis: f64,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub strategy: Strategy,
    pub vertices: usize,
    pub edges: usize,
    /// Shared rounds of the fused traversal, if one ran.
    pub fused_rounds: Option<usize>,
    pub millis: f64,
    pub jobs: Vec<JobReport>,
}

impl RunReport {
    pub fn new(
        strategy: Strategy,
        graph: &GraphPartition,
        outcome: Outcome,
        elapsed: Duration,
    ) -> Self {
        Self {
            strategy,
            vertices: graph.vertices(),
            edges: graph.edges(),
            fused_rounds: outcome.fused_rounds,
            millis: millis(elapsed),
            jobs: outcome.jobs,
        }
    }

    pub fn print(&self) {
        println!(
            "{} vertices, {} edges, strategy {:?}: {:.2} ms",
            self.vertices, self.edges, self.strategy, self.millis
        );
        if let Some(rounds) = self.fused_rounds {
            println!("fused traversal: {rounds} rounds");
        }
        for job in &self.jobs {
            println!(
                "  {:<20} {:>6} rounds {:>10} activations {:>10.2} ms",
                job.job, job.stats.rounds, job.stats.activations, job.millis
            );
            println!("    {}", describe(&job.summary));
        }
    }
}

pub fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1e3
}

fn describe(summary: &JobSummary) -> String {
    match summary {
        JobSummary::Bfs { root, discovered } => {
            format!("root {root}: {discovered} vertices discovered")
        }
        JobSummary::Sssp {
            root,
            reached,
            farthest,
        } => match farthest {
            Some((v, d)) => format!("root {root}: {reached} reached, farthest {v} at {d}"),
            None => format!("root {root}: {reached} reached"),
        },
        JobSummary::Cc { components } => format!("{components} components"),
        JobSummary::PageRank {
            iterations,
            instances,
        } => instances
            .iter()
            .map(|r| match r.top {
                Some((v, rank)) => format!(
                    "d={} after {iterations} iterations: sum {:.4}, top {v} ({rank:.4})",
                    r.damping, r.rank_sum
                ),
                None => format!("d={}: empty graph", r.damping),
            })
            .collect::<Vec<_>>()
            .join("; "),
    }
}
