//! Declarative job descriptions.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    run_frontier, Bfs, ConnectedComponents, FrontierJob, JobKind, JobStats, JobSummary, PageRank,
    Sssp, DEFAULT_DAMPING, DEFAULT_ITERATIONS,
};
use crate::engine::{EdgeOptions, Engine};
use crate::error::{Error, Result};
use crate::graph::VertexId;

/// A job to instantiate against an engine.
///
/// Parsed from JSON (`{"kind": "bfs", "root": 0}`) or from the compact
/// command-line form: `bfs:ROOT`, `sssp:ROOT`, `cc`,
/// `pagerank[:ITERATIONS[:DAMPING]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobSpec {
    /// Breadth-first search from `root`.
    Bfs {
        /// Root vertex.
        root: VertexId,
    },
    /// Shortest paths from `root`.
    Sssp {
        /// Root vertex.
        root: VertexId,
    },
    /// Connected components.
    Cc,
    /// PageRank.
    #[serde(rename = "pagerank")]
    PageRank {
        /// Iterations to run.
        #[serde(default = "default_iterations")]
        iterations: usize,
        /// Damping factor.
        #[serde(default = "default_damping")]
        damping: f64,
    },
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_damping() -> f64 {
    DEFAULT_DAMPING
}

impl JobSpec {
    /// Algorithm of the described job.
    pub fn kind(&self) -> JobKind {
        match self {
            JobSpec::Bfs { .. } => JobKind::Bfs,
            JobSpec::Sssp { .. } => JobKind::Sssp,
            JobSpec::Cc => JobKind::Cc,
            JobSpec::PageRank { .. } => JobKind::PageRank,
        }
    }

    /// Whether the job can join a fused frontier round.
    pub fn is_frontier(&self) -> bool {
        !matches!(self, JobSpec::PageRank { .. })
    }

    /// Allocates the job's state on `engine`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidJob`] if a root is out of range or a parameter
    /// is invalid.
    pub fn build(&self, engine: &Engine) -> Result<Job> {
        Ok(match *self {
            JobSpec::Bfs { root } => Job::Frontier(Box::new(Bfs::new(engine, root)?)),
            JobSpec::Sssp { root } => Job::Frontier(Box::new(Sssp::new(engine, root)?)),
            JobSpec::Cc => Job::Frontier(Box::new(ConnectedComponents::new(engine))),
            JobSpec::PageRank {
                iterations,
                damping,
            } => Job::PageRank(PageRank::single(engine, iterations, damping)?),
        })
    }
}

impl FromStr for JobSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidJob(format!("cannot parse job `{s}`"));
        let mut parts = s.split(':');
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();
        let root = |args: &[&str]| -> Result<VertexId> {
            match args {
                [root] => root.parse().map_err(|_| invalid()),
                _ => Err(invalid()),
            }
        };
        match name {
            "bfs" => Ok(JobSpec::Bfs { root: root(&args)? }),
            "sssp" => Ok(JobSpec::Sssp { root: root(&args)? }),
            "cc" if args.is_empty() => Ok(JobSpec::Cc),
            "pagerank" if args.len() <= 2 => {
                let iterations = match args.first() {
                    Some(n) => n.parse().map_err(|_| invalid())?,
                    None => DEFAULT_ITERATIONS,
                };
                let damping = match args.get(1) {
                    Some(d) => d.parse().map_err(|_| invalid())?,
                    None => DEFAULT_DAMPING,
                };
                Ok(JobSpec::PageRank {
                    iterations,
                    damping,
                })
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for JobSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobSpec::Bfs { root } => write!(f, "bfs:{root}"),
            JobSpec::Sssp { root } => write!(f, "sssp:{root}"),
            JobSpec::Cc => f.write_str("cc"),
            JobSpec::PageRank {
                iterations,
                damping,
            } => write!(f, "pagerank:{iterations}:{damping}"),
        }
    }
}

/// An instantiated job.
pub enum Job {
    /// A monotone frontier job, eligible for fusion.
    Frontier(Box<dyn FrontierJob>),
    /// A PageRank job.
    PageRank(PageRank),
}

impl Job {
    /// Algorithm of the job.
    pub fn kind(&self) -> JobKind {
        match self {
            Job::Frontier(job) => job.kind(),
            Job::PageRank(_) => JobKind::PageRank,
        }
    }

    /// The frontier job, if this is one.
    pub fn as_frontier_mut(&mut self) -> Option<&mut dyn FrontierJob> {
        match self {
            Job::Frontier(job) => Some(job.as_mut()),
            Job::PageRank(_) => None,
        }
    }

    /// Runs the job unfused to completion.
    pub fn run(&mut self, engine: &Engine, options: EdgeOptions) -> JobStats {
        match self {
            Job::Frontier(job) => run_frontier(engine, job.as_mut(), options),
            Job::PageRank(pagerank) => pagerank.run(engine, options),
        }
    }

    /// Final result.
    pub fn summarize(&self, engine: &Engine) -> JobSummary {
        match self {
            Job::Frontier(job) => job.summarize(engine),
            Job::PageRank(pagerank) => pagerank.summarize(engine),
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Job").field(&self.kind()).finish()
    }
}
