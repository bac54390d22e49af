//! The three ways a job mix can share a graph.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use fusegraph::jobs::Job;
use fusegraph::{EdgeOptions, Engine, EngineConfig, FusedRun, GraphPartition, JobSpec, JobStats};
use serde::Serialize;
use tracing::{debug, info};

use crate::report::{millis, JobReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Frontier jobs share one traversal per round; PageRank runs beside it.
    Fused,
    /// One engine, one thread and one channel per job.
    Shared,
    /// A private graph copy and single-threaded engine per job.
    Isolated,
}

pub struct Outcome {
    pub jobs: Vec<JobReport>,
    pub fused_rounds: Option<usize>,
}

impl Strategy {
    pub fn run(
        self,
        graph: &Arc<GraphPartition>,
        config: EngineConfig,
        specs: &[JobSpec],
    ) -> Result<Outcome> {
        info!(strategy = ?self, jobs = specs.len(), "running");
        match self {
            Strategy::Fused => fused(graph, config, specs),
            Strategy::Shared => shared(graph, config, specs),
            Strategy::Isolated => isolated(graph, config, specs),
        }
    }
}

fn build(engine: &Engine, spec: &JobSpec) -> Result<Job> {
    spec.build(engine).with_context(|| format!("job `{spec}`"))
}

fn report(spec: &JobSpec, job: &Job, engine: &Engine, stats: JobStats, elapsed: Duration) -> JobReport {
    JobReport {
        job: spec.to_string(),
        stats,
        summary: job.summarize(engine),
        millis: millis(elapsed),
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

fn joined<T>(handle: thread::ScopedJoinHandle<'_, T>) -> Result<T> {
    handle.join().map_err(|_| anyhow!("job thread panicked"))
}

fn isolated(graph: &Arc<GraphPartition>, config: EngineConfig, specs: &[JobSpec]) -> Result<Outcome> {
    let jobs = thread::scope(|s| {
        let handles: Vec<_> = specs
            .iter()
            .map(|spec| {
                s.spawn(move || -> Result<JobReport> {
                    let copy = Arc::new(GraphPartition::clone(graph));
                    let engine = Engine::new(copy, config.with_threads(1))?;
                    let mut job = build(&engine, spec)?;
                    let (stats, elapsed) = timed(|| job.run(&engine, EdgeOptions::default()));
                    Ok(report(spec, &job, &engine, stats, elapsed))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| joined(h).and_then(|report| report))
            .collect::<Result<Vec<_>>>()
    })?;
    Ok(Outcome {
        jobs,
        fused_rounds: None,
    })
}

fn shared(graph: &Arc<GraphPartition>, config: EngineConfig, specs: &[JobSpec]) -> Result<Outcome> {
    let config = config.with_channels(config.channels.max(specs.len()));
    let engine = Engine::new(graph.clone(), config)?;
    let mut jobs = specs
        .iter()
        .map(|spec| build(&engine, spec))
        .collect::<Result<Vec<_>>>()?;

    let engine = &engine;
    let timings = thread::scope(|s| {
        let handles: Vec<_> = jobs
            .iter_mut()
            .enumerate()
            .map(|(channel, job)| {
                s.spawn(move || timed(|| job.run(engine, EdgeOptions::on_channel(channel))))
            })
            .collect();
        handles.into_iter().map(joined).collect::<Result<Vec<_>>>()
    })?;

    let jobs = specs
        .iter()
        .zip(&jobs)
        .zip(timings)
        .map(|((spec, job), (stats, elapsed))| report(spec, job, engine, stats, elapsed))
        .collect();
    Ok(Outcome {
        jobs,
        fused_rounds: None,
    })
}

fn fused(graph: &Arc<GraphPartition>, config: EngineConfig, specs: &[JobSpec]) -> Result<Outcome> {
    let ranks = specs.iter().filter(|s| !s.is_frontier()).count();
    let config = config.with_channels(config.channels.max(ranks + 1));
    let engine = Engine::new(graph.clone(), config)?;
    let mut jobs = specs
        .iter()
        .map(|spec| build(&engine, spec))
        .collect::<Result<Vec<_>>>()?;

    let engine = &engine;
    let mut results: Vec<Option<(JobStats, Duration)>> = vec![None; jobs.len()];
    let mut fused_rounds = None;
    thread::scope(|s| -> Result<()> {
        let mut run = FusedRun::new(engine, EdgeOptions::on_channel(0));
        let mut members = Vec::new();
        let mut handles = Vec::new();
        for (i, job) in jobs.iter_mut().enumerate() {
            match job {
                Job::Frontier(job) => {
                    run.add(job.as_mut());
                    members.push(i);
                }
                Job::PageRank(pagerank) => {
                    let options = EdgeOptions::on_channel(1 + handles.len());
                    let handle = s.spawn(move || timed(|| pagerank.run(engine, options)));
                    handles.push((i, handle));
                }
            }
        }

        if !run.is_empty() {
            let (report, elapsed) = timed(|| run.run());
            debug!(rounds = report.rounds, ?elapsed, "fused run finished");
            fused_rounds = Some(report.rounds);
            for (&i, stats) in members.iter().zip(report.jobs) {
                results[i] = Some((stats, elapsed));
            }
        }
        for (i, handle) in handles {
            results[i] = Some(joined(handle)?);
        }
        Ok(())
    })?;

    let jobs = specs
        .iter()
        .zip(&jobs)
        .zip(results)
        .map(|((spec, job), result)| {
            let (stats, elapsed) = result.ok_or_else(|| anyhow!("job `{spec}` did not run"))?;
            Ok(report(spec, job, engine, stats, elapsed))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Outcome { jobs, fused_rounds })
}
