//! Tests for fused execution.

use std::sync::Arc;

use super::*;
use crate::config::EngineConfig;
use crate::engine::Direction;
use crate::graph::{GraphPartition, VertexId};
use crate::jobs::{run_frontier, Bfs, ConnectedComponents, JobKind, Sssp, NO_PARENT};

fn engine_for(graph: GraphPartition) -> Engine {
    Engine::new(Arc::new(graph), EngineConfig::default().with_threads(2)).unwrap()
}

fn path(n: VertexId) -> GraphPartition {
    let edges: Vec<_> = (0..n - 1).map(|v| (v, v + 1)).collect();
    GraphPartition::from_edges(n as usize, &edges).unwrap()
}

#[test]
fn test_two_bfs_jobs_match_unfused_runs() {
    let engine = engine_for(path(5));

    let mut alone0 = Bfs::new(&engine, 0).unwrap();
    let mut alone2 = Bfs::new(&engine, 2).unwrap();
    let stats0 = run_frontier(&engine, &mut alone0, EdgeOptions::default());
    let stats2 = run_frontier(&engine, &mut alone2, EdgeOptions::default());

    let mut fused0 = Bfs::new(&engine, 0).unwrap();
    let mut fused2 = Bfs::new(&engine, 2).unwrap();
    let mut run = FusedRun::new(&engine, EdgeOptions::default());
    assert_eq!(run.add(&mut fused0), 0);
    assert_eq!(run.add(&mut fused2), 1);
    let report = run.run();

    assert_eq!(fused0.parents(), alone0.parents());
    assert_eq!(fused2.parents(), alone2.parents());
    assert_eq!(fused0.parents(), vec![0, 0, 1, 2, 3]);
    assert_eq!(report.jobs, vec![stats0, stats2]);
    // The longer job keeps the shared traversal going.
    assert_eq!(report.rounds, 4);
}

#[test]
fn test_mixed_kinds_in_both_directions() {
    let g = GraphPartition::from_weighted_edges(
        6,
        &[
            (0, 1, 2.0),
            (1, 2, 2.0),
            (0, 2, 5.0),
            (2, 3, 1.0),
            (4, 5, 1.0),
        ],
    )
    .unwrap()
    .symmetrized();
    let engine = engine_for(g);

    for direction in [Direction::Push, Direction::Pull] {
        let options = EdgeOptions::default().force(direction);

        let mut sssp = Sssp::new(&engine, 0).unwrap();
        let mut cc = ConnectedComponents::new(&engine);
        let mut bfs = Bfs::new(&engine, 5).unwrap();
        let mut run = FusedRun::new(&engine, options);
        run.add(&mut sssp);
        run.add(&mut cc);
        run.add(&mut bfs);
        let report = run.run();

        let mut sssp_alone = Sssp::new(&engine, 0).unwrap();
        let mut cc_alone = ConnectedComponents::new(&engine);
        let sssp_stats = run_frontier(&engine, &mut sssp_alone, options);
        let cc_stats = run_frontier(&engine, &mut cc_alone, options);

        assert_eq!(sssp.distances(), sssp_alone.distances());
        assert_eq!(sssp.distances()[..4], [0.0, 2.0, 4.0, 5.0]);
        assert_eq!(cc.labels(), cc_alone.labels());
        assert_eq!(cc.labels(), vec![0, 0, 0, 0, 4, 4]);
        assert_eq!(bfs.parents()[4..], [5, 5]);
        assert_eq!(report.jobs[0], sssp_stats);
        assert_eq!(report.jobs[1], cc_stats);
        assert_eq!(report.jobs[2].kind, JobKind::Bfs);
        assert_eq!(report.jobs[2].rounds, 1);
    }
}

#[test]
fn test_converged_job_is_left_alone() {
    let engine = engine_for(path(6));
    // Root 5 has no out-edges: converged after seeding plus one round.
    let mut short = Bfs::new(&engine, 5).unwrap();
    let mut long = Bfs::new(&engine, 0).unwrap();
    let mut run = FusedRun::new(&engine, EdgeOptions::default());
    run.add(&mut short);
    run.add(&mut long);
    assert_eq!(run.seed(), 2);

    let mut rounds = 0;
    while !run.is_converged() {
        run.round();
        rounds += 1;
    }
    // Five productive rounds for the long job plus one that finds nothing.
    assert_eq!(rounds, 6);
    drop(run);

    let expected_short: Vec<_> = (0..6).map(|v| if v == 5 { 5 } else { NO_PARENT }).collect();
    assert_eq!(short.parents(), expected_short);
    assert_eq!(long.parents(), vec![0, 0, 1, 2, 3, 4]);
}

#[test]
fn test_empty_run_is_converged() {
    let engine = engine_for(path(3));
    let run = FusedRun::new(&engine, EdgeOptions::default());
    assert!(run.is_empty());
    let report = run.run();
    assert_eq!(report.rounds, 0);
    assert!(report.jobs.is_empty());
}

#[test]
fn test_round_returns_distinct_activations() {
    // Both jobs discover vertex 1 in the same round; it is counted once.
    let engine = engine_for(GraphPartition::from_edges(2, &[(0, 1)]).unwrap());
    let mut a = Bfs::new(&engine, 0).unwrap();
    let mut b = Bfs::new(&engine, 0).unwrap();
    let mut run = FusedRun::new(&engine, EdgeOptions::default().force(Direction::Push));
    run.add(&mut a);
    run.add(&mut b);
    assert_eq!(run.round(), 1);
    assert_eq!(run.round(), 0);
    assert!(run.is_converged());
}

#[test]
#[should_panic(expected = "at most 16 jobs")]
fn test_too_many_jobs_panics() {
    let engine = engine_for(path(2));
    let mut jobs: Vec<_> = (0..=MAX_FUSED_JOBS)
        .map(|_| ConnectedComponents::new(&engine))
        .collect();
    let mut run = FusedRun::new(&engine, EdgeOptions::default());
    for job in &mut jobs {
        run.add(job);
    }
}
