//! Tests for the engine primitives.

use std::sync::Arc;

use super::*;
use crate::graph::{GraphPartition, VertexId};

fn engine(vertices: usize, edges: &[(VertexId, VertexId)]) -> Engine {
    let graph = GraphPartition::from_edges(vertices, edges).unwrap();
    Engine::new(Arc::new(graph), EngineConfig::default().with_threads(2)).unwrap()
}

fn star(leaves: VertexId) -> Vec<(VertexId, VertexId)> {
    (1..=leaves).map(|v| (0, v)).collect()
}

/// One BFS-like step: activate every out-neighbour of the frontier that is
/// not yet visited. Returns the activation count and the new frontier.
fn expand(engine: &Engine, frontier: &VertexSubset, visited: &VertexSubset, options: EdgeOptions) -> (usize, Vec<VertexId>) {
    let next = engine.alloc_vertex_subset();
    let activated = engine.process_edges::<VertexId, _, _, _, _>(
        |src, out| out.emit(src, src),
        |_, _, adj| {
            adj.iter()
                .filter(|e| !visited.get_bit(e.neighbour) && next.set_bit(e.neighbour))
                .count()
        },
        |dst, adj, out| {
            if visited.get_bit(dst) {
                return;
            }
            if let Some(e) = adj.iter().find(|e| frontier.get_bit(e.neighbour)) {
                out.emit(dst, e.neighbour);
            }
        },
        |dst, _| usize::from(next.set_bit(dst)),
        frontier,
        options,
    );
    (activated, next.iter().collect())
}

#[test]
fn test_lanes_cover_vertex_range_on_word_boundaries() {
    for n in [0usize, 1, 63, 64, 65, 1000, 4096] {
        let lanes = partition_lanes(n, 8);
        let mut next = 0;
        for lane in lanes.iter() {
            assert_eq!(lane.start, next);
            assert_eq!(lane.start % WORD_BITS, 0);
            assert!(!lane.is_empty());
            next = lane.end;
        }
        assert_eq!(next, n);
        assert!(lanes.len() <= 8);
    }
}

#[test]
fn test_invalid_config_is_rejected() {
    let graph = Arc::new(GraphPartition::from_edges(1, &[]).unwrap());
    let config = EngineConfig {
        channels: 0,
        ..EngineConfig::default()
    };
    assert!(Engine::new(graph, config).is_err());
}

#[test]
fn test_subset_operations() {
    let e = engine(130, &[]);
    let s = e.alloc_vertex_subset();
    assert_eq!(s.size(), 130);
    assert!(s.is_empty());
    assert!(s.set_bit(129));
    assert!(!s.set_bit(129));
    assert!(s.get_bit(129));
    assert_eq!(s.count(), 1);
    s.fill();
    assert_eq!(s.count(), 130);
    s.clear();
    assert!(s.is_empty());
    assert_eq!(e.all_vertices().count(), 130);
}

#[test]
fn test_process_vertices_sums_over_active() {
    let e = engine(1000, &[]);
    let all = e.all_vertices();
    let sum: u64 = e.process_vertices(|v| u64::from(v), &all);
    assert_eq!(sum, 999 * 1000 / 2);

    let some = e.alloc_vertex_subset();
    for v in [3, 500, 999] {
        some.set_bit(v);
    }
    let count: usize = e.process_vertices(|_| 1, &some);
    assert_eq!(count, 3);
}

#[test]
fn test_process_vertices_with_custom_combiner() {
    let e = engine(200, &[]);
    let all = e.all_vertices();
    let max = e.process_vertices_with(|v| v % 37, &all, || 0, u32::max);
    assert_eq!(max, 36);
}

#[test]
fn test_process_vertices_writes_through_captured_array() {
    let e = engine(300, &[]);
    let labels = e.alloc_vertex_array::<u32>();
    let all = e.all_vertices();
    let written: usize = e.process_vertices(
        |v| {
            labels.set(v, v * 2);
            1
        },
        &all,
    );
    assert_eq!(written, 300);
    let gathered = e.gather_vertex_array(&labels);
    assert!(gathered.iter().enumerate().all(|(i, &l)| l == 2 * i as u32));
}

#[test]
fn test_vertex_array_fill_and_atomics() {
    let e = engine(10, &[]);
    let a = e.alloc_vertex_array_with(f32::INFINITY);
    assert!(a.write_min(3, 2.0));
    assert!(!a.write_min(3, 5.0));
    e.fill_vertex_array(&a, 1.0);
    a.write_add(4, 0.5);
    assert_eq!(a.get(3), 1.0);
    assert_eq!(a.get(4), 1.5);

    let p = e.alloc_vertex_array_with(u32::MAX);
    assert!(p.compare_and_swap(1, u32::MAX, 0));
    assert!(!p.compare_and_swap(1, u32::MAX, 7));
    assert_eq!(p.get(1), 0);
}

#[test]
fn test_empty_frontier_is_a_no_op() {
    let e = engine(4, &[(0, 1), (1, 2)]);
    let frontier = e.alloc_vertex_subset();
    let visited = e.alloc_vertex_subset();
    let (activated, next) = expand(&e, &frontier, &visited, EdgeOptions::default());
    assert_eq!(activated, 0);
    assert!(next.is_empty());
}

#[test]
fn test_push_and_pull_activate_the_same_set() {
    let mut edges = star(100);
    edges.extend([(5, 200), (6, 200), (7, 201), (200, 0)]);
    let e = engine(202, &edges);

    let frontier = e.alloc_vertex_subset();
    let visited = e.alloc_vertex_subset();
    for v in [0, 5, 6, 7] {
        frontier.set_bit(v);
        visited.set_bit(v);
    }

    let push = expand(&e, &frontier, &visited, EdgeOptions::default().force(Direction::Push));
    let pull = expand(&e, &frontier, &visited, EdgeOptions::default().force(Direction::Pull));
    assert_eq!(push, pull);
    // 1..=100 except 5, 6, 7 plus 200 and 201; 200 is reached twice but counted once.
    assert_eq!(push.0, 99);
}

#[test]
fn test_density_threshold_selects_direction() {
    let e = engine(101, &star(100));
    let frontier = e.alloc_vertex_subset();
    frontier.set_bit(0);

    // Every edge is a frontier edge: not below any threshold.
    let options = EdgeOptions::default();
    assert_eq!(e.select_direction(&frontier, &options).map(|d| d.0), Some(Direction::Pull));

    let leaf = e.alloc_vertex_subset();
    leaf.set_bit(1);
    assert_eq!(e.select_direction(&leaf, &options).map(|d| d.0), Some(Direction::Push));
    assert_eq!(
        e.select_direction(&leaf, &options.force(Direction::Pull)).map(|d| d.0),
        Some(Direction::Pull)
    );
    assert_eq!(
        e.select_direction(&frontier, &options.threshold(1.0)).map(|d| (d.1, d.2)),
        Some((1, 100))
    );
}

#[test]
fn test_zero_out_degree_source_touches_nothing() {
    let e = engine(3, &[(0, 1)]);
    let frontier = e.alloc_vertex_subset();
    frontier.set_bit(2);
    let visited = e.alloc_vertex_subset();
    let (activated, _) = expand(&e, &frontier, &visited, EdgeOptions::default().force(Direction::Push));
    assert_eq!(activated, 0);
}

#[test]
fn test_channels_are_reusable_across_rounds() {
    let e = engine(3, &[(0, 1), (1, 2)]);
    let frontier = e.alloc_vertex_subset();
    let visited = e.alloc_vertex_subset();
    frontier.set_bit(0);
    for _ in 0..3 {
        let (activated, _) = expand(&e, &frontier, &visited, EdgeOptions::on_channel(7));
        assert_eq!(activated, 1);
    }
}

#[test]
#[should_panic(expected = "already has a traversal in flight")]
fn test_nested_round_on_same_channel_panics() {
    let e = engine(2, &[(0, 1)]);
    let frontier = e.alloc_vertex_subset();
    frontier.set_bit(0);
    e.process_edges::<(), _, _, _, _>(
        |src, out| out.emit(src, ()),
        |_, (), _| {
            let visited = e.alloc_vertex_subset();
            expand(&e, &frontier, &visited, EdgeOptions::default()).0
        },
        |_, _, _| {},
        |_, ()| 0,
        &frontier,
        EdgeOptions::default().force(Direction::Push),
    );
}

#[test]
#[should_panic(expected = "out of range")]
fn test_unknown_channel_panics() {
    let e = engine(2, &[(0, 1)]);
    let frontier = e.alloc_vertex_subset();
    let visited = e.alloc_vertex_subset();
    frontier.set_bit(0);
    expand(&e, &frontier, &visited, EdgeOptions::on_channel(8));
}
