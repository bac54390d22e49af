//! Tests for the graph partition.

use super::*;

fn ids(list: AdjList<'_>) -> Vec<VertexId> {
    list.iter().map(|e| e.neighbour).collect()
}

#[test]
fn test_partition_out_and_in_runs() {
    // 0 -> 1, 2
    // 1 -> 2
    // 2 ->
    // 3 -> 1
    let g = GraphPartition::from_edges(4, &[(0, 1), (0, 2), (1, 2), (3, 1)]).unwrap();

    assert_eq!(g.vertices(), 4);
    assert_eq!(g.edges(), 4);
    assert_eq!(g.weight_kind(), WeightKind::Unit);

    assert_eq!(ids(g.outgoing(0)), vec![1, 2]);
    assert_eq!(ids(g.outgoing(1)), vec![2]);
    assert!(g.outgoing(2).is_empty());
    assert_eq!(ids(g.outgoing(3)), vec![1]);

    assert!(g.incoming(0).is_empty());
    assert_eq!(ids(g.incoming(1)), vec![0, 3]);
    assert_eq!(ids(g.incoming(2)), vec![0, 1]);
    assert!(g.incoming(3).is_empty());

    assert_eq!(g.out_degrees(), &[2, 1, 0, 1]);
    assert_eq!(g.in_degree(1), 2);
    assert_eq!(g.in_degree(3), 0);
}

#[test]
fn test_runs_keep_input_order() {
    let g = GraphPartition::from_edges(3, &[(0, 2), (0, 1), (2, 1), (1, 1)]).unwrap();
    assert_eq!(ids(g.outgoing(0)), vec![2, 1]);
    assert_eq!(ids(g.incoming(1)), vec![0, 2, 1]);
}

#[test]
fn test_weighted_payloads_follow_both_directions() {
    let g = GraphPartition::from_weighted_edges(3, &[(0, 1, 1.5), (2, 1, 4.0), (0, 2, 2.0)])
        .unwrap();
    assert_eq!(g.weight_kind(), WeightKind::Numeric);

    let out: Vec<_> = g.outgoing(0).iter().collect();
    assert_eq!(
        out,
        vec![
            AdjUnit { neighbour: 1, edge_data: EdgeData::Weight(1.5) },
            AdjUnit { neighbour: 2, edge_data: EdgeData::Weight(2.0) },
        ]
    );

    let inc: Vec<_> = g.incoming(1).iter().map(|e| (e.neighbour, e.weight())).collect();
    assert_eq!(inc, vec![(0, 1.5), (2, 4.0)]);
}

#[test]
fn test_unit_edges_cost_one() {
    let g = GraphPartition::from_edges(2, &[(0, 1)]).unwrap();
    let e = g.outgoing(0).iter().next().unwrap();
    assert_eq!(e.edge_data, EdgeData::Empty);
    assert_eq!(e.weight(), 1.0);
}

#[test]
fn test_from_adjacency_matches_edges() {
    let adjacency = vec![vec![1, 2], vec![2], vec![0]];
    let g = GraphPartition::from_adjacency(&adjacency).unwrap();
    assert_eq!(g.edges(), 4);
    assert!(g.has_edge(0, 2));
    assert!(g.has_edge(2, 0));
    assert!(!g.has_edge(2, 1));
    assert_eq!(ids(g.incoming(2)), vec![0, 1]);
}

#[test]
fn test_symmetrized_adds_reverse_edges() {
    let g = GraphPartition::from_weighted_edges(3, &[(0, 1, 3.0), (1, 2, 5.0)]).unwrap();
    let u = g.symmetrized();
    assert_eq!(u.edges(), 4);
    assert!(u.has_edge(1, 0));
    assert!(u.has_edge(2, 1));
    let back: Vec<_> = u.outgoing(2).iter().map(|e| (e.neighbour, e.weight())).collect();
    assert_eq!(back, vec![(1, 5.0)]);
    // Out- and in-runs coincide on a symmetric graph.
    for v in 0..3 {
        let mut a = ids(u.outgoing(v));
        let mut b = ids(u.incoming(v));
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }
}

#[test]
fn test_out_of_range_edge_is_rejected() {
    let err = GraphPartition::from_edges(3, &[(0, 1), (1, 3)]).unwrap_err();
    assert!(matches!(
        err,
        Error::VertexOutOfRange { src: 1, dst: 3, vertices: 3 }
    ));
}

#[test]
fn test_sentinel_id_is_reserved() {
    let err = GraphPartition::from_edges(NO_VERTEX as usize, &[]).unwrap_err();
    assert!(matches!(err, Error::TooManyVertices(_)));
}

#[test]
fn test_empty_graph() {
    let g = GraphPartition::from_edges(0, &[]).unwrap();
    assert_eq!(g.vertices(), 0);
    assert_eq!(g.edges(), 0);
}

#[test]
fn test_disconnected_graph() {
    let g = GraphPartition::from_edges(5, &[]).unwrap();
    for v in 0..5 {
        assert_eq!(g.out_degree(v), 0);
        assert!(g.incoming(v).is_empty());
    }
}
