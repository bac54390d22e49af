//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use fusegraph::jobs::NO_PARENT;
use fusegraph::{Engine, EngineConfig, GraphPartition, VertexId, Weight};
use petgraph::graph::{DiGraph, NodeIndex};
use proptest::prelude::*;

/// Vertex count plus weighted edge list.
pub type Edges = (usize, Vec<(VertexId, VertexId, Weight)>);

/// Random directed multigraphs with small integral weights, so path sums are
/// exact in `f32`.
pub fn arb_graph(max_vertices: usize, max_edges: usize) -> impl Strategy<Value = Edges> {
    (1..=max_vertices).prop_flat_map(move |n| {
        let v = 0..n as VertexId;
        let edge = (v.clone(), v, 1u8..=8).prop_map(|(s, d, w)| (s, d, Weight::from(w)));
        (Just(n), proptest::collection::vec(edge, 0..=max_edges))
    })
}

pub fn weighted(graph: &Edges) -> GraphPartition {
    GraphPartition::from_weighted_edges(graph.0, &graph.1).unwrap()
}

pub fn unweighted(graph: &Edges) -> GraphPartition {
    let pairs: Vec<_> = graph.1.iter().map(|&(s, d, _)| (s, d)).collect();
    GraphPartition::from_edges(graph.0, &pairs).unwrap()
}

pub fn engine(graph: GraphPartition) -> Engine {
    Engine::new(Arc::new(graph), EngineConfig::default().with_threads(3)).unwrap()
}

pub fn petgraph_of(graph: &Edges) -> (DiGraph<(), Weight>, Vec<NodeIndex>) {
    let mut g = DiGraph::new();
    let nodes: Vec<_> = (0..graph.0).map(|_| g.add_node(())).collect();
    for &(s, d, w) in &graph.1 {
        g.add_edge(nodes[s as usize], nodes[d as usize], w);
    }
    (g, nodes)
}

/// BFS depth of every vertex, following the parent array to the root.
pub fn depths(parents: &[VertexId]) -> Vec<Option<usize>> {
    (0..parents.len())
        .map(|v| {
            let mut depth = 0;
            let mut at = v;
            loop {
                let p = parents[at];
                if p == NO_PARENT {
                    return None;
                }
                if p as usize == at {
                    return Some(depth);
                }
                depth += 1;
                at = p as usize;
                assert!(depth <= parents.len(), "parent chain of {v} has a cycle");
            }
        })
        .collect()
}
