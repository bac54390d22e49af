//! The read-only graph partition: CSR out-adjacency, CSC in-adjacency and
//! per-vertex out-degree over one edge set.
//!
//! Memory layout:
//! - `out_offsets` / `in_offsets`: `n + 1` run boundaries
//! - `out_targets` / `in_sources`: neighbour ids, one run per vertex
//! - `out_weights` / `in_weights`: present only for [`WeightKind::Numeric`]
//! - `out_degree`: cached run lengths, read on every push/pull decision

mod adjacency;
mod compress;

pub use adjacency::{AdjIter, AdjList, AdjUnit, EdgeData};

use crate::error::{Error, Result};
use crate::graph::{VertexId, Weight, WeightKind, NO_VERTEX};

use compress::{compress, Compressed};

/// An immutable graph shared by reference across jobs and threads.
///
/// ### Performance Characteristics
/// | Operation | Complexity | Notes |
/// |-----------|------------|-------|
/// | construction | \(O(n + m)\) | Two stable counting sorts |
/// | `outgoing` / `incoming` | \(O(1)\) | Borrowed run, no allocation |
/// | `out_degree` / `in_degree` | \(O(1)\) | |
/// | `has_edge` | \(O(\text{out-degree})\) | Linear scan of the outgoing run |
#[derive(Debug, Clone)]
pub struct GraphPartition {
    vertices: usize,
    out_offsets: Box<[usize]>,
    out_targets: Box<[VertexId]>,
    out_weights: Option<Box<[Weight]>>,
    in_offsets: Box<[usize]>,
    in_sources: Box<[VertexId]>,
    in_weights: Option<Box<[Weight]>>,
    out_degree: Box<[VertexId]>,
}

impl GraphPartition {
    /// Builds an unweighted partition from `(src, dst)` pairs.
    ///
    /// # Errors
    /// Fails if an endpoint is `>= vertices` or `vertices` does not fit the id space.
    pub fn from_edges(vertices: usize, edges: &[(VertexId, VertexId)]) -> Result<Self> {
        let (srcs, dsts): (Vec<_>, Vec<_>) = edges.iter().copied().unzip();
        Self::from_columns(vertices, &srcs, &dsts, None)
    }

    /// Builds a weighted partition from `(src, dst, weight)` triples.
    ///
    /// # Errors
    /// Fails if an endpoint is `>= vertices` or `vertices` does not fit the id space.
    pub fn from_weighted_edges(
        vertices: usize,
        edges: &[(VertexId, VertexId, Weight)],
    ) -> Result<Self> {
        let mut srcs = Vec::with_capacity(edges.len());
        let mut dsts = Vec::with_capacity(edges.len());
        let mut weights = Vec::with_capacity(edges.len());
        for &(s, d, w) in edges {
            srcs.push(s);
            dsts.push(d);
            weights.push(w);
        }
        Self::from_columns(vertices, &srcs, &dsts, Some(&weights))
    }

    /// Builds an unweighted partition from an adjacency list (`adjacency[u]` are
    /// the out-neighbours of `u`).
    ///
    /// # Errors
    /// Fails if a neighbour id is out of range.
    pub fn from_adjacency(adjacency: &[Vec<VertexId>]) -> Result<Self> {
        let total: usize = adjacency.iter().map(Vec::len).sum();
        let mut srcs = Vec::with_capacity(total);
        let mut dsts = Vec::with_capacity(total);
        for (u, nbrs) in adjacency.iter().enumerate() {
            let u = VertexId::try_from(u).map_err(|_| Error::TooManyVertices(adjacency.len()))?;
            for &v in nbrs {
                srcs.push(u);
                dsts.push(v);
            }
        }
        Self::from_columns(adjacency.len(), &srcs, &dsts, None)
    }

    /// Builds from parallel source/destination(/weight) columns.
    ///
    /// # Errors
    /// Fails if an endpoint is `>= vertices` or `vertices` does not fit the id space.
    pub(crate) fn from_columns(
        vertices: usize,
        srcs: &[VertexId],
        dsts: &[VertexId],
        weights: Option<&[Weight]>,
    ) -> Result<Self> {
        assert_eq!(srcs.len(), dsts.len(), "edge columns differ in length");
        if let Some(w) = weights {
            assert_eq!(w.len(), srcs.len(), "weight column differs in length");
        }
        // `NO_VERTEX` must never be a real id.
        if vertices >= NO_VERTEX as usize {
            return Err(Error::TooManyVertices(vertices));
        }
        for (&src, &dst) in srcs.iter().zip(dsts) {
            if src as usize >= vertices || dst as usize >= vertices {
                return Err(Error::VertexOutOfRange { src, dst, vertices });
            }
        }
        Ok(Self::assemble(vertices, srcs, dsts, weights))
    }

    fn assemble(
        vertices: usize,
        srcs: &[VertexId],
        dsts: &[VertexId],
        weights: Option<&[Weight]>,
    ) -> Self {
        let outgoing = compress(vertices, srcs, dsts, weights);
        let incoming = compress(vertices, dsts, srcs, weights);
        let out_degree = outgoing
            .offsets
            .windows(2)
            .map(|w| (w[1] - w[0]) as VertexId)
            .collect();

        let Compressed {
            offsets: out_offsets,
            targets: out_targets,
            weights: out_weights,
        } = outgoing;
        let Compressed {
            offsets: in_offsets,
            targets: in_sources,
            weights: in_weights,
        } = incoming;

        Self {
            vertices,
            out_offsets,
            out_targets,
            out_weights,
            in_offsets,
            in_sources,
            in_weights,
            out_degree,
        }
    }

    /// Returns a partition holding every edge of `self` plus its reverse.
    ///
    /// This is how a directed edge list is treated as undirected (e.g. for
    /// connected components). Self-loops are duplicated like any other edge.
    pub fn symmetrized(&self) -> Self {
        let m = self.edges();
        let mut srcs = Vec::with_capacity(2 * m);
        let mut dsts = Vec::with_capacity(2 * m);
        let mut weights = self.out_weights.as_ref().map(|_| Vec::with_capacity(2 * m));
        for u in 0..self.vertices {
            let u = u as VertexId;
            for edge in self.outgoing(u) {
                srcs.push(u);
                dsts.push(edge.neighbour);
                srcs.push(edge.neighbour);
                dsts.push(u);
                if let (Some(w), EdgeData::Weight(x)) = (weights.as_mut(), edge.edge_data) {
                    w.push(x);
                    w.push(x);
                }
            }
        }
        Self::assemble(self.vertices, &srcs, &dsts, weights.as_deref())
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn vertices(&self) -> usize {
        self.vertices
    }

    /// Number of directed edges.
    #[inline(always)]
    pub fn edges(&self) -> usize {
        self.out_targets.len()
    }

    /// Payload representation of this partition.
    #[inline]
    pub fn weight_kind(&self) -> WeightKind {
        if self.out_weights.is_some() {
            WeightKind::Numeric
        } else {
            WeightKind::Unit
        }
    }

    /// Out-degree of `v`.
    #[inline(always)]
    pub fn out_degree(&self, v: VertexId) -> VertexId {
        self.out_degree[v as usize]
    }

    /// Out-degrees of all vertices, indexed by id.
    #[inline(always)]
    pub fn out_degrees(&self) -> &[VertexId] {
        &self.out_degree
    }

    /// In-degree of `v`.
    #[inline]
    pub fn in_degree(&self, v: VertexId) -> VertexId {
        let v = v as usize;
        (self.in_offsets[v + 1] - self.in_offsets[v]) as VertexId
    }

    /// Outgoing run of `src`.
    ///
    /// # Panics
    /// Panics if `src >= vertices()`.
    #[inline(always)]
    pub fn outgoing(&self, src: VertexId) -> AdjList<'_> {
        let s = src as usize;
        let range = self.out_offsets[s]..self.out_offsets[s + 1];
        AdjList::new(
            &self.out_targets[range.clone()],
            self.out_weights.as_deref().map(|w| &w[range]),
        )
    }

    /// Incoming run of `dst`.
    ///
    /// # Panics
    /// Panics if `dst >= vertices()`.
    #[inline(always)]
    pub fn incoming(&self, dst: VertexId) -> AdjList<'_> {
        let d = dst as usize;
        let range = self.in_offsets[d]..self.in_offsets[d + 1];
        AdjList::new(
            &self.in_sources[range.clone()],
            self.in_weights.as_deref().map(|w| &w[range]),
        )
    }

    /// Checks whether the edge `from -> to` exists.
    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        assert!((to as usize) < self.vertices, "to vertex {to} out of bounds");
        self.outgoing(from).neighbours().contains(&to)
    }
}

#[cfg(test)]
mod tests;
