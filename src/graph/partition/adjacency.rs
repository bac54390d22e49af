//! Borrowed adjacency views handed to edge callbacks.

use core::iter::FusedIterator;
use core::slice;

use crate::graph::{VertexId, Weight};

/// Payload attached to one adjacency entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeData {
    /// The partition is unweighted.
    Empty,
    /// The partition carries numeric weights.
    Weight(Weight),
}

impl EdgeData {
    /// Traversal cost of the edge; unweighted edges cost `1.0`.
    #[inline(always)]
    pub fn weight(self) -> Weight {
        match self {
            EdgeData::Empty => 1.0,
            EdgeData::Weight(w) => w,
        }
    }
}

/// One `(neighbour, edge_data)` adjacency entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjUnit {
    /// The vertex at the other end of the edge.
    pub neighbour: VertexId,
    /// The edge payload.
    pub edge_data: EdgeData,
}

impl AdjUnit {
    /// Shorthand for `self.edge_data.weight()`.
    #[inline(always)]
    pub fn weight(self) -> Weight {
        self.edge_data.weight()
    }
}

/// A contiguous run of adjacency entries of one vertex.
///
/// Depending on where it came from this is either the outgoing run of a source
/// or the incoming run of a destination.
#[derive(Debug, Clone, Copy)]
pub struct AdjList<'a> {
    neighbours: &'a [VertexId],
    weights: Option<&'a [Weight]>,
}

impl<'a> AdjList<'a> {
    #[inline(always)]
    pub(crate) fn new(neighbours: &'a [VertexId], weights: Option<&'a [Weight]>) -> Self {
        debug_assert!(weights.map_or(true, |w| w.len() == neighbours.len()));
        Self {
            neighbours,
            weights,
        }
    }

    /// Number of entries in the run.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    /// Returns `true` for a vertex with no edges in this direction.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }

    /// Neighbour ids without payloads.
    #[inline(always)]
    pub fn neighbours(&self) -> &'a [VertexId] {
        self.neighbours
    }

    /// Iterates the run in storage order.
    #[inline(always)]
    pub fn iter(&self) -> AdjIter<'a> {
        AdjIter {
            neighbours: self.neighbours.iter(),
            weights: self.weights.map(<[Weight]>::iter),
        }
    }
}

impl<'a> IntoIterator for AdjList<'a> {
    type Item = AdjUnit;
    type IntoIter = AdjIter<'a>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over an [`AdjList`].
#[derive(Debug, Clone)]
pub struct AdjIter<'a> {
    neighbours: slice::Iter<'a, VertexId>,
    weights: Option<slice::Iter<'a, Weight>>,
}

impl Iterator for AdjIter<'_> {
    type Item = AdjUnit;

    #[inline(always)]
    fn next(&mut self) -> Option<AdjUnit> {
        let neighbour = *self.neighbours.next()?;
        let edge_data = match &mut self.weights {
            Some(weights) => EdgeData::Weight(*weights.next()?),
            None => EdgeData::Empty,
        };
        Some(AdjUnit {
            neighbour,
            edge_data,
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.neighbours.size_hint()
    }
}

impl ExactSizeIterator for AdjIter<'_> {}

impl FusedIterator for AdjIter<'_> {}
