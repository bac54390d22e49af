//! Per-vertex state arrays.

use core::fmt;

use rayon::prelude::*;

use crate::concurrency::{Atom, AtomicAdd, AtomicValue};
use crate::graph::VertexId;

/// One atomic slot per vertex, exclusively owned by one job.
///
/// The array is shared by reference with the workers of a round; every write
/// goes through an atomic, so handlers only ever need `&self`.
pub struct VertexArray<T: AtomicValue> {
    slots: Box<[Atom<T>]>,
}

impl<T: AtomicValue> VertexArray<T> {
    /// Creates `len` slots holding `value`.
    pub fn new(len: usize, value: T) -> Self {
        let slots: Vec<_> = (0..len).into_par_iter().map(|_| Atom::new(value)).collect();
        Self {
            slots: slots.into_boxed_slice(),
        }
    }

    /// Number of slots.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the array has no slots.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot of `v`, for use with the free atomic helpers.
    #[inline(always)]
    pub fn slot(&self, v: VertexId) -> &Atom<T> {
        &self.slots[v as usize]
    }

    /// Current value of `v`.
    #[inline(always)]
    pub fn get(&self, v: VertexId) -> T {
        self.slots[v as usize].load()
    }

    /// Overwrites `v`. Only for owners of `v` (e.g. a pull-mode handler).
    #[inline(always)]
    pub fn set(&self, v: VertexId, value: T) {
        self.slots[v as usize].store(value);
    }

    /// Writes `new` iff `v` still holds `expected`.
    #[inline(always)]
    pub fn compare_and_swap(&self, v: VertexId, expected: T, new: T) -> bool {
        self.slots[v as usize].compare_and_swap(expected, new)
    }

    /// Lowers `v` to `candidate`; `true` iff the value changed.
    #[inline(always)]
    pub fn write_min(&self, v: VertexId, candidate: T) -> bool {
        self.slots[v as usize].fetch_min(candidate)
    }

    /// Overwrites every slot in parallel.
    pub fn fill(&self, value: T) {
        self.slots.par_iter().for_each(|s| s.store(value));
    }

    /// Copies the current values out.
    pub fn snapshot(&self) -> Vec<T> {
        self.slots.par_iter().map(Atom::load).collect()
    }
}

impl<T: AtomicAdd> VertexArray<T> {
    /// Adds `delta` to `v`.
    #[inline(always)]
    pub fn write_add(&self, v: VertexId, delta: T) {
        self.slots[v as usize].fetch_add(delta);
    }
}

impl<T: AtomicValue> fmt::Debug for VertexArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexArray")
            .field("len", &self.slots.len())
            .finish_non_exhaustive()
    }
}
