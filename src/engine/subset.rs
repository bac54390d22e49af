//! Active-vertex bitmaps.

use core::fmt;
use core::ops::Range;

use crate::concurrency::AtomicBitset;
use crate::graph::VertexId;

/// A bitmap over the vertex space: an algorithm's frontier.
///
/// All mutators take `&self`; `set_bit` is safe to call from many workers at
/// once, which is how push-mode handlers activate destinations.
pub struct VertexSubset {
    bits: AtomicBitset,
}

impl VertexSubset {
    /// Creates an empty subset over `vertices` ids.
    pub fn new(vertices: usize) -> Self {
        Self {
            bits: AtomicBitset::new(vertices),
        }
    }

    /// Size of the vertex space (not the number of active vertices).
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.bits.len_bits()
    }

    /// Deactivates every vertex.
    pub fn clear(&self) {
        self.bits.clear_all();
    }

    /// Activates every vertex.
    pub fn fill(&self) {
        self.bits.set_all();
    }

    /// Activates `v`; returns `true` iff this call was the one that set it.
    ///
    /// # Panics
    /// Panics if `v >= size()`.
    #[inline(always)]
    pub fn set_bit(&self, v: VertexId) -> bool {
        self.bits.test_and_set(v as usize)
    }

    /// Whether `v` is active.
    ///
    /// # Panics
    /// Panics if `v >= size()`.
    #[inline(always)]
    pub fn get_bit(&self, v: VertexId) -> bool {
        self.bits.is_set(v as usize)
    }

    /// Number of active vertices (parallel popcount).
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Whether no vertex is active.
    pub fn is_empty(&self) -> bool {
        (0..self.bits.word_count()).all(|w| self.bits.load_word(w) == 0)
    }

    /// Activates every vertex active in `other`.
    ///
    /// # Panics
    /// Panics if the sizes differ.
    pub fn union_with(&self, other: &VertexSubset) {
        self.bits.union_with(&other.bits);
    }

    /// Replaces the contents with those of `other`.
    ///
    /// # Panics
    /// Panics if the sizes differ.
    pub fn copy_from(&self, other: &VertexSubset) {
        self.bits.copy_from(&other.bits);
    }

    /// Active vertices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.iter_range(0..self.size())
    }

    /// Active vertices within `range`, in ascending order.
    pub fn iter_range(&self, range: Range<usize>) -> impl Iterator<Item = VertexId> + '_ {
        self.bits.iter_range(range).map(|v| v as VertexId)
    }
}

impl fmt::Debug for VertexSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexSubset")
            .field("size", &self.size())
            .field("active", &self.count())
            .finish()
    }
}
