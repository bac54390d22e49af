//! Word-packed atomic bitsets.
//!
//! This is a dense alternative to `Vec<AtomicBool>` for frontier membership,
//! and the storage behind [`VertexSubset`](crate::engine::VertexSubset).

use core::ops::Range;
use core::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

/// Bits per storage word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// A word-packed atomic bitset of fixed length.
pub struct AtomicBitset {
    bits: usize,
    words: Box<[AtomicU64]>,
}

impl AtomicBitset {
    /// Creates a new bitset with `bits` bits, all cleared.
    pub fn new(bits: usize) -> Self {
        let words = (0..bits.div_ceil(WORD_BITS)).map(|_| AtomicU64::new(0)).collect();
        Self { bits, words }
    }

    /// Number of bits.
    #[inline(always)]
    pub fn len_bits(&self) -> usize {
        self.bits
    }

    /// Number of storage words.
    #[inline(always)]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Clears all bits.
    pub fn clear_all(&self) {
        self.words
            .par_iter()
            .for_each(|w| w.store(0, Ordering::Relaxed));
    }

    /// Sets all bits. Bits past `len_bits()` in the last word stay clear.
    pub fn set_all(&self) {
        let last = self.words.len().saturating_sub(1);
        let tail = tail_mask(self.bits);
        self.words.par_iter().enumerate().for_each(|(i, w)| {
            let value = if i == last { tail } else { u64::MAX };
            w.store(value, Ordering::Relaxed);
        });
    }

    /// Returns whether `bit` is set.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline(always)]
    pub fn is_set(&self, bit: usize) -> bool {
        assert!(bit < self.bits, "bit {bit} out of range for {} bits", self.bits);
        let (word, mask) = bit_word_mask(bit);
        (self.words[word].load(Ordering::Relaxed) & mask) != 0
    }

    /// Sets `bit` and returns `true` iff this call observed it previously cleared.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline(always)]
    pub fn test_and_set(&self, bit: usize) -> bool {
        assert!(bit < self.bits, "bit {bit} out of range for {} bits", self.bits);
        let (word, mask) = bit_word_mask(bit);
        let prev = self.words[word].fetch_or(mask, Ordering::Relaxed);
        (prev & mask) == 0
    }

    /// Loads one storage word.
    #[inline(always)]
    pub fn load_word(&self, word: usize) -> u64 {
        self.words[word].load(Ordering::Relaxed)
    }

    /// Population count, computed in parallel over words.
    pub fn count_ones(&self) -> usize {
        self.words
            .par_iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }

    /// ORs every word of `other` into `self`.
    ///
    /// # Panics
    /// Panics if the lengths differ.
    pub fn union_with(&self, other: &AtomicBitset) {
        assert_eq!(self.bits, other.bits, "bitset lengths differ");
        self.words
            .par_iter()
            .zip(other.words.par_iter())
            .for_each(|(a, b)| {
                a.fetch_or(b.load(Ordering::Relaxed), Ordering::Relaxed);
            });
    }

    /// Overwrites `self` with the contents of `other`.
    ///
    /// # Panics
    /// Panics if the lengths differ.
    pub fn copy_from(&self, other: &AtomicBitset) {
        assert_eq!(self.bits, other.bits, "bitset lengths differ");
        self.words
            .par_iter()
            .zip(other.words.par_iter())
            .for_each(|(a, b)| a.store(b.load(Ordering::Relaxed), Ordering::Relaxed));
    }

    /// Iterates the set bits within `range`, in ascending order.
    pub fn iter_range(&self, range: Range<usize>) -> SetBits<'_> {
        let end = range.end.min(self.bits);
        let start = range.start.min(end);
        SetBits {
            set: self,
            word: start / WORD_BITS,
            current: 0,
            start,
            end,
            primed: false,
        }
    }
}

/// Iterator over set bits, produced by [`AtomicBitset::iter_range`].
pub struct SetBits<'a> {
    set: &'a AtomicBitset,
    word: usize,
    current: u64,
    start: usize,
    end: usize,
    primed: bool,
}

impl SetBits<'_> {
    /// Loads `self.word`, masked to `[start, end)`.
    #[inline(always)]
    fn load_masked(&self) -> u64 {
        let base = self.word * WORD_BITS;
        let mut bits = self.set.load_word(self.word);
        if self.start > base {
            bits &= u64::MAX << (self.start - base);
        }
        if self.end < base + WORD_BITS {
            bits &= tail_mask(self.end - base);
        }
        bits
    }
}

impl Iterator for SetBits<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.start >= self.end {
            return None;
        }
        if !self.primed {
            self.current = self.load_masked();
            self.primed = true;
        }
        loop {
            if self.current != 0 {
                let tz = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word * WORD_BITS + tz);
            }
            self.word += 1;
            if self.word * WORD_BITS >= self.end {
                self.start = self.end;
                return None;
            }
            self.current = self.load_masked();
        }
    }
}

/// Mask with the low `bits % 64` bits set (all bits when the remainder is 0).
#[inline(always)]
fn tail_mask(bits: usize) -> u64 {
    match bits % WORD_BITS {
        0 => u64::MAX,
        r => (1u64 << r) - 1,
    }
}

#[inline(always)]
fn bit_word_mask(bit: usize) -> (usize, u64) {
    // `WORD_BITS` is a power of two, so use shifts/masks.
    // This is on the hot path for graph traversal.
    (bit >> 6, 1u64 << (bit & 63))
}
