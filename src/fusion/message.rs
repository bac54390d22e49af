//! Fixed-capacity vector messages.

use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::jobs::Payload;

/// Upper bound on the jobs sharing one fused traversal.
pub const MAX_FUSED_JOBS: usize = 16;

/// One value per job slot, stored inline.
///
/// Capacity is [`MAX_FUSED_JOBS`]; the length is fixed per run. Slots past the
/// length hold `T::default()` and are never exposed.
#[derive(Clone, Copy)]
pub struct SlotVec<T: Copy + Default> {
    slots: [T; MAX_FUSED_JOBS],
    len: u8,
}

/// Message of a fused frontier round; `None` marks a job inactive at the vertex.
pub type FusedMessage = SlotVec<Option<Payload>>;

impl<T: Copy + Default> SlotVec<T> {
    /// Builds `len` slots with `f(slot)`.
    ///
    /// # Panics
    /// Panics if `len > MAX_FUSED_JOBS`.
    #[inline]
    pub fn from_fn(len: usize, mut f: impl FnMut(usize) -> T) -> Self {
        assert!(len <= MAX_FUSED_JOBS, "{len} slots exceed the capacity of {MAX_FUSED_JOBS}");
        let mut slots = [T::default(); MAX_FUSED_JOBS];
        for (i, slot) in slots.iter_mut().enumerate().take(len) {
            *slot = f(i);
        }
        Self {
            slots,
            len: len as u8,
        }
    }

    /// Builds `len` copies of `value`.
    ///
    /// # Panics
    /// Panics if `len > MAX_FUSED_JOBS`.
    #[inline]
    pub fn filled(len: usize, value: T) -> Self {
        Self::from_fn(len, |_| value)
    }
}

impl<T: Copy + Default> Deref for SlotVec<T> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        &self.slots[..usize::from(self.len)]
    }
}

impl<T: Copy + Default> DerefMut for SlotVec<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.slots[..usize::from(self.len)]
    }
}

impl<T: Copy + Default + PartialEq> PartialEq for SlotVec<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Copy + Default + fmt::Debug> fmt::Debug for SlotVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_only_len_slots() {
        let v = SlotVec::from_fn(3, |i| i as u32 * 10);
        assert_eq!(v.len(), 3);
        assert_eq!(&*v, &[0, 10, 20]);
        assert_eq!(v[2], 20);
        assert_eq!(format!("{v:?}"), "[0, 10, 20]");
    }

    #[test]
    fn slots_are_mutable_in_place() {
        let mut v = SlotVec::filled(2, 1.5f64);
        v[1] += 1.0;
        assert_eq!(&*v, &[1.5, 2.5]);
        assert_ne!(v, SlotVec::filled(2, 1.5));
    }

    #[test]
    fn fused_message_defaults_to_inactive() {
        let m = FusedMessage::from_fn(4, |i| (i == 2).then_some(Payload::Vertex(9)));
        assert_eq!(m.iter().filter(|p| p.is_some()).count(), 1);
        assert_eq!(m[2], Some(Payload::Vertex(9)));
    }

    #[test]
    #[should_panic(expected = "exceed the capacity")]
    fn over_capacity_panics() {
        let _ = SlotVec::filled(MAX_FUSED_JOBS + 1, 0u8);
    }
}
