use core::fmt;
use core::sync::atomic::Ordering;

use super::value::{AtomicAdd, AtomicValue};

/// One atomic per-vertex slot.
///
/// Plain loads and stores are `Relaxed`: traversal rounds are separated by the
/// worker pool's join, which already orders them. Read-modify-write updates
/// use `AcqRel` so racing writers within a round see each other's results.
#[repr(transparent)]
pub struct Atom<T: AtomicValue> {
    repr: T::Repr,
}

impl<T: AtomicValue> Atom<T> {
    /// Creates a slot holding `value`.
    #[inline(always)]
    pub fn new(value: T) -> Self {
        Self {
            repr: T::new_repr(value),
        }
    }

    /// Loads the current value.
    #[inline(always)]
    pub fn load(&self) -> T {
        T::load(&self.repr, Ordering::Relaxed)
    }

    /// Stores a new value.
    #[inline(always)]
    pub fn store(&self, value: T) {
        T::store(&self.repr, value, Ordering::Relaxed);
    }

    /// Stores `new` iff the slot holds `expected`; returns whether it did.
    #[inline(always)]
    pub fn compare_and_swap(&self, expected: T, new: T) -> bool {
        T::compare_exchange(&self.repr, expected, new, Ordering::AcqRel, Ordering::Acquire).is_ok()
    }

    /// Lowers the slot to `candidate` if `candidate` is smaller.
    ///
    /// Returns `true` iff this call performed the write. The final value is the
    /// minimum of all racing candidates, whatever the interleaving.
    #[inline]
    pub fn fetch_min(&self, candidate: T) -> bool {
        let mut current = self.load();
        while candidate < current {
            match T::compare_exchange(
                &self.repr,
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
        false
    }
}

impl<T: AtomicAdd> Atom<T> {
    /// Adds `delta`, returning the previous value.
    #[inline(always)]
    pub fn fetch_add(&self, delta: T) -> T {
        T::fetch_add(&self.repr, delta, Ordering::AcqRel)
    }
}

impl<T: AtomicValue + Default> Default for Atom<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: AtomicValue> fmt::Debug for Atom<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Atom").field(&self.load()).finish()
    }
}

/// Compare-and-swap on a slot; `true` iff `new` was written.
#[inline(always)]
pub fn compare_and_swap<T: AtomicValue>(slot: &Atom<T>, expected: T, new: T) -> bool {
    slot.compare_and_swap(expected, new)
}

/// Atomic minimum on a slot; `true` iff `candidate` was written.
#[inline(always)]
pub fn atomic_min<T: AtomicValue>(slot: &Atom<T>, candidate: T) -> bool {
    slot.fetch_min(candidate)
}

/// Atomic addition on a slot; returns the previous value.
#[inline(always)]
pub fn atomic_add<T: AtomicAdd>(slot: &Atom<T>, delta: T) -> T {
    slot.fetch_add(delta)
}
