//! Scalar types that can live in an atomic per-vertex slot.

use core::fmt::Debug;
use core::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};

/// A `Copy` scalar with a lock-free atomic representation.
///
/// Floats are stored as their bit patterns, so compare-exchange on a float slot
/// compares bits rather than numeric values.
pub trait AtomicValue: Copy + PartialOrd + Debug + Send + Sync + 'static {
    /// Hardware atomic holding the value.
    type Repr: Send + Sync;

    /// Wraps `value` in a fresh atomic.
    fn new_repr(value: Self) -> Self::Repr;

    /// Atomically loads the value.
    fn load(repr: &Self::Repr, order: Ordering) -> Self;

    /// Atomically stores the value.
    fn store(repr: &Self::Repr, value: Self, order: Ordering);

    /// Strong compare-exchange; `Err` carries the observed value.
    fn compare_exchange(
        repr: &Self::Repr,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self, Self>;
}

/// An [`AtomicValue`] that also supports atomic addition.
pub trait AtomicAdd: AtomicValue {
    /// Adds `delta` and returns the previous value.
    fn fetch_add(repr: &Self::Repr, delta: Self, order: Ordering) -> Self;
}

macro_rules! impl_atomic_int {
    ($($t:ty => $atomic:ty),* $(,)?) => {$(
        impl AtomicValue for $t {
            type Repr = $atomic;

            #[inline(always)]
            fn new_repr(value: Self) -> Self::Repr {
                <$atomic>::new(value)
            }

            #[inline(always)]
            fn load(repr: &Self::Repr, order: Ordering) -> Self {
                repr.load(order)
            }

            #[inline(always)]
            fn store(repr: &Self::Repr, value: Self, order: Ordering) {
                repr.store(value, order);
            }

            #[inline(always)]
            fn compare_exchange(
                repr: &Self::Repr,
                current: Self,
                new: Self,
                success: Ordering,
                failure: Ordering,
            ) -> Result<Self, Self> {
                repr.compare_exchange(current, new, success, failure)
            }
        }

        impl AtomicAdd for $t {
            #[inline(always)]
            fn fetch_add(repr: &Self::Repr, delta: Self, order: Ordering) -> Self {
                repr.fetch_add(delta, order)
            }
        }
    )*};
}

impl_atomic_int!(u32 => AtomicU32, u64 => AtomicU64, usize => AtomicUsize);

macro_rules! impl_atomic_float {
    ($($t:ty => $atomic:ty),* $(,)?) => {$(
        impl AtomicValue for $t {
            type Repr = $atomic;

            #[inline(always)]
            fn new_repr(value: Self) -> Self::Repr {
                <$atomic>::new(value.to_bits())
            }

            #[inline(always)]
            fn load(repr: &Self::Repr, order: Ordering) -> Self {
                <$t>::from_bits(repr.load(order))
            }

            #[inline(always)]
            fn store(repr: &Self::Repr, value: Self, order: Ordering) {
                repr.store(value.to_bits(), order);
            }

            #[inline(always)]
            fn compare_exchange(
                repr: &Self::Repr,
                current: Self,
                new: Self,
                success: Ordering,
                failure: Ordering,
            ) -> Result<Self, Self> {
                repr.compare_exchange(current.to_bits(), new.to_bits(), success, failure)
                    .map(<$t>::from_bits)
                    .map_err(<$t>::from_bits)
            }
        }

        impl AtomicAdd for $t {
            #[inline]
            fn fetch_add(repr: &Self::Repr, delta: Self, order: Ordering) -> Self {
                let mut current = repr.load(Ordering::Relaxed);
                loop {
                    let next = (<$t>::from_bits(current) + delta).to_bits();
                    match repr.compare_exchange_weak(current, next, order, Ordering::Relaxed) {
                        Ok(prev) => return <$t>::from_bits(prev),
                        Err(actual) => current = actual,
                    }
                }
            }
        }
    )*};
}

impl_atomic_float!(f32 => AtomicU32, f64 => AtomicU64);
