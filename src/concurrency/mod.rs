//! Concurrency building blocks for the traversal engine.
//!
//! Important: nothing here schedules work. Parallelism comes from the engine's
//! `rayon` pool; these types only make concurrent writes inside one round safe
//! (`atomic`) and keep concurrently issued rounds apart (`channel`).

pub mod atomic;
pub mod channel;

pub use atomic::{atomic_add, atomic_min, compare_and_swap, Atom, AtomicAdd, AtomicBitset, AtomicValue};
pub use channel::{ChannelId, ChannelLease, ChannelTable};
