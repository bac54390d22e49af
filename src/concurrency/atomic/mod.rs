//! Lock-free per-vertex update primitives.
//!
//! Push-mode edge processing lets many sources race on the same destination
//! slot. Every such write goes through one of:
//! - [`compare_and_swap`]: first writer wins, used where any winner is correct
//! - [`atomic_min`]: deterministic minimum regardless of write order
//! - [`atomic_add`]: deterministic sum (up to float rounding order)
//!
//! Important: atomic RMW operations have inherent hardware cost. Pull-mode
//! handlers own their destination and can use plain loads and stores.

mod atom;
pub mod bitset;
mod value;

pub use atom::{atomic_add, atomic_min, compare_and_swap, Atom};
pub use bitset::AtomicBitset;
pub use value::{AtomicAdd, AtomicValue};
